use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

pub type CoreResult<T> = Result<T, CoreError>;

#[derive(Debug, Error, Diagnostic)]
pub enum CoreError {
    #[error("invalid file size: expected 32780 bytes, found {found}")]
    #[diagnostic(code("ctse.invalid_file_size"))]
    InvalidFileSize { found: usize },
    #[error("file does not contain Captain Toad save data (identifier {0:#010x})")]
    #[diagnostic(
        code("ctse.unrecognized_identifier"),
        help("the word at offset 0x0C must be 7 in either byte order")
    )]
    UnrecognizedIdentifier(u32),
    #[error("unknown revision found: {0}")]
    #[diagnostic(code("ctse.unsupported_revision"))]
    UnsupportedRevision(i32),
    #[error("file contains {found} course infos, but only {capacity} are supported")]
    #[diagnostic(code("ctse.course_count_overflow"))]
    CourseCountOverflow { found: u32, capacity: usize },
    #[error("access of {len} bytes at {position:#x} exceeds buffer of {size} bytes")]
    #[diagnostic(code("ctse.out_of_bounds"))]
    OutOfBounds {
        position: usize,
        len: usize,
        size: usize,
    },
    #[error("stage catalog asset not found at {0}")]
    #[diagnostic(
        code("ctse.catalog_missing"),
        help("the stage catalog is required for all course and season indexing")
    )]
    CatalogAssetMissing(PathBuf),
    #[error("malformed stage catalog: {0}")]
    #[diagnostic(code("ctse.catalog_malformed"))]
    MalformedCatalog(String),
    #[error("io error: {0}")]
    #[diagnostic(code("ctse.io"))]
    Io(#[from] std::io::Error),
}

#[cold]
#[inline(never)]
pub(crate) fn malformed_catalog(message: impl Into<String>) -> CoreError {
    CoreError::MalformedCatalog(message.into())
}
