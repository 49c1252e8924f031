//! Codec and repair logic for Captain Toad: Treasure Tracker save files.
//!
//! [`SaveDocument`] reads and writes the fixed-size save container of every
//! release, [`StageCatalog`] indexes the stages the save refers to, and
//! [`migrate_to_latest`] upgrades old saves the way the newest game does.

pub mod bits;
pub mod blocks;
pub mod catalog;
mod config;
pub mod cursor;
mod document;
mod error;
mod migration;
pub mod storage;
pub mod version;

pub use blocks::{CourseProgress, GameSettings, SaveBlock, SeasonProgress};
pub use catalog::{
    encode_catalog, CatalogRecord, NodeId, StageCatalog, StageFeatures, StageIcon, StageNode,
    StageType, VersionThreshold, VisibleTree,
};
pub use config::{ConfigError, EditorConfig};
pub use cursor::{BinaryCursor, ByteOrder};
pub use document::{compute_checksum, detect_version, DocumentSummary, SaveDocument};
pub use error::{CoreError, CoreResult};
pub use migration::{migrate_to_latest, MigrationReport, MigrationTraceEntry};
pub use version::{FormatVersion, UnknownVersion, TOTAL_FILE_SIZE};
