//! Codecs for the sub-blocks of the save container.
//!
//! GameSettings and SeasonProgress blocks start with a `u32` payload length.
//! Readers parse the fields they know and then jump to `start + length`, so
//! trailing bytes written by newer releases are skipped; writers zero-fill up
//! to the declared length. CourseProgress records are fixed-size and carry no
//! length of their own.

mod course;
mod game;
mod season;

pub use course::CourseProgress;
pub use game::GameSettings;
pub use season::SeasonProgress;

use crate::cursor::BinaryCursor;
use crate::error::CoreResult;

pub trait SaveBlock {
    /// Restores the defaults of a fresh save.
    fn init(&mut self);

    fn read<B: AsRef<[u8]>>(&mut self, cursor: &mut BinaryCursor<B>) -> CoreResult<()>;

    fn write<B: AsRef<[u8]> + AsMut<[u8]>>(&self, cursor: &mut BinaryCursor<B>)
        -> CoreResult<()>;
}

/// Reads a length-prefixed block, returning the declared payload length.
pub(crate) fn read_sized<B, F>(cursor: &mut BinaryCursor<B>, body: F) -> CoreResult<u32>
where
    B: AsRef<[u8]>,
    F: FnOnce(&mut BinaryCursor<B>) -> CoreResult<()>,
{
    let declared = cursor.get_u32()?;
    let sentinel = cursor.position() + declared as usize;
    body(cursor)?;
    cursor.seek(sentinel)?;
    Ok(declared)
}

/// Writes a length-prefixed block and pads it to exactly `declared` bytes.
pub(crate) fn write_sized<B, F>(
    cursor: &mut BinaryCursor<B>,
    declared: u32,
    body: F,
) -> CoreResult<()>
where
    B: AsRef<[u8]> + AsMut<[u8]>,
    F: FnOnce(&mut BinaryCursor<B>) -> CoreResult<()>,
{
    cursor.put_u32(declared)?;
    write_padded(cursor, declared as usize, body)
}

pub(crate) fn write_padded<B, F>(cursor: &mut BinaryCursor<B>, size: usize, body: F) -> CoreResult<()>
where
    B: AsRef<[u8]> + AsMut<[u8]>,
    F: FnOnce(&mut BinaryCursor<B>) -> CoreResult<()>,
{
    let end = cursor.position() + size;
    body(cursor)?;
    let written = cursor.position();
    cursor.fill_zero(end.saturating_sub(written))
}

#[cfg(test)]
#[path = "../tests/blocks_tests.rs"]
mod tests;
