//! The save container: header, version detection, block orchestration and
//! checksum.
//!
//! ```text
//! 0x00 checksum:u32       CRC32 over bytes 0x04..end, written on save only
//! 0x04 revision:i32       0 = Switch, 1 = Switch DLC, 2 = Switch VR
//! 0x08 total size:i32     always 0x800C
//! 0x0C identifier:i32     7
//! 0x10 logical size:i32   header + blocks, without trailing padding
//! 0x14 reserved:8
//! 0x1C GameSettings block, SeasonProgress blocks, courseCount:u32,
//!      CourseProgress records, zero padding
//! ```
//!
//! All words use the byte order of the detected [`FormatVersion`].

use std::path::Path;

use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::blocks::{CourseProgress, GameSettings, SaveBlock, SeasonProgress};
use crate::catalog::{StageCatalog, StageNode};
use crate::config::EditorConfig;
use crate::cursor::{BinaryCursor, ByteOrder};
use crate::error::{CoreError, CoreResult};
use crate::migration::{migrate_to_latest, MigrationReport};
use crate::storage;
use crate::version::{
    FormatVersion, DLC_COURSE_SLOTS, GAME_IDENTIFIER, GAME_SETTINGS_OFFSET, IDENTIFIER_OFFSET,
    MAX_COURSE_SLOTS, MAX_SEASON_SLOTS, REVISION_OFFSET, TOTAL_FILE_SIZE,
};

/// Header words before the GameSettings block that count towards the
/// logical size.
const SAVE_DATA_HEADER_SIZE: u32 = 16;

/// One save file held in memory.
///
/// Season and course slots are allocated for the newest release up front;
/// only the first [`FormatVersion::season_count`] and
/// [`FormatVersion::course_count`] entries are read, written and exposed.
#[derive(Clone, Debug)]
pub struct SaveDocument {
    pub(crate) version: FormatVersion,
    pub(crate) game_settings: GameSettings,
    pub(crate) seasons: Vec<SeasonProgress>,
    pub(crate) courses: Vec<CourseProgress>,
    buffer: Vec<u8>,
    buffer_order: ByteOrder,
}

impl SaveDocument {
    /// Fresh document in the newest format.
    pub fn new() -> Self {
        Self::with_version(FormatVersion::LATEST)
    }

    pub fn with_version(version: FormatVersion) -> Self {
        Self {
            version,
            game_settings: GameSettings::new(version.uses_legacy_game_settings()),
            seasons: (1..=MAX_SEASON_SLOTS as u32).map(SeasonProgress::new).collect(),
            courses: (0..MAX_COURSE_SLOTS).map(CourseProgress::new).collect(),
            buffer: vec![0u8; TOTAL_FILE_SIZE],
            buffer_order: version.byte_order(),
        }
    }

    /// Discards all progress and switches to the newest format.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn version(&self) -> FormatVersion {
        self.version
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.version.byte_order()
    }

    pub fn season_count(&self) -> usize {
        self.version.season_count()
    }

    pub fn course_count(&self) -> usize {
        self.version.course_count()
    }

    pub fn game_settings(&self) -> &GameSettings {
        &self.game_settings
    }

    pub fn game_settings_mut(&mut self) -> &mut GameSettings {
        &mut self.game_settings
    }

    pub fn seasons(&self) -> &[SeasonProgress] {
        &self.seasons[..self.season_count()]
    }

    /// 0-based slot index; season id is `index + 1`.
    pub fn season(&self, index: usize) -> Option<&SeasonProgress> {
        self.seasons().get(index)
    }

    pub fn season_mut(&mut self, index: usize) -> Option<&mut SeasonProgress> {
        let count = self.season_count();
        self.seasons[..count].get_mut(index)
    }

    pub fn courses(&self) -> &[CourseProgress] {
        &self.courses[..self.course_count()]
    }

    pub fn course(&self, course_id: usize) -> Option<&CourseProgress> {
        self.courses().get(course_id)
    }

    pub fn course_mut(&mut self, course_id: usize) -> Option<&mut CourseProgress> {
        let count = self.course_count();
        self.courses[..count].get_mut(course_id)
    }

    /// Bytes of the last successful read or encode.
    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    /// Checksum stored in [`Self::buffer`], decoded with the byte order the
    /// buffer was filled in, which may differ from a migrated document's.
    pub fn stored_checksum(&self) -> u32 {
        let order = self.buffer_order;
        BinaryCursor::new(self.buffer.as_slice(), order)
            .peek_u32_at(0, order)
            .unwrap_or_default()
    }

    /// Value written at 0x10: header, every block with its length word, the
    /// course count and the course records.
    pub fn logical_size(&self) -> u32 {
        let seasons = self.season_count() as u32;
        let courses = self.course_count() as u32;
        SAVE_DATA_HEADER_SIZE
            + (4 + self.game_settings.block_size())
            + seasons * (4 + SeasonProgress::SIZE)
            + 4
            + courses * CourseProgress::SIZE as u32
    }

    /// Parses a complete save image into a new document.
    ///
    /// The stored checksum is not verified. A pending DLC lock is left as
    /// found; see [`Self::apply_pending_dlc_lock`].
    pub fn from_bytes(raw: &[u8]) -> CoreResult<Self> {
        if raw.len() != TOTAL_FILE_SIZE {
            return Err(CoreError::InvalidFileSize { found: raw.len() });
        }
        let version = detect_version(raw)?;
        debug!(%version, "detected save format");

        let mut document = Self::with_version(version);
        let mut cursor = BinaryCursor::new(raw, version.byte_order());
        cursor.seek(GAME_SETTINGS_OFFSET)?;
        document.game_settings.read(&mut cursor)?;
        debug!(
            block_size = document.game_settings.block_size(),
            legacy = document.game_settings.legacy_layout,
            "read game settings"
        );

        for season in document.seasons.iter_mut().take(version.season_count()) {
            season.read(&mut cursor)?;
        }

        let course_count = cursor.get_u32()?;
        if course_count as usize > MAX_COURSE_SLOTS {
            return Err(CoreError::CourseCountOverflow {
                found: course_count,
                capacity: MAX_COURSE_SLOTS,
            });
        }
        for course in document.courses.iter_mut().take(course_count as usize) {
            course.read(&mut cursor)?;
        }
        debug!(course_count, "read course records");

        document.buffer.copy_from_slice(raw);
        Ok(document)
    }

    /// Replaces this document with the parsed contents of `raw`. On error the
    /// document is left untouched.
    pub fn load_bytes(&mut self, raw: &[u8]) -> CoreResult<()> {
        *self = Self::from_bytes(raw)?;
        Ok(())
    }

    /// Serializes every block into the owned buffer and stamps the checksum.
    pub fn encode(&mut self) -> CoreResult<&[u8]> {
        let order = self.byte_order();
        let mut cursor = BinaryCursor::new(vec![0u8; TOTAL_FILE_SIZE], order);

        cursor.seek(REVISION_OFFSET)?;
        cursor.put_i32(self.version.revision_code())?;
        cursor.put_u32(TOTAL_FILE_SIZE as u32)?;
        cursor.put_u32(GAME_IDENTIFIER)?;
        cursor.put_u32(self.logical_size())?;
        cursor.fill_zero(8)?;

        self.game_settings.write(&mut cursor)?;
        for season in self.seasons() {
            season.write(&mut cursor)?;
        }
        cursor.put_u32(self.course_count() as u32)?;
        for course in self.courses() {
            course.write(&mut cursor)?;
        }

        let checksum = compute_checksum(cursor.as_slice());
        cursor.put_u32_at(0, checksum)?;
        self.buffer = cursor.into_inner();
        self.buffer_order = order;
        debug!(checksum, version = %self.version, "encoded save");
        Ok(&self.buffer)
    }

    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn read(&mut self, path: &Path) -> CoreResult<()> {
        let raw = storage::read_save_file(path)?;
        self.load_bytes(&raw)?;
        info!(version = %self.version, "loaded save file");
        Ok(())
    }

    pub fn write(&mut self, path: &Path) -> CoreResult<()> {
        self.write_with_backup(path, false)
    }

    /// Writes the save, copying any previous file to `<path>.bak` first when
    /// `backup` is set.
    #[instrument(skip_all, fields(path = %path.display(), backup = backup))]
    pub fn write_with_backup(&mut self, path: &Path, backup: bool) -> CoreResult<()> {
        self.encode()?;
        storage::write_save_file(path, &self.buffer, backup)?;
        info!(version = %self.version, "wrote save file");
        Ok(())
    }

    /// Opens a save and runs the configured post-load steps: the pending DLC
    /// lock and, for outdated saves, migration to the newest format.
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn open_with_config(
        path: &Path,
        config: &EditorConfig,
    ) -> CoreResult<(Self, Option<MigrationReport>)> {
        let mut document = Self::new();
        document.read(path)?;
        if config.apply_dlc_lock_on_open {
            document.apply_pending_dlc_lock();
        }
        let report = (config.auto_migrate && document.version < FormatVersion::LATEST)
            .then(|| document.migrate_to_latest());
        Ok((document, report))
    }

    pub fn migrate_to_latest(&mut self) -> MigrationReport {
        migrate_to_latest(self)
    }

    /// Locks the DLC course slots if the game asked for it, clearing the
    /// request. Returns whether anything was applied.
    pub fn apply_pending_dlc_lock(&mut self) -> bool {
        if !self.game_settings.need_init_aoc_lock {
            return false;
        }
        warn!(
            first = DLC_COURSE_SLOTS.start,
            last = DLC_COURSE_SLOTS.end - 1,
            "applying pending DLC course lock"
        );
        for course in &mut self.courses[DLC_COURSE_SLOTS] {
            course.flags = CourseProgress::FLAG_LOCK;
        }
        self.game_settings.need_init_aoc_lock = false;
        true
    }

    /// Pages of `season_id` that can host a bonus level in this document's
    /// format.
    pub fn season_bonus_pages<'c>(
        &self,
        catalog: &'c StageCatalog,
        season_id: u32,
    ) -> Vec<&'c StageNode> {
        catalog.season_valid_bonus_pages(self.version, season_id)
    }

    pub fn season_actual_pages<'c>(
        &self,
        catalog: &'c StageCatalog,
        season_id: u32,
    ) -> Vec<&'c StageNode> {
        catalog.season_actual_pages(self.version, season_id)
    }

    /// Serializable view of every slot valid for the current format.
    pub fn summary(&self) -> DocumentSummary<'_> {
        DocumentSummary {
            version: self.version,
            checksum: self.stored_checksum(),
            game_settings: &self.game_settings,
            seasons: self.seasons(),
            courses: self.courses(),
        }
    }
}

impl Default for SaveDocument {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Serialize)]
pub struct DocumentSummary<'a> {
    pub version: FormatVersion,
    pub checksum: u32,
    pub game_settings: &'a GameSettings,
    pub seasons: &'a [SeasonProgress],
    pub courses: &'a [CourseProgress],
}

/// Determines the release that produced `raw` from its header words.
pub fn detect_version(raw: &[u8]) -> CoreResult<FormatVersion> {
    let cursor = BinaryCursor::new(raw, ByteOrder::LittleEndian);
    let identifier = cursor.peek_u32_at(IDENTIFIER_OFFSET, ByteOrder::LittleEndian)?;

    if identifier == GAME_IDENTIFIER << 24 {
        return Ok(FormatVersion::WiiU);
    }
    if identifier != GAME_IDENTIFIER {
        return Err(CoreError::UnrecognizedIdentifier(identifier));
    }

    let revision = cursor.peek_u32_at(REVISION_OFFSET, ByteOrder::LittleEndian)? as i32;
    if !(0..=2).contains(&revision) {
        return Err(CoreError::UnsupportedRevision(revision));
    }
    let game_settings_len = cursor.peek_u32_at(GAME_SETTINGS_OFFSET, ByteOrder::LittleEndian)?;
    if game_settings_len == GameSettings::LEGACY_SIZE {
        return Ok(FormatVersion::ThreeDS);
    }
    FormatVersion::from_switch_revision(revision).ok_or(CoreError::UnsupportedRevision(revision))
}

/// CRC32 of everything after the checksum word.
pub fn compute_checksum(raw: &[u8]) -> u32 {
    crc32fast::hash(raw.get(4..).unwrap_or_default())
}

#[cfg(test)]
#[path = "tests/document_tests.rs"]
mod tests;
