//! Forward-only upgrade of a loaded document to the newest format.
//!
//! Each step repairs what the game itself fixes when it first loads a save
//! from the preceding release. Steps run in table order starting at the
//! document's version; none is ever skipped.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::blocks::{CourseProgress, GameSettings, SaveBlock};
use crate::document::SaveDocument;
use crate::version::{FormatVersion, ODYSSEY_COURSE_SLOTS};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationTraceEntry {
    pub step_id: String,
    pub from_version: FormatVersion,
    pub to_version: FormatVersion,
    pub changed: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationReport {
    pub from_version: FormatVersion,
    pub to_version: FormatVersion,
    pub entries: Vec<MigrationTraceEntry>,
}

impl MigrationReport {
    pub fn changed(&self) -> bool {
        self.entries.iter().any(|entry| entry.changed)
    }
}

#[derive(Clone, Copy)]
struct MigrationStep {
    from_version: FormatVersion,
    to_version: FormatVersion,
    step_id: &'static str,
    apply: fn(&mut SaveDocument) -> bool,
}

const MIGRATION_STEPS: &[MigrationStep] = &[
    MigrationStep {
        from_version: FormatVersion::WiiU,
        to_version: FormatVersion::ThreeDS,
        step_id: "wiiu_crossover_repair",
        apply: migrate_wiiu,
    },
    MigrationStep {
        from_version: FormatVersion::ThreeDS,
        to_version: FormatVersion::Switch,
        step_id: "3ds_compact_game_settings",
        apply: migrate_3ds,
    },
    MigrationStep {
        from_version: FormatVersion::Switch,
        to_version: FormatVersion::SwitchDLC,
        step_id: "switch_dlc_lock",
        apply: migrate_switch,
    },
    MigrationStep {
        from_version: FormatVersion::SwitchDLC,
        to_version: FormatVersion::SwitchVR,
        step_id: "switch_dlc_to_vr",
        apply: migrate_noop,
    },
];

/// Upgrades `document` to [`FormatVersion::LATEST`]. A document that is
/// already current is left untouched and yields an empty report.
pub fn migrate_to_latest(document: &mut SaveDocument) -> MigrationReport {
    let from_version = document.version;
    let mut entries = Vec::new();

    for step in MIGRATION_STEPS
        .iter()
        .filter(|step| step.from_version >= from_version)
    {
        let changed = (step.apply)(document);
        document.version = step.to_version;
        debug!(step = step.step_id, changed, "applied migration step");
        entries.push(MigrationTraceEntry {
            step_id: step.step_id.to_string(),
            from_version: step.from_version,
            to_version: step.to_version,
            changed,
        });
    }

    if !entries.is_empty() {
        info!(from = %from_version, to = %document.version, "migrated save");
    }
    MigrationReport {
        from_version,
        to_version: document.version,
        entries,
    }
}

fn migrate_wiiu(document: &mut SaveDocument) -> bool {
    let before = document.game_settings.clone();
    let settings = &mut document.game_settings;
    settings.miiverse_setting = true;
    settings.unlock_odyssey_levels = settings.exist_3d_world_save_data;
    settings.exist_3d_world_save_data = false;
    settings.set_flag(GameSettings::FLAG_SHOW_3D_WORLD_SAVE_DATA, false);

    let unlocked = settings.unlock_odyssey_levels
        || settings.has_flag(GameSettings::FLAG_OPEN_SEASON_SP);
    let flags = if unlocked {
        CourseProgress::FLAG_OPEN | CourseProgress::FLAG_NEW
    } else {
        CourseProgress::FLAG_LOCK
    };

    let mut changed = document.game_settings != before;
    for course in &mut document.courses[ODYSSEY_COURSE_SLOTS] {
        let mut fresh = CourseProgress::new(course.course_id);
        fresh.flags = flags;
        changed |= *course != fresh;
        *course = fresh;
    }
    changed
}

fn migrate_3ds(document: &mut SaveDocument) -> bool {
    std::mem::replace(&mut document.game_settings.legacy_layout, false)
}

/// Season 5 already exists in pre-DLC saves, but with the six-stage bonus
/// counter of the regular seasons.
fn migrate_switch(document: &mut SaveDocument) -> bool {
    let special = &mut document.seasons[4];
    let before = special.clone();
    special.init();
    let mut changed = *special != before;

    document.game_settings.need_init_aoc_lock = true;
    changed |= document.apply_pending_dlc_lock();
    changed
}

fn migrate_noop(_document: &mut SaveDocument) -> bool {
    false
}

#[cfg(test)]
#[path = "tests/migration_tests.rs"]
mod tests;
