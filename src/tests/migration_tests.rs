use super::*;
use crate::cursor::ByteOrder;
use crate::version::DLC_COURSE_SLOTS;

fn wiiu_with_crossover_data() -> SaveDocument {
    let mut document = SaveDocument::with_version(FormatVersion::WiiU);
    let settings = &mut document.game_settings;
    settings.miiverse_setting = false;
    settings.exist_3d_world_save_data = true;
    settings.set_flag(GameSettings::FLAG_OPEN_SEASON_SP, true);
    settings.set_flag(GameSettings::FLAG_SHOW_3D_WORLD_SAVE_DATA, true);
    settings.need_init_aoc_lock = false;
    document.seasons[4].bonus_course_counter = 6;
    document.courses[94].best_coin = 50;
    document
}

#[test]
fn wiiu_save_walks_every_step() {
    let mut document = wiiu_with_crossover_data();
    let report = migrate_to_latest(&mut document);

    assert_eq!(report.from_version, FormatVersion::WiiU);
    assert_eq!(report.to_version, FormatVersion::SwitchVR);
    let steps: Vec<_> = report
        .entries
        .iter()
        .map(|entry| (entry.from_version, entry.to_version))
        .collect();
    assert_eq!(
        steps,
        vec![
            (FormatVersion::WiiU, FormatVersion::ThreeDS),
            (FormatVersion::ThreeDS, FormatVersion::Switch),
            (FormatVersion::Switch, FormatVersion::SwitchDLC),
            (FormatVersion::SwitchDLC, FormatVersion::SwitchVR),
        ]
    );
    assert!(report.changed());
    assert!(!report.entries[3].changed);

    assert_eq!(document.version(), FormatVersion::SwitchVR);
    assert_eq!(document.byte_order(), ByteOrder::LittleEndian);
    let settings = document.game_settings();
    assert!(settings.miiverse_setting);
    assert!(settings.unlock_odyssey_levels);
    assert!(!settings.exist_3d_world_save_data);
    assert!(!settings.has_flag(GameSettings::FLAG_SHOW_3D_WORLD_SAVE_DATA));
    assert!(!settings.legacy_layout);
    assert!(!settings.need_init_aoc_lock);
}

#[test]
fn crossover_courses_open_when_unlocked() {
    let mut document = wiiu_with_crossover_data();
    migrate_to_latest(&mut document);

    for course_id in 93..97 {
        let course = document.course(course_id).expect("crossover course");
        assert_eq!(
            course.flags,
            CourseProgress::FLAG_OPEN | CourseProgress::FLAG_NEW
        );
    }
    assert_eq!(document.course(94).expect("course").best_coin, 0);
    assert_eq!(document.course(97).expect("course").flags, 0);
}

#[test]
fn crossover_courses_lock_otherwise() {
    let mut document = SaveDocument::with_version(FormatVersion::WiiU);
    document.game_settings.exist_3d_world_save_data = false;
    migrate_to_latest(&mut document);

    assert!(!document.game_settings().unlock_odyssey_levels);
    for course_id in 93..97 {
        assert_eq!(
            document.course(course_id).expect("course").flags,
            CourseProgress::FLAG_LOCK
        );
    }
}

#[test]
fn special_season_gets_reinitialized_and_dlc_locked() {
    let mut document = SaveDocument::with_version(FormatVersion::Switch);
    document.seasons[4].bonus_course_counter = 6;
    document.seasons[4].last_play_course_id = 12;
    document.game_settings.need_init_aoc_lock = false;
    document.courses[130].flags = CourseProgress::FLAG_CLEAR;

    let report = migrate_to_latest(&mut document);
    assert_eq!(report.entries.len(), 2);
    assert!(report.entries[0].changed);

    let special = document.season(4).expect("season 5");
    assert_eq!(special.bonus_course_counter, 4);
    assert_eq!(special.last_play_course_id, 0);
    for course_id in DLC_COURSE_SLOTS {
        assert!(document.course(course_id).expect("course").is_locked());
    }
    assert!(!document.game_settings().need_init_aoc_lock);
}

#[test]
fn three_ds_switches_to_compact_game_settings() {
    let mut document = SaveDocument::with_version(FormatVersion::ThreeDS);
    assert!(document.game_settings().legacy_layout);
    let report = migrate_to_latest(&mut document);
    assert_eq!(report.entries[0].step_id, "3ds_compact_game_settings");
    assert!(report.entries[0].changed);
    assert_eq!(document.game_settings().block_size(), GameSettings::SIZE);
}

#[test]
fn latest_document_is_left_alone() {
    let mut document = SaveDocument::new();
    document.courses[120].flags = CourseProgress::FLAG_CLEAR;
    let report = migrate_to_latest(&mut document);
    assert!(report.entries.is_empty());
    assert!(!report.changed());
    assert_eq!(document.course(120).expect("course").flags, CourseProgress::FLAG_CLEAR);
}

#[test]
fn migration_is_idempotent() {
    let mut once = wiiu_with_crossover_data();
    migrate_to_latest(&mut once);
    let mut twice = once.clone();
    let report = migrate_to_latest(&mut twice);

    assert!(report.entries.is_empty());
    assert_eq!(twice.version(), once.version());
    assert_eq!(twice.game_settings(), once.game_settings());
    assert_eq!(twice.seasons(), once.seasons());
    assert_eq!(twice.courses(), once.courses());
}
