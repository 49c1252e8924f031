use super::*;

fn encoded(document: &mut SaveDocument) -> Vec<u8> {
    document.encode().expect("encode").to_vec()
}

fn word(raw: &[u8], offset: usize, order: ByteOrder) -> u32 {
    BinaryCursor::new(raw, order)
        .peek_u32_at(offset, order)
        .expect("header word")
}

#[test]
fn fresh_document_has_latest_slot_counts() {
    let mut document = SaveDocument::new();
    let raw = encoded(&mut document);
    assert_eq!(raw.len(), TOTAL_FILE_SIZE);

    let reread = SaveDocument::from_bytes(&raw).expect("read back");
    assert_eq!(reread.version(), FormatVersion::SwitchVR);
    assert_eq!(reread.season_count(), 6);
    assert_eq!(reread.course_count(), 213);
    assert_eq!(reread.seasons().len(), 6);
    assert_eq!(reread.courses().len(), 213);
}

#[test]
fn header_words_follow_version() {
    let mut document = SaveDocument::with_version(FormatVersion::SwitchDLC);
    let raw = encoded(&mut document);
    let le = ByteOrder::LittleEndian;
    assert_eq!(word(&raw, REVISION_OFFSET, le), 1);
    assert_eq!(word(&raw, 0x08, le), TOTAL_FILE_SIZE as u32);
    assert_eq!(word(&raw, IDENTIFIER_OFFSET, le), GAME_IDENTIFIER);
    assert_eq!(word(&raw, 0x10, le), document.logical_size());
    assert_eq!(word(&raw, 0x14, le), 0);
    assert_eq!(word(&raw, 0x18, le), 0);
    assert_eq!(word(&raw, GAME_SETTINGS_OFFSET, le), GameSettings::SIZE);
    // 16 + 524 + 5 * 64 + 4 + 209 * 40
    assert_eq!(document.logical_size(), 9224);
}

#[test]
fn wiiu_saves_are_big_endian() {
    let mut document = SaveDocument::with_version(FormatVersion::WiiU);
    let raw = encoded(&mut document);
    assert_eq!(&raw[IDENTIFIER_OFFSET..IDENTIFIER_OFFSET + 4], &[0, 0, 0, 7]);
    assert_eq!(
        word(&raw, GAME_SETTINGS_OFFSET, ByteOrder::BigEndian),
        GameSettings::LEGACY_SIZE
    );
    assert_eq!(detect_version(&raw).expect("detect"), FormatVersion::WiiU);
}

#[test]
fn detects_every_release() {
    for version in FormatVersion::ALL {
        let mut document = SaveDocument::with_version(version);
        let raw = encoded(&mut document);
        assert_eq!(detect_version(&raw).expect("detect"), version);
    }
}

#[test]
fn checksum_covers_everything_after_first_word() {
    let mut document = SaveDocument::new();
    document.game_settings_mut().player_life = 5;
    let raw = encoded(&mut document);

    let stored = word(&raw, 0, ByteOrder::LittleEndian);
    assert_eq!(stored, crc32fast::hash(&raw[4..]));
    assert_eq!(stored, compute_checksum(&raw));
    assert_eq!(document.stored_checksum(), stored);

    let reread = SaveDocument::from_bytes(&raw).expect("read back");
    assert_eq!(compute_checksum(reread.buffer()), reread.stored_checksum());
}

#[test]
fn stored_checksum_survives_migration_of_wiiu_image() {
    let mut wiiu = SaveDocument::with_version(FormatVersion::WiiU);
    let raw = encoded(&mut wiiu);
    let stored = word(&raw, 0, ByteOrder::BigEndian);

    let mut document = SaveDocument::from_bytes(&raw).expect("read wiiu");
    assert_eq!(document.stored_checksum(), stored);
    document.migrate_to_latest();
    assert_eq!(document.byte_order(), ByteOrder::LittleEndian);
    assert_eq!(document.stored_checksum(), stored);
    assert_eq!(document.stored_checksum(), compute_checksum(document.buffer()));

    let fresh = encoded(&mut document);
    assert_eq!(document.stored_checksum(), word(&fresh, 0, ByteOrder::LittleEndian));
}

#[test]
fn wrong_checksum_is_not_rejected() {
    let mut document = SaveDocument::new();
    let mut raw = encoded(&mut document);
    raw[0] ^= 0xFF;
    assert!(SaveDocument::from_bytes(&raw).is_ok());
}

#[test]
fn edited_fields_round_trip() {
    let mut document = SaveDocument::with_version(FormatVersion::ThreeDS);
    {
        let settings = document.game_settings_mut();
        settings.set_flag(GameSettings::FLAG_SHOW_ENDING, true);
        settings.last_play_time = 1_700_000_000;
        settings.current_season_id = 3;
    }
    let season = document.season_mut(2).expect("season 3");
    season.bonus_course_page_id = 14;
    season.opening_ended = false;
    let course = document.course_mut(182).expect("last 3DS course");
    course.set_flag(CourseProgress::FLAG_CLEAR, true);
    course.best_time = 3600;
    course.set_collect_item(1, true);

    let raw = encoded(&mut document);
    let reread = SaveDocument::from_bytes(&raw).expect("read back");
    assert_eq!(reread.version(), FormatVersion::ThreeDS);
    assert_eq!(reread.game_settings(), document.game_settings());
    assert_eq!(reread.seasons(), document.seasons());
    assert_eq!(reread.courses(), document.courses());
}

#[test]
fn slots_outside_version_are_not_exposed() {
    let mut document = SaveDocument::with_version(FormatVersion::Switch);
    assert!(document.season(5).is_none());
    assert!(document.season_mut(5).is_none());
    assert!(document.course(183).is_none());
    assert!(document.course_mut(182).is_some());
}

#[test]
fn wrong_size_fails_without_touching_document() {
    let mut document = SaveDocument::new();
    document.game_settings_mut().player_life = 9;
    let before = document.game_settings().clone();

    for len in [0, TOTAL_FILE_SIZE - 1, TOTAL_FILE_SIZE + 1] {
        let err = document.load_bytes(&vec![0u8; len]).unwrap_err();
        assert!(matches!(err, CoreError::InvalidFileSize { found } if found == len));
    }
    assert_eq!(document.game_settings(), &before);
}

#[test]
fn unknown_identifier_is_rejected() {
    let mut raw = vec![0u8; TOTAL_FILE_SIZE];
    raw[IDENTIFIER_OFFSET] = 8;
    let err = SaveDocument::from_bytes(&raw).unwrap_err();
    assert!(matches!(err, CoreError::UnrecognizedIdentifier(8)));
}

#[test]
fn unknown_revision_is_rejected() {
    let mut document = SaveDocument::new();
    let mut raw = encoded(&mut document);
    raw[REVISION_OFFSET] = 3;
    let err = SaveDocument::from_bytes(&raw).unwrap_err();
    assert!(matches!(err, CoreError::UnsupportedRevision(3)));

    raw[REVISION_OFFSET..REVISION_OFFSET + 4].copy_from_slice(&(-1i32).to_le_bytes());
    let err = SaveDocument::from_bytes(&raw).unwrap_err();
    assert!(matches!(err, CoreError::UnsupportedRevision(-1)));
}

#[test]
fn oversized_course_count_is_rejected() {
    let mut document = SaveDocument::new();
    let mut raw = encoded(&mut document);
    let count_offset = GAME_SETTINGS_OFFSET + 4 + 520 + 6 * 64;
    assert_eq!(word(&raw, count_offset, ByteOrder::LittleEndian), 213);
    raw[count_offset..count_offset + 4].copy_from_slice(&214u32.to_le_bytes());

    let err = SaveDocument::from_bytes(&raw).unwrap_err();
    assert!(matches!(
        err,
        CoreError::CourseCountOverflow {
            found: 214,
            capacity: 213
        }
    ));
}

#[test]
fn pending_dlc_lock_is_applied_once() {
    let mut document = SaveDocument::new();
    document.course_mut(120).expect("dlc course").flags = CourseProgress::FLAG_CLEAR;
    assert!(document.game_settings().need_init_aoc_lock);

    assert!(document.apply_pending_dlc_lock());
    assert!(!document.game_settings().need_init_aoc_lock);
    for course_id in 119..149 {
        assert_eq!(
            document.course(course_id).expect("course").flags,
            CourseProgress::FLAG_LOCK
        );
    }
    assert_eq!(document.course(118).expect("course").flags, 0);
    assert_eq!(document.course(149).expect("course").flags, 0);

    document.course_mut(120).expect("dlc course").flags = CourseProgress::FLAG_OPEN;
    assert!(!document.apply_pending_dlc_lock());
    assert_eq!(
        document.course(120).expect("course").flags,
        CourseProgress::FLAG_OPEN
    );
}

#[test]
fn reading_keeps_pending_dlc_lock_untouched() {
    let mut document = SaveDocument::new();
    let raw = encoded(&mut document);
    let reread = SaveDocument::from_bytes(&raw).expect("read back");
    assert!(reread.game_settings().need_init_aoc_lock);
    assert!(!reread.course(119).expect("course").is_locked());
}

#[test]
fn reset_returns_to_fresh_latest_document() {
    let mut document = SaveDocument::with_version(FormatVersion::WiiU);
    document.game_settings_mut().flags = u32::MAX;
    document.reset();
    assert_eq!(document.version(), FormatVersion::SwitchVR);
    assert_eq!(document.game_settings(), &GameSettings::default());
    assert!(!document.game_settings().legacy_layout);
}

#[test]
fn summary_serializes_valid_slots() {
    let document = SaveDocument::with_version(FormatVersion::Switch);
    let json = serde_json::to_value(document.summary()).expect("json");
    assert_eq!(json["version"], "switch");
    assert_eq!(json["seasons"].as_array().map(Vec::len), Some(5));
    assert_eq!(json["courses"].as_array().map(Vec::len), Some(183));
    assert_eq!(json["game_settings"]["player_life"], 2);
}
