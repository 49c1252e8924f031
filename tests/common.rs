#![allow(dead_code)]

use kinopio_save::{
    encode_catalog, CatalogRecord, StageCatalog, StageFeatures, StageIcon, StageType,
    VersionThreshold,
};

pub fn record(
    name: &str,
    depth: u8,
    stage_type: StageType,
    data_id: i16,
    page_id: i16,
    threshold: VersionThreshold,
) -> CatalogRecord {
    CatalogRecord {
        stage_name: name.to_string(),
        data_id,
        page_id,
        stage_type,
        depth,
        icon: StageIcon::Default,
        collect_item_num: 0,
        challenge_time: 0,
        version_threshold: threshold,
        features: StageFeatures::default(),
    }
}

/// Two seasons with a Wii U only crossover page and a VR only bonus page.
pub fn sample_records() -> Vec<CatalogRecord> {
    use StageType::*;
    use VersionThreshold::*;
    vec![
        record("Season1", 1, Season, 1, -1, All),
        record("S1Prologue", 2, Prologue, -1, -1, All),
        record("S1Chapter1", 2, NotAStage, -1, -1, All),
        record("PlumpRollerTrap", 3, Normal, 0, 0, All),
        record("TouchyTouchyHotel", 3, Normal, 1, 1, All),
        record("S1Bonus", 3, Bonus, 2, 2, All),
        record("MummyMeMaze", 3, Labyrinth, 3, 3, All),
        record("S1Crossover", 2, NotAStage, -1, -1, WiiUOnly),
        record("WiiUCrossover", 3, Special3DWorld, 93, 4, WiiUOnly),
        record("Season2", 1, Season, 2, -1, All),
        record("DraggadonsNest", 2, Normal, 4, 0, All),
        record("VRBonus", 2, Normal, 200, 1, SwitchVROnly),
        record("S2Extras", 2, SpecialOther, 5, 100, All),
    ]
}

pub fn sample_catalog() -> StageCatalog {
    let raw = encode_catalog(&sample_records()).expect("encode sample catalog");
    StageCatalog::from_bytes(&raw).expect("parse sample catalog")
}
