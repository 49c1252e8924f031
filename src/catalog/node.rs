use serde::{Deserialize, Serialize};

use crate::version::FormatVersion;

/// Stable index of a node inside its [`StageCatalog`](super::StageCatalog).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i8)]
pub enum StageType {
    /// Category nodes that carry no stage information.
    NotAStage = -1,
    Season = 0,
    Prologue = 1,
    Illustration = 2,
    IllustrationDemo = 3,
    MiniGame = 4,
    TrickArt = 5,
    Normal = 6,
    Bonus = 7,
    Special3DWorld = 8,
    SpecialCherry = 9,
    SpecialManek = 10,
    SpecialPrologue = 11,
    SpecialBonus = 12,
    SpecialOther = 13,
    Labyrinth = 14,
}

impl StageType {
    const NAMED: [StageType; 15] = [
        StageType::Season,
        StageType::Prologue,
        StageType::Illustration,
        StageType::IllustrationDemo,
        StageType::MiniGame,
        StageType::TrickArt,
        StageType::Normal,
        StageType::Bonus,
        StageType::Special3DWorld,
        StageType::SpecialCherry,
        StageType::SpecialManek,
        StageType::SpecialPrologue,
        StageType::SpecialBonus,
        StageType::SpecialOther,
        StageType::Labyrinth,
    ];

    pub fn from_code(code: i8) -> Option<StageType> {
        match code {
            -1 => Some(StageType::NotAStage),
            0..=14 => Some(Self::NAMED[code as usize]),
            _ => None,
        }
    }

    pub fn code(self) -> i8 {
        self as i8
    }

    /// Name used by the catalog source table; `NotAStage` has none.
    pub fn name(self) -> Option<&'static str> {
        Some(match self {
            StageType::NotAStage => return None,
            StageType::Season => "Season",
            StageType::Prologue => "Prologue",
            StageType::Illustration => "Illustration",
            StageType::IllustrationDemo => "IllustrationDemo",
            StageType::MiniGame => "MiniGame",
            StageType::TrickArt => "TrickArt",
            StageType::Normal => "Normal",
            StageType::Bonus => "Bonus",
            StageType::Special3DWorld => "Special3DWorld",
            StageType::SpecialCherry => "SpecialCherry",
            StageType::SpecialManek => "SpecialManek",
            StageType::SpecialPrologue => "SpecialPrologue",
            StageType::SpecialBonus => "SpecialBonus",
            StageType::SpecialOther => "SpecialOther",
            StageType::Labyrinth => "Labyrinth",
        })
    }

    /// Unknown names denote category nodes.
    pub fn from_name(name: &str) -> StageType {
        Self::NAMED
            .into_iter()
            .find(|ty| ty.name() == Some(name))
            .unwrap_or(StageType::NotAStage)
    }

    /// Prologue cutscenes and the mini-game/trick-art placeholders are never shown.
    pub fn is_hidden(self) -> bool {
        matches!(
            self,
            StageType::Prologue | StageType::MiniGame | StageType::TrickArt
        )
    }
}

/// Which releases include a node; stored as a nibble code 0..=5.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum VersionThreshold {
    #[default]
    All,
    WiiUOnly,
    SwitchOrLater,
    SwitchDLCOrLater,
    SwitchDLCOnly,
    SwitchVROnly,
}

impl VersionThreshold {
    pub fn from_code(code: u8) -> Option<VersionThreshold> {
        Some(match code {
            0 => VersionThreshold::All,
            1 => VersionThreshold::WiiUOnly,
            2 => VersionThreshold::SwitchOrLater,
            3 => VersionThreshold::SwitchDLCOrLater,
            4 => VersionThreshold::SwitchDLCOnly,
            5 => VersionThreshold::SwitchVROnly,
            _ => return None,
        })
    }

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn includes(self, version: FormatVersion) -> bool {
        match self {
            VersionThreshold::All => true,
            VersionThreshold::WiiUOnly => version == FormatVersion::WiiU,
            VersionThreshold::SwitchOrLater => version >= FormatVersion::Switch,
            VersionThreshold::SwitchDLCOrLater => version >= FormatVersion::SwitchDLC,
            VersionThreshold::SwitchDLCOnly => version == FormatVersion::SwitchDLC,
            VersionThreshold::SwitchVROnly => version == FormatVersion::SwitchVR,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum StageIcon {
    #[default]
    Default,
    Season,
    Chapter,
    Star,
    Shine,
    Crown,
    ToadBrigade,
    GhostPlayer,
    GhostPlayerMaze,
    Bonus,
}

impl StageIcon {
    const ALL: [(StageIcon, &'static str); 10] = [
        (StageIcon::Default, "Default"),
        (StageIcon::Season, "Season"),
        (StageIcon::Chapter, "Chapter"),
        (StageIcon::Star, "Star"),
        (StageIcon::Shine, "Shine"),
        (StageIcon::Crown, "Crown"),
        (StageIcon::ToadBrigade, "ToadBrigade"),
        (StageIcon::GhostPlayer, "GhostPlayer"),
        (StageIcon::GhostPlayerMaze, "GhostPlayerMaze"),
        (StageIcon::Bonus, "Bonus"),
    ];

    pub fn from_id(id: u8) -> Option<StageIcon> {
        Self::ALL.get(id as usize).map(|(icon, _)| *icon)
    }

    pub fn from_name(name: &str) -> Option<StageIcon> {
        Self::ALL
            .iter()
            .find(|(_, known)| *known == name)
            .map(|(icon, _)| *icon)
    }

    pub fn id(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        Self::ALL[self as usize].1
    }
}

/// Six-bit feature set of a catalog node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct StageFeatures(u8);

impl StageFeatures {
    pub const DOT_COLLECTIBLE: u8 = 0b000001;
    pub const DLC_COLLECTIBLE_VARIANT: u8 = 0b000010;
    pub const BADGE_CONDITION: u8 = 0b000100;
    pub const CHALLENGE_TIME: u8 = 0b001000;
    pub const VR_USES_ORIGINAL_PREVIEW: u8 = 0b010000;
    pub const PREVIEW_IMAGE: u8 = 0b100000;
    pub const MASK: u8 = 0b111111;

    pub fn from_bits(bits: u8) -> Self {
        Self(bits & Self::MASK)
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn contains(self, flag: u8) -> bool {
        self.0 & flag == flag
    }

    pub fn with(self, flag: u8, state: bool) -> Self {
        if state {
            Self::from_bits(self.0 | flag)
        } else {
            Self(self.0 & !flag)
        }
    }
}

/// Immutable catalog entry.
///
/// `data_id` is a course id for stages and a 1-based season id for season
/// nodes; [`course_id`](Self::course_id) and [`season_id`](Self::season_id)
/// are the two mutually exclusive views of it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StageNode {
    pub(crate) id: NodeId,
    pub(crate) parent: Option<NodeId>,
    pub(crate) name: String,
    pub(crate) data_id: i16,
    pub(crate) page_id: i16,
    pub(crate) stage_type: StageType,
    pub(crate) depth: u8,
    pub(crate) icon_id: u8,
    pub(crate) version_threshold: VersionThreshold,
    pub(crate) collect_item_num: u8,
    pub(crate) features: StageFeatures,
    pub(crate) challenge_time: u16,
}

impl StageNode {
    pub(crate) fn root() -> Self {
        Self {
            id: NodeId(0),
            parent: None,
            name: "Root".to_string(),
            data_id: -1,
            page_id: -1,
            stage_type: StageType::NotAStage,
            depth: 0,
            icon_id: 0,
            version_threshold: VersionThreshold::All,
            collect_item_num: 0,
            features: StageFeatures::default(),
            challenge_time: 0,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Key under which the UI looks up the display name.
    pub fn localization_key(&self) -> String {
        format!("stage.name.{}", self.name)
    }

    pub fn course_id(&self) -> Option<usize> {
        if self.is_season() || self.data_id < 0 {
            return None;
        }
        Some(self.data_id as usize)
    }

    pub fn season_id(&self) -> Option<u32> {
        if !self.is_season() || self.data_id < 0 {
            return None;
        }
        Some(self.data_id as u32)
    }

    pub fn page_id(&self) -> i16 {
        self.page_id
    }

    pub fn stage_type(&self) -> StageType {
        self.stage_type
    }

    pub fn depth(&self) -> u8 {
        self.depth
    }

    pub fn icon_id(&self) -> u8 {
        self.icon_id
    }

    pub fn icon(&self) -> Option<StageIcon> {
        StageIcon::from_id(self.icon_id)
    }

    pub fn version_threshold(&self) -> VersionThreshold {
        self.version_threshold
    }

    pub fn collect_item_num(&self) -> u8 {
        self.collect_item_num
    }

    pub fn features(&self) -> StageFeatures {
        self.features
    }

    pub fn challenge_time(&self) -> u16 {
        self.challenge_time
    }

    /// Pure visibility predicate; ancestors are not consulted.
    pub fn is_visible(&self, version: FormatVersion) -> bool {
        self.version_threshold.includes(version) && !self.is_hidden()
    }

    pub fn is_supported_by(&self, version: FormatVersion) -> bool {
        self.version_threshold.includes(version)
    }

    pub fn is_hidden(&self) -> bool {
        self.stage_type.is_hidden()
    }

    pub fn is_season(&self) -> bool {
        self.stage_type == StageType::Season
    }

    pub fn is_illustration(&self) -> bool {
        matches!(
            self.stage_type,
            StageType::Illustration | StageType::IllustrationDemo
        )
    }

    /// Every playable type from `Normal` upward.
    pub fn is_normal_stage(&self) -> bool {
        self.stage_type.code() >= StageType::Normal.code()
    }

    pub fn is_prologue_stage(&self) -> bool {
        self.stage_type == StageType::Prologue
    }

    pub fn is_bonus_stage(&self) -> bool {
        self.stage_type == StageType::Bonus
    }

    pub fn is_mini_game_stage(&self) -> bool {
        self.stage_type == StageType::MiniGame
    }

    pub fn is_maneck_final_floor_count_stage(&self) -> bool {
        self.stage_type == StageType::SpecialOther
    }

    pub fn is_mole_maze_final_floor_count_stage(&self) -> bool {
        self.stage_type == StageType::Labyrinth
    }

    pub fn has_dot_collectible(&self) -> bool {
        self.features.contains(StageFeatures::DOT_COLLECTIBLE)
    }

    pub fn has_dlc_collectible_variant(&self) -> bool {
        self.features.contains(StageFeatures::DLC_COLLECTIBLE_VARIANT)
    }

    pub fn has_badge_condition(&self) -> bool {
        self.features.contains(StageFeatures::BADGE_CONDITION)
    }

    pub fn has_challenge_time(&self) -> bool {
        self.features.contains(StageFeatures::CHALLENGE_TIME)
    }

    pub fn vr_uses_original_preview(&self) -> bool {
        self.features.contains(StageFeatures::VR_USES_ORIGINAL_PREVIEW)
    }

    pub fn has_preview_image(&self) -> bool {
        self.features.contains(StageFeatures::PREVIEW_IMAGE)
    }

    /// Pages the player can pick in a season menu.
    pub fn is_selectable_page(&self) -> bool {
        (0..100).contains(&self.page_id)
    }

    /// Pages that may host a season's bonus level.
    pub fn is_valid_bonus_page(&self) -> bool {
        self.page_id >= 0 && self.is_normal_stage() && !self.is_bonus_stage()
    }
}
