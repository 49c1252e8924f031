use serde::{Deserialize, Serialize};

use super::{read_sized, write_sized, SaveBlock};
use crate::bits;
use crate::cursor::BinaryCursor;
use crate::error::CoreResult;

/// Global progression, control settings and timers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSettings {
    pub flags: u32,
    pub control_setting: u8,
    pub miiverse_setting: bool,
    pub reserved: u16,
    /// Seconds since the Unix epoch.
    pub last_play_time: i64,
    pub player_life: i32,
    /// 1-based.
    pub current_season_id: i32,
    pub exist_3d_world_save_data: bool,
    pub unlock_odyssey_levels: bool,
    pub maneck_final_floor_count: i32,
    pub last_uptime_frames: i64,
    pub mole_maze_final_floor_count: i32,
    pub need_init_aoc_lock: bool,
    /// Whether the block is written with the Wii U/3DS length.
    pub legacy_layout: bool,
}

impl GameSettings {
    /// Block length of Switch-family saves.
    pub const SIZE: u32 = 520;
    /// Block length of Wii U and 3DS saves.
    pub const LEGACY_SIZE: u32 = 544;

    pub const FLAG_OPEN_SEASON_2: u32 = 1 << 0;
    pub const FLAG_OPEN_SEASON_3: u32 = 1 << 1;
    pub const FLAG_OPEN_SEASON_SP: u32 = 1 << 2;
    pub const FLAG_OPEN_SEASON_SP_BONUS: u32 = 1 << 3;
    pub const FLAG_SHOW_INFO_MANUAL: u32 = 1 << 4;
    pub const FLAG_SHOW_PLAY_OTHER_COURSE: u32 = 1 << 5;
    pub const FLAG_SHOW_TOUCH_COURSE_PAGE: u32 = 1 << 6;
    pub const FLAG_SHOW_ENDING: u32 = 1 << 7;
    pub const FLAG_SHOW_TUTORIAL_1: u32 = 1 << 8;
    pub const FLAG_SHOW_TUTORIAL_2: u32 = 1 << 9;
    pub const FLAG_SHOW_LIGHT_ON_OFF: u32 = 1 << 10;
    pub const FLAG_SHOW_ZOOM: u32 = 1 << 11;
    pub const FLAG_SHOW_RETURN_TITLE: u32 = 1 << 12;
    pub const FLAG_OPEN_MANECK_FOREVER: u32 = 1 << 13;
    pub const FLAG_SHOW_3D_WORLD_SAVE_DATA: u32 = 1 << 14;
    pub const FLAG_SHOW_HIDE_AND_SEEK_TUTORIAL: u32 = 1 << 15;
    pub const FLAG_OPEN_HIDE_AND_SEEK: u32 = 1 << 16;
    pub const FLAG_OPEN_PIXEL_TOAD: u32 = 1 << 17;
    pub const FLAG_SHOW_TOUCH_CONTROLS: u32 = 1 << 18;
    pub const FLAG_SHOW_GYRO_CONTROLS: u32 = 1 << 19;
    pub const FLAG_PAGE_TURN_AFTER_SEASON_1_PROLOGUE: u32 = 1 << 20;
    pub const FLAG_OPEN_SEASON_SP_2: u32 = 1 << 21;
    pub const FLAG_SHOW_2P_WELCOME: u32 = 1 << 22;
    pub const FLAG_SHOW_AOC_WELCOME_1: u32 = 1 << 23;
    pub const FLAG_SHOW_AOC_WELCOME_2: u32 = 1 << 24;
    pub const FLAG_SHOW_GHOST_TUTORIAL: u32 = 1 << 25;
    pub const FLAG_SHOW_TOUCH_REMINDER: u32 = 1 << 26;
    pub const FLAG_SHOW_SPECIAL_2_CREDITS: u32 = 1 << 27;
    pub const FLAG_SHOW_VR_WELCOME: u32 = 1 << 28;

    pub const CONTROL_CAMERA_REVERSE_VERTICAL: u8 = 1 << 0;
    pub const CONTROL_CAMERA_REVERSE_HORIZONTAL: u8 = 1 << 1;
    pub const CONTROL_CAMERA_GYRO: u8 = 1 << 2;
    pub const CONTROL_TRUCK_CAMERA_GYRO: u8 = 1 << 3;
    pub const CONTROL_TRUCK_CAMERA_REVERSE_VERTICAL: u8 = 1 << 4;

    pub fn new(legacy_layout: bool) -> Self {
        let mut settings = Self {
            flags: 0,
            control_setting: 0,
            miiverse_setting: false,
            reserved: 0,
            last_play_time: 0,
            player_life: 0,
            current_season_id: 0,
            exist_3d_world_save_data: false,
            unlock_odyssey_levels: false,
            maneck_final_floor_count: 0,
            last_uptime_frames: 0,
            mole_maze_final_floor_count: 0,
            need_init_aoc_lock: false,
            legacy_layout,
        };
        settings.init();
        settings
    }

    pub fn block_size(&self) -> u32 {
        if self.legacy_layout {
            Self::LEGACY_SIZE
        } else {
            Self::SIZE
        }
    }

    pub fn has_flag(&self, mask: u32) -> bool {
        bits::test_mask(self.flags, mask)
    }

    pub fn set_flag(&mut self, mask: u32, state: bool) {
        self.flags = bits::update_mask(self.flags, mask, state);
    }

    pub fn has_control(&self, mask: u8) -> bool {
        bits::test_mask(u32::from(self.control_setting), u32::from(mask))
    }

    pub fn set_control(&mut self, mask: u8, state: bool) {
        self.control_setting =
            bits::update_mask(u32::from(self.control_setting), u32::from(mask), state) as u8;
    }
}

impl Default for GameSettings {
    fn default() -> Self {
        Self::new(false)
    }
}

impl SaveBlock for GameSettings {
    /// Keeps the current layout.
    fn init(&mut self) {
        self.flags = 0;
        self.control_setting = 0;
        self.miiverse_setting = true;
        self.reserved = 0;
        self.last_play_time = 0;
        self.player_life = 2;
        self.current_season_id = 1;
        self.exist_3d_world_save_data = false;
        self.unlock_odyssey_levels = false;
        self.maneck_final_floor_count = 0;
        self.last_uptime_frames = 0;
        self.mole_maze_final_floor_count = 0;
        self.need_init_aoc_lock = true;
    }

    fn read<B: AsRef<[u8]>>(&mut self, cursor: &mut BinaryCursor<B>) -> CoreResult<()> {
        let declared = read_sized(cursor, |cursor| {
            self.flags = cursor.get_u32()?;
            self.control_setting = cursor.get_u8()?;
            self.miiverse_setting = cursor.get_bool()?;
            self.reserved = cursor.get_u16()?;
            self.last_play_time = cursor.get_i64()?;
            self.player_life = cursor.get_i32()?;
            self.current_season_id = cursor.get_i32()?;
            self.exist_3d_world_save_data = cursor.get_bool()?;
            self.unlock_odyssey_levels = cursor.get_bool()?;
            cursor.skip(2)?;
            self.maneck_final_floor_count = cursor.get_i32()?;
            self.last_uptime_frames = cursor.get_i64()?;
            self.mole_maze_final_floor_count = cursor.get_i32()?;
            self.need_init_aoc_lock = cursor.get_bool()?;
            Ok(())
        })?;
        self.legacy_layout = declared == Self::LEGACY_SIZE;
        Ok(())
    }

    fn write<B: AsRef<[u8]> + AsMut<[u8]>>(
        &self,
        cursor: &mut BinaryCursor<B>,
    ) -> CoreResult<()> {
        write_sized(cursor, self.block_size(), |cursor| {
            cursor.put_u32(self.flags)?;
            cursor.put_u8(self.control_setting)?;
            cursor.put_bool(self.miiverse_setting)?;
            cursor.put_u16(self.reserved)?;
            cursor.put_i64(self.last_play_time)?;
            cursor.put_i32(self.player_life)?;
            cursor.put_i32(self.current_season_id)?;
            cursor.put_bool(self.exist_3d_world_save_data)?;
            cursor.put_bool(self.unlock_odyssey_levels)?;
            cursor.put_u16(0)?;
            cursor.put_i32(self.maneck_final_floor_count)?;
            cursor.put_i64(self.last_uptime_frames)?;
            cursor.put_i32(self.mole_maze_final_floor_count)?;
            cursor.put_bool(self.need_init_aoc_lock)
        })
    }
}
