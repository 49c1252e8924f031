use serde::{Deserialize, Serialize};

use super::{read_sized, write_sized, SaveBlock};
use crate::cursor::BinaryCursor;
use crate::error::CoreResult;

/// Per-season bonus-course and resume state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonProgress {
    /// 1-based, implied by the slot and never stored.
    pub season_id: u32,
    pub bonus_course_counter: i32,
    pub bonus_course_page_id: i32,
    pub bonus_course_type_counter: i32,
    pub last_play_course_id: i32,
    pub opening_ended: bool,
    pub dlc_bonus_course_type_counter: i32,
}

impl SeasonProgress {
    pub const SIZE: u32 = 60;

    pub fn new(season_id: u32) -> Self {
        let mut season = Self {
            season_id,
            bonus_course_counter: 0,
            bonus_course_page_id: 0,
            bonus_course_type_counter: 0,
            last_play_course_id: 0,
            opening_ended: true,
            dlc_bonus_course_type_counter: 0,
        };
        season.init();
        season
    }

    /// Seasons 1..=4 rotate through six bonus stages, the special season only four.
    pub fn max_bonus_course_counter(&self) -> i32 {
        if self.season_id == 5 {
            4
        } else {
            6
        }
    }

    /// Seasons 4 and 6 carry no bonus level state.
    pub fn has_bonus_data(&self) -> bool {
        !matches!(self.season_id, 4 | 6)
    }

    pub fn uses_dlc_bonus_type_counter(&self) -> bool {
        self.season_id == 5
    }
}

impl SaveBlock for SeasonProgress {
    fn init(&mut self) {
        self.bonus_course_counter = self.max_bonus_course_counter();
        self.bonus_course_page_id = 0;
        self.bonus_course_type_counter = 0;
        self.last_play_course_id = 0;
        self.opening_ended = true;
        self.dlc_bonus_course_type_counter = 0;
    }

    fn read<B: AsRef<[u8]>>(&mut self, cursor: &mut BinaryCursor<B>) -> CoreResult<()> {
        read_sized(cursor, |cursor| {
            self.bonus_course_counter = cursor.get_i32()?;
            self.bonus_course_page_id = cursor.get_i32()?;
            self.bonus_course_type_counter = cursor.get_i32()?;
            self.last_play_course_id = cursor.get_i32()?;
            self.opening_ended = cursor.get_bool()?;
            cursor.skip(3)?;
            self.dlc_bonus_course_type_counter = cursor.get_i32()?;
            Ok(())
        })?;
        Ok(())
    }

    fn write<B: AsRef<[u8]> + AsMut<[u8]>>(
        &self,
        cursor: &mut BinaryCursor<B>,
    ) -> CoreResult<()> {
        write_sized(cursor, Self::SIZE, |cursor| {
            cursor.put_i32(self.bonus_course_counter)?;
            cursor.put_i32(self.bonus_course_page_id)?;
            cursor.put_i32(self.bonus_course_type_counter)?;
            cursor.put_i32(self.last_play_course_id)?;
            cursor.put_bool(self.opening_ended)?;
            cursor.fill_zero(3)?;
            cursor.put_i32(self.dlc_bonus_course_type_counter)
        })
    }
}
