use serde::{Deserialize, Serialize};

use super::{write_padded, SaveBlock};
use crate::bits;
use crate::cursor::BinaryCursor;
use crate::error::CoreResult;

/// Per-level record: state flags, best results and collectibles.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseProgress {
    /// 0-based slot index, never stored.
    pub course_id: usize,
    pub flags: u32,
    pub best_coin: i32,
    /// Frames, or -1 when unset.
    pub best_time: i32,
    pub miss_count: i32,
    pub last_play_time: i64,
    pub collect_item_flags: u32,
}

impl CourseProgress {
    /// Fixed record size, including trailing padding.
    pub const SIZE: usize = 40;

    pub const FLAG_OPEN: u32 = 1 << 0;
    pub const FLAG_CLEAR: u32 = 1 << 1;
    pub const FLAG_LOCK: u32 = 1 << 2;
    pub const FLAG_NEW: u32 = 1 << 3;
    pub const FLAG_ASSIST_CLEAR: u32 = 1 << 4;
    pub const FLAG_BADGE_CONDITION_0: u32 = 1 << 5;
    pub const FLAG_BADGE_CONDITION_1: u32 = 1 << 6;
    pub const FLAG_BADGE_CONDITION_2: u32 = 1 << 7;
    pub const FLAG_CLEAR_HIDE_AND_SEEK: u32 = 1 << 8;
    pub const FLAG_ACQUIRE_COMPLETE: u32 = 1 << 16;

    pub fn new(course_id: usize) -> Self {
        Self {
            course_id,
            flags: 0,
            best_coin: 0,
            best_time: -1,
            miss_count: 0,
            last_play_time: 0,
            collect_item_flags: 0,
        }
    }

    pub fn has_flag(&self, mask: u32) -> bool {
        bits::test_mask(self.flags, mask)
    }

    pub fn set_flag(&mut self, mask: u32, state: bool) {
        self.flags = bits::update_mask(self.flags, mask, state);
    }

    pub fn is_locked(&self) -> bool {
        self.has_flag(Self::FLAG_LOCK)
    }

    /// Bits past 31 are never collected.
    pub fn has_collect_item(&self, index: u32) -> bool {
        index < u32::BITS && bits::test(self.collect_item_flags, index)
    }

    pub fn set_collect_item(&mut self, index: u32, state: bool) {
        if index < u32::BITS {
            self.collect_item_flags = bits::update(self.collect_item_flags, index, state);
        }
    }

    pub fn collected_items(&self) -> u32 {
        self.collect_item_flags.count_ones()
    }
}

impl SaveBlock for CourseProgress {
    fn init(&mut self) {
        *self = Self::new(self.course_id);
    }

    fn read<B: AsRef<[u8]>>(&mut self, cursor: &mut BinaryCursor<B>) -> CoreResult<()> {
        let end = cursor.position() + Self::SIZE;
        self.flags = cursor.get_u32()?;
        self.best_coin = cursor.get_i32()?;
        self.best_time = cursor.get_i32()?;
        self.miss_count = cursor.get_i32()?;
        self.last_play_time = cursor.get_i64()?;
        self.collect_item_flags = cursor.get_u32()?;
        cursor.seek(end)
    }

    fn write<B: AsRef<[u8]> + AsMut<[u8]>>(
        &self,
        cursor: &mut BinaryCursor<B>,
    ) -> CoreResult<()> {
        write_padded(cursor, Self::SIZE, |cursor| {
            cursor.put_u32(self.flags)?;
            cursor.put_i32(self.best_coin)?;
            cursor.put_i32(self.best_time)?;
            cursor.put_i32(self.miss_count)?;
            cursor.put_i64(self.last_play_time)?;
            cursor.put_u32(self.collect_item_flags)
        })
    }
}
