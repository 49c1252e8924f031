//! Position-tracking reader/writer over a fixed byte buffer.
//!
//! The cursor never grows its buffer: every access outside `0..len` fails with
//! [`CoreError::OutOfBounds`] and leaves the position untouched.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ByteOrder {
    BigEndian,
    #[default]
    LittleEndian,
}

#[derive(Debug)]
pub struct BinaryCursor<B> {
    buf: B,
    pos: usize,
    order: ByteOrder,
}

macro_rules! getters {
    ($($name:ident => $ty:ty),* $(,)?) => {
        $(
            pub fn $name(&mut self) -> CoreResult<$ty> {
                let raw = self.take::<{ std::mem::size_of::<$ty>() }>()?;
                Ok(match self.order {
                    ByteOrder::BigEndian => <$ty>::from_be_bytes(raw),
                    ByteOrder::LittleEndian => <$ty>::from_le_bytes(raw),
                })
            }
        )*
    };
}

macro_rules! putters {
    ($($name:ident => $ty:ty),* $(,)?) => {
        $(
            pub fn $name(&mut self, value: $ty) -> CoreResult<()> {
                let raw = match self.order {
                    ByteOrder::BigEndian => value.to_be_bytes(),
                    ByteOrder::LittleEndian => value.to_le_bytes(),
                };
                self.put_bytes(&raw)
            }
        )*
    };
}

impl<B: AsRef<[u8]>> BinaryCursor<B> {
    pub fn new(buf: B, order: ByteOrder) -> Self {
        Self { buf, pos: 0, order }
    }

    pub fn into_inner(self) -> B {
        self.buf
    }

    pub fn as_slice(&self) -> &[u8] {
        self.buf.as_ref()
    }

    pub fn len(&self) -> usize {
        self.buf.as_ref().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.len().saturating_sub(self.pos)
    }

    pub fn order(&self) -> ByteOrder {
        self.order
    }

    pub fn set_order(&mut self, order: ByteOrder) {
        self.order = order;
    }

    /// Moves to an absolute position; `len()` itself is a valid target.
    pub fn seek(&mut self, position: usize) -> CoreResult<()> {
        if position > self.len() {
            return Err(self.out_of_bounds(position, 0));
        }
        self.pos = position;
        Ok(())
    }

    /// Moves relative to the current position.
    pub fn skip(&mut self, delta: isize) -> CoreResult<()> {
        let target = self
            .pos
            .checked_add_signed(delta)
            .ok_or_else(|| self.out_of_bounds(self.pos, delta.unsigned_abs()))?;
        self.seek(target)
    }

    getters! {
        get_u16 => u16,
        get_i16 => i16,
        get_u32 => u32,
        get_i32 => i32,
        get_u64 => u64,
        get_i64 => i64,
    }

    pub fn get_u8(&mut self) -> CoreResult<u8> {
        Ok(self.take::<1>()?[0])
    }

    pub fn get_i8(&mut self) -> CoreResult<i8> {
        Ok(self.get_u8()? as i8)
    }

    pub fn get_bool(&mut self) -> CoreResult<bool> {
        Ok(self.get_u8()? != 0)
    }

    pub fn get_bytes(&mut self, len: usize) -> CoreResult<&[u8]> {
        self.check(len)?;
        let start = self.pos;
        self.pos += len;
        Ok(&self.buf.as_ref()[start..start + len])
    }

    /// Reads a `u16` length followed by that many bytes of UTF-8 text.
    pub fn get_string(&mut self) -> CoreResult<String> {
        let start = self.pos;
        let len = self.get_u16()? as usize;
        match self.get_bytes(len) {
            Ok(bytes) => Ok(String::from_utf8_lossy(bytes).into_owned()),
            Err(err) => {
                self.pos = start;
                Err(err)
            }
        }
    }

    /// Reads a `u32` at an absolute offset with an explicit byte order,
    /// leaving position and configured order unchanged.
    pub fn peek_u32_at(&self, offset: usize, order: ByteOrder) -> CoreResult<u32> {
        let end = offset
            .checked_add(4)
            .filter(|end| *end <= self.len())
            .ok_or_else(|| self.out_of_bounds(offset, 4))?;
        let mut raw = [0u8; 4];
        raw.copy_from_slice(&self.buf.as_ref()[offset..end]);
        Ok(match order {
            ByteOrder::BigEndian => u32::from_be_bytes(raw),
            ByteOrder::LittleEndian => u32::from_le_bytes(raw),
        })
    }

    fn take<const N: usize>(&mut self) -> CoreResult<[u8; N]> {
        self.check(N)?;
        let mut raw = [0u8; N];
        raw.copy_from_slice(&self.buf.as_ref()[self.pos..self.pos + N]);
        self.pos += N;
        Ok(raw)
    }

    fn check(&self, len: usize) -> CoreResult<()> {
        if len > self.remaining() {
            return Err(self.out_of_bounds(self.pos, len));
        }
        Ok(())
    }

    #[cold]
    fn out_of_bounds(&self, position: usize, len: usize) -> CoreError {
        CoreError::OutOfBounds {
            position,
            len,
            size: self.len(),
        }
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> BinaryCursor<B> {
    putters! {
        put_u16 => u16,
        put_i16 => i16,
        put_u32 => u32,
        put_i32 => i32,
        put_u64 => u64,
        put_i64 => i64,
    }

    pub fn put_u8(&mut self, value: u8) -> CoreResult<()> {
        self.put_bytes(&[value])
    }

    pub fn put_i8(&mut self, value: i8) -> CoreResult<()> {
        self.put_u8(value as u8)
    }

    pub fn put_bool(&mut self, value: bool) -> CoreResult<()> {
        self.put_u8(u8::from(value))
    }

    pub fn put_bytes(&mut self, bytes: &[u8]) -> CoreResult<()> {
        self.check(bytes.len())?;
        let start = self.pos;
        self.buf.as_mut()[start..start + bytes.len()].copy_from_slice(bytes);
        self.pos += bytes.len();
        Ok(())
    }

    pub fn put_string(&mut self, value: &str) -> CoreResult<()> {
        let bytes = value.as_bytes();
        let len = u16::try_from(bytes.len()).map_err(|_| CoreError::OutOfBounds {
            position: self.pos,
            len: bytes.len(),
            size: u16::MAX as usize,
        })?;
        self.check(2 + bytes.len())?;
        self.put_u16(len)?;
        self.put_bytes(bytes)
    }

    /// Zeroes `count` bytes and advances past them.
    pub fn fill_zero(&mut self, count: usize) -> CoreResult<()> {
        self.check(count)?;
        let start = self.pos;
        self.buf.as_mut()[start..start + count].fill(0);
        self.pos += count;
        Ok(())
    }

    pub fn put_u32_at(&mut self, offset: usize, value: u32) -> CoreResult<()> {
        let saved = self.pos;
        self.seek(offset)?;
        let result = self.put_u32(value);
        self.pos = saved;
        result
    }
}

#[cfg(test)]
#[path = "tests/cursor_tests.rs"]
mod tests;
