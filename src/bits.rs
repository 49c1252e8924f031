//! Single-bit and mask helpers for the packed flag words of the save blocks.

pub fn test(value: u32, bit: u32) -> bool {
    (value >> bit) & 1 == 1
}

pub fn set(value: u32, bit: u32) -> u32 {
    value | (1 << bit)
}

pub fn clear(value: u32, bit: u32) -> u32 {
    value & !(1 << bit)
}

pub fn toggle(value: u32, bit: u32) -> u32 {
    value ^ (1 << bit)
}

pub fn update(value: u32, bit: u32, state: bool) -> u32 {
    if state {
        set(value, bit)
    } else {
        clear(value, bit)
    }
}

/// True only if every bit of `mask` is set.
pub fn test_mask(value: u32, mask: u32) -> bool {
    value & mask == mask
}

pub fn update_mask(value: u32, mask: u32, state: bool) -> u32 {
    if state {
        value | mask
    } else {
        value & !mask
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_bit_operations() {
        assert!(test(0b100, 2));
        assert!(!test(0b100, 1));
        assert_eq!(set(0, 31), 0x8000_0000);
        assert_eq!(clear(0b111, 1), 0b101);
        assert_eq!(toggle(toggle(0b1010, 0), 0), 0b1010);
        assert_eq!(update(0b1, 0, false), 0);
        assert_eq!(update(0, 3, true), 0b1000);
    }

    #[test]
    fn mask_operations_require_every_bit() {
        assert!(test_mask(0b1101, 0b0101));
        assert!(!test_mask(0b1001, 0b0101));
        assert_eq!(update_mask(0b1001, 0b0110, true), 0b1111);
        assert_eq!(update_mask(0b1111, 0b0110, false), 0b1001);
    }
}
