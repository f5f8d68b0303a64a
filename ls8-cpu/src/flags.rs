//! FL register: outcome of the most recent CMP.

use std::cmp::Ordering;

use bitflags::bitflags;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Flags: u8 {
        const EQUAL = 0b0000_0001;
        const LESS = 0b0000_0010;
        const GREATER = 0b0000_0100;
    }
}

impl Flags {
    /// Exactly one bit is set for any pair of values.
    pub fn compare(a: u8, b: u8) -> Self {
        match a.cmp(&b) {
            Ordering::Equal => Flags::EQUAL,
            Ordering::Less => Flags::LESS,
            Ordering::Greater => Flags::GREATER,
        }
    }

    pub fn is_equal(&self) -> bool {
        self.contains(Flags::EQUAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compare_sets_exactly_one_bit() {
        for a in 0..=u8::MAX {
            for b in 0..=u8::MAX {
                let flags = Flags::compare(a, b);
                assert_eq!(flags.bits().count_ones(), 1, "a={} b={}", a, b);
                assert_eq!(flags.is_equal(), a == b);
                assert_eq!(flags.contains(Flags::LESS), a < b);
                assert_eq!(flags.contains(Flags::GREATER), a > b);
            }
        }
    }

    #[test]
    fn test_starts_clear() {
        assert_eq!(Flags::default().bits(), 0);
        assert!(!Flags::default().is_equal());
    }
}
