use std::fmt;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OpcodeError {
    #[error("{0} index {1} out of bounds, must be [0, {2})")]
    IndexOutOfBounds(&'static str, usize, usize),
}

pub type Result<T> = std::result::Result<T, OpcodeError>;

/// A single opcode byte with helpers for pulling bit fields out of it.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Opcode8 {
    value: u8,
}

impl fmt::Debug for Opcode8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_fmt(format_args!("0x{:02X}", self.value))
    }
}

impl From<u8> for Opcode8 {
    fn from(value: u8) -> Self {
        Self::new(value)
    }
}

impl Opcode8 {
    pub const WIDTH_BITS: usize = 8;

    pub const fn new(value: u8) -> Self {
        Self { value }
    }

    pub const fn value(&self) -> u8 {
        self.value
    }

    pub fn try_get_bit(&self, idx: usize) -> Result<bool> {
        Ok(self.extract("bit", idx, 1)? == 1)
    }

    /// Returns the `width`-bit field whose least significant bit is `lsb`.
    pub fn try_get_field(&self, lsb: usize, width: usize) -> Result<u8> {
        if width == 0 || lsb + width > Self::WIDTH_BITS {
            return Err(OpcodeError::IndexOutOfBounds(
                "field",
                lsb + width,
                Self::WIDTH_BITS + 1,
            ));
        }
        self.extract("field", lsb, width)
    }

    fn extract(&self, idx_type: &'static str, idx: usize, width: usize) -> Result<u8> {
        if idx >= Self::WIDTH_BITS {
            return Err(OpcodeError::IndexOutOfBounds(idx_type, idx, Self::WIDTH_BITS));
        }
        let mask = (u16::MAX >> (16 - width)) as u8;
        Ok((self.value >> idx) & mask)
    }
}
