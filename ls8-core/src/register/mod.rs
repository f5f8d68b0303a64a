use std::fmt;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegisterError {
    #[error("register index {0} is invalid, must be [0, {1})")]
    InvalidRegister(usize, usize),
}

pub type Result<T> = std::result::Result<T, RegisterError>;

/// A bank of `N` general-purpose 8-bit registers, addressed by index.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct RegisterFile<const N: usize> {
    values: [u8; N],
}

impl<const N: usize> fmt::Debug for RegisterFile<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut list = f.debug_list();
        for value in &self.values {
            list.entry(&format_args!("0x{:02X}", value));
        }
        list.finish()
    }
}

impl<const N: usize> Default for RegisterFile<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> RegisterFile<N> {
    pub fn new() -> Self {
        Self { values: [0; N] }
    }

    pub fn from_values(values: [u8; N]) -> Self {
        Self { values }
    }

    pub fn get(&self, index: usize) -> Result<u8> {
        self.values
            .get(index)
            .copied()
            .ok_or(RegisterError::InvalidRegister(index, N))
    }

    pub fn set(&mut self, index: usize, value: u8) -> Result<()> {
        let slot = self
            .values
            .get_mut(index)
            .ok_or(RegisterError::InvalidRegister(index, N))?;
        *slot = value;
        Ok(())
    }

    pub fn values(&self) -> &[u8; N] {
        &self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_write() {
        let mut regs = RegisterFile::<8>::new();
        assert_eq!(regs.get(0), Ok(0));
        regs.set(0, 1).unwrap();
        assert_eq!(regs.get(0), Ok(1));
        regs.set(7, u8::MAX).unwrap();
        assert_eq!(regs.get(7), Ok(u8::MAX));
        assert_eq!(regs.values(), &[1, 0, 0, 0, 0, 0, 0, u8::MAX]);
    }

    #[test]
    fn test_invalid_index() {
        let mut regs = RegisterFile::<8>::new();
        assert_eq!(regs.get(8), Err(RegisterError::InvalidRegister(8, 8)));
        assert_eq!(regs.set(255, 1), Err(RegisterError::InvalidRegister(255, 8)));
        assert_eq!(regs.values(), &[0; 8]);
    }

    #[test]
    fn test_debug_format() {
        let mut regs = RegisterFile::<2>::new();
        regs.set(1, 0xF4).unwrap();
        assert_eq!(format!("{:?}", regs), "[0x00, 0xF4]");
    }
}
