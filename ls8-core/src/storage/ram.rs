use std::fmt;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MemoryError {
    #[error("address 0x{0:04X} is out of bounds, must be [0x0000, 0x{1:04X})")]
    OutOfBounds(usize, usize),
}

pub type Result<T> = std::result::Result<T, MemoryError>;

/// Flat, zero-initialized, byte-addressable memory of `N` cells.
#[derive(Clone, PartialEq, Eq)]
pub struct RAM<const N: usize> {
    buffer: [u8; N],
}

impl<const N: usize> fmt::Debug for RAM<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RAM[0x{:04X} bytes]", N)
    }
}

impl<const N: usize> Default for RAM<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> RAM<N> {
    pub fn new() -> Self {
        Self { buffer: [0; N] }
    }

    pub fn read(&self, address: usize) -> Result<u8> {
        self.buffer
            .get(address)
            .copied()
            .ok_or(MemoryError::OutOfBounds(address, N))
    }

    pub fn write(&mut self, address: usize, value: u8) -> Result<()> {
        let cell = self
            .buffer
            .get_mut(address)
            .ok_or(MemoryError::OutOfBounds(address, N))?;
        *cell = value;
        Ok(())
    }

    /// Copies `data` into memory starting at `address`. Nothing is written
    /// unless the whole range fits.
    pub fn load(&mut self, address: usize, data: &[u8]) -> Result<()> {
        let end = address + data.len();
        if end > N {
            return Err(MemoryError::OutOfBounds(end - 1, N));
        }
        tracing::trace!(
            "writing 0x{:X} bytes to 0x{:04X} - 0x{:04X}",
            data.len(),
            address,
            end
        );
        self.buffer[address..end].copy_from_slice(data);
        Ok(())
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buffer
    }
}

#[cfg(test)]
mod tests {
    use rand::Rng;

    use super::*;

    #[test]
    fn test_starts_zeroed() {
        let ram = RAM::<256>::new();
        assert!(ram.as_slice().iter().all(|byte| *byte == 0));
        assert_eq!(ram.as_slice().len(), 256);
    }

    #[test]
    fn test_can_write_and_read_every_cell() {
        let mut rng = rand::thread_rng();
        let mut ram = RAM::<256>::new();
        let mut expected = [0u8; 256];
        for (address, slot) in expected.iter_mut().enumerate() {
            *slot = rng.gen();
            ram.write(address, *slot).unwrap();
        }
        for (address, value) in expected.iter().enumerate() {
            assert_eq!(ram.read(address), Ok(*value));
        }
    }

    #[test]
    fn test_rejects_out_of_bounds_access() {
        let mut ram = RAM::<256>::new();
        assert_eq!(ram.read(256), Err(MemoryError::OutOfBounds(256, 256)));
        assert_eq!(ram.write(300, 1), Err(MemoryError::OutOfBounds(300, 256)));
    }

    #[test]
    fn test_load_is_all_or_nothing() {
        let mut ram = RAM::<4>::new();
        assert_eq!(
            ram.load(2, &[1, 2, 3]),
            Err(MemoryError::OutOfBounds(4, 4))
        );
        assert_eq!(ram.as_slice(), &[0, 0, 0, 0]);

        ram.load(1, &[7, 8, 9]).unwrap();
        assert_eq!(ram.as_slice(), &[0, 7, 8, 9]);
    }
}
