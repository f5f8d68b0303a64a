use std::io;
use std::path::Path;

use thiserror::Error;

use crate::storage::MemoryError;

#[derive(Debug, Error)]
pub enum MachineError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("failed to load '{0}' into memory at 0x{1:04X}")]
    FileLoad(String, usize),
    #[error(transparent)]
    Memory(#[from] MemoryError),
}

pub type Result<T> = std::result::Result<T, MachineError>;

pub trait Machine {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Reads a program from `file` and places it in memory.
    fn load(&mut self, file: &Path) -> Result<()>;

    /// Runs the loaded program until it halts or fails.
    fn run(&mut self) -> std::result::Result<(), Self::Error>;
}
