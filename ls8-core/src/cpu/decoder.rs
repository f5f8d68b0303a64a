use std::fmt;

use thiserror::Error;

use crate::cpu::opcode::OpcodeError;
use crate::storage::MemoryError;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("unknown instruction 0x{opcode:02X} at address 0x{address:02X}")]
    UnknownInstruction { opcode: u8, address: usize },
    #[error("unsupported ALU operation 0x{opcode:02X} at address 0x{address:02X}")]
    UnsupportedOperation { opcode: u8, address: usize },
    #[error(transparent)]
    Memory(#[from] MemoryError),
    #[error(transparent)]
    Opcode(#[from] OpcodeError),
}

pub type Result<T> = std::result::Result<T, DecodeError>;

pub trait Instruction: fmt::Debug + fmt::Display {
    /// Encoded length in bytes, opcode included.
    fn len_bytes(&self) -> usize;
}

pub trait DecodeOne {
    type Instruction: Instruction;

    /// Decodes the instruction starting at `address`, pulling bytes through
    /// `fetch`. Only the bytes the instruction actually occupies are fetched.
    fn decode_one<F>(&self, address: usize, fetch: F) -> Result<Self::Instruction>
    where
        F: FnMut(usize) -> std::result::Result<u8, MemoryError>;
}
