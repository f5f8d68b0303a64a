pub mod cpu;
mod machine;
mod register;
mod storage;

pub use crate::cpu::decoder::{DecodeError, DecodeOne, Instruction};
pub use crate::cpu::opcode::{Opcode8, OpcodeError};
pub use crate::machine::{Machine, MachineError};
pub use crate::register::{RegisterError, RegisterFile};
pub use crate::storage::{MemoryError, RAM};
