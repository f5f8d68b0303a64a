use ls8_core::{DecodeError, DecodeOne, MemoryError, Opcode8};

use crate::isa::instruction::{opcodes, Ls8Instruction, Ls8InstructionId};

pub type Result<T> = std::result::Result<T, DecodeError>;

#[derive(Clone, Copy, Debug, Default)]
pub struct Ls8Decoder {}

impl Ls8Decoder {
    /// Looks the opcode up in the dispatch table. Unrecognized bytes with the
    /// ALU bit set are reported as unsupported ALU operations.
    pub fn dispatch(&self, address: usize, opcode: Opcode8) -> Result<Ls8InstructionId> {
        match Ls8InstructionId::from_opcode(opcode.value()) {
            Some(id) => Ok(id),
            None if opcode.try_get_bit(opcodes::ALU_BIT)? => {
                Err(DecodeError::UnsupportedOperation {
                    opcode: opcode.value(),
                    address,
                })
            }
            None => Err(DecodeError::UnknownInstruction {
                opcode: opcode.value(),
                address,
            }),
        }
    }
}

impl DecodeOne for Ls8Decoder {
    type Instruction = Ls8Instruction;

    fn decode_one<F>(&self, address: usize, mut fetch: F) -> Result<Self::Instruction>
    where
        F: FnMut(usize) -> std::result::Result<u8, MemoryError>,
    {
        let opcode = Opcode8::new(fetch(address)?);
        let id = self.dispatch(address, opcode)?;

        let operand_count = usize::from(
            opcode.try_get_field(opcodes::OPERAND_COUNT_LSB, opcodes::OPERAND_COUNT_WIDTH)?,
        );
        let mut operands = [0u8; 2];
        for (offset, operand) in operands.iter_mut().take(operand_count).enumerate() {
            *operand = fetch(address + 1 + offset)?;
        }

        let instruction = id.with_operands(operands);
        tracing::trace!("0x{:02X} | {:?} | {}", address, opcode, instruction);
        Ok(instruction)
    }
}
