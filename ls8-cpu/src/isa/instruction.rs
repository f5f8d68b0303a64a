use std::fmt;

use ls8_core::Instruction;

use crate::alu::AluOp;

/// Opcode bytes. Bits 7-6 hold the operand count, bit 5 marks ALU
/// instructions, bit 4 marks instructions that set the PC themselves.
pub mod opcodes {
    pub const NOP: u8 = 0b0000_0000;
    pub const HLT: u8 = 0b0000_0001;
    pub const LDI: u8 = 0b1000_0010;
    pub const PRN: u8 = 0b0100_0111;

    pub const ADD: u8 = 0b1010_0000;
    pub const SUB: u8 = 0b1010_0001;
    pub const MUL: u8 = 0b1010_0010;
    pub const INC: u8 = 0b0110_0101;
    pub const DEC: u8 = 0b0110_0110;
    pub const CMP: u8 = 0b1010_0111;
    pub const AND: u8 = 0b1010_1000;
    pub const NOT: u8 = 0b0110_1001;
    pub const OR: u8 = 0b1010_1010;
    pub const XOR: u8 = 0b1010_1011;
    pub const SHL: u8 = 0b1010_1100;
    pub const SHR: u8 = 0b1010_1101;

    pub const PUSH: u8 = 0b0100_0101;
    pub const POP: u8 = 0b0100_0110;

    pub const CALL: u8 = 0b0101_0000;
    pub const RET: u8 = 0b0101_0001;
    pub const JMP: u8 = 0b0101_0100;
    pub const JEQ: u8 = 0b0101_0101;
    pub const JNE: u8 = 0b0101_0110;

    pub const OPERAND_COUNT_LSB: usize = 6;
    pub const OPERAND_COUNT_WIDTH: usize = 2;
    pub const ALU_BIT: usize = 5;
}

/// Instruction kinds, one per recognized opcode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Ls8InstructionId {
    Nop,
    Halt,
    LoadImmediate,
    Print,
    Alu(AluOp),
    Push,
    Pop,
    Call,
    Return,
    Jump,
    JumpIfEqual,
    JumpIfNotEqual,
}

impl Ls8InstructionId {
    /// The dispatch table: `None` for any byte that is not a known opcode.
    pub fn from_opcode(opcode: u8) -> Option<Self> {
        let id = match opcode {
            opcodes::NOP => Ls8InstructionId::Nop,
            opcodes::HLT => Ls8InstructionId::Halt,
            opcodes::LDI => Ls8InstructionId::LoadImmediate,
            opcodes::PRN => Ls8InstructionId::Print,
            opcodes::PUSH => Ls8InstructionId::Push,
            opcodes::POP => Ls8InstructionId::Pop,
            opcodes::CALL => Ls8InstructionId::Call,
            opcodes::RET => Ls8InstructionId::Return,
            opcodes::JMP => Ls8InstructionId::Jump,
            opcodes::JEQ => Ls8InstructionId::JumpIfEqual,
            opcodes::JNE => Ls8InstructionId::JumpIfNotEqual,
            other => Ls8InstructionId::Alu(AluOp::from_opcode(other)?),
        };
        Some(id)
    }

    pub fn mnemonic(&self) -> &'static str {
        match self {
            Ls8InstructionId::Nop => "NOP",
            Ls8InstructionId::Halt => "HLT",
            Ls8InstructionId::LoadImmediate => "LDI",
            Ls8InstructionId::Print => "PRN",
            Ls8InstructionId::Alu(op) => op.mnemonic(),
            Ls8InstructionId::Push => "PUSH",
            Ls8InstructionId::Pop => "POP",
            Ls8InstructionId::Call => "CALL",
            Ls8InstructionId::Return => "RET",
            Ls8InstructionId::Jump => "JMP",
            Ls8InstructionId::JumpIfEqual => "JEQ",
            Ls8InstructionId::JumpIfNotEqual => "JNE",
        }
    }

    /// Builds the instruction from its operand bytes. Operands beyond the
    /// instruction's own count are ignored.
    pub fn with_operands(&self, operands: [u8; 2]) -> Ls8Instruction {
        let [first, second] = operands;
        match *self {
            Ls8InstructionId::Nop => Ls8Instruction::Nop,
            Ls8InstructionId::Halt => Ls8Instruction::Halt,
            Ls8InstructionId::LoadImmediate => Ls8Instruction::LoadImmediate {
                reg: first,
                value: second,
            },
            Ls8InstructionId::Print => Ls8Instruction::Print { reg: first },
            Ls8InstructionId::Alu(op) => Ls8Instruction::Alu {
                op,
                reg_a: first,
                reg_b: (!op.is_unary()).then_some(second),
            },
            Ls8InstructionId::Push => Ls8Instruction::Push { reg: first },
            Ls8InstructionId::Pop => Ls8Instruction::Pop { reg: first },
            Ls8InstructionId::Call => Ls8Instruction::Call { reg: first },
            Ls8InstructionId::Return => Ls8Instruction::Return { reg: first },
            Ls8InstructionId::Jump => Ls8Instruction::Jump { reg: first },
            Ls8InstructionId::JumpIfEqual => Ls8Instruction::JumpIfEqual { reg: first },
            Ls8InstructionId::JumpIfNotEqual => Ls8Instruction::JumpIfNotEqual { reg: first },
        }
    }
}

impl fmt::Display for Ls8InstructionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Ls8Instruction {
    Nop,
    Halt,
    LoadImmediate { reg: u8, value: u8 },
    Print { reg: u8 },
    Alu { op: AluOp, reg_a: u8, reg_b: Option<u8> },
    Push { reg: u8 },
    Pop { reg: u8 },
    /// Pushes the address of the next instruction, then jumps to `reg`.
    Call { reg: u8 },
    /// Pops the return address into `reg`, then jumps to it.
    Return { reg: u8 },
    Jump { reg: u8 },
    JumpIfEqual { reg: u8 },
    JumpIfNotEqual { reg: u8 },
}

impl Ls8Instruction {
    pub fn id(&self) -> Ls8InstructionId {
        match self {
            Ls8Instruction::Nop => Ls8InstructionId::Nop,
            Ls8Instruction::Halt => Ls8InstructionId::Halt,
            Ls8Instruction::LoadImmediate { .. } => Ls8InstructionId::LoadImmediate,
            Ls8Instruction::Print { .. } => Ls8InstructionId::Print,
            Ls8Instruction::Alu { op, .. } => Ls8InstructionId::Alu(*op),
            Ls8Instruction::Push { .. } => Ls8InstructionId::Push,
            Ls8Instruction::Pop { .. } => Ls8InstructionId::Pop,
            Ls8Instruction::Call { .. } => Ls8InstructionId::Call,
            Ls8Instruction::Return { .. } => Ls8InstructionId::Return,
            Ls8Instruction::Jump { .. } => Ls8InstructionId::Jump,
            Ls8Instruction::JumpIfEqual { .. } => Ls8InstructionId::JumpIfEqual,
            Ls8Instruction::JumpIfNotEqual { .. } => Ls8InstructionId::JumpIfNotEqual,
        }
    }
}

impl Instruction for Ls8Instruction {
    fn len_bytes(&self) -> usize {
        match self {
            Ls8Instruction::Nop | Ls8Instruction::Halt => 1,
            Ls8Instruction::LoadImmediate { .. } => 3,
            Ls8Instruction::Alu { reg_b: Some(_), .. } => 3,
            _ => 2,
        }
    }
}

impl fmt::Display for Ls8Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mnemonic = self.id().mnemonic();
        match self {
            Ls8Instruction::Nop | Ls8Instruction::Halt => f.write_str(mnemonic),
            Ls8Instruction::LoadImmediate { reg, value } => {
                write!(f, "{} R{}, 0x{:02X}", mnemonic, reg, value)
            }
            Ls8Instruction::Alu {
                reg_a,
                reg_b: Some(reg_b),
                ..
            } => write!(f, "{} R{}, R{}", mnemonic, reg_a, reg_b),
            Ls8Instruction::Alu { reg_a, .. } => write!(f, "{} R{}", mnemonic, reg_a),
            Ls8Instruction::Print { reg }
            | Ls8Instruction::Push { reg }
            | Ls8Instruction::Pop { reg }
            | Ls8Instruction::Call { reg }
            | Ls8Instruction::Return { reg }
            | Ls8Instruction::Jump { reg }
            | Ls8Instruction::JumpIfEqual { reg }
            | Ls8Instruction::JumpIfNotEqual { reg } => write!(f, "{} R{}", mnemonic, reg),
        }
    }
}
