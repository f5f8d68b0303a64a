use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::flags::Flags;
use crate::isa::instruction::opcodes;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AluError {
    #[error("unsupported ALU operation '{0}'")]
    UnsupportedOperation(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AluOp {
    Add,
    Sub,
    Mul,
    Inc,
    Dec,
    Cmp,
    And,
    Not,
    Or,
    Xor,
    Shl,
    Shr,
}

impl AluOp {
    pub const ALL: [AluOp; 12] = [
        AluOp::Add,
        AluOp::Sub,
        AluOp::Mul,
        AluOp::Inc,
        AluOp::Dec,
        AluOp::Cmp,
        AluOp::And,
        AluOp::Not,
        AluOp::Or,
        AluOp::Xor,
        AluOp::Shl,
        AluOp::Shr,
    ];

    pub fn from_opcode(opcode: u8) -> Option<Self> {
        let op = match opcode {
            opcodes::ADD => AluOp::Add,
            opcodes::SUB => AluOp::Sub,
            opcodes::MUL => AluOp::Mul,
            opcodes::INC => AluOp::Inc,
            opcodes::DEC => AluOp::Dec,
            opcodes::CMP => AluOp::Cmp,
            opcodes::AND => AluOp::And,
            opcodes::NOT => AluOp::Not,
            opcodes::OR => AluOp::Or,
            opcodes::XOR => AluOp::Xor,
            opcodes::SHL => AluOp::Shl,
            opcodes::SHR => AluOp::Shr,
            _ => return None,
        };
        Some(op)
    }

    pub fn mnemonic(&self) -> &'static str {
        match self {
            AluOp::Add => "ADD",
            AluOp::Sub => "SUB",
            AluOp::Mul => "MUL",
            AluOp::Inc => "INC",
            AluOp::Dec => "DEC",
            AluOp::Cmp => "CMP",
            AluOp::And => "AND",
            AluOp::Not => "NOT",
            AluOp::Or => "OR",
            AluOp::Xor => "XOR",
            AluOp::Shl => "SHL",
            AluOp::Shr => "SHR",
        }
    }

    /// Unary operations only read their first operand.
    pub fn is_unary(&self) -> bool {
        matches!(self, AluOp::Inc | AluOp::Dec | AluOp::Not)
    }
}

impl fmt::Display for AluOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

impl FromStr for AluOp {
    type Err = AluError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AluOp::ALL
            .into_iter()
            .find(|op| op.mnemonic().eq_ignore_ascii_case(s))
            .ok_or_else(|| AluError::UnsupportedOperation(s.to_string()))
    }
}

/// What an ALU operation produces: a value for the destination register,
/// a new flags value, or (for CMP) only the latter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AluOutput {
    pub result: Option<u8>,
    pub flags: Option<Flags>,
}

impl AluOutput {
    fn value(result: u8) -> Self {
        Self {
            result: Some(result),
            flags: None,
        }
    }
}

pub fn apply(op: AluOp, a: u8, b: u8) -> AluOutput {
    match op {
        AluOp::Add => AluOutput::value(a.wrapping_add(b)),
        AluOp::Sub => AluOutput::value(a.wrapping_sub(b)),
        AluOp::Mul => AluOutput::value(a.wrapping_mul(b)),
        AluOp::Inc => AluOutput::value(a.wrapping_add(1)),
        AluOp::Dec => AluOutput::value(a.wrapping_sub(1)),
        AluOp::Cmp => AluOutput {
            result: None,
            flags: Some(Flags::compare(a, b)),
        },
        AluOp::And => AluOutput::value(a & b),
        AluOp::Not => AluOutput::value(!a),
        AluOp::Or => AluOutput::value(a | b),
        AluOp::Xor => AluOutput::value(a ^ b),
        // shifting by the full width or more clears the value
        AluOp::Shl => AluOutput::value(a.checked_shl(u32::from(b)).unwrap_or(0)),
        AluOp::Shr => AluOutput::value(a.checked_shr(u32::from(b)).unwrap_or(0)),
    }
}
