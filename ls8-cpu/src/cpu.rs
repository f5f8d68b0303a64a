use std::io::{self, Write};

use ls8_core::{
    DecodeError, DecodeOne, Instruction, MemoryError, RegisterError, RegisterFile, RAM,
};
use thiserror::Error;

use crate::alu;
use crate::decoder::Ls8Decoder;
use crate::flags::Flags;
use crate::isa::instruction::Ls8Instruction;

/// Total size of the address space, shared by program and stack.
pub const MEMORY_SIZE: usize = 256;

pub const REGISTER_COUNT: usize = 8;

/// R7 holds the stack pointer.
pub const SP: usize = 7;

/// Initial stack pointer. The stack grows down from here; popping while SP
/// still equals this value is an empty-stack condition.
pub const STACK_BASE: u8 = 0xF4;

pub type Ls8RAM = RAM<MEMORY_SIZE>;
pub type Ls8Registers = RegisterFile<REGISTER_COUNT>;

#[derive(Debug, Error)]
pub enum CpuError {
    #[error(transparent)]
    Memory(#[from] MemoryError),
    #[error(transparent)]
    Register(#[from] RegisterError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error("cannot pop from an empty stack")]
    EmptyStack,
    #[error("failed to write program output")]
    Output(#[from] io::Error),
    #[error("program did not halt within {0} steps")]
    StepLimit(u64),
}

pub type Result<T> = std::result::Result<T, CpuError>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CpuState {
    Running,
    Halted,
}

/// How the program counter moves once an instruction has executed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Flow {
    Advance(usize),
    Jump(usize),
    Halt,
}

/// The LS-8 processor. PRN output is written to `W`.
#[derive(Debug)]
pub struct Ls8Cpu<W: Write> {
    ram: Ls8RAM,
    regs: Ls8Registers,
    flags: Flags,
    pc: usize,
    state: CpuState,
    steps: u64,
    trace_enabled: bool,
    decoder: Ls8Decoder,
    output: W,
}

impl<W: Write> Ls8Cpu<W> {
    pub fn new(output: W) -> Self {
        let mut regs = [0; REGISTER_COUNT];
        regs[SP] = STACK_BASE;
        Ls8Cpu {
            ram: Ls8RAM::new(),
            regs: Ls8Registers::from_values(regs),
            flags: Flags::default(),
            pc: 0,
            state: CpuState::Running,
            steps: 0,
            trace_enabled: false,
            decoder: Ls8Decoder::default(),
            output,
        }
    }

    /// Places `program` in memory starting at address 0.
    pub fn load(&mut self, program: &[u8]) -> std::result::Result<(), MemoryError> {
        self.ram.load(0, program)
    }

    /// When enabled, every step logs a [`Ls8Cpu::trace`] record first.
    pub fn set_trace(&mut self, enabled: bool) {
        self.trace_enabled = enabled;
    }

    pub fn pc(&self) -> usize {
        self.pc
    }

    pub fn state(&self) -> CpuState {
        self.state
    }

    pub fn flags(&self) -> Flags {
        self.flags
    }

    pub fn registers(&self) -> &Ls8Registers {
        &self.regs
    }

    pub fn ram(&self) -> &Ls8RAM {
        &self.ram
    }

    /// Number of instructions executed so far.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    pub fn output_mut(&mut self) -> &mut W {
        &mut self.output
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Runs one fetch-decode-execute cycle.
    pub fn step(&mut self) -> Result<CpuState> {
        if self.state == CpuState::Halted {
            return Ok(CpuState::Halted);
        }
        if self.trace_enabled {
            tracing::info!("{}", self.trace());
        }

        let ram = &self.ram;
        let instruction = self.decoder.decode_one(self.pc, |address| ram.read(address))?;
        match self.execute(instruction)? {
            Flow::Advance(length) => self.pc += length,
            Flow::Jump(address) => self.pc = address,
            Flow::Halt => self.state = CpuState::Halted,
        }
        self.steps += 1;
        Ok(self.state)
    }

    /// Steps until HLT, or until `max_steps` instructions have run.
    pub fn run(&mut self, max_steps: Option<u64>) -> Result<()> {
        while self.state == CpuState::Running {
            if let Some(limit) = max_steps {
                if self.steps >= limit {
                    return Err(CpuError::StepLimit(limit));
                }
            }
            self.step()?;
        }
        Ok(())
    }

    /// One line of machine state: PC, the three bytes at PC, then every
    /// register, all as two-digit hex.
    pub fn trace(&self) -> String {
        let peek = |offset: usize| self.ram.read(self.pc + offset).unwrap_or_default();
        let mut line = format!(
            "TRACE: {:02X} | {:02X} {:02X} {:02X} |",
            self.pc,
            peek(0),
            peek(1),
            peek(2)
        );
        for value in self.regs.values() {
            line.push_str(&format!(" {:02X}", value));
        }
        line
    }

    fn reg(&self, index: u8) -> Result<u8> {
        Ok(self.regs.get(usize::from(index))?)
    }

    fn set_reg(&mut self, index: u8, value: u8) -> Result<()> {
        Ok(self.regs.set(usize::from(index), value)?)
    }

    /// Moves SP down one cell and returns the new top-of-stack address.
    fn grow_stack(&mut self) -> Result<u8> {
        let sp = self.regs.get(SP)?.wrapping_sub(1);
        self.regs.set(SP, sp)?;
        Ok(sp)
    }

    fn push_stack(&mut self, value: u8) -> Result<()> {
        let sp = self.grow_stack()?;
        self.ram.write(usize::from(sp), value)?;
        tracing::debug!("pushed 0x{:02X} to 0x{:02X}", value, sp);
        Ok(())
    }

    /// SP is decremented before `reg` is read, so pushing R7 stores the new SP.
    fn push_register(&mut self, reg: u8) -> Result<()> {
        let sp = self.grow_stack()?;
        let value = self.reg(reg)?;
        self.ram.write(usize::from(sp), value)?;
        tracing::debug!("pushed R{} = 0x{:02X} to 0x{:02X}", reg, value, sp);
        Ok(())
    }

    /// `reg` is written before SP is incremented, so popping into R7 leaves
    /// SP one past the popped value.
    fn pop_stack(&mut self, reg: u8) -> Result<u8> {
        let sp = self.regs.get(SP)?;
        if sp == STACK_BASE {
            return Err(CpuError::EmptyStack);
        }
        let value = self.ram.read(usize::from(sp))?;
        self.set_reg(reg, value)?;
        let sp_after = self.regs.get(SP)?.wrapping_add(1);
        self.regs.set(SP, sp_after)?;
        tracing::debug!("popped 0x{:02X} from 0x{:02X} into R{}", value, sp, reg);
        Ok(value)
    }

    /// Pops into `reg`. An empty stack is reported and leaves `reg` untouched.
    fn pop_into(&mut self, reg: u8) -> Result<()> {
        match self.pop_stack(reg) {
            Ok(_) => Ok(()),
            Err(CpuError::EmptyStack) => {
                tracing::warn!(
                    "0x{:02X} | {} | skipping pop into R{}",
                    self.pc,
                    CpuError::EmptyStack,
                    reg
                );
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    fn execute(&mut self, instruction: Ls8Instruction) -> Result<Flow> {
        let length = instruction.len_bytes();
        let flow = match instruction {
            Ls8Instruction::Nop => Flow::Advance(length),
            Ls8Instruction::Halt => Flow::Halt,
            Ls8Instruction::LoadImmediate { reg, value } => {
                self.set_reg(reg, value)?;
                Flow::Advance(length)
            }
            Ls8Instruction::Print { reg } => {
                let value = self.reg(reg)?;
                writeln!(self.output, "{}", value)?;
                Flow::Advance(length)
            }
            Ls8Instruction::Alu { op, reg_a, reg_b } => {
                let a = self.reg(reg_a)?;
                let b = match reg_b {
                    Some(reg_b) => self.reg(reg_b)?,
                    None => 0,
                };
                let output = alu::apply(op, a, b);
                if let Some(result) = output.result {
                    self.set_reg(reg_a, result)?;
                }
                if let Some(flags) = output.flags {
                    self.flags = flags;
                }
                Flow::Advance(length)
            }
            Ls8Instruction::Push { reg } => {
                self.push_register(reg)?;
                Flow::Advance(length)
            }
            Ls8Instruction::Pop { reg } => {
                self.pop_into(reg)?;
                Flow::Advance(length)
            }
            Ls8Instruction::Call { reg } => {
                let return_address = self.pc + length;
                let return_address = u8::try_from(return_address)
                    .map_err(|_| MemoryError::OutOfBounds(return_address, MEMORY_SIZE))?;
                self.push_stack(return_address)?;
                // target is read after the push; CALL R7 jumps to the new SP
                Flow::Jump(usize::from(self.reg(reg)?))
            }
            Ls8Instruction::Return { reg } => {
                self.pop_into(reg)?;
                Flow::Jump(usize::from(self.reg(reg)?))
            }
            Ls8Instruction::Jump { reg } => Flow::Jump(usize::from(self.reg(reg)?)),
            Ls8Instruction::JumpIfEqual { reg } => {
                if self.flags.is_equal() {
                    Flow::Jump(usize::from(self.reg(reg)?))
                } else {
                    Flow::Advance(length)
                }
            }
            Ls8Instruction::JumpIfNotEqual { reg } => {
                if !self.flags.is_equal() {
                    Flow::Jump(usize::from(self.reg(reg)?))
                } else {
                    Flow::Advance(length)
                }
            }
        };
        Ok(flow)
    }
}
