use std::fs;
use std::io::Write;
use std::path::Path;

use ls8_core::{Machine, MachineError};

use crate::cpu::{CpuError, Ls8Cpu, MEMORY_SIZE};
use crate::program::parse_program;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MachineConfig {
    /// Log a trace record before every instruction.
    pub trace: bool,
    /// Abort runs that have not halted after this many instructions.
    pub max_steps: Option<u64>,
}

#[derive(Debug)]
pub struct Ls8Machine<W: Write> {
    cpu: Ls8Cpu<W>,
    config: MachineConfig,
}

impl<W: Write> Machine for Ls8Machine<W> {
    type Error = CpuError;

    fn load(&mut self, file: &Path) -> Result<(), MachineError> {
        let source = fs::read_to_string(file)?;
        let program = parse_program(&source);
        if program.len() > MEMORY_SIZE {
            return Err(MachineError::FileLoad(
                file.display().to_string(),
                MEMORY_SIZE,
            ));
        }
        self.cpu.load(&program)?;
        tracing::info!("loaded {} bytes from {}", program.len(), file.display());
        Ok(())
    }

    fn run(&mut self) -> Result<(), CpuError> {
        tracing::info!("starting LS-8 machine");
        let result = self.cpu.run(self.config.max_steps);
        self.cpu.output_mut().flush()?;
        result?;
        tracing::info!("halted after {} instructions", self.cpu.steps());
        Ok(())
    }
}

impl<W: Write> Ls8Machine<W> {
    pub fn new(output: W, config: MachineConfig) -> Self {
        let mut cpu = Ls8Cpu::new(output);
        cpu.set_trace(config.trace);
        Self { cpu, config }
    }

    pub fn cpu(&self) -> &Ls8Cpu<W> {
        &self.cpu
    }

    pub fn into_cpu(self) -> Ls8Cpu<W> {
        self.cpu
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use ls8_core::MemoryError;
    use tempfile::TempDir;

    use super::*;
    use crate::cpu::CpuState;

    fn write_program(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).expect("failed to write program");
        path
    }

    const MULT: &str = "\
10000010 # LDI R0,8
00000000
00001000
10000010 # LDI R1,9
00000001
00001001
10100010 # MUL R0,R1
00000000
00000001
01000111 # PRN R0
00000000
00000001 # HLT
";

    #[test]
    fn test_load_and_run() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let program = write_program(&dir, "mult", MULT);
        let mut machine = Ls8Machine::new(Vec::new(), MachineConfig::default());
        machine.load(&program).unwrap();
        machine.run().unwrap();
        let cpu = machine.into_cpu();
        assert_eq!(cpu.state(), CpuState::Halted);
        assert_eq!(cpu.into_output(), b"72\n");
    }

    #[test]
    fn test_trace_does_not_change_output() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let program = write_program(&dir, "mult-trace", MULT);
        let config = MachineConfig {
            trace: true,
            max_steps: None,
        };
        let mut machine = Ls8Machine::new(Vec::new(), config);
        machine.load(&program).unwrap();
        machine.run().unwrap();
        assert_eq!(machine.cpu().output(), b"72\n");
    }

    #[test]
    fn test_missing_file() {
        let mut machine = Ls8Machine::new(Vec::new(), MachineConfig::default());
        let result = machine.load(Path::new("/nonexistent/ls8/program.ls8"));
        assert!(matches!(result, Err(MachineError::Io(_))));
    }

    #[test]
    fn test_program_too_large() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let program = write_program(&dir, "large", &"00000000\n".repeat(MEMORY_SIZE + 1));
        let mut machine = Ls8Machine::new(Vec::new(), MachineConfig::default());
        let result = machine.load(&program);
        assert!(matches!(result, Err(MachineError::FileLoad(_, MEMORY_SIZE))));
    }

    #[test]
    fn test_program_fills_memory_exactly() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let program = write_program(&dir, "full", &"00000000\n".repeat(MEMORY_SIZE));
        let mut machine = Ls8Machine::new(Vec::new(), MachineConfig::default());
        machine.load(&program).unwrap();
        let result = machine.run();
        assert!(matches!(
            result,
            Err(CpuError::Decode(ls8_core::DecodeError::Memory(
                MemoryError::OutOfBounds(256, 256)
            )))
        ));
    }

    #[test]
    fn test_step_limit() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let program = write_program(&dir, "loop", "10000010\n0\n0\n01010100\n0\n");
        let config = MachineConfig {
            trace: false,
            max_steps: Some(10),
        };
        let mut machine = Ls8Machine::new(Vec::new(), config);
        machine.load(&program).unwrap();
        assert!(matches!(machine.run(), Err(CpuError::StepLimit(10))));
    }
}
