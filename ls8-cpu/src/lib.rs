pub mod alu;
pub mod cpu;
pub mod decoder;
pub mod flags;
pub mod isa;
pub mod machine;
pub mod program;
