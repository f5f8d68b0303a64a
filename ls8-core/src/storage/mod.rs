mod ram;

pub use ram::{MemoryError, RAM};
