//! Adapters: implementations of the port traits
//!
//! - `local_fs`: the real disk via `std::fs`
//! - `memory_fs`: shared in-memory files with failure injection

pub mod local_fs;
pub mod memory_fs;

pub use local_fs::LocalFs;
pub use memory_fs::MemoryFs;
