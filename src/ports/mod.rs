//! Port traits (interfaces)
//!
//! These traits define the boundary between the config model and storage.
//! Adapters implement them for the real disk and for tests.

pub mod filesystem;

pub use filesystem::*;
