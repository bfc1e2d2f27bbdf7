//! Equalizer APO config model
//!
//! Reads and rewrites Equalizer APO's `config.txt`: one master preamp line and
//! an ordered list of `Include:` lines, each pointing at a profile file. A
//! leading `#` disables a line instead of deleting it, so toggling a profile
//! or the preamp is a rewrite of the same file the audio engine reads.
//!
//! ## Architecture (Hexagonal / Ports & Adapters)
//!
//! - `domain/` - Pure domain types, no I/O dependencies
//! - `codec/` - config.txt line grammar (pure encode/decode)
//! - `ports/` - Trait definitions for storage
//! - `adapters/` - Implementations of ports (std::fs, in-memory)
//! - `store` - `ConfigStore`, the model plus load/save/create
//!
//! The GUI shell that drives this crate is not part of it: no windows, no
//! editor launching, no audio processing.

// Core domain (pure, no I/O)
pub mod codec;
pub mod domain;
pub mod ports;

// Adapters (external I/O)
pub mod adapters;

pub mod store;

pub use domain::{ConfigError, ConfigResult, PreampState, Profile, RetryPolicy, StoreConfig};
pub use store::ConfigStore;
