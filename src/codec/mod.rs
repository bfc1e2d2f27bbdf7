//! Line codec for Equalizer APO's config.txt.
//!
//! Two pure halves:
//! - `decode`: classify one raw line → `Directive` (or nothing, for blanks)
//! - `encode`: render a `Directive` back to its canonical line
//!
//! A leading `#` disables a directive instead of deleting it. The audio
//! engine itself skips `#` lines, so the enabled flag lives in the file the
//! engine already reads and needs no side channel.

pub mod decode;
pub mod encode;

pub use decode::decode;
pub use encode::{encode, encode_document, encode_preamp, encode_profile};

use crate::domain::{PreampState, Profile};

/// Marks a directive as disabled.
pub const COMMENT_MARKER: char = '#';

/// Keyword of the master gain directive (matched case-insensitively).
pub const PREAMP_KEYWORD: &str = "Preamp:";

/// Keyword of the profile directive (matched case-insensitively).
pub const INCLUDE_KEYWORD: &str = "Include:";

/// Unit suffix written after the preamp gain.
pub const GAIN_UNIT: &str = "dB";

/// One meaningful line of config.txt.
#[derive(Debug, Clone, PartialEq)]
pub enum Directive {
    Preamp(PreampState),
    Include(Profile),
}
