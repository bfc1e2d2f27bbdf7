//! Pure encoding: `Directive` → canonical config.txt line.
//!
//! Names are emitted exactly as stored; nothing is re-validated here.

use crate::domain::{PreampState, Profile};

use super::{Directive, COMMENT_MARKER, GAIN_UNIT, INCLUDE_KEYWORD, PREAMP_KEYWORD};

/// Encode a directive into its line text, without a trailing newline.
pub fn encode(directive: &Directive) -> String {
    match directive {
        Directive::Preamp(p) => encode_preamp(p),
        Directive::Include(p) => encode_profile(p),
    }
}

/// `Preamp: <gain> dB`, one fractional digit.
pub fn encode_preamp(preamp: &PreampState) -> String {
    with_marker(
        format!("{PREAMP_KEYWORD} {:.1} {GAIN_UNIT}", preamp.gain),
        preamp.enabled,
    )
}

/// `Include: <name>`
pub fn encode_profile(profile: &Profile) -> String {
    with_marker(format!("{INCLUDE_KEYWORD} {}", profile.name), profile.enabled)
}

fn with_marker(body: String, enabled: bool) -> String {
    if enabled {
        body
    } else {
        format!("{COMMENT_MARKER}{body}")
    }
}

/// Render a whole config.txt: the preamp line, then one line per profile in
/// the given order. Every line is `\n`-terminated.
pub fn encode_document(preamp: &PreampState, profiles: &[Profile]) -> String {
    let mut out = encode_preamp(preamp);
    out.push('\n');
    for profile in profiles {
        out.push_str(&encode_profile(profile));
        out.push('\n');
    }
    out
}
