//! Pure decoding: one config.txt line → `Directive`.
//!
//! No I/O. The caller owns line numbering and turns a `FormatErrorKind`
//! into a positioned `ConfigError::Format`.

use crate::domain::{FormatErrorKind, PreampState, Profile};

use super::{Directive, COMMENT_MARKER, GAIN_UNIT, INCLUDE_KEYWORD, PREAMP_KEYWORD};

/// Decode a raw line.
///
/// Returns `Ok(None)` for blank lines. Anything that is not a (possibly
/// commented) `Preamp:` or `Include:` directive is an error; unknown lines
/// are never skipped silently.
pub fn decode(raw: &str) -> Result<Option<Directive>, FormatErrorKind> {
    let line = raw.trim();
    if line.is_empty() {
        return Ok(None);
    }

    // Exactly one marker is stripped: "##Include: x" is not a directive.
    let (enabled, clean) = match line.strip_prefix(COMMENT_MARKER) {
        Some(rest) => (false, rest.trim()),
        None => (true, line),
    };

    if starts_with_ignore_case(clean, PREAMP_KEYWORD) {
        let gain = parse_gain(clean)?;
        return Ok(Some(Directive::Preamp(PreampState { gain, enabled })));
    }

    if starts_with_ignore_case(clean, INCLUDE_KEYWORD) {
        // Everything after the first colon is the name, further colons included
        let name = clean
            .split_once(':')
            .map(|(_, name)| name.trim())
            .unwrap_or_default();
        return Ok(Some(Directive::Include(Profile::new(name, enabled))));
    }

    Err(FormatErrorKind::UnknownDirective)
}

/// Parse `"Preamp: -3.5 dB"` → `-3.5`.
///
/// The keyword and every `dB` token are removed rather than split on, so
/// `"Preamp: 2.0dB"` parses too.
fn parse_gain(clean: &str) -> Result<f64, FormatErrorKind> {
    let without_keyword = remove_ignore_case(clean, PREAMP_KEYWORD);
    let payload = remove_ignore_case(&without_keyword, GAIN_UNIT);
    let payload = payload.trim();

    match payload.parse::<f64>() {
        Ok(gain) if gain.is_finite() => Ok(gain),
        _ => Err(FormatErrorKind::InvalidGain(payload.to_string())),
    }
}

fn starts_with_ignore_case(s: &str, prefix: &str) -> bool {
    s.len() >= prefix.len() && s.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
}

/// Remove every ASCII case-insensitive occurrence of `token` from `s`.
///
/// `token` must be ASCII; ASCII lowercasing keeps byte offsets stable, so
/// match positions in the lowered copy index the original directly.
fn remove_ignore_case(s: &str, token: &str) -> String {
    let lowered = s.to_ascii_lowercase();
    let needle = token.to_ascii_lowercase();

    let mut out = String::with_capacity(s.len());
    let mut cursor = 0;
    while let Some(offset) = lowered[cursor..].find(&needle) {
        let start = cursor + offset;
        out.push_str(&s[cursor..start]);
        cursor = start + needle.len();
    }
    out.push_str(&s[cursor..]);
    out
}
