//! ASCII folding, truncation and reference-id sanitizing.
//!
//! Merchant name and city must reach the field encoder as ASCII. Accented
//! letters are decomposed (NFD) and their combining marks dropped, so
//! `"Uberlândia"` becomes `"Uberlandia"`. Whether that folding happens or the
//! value is rejected is decided by [`TextPolicy`].

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::error::{BrCodeError, Result};

/// Longest transaction id accepted in field `62.05`.
pub const MAX_REFERENCE_LEN: usize = 25;

/// Reference id used when the caller has none.
pub const EMPTY_REFERENCE: &str = "***";

/// How non-ASCII merchant text is handled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextPolicy {
    /// Fold to ASCII and log a warning when the value changed.
    #[default]
    Normalize,
    /// Fail with [`BrCodeError::InvalidText`] on any non-ASCII character.
    Reject,
}

/// Fold `s` to printable ASCII: strip accents, drop anything else outside
/// ASCII or in the control range, collapse whitespace runs and trim.
pub fn to_ascii_safe(s: &str) -> Cow<'_, str> {
    let clean = s
        .bytes()
        .all(|b| (0x21..=0x7E).contains(&b) || b == b' ')
        && !s.starts_with(' ')
        && !s.ends_with(' ')
        && !s.contains("  ");
    if clean {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    let mut pending_space = false;
    for c in s.nfd().filter(|c| !is_combining_mark(*c)) {
        if c.is_whitespace() {
            pending_space = !out.is_empty();
            continue;
        }
        if !c.is_ascii() || c.is_ascii_control() {
            continue;
        }
        if pending_space {
            out.push(' ');
            pending_space = false;
        }
        out.push(c);
    }
    Cow::Owned(out)
}

/// Prefix of `s` holding at most `max` characters.
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Apply `policy` to a merchant text field, then truncate to `max` characters.
///
/// `field` names the request field in errors and log lines.
pub fn prepare_text(field: &'static str, raw: &str, max: usize, policy: TextPolicy) -> Result<String> {
    let folded = match policy {
        TextPolicy::Normalize => {
            let folded = to_ascii_safe(raw);
            if folded != raw {
                tracing::warn!(field, original = raw, normalized = %folded, "normalized non-ASCII text");
            }
            folded
        }
        TextPolicy::Reject => {
            if let Some(c) = raw.chars().find(|c| !c.is_ascii() || c.is_ascii_control()) {
                return Err(BrCodeError::InvalidText {
                    field,
                    reason: format!("character {c:?} is not printable ASCII"),
                });
            }
            Cow::Borrowed(raw.trim())
        }
    };
    let truncated = truncate_chars(&folded, max).trim_end();
    if truncated.is_empty() {
        return Err(BrCodeError::InvalidText {
            field,
            reason: "value is empty".into(),
        });
    }
    Ok(truncated.to_string())
}

/// Keep the ASCII alphanumerics of `raw`, truncated to [`MAX_REFERENCE_LEN`].
///
/// An empty result becomes [`EMPTY_REFERENCE`].
pub fn sanitize_reference(raw: &str) -> String {
    let id: String = raw
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .take(MAX_REFERENCE_LEN)
        .collect();
    if id.is_empty() {
        EMPTY_REFERENCE.to_string()
    } else {
        id
    }
}

/// Order id in the storefront's `<prefix><epoch millis>` form, sanitized.
pub fn order_reference(prefix: &str, epoch_millis: u64) -> String {
    sanitize_reference(&format!("{prefix}{epoch_millis}"))
}
