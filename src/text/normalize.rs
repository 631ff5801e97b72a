//! Vietnamese text normalization.
//!
//! All matching in this crate happens over a canonical comparison form:
//! NFC-normalized, trimmed, lowercased, with whitespace runs collapsed to a
//! single space. The optional *tone-stripped* form additionally decomposes
//! the string (NFD), drops every combining mark and re-composes (NFC) —
//! removing Vietnamese tone/diacritic marks while keeping base letters.
//!
//! Decomposable letters reduce to their Latin base (`ệ` → `e`, `ơ` → `o`,
//! `ư` → `u`); `đ` alone has no canonical decomposition and survives
//! [`normalize`] unchanged. Comparisons that must treat ASR's plain `d` as
//! equivalent apply [`fold_d`] on top.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Normalize `s` into the canonical comparison form.
///
/// Steps: NFC → trim → lowercase → collapse whitespace runs to one space.
/// With `strip_tone`, the result is additionally decomposed (NFD), filtered
/// of combining marks and re-composed (NFC).
///
/// Empty (or whitespace-only) input yields an empty string; never errors.
/// Idempotent for a fixed `strip_tone` flag.
///
/// # Examples
///
/// ```
/// use viet_align::text::normalize;
///
/// assert_eq!(normalize("  Hôm nay   TRỜI đẹp ", false), "hôm nay trời đẹp");
/// assert_eq!(normalize("Hôm nay trời đẹp", true), "hom nay troi đep");
/// assert_eq!(normalize("", true), "");
/// ```
pub fn normalize(s: &str, strip_tone: bool) -> String {
    let composed: String = s.nfc().collect();
    let lowered = composed.trim().to_lowercase();
    let collapsed = collapse_whitespace(&lowered);
    if strip_tone {
        drop_combining_marks(&collapsed)
    } else {
        collapsed
    }
}

/// Per-token base form used by the diacritic booster: NFD → drop combining
/// marks → NFC → fold `đ` → lowercase. Unlike [`normalize`] this does not
/// trim or collapse whitespace, matching its use on single word tokens.
pub fn strip_tone_marks(s: &str) -> String {
    fold_d(&drop_combining_marks(s)).to_lowercase()
}

/// Fold `đ`/`Đ` — the one Vietnamese letter without a canonical
/// decomposition — to its ASCII base. Tone-stripped equality checks need
/// this because diacritic-free ASR output writes plain `d`.
pub fn fold_d(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            'đ' => 'd',
            'Đ' => 'D',
            _ => c,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

/// Replace every run of whitespace with a single ASCII space.
fn collapse_whitespace(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_ws = false;
    for c in s.chars() {
        if c.is_whitespace() {
            in_ws = true;
        } else {
            if in_ws && !out.is_empty() {
                out.push(' ');
            }
            in_ws = false;
            out.push(c);
        }
    }
    out
}

/// NFD-decompose, drop every nonspacing mark, re-compose to NFC.
fn drop_combining_marks(s: &str) -> String {
    s.nfd().filter(|&c| !is_combining_mark(c)).nfc().collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
