//! Post-processing booster: punctuation repair and diacritic projection.
//!
//! When the matcher leaves a below-target alignment, the booster tries to
//! raise the similarity against the best ("donor") reference sentence
//! without fabricating content:
//!
//! 1. A fixed table of common ASR punctuation repairs, then
//!    punctuation-spacing normalization.
//! 2. Diacritic projection — every ASR word whose tone-stripped base form
//!    appears in the donor is replaced by the donor's toned variant closest
//!    in length.
//! 3. If the projected text still scores below target, a second pass
//!    projects from the tone-stripped normalized text (discarding whatever
//!    diacritics the ASR produced) and the better attempt wins.
//!
//! The donor is never mutated. Callers must only invoke the booster when
//! the tone-stripped word overlap with the donor is at least 0.25 —
//! projection onto a barely-related donor substitutes unrelated words.

use std::collections::{HashMap, HashSet};

use crate::similarity::SimilarityEngine;
use crate::text::{normalize, strip_tone_marks, word_tokens, Token};

// ---------------------------------------------------------------------------
// Common ASR repairs
// ---------------------------------------------------------------------------

/// Literal replacements applied in order before projection. Mostly spacing
/// around punctuation, dash unification and the recurring caption
/// mis-transcription `anh:` for `ảnh:`.
const COMMON_FIXES: &[(&str, &str)] = &[
    (" ,", ","),
    (" .", "."),
    (" !", "!"),
    (" ?", "?"),
    (" :", ":"),
    (" ;", ";"),
    ("..", "."),
    ("—", "-"),
    ("–", "-"),
    ("anh:", "ảnh:"),
    ("anh :", "ảnh:"),
];

/// Punctuation that attracts spacing normalization.
const SPACED_PUNCT: [char; 6] = [',', '.', '!', '?', ':', ';'];

// ---------------------------------------------------------------------------
// BoostResult
// ---------------------------------------------------------------------------

/// Outcome of one boost attempt.
#[derive(Debug, Clone)]
pub struct BoostResult {
    /// The corrected text (best of the projection attempts).
    pub text: String,
    /// Composite similarity of `text` against the donor sentence.
    pub score: f64,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Tone-stripped word overlap of `a` against `b`, measured over `a`'s word
/// count: `|words(a) ∩ words(b)| / |words(a)|`. 0.0 when either side has no
/// words. This is the booster invocation guard.
pub fn word_overlap_no_tone(a: &str, b: &str) -> f64 {
    let a_norm = normalize(a, true);
    let b_norm = normalize(b, true);
    let a_words: HashSet<&str> = a_norm.split_whitespace().collect();
    let b_words: HashSet<&str> = b_norm.split_whitespace().collect();
    if a_words.is_empty() || b_words.is_empty() {
        return 0.0;
    }
    a_words.intersection(&b_words).count() as f64 / a_words.len() as f64
}

/// Normalize spacing around punctuation: no whitespace before `,.!?:;`,
/// exactly one space after, whitespace runs collapsed, ends trimmed.
/// Idempotent.
pub fn normalize_punctuation(s: &str) -> String {
    // No whitespace before punctuation.
    let mut tight = String::with_capacity(s.len());
    for c in s.chars() {
        if SPACED_PUNCT.contains(&c) {
            while tight.ends_with(char::is_whitespace) {
                tight.pop();
            }
        }
        tight.push(c);
    }

    // Exactly one space after punctuation when something follows.
    let mut spaced = String::with_capacity(tight.len() + 8);
    let mut chars = tight.chars().peekable();
    while let Some(c) = chars.next() {
        spaced.push(c);
        if SPACED_PUNCT.contains(&c) && chars.peek().is_some_and(|n| !n.is_whitespace()) {
            spaced.push(' ');
        }
    }

    spaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Replace each ASR word token whose tone-stripped base form occurs in the
/// donor with the donor's toned variant closest in char length (ties go to
/// the variant seen earliest in the donor). Unknown base forms and
/// punctuation pass through untouched.
pub fn project_diacritics(asr_text: &str, donor: &str) -> String {
    let asr_tokens = word_tokens(asr_text);

    // base form → distinct toned variants in donor order.
    let mut variants: HashMap<String, Vec<String>> = HashMap::new();
    for token in word_tokens(donor) {
        if let Token::Word(word) = &token {
            if token.is_letter_word() {
                let entry = variants.entry(strip_tone_marks(word)).or_default();
                if !entry.contains(word) {
                    entry.push(word.clone());
                }
            }
        }
    }

    let projected: Vec<Token> = asr_tokens
        .into_iter()
        .map(|token| match &token {
            Token::Word(word) if token.is_letter_word() => {
                match variants.get(&strip_tone_marks(word)) {
                    Some(toned) => {
                        let target = word.chars().count();
                        // min_by_key keeps the first minimum → donor order.
                        let best = toned
                            .iter()
                            .min_by_key(|v| v.chars().count().abs_diff(target))
                            .cloned()
                            .unwrap_or_else(|| word.clone());
                        Token::Word(best)
                    }
                    None => token,
                }
            }
            _ => token,
        })
        .collect();

    normalize_punctuation(&join_tokens(&projected))
}

/// Try to raise the similarity of `original_asr` against `donor` to at
/// least `target`. Returns the best attempt and its score against the
/// donor; the caller decides acceptance (corpus-wide re-scoring plus the
/// validation gate).
pub fn post_process_boost(
    engine: &mut SimilarityEngine,
    original_asr: &str,
    donor: &str,
    target: f64,
) -> BoostResult {
    if original_asr.is_empty() || donor.is_empty() {
        return BoostResult {
            text: original_asr.to_string(),
            score: 0.0,
        };
    }

    let repaired = normalize_punctuation(&apply_common_fixes(original_asr));

    let mut best_text = project_diacritics(&repaired, donor);
    let mut best_score = engine.score(&best_text, donor);

    if best_score < target {
        // Aggressive pass: discard the ASR's own diacritics entirely, then
        // project everything from the donor.
        let retry = project_diacritics(&normalize(&repaired, true), donor);
        let retry_score = engine.score(&retry, donor);
        if retry_score > best_score {
            log::debug!(
                "aggressive projection improved boost score {:.2} -> {:.2}",
                best_score,
                retry_score
            );
            best_text = retry;
            best_score = retry_score;
        }
    }

    BoostResult {
        text: best_text,
        score: best_score,
    }
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

fn apply_common_fixes(s: &str) -> String {
    let mut out = s.to_string();
    for (from, to) in COMMON_FIXES {
        out = out.replace(from, to);
    }
    out
}

/// Join tokens with single spaces, except no space before punctuation.
fn join_tokens(tokens: &[Token]) -> String {
    let mut out = String::new();
    for token in tokens {
        if !out.is_empty() && !matches!(token, Token::Punct(_)) {
            out.push(' ');
        }
        out.push_str(&token.text());
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
