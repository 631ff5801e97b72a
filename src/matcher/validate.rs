//! Replacement validation: guards against runaway length or content
//! divergence before a boosted candidate replaces the current text.
//!
//! The rules are word-count based with a similarity backstop in the
//! moderate-divergence bands:
//!
//! | Candidate words vs original | Verdict |
//! |-----------------------------|---------|
//! | `< 0.2×` or `> 8×`          | reject |
//! | `< 0.4×`                    | require composite score ≥ 0.2 |
//! | `> 3×`                      | require composite score ≥ 0.3 |
//! | otherwise                   | accept |
//!
//! Malformed inputs (either side empty) are a distinct
//! [`ValidationError`], not a silent accept — the caller decides the
//! fail-open policy explicitly.

use thiserror::Error;

use crate::similarity::SimilarityEngine;

// ---------------------------------------------------------------------------
// Bounds
// ---------------------------------------------------------------------------

/// Hard length gate: candidate must stay within `[0.2×, 8×]` of the
/// original word count (inclusive on both ends).
const MIN_LEN_FACTOR: f64 = 0.2;
const MAX_LEN_FACTOR: f64 = 8.0;

/// Below `0.4×` the candidate must still resemble the original.
const SHORT_LEN_FACTOR: f64 = 0.4;
const SHORT_MIN_SIMILARITY: f64 = 0.2;

/// Above `3×` likewise, with a slightly higher bar.
const LONG_LEN_FACTOR: f64 = 3.0;
const LONG_MIN_SIMILARITY: f64 = 0.3;

// ---------------------------------------------------------------------------
// ValidationError
// ---------------------------------------------------------------------------

/// Inputs the validator cannot meaningfully judge.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The original text is empty — there is nothing to compare against.
    #[error("validation input malformed: original text is empty")]
    EmptyOriginal,

    /// The candidate text is empty — a replacement cannot be empty.
    #[error("validation input malformed: candidate text is empty")]
    EmptyCandidate,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// The hard length gate on its own: `true` when `cand_words` lies within
/// `[0.2 × orig_words, 8 × orig_words]`, boundaries inclusive.
pub fn length_within_bounds(orig_words: usize, cand_words: usize) -> bool {
    let orig = orig_words as f64;
    let cand = cand_words as f64;
    cand >= orig * MIN_LEN_FACTOR && cand <= orig * MAX_LEN_FACTOR
}

/// Decide whether `candidate` is an acceptable replacement for `original`.
///
/// Returns `Ok(false)` for a rejected replacement and `Err(_)` only for
/// malformed inputs — the two outcomes are deliberately distinct so callers
/// cannot confuse "bad replacement" with "unjudgeable input".
pub fn validate_improvement(
    engine: &mut SimilarityEngine,
    original: &str,
    candidate: &str,
) -> Result<bool, ValidationError> {
    if original.trim().is_empty() {
        return Err(ValidationError::EmptyOriginal);
    }
    if candidate.trim().is_empty() {
        return Err(ValidationError::EmptyCandidate);
    }

    let orig_words = original.split_whitespace().count();
    let cand_words = candidate.split_whitespace().count();

    if !length_within_bounds(orig_words, cand_words) {
        return Ok(false);
    }

    let orig = orig_words as f64;
    let cand = cand_words as f64;

    if cand < orig * SHORT_LEN_FACTOR && engine.score(original, candidate) < SHORT_MIN_SIMILARITY {
        return Ok(false);
    }
    if cand > orig * LONG_LEN_FACTOR && engine.score(original, candidate) < LONG_MIN_SIMILARITY {
        return Ok(false);
    }

    Ok(true)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> SimilarityEngine {
        SimilarityEngine::with_defaults()
    }

    // --- hard length gate ----------------------------------------------------

    #[test]
    fn length_gate_rejects_below_one_fifth() {
        // 19 words vs 100: ratio 0.19 < 0.2 → out of bounds.
        assert!(!length_within_bounds(100, 19));
    }

    #[test]
    fn length_gate_is_inclusive_at_exactly_one_fifth() {
        assert!(length_within_bounds(100, 20));
        assert!(length_within_bounds(5, 1));
    }

    #[test]
    fn length_gate_is_inclusive_at_exactly_eight_times() {
        assert!(length_within_bounds(2, 16));
        assert!(!length_within_bounds(2, 17));
    }

    // --- validate_improvement ------------------------------------------------

    #[test]
    fn comparable_lengths_are_accepted() {
        let ok = validate_improvement(
            &mut engine(),
            "toi di lam som",
            "Tôi đi làm sớm.",
        )
        .unwrap();
        assert!(ok);
    }

    #[test]
    fn extreme_truncation_is_rejected() {
        let original = "một hai ba bốn năm sáu bảy tám chín mười";
        let ok = validate_improvement(&mut engine(), original, "một").unwrap();
        assert!(!ok, "1/10 words is below the 0.2 gate");
    }

    #[test]
    fn extreme_expansion_is_rejected() {
        let candidate: String = std::iter::repeat("từ").take(20).collect::<Vec<_>>().join(" ");
        let ok = validate_improvement(&mut engine(), "chỉ hai", &candidate).unwrap();
        assert!(!ok, "20/2 words is above the 8x gate");
    }

    #[test]
    fn moderate_truncation_needs_residual_similarity() {
        // 3 of 10 words (ratio 0.3 — inside the hard gate, below 0.4) with
        // no shared content: the similarity backstop rejects it.
        let original = "một hai ba bốn năm sáu bảy tám chín mười";
        let ok = validate_improvement(&mut engine(), original, "xyz abc qrs").unwrap();
        assert!(!ok);
    }

    #[test]
    fn moderate_truncation_with_shared_content_is_accepted() {
        // 7 of 18 words (ratio ~0.39, inside the hard gate, below 0.4) and a
        // verbatim prefix: the partial-ratio signal keeps the score above
        // the 0.2 backstop.
        let original = "anh ấy đi làm từ sáng sớm và về nhà lúc chiều muộn mỗi ngày trong tuần này";
        let candidate = "anh ấy đi làm từ sáng sớm";
        let ok = validate_improvement(&mut engine(), original, candidate).unwrap();
        assert!(ok);
    }

    #[test]
    fn moderate_expansion_needs_residual_similarity() {
        // 8 of 2 words would pass the hard gate (exactly 8x is inclusive)
        // but unrelated content fails the 0.3 backstop above 3x.
        let candidate = "nội dung hoàn toàn không liên quan gì cả";
        let ok = validate_improvement(&mut engine(), "xyz qrs", candidate).unwrap();
        assert!(!ok);
    }

    // --- malformed inputs ----------------------------------------------------

    #[test]
    fn empty_original_is_a_distinct_error() {
        let err = validate_improvement(&mut engine(), "", "gì đó").unwrap_err();
        assert_eq!(err, ValidationError::EmptyOriginal);
    }

    #[test]
    fn empty_candidate_is_a_distinct_error() {
        let err = validate_improvement(&mut engine(), "gì đó", "  ").unwrap_err();
        assert_eq!(err, ValidationError::EmptyCandidate);
    }
}
