//! Composite similarity scoring for Vietnamese ASR alignment.
//!
//! [`SimilarityEngine::score`] blends three signals over normalized text:
//!
//! ```text
//! vi_fuzzy = max(ratio(tone forms), ratio(tone-stripped forms))
//! w_ratio  = weighted_ratio(tone forms)
//! jaccard  = max(word-set Jaccard over tone forms, over tone-stripped forms)
//! score    = (0.55·vi_fuzzy + 0.25·w_ratio + 0.20·jaccard) · len_penalty
//! ```
//!
//! with `len_penalty = min(words) / max(words)`. The weights are part of the
//! crate's scoring contract and must not drift. Empty input on either side
//! scores exactly 0.0 before the cache is consulted, so caching can never
//! change a returned value.

use std::collections::HashSet;

use crate::similarity::cache::{pair_key, SimilarityCache};
use crate::similarity::ratio::{sequence_ratio, weighted_ratio};
use crate::text::normalize;

// ---------------------------------------------------------------------------
// Contract weights
// ---------------------------------------------------------------------------

const W_VI_FUZZY: f64 = 0.55;
const W_WRATIO: f64 = 0.25;
const W_JACCARD: f64 = 0.20;

// ---------------------------------------------------------------------------
// Free scoring functions (cache-free, used by the matcher's fuzzy stages)
// ---------------------------------------------------------------------------

/// Max of the tone-preserving and tone-stripped Ratcliff–Obershelp ratios of
/// the normalized forms of `a` and `b`.
pub fn fuzzy_score_vi(a: &str, b: &str) -> f64 {
    let (a1, b1) = (normalize(a, false), normalize(b, false));
    let (a2, b2) = (normalize(a, true), normalize(b, true));
    fuzzy_score_norms(&a1, &a2, &b1, &b2)
}

/// [`fuzzy_score_vi`] over pre-normalized forms; lets callers that hold a
/// parsed corpus skip re-normalizing every candidate.
pub fn fuzzy_score_norms(a_tone: &str, a_no_tone: &str, b_tone: &str, b_no_tone: &str) -> f64 {
    sequence_ratio(a_tone, b_tone).max(sequence_ratio(a_no_tone, b_no_tone))
}

/// Jaccard similarity of two word sets; 0.0 when either set is empty.
pub fn jaccard(a: &HashSet<&str>, b: &HashSet<&str>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.union(b).count();
    intersection as f64 / union as f64
}

// ---------------------------------------------------------------------------
// SimilarityEngine
// ---------------------------------------------------------------------------

/// Stateful similarity scorer owning a bounded memoization cache.
///
/// The engine is the only mutable state in the core; one instance per worker
/// (or an externally synchronized shared one) is the intended concurrency
/// model.
///
/// # Example
///
/// ```
/// use viet_align::similarity::SimilarityEngine;
///
/// let mut engine = SimilarityEngine::with_defaults();
/// let s = engine.score("toi di lam", "Tôi đi làm.");
/// assert!(s > 0.5 && s <= 1.0);
/// assert_eq!(engine.score("toi di lam", ""), 0.0);
/// ```
#[derive(Debug)]
pub struct SimilarityEngine {
    cache: SimilarityCache,
}

impl SimilarityEngine {
    /// Create an engine with an explicitly sized cache.
    pub fn new(cache_max_entries: usize, cache_evict_batch: usize) -> Self {
        Self {
            cache: SimilarityCache::new(cache_max_entries, cache_evict_batch),
        }
    }

    /// Create an engine with the stock cache bound (3000 entries, evicting
    /// 500 at a time).
    pub fn with_defaults() -> Self {
        Self::new(3000, 500)
    }

    /// Composite similarity of `a` and `b` in `[0.0, 1.0]`.
    ///
    /// Either input empty → exactly 0.0. Memoized on the raw input pair;
    /// repeated calls return bit-identical values.
    pub fn score(&mut self, a: &str, b: &str) -> f64 {
        if a.is_empty() || b.is_empty() {
            return 0.0;
        }

        let key = pair_key(a, b);
        if let Some(cached) = self.cache.get(key) {
            return cached;
        }

        let combined = compute_score(a, b);
        self.cache.insert(key, combined);
        combined
    }

    /// Number of memoized pairs (observability hook for callers).
    pub fn cached_pairs(&self) -> usize {
        self.cache.len()
    }
}

/// The uncached composite computation behind [`SimilarityEngine::score`].
fn compute_score(a: &str, b: &str) -> f64 {
    let n1 = normalize(a, false);
    let n2 = normalize(b, false);
    let n1_nt = normalize(a, true);
    let n2_nt = normalize(b, true);

    let vi_fuzzy = fuzzy_score_norms(&n1, &n1_nt, &n2, &n2_nt);
    let w_ratio = weighted_ratio(&n1, &n2);

    let words1: HashSet<&str> = n1.split_whitespace().collect();
    let words2: HashSet<&str> = n2.split_whitespace().collect();
    let words1_nt: HashSet<&str> = n1_nt.split_whitespace().collect();
    let words2_nt: HashSet<&str> = n2_nt.split_whitespace().collect();
    let jacc = jaccard(&words1, &words2).max(jaccard(&words1_nt, &words2_nt));

    // Word counts (not set sizes) drive the penalty — duplicates count.
    let len1 = n1.split_whitespace().count();
    let len2 = n2.split_whitespace().count();
    let len_penalty = if len1.max(len2) > 0 {
        len1.min(len2) as f64 / len1.max(len2) as f64
    } else {
        1.0
    };

    (W_VI_FUZZY * vi_fuzzy + W_WRATIO * w_ratio + W_JACCARD * jacc) * len_penalty
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_inputs_score_zero() {
        let mut engine = SimilarityEngine::with_defaults();
        assert_eq!(engine.score("", "gì đó"), 0.0);
        assert_eq!(engine.score("gì đó", ""), 0.0);
        assert_eq!(engine.score("", ""), 0.0);
        // Empty-input scores never enter the cache.
        assert_eq!(engine.cached_pairs(), 0);
    }

    #[test]
    fn identical_text_scores_one() {
        let mut engine = SimilarityEngine::with_defaults();
        let s = engine.score("Hôm nay trời đẹp", "Hôm nay trời đẹp");
        assert!((s - 1.0).abs() < 1e-12, "got {s}");
    }

    #[test]
    fn score_stays_in_unit_interval() {
        let mut engine = SimilarityEngine::with_defaults();
        for (a, b) in [
            ("toi di lam", "Tôi đi làm."),
            ("xyz", "hoàn toàn khác"),
            ("một", "một câu rất dài với nhiều từ khác nhau ở đây"),
        ] {
            let s = engine.score(a, b);
            assert!((0.0..=1.0).contains(&s), "{a:?} vs {b:?} → {s}");
        }
    }

    #[test]
    fn tone_stripped_input_still_scores_high() {
        let mut engine = SimilarityEngine::with_defaults();
        let s = engine.score("hom nay troi dep", "hôm nay trời đẹp");
        assert!(s > 0.8, "got {s}");
    }

    #[test]
    fn repeated_calls_are_bit_identical() {
        let mut engine = SimilarityEngine::with_defaults();
        let first = engine.score("cau be di hoc som", "Cậu bé đi học rất sớm.");
        let second = engine.score("cau be di hoc som", "Cậu bé đi học rất sớm.");
        let third = engine.score("cau be di hoc som", "Cậu bé đi học rất sớm.");
        assert_eq!(first.to_bits(), second.to_bits());
        assert_eq!(first.to_bits(), third.to_bits());
    }

    #[test]
    fn length_divergence_is_penalized() {
        let mut engine = SimilarityEngine::with_defaults();
        let close = engine.score("tôi đi làm", "tôi đi làm sớm");
        let far = engine.score("tôi đi làm", "tôi đi làm rất sớm vì hôm nay trời còn đẹp lắm");
        assert!(close > far, "close={close} far={far}");
    }

    // --- free functions ------------------------------------------------------

    #[test]
    fn fuzzy_score_vi_takes_max_of_tone_forms() {
        // Tone-stripped forms are identical → ratio 1.0 dominates.
        assert_eq!(fuzzy_score_vi("hom nay troi dep", "hóm nảy trọi dẹp"), 1.0);
    }

    #[test]
    fn jaccard_of_empty_sets_is_zero() {
        let empty = HashSet::new();
        let full: HashSet<&str> = ["a", "b"].into_iter().collect();
        assert_eq!(jaccard(&empty, &full), 0.0);
        assert_eq!(jaccard(&full, &empty), 0.0);
        assert_eq!(jaccard(&empty, &empty), 0.0);
    }

    #[test]
    fn jaccard_counts_intersection_over_union() {
        let a: HashSet<&str> = ["tôi", "đi", "làm"].into_iter().collect();
        let b: HashSet<&str> = ["tôi", "đi", "học"].into_iter().collect();
        assert!((jaccard(&a, &b) - 0.5).abs() < 1e-12);
    }
}
