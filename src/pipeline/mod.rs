//! Segment correction pipeline: match → score → boost → validate.
//!
//! [`SegmentCorrector`] owns the similarity engine (and its cache) and drives
//! one ASR segment through the full correction flow:
//!
//! ```text
//! raw ASR segment
//!   ├─ no corpus / empty input            → NoReference
//!   ├─ matching cascade hit               → Corrected
//!   │  (miss keeps the input)             → Unchanged
//!   ├─ accuracy = best score vs reference segments
//!   │  (none qualify → 0.5 sentinel, boost skipped)
//!   └─ accuracy < target
//!        ├─ donor = top fuzzy reference sentence
//!        ├─ overlap < 0.25                → keep as-is
//!        └─ boost (punctuation + diacritics)
//!             ├─ score clears the bar + validator passes → Boosted
//!             ├─ validator rejects        → ValidationFailed (text kept)
//!             └─ score too low            → status kept
//! ```
//!
//! Every path is total: malformed-but-well-typed input degrades to
//! `Unchanged`/`NoReference`, never an error.

use std::fmt;

use crate::boost::{post_process_boost, word_overlap_no_tone};
use crate::config::AlignConfig;
use crate::corpus::{CorpusRef, Sentence};
use crate::matcher::{find_best_match, fuzzy_topk, validate_improvement};
use crate::similarity::SimilarityEngine;
use crate::text::{normalize, split_segments};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Reference segments at or below this char length never participate in
/// accuracy scoring.
const ACCURACY_MIN_SEGMENT_CHARS: usize = 10;

/// Accuracy reported when no reference segment qualifies for scoring.
/// 0.5 means "unknown", not "half right" — anything comparing accuracies
/// across segments must treat it as a sentinel.
const UNKNOWN_ACCURACY: f64 = 0.5;

// ---------------------------------------------------------------------------
// CorrectionStatus / CorrectionOutcome
// ---------------------------------------------------------------------------

/// How a segment left the correction flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorrectionStatus {
    /// The cascade matched a reference sentence; its text replaced the input.
    Corrected,
    /// The booster's output cleared the accuracy bar and the validator.
    Boosted,
    /// Nothing matched and no boost was accepted; the input is kept.
    Unchanged,
    /// No reference corpus was available (or the input was empty).
    NoReference,
    /// A boost cleared the accuracy bar but the validator rejected it; the
    /// pre-boost text is kept.
    ValidationFailed,
}

impl fmt::Display for CorrectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CorrectionStatus::Corrected => "corrected",
            CorrectionStatus::Boosted => "boosted",
            CorrectionStatus::Unchanged => "unchanged",
            CorrectionStatus::NoReference => "no-reference",
            CorrectionStatus::ValidationFailed => "validation-failed",
        };
        f.write_str(s)
    }
}

/// Status after an accepted boost: an unmatched segment becomes `Boosted`;
/// a cascade match keeps reporting `Corrected`.
fn status_after_boost(prior: CorrectionStatus) -> CorrectionStatus {
    match prior {
        CorrectionStatus::Unchanged => CorrectionStatus::Boosted,
        other => other,
    }
}

/// Result of correcting one ASR segment.
#[derive(Debug, Clone)]
pub struct CorrectionOutcome {
    /// The text to keep: matched, boosted, or the input itself.
    pub final_text: String,
    /// Which path produced `final_text`.
    pub status: CorrectionStatus,
    /// Best composite score of `final_text` against the reference segments,
    /// or [`UNKNOWN_ACCURACY`] when none qualified.
    pub accuracy: f64,
}

// ---------------------------------------------------------------------------
// Boost verdict
// ---------------------------------------------------------------------------

/// Outcome of judging one boost attempt against the acceptance rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BoostVerdict {
    Accept,
    ScoreTooLow,
    Rejected,
}

// ---------------------------------------------------------------------------
// SegmentCorrector
// ---------------------------------------------------------------------------

/// Drives the complete correction flow for ASR segments.
///
/// Owns the [`SimilarityEngine`] so repeated segments against the same
/// corpus hit the score cache.
///
/// ```rust
/// use viet_align::config::AlignConfig;
/// use viet_align::corpus::{CorpusRef, ReferenceCorpus};
/// use viet_align::pipeline::SegmentCorrector;
///
/// let mut corrector = SegmentCorrector::new(AlignConfig::default());
/// let corpus = CorpusRef::Parsed(ReferenceCorpus::from_text("Hôm nay trời đẹp."));
/// let outcome = corrector.correct("hom nay troi dep", Some(&corpus));
/// assert_eq!(outcome.final_text, "Hôm nay trời đẹp.");
/// ```
pub struct SegmentCorrector {
    engine: SimilarityEngine,
    config: AlignConfig,
}

impl SegmentCorrector {
    /// Build a corrector with a fresh cache sized from `config`.
    pub fn new(config: AlignConfig) -> Self {
        let engine = SimilarityEngine::new(config.cache.max_entries, config.cache.evict_batch);
        Self { engine, config }
    }

    /// Correct one ASR segment against `corpus`.
    pub fn correct(&mut self, raw: &str, corpus: Option<&CorpusRef>) -> CorrectionOutcome {
        let Some(corpus) = corpus else {
            log::debug!("no reference corpus; passing segment through");
            return Self::no_reference(raw);
        };
        if raw.trim().is_empty() {
            return Self::no_reference(raw);
        }

        let (mut text, mut status) = match find_best_match(raw, corpus) {
            Some(matched) => (matched, CorrectionStatus::Corrected),
            None => (raw.to_string(), CorrectionStatus::Unchanged),
        };
        let measured = self.accuracy_of(&text, corpus);
        let mut accuracy = measured.unwrap_or(UNKNOWN_ACCURACY);
        log::info!("segment {status}: accuracy {accuracy:.2}");

        // Without a measurable reference the boost verdict could only ever
        // compare sentinel against sentinel; skip the whole branch.
        if measured.is_some() && accuracy < self.config.target_score {
            if let Some(donor) = self.pick_donor(&text, corpus) {
                let overlap = word_overlap_no_tone(&text, &donor);
                if overlap < self.config.min_boost_overlap {
                    log::debug!("boost skipped: donor overlap {overlap:.2} below threshold");
                    return CorrectionOutcome {
                        final_text: text,
                        status,
                        accuracy,
                    };
                }

                let boost =
                    post_process_boost(&mut self.engine, &text, &donor, self.config.target_score);
                let boosted_accuracy = self
                    .accuracy_of(&boost.text, corpus)
                    .unwrap_or(UNKNOWN_ACCURACY);
                match self.boost_verdict(&text, accuracy, &boost.text, boosted_accuracy) {
                    BoostVerdict::Accept => {
                        log::info!(
                            "boost accepted: accuracy {accuracy:.2} -> {boosted_accuracy:.2}"
                        );
                        text = boost.text;
                        accuracy = boosted_accuracy;
                        status = status_after_boost(status);
                    }
                    BoostVerdict::Rejected => {
                        log::warn!("boost rejected by validation; keeping prior text");
                        status = CorrectionStatus::ValidationFailed;
                    }
                    BoostVerdict::ScoreTooLow => {
                        log::debug!(
                            "boost discarded: accuracy {boosted_accuracy:.2} below bar"
                        );
                    }
                }
            }
        }

        CorrectionOutcome {
            final_text: text,
            status,
            accuracy,
        }
    }

    /// Cached pair count of the owned engine (diagnostics).
    pub fn cached_pairs(&self) -> usize {
        self.engine.cached_pairs()
    }

    fn no_reference(raw: &str) -> CorrectionOutcome {
        CorrectionOutcome {
            final_text: raw.to_string(),
            status: CorrectionStatus::NoReference,
            accuracy: UNKNOWN_ACCURACY,
        }
    }

    /// Best composite score of `text` against the qualifying segments of the
    /// full reference text; `None` when no segment qualifies.
    fn accuracy_of(&mut self, text: &str, corpus: &CorpusRef) -> Option<f64> {
        let full_text = corpus.full_text();
        let segments = split_segments(full_text, ACCURACY_MIN_SEGMENT_CHARS);
        if segments.is_empty() {
            return None;
        }
        Some(
            segments
                .iter()
                .map(|segment| self.engine.score(text, segment))
                .fold(0.0, f64::max),
        )
    }

    /// The reference sentence most similar to `text` under the tone-aware
    /// fuzzy ratio — the diacritic donor for boosting.
    fn pick_donor(&self, text: &str, corpus: &CorpusRef) -> Option<String> {
        let sentences: Vec<Sentence> = corpus
            .sentence_texts()
            .iter()
            .map(|s| Sentence::parse(s))
            .collect();
        if sentences.is_empty() {
            return None;
        }
        let tone = normalize(text, false);
        let no_tone = normalize(text, true);
        fuzzy_topk(&tone, &no_tone, &sentences, 1)
            .first()
            .map(|c| c.sentence.raw.clone())
    }

    /// Judge one boost attempt: the boosted text must beat both the prior
    /// accuracy and the target, then clear the replacement validator. A
    /// validator error (malformed input) fails open — the boost is accepted
    /// with a warning rather than silently dropped.
    fn boost_verdict(
        &mut self,
        prior_text: &str,
        prior_accuracy: f64,
        boosted_text: &str,
        boosted_accuracy: f64,
    ) -> BoostVerdict {
        if boosted_accuracy < prior_accuracy.max(self.config.target_score) {
            return BoostVerdict::ScoreTooLow;
        }
        match validate_improvement(&mut self.engine, prior_text, boosted_text) {
            Ok(true) => BoostVerdict::Accept,
            Ok(false) => BoostVerdict::Rejected,
            Err(err) => {
                log::warn!("replacement validation inconclusive ({err}); accepting boost");
                BoostVerdict::Accept
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::ReferenceCorpus;

    const ARTICLE: &str =
        "Hôm nay trời đẹp. Cậu bé đi học rất sớm. Chiều nay có mưa rào ở phía bắc thành phố.";

    fn corrector() -> SegmentCorrector {
        SegmentCorrector::new(AlignConfig::default())
    }

    fn parsed(text: &str) -> CorpusRef {
        CorpusRef::Parsed(ReferenceCorpus::from_text(text))
    }

    // --- pass-through paths --------------------------------------------------

    #[test]
    fn missing_corpus_passes_segment_through() {
        let outcome = corrector().correct("gì đó bất kỳ", None);
        assert_eq!(outcome.status, CorrectionStatus::NoReference);
        assert_eq!(outcome.final_text, "gì đó bất kỳ");
        assert_eq!(outcome.accuracy, UNKNOWN_ACCURACY);
    }

    #[test]
    fn empty_segment_passes_through() {
        let corpus = parsed(ARTICLE);
        let outcome = corrector().correct("   ", Some(&corpus));
        assert_eq!(outcome.status, CorrectionStatus::NoReference);
        assert_eq!(outcome.final_text, "   ");
    }

    // --- matching ------------------------------------------------------------

    #[test]
    fn matched_segment_is_corrected_with_high_accuracy() {
        let corpus = parsed(ARTICLE);
        let outcome = corrector().correct("hom nay troi dep", Some(&corpus));
        assert_eq!(outcome.status, CorrectionStatus::Corrected);
        assert_eq!(outcome.final_text, "Hôm nay trời đẹp.");
        assert!(outcome.accuracy > 0.8, "accuracy {}", outcome.accuracy);
    }

    #[test]
    fn unrelated_segment_stays_unchanged() {
        let corpus = parsed(ARTICLE);
        let outcome = corrector().correct("xyz abc qrs", Some(&corpus));
        assert_eq!(outcome.status, CorrectionStatus::Unchanged);
        assert_eq!(outcome.final_text, "xyz abc qrs");
        assert!(outcome.accuracy < 0.8);
    }

    #[test]
    fn subset_segment_boost_is_discarded_below_bar() {
        // "mot hai ba" overlaps the donor fully, so the booster runs, but a
        // 3-word projection against a 12-word reference cannot clear the
        // accuracy bar; the input is kept verbatim.
        let corpus = parsed("Một hai ba bốn năm sáu bảy tám chín mười một hai.");
        let outcome = corrector().correct("mot hai ba", Some(&corpus));
        assert_eq!(outcome.status, CorrectionStatus::Unchanged);
        assert_eq!(outcome.final_text, "mot hai ba");
    }

    // --- accuracy sentinel ---------------------------------------------------

    #[test]
    fn accuracy_falls_back_to_sentinel_without_qualifying_segments() {
        // "Tôi đi làm" is exactly 10 chars — below the segment filter, so
        // accuracy cannot be measured even though the match succeeded.
        let corpus = parsed("Tôi đi làm.");
        let outcome = corrector().correct("toi di lam", Some(&corpus));
        assert_eq!(outcome.status, CorrectionStatus::Corrected);
        assert_eq!(outcome.final_text, "Tôi đi làm.");
        assert_eq!(outcome.accuracy, UNKNOWN_ACCURACY);
    }

    #[test]
    fn unmeasurable_accuracy_skips_the_booster_entirely() {
        // Same corpus as above: without a qualifying segment there is no bar
        // a boost could clear, so no similarity scoring runs at all.
        let corpus = parsed("Tôi đi làm.");
        let mut corrector = corrector();
        let outcome = corrector.correct("toi di lam", Some(&corpus));
        assert_eq!(outcome.status, CorrectionStatus::Corrected);
        assert_eq!(outcome.accuracy, UNKNOWN_ACCURACY);
        assert_eq!(corrector.cached_pairs(), 0);
    }

    // --- boost verdicts ------------------------------------------------------

    #[test]
    fn verdict_accepts_validated_improvement() {
        let verdict =
            corrector().boost_verdict("toi di lam som", 0.4, "Tôi đi làm sớm.", 0.9);
        assert_eq!(verdict, BoostVerdict::Accept);
    }

    #[test]
    fn verdict_requires_the_target_even_when_improving() {
        // 0.4 → 0.7 improves but stays under the 0.80 target.
        let verdict =
            corrector().boost_verdict("toi di lam som", 0.4, "Tôi đi làm sớm.", 0.7);
        assert_eq!(verdict, BoostVerdict::ScoreTooLow);
    }

    #[test]
    fn verdict_rejects_extreme_truncation_despite_the_score() {
        let prior = "một hai ba bốn năm sáu bảy tám chín mười";
        let verdict = corrector().boost_verdict(prior, 0.3, "một", 0.95);
        assert_eq!(verdict, BoostVerdict::Rejected);
    }

    #[test]
    fn verdict_fails_open_on_unjudgeable_input() {
        let verdict = corrector().boost_verdict("gì đó", 0.3, "   ", 0.95);
        assert_eq!(verdict, BoostVerdict::Accept);
    }

    #[test]
    fn accepted_boost_upgrades_only_unmatched_segments() {
        // A cascade match keeps reporting where its text came from even when
        // a later boost replaces it.
        assert_eq!(
            status_after_boost(CorrectionStatus::Unchanged),
            CorrectionStatus::Boosted
        );
        assert_eq!(
            status_after_boost(CorrectionStatus::Corrected),
            CorrectionStatus::Corrected
        );
    }

    // --- status display ------------------------------------------------------

    #[test]
    fn statuses_render_as_stable_tokens() {
        assert_eq!(CorrectionStatus::Corrected.to_string(), "corrected");
        assert_eq!(CorrectionStatus::Boosted.to_string(), "boosted");
        assert_eq!(CorrectionStatus::Unchanged.to_string(), "unchanged");
        assert_eq!(CorrectionStatus::NoReference.to_string(), "no-reference");
        assert_eq!(
            CorrectionStatus::ValidationFailed.to_string(),
            "validation-failed"
        );
    }
}
