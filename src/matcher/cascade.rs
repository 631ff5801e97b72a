//! The staged exact → fuzzy matching cascade.
//!
//! Both entry points run the same four stages and differ only in candidate
//! construction and acceptance guards:
//!
//! * [`fast_match`] — pre-parsed corpus sentences, top-3 fuzzy candidates,
//!   word-overlap guards.
//! * [`simple_match`] — fresh split of the full reference text (looser
//!   minimum sentence length), top-5 candidates, length-ratio guards.
//!
//! [`find_best_match`] dispatches: parsed corpora try the fast cascade
//! first and fall back to the simple one, which recovers short sentences
//! the pre-parse filter dropped. No stage ever fabricates a match — when
//! every threshold fails the caller keeps its input.

use std::collections::HashSet;

use crate::corpus::{CorpusRef, Sentence};
use crate::similarity::fuzzy_score_norms;
use crate::text::normalize::fold_d;
use crate::text::{normalize, split_sentences};

// ---------------------------------------------------------------------------
// Stage thresholds (scoring contract, not configuration)
// ---------------------------------------------------------------------------

/// Fast path: minimum fuzzy score, tone-preserving stage.
const FAST_TONE_SCORE: f64 = 0.7;
/// Fast path: minimum fuzzy score, tone-stripped stage.
const FAST_NO_TONE_SCORE: f64 = 0.6;
/// Fast path: word-overlap guard (tone-preserving) …
const FAST_TONE_OVERLAP: f64 = 0.3;
/// … or a raw score high enough to accept without overlap.
const FAST_TONE_SCORE_OVERRIDE: f64 = 0.85;
const FAST_NO_TONE_OVERLAP: f64 = 0.25;
const FAST_NO_TONE_SCORE_OVERRIDE: f64 = 0.8;
/// Fast path ranks the top 3 fuzzy candidates.
const FAST_TOP_K: usize = 3;

/// Simple path: minimum fuzzy scores per stage.
const SIMPLE_TONE_SCORE: f64 = 0.6;
const SIMPLE_NO_TONE_SCORE: f64 = 0.5;
/// Simple path: acceptable candidate/query word-count ratio windows.
const SIMPLE_TONE_LEN_RATIO: (f64, f64) = (0.3, 4.0);
const SIMPLE_NO_TONE_LEN_RATIO: (f64, f64) = (0.2, 5.0);
/// Simple path ranks the top 5 fuzzy candidates.
const SIMPLE_TOP_K: usize = 5;

/// Simple path keeps split fragments longer than this many chars.
const SIMPLE_MIN_SENTENCE_CHARS: usize = 3;

// ---------------------------------------------------------------------------
// MatchCandidate
// ---------------------------------------------------------------------------

/// One scored reference sentence, produced per query by [`fuzzy_topk`].
#[derive(Debug, Clone)]
pub struct MatchCandidate<'a> {
    /// Fuzzy score in `[0, 1]`.
    pub score: f64,
    /// 1-based rank within the returned top-k.
    pub rank: usize,
    /// Index of the sentence in the candidate list (corpus order).
    pub index: usize,
    /// The candidate sentence (borrowed from the corpus).
    pub sentence: &'a Sentence,
}

// ---------------------------------------------------------------------------
// Query forms
// ---------------------------------------------------------------------------

/// The query's normalized forms, computed once per match call.
struct QueryForms {
    tone: String,
    no_tone: String,
    words: HashSet<String>,
    words_no_tone: HashSet<String>,
    word_count: usize,
}

impl QueryForms {
    fn of(query: &str) -> Self {
        let tone = normalize(query, false);
        let no_tone = normalize(query, true);
        let words = tone.split_whitespace().map(str::to_string).collect();
        let words_no_tone = no_tone.split_whitespace().map(str::to_string).collect();
        let word_count = query.split_whitespace().count();
        Self {
            tone,
            no_tone,
            words,
            words_no_tone,
            word_count,
        }
    }
}

// ---------------------------------------------------------------------------
// Stage primitives
// ---------------------------------------------------------------------------

/// Normalized equality key: leading/trailing punctuation and whitespace do
/// not count. ASR output regularly drops or invents terminal punctuation,
/// so `"hom nay troi dep"` must equal `"hom nay troi dep."`.
fn exact_key(normalized: &str) -> &str {
    normalized.trim_matches(|c: char| {
        c.is_whitespace() || matches!(c, '.' | '!' | '?' | '…' | ',' | ':' | ';')
    })
}

/// First sentence (corpus order) whose normalized form equals the query's,
/// score defined as 1.0.
///
/// Tone-stripped comparison additionally folds `đ` to `d` — diacritic-free
/// ASR output writes plain `d`, and `đ` alone survives tone stripping.
pub fn exact_match<'a>(
    query_norm: &str,
    sentences: &'a [Sentence],
    strip_tone: bool,
) -> Option<&'a Sentence> {
    let key = exact_key(query_norm);
    if key.is_empty() {
        return None;
    }
    let key = if strip_tone {
        fold_d(key)
    } else {
        key.to_string()
    };
    sentences.iter().find(|s| {
        if strip_tone {
            fold_d(exact_key(&s.normalized_no_tone)) == key
        } else {
            exact_key(&s.normalized) == key
        }
    })
}

/// Score every candidate with the tone-aware fuzzy ratio and return the
/// top `k`, ranked by score descending with corpus order breaking ties
/// (stable sort keeps the earliest sentence first).
pub fn fuzzy_topk<'a>(
    query_tone: &str,
    query_no_tone: &str,
    sentences: &'a [Sentence],
    k: usize,
) -> Vec<MatchCandidate<'a>> {
    let mut scored: Vec<(f64, usize)> = sentences
        .iter()
        .enumerate()
        .map(|(index, s)| {
            let score =
                fuzzy_score_norms(query_tone, query_no_tone, &s.normalized, &s.normalized_no_tone);
            (score, index)
        })
        .collect();
    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

    scored
        .into_iter()
        .take(k)
        .enumerate()
        .map(|(rank, (score, index))| MatchCandidate {
            score,
            rank: rank + 1,
            index,
            sentence: &sentences[index],
        })
        .collect()
}

/// `|query ∩ candidate| / |query|` over word sets; 0.0 when either is empty.
fn word_overlap(query_words: &HashSet<String>, cand_words: &HashSet<String>) -> f64 {
    if query_words.is_empty() || cand_words.is_empty() {
        return 0.0;
    }
    let shared = query_words.intersection(cand_words).count();
    shared as f64 / query_words.len() as f64
}

// ---------------------------------------------------------------------------
// Cascades
// ---------------------------------------------------------------------------

/// The fast cascade over pre-parsed corpus sentences.
///
/// Returns the matched sentence, or `None` when every stage fails its
/// threshold.
pub fn fast_match<'a>(query: &str, sentences: &'a [Sentence]) -> Option<&'a Sentence> {
    if query.trim().is_empty() || sentences.is_empty() {
        return None;
    }
    let q = QueryForms::of(query);

    // Stage 1: exact, tone-preserving.
    if let Some(hit) = exact_match(&q.tone, sentences, false) {
        log::info!("exact match: {:?}", preview(&hit.raw));
        return Some(hit);
    }

    // Stage 2: exact, tone-stripped.
    if let Some(hit) = exact_match(&q.no_tone, sentences, true) {
        log::info!("exact no-tone match: {:?}", preview(&hit.raw));
        return Some(hit);
    }

    // Stage 3: fuzzy, tone-preserving guards.
    let candidates = fuzzy_topk(&q.tone, &q.no_tone, sentences, FAST_TOP_K);
    if let Some(top) = candidates.first() {
        if top.score > FAST_TONE_SCORE {
            let overlap = word_overlap(&q.words, &top.sentence.words);
            if overlap > FAST_TONE_OVERLAP || top.score > FAST_TONE_SCORE_OVERRIDE {
                log::info!(
                    "fuzzy match (score {:.2}, overlap {:.2}): {:?}",
                    top.score,
                    overlap,
                    preview(&top.sentence.raw)
                );
                return Some(top.sentence);
            }
        }

        // Stage 4: fuzzy, tone-stripped guards (same ranking, looser gates).
        if top.score > FAST_NO_TONE_SCORE {
            let overlap = word_overlap(&q.words_no_tone, &top.sentence.words_no_tone);
            if overlap > FAST_NO_TONE_OVERLAP || top.score > FAST_NO_TONE_SCORE_OVERRIDE {
                log::info!(
                    "fuzzy no-tone match (score {:.2}, overlap {:.2}): {:?}",
                    top.score,
                    overlap,
                    preview(&top.sentence.raw)
                );
                return Some(top.sentence);
            }
        }
    }

    log::debug!("no fast-path match for {:?}", preview(query));
    None
}

/// The simple cascade over a fresh split of `reference_text`.
///
/// Recovers short sentences the corpus pre-parse filter dropped; acceptance
/// uses word-count length-ratio windows instead of overlap guards.
pub fn simple_match(query: &str, reference_text: &str) -> Option<String> {
    if query.trim().is_empty() || reference_text.trim().is_empty() {
        return None;
    }

    let sentences: Vec<Sentence> = split_sentences(reference_text)
        .iter()
        .filter(|s| s.chars().count() > SIMPLE_MIN_SENTENCE_CHARS)
        .map(|s| Sentence::parse(s))
        .collect();
    if sentences.is_empty() {
        return None;
    }

    let q = QueryForms::of(query);

    if let Some(hit) = exact_match(&q.tone, &sentences, false) {
        return Some(hit.raw.clone());
    }
    if let Some(hit) = exact_match(&q.no_tone, &sentences, true) {
        return Some(hit.raw.clone());
    }

    let query_len = q.word_count.max(1) as f64;
    let candidates = fuzzy_topk(&q.tone, &q.no_tone, &sentences, SIMPLE_TOP_K);
    if let Some(top) = candidates.first() {
        let len_ratio = top.sentence.word_count as f64 / query_len;

        if top.score > SIMPLE_TONE_SCORE {
            let (lo, hi) = SIMPLE_TONE_LEN_RATIO;
            if (lo..=hi).contains(&len_ratio) {
                return Some(top.sentence.raw.clone());
            }
        }
        if top.score > SIMPLE_NO_TONE_SCORE {
            let (lo, hi) = SIMPLE_NO_TONE_LEN_RATIO;
            if (lo..=hi).contains(&len_ratio) {
                return Some(top.sentence.raw.clone());
            }
        }
    }

    None
}

/// High-level dispatcher over the corpus supply shape.
///
/// Parsed corpora run [`fast_match`] first, then retry with [`simple_match`]
/// on the full text; raw-text corpora go straight to the simple cascade.
/// `None` means "keep the input" — a no-op contract, not an error.
pub fn find_best_match(query: &str, corpus: &CorpusRef) -> Option<String> {
    if query.trim().is_empty() {
        return None;
    }
    match corpus {
        CorpusRef::Parsed(parsed) => fast_match(query, &parsed.sentences)
            .map(|s| s.raw.clone())
            .or_else(|| simple_match(query, &parsed.full_text)),
        CorpusRef::RawText(text) => simple_match(query, text),
    }
}

/// First 50 chars of `s` for log lines.
fn preview(s: &str) -> String {
    s.chars().take(50).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
