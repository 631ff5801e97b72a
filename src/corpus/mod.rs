//! Reference corpus model: parsed sentences, supply-shape handling and the
//! per-article corpus store.
//!
//! A reference corpus arrives in one of two shapes, modeled as the tagged
//! [`CorpusRef`] variant instead of runtime shape-sniffing:
//!
//! * [`CorpusRef::Parsed`] — full text plus pre-parsed sentences (the JSON
//!   object shape `{"full_text": …, "sentences": [{"text": …}, …]}`).
//! * [`CorpusRef::RawText`] — a bare full-text string, split on demand.
//!
//! Anything else is a contract violation surfaced as
//! [`CorpusError::UnsupportedShape`] — never silently treated as "no match".
//!
//! All corpus data is immutable after construction and safe for
//! unsynchronized concurrent reads.

use std::collections::{HashMap, HashSet};

use serde::Deserialize;
use thiserror::Error;

use crate::text::{normalize, split_sentences};

/// Sentences at or below this char length are dropped when pre-parsing a
/// corpus from raw text (captions, initials and numbering fragments add
/// noise, not signal). The simple matcher path re-splits the full text with
/// a looser filter to recover short sentences this drops.
const MIN_SENTENCE_CHARS: usize = 10;

// ---------------------------------------------------------------------------
// CorpusError
// ---------------------------------------------------------------------------

/// Errors raised while building a corpus from supplied data.
#[derive(Debug, Error)]
pub enum CorpusError {
    /// The supplied JSON was neither the pre-parsed object shape nor a bare
    /// string.
    #[error(
        "unsupported corpus shape: expected {{\"full_text\", \"sentences\"}} or a string ({0})"
    )]
    UnsupportedShape(String),
}

// ---------------------------------------------------------------------------
// Sentence
// ---------------------------------------------------------------------------

/// One reference sentence with its precomputed comparison forms.
///
/// Built once at corpus load; immutable thereafter.
#[derive(Debug, Clone)]
pub struct Sentence {
    /// Original sentence text as it appears in the reference transcript.
    pub raw: String,
    /// Tone-preserving normalized form.
    pub normalized: String,
    /// Tone-stripped normalized form.
    pub normalized_no_tone: String,
    /// Word set of the tone-preserving form.
    pub words: HashSet<String>,
    /// Word set of the tone-stripped form.
    pub words_no_tone: HashSet<String>,
    /// Whitespace-split word count of the raw text.
    pub word_count: usize,
}

impl Sentence {
    /// Precompute every comparison form for `raw`.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim().to_string();
        let normalized = normalize(&raw, false);
        let normalized_no_tone = normalize(&raw, true);
        let words = normalized.split_whitespace().map(str::to_string).collect();
        let words_no_tone = normalized_no_tone
            .split_whitespace()
            .map(str::to_string)
            .collect();
        let word_count = raw.split_whitespace().count();
        Self {
            raw,
            normalized,
            normalized_no_tone,
            words,
            words_no_tone,
            word_count,
        }
    }
}

// ---------------------------------------------------------------------------
// ReferenceCorpus
// ---------------------------------------------------------------------------

/// An ordered sequence of parsed [`Sentence`]s plus the original full text.
#[derive(Debug, Clone)]
pub struct ReferenceCorpus {
    /// The complete reference transcript.
    pub full_text: String,
    /// Parsed sentences in original order.
    pub sentences: Vec<Sentence>,
}

impl ReferenceCorpus {
    /// Build a corpus from raw transcript text: split into sentences, drop
    /// fragments of [`MIN_SENTENCE_CHARS`] chars or fewer, precompute
    /// comparison forms.
    pub fn from_text(text: &str) -> Self {
        let sentences = split_sentences(text)
            .iter()
            .filter(|s| s.chars().count() > MIN_SENTENCE_CHARS)
            .map(|s| Sentence::parse(s))
            .collect();
        Self {
            full_text: text.to_string(),
            sentences,
        }
    }
}

// ---------------------------------------------------------------------------
// CorpusRef — the supply contract
// ---------------------------------------------------------------------------

/// JSON record for one pre-parsed sentence. Extra fields (timing, ids …)
/// from upstream tooling are ignored.
#[derive(Debug, Deserialize)]
struct SentenceRecord {
    text: String,
}

/// The two accepted JSON supply shapes.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SupplyShape {
    Parsed {
        full_text: String,
        sentences: Vec<SentenceRecord>,
    },
    Text(String),
}

/// A reference corpus in one of its two supply shapes.
#[derive(Debug, Clone)]
pub enum CorpusRef {
    /// Pre-parsed corpus with precomputed sentence forms.
    Parsed(ReferenceCorpus),
    /// Raw full text, split on demand by the matcher.
    RawText(String),
}

impl CorpusRef {
    /// Parse a corpus from its JSON supply shape.
    ///
    /// # Errors
    ///
    /// [`CorpusError::UnsupportedShape`] when the JSON is neither the
    /// pre-parsed object shape nor a bare string.
    ///
    /// # Examples
    ///
    /// ```
    /// use viet_align::corpus::CorpusRef;
    ///
    /// let parsed = CorpusRef::from_json(
    ///     r#"{"full_text": "Hôm nay trời đẹp.", "sentences": [{"text": "Hôm nay trời đẹp."}]}"#,
    /// ).unwrap();
    /// assert!(matches!(parsed, CorpusRef::Parsed(_)));
    ///
    /// let raw = CorpusRef::from_json(r#""Hôm nay trời đẹp.""#).unwrap();
    /// assert!(matches!(raw, CorpusRef::RawText(_)));
    ///
    /// assert!(CorpusRef::from_json("[1, 2, 3]").is_err());
    /// ```
    pub fn from_json(json: &str) -> Result<Self, CorpusError> {
        let shape: SupplyShape = serde_json::from_str(json)
            .map_err(|e| CorpusError::UnsupportedShape(e.to_string()))?;
        Ok(match shape {
            SupplyShape::Parsed {
                full_text,
                sentences,
            } => CorpusRef::Parsed(ReferenceCorpus {
                full_text,
                sentences: sentences.iter().map(|r| Sentence::parse(&r.text)).collect(),
            }),
            SupplyShape::Text(text) => CorpusRef::RawText(text),
        })
    }

    /// The complete reference transcript, regardless of shape.
    pub fn full_text(&self) -> &str {
        match self {
            CorpusRef::Parsed(c) => &c.full_text,
            CorpusRef::RawText(t) => t,
        }
    }

    /// Sentence texts for donor selection: the pre-parsed sentences when
    /// available, otherwise a fresh split of the raw text.
    pub fn sentence_texts(&self) -> Vec<String> {
        match self {
            CorpusRef::Parsed(c) => {
                if c.sentences.is_empty() {
                    split_sentences(&c.full_text)
                } else {
                    c.sentences.iter().map(|s| s.raw.clone()).collect()
                }
            }
            CorpusRef::RawText(t) => split_sentences(t),
        }
    }
}

// ---------------------------------------------------------------------------
// CorpusStore
// ---------------------------------------------------------------------------

/// Explicitly owned map from article id to reference corpus.
///
/// Replaces the original's process-wide transcript cache: constructed once
/// by the caller, filled at load time, then treated as read-only.
#[derive(Debug, Default)]
pub struct CorpusStore {
    corpora: HashMap<String, CorpusRef>,
}

impl CorpusStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a corpus under `article_id`, replacing any previous entry.
    pub fn insert(&mut self, article_id: impl Into<String>, corpus: CorpusRef) {
        self.corpora.insert(article_id.into(), corpus);
    }

    /// Parse raw transcript text into a pre-parsed corpus and store it.
    pub fn insert_text(&mut self, article_id: impl Into<String>, text: &str) {
        self.insert(
            article_id,
            CorpusRef::Parsed(ReferenceCorpus::from_text(text)),
        );
    }

    /// Parse a JSON supply shape and store it.
    ///
    /// # Errors
    ///
    /// [`CorpusError::UnsupportedShape`] from [`CorpusRef::from_json`].
    pub fn insert_json(
        &mut self,
        article_id: impl Into<String>,
        json: &str,
    ) -> Result<(), CorpusError> {
        let corpus = CorpusRef::from_json(json)?;
        self.insert(article_id, corpus);
        Ok(())
    }

    /// Look up the corpus for `article_id`.
    pub fn get(&self, article_id: &str) -> Option<&CorpusRef> {
        self.corpora.get(article_id)
    }

    /// Number of stored corpora.
    pub fn len(&self) -> usize {
        self.corpora.len()
    }

    /// `true` when no corpus has been loaded.
    pub fn is_empty(&self) -> bool {
        self.corpora.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
