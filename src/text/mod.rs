//! Text primitives: Vietnamese normalization and tokenization.
//!
//! This module provides:
//! * [`normalize`] — canonical comparison form, with optional tone stripping.
//! * [`strip_tone_marks`] — per-token base form for diacritic projection.
//! * [`split_sentences`] / [`split_segments`] — sentence and scoring-segment
//!   splitters.
//! * [`word_tokens`] / [`Token`] — word/punctuation tokenization.

pub mod normalize;
pub mod tokenize;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use normalize::{normalize, strip_tone_marks};
pub use tokenize::{split_segments, split_sentences, word_tokens, Token};
