//! Multi-signal similarity scoring.
//!
//! This module provides:
//! * [`sequence_ratio`] — Ratcliff–Obershelp ratio over char sequences.
//! * [`weighted_ratio`] — token/substring-tolerant composite ratio.
//! * [`fuzzy_score_vi`] — tone-aware max-ratio used by the matcher stages.
//! * [`SimilarityEngine`] — the cached composite scorer
//!   (`0.55·vi_fuzzy + 0.25·w_ratio + 0.20·jaccard`, length-penalized).
//! * [`SimilarityCache`] — bounded, injected memoization state.

pub mod cache;
pub mod engine;
pub mod ratio;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use cache::SimilarityCache;
pub use engine::{fuzzy_score_norms, fuzzy_score_vi, jaccard, SimilarityEngine};
pub use ratio::{partial_ratio, sequence_ratio, token_set_ratio, token_sort_ratio, weighted_ratio};
