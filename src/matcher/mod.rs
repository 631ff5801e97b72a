//! Reference matching: the staged exact → fuzzy cascade plus the
//! replacement validator.
//!
//! This module provides:
//! * [`find_best_match`] — dispatcher over the corpus supply shape.
//! * [`fast_match`] / [`simple_match`] — the two cascade entry points.
//! * [`fuzzy_topk`] / [`MatchCandidate`] — ranked fuzzy candidates.
//! * [`validate_improvement`] / [`ValidationError`] — the accept/reject gate
//!   for boosted replacements.

pub mod cascade;
pub mod validate;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use cascade::{
    exact_match, fast_match, find_best_match, fuzzy_topk, simple_match, MatchCandidate,
};
pub use validate::{length_within_bounds, validate_improvement, ValidationError};
