//! Vietnamese ASR-to-reference alignment core.
//!
//! Matches noisy ASR segments against a reference transcript and repairs
//! them: normalization, a staged exact → fuzzy matching cascade, a
//! multi-signal similarity metric, and a diacritic-projection booster gated
//! by a replacement validator.
//!
//! # Quick start
//!
//! ```rust
//! use viet_align::config::AlignConfig;
//! use viet_align::corpus::{CorpusRef, ReferenceCorpus};
//! use viet_align::pipeline::{CorrectionStatus, SegmentCorrector};
//!
//! let corpus = CorpusRef::Parsed(ReferenceCorpus::from_text(
//!     "Hôm nay trời đẹp. Cậu bé đi học rất sớm.",
//! ));
//! let mut corrector = SegmentCorrector::new(AlignConfig::default());
//!
//! let outcome = corrector.correct("hom nay troi dep", Some(&corpus));
//! assert_eq!(outcome.status, CorrectionStatus::Corrected);
//! assert_eq!(outcome.final_text, "Hôm nay trời đẹp.");
//! ```
//!
//! # Module map
//!
//! | Module       | Responsibility                                      |
//! |--------------|-----------------------------------------------------|
//! | [`text`]     | Normalization, sentence/segment splitting, tokens   |
//! | [`similarity`] | Ratio primitives, composite metric, score cache  |
//! | [`corpus`]   | Reference corpus model and supply shapes            |
//! | [`matcher`]  | Exact/fuzzy cascade and the replacement validator   |
//! | [`boost`]    | Punctuation repair and diacritic projection         |
//! | [`pipeline`] | The segment correction flow                         |
//! | [`config`]   | Settings, TOML persistence, app paths               |

pub mod boost;
pub mod config;
pub mod corpus;
pub mod matcher;
pub mod pipeline;
pub mod similarity;
pub mod text;

pub use config::AlignConfig;
pub use corpus::{CorpusRef, CorpusStore, ReferenceCorpus};
pub use pipeline::{CorrectionOutcome, CorrectionStatus, SegmentCorrector};
pub use similarity::SimilarityEngine;
