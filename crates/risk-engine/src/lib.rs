//! Clause segmentation, risk classification, and key-info extraction.
//!
//! Two classifiers live here on purpose: the deterministic keyword cascade
//! used for single-clause checks, and a weighted-random stand-in used when
//! scoring a whole document in bulk. They stay separate code paths behind
//! the [`ClauseClassifier`] trait so either can be injected.

pub mod classifier;
pub mod keyinfo;
pub mod patterns;
pub mod segmenter;

pub use classifier::{ClauseClassifier, KeywordClassifier, Verdict, WeightedRandomClassifier};
pub use keyinfo::extract_key_info;
pub use segmenter::{assemble_clauses, clause_candidates, generate_clauses};
