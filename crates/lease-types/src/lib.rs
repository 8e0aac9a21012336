//! Shared data model for the lease analysis pipeline.

mod types;

pub use types::{
    AccessGrant, AccessStatus, AnalysisRecord, Clause, KeyInfo, OcrLine, OcrOutput, RiskLevel,
};
