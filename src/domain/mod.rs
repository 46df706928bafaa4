//! Domain types for casefuse.
//!
//! This module contains the data contracts:
//! - Records: normalised evidence handed over by extraction
//! - Timeline: dated events inferred from records
//! - Conflicts: contradictions between sources
//! - Analysis: the per-case output bundle

pub mod analysis;
pub mod conflict;
pub mod record;
pub mod timeline;

// Re-export commonly used types
pub use analysis::CaseAnalysis;
pub use conflict::{ConflictKind, ConflictRecord, Severity};
pub use record::{
    Classification, DetectedObject, DocumentRecord, Entity, EvidenceRecord, ImageRecord,
    UNKNOWN_LOCATION,
};
pub use timeline::TimelineEvent;
