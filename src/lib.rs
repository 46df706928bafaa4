//! casefuse - Evidence fusion for case analysis
//!
//! Fuses normalised evidence records (images and documents) into a single
//! chronological timeline, detects contradictions between sources, and
//! recommends evidence that appears to be missing.
//!
//! # Architecture
//!
//! One case is one sequential pass:
//! - Timeline builder turns each record into dated events (four-tier
//!   extraction for documents)
//! - Events are merged and stable-sorted by timestamp
//! - Conflict detector runs explicit-mention scanning, heuristic rules and
//!   an optional reasoning oracle
//! - Advisor checks evidence coverage and suggests what to collect
//!
//! # Modules
//!
//! - `adapters`: Injected collaborators (reasoning oracle, evidence models)
//! - `advisor`: Missing-evidence recommendations
//! - `conflicts`: Conflict detection rules
//! - `core`: Case analyzer and limits
//! - `domain`: Data structures (EvidenceRecord, TimelineEvent, ConflictRecord)
//! - `ingest`: File extraction and normalisation
//! - `timeline`: Timeline builder and merge
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Analyse a case from extracted records
//! casefuse analyze records.jsonl --case-type robbery
//!
//! # Build a timeline straight from text documents
//! casefuse timeline --document witness.txt --document medical.txt
//! ```

pub mod adapters;
pub mod advisor;
pub mod cli;
pub mod config;
pub mod conflicts;
pub mod core;
pub mod domain;
pub mod ingest;
pub mod text;
pub mod timeline;

// Re-export main types at crate root for convenience
pub use adapters::{HeuristicModels, OpenAiOracle, Oracle, OracleRequest};
pub use advisor::MissingEvidenceAdvisor;
pub use conflicts::ConflictDetector;
pub use core::{CaseAnalyzer, CaseError, CaseLimits};
pub use domain::{
    CaseAnalysis, ConflictKind, ConflictRecord, DocumentRecord, EvidenceRecord, ImageRecord,
    Severity, TimelineEvent,
};
pub use timeline::{merge_events, ProcessingClock, TimelineBuilder};
