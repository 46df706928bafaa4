//! Core case orchestration.
//!
//! This module contains:
//! - Analyzer: runs the full pipeline for one case
//! - Limits: case-level validation and fatal errors

pub mod analyzer;
pub mod limits;

// Re-export commonly used types
pub use analyzer::{CaseAnalyzer, DEFAULT_CASE_TYPE};
pub use limits::{CaseError, CaseLimits};
