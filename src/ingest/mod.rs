//! Evidence ingestion.
//!
//! This module turns raw files into [`EvidenceRecord`](crate::domain::EvidenceRecord)s
//! and normalises them before analysis:
//!
//! 1. **Extract**: read documents and images through the injected models
//! 2. **Normalize**: canonical timestamps and upper-cased locations
//!
//! # Architecture
//!
//! ```text
//! files → DocumentExtractor → EvidenceRecord → normalize_record → CaseAnalyzer
//! ```

pub mod extract;
pub mod normalize;

pub use extract::{extract_dates, extract_time_expressions, summarize, DocumentExtractor};
pub use normalize::{normalize_location, normalize_record, normalize_timestamp};
