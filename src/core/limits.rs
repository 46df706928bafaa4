//! Case-level limits and the only fatal errors a case can raise.
//!
//! Everything the analysis does is best-effort, except for input that is so
//! large or so malformed that running it would be meaningless. Those cases
//! fail as a whole through [`CaseError`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::EvidenceRecord;

/// Limits applied to one case before any analysis runs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseLimits {
    /// Maximum number of evidence records per case (default: 500)
    #[serde(default = "default_max_records")]
    pub max_records: usize,

    /// Maximum text size per record in bytes (default: 10MB)
    #[serde(default = "default_max_text_bytes")]
    pub max_text_bytes: usize,
}

fn default_max_records() -> usize {
    500
}
fn default_max_text_bytes() -> usize {
    10 * 1024 * 1024
} // 10MB

impl Default for CaseLimits {
    fn default() -> Self {
        Self {
            max_records: default_max_records(),
            max_text_bytes: default_max_text_bytes(),
        }
    }
}

impl CaseLimits {
    /// Validate a record set against the limits
    pub fn validate(&self, records: &[EvidenceRecord]) -> Result<(), CaseError> {
        if records.len() > self.max_records {
            return Err(CaseError::TooManyRecords {
                actual: records.len(),
                limit: self.max_records,
            });
        }

        for (index, record) in records.iter().enumerate() {
            let size = record.text().len() + record.summary().len();
            if size > self.max_text_bytes {
                return Err(CaseError::TextTooLarge {
                    record: record.reference(index),
                    actual: size,
                    limit: self.max_text_bytes,
                });
            }

            let confidence = record.classification().confidence;
            if !(0.0..=1.0).contains(&confidence) {
                return Err(CaseError::InvalidConfidence {
                    record: record.reference(index),
                    confidence,
                });
            }
        }

        Ok(())
    }
}

/// Case-level failures
#[derive(Debug, Clone, Error)]
pub enum CaseError {
    #[error("Too many evidence records: {actual} > {limit}")]
    TooManyRecords { actual: usize, limit: usize },

    #[error("Record {record} text too large: {actual} > {limit} bytes")]
    TextTooLarge {
        record: String,
        actual: usize,
        limit: usize,
    },

    #[error("Record {record} has confidence {confidence} outside [0, 1]")]
    InvalidConfidence { record: String, confidence: f64 },
}
