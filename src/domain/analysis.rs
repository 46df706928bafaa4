//! Output bundle of one case execution.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::conflict::ConflictRecord;
use super::timeline::TimelineEvent;

/// Everything the report assembler needs for one case.
///
/// Created fresh on every execution; nothing here is carried between runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseAnalysis {
    pub case_id: String,

    /// Case type used for advice (e.g. "robbery"); "general" by default
    pub case_type: String,

    pub generated_at: DateTime<Utc>,

    /// Events sorted ascending by timestamp
    pub timeline: Vec<TimelineEvent>,

    /// Deduplicated conflicts
    pub conflicts: Vec<ConflictRecord>,

    /// Unique recommendation strings
    pub recommendations: Vec<String>,
}

impl CaseAnalysis {
    /// Conflicts at a given severity
    pub fn count_by_severity(&self, severity: super::Severity) -> usize {
        self.conflicts
            .iter()
            .filter(|c| c.severity == severity)
            .count()
    }
}
