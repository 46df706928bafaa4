//! Timeline events inferred from evidence.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A single dated occurrence inferred from evidence.
///
/// Timestamps are time-zone naive: documents rarely state a zone and the
/// builder does not attempt to guess one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEvent {
    /// When the event happened
    pub timestamp: NaiveDateTime,

    /// Provenance: `image_<i>` / `document_<i>`, or a refined category
    /// (`CCTV`, `Witness`, `Medical`, `Police`, `Document`)
    pub source: String,

    /// Short human-readable description (at most 200 characters)
    pub description: String,
}

impl TimelineEvent {
    pub fn new(
        timestamp: NaiveDateTime,
        source: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            timestamp,
            source: source.into(),
            description: description.into(),
        }
    }
}
