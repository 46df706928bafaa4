//! Conflicts detected between evidence sources.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::text::truncate_chars;

/// Number of detail characters that participate in the dedup key
pub const DEDUP_DETAIL_CHARS: usize = 100;

/// Category of a detected conflict
///
/// Serialised as a plain string. Oracle-produced conflicts may use any type
/// name, which lands in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ConflictKind {
    /// A document itself states that two times disagree
    TimeDiscrepancy,
    /// Adjacent timeline events are out of order
    TimeConflict,
    /// Events in the same window place the subject at different locations
    LocationConflict,
    /// Injury severity differs between statements and medical evidence
    StatementVsMedical,
    /// Clothing or appearance descriptions disagree
    DescriptionConflict,
    Other(String),
}

impl ConflictKind {
    pub fn as_str(&self) -> &str {
        match self {
            ConflictKind::TimeDiscrepancy => "time_discrepancy",
            ConflictKind::TimeConflict => "time_conflict",
            ConflictKind::LocationConflict => "location_conflict",
            ConflictKind::StatementVsMedical => "statement_vs_medical",
            ConflictKind::DescriptionConflict => "description_conflict",
            ConflictKind::Other(name) => name,
        }
    }
}

impl From<String> for ConflictKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "time_discrepancy" => ConflictKind::TimeDiscrepancy,
            "time_conflict" => ConflictKind::TimeConflict,
            "location_conflict" => ConflictKind::LocationConflict,
            "statement_vs_medical" => ConflictKind::StatementVsMedical,
            "description_conflict" => ConflictKind::DescriptionConflict,
            _ => ConflictKind::Other(value),
        }
    }
}

impl From<ConflictKind> for String {
    fn from(kind: ConflictKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for ConflictKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How serious a conflict is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[serde(alias = "Critical", alias = "CRITICAL")]
    Critical,
    #[serde(alias = "Moderate", alias = "MODERATE")]
    Moderate,
    #[serde(alias = "Info", alias = "INFO")]
    Info,
}

/// A contradiction between two or more evidence sources
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictRecord {
    #[serde(rename = "type")]
    pub kind: ConflictKind,
    pub severity: Severity,
    pub details: String,
    /// Records or events the conflict was derived from
    #[serde(default)]
    pub evidence_refs: Vec<String>,
}

impl ConflictRecord {
    pub fn new(kind: ConflictKind, severity: Severity, details: impl Into<String>) -> Self {
        Self {
            kind,
            severity,
            details: details.into(),
            evidence_refs: Vec::new(),
        }
    }

    pub fn with_refs(mut self, refs: Vec<String>) -> Self {
        self.evidence_refs = refs;
        self
    }

    /// Content key used for dedup: type plus the first 100 detail characters
    pub fn dedup_key(&self) -> (String, String) {
        (
            self.kind.as_str().to_string(),
            truncate_chars(&self.details, DEDUP_DETAIL_CHARS).to_string(),
        )
    }

    /// Stable short id derived from the dedup key (16 hex chars)
    pub fn fingerprint(&self) -> String {
        let (kind, details) = self.dedup_key();
        let mut hasher = Sha256::new();
        hasher.update(kind.as_bytes());
        hasher.update(b"\0");
        hasher.update(details.as_bytes());
        let result = hasher.finalize();
        hex::encode(&result[..8])
    }
}
