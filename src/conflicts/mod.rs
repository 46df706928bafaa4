//! Conflict detection.
//!
//! Detection runs in four steps:
//! 1. Explicit mentions: inconsistencies a document states itself
//! 2. Heuristic rules, only when step 1 found nothing
//! 3. Dedup by fingerprint of `(type, details[:100])`
//! 4. Optional oracle augmentation, appended as-is

pub mod explicit;
pub mod rules;

use std::collections::HashSet;
use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::adapters::{decode_json_array, Oracle, OracleRequest};
use crate::domain::{ConflictKind, ConflictRecord, EvidenceRecord, Severity, TimelineEvent};
use crate::text::truncate_chars;

pub use explicit::ExplicitMentionScan;
pub use rules::{DescriptionRule, InjurySeverityRule, LocationRule, TimeOrderRule};

/// Events included in the oracle prompt
const PROMPT_EVENTS: usize = 20;
/// Record summaries included in the oracle prompt
const PROMPT_SUMMARIES: usize = 10;
const PROMPT_SUMMARY_CHARS: usize = 200;
const ORACLE_TEMPERATURE: f32 = 0.2;

const SYSTEM_PROMPT: &str = "You are an expert crime analyst reviewing evidence for inconsistencies. Be precise and cite specific evidence.";

/// One independent conflict check
pub trait ConflictRule: Send + Sync {
    fn name(&self) -> &'static str;

    /// Inspect the merged timeline and the full record set
    fn check(&self, events: &[TimelineEvent], records: &[EvidenceRecord]) -> Vec<ConflictRecord>;
}

/// The heuristic rules in the order they run
pub fn default_rules() -> Vec<Box<dyn ConflictRule>> {
    vec![
        Box::new(TimeOrderRule),
        Box::new(LocationRule),
        Box::new(InjurySeverityRule),
        Box::new(DescriptionRule),
    ]
}

/// Drop conflicts whose fingerprint was already seen, keeping the first
pub fn dedup_conflicts(conflicts: Vec<ConflictRecord>) -> Vec<ConflictRecord> {
    let mut seen = HashSet::new();
    conflicts
        .into_iter()
        .filter(|conflict| seen.insert(conflict.fingerprint()))
        .collect()
}

/// Conflict as the oracle is asked to return it
#[derive(Debug, Deserialize)]
struct OracleConflict {
    #[serde(rename = "type")]
    kind: String,
    severity: Severity,
    details: String,
    #[serde(default)]
    sources: Vec<String>,
}

impl From<OracleConflict> for ConflictRecord {
    fn from(item: OracleConflict) -> Self {
        ConflictRecord::new(ConflictKind::from(item.kind), item.severity, item.details)
            .with_refs(item.sources)
    }
}

/// Decode the oracle's conflict array item by item.
///
/// The response must still hold a JSON array; items that do not fit the
/// conflict shape (unknown severity, missing details) are skipped.
fn decode_oracle_conflicts(response: &str) -> Option<Vec<ConflictRecord>> {
    let items = decode_json_array::<serde_json::Value>(response)?;
    Some(
        items
            .into_iter()
            .filter_map(|item| match serde_json::from_value::<OracleConflict>(item) {
                Ok(conflict) => Some(ConflictRecord::from(conflict)),
                Err(e) => {
                    debug!(error = %e, "Skipped oracle conflict item");
                    None
                }
            })
            .collect(),
    )
}

/// Prompt describing the case to the oracle
pub fn build_conflict_prompt(events: &[TimelineEvent], records: &[EvidenceRecord]) -> String {
    let timeline: Vec<String> = events
        .iter()
        .take(PROMPT_EVENTS)
        .map(|e| {
            format!(
                "- {}: {} (Source: {})",
                e.timestamp.format("%Y-%m-%dT%H:%M:%S"),
                e.description,
                e.source
            )
        })
        .collect();

    let summaries: Vec<String> = records
        .iter()
        .take(PROMPT_SUMMARIES)
        .map(|r| {
            format!(
                "- {}: {}",
                r.kind(),
                truncate_chars(r.summary(), PROMPT_SUMMARY_CHARS)
            )
        })
        .collect();

    format!(
        "Analyze the following evidence timeline and identify any inconsistencies or conflicts.\n\n\
         Timeline:\n{}\n\n\
         Evidence Summary:\n{}\n\n\
         Identify:\n\
         1. Time inconsistencies\n\
         2. Location conflicts\n\
         3. Witness statement contradictions\n\
         4. Medical evidence vs witness statements\n\n\
         Respond with a JSON array of objects with keys \"type\", \"severity\" \
         (critical, moderate or info), \"details\" and \"sources\".",
        timeline.join("\n"),
        summaries.join("\n")
    )
}

/// Runs the explicit scan, the heuristic rules and the optional oracle
pub struct ConflictDetector {
    explicit: Box<dyn ConflictRule>,
    rules: Vec<Box<dyn ConflictRule>>,
    oracle: Option<Arc<dyn Oracle>>,
}

impl Default for ConflictDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl ConflictDetector {
    pub fn new() -> Self {
        Self {
            explicit: Box::new(ExplicitMentionScan),
            rules: default_rules(),
            oracle: None,
        }
    }

    pub fn with_oracle(mut self, oracle: Option<Arc<dyn Oracle>>) -> Self {
        self.oracle = oracle;
        self
    }

    /// Replace the heuristic rule list
    pub fn with_rules(mut self, rules: Vec<Box<dyn ConflictRule>>) -> Self {
        self.rules = rules;
        self
    }

    /// Conflicts found without consulting the oracle
    pub fn detect_heuristic(
        &self,
        events: &[TimelineEvent],
        records: &[EvidenceRecord],
    ) -> Vec<ConflictRecord> {
        let explicit = self.explicit.check(events, records);

        let found = if explicit.is_empty() {
            let mut found = Vec::new();
            for rule in &self.rules {
                let hits = rule.check(events, records);
                if !hits.is_empty() {
                    debug!(rule = rule.name(), count = hits.len(), "Rule found conflicts");
                }
                found.extend(hits);
            }
            found
        } else {
            info!(
                count = explicit.len(),
                "Explicit inconsistencies found in documents, skipping heuristic rules"
            );
            explicit
        };

        dedup_conflicts(found)
    }

    /// Full detection, including oracle augmentation when configured
    pub async fn detect(
        &self,
        events: &[TimelineEvent],
        records: &[EvidenceRecord],
    ) -> Vec<ConflictRecord> {
        let mut conflicts = self.detect_heuristic(events, records);

        if let Some(oracle) = &self.oracle {
            if !events.is_empty() || !records.is_empty() {
                conflicts.extend(self.ask_oracle(oracle.as_ref(), events, records).await);
            }
        }

        conflicts
    }

    async fn ask_oracle(
        &self,
        oracle: &dyn Oracle,
        events: &[TimelineEvent],
        records: &[EvidenceRecord],
    ) -> Vec<ConflictRecord> {
        let request = OracleRequest {
            prompt: build_conflict_prompt(events, records),
            system_prompt: SYSTEM_PROMPT.to_string(),
            model: oracle.model().to_string(),
            temperature: ORACLE_TEMPERATURE,
        };

        let response = match oracle.call(&request).await {
            Ok(response) => response,
            Err(e) => {
                warn!(oracle = oracle.name(), error = %e, "Oracle conflict analysis failed");
                return Vec::new();
            }
        };

        match decode_oracle_conflicts(&response) {
            Some(conflicts) => {
                debug!(count = conflicts.len(), "Oracle conflicts decoded");
                conflicts
            }
            None => {
                warn!(oracle = oracle.name(), "Oracle conflict response was not a JSON array");
                Vec::new()
            }
        }
    }
}
