//! Inconsistencies that a document states in its own prose.
//!
//! When any of these are found the heuristic rules do not run at all.

use crate::domain::{ConflictKind, ConflictRecord, EvidenceRecord, Severity, TimelineEvent};
use crate::text::{contains_any, truncate_chars};
use crate::timeline::clock::CLOCK_TIME;

use super::ConflictRule;

/// Phrases that introduce an explicitly stated inconsistency
pub const TRIGGER_PHRASES: &[&str] = &[
    "inconsistencies identified",
    "discrepancy",
    "conflict",
    "contradiction",
    "note:",
    "warning:",
];

/// Characters inspected after a trigger phrase
const SECTION_CHARS: usize = 2000;

const SEVERE_WORDS: &[&str] = &["serious", "severe", "fracture", "deep"];

/// Scans document text for trigger phrases and the sub-patterns that follow them
#[derive(Debug, Default, Clone, Copy)]
pub struct ExplicitMentionScan;

impl ExplicitMentionScan {
    fn scan_section(section: &str, reference: &str, out: &mut Vec<ConflictRecord>) {
        let refs = || vec![reference.to_string()];

        if contains_any(section, &["time discrepancy", "time conflict"]) {
            let times: Vec<&str> = CLOCK_TIME
                .find_iter(section)
                .map(|m| m.as_str())
                .take(2)
                .collect();
            if let [first, second] = times.as_slice() {
                out.push(
                    ConflictRecord::new(
                        ConflictKind::TimeDiscrepancy,
                        Severity::Moderate,
                        format!("Time discrepancy mentioned in document: {} vs {}", first, second),
                    )
                    .with_refs(refs()),
                );
            }
        }

        let clothing_change = section.contains("clothing") && section.contains("change");
        let shirt_colours =
            section.contains("shirt") && section.contains("black") && section.contains("white");
        if clothing_change || shirt_colours {
            out.push(
                ConflictRecord::new(
                    ConflictKind::DescriptionConflict,
                    Severity::Moderate,
                    "Clothing change mentioned in document (e.g., entered in black shirt, exited in white shirt)",
                )
                .with_refs(refs()),
            );
        }

        if section.contains("minor") && contains_any(section, SEVERE_WORDS) {
            out.push(
                ConflictRecord::new(
                    ConflictKind::StatementVsMedical,
                    Severity::Critical,
                    "Injury severity conflict: witness described as minor but medical report shows serious injuries",
                )
                .with_refs(refs()),
            );
        }
    }
}

impl ConflictRule for ExplicitMentionScan {
    fn name(&self) -> &'static str {
        "explicit_mentions"
    }

    fn check(&self, _events: &[TimelineEvent], records: &[EvidenceRecord]) -> Vec<ConflictRecord> {
        let mut found = Vec::new();

        for (index, record) in records.iter().enumerate() {
            let Some(doc) = record.as_document() else {
                continue;
            };
            let text = doc.raw_text.to_lowercase();
            let reference = record.reference(index);

            for trigger in TRIGGER_PHRASES {
                if let Some(pos) = text.find(trigger) {
                    let section = truncate_chars(&text[pos..], SECTION_CHARS);
                    Self::scan_section(section, &reference, &mut found);
                }
            }
        }

        found
    }
}
