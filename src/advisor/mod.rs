//! Missing-evidence recommendations.
//!
//! Coverage is judged by keyword presence across record texts. Crime-specific
//! advice is only given when the case looks crime related; everything else
//! gets a short processing summary instead.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::adapters::{decode_json_array, Oracle, OracleRequest};
use crate::domain::{EvidenceRecord, TimelineEvent};
use crate::text::{contains_any, truncate_chars};

pub const NO_EVIDENCE: &str = "No evidence uploaded. Please upload evidence files to start analysis.";
pub const MISSING_CCTV: &str =
    "No CCTV footage or surveillance images found. Consider collecting CCTV from nearby locations.";
pub const MISSING_WITNESS: &str =
    "No witness statements found. Consider obtaining statements from witnesses and bystanders.";
pub const MISSING_MEDICAL: &str =
    "No medical reports found. If injuries occurred, obtain medical examination reports.";
pub const MISSING_FIR: &str =
    "No FIR (First Information Report) found. Ensure FIR is included in case files.";
pub const MISSING_FORENSIC: &str =
    "Check for forensic reports (fingerprints, DNA analysis, blood spatter analysis).";
pub const LIMITED_TIME_COVERAGE: &str = "Limited time coverage. Consider collecting evidence from extended time periods before and after the incident.";

/// Appended to every crime-related case
pub const STANDARD_RECOMMENDATIONS: &[&str] = &[
    "Collect phone records and call logs if applicable.",
    "Obtain statements from neighbors and nearby residents.",
    "Verify alibis and cross-check with CCTV timestamps.",
];

pub const PROCESSED: &str =
    "Document processed successfully. All text and entities have been extracted.";
pub const NO_ENTITIES: &str = "No named entities (names, locations, dates) found in the document.";
pub const NO_TIMESTAMPS: &str = "No timestamps or time expressions found in the document.";

const CRIME_LABELS: &[&str] = &["witness_statement", "medical_report", "fir", "police_memo"];
const CRIME_KEYWORDS: &[&str] = &[
    "crime",
    "suspect",
    "victim",
    "police",
    "arrest",
    "incident",
    "assault",
    "robbery",
    "theft",
    "murder",
    "investigation",
];

const PROMPT_EVENTS: usize = 15;
const PROMPT_SUMMARIES: usize = 8;
const PROMPT_SUMMARY_CHARS: usize = 150;
const ORACLE_TEMPERATURE: f32 = 0.4;
const SYSTEM_PROMPT: &str =
    "You are an expert crime investigator providing evidence collection recommendations.";

/// Which evidence categories the record texts already mention
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct EvidenceCoverage {
    pub cctv: bool,
    pub witness: bool,
    pub medical: bool,
    pub fir: bool,
    pub forensic: bool,
    pub photographs: bool,
}

impl EvidenceCoverage {
    /// Keyword coverage across all record texts
    pub fn scan(records: &[EvidenceRecord]) -> Self {
        let mut coverage = Self::default();
        for record in records {
            let text = record.searchable_text().to_lowercase();
            coverage.cctv |= contains_any(&text, &["cctv", "surveillance", "camera"]);
            coverage.witness |= contains_any(&text, &["witness", "statement"]);
            coverage.medical |= contains_any(&text, &["medical", "injury", "hospital"]);
            coverage.fir |= contains_any(&text, &["fir", "first information report"]);
            coverage.forensic |= contains_any(&text, &["forensic", "dna", "fingerprint"]);
            coverage.photographs |= contains_any(&text, &["photograph", "photo", "image"]);
        }
        coverage
    }
}

/// True when a classification label or any record text points at a crime
pub fn is_crime_related(records: &[EvidenceRecord]) -> bool {
    records.iter().any(|record| {
        CRIME_LABELS.contains(&record.classification().label.as_str())
            || contains_any(&record.searchable_text().to_lowercase(), CRIME_KEYWORDS)
    })
}

fn classified_as(records: &[EvidenceRecord], needle: &str) -> bool {
    records.iter().any(|record| {
        let classification = record.classification();
        classification.label.to_lowercase().contains(needle)
            || classification.method.to_lowercase().contains(needle)
    })
}

/// Whether the sorted timeline spans less than one hour
fn short_time_span(events: &[TimelineEvent]) -> bool {
    match (events.first(), events.last()) {
        (Some(first), Some(last)) => (last.timestamp - first.timestamp) < chrono::Duration::hours(1),
        _ => false,
    }
}

/// Prompt asking the oracle for additional evidence to collect
pub fn build_advice_prompt(
    events: &[TimelineEvent],
    records: &[EvidenceRecord],
    case_type: &str,
) -> String {
    let timeline: Vec<String> = events
        .iter()
        .take(PROMPT_EVENTS)
        .map(|e| format!("- {}: {}", e.timestamp.format("%Y-%m-%dT%H:%M:%S"), e.description))
        .collect();
    let files: Vec<String> = records
        .iter()
        .take(PROMPT_SUMMARIES)
        .map(|r| format!("- {}: {}", r.kind(), truncate_chars(r.summary(), PROMPT_SUMMARY_CHARS)))
        .collect();

    format!(
        "You are an expert crime investigator analyzing a {case_type} case.\n\n\
         Current Evidence Timeline:\n{}\n\n\
         Current Evidence Files:\n{}\n\n\
         Based on standard investigative practices for this type of case, what additional \
         evidence should be collected?\n\n\
         Consider:\n\
         - Forensic evidence (DNA, fingerprints, ballistics, toxicology)\n\
         - Digital evidence (phone records, CCTV, social media, GPS data)\n\
         - Witness statements (independent witnesses, neighbors, employees)\n\
         - Medical evidence (detailed injury reports, autopsy if applicable)\n\
         - Physical evidence (weapons, clothing, vehicles, scene photos)\n\
         - Documentation (FIR, charge sheet, police memos, legal documents)\n\n\
         Provide 3-5 specific, actionable recommendations. Be concise and practical.\n\
         Return as a JSON array of strings, e.g., [\"Recommendation 1\", \"Recommendation 2\"].",
        timeline.join("\n"),
        files.join("\n")
    )
}

/// Recommends evidence categories that appear to be missing
#[derive(Default)]
pub struct MissingEvidenceAdvisor {
    oracle: Option<Arc<dyn Oracle>>,
}

impl MissingEvidenceAdvisor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_oracle(mut self, oracle: Option<Arc<dyn Oracle>>) -> Self {
        self.oracle = oracle;
        self
    }

    /// Recommendations for the case, as a set
    pub async fn advise(
        &self,
        events: &[TimelineEvent],
        records: &[EvidenceRecord],
        case_type: &str,
    ) -> BTreeSet<String> {
        let mut out = BTreeSet::new();

        if events.is_empty() && records.is_empty() {
            out.insert(NO_EVIDENCE.to_string());
            return out;
        }

        if !is_crime_related(records) {
            debug!("Case is not crime related, giving processing summary only");
            out.insert(PROCESSED.to_string());
            if !records.iter().any(EvidenceRecord::has_entities) {
                out.insert(NO_ENTITIES.to_string());
            }
            if !records.iter().any(EvidenceRecord::has_time_mentions) {
                out.insert(NO_TIMESTAMPS.to_string());
            }
            return out;
        }

        let coverage = EvidenceCoverage::scan(records);
        let has_images = records.iter().any(|r| matches!(r, EvidenceRecord::Image(_)));

        if !coverage.cctv && !has_images {
            out.insert(MISSING_CCTV.to_string());
        }
        if !coverage.witness && !classified_as(records, "witness") {
            out.insert(MISSING_WITNESS.to_string());
        }
        if !coverage.medical && !classified_as(records, "medical") {
            out.insert(MISSING_MEDICAL.to_string());
        }
        if !coverage.fir && !classified_as(records, "fir") {
            out.insert(MISSING_FIR.to_string());
        }
        if !coverage.forensic {
            out.insert(MISSING_FORENSIC.to_string());
        }
        if short_time_span(events) {
            out.insert(LIMITED_TIME_COVERAGE.to_string());
        }

        if let Some(oracle) = &self.oracle {
            let suggestions = self.ask_oracle(oracle.as_ref(), events, records, case_type).await;
            info!(count = suggestions.len(), "Oracle suggested additional evidence");
            out.extend(suggestions);
        }

        out.extend(STANDARD_RECOMMENDATIONS.iter().map(|s| s.to_string()));
        out
    }

    async fn ask_oracle(
        &self,
        oracle: &dyn Oracle,
        events: &[TimelineEvent],
        records: &[EvidenceRecord],
        case_type: &str,
    ) -> Vec<String> {
        let request = OracleRequest {
            prompt: build_advice_prompt(events, records, case_type),
            system_prompt: SYSTEM_PROMPT.to_string(),
            model: oracle.model().to_string(),
            temperature: ORACLE_TEMPERATURE,
        };

        match oracle.call(&request).await {
            Ok(response) => decode_json_array::<String>(&response).unwrap_or_else(|| {
                warn!(oracle = oracle.name(), "Oracle advice response was not a JSON array");
                Vec::new()
            }),
            Err(e) => {
                warn!(oracle = oracle.name(), error = %e, "Oracle advice request failed");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Classification, DocumentRecord, Entity, ImageRecord};
    use chrono::NaiveDate;

    fn doc(text: &str, label: &str) -> EvidenceRecord {
        EvidenceRecord::Document(DocumentRecord {
            raw_text: text.to_string(),
            entities: vec![],
            time_mentions: vec![],
            dates: vec![],
            summary: String::new(),
            classification: Classification::new(label, 0.7, "heuristic"),
        })
    }

    fn event(hour: u32) -> TimelineEvent {
        let ts = NaiveDate::from_ymd_opt(2024, 1, 5)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap();
        TimelineEvent::new(ts, "Document", "something")
    }

    #[tokio::test]
    async fn test_empty_case() {
        let out = MissingEvidenceAdvisor::new().advise(&[], &[], "general").await;
        assert_eq!(out.into_iter().collect::<Vec<_>>(), vec![NO_EVIDENCE.to_string()]);
    }

    #[test]
    fn test_crime_detection() {
        assert!(is_crime_related(&[doc("Grocery list", "witness_statement")]));
        assert!(is_crime_related(&[doc("The suspect fled.", "general_document")]));
        assert!(!is_crime_related(&[doc("Quarterly budget review.", "general_document")]));
    }

    #[test]
    fn test_coverage_scan() {
        let coverage = EvidenceCoverage::scan(&[doc(
            "Camera footage reviewed; DNA swabs taken.",
            "general_document",
        )]);
        assert!(coverage.cctv);
        assert!(coverage.forensic);
        assert!(!coverage.medical);
    }

    #[tokio::test]
    async fn test_crime_case_gaps() {
        let records = vec![doc("The suspect ran off with the bag.", "general_document")];
        let events = vec![event(20), event(23)];
        let out = MissingEvidenceAdvisor::new().advise(&events, &records, "robbery").await;

        for expected in [MISSING_CCTV, MISSING_WITNESS, MISSING_MEDICAL, MISSING_FIR, MISSING_FORENSIC] {
            assert!(out.contains(expected), "missing {expected}");
        }
        for standard in STANDARD_RECOMMENDATIONS {
            assert!(out.contains(*standard));
        }
        assert!(!out.contains(LIMITED_TIME_COVERAGE));
        assert!(!out.contains(PROCESSED));
    }

    #[tokio::test]
    async fn test_classification_and_images_suppress_gaps() {
        let records = vec![
            doc("The victim was treated.", "witness_statement"),
            EvidenceRecord::Image(ImageRecord {
                timestamp: None,
                location: "UNKNOWN".to_string(),
                ocr_text: String::new(),
                objects: vec![],
                classification: Classification::new("environment", 0.7, "heuristic"),
            }),
        ];
        let events = vec![event(20)];
        let out = MissingEvidenceAdvisor::new().advise(&events, &records, "assault").await;

        assert!(!out.contains(MISSING_CCTV));
        assert!(!out.contains(MISSING_WITNESS));
        assert!(out.contains(MISSING_MEDICAL));
        assert!(out.contains(LIMITED_TIME_COVERAGE));
    }

    #[tokio::test]
    async fn test_non_crime_summary() {
        let mut record = doc("Quarterly budget review for the board.", "general_document");
        if let EvidenceRecord::Document(d) = &mut record {
            d.entities.push(Entity {
                text: "Board".to_string(),
                label: "ORG".to_string(),
            });
        }
        let out = MissingEvidenceAdvisor::new()
            .advise(&[event(9)], &[record], "general")
            .await;

        let expected: BTreeSet<String> =
            [PROCESSED, NO_TIMESTAMPS].iter().map(|s| s.to_string()).collect();
        assert_eq!(out, expected);
    }
}
