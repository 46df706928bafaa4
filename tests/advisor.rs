//! Missing-Evidence Advisor Integration Tests
//!
//! Tests for crime gating, coverage checks and oracle suggestions.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use casefuse::adapters::{Oracle, OracleRequest};
use casefuse::advisor::{
    MissingEvidenceAdvisor, MISSING_FORENSIC, NO_EVIDENCE, PROCESSED, STANDARD_RECOMMENDATIONS,
};
use casefuse::domain::{Classification, DocumentRecord, EvidenceRecord, TimelineEvent};
use chrono::NaiveDate;

/// Oracle returning a fixed reply and counting calls
struct CannedOracle {
    reply: String,
    calls: AtomicUsize,
}

impl CannedOracle {
    fn new(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.to_string(),
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl Oracle for CannedOracle {
    fn name(&self) -> &str {
        "canned"
    }

    fn model(&self) -> &str {
        "test-model"
    }

    async fn call(&self, request: &OracleRequest) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        assert!(request.prompt.contains("analyzing a robbery case"));
        assert!((request.temperature - 0.4).abs() < f32::EPSILON);
        Ok(self.reply.clone())
    }
}

fn document(raw_text: &str, label: &str) -> EvidenceRecord {
    EvidenceRecord::Document(DocumentRecord {
        raw_text: raw_text.to_string(),
        entities: vec![],
        time_mentions: vec![],
        dates: vec![],
        summary: String::new(),
        classification: Classification::new(label, 0.7, "heuristic"),
    })
}

fn events() -> Vec<TimelineEvent> {
    let start = NaiveDate::from_ymd_opt(2024, 1, 5)
        .unwrap()
        .and_hms_opt(20, 0, 0)
        .unwrap();
    vec![
        TimelineEvent::new(start, "CCTV", "Arrival"),
        TimelineEvent::new(start + chrono::Duration::hours(2), "Witness", "Departure"),
    ]
}

#[tokio::test]
async fn test_empty_case_gets_single_message() {
    let out = MissingEvidenceAdvisor::new().advise(&[], &[], "general").await;
    assert_eq!(out.len(), 1);
    assert!(out.contains(NO_EVIDENCE));
}

#[tokio::test]
async fn test_oracle_suggestions_are_merged() {
    let oracle = CannedOracle::new(
        r#"["Collect fuel station CCTV", "Verify alibis and cross-check with CCTV timestamps."]"#,
    );
    let records = vec![document("The robbery suspect fled on foot.", "police_memo")];

    let out = MissingEvidenceAdvisor::new()
        .with_oracle(Some(oracle.clone()))
        .advise(&events(), &records, "robbery")
        .await;

    assert_eq!(oracle.calls.load(Ordering::SeqCst), 1);
    assert!(out.contains("Collect fuel station CCTV"));
    for standard in STANDARD_RECOMMENDATIONS {
        assert!(out.contains(*standard));
    }
    // The duplicated standard recommendation is only present once
    assert_eq!(
        out.iter()
            .filter(|s| s.as_str() == STANDARD_RECOMMENDATIONS[2])
            .count(),
        1
    );
}

#[tokio::test]
async fn test_unusable_oracle_reply_adds_nothing() {
    let oracle = CannedOracle::new("LLM reasoning unavailable: OPENAI_API_KEY not set.");
    let records = vec![document("The robbery suspect fled on foot.", "police_memo")];

    let with_oracle = MissingEvidenceAdvisor::new()
        .with_oracle(Some(oracle))
        .advise(&events(), &records, "robbery")
        .await;
    let without = MissingEvidenceAdvisor::new()
        .advise(&events(), &records, "robbery")
        .await;

    assert_eq!(with_oracle, without);
}

#[tokio::test]
async fn test_non_crime_case_gets_no_crime_advice() {
    let oracle = CannedOracle::new(r#"["Should never appear"]"#);
    let records = vec![document("Minutes of the annual garden club meeting.", "general_document")];

    let out = MissingEvidenceAdvisor::new()
        .with_oracle(Some(oracle.clone()))
        .advise(&events(), &records, "robbery")
        .await;

    assert_eq!(oracle.calls.load(Ordering::SeqCst), 0);
    assert!(out.contains(PROCESSED));
    assert!(!out.contains(MISSING_FORENSIC));
    for standard in STANDARD_RECOMMENDATIONS {
        assert!(!out.contains(*standard));
    }
}
