//! Turning raw evidence files into records.
//!
//! Classification and entity extraction go through the injected
//! [`EvidenceModels`]; time and date expressions are found with regexes.

use std::path::Path;
use std::sync::{Arc, LazyLock};

use anyhow::{Context, Result};
use regex::Regex;
use tracing::debug;

use crate::adapters::EvidenceModels;
use crate::domain::{DocumentRecord, ImageRecord, UNKNOWN_LOCATION};

const MAX_EXPRESSIONS: usize = 20;
const SUMMARY_CHARS: usize = 500;

static TIME_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"\b\d{1,2}:\d{2}\s?(?:AM|PM|am|pm)\b",
        r"\b\d{1,2}:\d{2}:\d{2}\b",
        r"\b\d{1,2}:\d{2}\b",
        r"\b(?:at|around|approximately)\s+\d{1,2}\s?(?:AM|PM|am|pm)\b",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid time pattern"))
    .collect()
});

static DATE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"\b\d{1,2}[/-]\d{1,2}[/-]\d{2,4}\b",
        r"(?i)\b(?:January|February|March|April|May|June|July|August|September|October|November|December)\s+\d{1,2},?\s+\d{4}\b",
        r"\b\d{4}[-/]\d{2}[-/]\d{2}\b",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid date pattern"))
    .collect()
});

/// All matches of `patterns`, pattern by pattern, first occurrence kept
fn collect_matches(patterns: &[Regex], text: &str) -> Vec<String> {
    let mut found: Vec<String> = Vec::new();
    for pattern in patterns {
        for m in pattern.find_iter(text) {
            let value = m.as_str().to_string();
            if !found.contains(&value) {
                found.push(value);
            }
        }
    }
    found.truncate(MAX_EXPRESSIONS);
    found
}

/// Time expressions such as `8:12 PM`, `20:12:05` or `around 9 pm`
pub fn extract_time_expressions(text: &str) -> Vec<String> {
    collect_matches(&TIME_PATTERNS, text)
}

/// Date expressions such as `1/5/2024`, `January 5, 2024` or `2024-01-05`
pub fn extract_dates(text: &str) -> Vec<String> {
    collect_matches(&DATE_PATTERNS, text)
}

/// First 500 characters, with `...` when the text is longer
pub fn summarize(text: &str) -> String {
    match text.char_indices().nth(SUMMARY_CHARS) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

/// Builds evidence records from files on disk
#[derive(Clone)]
pub struct DocumentExtractor {
    models: Arc<dyn EvidenceModels>,
}

impl DocumentExtractor {
    pub fn new(models: Arc<dyn EvidenceModels>) -> Self {
        Self { models }
    }

    /// Document record for already-read text
    pub fn from_text(&self, text: &str, file_name: &str) -> DocumentRecord {
        DocumentRecord {
            raw_text: text.to_string(),
            entities: self.models.extract_entities(text),
            time_mentions: extract_time_expressions(text),
            dates: extract_dates(text),
            summary: summarize(text),
            classification: self.models.classify_document(text, file_name),
        }
    }

    /// Read a plain-text document. Invalid UTF-8 is replaced, not rejected.
    pub async fn load_document(&self, path: &Path) -> Result<DocumentRecord> {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read document {}", path.display()))?;
        let text = String::from_utf8_lossy(&bytes);
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let record = self.from_text(&text, &file_name);
        debug!(
            file = %path.display(),
            label = %record.classification.label,
            times = record.time_mentions.len(),
            dates = record.dates.len(),
            "Extracted document"
        );
        Ok(record)
    }

    /// Image record with no capture time; the timeline falls back to processing time
    pub async fn load_image(&self, path: &Path) -> Result<ImageRecord> {
        tokio::fs::metadata(path)
            .await
            .with_context(|| format!("Failed to read image {}", path.display()))?;

        Ok(ImageRecord {
            timestamp: None,
            location: UNKNOWN_LOCATION.to_string(),
            ocr_text: String::new(),
            objects: self.models.detect_objects(path),
            classification: self.models.classify_image(path),
        })
    }
}
