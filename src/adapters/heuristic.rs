//! Heuristic stand-ins for the ML collaborators.
//!
//! Classification looks at file names; entity extraction guesses capitalised
//! multi-word phrases. Good enough to run the pipeline end to end without any
//! model service.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::domain::{Classification, DetectedObject, Entity};
use crate::text::truncate_chars;

use super::EvidenceModels;

const METHOD: &str = "heuristic";

/// Only the head of long documents is scanned for entities
const ENTITY_SCAN_CHARS: usize = 5000;
const MAX_ENTITIES: usize = 50;

static CAPITALISED_PHRASE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b([A-Z][a-z]+(?:\s+[A-Z][a-z]+)+)\b").expect("valid entity regex")
});

/// File-name and regex based evidence models
#[derive(Debug, Default, Clone, Copy)]
pub struct HeuristicModels;

impl HeuristicModels {
    pub fn new() -> Self {
        Self
    }
}

fn lower_file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

impl EvidenceModels for HeuristicModels {
    fn classify_image(&self, path: &Path) -> Classification {
        let name = lower_file_name(path);
        let label = if name.contains("cctv") || name.contains("cam") {
            "cctv"
        } else if ["injury", "wound", "medical"].iter().any(|k| name.contains(k)) {
            "injury"
        } else if ["weapon", "gun", "knife"].iter().any(|k| name.contains(k)) {
            "weapon"
        } else if name.contains("scene") || name.contains("crime") {
            "crime_scene"
        } else {
            "environment"
        };
        Classification::new(label, 0.7, METHOD)
    }

    fn classify_document(&self, text: &str, file_name: &str) -> Classification {
        if text.trim().chars().count() < 10 {
            return Classification::new("general_document", 0.3, "fallback");
        }

        let name = file_name.to_lowercase();
        let label = if name.contains("witness") {
            "witness_statement"
        } else if ["med", "injury", "hospital"].iter().any(|k| name.contains(k)) {
            "medical_report"
        } else if name.contains("fir") || name.contains("chargesheet") {
            "fir"
        } else if name.contains("memo") || name.contains("police") {
            "police_memo"
        } else {
            "general_document"
        };
        Classification::new(label, 0.65, METHOD)
    }

    fn detect_objects(&self, _path: &Path) -> Vec<DetectedObject> {
        Vec::new()
    }

    fn extract_entities(&self, text: &str) -> Vec<Entity> {
        CAPITALISED_PHRASE
            .captures_iter(truncate_chars(text, ENTITY_SCAN_CHARS))
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str())
            .filter(|candidate| candidate.split_whitespace().count() <= 4)
            .map(|candidate| Entity {
                text: candidate.to_string(),
                label: "PERSON_OR_LOCATION".to_string(),
            })
            .take(MAX_ENTITIES)
            .collect()
    }
}
