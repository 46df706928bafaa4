//! Evidence records produced by the extraction collaborators.
//!
//! A record is immutable once produced. Anything derived from it (normalised
//! copies, timeline events, conflicts) is a new value.

use serde::{Deserialize, Serialize};

/// Location recorded when an image carries no usable position
pub const UNKNOWN_LOCATION: &str = "UNKNOWN";

/// Semantic classification attached to every record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    /// Label such as `witness_statement`, `medical_report`, `cctv`
    pub label: String,
    /// Confidence in [0, 1]
    pub confidence: f64,
    /// Which classifier produced the label (e.g. "heuristic", "CLIP")
    #[serde(default = "default_method")]
    pub method: String,
}

fn default_method() -> String {
    "unknown".to_string()
}

impl Classification {
    pub fn new(label: impl Into<String>, confidence: f64, method: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            confidence,
            method: method.into(),
        }
    }
}

/// A named entity found in a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    #[serde(alias = "entity")]
    pub text: String,
    pub label: String,
}

/// An object detected in an image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedObject {
    pub label: String,
    #[serde(default)]
    pub confidence: f64,
}

/// Normalised metadata for one uploaded image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRecord {
    /// EXIF-derived capture time (ISO-8601), if any
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default = "default_location")]
    pub location: String,
    #[serde(default)]
    pub ocr_text: String,
    #[serde(default)]
    pub objects: Vec<DetectedObject>,
    pub classification: Classification,
}

fn default_location() -> String {
    UNKNOWN_LOCATION.to_string()
}

/// Normalised content of one uploaded document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    #[serde(default)]
    pub raw_text: String,
    #[serde(default)]
    pub entities: Vec<Entity>,
    /// Raw time substrings as found by the extractor
    #[serde(default)]
    pub time_mentions: Vec<String>,
    /// Raw date substrings as found by the extractor
    #[serde(default)]
    pub dates: Vec<String>,
    #[serde(default)]
    pub summary: String,
    pub classification: Classification,
}

/// One piece of case evidence, reduced to the fields relevant to its kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EvidenceRecord {
    Image(ImageRecord),
    Document(DocumentRecord),
}

impl EvidenceRecord {
    /// Coarse kind name ("image" / "document")
    pub fn kind(&self) -> &'static str {
        match self {
            EvidenceRecord::Image(_) => "image",
            EvidenceRecord::Document(_) => "document",
        }
    }

    /// Provenance label for the record at `index` within a case, e.g. `image_0`
    pub fn reference(&self, index: usize) -> String {
        format!("{}_{}", self.kind(), index)
    }

    pub fn classification(&self) -> &Classification {
        match self {
            EvidenceRecord::Image(image) => &image.classification,
            EvidenceRecord::Document(doc) => &doc.classification,
        }
    }

    pub fn as_document(&self) -> Option<&DocumentRecord> {
        match self {
            EvidenceRecord::Document(doc) => Some(doc),
            EvidenceRecord::Image(_) => None,
        }
    }

    /// The record's primary text: raw text for documents, OCR text for images
    pub fn text(&self) -> &str {
        match self {
            EvidenceRecord::Image(image) => &image.ocr_text,
            EvidenceRecord::Document(doc) => &doc.raw_text,
        }
    }

    /// Summary line; images have none
    pub fn summary(&self) -> &str {
        match self {
            EvidenceRecord::Image(_) => "",
            EvidenceRecord::Document(doc) => &doc.summary,
        }
    }

    /// Text used for keyword coverage checks (text and summary)
    pub fn searchable_text(&self) -> String {
        format!("{} {}", self.text(), self.summary())
    }

    pub fn has_entities(&self) -> bool {
        matches!(self, EvidenceRecord::Document(doc) if !doc.entities.is_empty())
    }

    pub fn has_time_mentions(&self) -> bool {
        matches!(self, EvidenceRecord::Document(doc) if !doc.time_mentions.is_empty())
    }
}

impl From<ImageRecord> for EvidenceRecord {
    fn from(image: ImageRecord) -> Self {
        EvidenceRecord::Image(image)
    }
}

impl From<DocumentRecord> for EvidenceRecord {
    fn from(doc: DocumentRecord) -> Self {
        EvidenceRecord::Document(doc)
    }
}
