//! Record normalisation.
//!
//! Timestamps are canonicalised to `%Y-%m-%dT%H:%M:%S` and locations are
//! upper-cased. The input record is never modified; a normalised copy is
//! returned.

use tracing::debug;

use crate::domain::{EvidenceRecord, ImageRecord, UNKNOWN_LOCATION};
use crate::timeline::clock::parse_timestamp;

const CANONICAL_TIMESTAMP: &str = "%Y-%m-%dT%H:%M:%S";

/// Canonical form of a free-text location
pub fn normalize_location(location: &str) -> String {
    let trimmed = location.trim();
    if trimmed.is_empty() {
        UNKNOWN_LOCATION.to_string()
    } else {
        trimmed.to_uppercase()
    }
}

/// Canonical ISO form of an image timestamp, or `None` if it cannot be read
pub fn normalize_timestamp(raw: &str) -> Option<String> {
    let parsed = parse_timestamp(raw);
    if parsed.is_none() {
        debug!(timestamp = raw, "Dropping unparseable image timestamp");
    }
    parsed.map(|ts| ts.format(CANONICAL_TIMESTAMP).to_string())
}

/// Normalised copy of a record. Documents pass through unchanged.
pub fn normalize_record(record: &EvidenceRecord) -> EvidenceRecord {
    match record {
        EvidenceRecord::Image(image) => EvidenceRecord::Image(ImageRecord {
            timestamp: image.timestamp.as_deref().and_then(normalize_timestamp),
            location: normalize_location(&image.location),
            ..image.clone()
        }),
        EvidenceRecord::Document(_) => record.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Classification;

    fn image(timestamp: Option<&str>, location: &str) -> EvidenceRecord {
        EvidenceRecord::Image(ImageRecord {
            timestamp: timestamp.map(str::to_string),
            location: location.to_string(),
            ocr_text: String::new(),
            objects: vec![],
            classification: Classification::new("cctv", 0.9, "CLIP"),
        })
    }

    #[test]
    fn test_exif_timestamp_and_location() {
        let original = image(Some("2024:01:05 20:12:00"), "  MG Road ");
        let normalized = normalize_record(&original);

        match &normalized {
            EvidenceRecord::Image(img) => {
                assert_eq!(img.timestamp.as_deref(), Some("2024-01-05T20:12:00"));
                assert_eq!(img.location, "MG ROAD");
            }
            _ => panic!("expected image"),
        }
        // Input untouched
        assert_ne!(original, normalized);
    }

    #[test]
    fn test_rfc3339_and_garbage() {
        assert_eq!(
            normalize_timestamp("2024-01-05T20:12:00+05:30").as_deref(),
            Some("2024-01-05T20:12:00")
        );
        assert_eq!(normalize_timestamp("yesterday evening"), None);
        assert_eq!(normalize_location("   "), UNKNOWN_LOCATION);
    }
}
