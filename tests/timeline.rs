//! Timeline Integration Tests
//!
//! Tests for per-record extraction tiers and global ordering.

use casefuse::domain::{
    Classification, DocumentRecord, EvidenceRecord, ImageRecord, TimelineEvent,
};
use casefuse::ingest::normalize_record;
use casefuse::timeline::{
    ExtractionTier, NoSignal, ProcessingClock, TierContext, TimelineBuilder,
};
use chrono::{NaiveDate, NaiveDateTime};

fn processing_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 5)
        .unwrap()
        .and_hms_opt(23, 30, 0)
        .unwrap()
}

fn builder() -> TimelineBuilder {
    TimelineBuilder::with_clock(ProcessingClock::Fixed(processing_time()))
}

fn at(hour: u32, minute: u32, second: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 5)
        .unwrap()
        .and_hms_opt(hour, minute, second)
        .unwrap()
}

fn document(raw_text: &str, dates: &[&str], time_mentions: &[&str]) -> EvidenceRecord {
    EvidenceRecord::Document(DocumentRecord {
        raw_text: raw_text.to_string(),
        entities: vec![],
        time_mentions: time_mentions.iter().map(|s| s.to_string()).collect(),
        dates: dates.iter().map(|s| s.to_string()).collect(),
        summary: String::new(),
        classification: Classification::new("general_document", 0.6, "heuristic"),
    })
}

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
fn test_image_with_exif_timestamp() {
    let record = normalize_record(&image(Some("2024-01-05T20:12:00"), "MG Road"));
    let events = builder().build(&[record]);

    assert_eq!(events.len(), 1);
    assert_eq!(events[0].description, "Image evidence (MG ROAD)");
    assert!(events[0].source.starts_with("image_0"));
    assert_eq!(events[0].timestamp, at(20, 12, 0));
}

#[test]
fn test_image_without_timestamp_uses_processing_time() {
    let events = builder().build(&[image(None, "UNKNOWN")]);
    assert_eq!(events[0].timestamp, processing_time());

    let garbled = builder().build(&[image(Some("not a time"), "UNKNOWN")]);
    assert_eq!(garbled[0].timestamp, processing_time());
}

#[test]
fn test_entered_and_exited_document() {
    let record = document(
        "At 8:40 PM the man exited ABC Supermarket. Earlier, at 8:12:00 PM the man entered ABC Supermarket.",
        &["2024-01-05"],
        &[],
    );
    let events = builder().build(&[record]);

    assert_eq!(events.len(), 2);
    assert_eq!(events[0].timestamp, at(20, 12, 0));
    assert_eq!(events[1].timestamp, at(20, 40, 0));
    assert!(events.iter().all(|e| e.source == "Document"));
}

#[test]
fn test_source_classified_by_nearby_keywords() {
    let record = document(
        "CCTV footage shows the man arriving at 9:15 PM.",
        &["2024-01-05"],
        &[],
    );
    let events = builder().build(&[record]);
    assert_eq!(events[0].source, "CCTV");
}

#[test]
fn test_tier_fallback_chain() {
    let records = vec![
        // No clock time with a meridiem: tier 2 picks up the bare mention
        document("Meeting logged at 14:05 in the lobby.", &["January 5, 2024"], &["14:05"]),
        // Dates only
        document("Filed later.", &["2024-01-05"], &[]),
        // Nothing at all
        document("No temporal information here.", &[], &[]),
    ];
    let events = builder().build(&records);
    assert_eq!(events.len(), 3);

    assert_eq!(events[0].timestamp, at(0, 0, 0));
    assert_eq!(events[0].source, "document_1");
    assert_eq!(events[0].description, "Document evidence");

    assert_eq!(events[1].timestamp, at(14, 5, 0));
    assert_eq!(events[1].source, "document_0");
    assert_eq!(events[1].description, "Meeting logged at 14:05 in the lobby.");

    assert_eq!(events[2].timestamp, processing_time());
    assert_eq!(events[2].source, "document_2");
}

#[test]
fn test_timeline_is_sorted_across_records() {
    let records = vec![
        document("The alarm sounded at 11:00 PM.", &["2024-01-05"], &[]),
        image(Some("2024:01:05 19:45:00"), "MG Road"),
        document("Shots heard at 9:30 PM and again at 7:15 PM.", &["2024-01-05"], &[]),
    ];
    let events = builder().build(&records);

    assert_eq!(events.len(), 4);
    assert!(events.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
    assert_eq!(events[0].timestamp, at(19, 15, 0));
}

/// Tier that only understands documents starting with "LOG "
struct LogLineTier;

impl ExtractionTier for LogLineTier {
    fn name(&self) -> &'static str {
        "log_line"
    }

    fn attempt(&self, doc: &DocumentRecord, ctx: &TierContext) -> Vec<TimelineEvent> {
        match doc.raw_text.strip_prefix("LOG ") {
            Some(rest) => vec![TimelineEvent::new(at(6, 0, 0), ctx.reference.clone(), rest)],
            None => Vec::new(),
        }
    }
}

#[test]
fn test_custom_tier_order() {
    let builder = builder().with_tiers(vec![Box::new(LogLineTier), Box::new(NoSignal)]);
    let records = vec![
        document("LOG door forced", &[], &[]),
        // Would resolve to 9:30 PM under the default tiers
        document("Shots heard at 9:30 PM.", &["2024-01-05"], &[]),
    ];
    let events = builder.build(&records);

    assert_eq!(events.len(), 2);
    assert_eq!(events[0].timestamp, at(6, 0, 0));
    assert_eq!(events[0].source, "document_0");
    assert_eq!(events[0].description, "door forced");
    assert_eq!(events[1].timestamp, processing_time());
    assert_eq!(events[1].source, "document_1");
}
