//! Heuristic conflict rules.
//!
//! These only run when no document states its own inconsistencies.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

use chrono::{NaiveDateTime, Timelike};
use regex::Regex;

use crate::domain::{ConflictKind, ConflictRecord, EvidenceRecord, Severity, TimelineEvent};
use crate::text::contains_any;

use super::ConflictRule;

/// Events out of chronological order between neighbours
#[derive(Debug, Default, Clone, Copy)]
pub struct TimeOrderRule;

impl ConflictRule for TimeOrderRule {
    fn name(&self) -> &'static str {
        "time_order"
    }

    fn check(&self, events: &[TimelineEvent], _records: &[EvidenceRecord]) -> Vec<ConflictRecord> {
        events
            .windows(2)
            .filter(|pair| pair[1].timestamp < pair[0].timestamp)
            .map(|pair| {
                let (prev, curr) = (&pair[0], &pair[1]);
                ConflictRecord::new(
                    ConflictKind::TimeConflict,
                    Severity::Moderate,
                    format!(
                        "Event '{}' at {} appears earlier than previous event '{}' at {}",
                        curr.description,
                        curr.timestamp.format("%Y-%m-%dT%H:%M:%S"),
                        prev.description,
                        prev.timestamp.format("%Y-%m-%dT%H:%M:%S"),
                    ),
                )
                .with_refs(vec![prev.source.clone(), curr.source.clone()])
            })
            .collect()
    }
}

static VENUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b([A-Z][a-z]+(?:\s+[A-Z][a-z]+)*)\s+(Supermarket|Store|Shop|Road|Street|Hospital|Clinic)",
    )
    .expect("valid venue regex")
});

static KNOWN_PLACE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(MG Road|ABC Supermarket|Main Street)").expect("valid place regex")
});

/// Location names mentioned across all document texts
pub fn known_locations(records: &[EvidenceRecord]) -> BTreeSet<String> {
    let mut locations = BTreeSet::new();
    for doc in records.iter().filter_map(EvidenceRecord::as_document) {
        for caps in VENUE.captures_iter(&doc.raw_text) {
            if let (Some(name), Some(venue)) = (caps.get(1), caps.get(2)) {
                locations.insert(format!("{} {}", name.as_str(), venue.as_str()));
            }
        }
        for found in KNOWN_PLACE.find_iter(&doc.raw_text) {
            locations.insert(found.as_str().to_string());
        }
    }
    locations
}

/// Start of the 5-minute window containing `ts`
fn window_start(ts: NaiveDateTime) -> NaiveDateTime {
    let floored_minute = ts.minute() / 5 * 5;
    ts.date()
        .and_hms_opt(ts.hour(), floored_minute, 0)
        .unwrap_or(ts)
}

/// Different known locations mentioned by events in the same 5-minute window
#[derive(Debug, Default, Clone, Copy)]
pub struct LocationRule;

impl ConflictRule for LocationRule {
    fn name(&self) -> &'static str {
        "location"
    }

    fn check(&self, events: &[TimelineEvent], records: &[EvidenceRecord]) -> Vec<ConflictRecord> {
        let locations = known_locations(records);
        if locations.len() < 2 {
            return Vec::new();
        }
        let lowered: Vec<(String, &String)> =
            locations.iter().map(|loc| (loc.to_lowercase(), loc)).collect();

        let mut windows: BTreeMap<NaiveDateTime, Vec<&TimelineEvent>> = BTreeMap::new();
        for event in events {
            windows.entry(window_start(event.timestamp)).or_default().push(event);
        }

        let mut conflicts = Vec::new();
        for (start, window_events) in &windows {
            if window_events.len() < 2 {
                continue;
            }

            let mut mentioned: BTreeSet<&str> = BTreeSet::new();
            let mut sources: Vec<String> = Vec::new();
            for event in window_events {
                let desc = event.description.to_lowercase();
                for (needle, original) in &lowered {
                    if desc.contains(needle.as_str()) {
                        mentioned.insert(original.as_str());
                        if !sources.contains(&event.source) {
                            sources.push(event.source.clone());
                        }
                    }
                }
            }

            if mentioned.len() > 1 {
                let names: Vec<&str> = mentioned.into_iter().collect();
                conflicts.push(
                    ConflictRecord::new(
                        ConflictKind::LocationConflict,
                        Severity::Moderate,
                        format!(
                            "Multiple conflicting locations mentioned around {}: {}",
                            start.format("%I:%M %p"),
                            names.join(", ")
                        ),
                    )
                    .with_refs(sources),
                );
            }
        }

        conflicts
    }
}

const INJURY_WORDS: &[&str] = &["injury", "wound", "hurt", "damage", "fracture", "cut"];
const MINOR_WORDS: &[&str] = &["minor", "small", "slight", "superficial", "scratch"];
const MAJOR_WORDS: &[&str] = &["fracture", "deep", "severe", "serious", "critical", "compound"];

/// Minor and major injury descriptions across injury-related documents
#[derive(Debug, Default, Clone, Copy)]
pub struct InjurySeverityRule;

impl ConflictRule for InjurySeverityRule {
    fn name(&self) -> &'static str {
        "injury_severity"
    }

    fn check(&self, _events: &[TimelineEvent], records: &[EvidenceRecord]) -> Vec<ConflictRecord> {
        let injury_texts: Vec<(String, String)> = records
            .iter()
            .enumerate()
            .filter_map(|(index, record)| {
                let doc = record.as_document()?;
                let text = doc.raw_text.to_lowercase();
                contains_any(&text, INJURY_WORDS).then(|| (record.reference(index), text))
            })
            .collect();

        if injury_texts.len() < 2 {
            return Vec::new();
        }

        let has_minor = injury_texts.iter().any(|(_, text)| contains_any(text, MINOR_WORDS));
        let has_major = injury_texts.iter().any(|(_, text)| contains_any(text, MAJOR_WORDS));
        if !(has_minor && has_major) {
            return Vec::new();
        }

        vec![ConflictRecord::new(
            ConflictKind::StatementVsMedical,
            Severity::Critical,
            "Conflicting injury severity descriptions: both 'minor' and 'major' indicators found",
        )
        .with_refs(injury_texts.into_iter().map(|(reference, _)| reference).collect())]
    }
}

static GARMENT_COLOURS: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    [
        ("black", r"\b(black|dark)\s+(shirt|top|clothing|clothes|outfit)\b"),
        ("white", r"\b(white|light)\s+(shirt|top|clothing|clothes|outfit)\b"),
        ("red", r"\b(red)\s+(shirt|top|clothing|clothes|outfit)\b"),
    ]
    .into_iter()
    .map(|(colour, pattern)| (colour, Regex::new(pattern).expect("valid colour regex")))
    .collect()
});

/// Different garment colours described across the corpus
#[derive(Debug, Default, Clone, Copy)]
pub struct DescriptionRule;

impl ConflictRule for DescriptionRule {
    fn name(&self) -> &'static str {
        "description"
    }

    fn check(&self, _events: &[TimelineEvent], records: &[EvidenceRecord]) -> Vec<ConflictRecord> {
        let lowered: Vec<String> = records.iter().map(|r| r.text().to_lowercase()).collect();

        let mut by_colour: Vec<(&str, Vec<String>)> = Vec::new();
        for (colour, pattern) in GARMENT_COLOURS.iter() {
            let sources: Vec<String> = records
                .iter()
                .zip(&lowered)
                .enumerate()
                .filter(|(_, (_, text))| pattern.is_match(text))
                .map(|(index, (record, _))| record.reference(index))
                .collect();
            if !sources.is_empty() {
                by_colour.push((colour, sources));
            }
        }

        if by_colour.len() < 2 {
            return Vec::new();
        }

        let mapping: Vec<String> = by_colour
            .iter()
            .map(|(colour, sources)| format!("{} ({})", colour, sources.join(", ")))
            .collect();
        let mut seen = BTreeSet::new();
        let refs: Vec<String> = by_colour
            .iter()
            .flat_map(|(_, sources)| sources.iter())
            .filter(|source| seen.insert(*source))
            .cloned()
            .collect();

        vec![ConflictRecord::new(
            ConflictKind::DescriptionConflict,
            Severity::Moderate,
            format!(
                "Conflicting clothing/appearance descriptions found: {}",
                mapping.join("; ")
            ),
        )
        .with_refs(refs)]
    }
}
