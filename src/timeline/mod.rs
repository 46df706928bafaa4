//! Timeline construction.
//!
//! This module contains:
//! - Builder: turns each evidence record into zero or more events
//! - Tiers: the ordered document extraction strategies
//! - Merge: global stable ordering across records
//!
//! # Processing-time fallback
//!
//! Images without a capture time and documents with no temporal signal at all
//! are stamped with the processing time taken from the builder's
//! [`ProcessingClock`]. With the default `System` clock those timestamps
//! change between runs; pin the clock with `ProcessingClock::Fixed` when
//! reproducible output is required.

pub mod clock;
pub mod describe;
pub mod tiers;

use tracing::{debug, warn};

use crate::domain::{EvidenceRecord, ImageRecord, TimelineEvent};

pub use clock::ProcessingClock;
pub use tiers::{default_tiers, DateOnly, ExtractionTier, NoSignal, StructuredTimes, TierContext, TimeMentions};

/// Builds timeline events from evidence records
pub struct TimelineBuilder {
    clock: ProcessingClock,
    tiers: Vec<Box<dyn ExtractionTier>>,
}

impl Default for TimelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TimelineBuilder {
    /// Builder with the system clock and the default tier order
    pub fn new() -> Self {
        Self::with_clock(ProcessingClock::System)
    }

    pub fn with_clock(clock: ProcessingClock) -> Self {
        Self {
            clock,
            tiers: default_tiers(),
        }
    }

    /// Replace the document tier order
    pub fn with_tiers(mut self, tiers: Vec<Box<dyn ExtractionTier>>) -> Self {
        self.tiers = tiers;
        self
    }

    /// Events for the record at position `index` in the case
    pub fn build_record(&self, index: usize, record: &EvidenceRecord) -> Vec<TimelineEvent> {
        let reference = record.reference(index);
        match record {
            EvidenceRecord::Image(image) => vec![self.image_event(&reference, image)],
            EvidenceRecord::Document(doc) => {
                let ctx = TierContext {
                    reference,
                    clock: self.clock,
                };
                for tier in &self.tiers {
                    let events = tier.attempt(doc, &ctx);
                    if !events.is_empty() {
                        debug!(
                            record = %ctx.reference,
                            tier = tier.name(),
                            count = events.len(),
                            "Extracted timeline events"
                        );
                        return events;
                    }
                }
                Vec::new()
            }
        }
    }

    /// Events for every record, merged and sorted
    pub fn build(&self, records: &[EvidenceRecord]) -> Vec<TimelineEvent> {
        merge_events(
            records
                .iter()
                .enumerate()
                .map(|(index, record)| self.build_record(index, record)),
        )
    }

    fn image_event(&self, reference: &str, image: &ImageRecord) -> TimelineEvent {
        let timestamp = match image.timestamp.as_deref() {
            Some(raw) => clock::parse_timestamp(raw).unwrap_or_else(|| {
                warn!(record = reference, timestamp = raw, "Unparseable image timestamp, using processing time");
                self.clock.now()
            }),
            None => self.clock.now(),
        };

        TimelineEvent::new(
            timestamp,
            reference,
            format!("Image evidence ({})", image.location),
        )
    }
}

/// Concatenate per-record event lists and sort them by timestamp.
///
/// The sort is stable: events with equal timestamps keep producer order.
pub fn merge_events<I>(per_record: I) -> Vec<TimelineEvent>
where
    I: IntoIterator<Item = Vec<TimelineEvent>>,
{
    let mut events: Vec<TimelineEvent> = per_record.into_iter().flatten().collect();
    events.sort_by_key(|event| event.timestamp);
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_merge_is_stable_for_ties() {
        let ts = NaiveDate::from_ymd_opt(2024, 1, 5)
            .unwrap()
            .and_hms_opt(20, 0, 0)
            .unwrap();
        let earlier = ts - chrono::Duration::minutes(5);

        let merged = merge_events(vec![
            vec![TimelineEvent::new(ts, "a", "first"), TimelineEvent::new(ts, "a", "second")],
            vec![TimelineEvent::new(earlier, "b", "earliest"), TimelineEvent::new(ts, "b", "third")],
        ]);

        let order: Vec<&str> = merged.iter().map(|e| e.description.as_str()).collect();
        assert_eq!(order, vec!["earliest", "first", "second", "third"]);
    }

    #[test]
    fn test_merge_empty() {
        assert!(merge_events(Vec::<Vec<TimelineEvent>>::new()).is_empty());
    }
}
