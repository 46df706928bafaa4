//! Extraction tiers for document records.
//!
//! Tiers run in a fixed priority order and the first one that yields any
//! event wins for that record. Each tier is infallible: parse misses simply
//! produce fewer events.

use std::collections::HashSet;

use tracing::debug;

use crate::domain::{DocumentRecord, TimelineEvent};
use crate::text::{context_window, normalize_whitespace, truncate_chars};

use super::clock::{
    parse_bare_time, parse_clock_time, parse_date, resolve_base_date, ProcessingClock, CLOCK_TIME,
};
use super::describe::{classify_source, describe_event, find_time_context, MAX_DESCRIPTION_CHARS};

/// Characters of context taken on each side of a clock time
const CONTEXT_CHARS: usize = 200;

/// Description prefix length that participates in the within-tier dedup key
const DEDUP_DESCRIPTION_CHARS: usize = 50;

/// Per-record inputs shared by all tiers
#[derive(Debug, Clone)]
pub struct TierContext {
    /// Provenance label of the record, e.g. `document_2`
    pub reference: String,
    pub clock: ProcessingClock,
}

/// One strategy for turning a document into timeline events
pub trait ExtractionTier: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Attempt extraction; an empty result hands over to the next tier
    fn attempt(&self, doc: &DocumentRecord, ctx: &TierContext) -> Vec<TimelineEvent>;
}

/// The default tier order
pub fn default_tiers() -> Vec<Box<dyn ExtractionTier>> {
    vec![
        Box::new(StructuredTimes),
        Box::new(TimeMentions),
        Box::new(DateOnly),
        Box::new(NoSignal),
    ]
}

/// Tier 1: clock times found directly in the raw text, with keyword-derived
/// source categories and action-based descriptions
#[derive(Debug, Default, Clone, Copy)]
pub struct StructuredTimes;

impl ExtractionTier for StructuredTimes {
    fn name(&self) -> &'static str {
        "structured_times"
    }

    fn attempt(&self, doc: &DocumentRecord, ctx: &TierContext) -> Vec<TimelineEvent> {
        let text = &doc.raw_text;
        let mut seen: HashSet<(String, String)> = HashSet::new();
        let mut events = Vec::new();
        let mut base_date = None;

        for found in CLOCK_TIME.find_iter(text) {
            let time_str = found.as_str();
            let context = normalize_whitespace(context_window(
                text,
                found.start(),
                found.end(),
                CONTEXT_CHARS,
                CONTEXT_CHARS,
            ));

            let source = classify_source(&context);
            let description = describe_event(&context, time_str);

            let key = (
                time_str.to_string(),
                truncate_chars(&description, DEDUP_DESCRIPTION_CHARS).to_string(),
            );
            if !seen.insert(key) {
                continue;
            }

            let Some(time) = parse_clock_time(time_str) else {
                debug!(record = %ctx.reference, time = time_str, "Skipping unparseable clock time");
                continue;
            };

            let date = *base_date.get_or_insert_with(|| resolve_base_date(&doc.dates, &ctx.clock));
            events.push(TimelineEvent::new(date.and_time(time), source, description));
        }

        events
    }
}

/// Tier 2: bare `H:MM` mentions supplied by the extractor
#[derive(Debug, Default, Clone, Copy)]
pub struct TimeMentions;

impl ExtractionTier for TimeMentions {
    fn name(&self) -> &'static str {
        "time_mentions"
    }

    fn attempt(&self, doc: &DocumentRecord, ctx: &TierContext) -> Vec<TimelineEvent> {
        if doc.time_mentions.is_empty() {
            return Vec::new();
        }

        let date = resolve_base_date(&doc.dates, &ctx.clock);
        doc.time_mentions
            .iter()
            .filter_map(|mention| {
                let time = parse_bare_time(mention)?;
                let description = find_time_context(&doc.raw_text, mention);
                Some(TimelineEvent::new(
                    date.and_time(time),
                    ctx.reference.clone(),
                    description,
                ))
            })
            .collect()
    }
}

/// Tier 3: a single event on the first extracted date
#[derive(Debug, Default, Clone, Copy)]
pub struct DateOnly;

impl ExtractionTier for DateOnly {
    fn name(&self) -> &'static str {
        "date_only"
    }

    fn attempt(&self, doc: &DocumentRecord, ctx: &TierContext) -> Vec<TimelineEvent> {
        doc.dates
            .first()
            .and_then(|raw| parse_date(raw))
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|timestamp| {
                vec![TimelineEvent::new(
                    timestamp,
                    ctx.reference.clone(),
                    summary_description(doc),
                )]
            })
            .unwrap_or_default()
    }
}

/// Tier 4: no temporal signal at all; the event is stamped with the
/// processing time
#[derive(Debug, Default, Clone, Copy)]
pub struct NoSignal;

impl ExtractionTier for NoSignal {
    fn name(&self) -> &'static str {
        "no_signal"
    }

    fn attempt(&self, doc: &DocumentRecord, ctx: &TierContext) -> Vec<TimelineEvent> {
        vec![TimelineEvent::new(
            ctx.clock.now(),
            ctx.reference.clone(),
            summary_description(doc),
        )]
    }
}

fn summary_description(doc: &DocumentRecord) -> String {
    let summary = doc.summary.trim();
    if summary.is_empty() {
        "Document evidence".to_string()
    } else {
        truncate_chars(summary, MAX_DESCRIPTION_CHARS).to_string()
    }
}
