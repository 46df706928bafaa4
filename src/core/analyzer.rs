//! Case analyzer: runs the fusion pipeline for one case.
//!
//! Order is fixed: normalise → build timeline per record → merge → detect
//! conflicts → advise. One case is one sequential call; nothing is shared
//! between calls, so independent cases can run concurrently on separate
//! analyzers or the same one.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, instrument};

use crate::adapters::Oracle;
use crate::advisor::MissingEvidenceAdvisor;
use crate::conflicts::ConflictDetector;
use crate::domain::{CaseAnalysis, EvidenceRecord, TimelineEvent};
use crate::ingest::normalize_record;
use crate::timeline::{ProcessingClock, TimelineBuilder};

use super::limits::{CaseError, CaseLimits};

/// Case type used when none is given
pub const DEFAULT_CASE_TYPE: &str = "general";

/// Runs timeline, conflict and advice stages over a case's records
pub struct CaseAnalyzer {
    builder: TimelineBuilder,
    detector: ConflictDetector,
    advisor: MissingEvidenceAdvisor,
    limits: CaseLimits,
}

impl Default for CaseAnalyzer {
    fn default() -> Self {
        Self::new(None)
    }
}

impl CaseAnalyzer {
    /// Analyzer with default limits and the system clock
    pub fn new(oracle: Option<Arc<dyn Oracle>>) -> Self {
        Self {
            builder: TimelineBuilder::new(),
            detector: ConflictDetector::new().with_oracle(oracle.clone()),
            advisor: MissingEvidenceAdvisor::new().with_oracle(oracle),
            limits: CaseLimits::default(),
        }
    }

    pub fn with_clock(mut self, clock: ProcessingClock) -> Self {
        self.builder = TimelineBuilder::with_clock(clock);
        self
    }

    pub fn with_limits(mut self, limits: CaseLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Normalised records and their merged timeline
    pub fn timeline(
        &self,
        records: &[EvidenceRecord],
    ) -> Result<(Vec<EvidenceRecord>, Vec<TimelineEvent>), CaseError> {
        self.limits.validate(records)?;

        let normalized: Vec<EvidenceRecord> = records.iter().map(normalize_record).collect();
        let events = self.builder.build(&normalized);
        Ok((normalized, events))
    }

    /// Full analysis of one case
    #[instrument(skip(self, records), fields(record_count = records.len()))]
    pub async fn analyze(
        &self,
        case_id: &str,
        case_type: &str,
        records: &[EvidenceRecord],
    ) -> Result<CaseAnalysis, CaseError> {
        info!("Starting case analysis");

        let (normalized, timeline) = self.timeline(records)?;
        let conflicts = self.detector.detect(&timeline, &normalized).await;
        let recommendations = self
            .advisor
            .advise(&timeline, &normalized, case_type)
            .await
            .into_iter()
            .collect();

        let analysis = CaseAnalysis {
            case_id: case_id.to_string(),
            case_type: case_type.to_string(),
            generated_at: Utc::now(),
            timeline,
            conflicts,
            recommendations,
        };

        info!(
            events = analysis.timeline.len(),
            conflicts = analysis.conflicts.len(),
            recommendations = analysis.recommendations.len(),
            "Case analysis complete"
        );
        Ok(analysis)
    }
}
