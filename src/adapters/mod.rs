//! Adapter interfaces for external collaborators.
//!
//! The core never reaches for a global model manager: an [`Oracle`] and an
//! [`EvidenceModels`] implementation are injected where they are needed, so
//! tests can substitute fakes.

pub mod decode;
pub mod heuristic;
pub mod openai;

use std::path::Path;

use anyhow::Result;
use async_trait::async_trait;

use crate::domain::{Classification, DetectedObject, Entity};

pub use decode::decode_json_array;
pub use heuristic::HeuristicModels;
pub use openai::OpenAiOracle;

/// One request to the reasoning oracle
#[derive(Debug, Clone, PartialEq)]
pub struct OracleRequest {
    pub prompt: String,
    pub system_prompt: String,
    pub model: String,
    pub temperature: f32,
}

/// External natural-language reasoning service.
///
/// Calls are awaited one at a time by the core, are never retried and are
/// not wrapped in a timeout. Any `Err` is treated the same as an unusable
/// response.
#[async_trait]
pub trait Oracle: Send + Sync {
    /// Human-readable oracle name
    fn name(&self) -> &str;

    /// Model identifier sent with each request
    fn model(&self) -> &str;

    /// Send one prompt and return the raw response text
    async fn call(&self, request: &OracleRequest) -> Result<String>;
}

/// Classification, detection and entity extraction capabilities used when
/// turning raw files into evidence records
pub trait EvidenceModels: Send + Sync {
    fn classify_image(&self, path: &Path) -> Classification;

    fn classify_document(&self, text: &str, file_name: &str) -> Classification;

    fn detect_objects(&self, path: &Path) -> Vec<DetectedObject>;

    fn extract_entities(&self, text: &str) -> Vec<Entity>;
}
