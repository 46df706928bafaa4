//! Strict decoding of JSON arrays out of oracle responses.
//!
//! Two strategies only, in order:
//! 1. the whole response, if it starts with `[`
//! 2. the greedy span from the first `[` to the last `]`
//!
//! Anything that does not decode is rejected as a whole. There is no repair
//! of truncated or commented JSON.

use std::sync::LazyLock;

use regex::Regex;
use serde::de::DeserializeOwned;
use tracing::debug;

static BRACKETED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\[.*\]").expect("valid bracket regex"));

/// Decode a JSON array of `T` from a free-text response
pub fn decode_json_array<T: DeserializeOwned>(response: &str) -> Option<Vec<T>> {
    let candidate = if response.starts_with('[') {
        response
    } else {
        BRACKETED.find(response)?.as_str()
    };

    match serde_json::from_str::<Vec<T>>(candidate) {
        Ok(items) => Some(items),
        Err(e) => {
            debug!(error = %e, "Rejected oracle response");
            None
        }
    }
}
