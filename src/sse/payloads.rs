//! SSE payload deserialization structs
//!
//! Internal structs mirroring the JSON the backend puts on `data:` lines.

use serde::Deserialize;

use crate::models::{Source, Stage};

/// `state` payload. The backend sends the cumulative log each time.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct StatePayload {
    #[serde(default)]
    pub current_step: Option<Stage>,
    #[serde(default, alias = "log")]
    pub logs: Option<Vec<String>>,
    #[serde(default)]
    pub strategy: Option<String>,
    #[serde(default)]
    pub raw_data: Option<String>,
    #[serde(default)]
    pub insights: Option<String>,
    #[serde(default)]
    pub final_report: Option<String>,
    #[serde(default)]
    pub sources: Option<Vec<Source>>,
}

/// `error` payload
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorPayload {
    pub error: String,
    #[serde(default, alias = "log")]
    pub logs: Option<Vec<String>>,
}
