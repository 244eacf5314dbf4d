//! Final report splitting.
//!
//! The synthesizer embeds a fenced JSON block with report metadata (title,
//! headline metrics, chart configs) somewhere in its markdown. Dashboards
//! render the metadata separately from the prose, so the block is lifted out
//! here.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static JSON_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"```json\n([\s\S]*?)\n```").expect("Invalid JSON block regex pattern")
});

/// A headline metric shown above the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyMetric {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Line,
    Bar,
    Pie,
}

/// Chart description emitted by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    #[serde(rename = "type")]
    pub kind: ChartKind,
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub data: Vec<serde_json::Value>,
    #[serde(rename = "xAxisKey")]
    pub x_axis_key: String,
    #[serde(rename = "dataKey")]
    pub data_key: String,
    #[serde(default)]
    pub color: Option<String>,
}

/// Metadata block of a final report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub title: String,
    pub topic: String,
    #[serde(default)]
    pub key_metrics: Vec<KeyMetric>,
    #[serde(default)]
    pub dashboard_url: Option<String>,
    #[serde(default)]
    pub charts: Vec<ChartConfig>,
}

/// A final report split into metadata and markdown body.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedReport {
    pub metadata: Option<ReportMetadata>,
    pub text: String,
}

impl ParsedReport {
    /// Parse a report. Never fails: a missing or undecodable block leaves
    /// the text untouched.
    pub fn parse(report: &str) -> Self {
        let Some(captures) = JSON_BLOCK.captures(report) else {
            return Self {
                metadata: None,
                text: report.to_string(),
            };
        };

        let (Some(block), Some(body)) = (captures.get(0), captures.get(1)) else {
            return Self {
                metadata: None,
                text: report.to_string(),
            };
        };

        match serde_json::from_str::<ReportMetadata>(body.as_str()) {
            Ok(metadata) => {
                let mut text = String::with_capacity(report.len() - block.len());
                text.push_str(&report[..block.start()]);
                text.push_str(&report[block.end()..]);
                Self {
                    metadata: Some(metadata),
                    text: text.trim().to_string(),
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to parse report metadata block");
                Self {
                    metadata: None,
                    text: report.to_string(),
                }
            }
        }
    }
}
