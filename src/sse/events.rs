//! SSE record and event types
//!
//! An `SseRecord` is the raw `(event, data)` pair cut out of the byte stream
//! by the tokenizer. A `ResearchEvent` is the typed form of a record whose
//! JSON payload was decoded successfully.

use crate::models::{Source, Stage};

/// Represents a parsed SSE line
#[derive(Debug, Clone, PartialEq)]
pub enum SseLine {
    /// Event type declaration (e.g., "event: state")
    Event(String),
    /// Data payload (e.g., "data: {\"logs\": []}")
    Data(String),
    /// Empty line - signals end of event
    Empty,
    /// Comment or a field we don't use (`id:`, `retry:`, ...)
    Comment(String),
}

/// One complete SSE record with both fields present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseRecord {
    pub event_type: String,
    pub data: String,
}

impl SseRecord {
    pub fn new(event_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            data: data.into(),
        }
    }
}

/// Partial session state carried by a `state` event.
///
/// Every field is optional; absent fields leave the session untouched.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StateUpdate {
    pub stage: Option<Stage>,
    pub logs: Option<Vec<String>>,
    pub strategy: Option<String>,
    pub raw_data: Option<String>,
    pub insights: Option<String>,
    pub final_report: Option<String>,
    pub sources: Option<Vec<Source>>,
}

/// Typed events of the research stream
#[derive(Debug, Clone, PartialEq)]
pub enum ResearchEvent {
    /// Progress snapshot from the pipeline
    State(StateUpdate),
    /// Pipeline finished. The backend repeats the report here.
    Complete { final_report: Option<String> },
    /// Pipeline failed
    Error {
        message: String,
        logs: Option<Vec<String>>,
    },
}

impl ResearchEvent {
    /// Returns the event type name as a string for debugging purposes.
    pub fn event_type_name(&self) -> &'static str {
        match self {
            ResearchEvent::State(_) => "state",
            ResearchEvent::Complete { .. } => "complete",
            ResearchEvent::Error { .. } => "error",
        }
    }

    /// Whether this event ends the session.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ResearchEvent::State(_))
    }
}

/// Error type for SSE decoding
#[derive(Debug, Clone, PartialEq)]
pub enum SseParseError {
    /// Unknown event type received
    UnknownEventType(String),
    /// Invalid JSON in data payload, or a required field missing
    InvalidJson { event_type: String, source: String },
}

impl SseParseError {
    pub fn event_type(&self) -> &str {
        match self {
            SseParseError::UnknownEventType(t) => t,
            SseParseError::InvalidJson { event_type, .. } => event_type,
        }
    }
}

impl std::fmt::Display for SseParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SseParseError::UnknownEventType(t) => write!(f, "Unknown SSE event type: {}", t),
            SseParseError::InvalidJson { event_type, source } => {
                write!(f, "Invalid JSON for event '{}': {}", event_type, source)
            }
        }
    }
}

impl std::error::Error for SseParseError {}
