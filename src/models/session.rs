use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::report::ParsedReport;
use super::stage::Stage;
use crate::error::ErrorCategory;

/// A source cited by the research job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub description: String,
}

/// Accumulated state of one research session.
///
/// Text fields are only ever filled, never cleared, while a session is live.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SessionState {
    pub stage: Stage,
    /// Progress lines, append-only
    pub log: Vec<String>,
    pub strategy: Option<String>,
    pub raw_data: Option<String>,
    pub insights: Option<String>,
    pub final_report: Option<String>,
    pub sources: Option<Vec<Source>>,
    pub error_message: Option<String>,
}

impl SessionState {
    /// State published right after `start`, before any bytes arrive.
    pub fn planning() -> Self {
        Self {
            stage: Stage::Planning,
            ..Self::default()
        }
    }

    /// Split the final report into its metadata block and markdown body.
    pub fn parsed_report(&self) -> Option<ParsedReport> {
        self.final_report.as_deref().map(ParsedReport::parse)
    }
}

/// What readers observe: the state plus controller bookkeeping.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionSnapshot {
    pub state: SessionState,
    /// True from `start` until a terminal event, stream end, or cancellation
    pub busy: bool,
    pub last_error: Option<String>,
    /// Category of `last_error`
    pub error_category: Option<ErrorCategory>,
    /// Live session, `None` when idle
    pub session_id: Option<Uuid>,
}

impl SessionSnapshot {
    pub fn is_idle(&self) -> bool {
        self.session_id.is_none() && !self.busy && self.state.stage == Stage::Idle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state_is_idle_and_empty() {
        let state = SessionState::default();
        assert_eq!(state.stage, Stage::Idle);
        assert!(state.log.is_empty());
        assert!(state.final_report.is_none());
        assert!(state.sources.is_none());
        assert!(state.error_message.is_none());
    }

    #[test]
    fn test_planning_state() {
        let state = SessionState::planning();
        assert_eq!(state.stage, Stage::Planning);
        assert!(state.log.is_empty());
    }

    #[test]
    fn test_source_description_defaults() {
        let source: Source =
            serde_json::from_str(r#"{"title":"Report","url":"https://example.com"}"#).unwrap();
        assert_eq!(source.description, "");
    }

    #[test]
    fn test_parsed_report_absent_without_final_report() {
        assert!(SessionState::default().parsed_report().is_none());
    }

    #[test]
    fn test_default_snapshot_is_idle() {
        assert!(SessionSnapshot::default().is_idle());
    }
}
