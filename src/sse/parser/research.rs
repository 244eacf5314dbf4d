//! Research pipeline event parsers

use crate::sse::events::{ResearchEvent, SseParseError, StateUpdate};
use crate::sse::payloads::{ErrorPayload, StatePayload};

fn invalid_json(event_type: &str, e: serde_json::Error) -> SseParseError {
    SseParseError::InvalidJson {
        event_type: event_type.to_string(),
        source: e.to_string(),
    }
}

/// Parse state event
pub(super) fn parse_state_event(event_type: &str, data: &str) -> Result<ResearchEvent, SseParseError> {
    let payload: StatePayload =
        serde_json::from_str(data).map_err(|e| invalid_json(event_type, e))?;
    Ok(ResearchEvent::State(StateUpdate {
        stage: payload.current_step,
        logs: payload.logs,
        strategy: payload.strategy,
        raw_data: payload.raw_data,
        insights: payload.insights,
        final_report: payload.final_report,
        sources: payload.sources,
    }))
}

/// Parse complete event
///
/// The payload is opaque apart from an optional `final_report` string. It
/// still has to be valid JSON.
pub(super) fn parse_complete_event(
    event_type: &str,
    data: &str,
) -> Result<ResearchEvent, SseParseError> {
    let v: serde_json::Value =
        serde_json::from_str(data).map_err(|e| invalid_json(event_type, e))?;

    let final_report = v
        .get("final_report")
        .and_then(|r| r.as_str())
        .map(|r| r.to_string());

    Ok(ResearchEvent::Complete { final_report })
}

/// Parse error event
pub(super) fn parse_error_event(event_type: &str, data: &str) -> Result<ResearchEvent, SseParseError> {
    let payload: ErrorPayload =
        serde_json::from_str(data).map_err(|e| invalid_json(event_type, e))?;
    Ok(ResearchEvent::Error {
        message: payload.error,
        logs: payload.logs,
    })
}
