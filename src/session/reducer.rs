//! Pure state reduction for research events.

use crate::error::SessionError;
use crate::models::{SessionState, Stage};
use crate::sse::{ResearchEvent, StateUpdate};

/// Apply one event to a session state.
///
/// - Once the state is terminal it is returned unchanged.
/// - `state` events merge non-destructively: absent or empty fields keep the
///   stored value. Any stage other than [`Stage::Idle`] replaces the current
///   one, including `complete` and `error`.
/// - `complete` moves to [`Stage::Complete`] and fills `final_report` if it
///   was still unset.
/// - `error` appends its log lines, records the message, and moves to
///   [`Stage::Error`].
pub fn reduce(mut state: SessionState, event: &ResearchEvent) -> SessionState {
    if state.stage.is_terminal() {
        return state;
    }

    match event {
        ResearchEvent::State(update) => merge_update(&mut state, update),
        ResearchEvent::Complete { final_report } => {
            fill(&mut state.final_report, final_report);
            state.stage = Stage::Complete;
        }
        ResearchEvent::Error { message, logs } => {
            if let Some(logs) = logs {
                merge_log(&mut state.log, logs);
            }
            state.error_message = Some(SessionError::backend(message).user_message());
            state.stage = Stage::Error;
        }
    }

    state
}

fn merge_update(state: &mut SessionState, update: &StateUpdate) {
    // A live session never goes back to idle
    if let Some(stage) = update.stage.filter(|s| *s != Stage::Idle) {
        state.stage = stage;
    }
    if let Some(logs) = &update.logs {
        merge_log(&mut state.log, logs);
    }
    replace_if_present(&mut state.strategy, &update.strategy);
    replace_if_present(&mut state.raw_data, &update.raw_data);
    replace_if_present(&mut state.insights, &update.insights);
    replace_if_present(&mut state.final_report, &update.final_report);
    if let Some(sources) = update.sources.as_ref().filter(|s| !s.is_empty()) {
        state.sources = Some(sources.clone());
    }
}

fn replace_if_present(slot: &mut Option<String>, incoming: &Option<String>) {
    if let Some(value) = incoming.as_ref().filter(|v| !v.is_empty()) {
        *slot = Some(value.clone());
    }
}

fn fill(slot: &mut Option<String>, incoming: &Option<String>) {
    if slot.is_none() {
        replace_if_present(slot, incoming);
    }
}

/// Append log lines.
///
/// The backend resends the whole log on every event, so when the incoming
/// list starts with the current log only its tail is new.
pub(crate) fn merge_log(log: &mut Vec<String>, incoming: &[String]) {
    if incoming.len() >= log.len() && incoming[..log.len()] == log[..] {
        log.extend_from_slice(&incoming[log.len()..]);
    } else {
        log.extend_from_slice(incoming);
    }
}
