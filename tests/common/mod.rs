//! Common test utilities for integration tests.
//!
//! This module provides reusable SSE fixtures and helpers for driving a
//! `SessionController` to a settled snapshot.
//!
//! # Example
//!
//! ```ignore
//! use common::{sse_event, wait_until_idle};
//!
//! let body = sse_event("complete", "{}");
//! let snapshot = wait_until_idle(&controller).await;
//! ```

#![allow(dead_code)]

pub mod mocks;

pub use mocks::*;

use std::time::Duration;

use marketlens::models::SessionSnapshot;
use marketlens::session::SessionController;
use marketlens::traits::HttpClient;

/// How long a test waits for a session to settle.
pub const SETTLE_TIMEOUT: Duration = Duration::from_secs(5);

/// Frame one SSE record.
pub fn sse_event(event: &str, data: &str) -> String {
    format!("event: {}\ndata: {}\n\n", event, data)
}

/// A `state` record built from a JSON value.
pub fn state_event(payload: serde_json::Value) -> String {
    sse_event("state", &payload.to_string())
}

/// Wait until the snapshot satisfies `predicate`.
pub async fn wait_for<H, F>(controller: &SessionController<H>, predicate: F) -> SessionSnapshot
where
    H: HttpClient + 'static,
    F: FnMut(&SessionSnapshot) -> bool,
{
    let mut rx = controller.subscribe();
    let snapshot = tokio::time::timeout(SETTLE_TIMEOUT, rx.wait_for(predicate))
        .await
        .expect("timed out waiting for session snapshot")
        .expect("snapshot channel closed")
        .clone();
    snapshot
}

/// Wait until the session is no longer busy.
pub async fn wait_until_idle<H>(controller: &SessionController<H>) -> SessionSnapshot
where
    H: HttpClient + 'static,
{
    wait_for(controller, |s| !s.busy).await
}
