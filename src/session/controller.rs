//! Research session lifecycle.
//!
//! [`SessionController`] owns at most one live session. Each session runs on
//! its own tokio task that opens the stream, tokenizes it, reduces decoded
//! events into the published [`SessionSnapshot`], and stops on a terminal
//! event, stream end, failure, or cancellation.
//!
//! Publication goes through a `watch` channel. Every write from a read loop
//! is conditional: it is dropped if that loop's token has been cancelled or
//! if the snapshot has moved on to another session, so a retired stream can
//! never leak state into a newer one.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex as StdMutex};

use chrono::{DateTime, Utc};
use futures::StreamExt;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use super::reducer::reduce;
use crate::adapters::ReqwestHttpClient;
use crate::client::ResearchClient;
use crate::config::ClientConfig;
use crate::error::{SessionError, SessionResult};
use crate::models::{
    HealthStatus, ResearchDepth, ResearchRequest, SessionSnapshot, SessionState, Stage,
};
use crate::sse::{parse_sse_event, ResearchEvent, SseParseError};
use crate::traits::HttpClient;

/// Maximum number of diagnostics kept.
pub const MAX_DIAGNOSTICS: usize = 64;

/// A discarded event, recorded for inspection.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub at: DateTime<Utc>,
    pub session_id: Uuid,
    pub event_type: String,
    pub message: String,
}

type Diagnostics = Arc<StdMutex<VecDeque<Diagnostic>>>;

struct ActiveSession {
    id: Uuid,
    token: CancellationToken,
    handle: JoinHandle<()>,
}

impl ActiveSession {
    /// Cancel the read loop and wait for it to exit.
    async fn retire(self) {
        self.token.cancel();
        if let Err(e) = self.handle.await {
            if e.is_panic() {
                tracing::error!(session_id = %self.id, "Research read loop panicked");
            }
        }
        tracing::debug!(session_id = %self.id, "Retired research session");
    }
}

/// Drives research sessions and publishes their state.
///
/// # Example
///
/// ```ignore
/// use marketlens::session::SessionController;
///
/// let controller = SessionController::from_config(&config)?;
/// let mut updates = controller.subscribe();
/// controller.start("plant-based milk in Germany", 2).await?;
/// while updates.changed().await.is_ok() {
///     let snapshot = updates.borrow_and_update().clone();
///     if !snapshot.busy {
///         break;
///     }
/// }
/// ```
pub struct SessionController<H: HttpClient + 'static> {
    client: ResearchClient<H>,
    state_tx: Arc<watch::Sender<SessionSnapshot>>,
    active: Mutex<Option<ActiveSession>>,
    diagnostics: Diagnostics,
}

impl SessionController<ReqwestHttpClient> {
    /// Build a controller backed by reqwest.
    pub fn from_config(config: &ClientConfig) -> SessionResult<Self> {
        let http = ReqwestHttpClient::from_config(config)?;
        Ok(Self::new(ResearchClient::new(config.base_url.clone(), http)))
    }
}

impl<H: HttpClient + 'static> SessionController<H> {
    pub fn new(client: ResearchClient<H>) -> Self {
        let (state_tx, _) = watch::channel(SessionSnapshot::default());
        Self {
            client,
            state_tx: Arc::new(state_tx),
            active: Mutex::new(None),
            diagnostics: Arc::new(StdMutex::new(VecDeque::new())),
        }
    }

    /// Start a research session, retiring any previous one first.
    ///
    /// `topic` must be non-blank and `depth` in `1..=3`; otherwise
    /// [`SessionError::InvalidRequest`] is returned and nothing changes.
    /// Returns once the read loop is spawned; progress arrives through
    /// [`subscribe`](Self::subscribe).
    pub async fn start(&self, topic: &str, depth: u8) -> SessionResult<Uuid> {
        if topic.trim().is_empty() {
            return Err(SessionError::InvalidRequest(
                "topic must not be empty".to_string(),
            ));
        }
        let depth = ResearchDepth::try_from(depth).map_err(SessionError::InvalidRequest)?;
        let request = ResearchRequest::new(topic, depth);

        let mut active = self.active.lock().await;
        if let Some(previous) = active.take() {
            previous.retire().await;
        }
        self.clear_diagnostics();

        let id = Uuid::new_v4();
        let token = CancellationToken::new();

        self.state_tx.send_replace(SessionSnapshot {
            state: SessionState::planning(),
            busy: true,
            last_error: None,
            error_category: None,
            session_id: Some(id),
        });

        tracing::info!(session_id = %id, topic = %request.topic, depth = %depth, "Starting research session");

        let read_loop = ReadLoop {
            id,
            token: token.clone(),
            state_tx: Arc::clone(&self.state_tx),
            diagnostics: Arc::clone(&self.diagnostics),
        };
        let handle = tokio::spawn(read_loop.run(self.client.clone(), request));

        *active = Some(ActiveSession { id, token, handle });
        Ok(id)
    }

    /// Cancel any live session and return to the idle snapshot.
    ///
    /// Waits for the read loop to exit, so no publication from it can follow.
    /// Safe to call at any time, any number of times.
    pub async fn reset(&self) {
        let mut active = self.active.lock().await;
        if let Some(previous) = active.take() {
            previous.retire().await;
        }
        self.clear_diagnostics();
        self.state_tx.send_replace(SessionSnapshot::default());
    }

    /// Receiver notified on every publication.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.state_tx.subscribe()
    }

    /// Copy of the current snapshot.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.state_tx.borrow().clone()
    }

    pub fn state(&self) -> SessionState {
        self.state_tx.borrow().state.clone()
    }

    pub fn is_busy(&self) -> bool {
        self.state_tx.borrow().busy
    }

    pub fn last_error(&self) -> Option<String> {
        self.state_tx.borrow().last_error.clone()
    }

    /// Discarded events of the current session, oldest first.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .cloned()
            .collect()
    }

    /// Query the backend's health endpoint.
    pub async fn health_check(&self) -> SessionResult<HealthStatus> {
        self.client.health_check().await
    }

    pub fn client(&self) -> &ResearchClient<H> {
        &self.client
    }

    fn clear_diagnostics(&self) {
        self.diagnostics
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }
}

impl<H: HttpClient + 'static> Drop for SessionController<H> {
    fn drop(&mut self) {
        if let Some(active) = self.active.get_mut().take() {
            active.token.cancel();
        }
    }
}

/// State owned by one session's task.
struct ReadLoop {
    id: Uuid,
    token: CancellationToken,
    state_tx: Arc<watch::Sender<SessionSnapshot>>,
    diagnostics: Diagnostics,
}

impl ReadLoop {
    async fn run<H: HttpClient + 'static>(self, client: ResearchClient<H>, request: ResearchRequest) {
        let opened = tokio::select! {
            biased;
            _ = self.token.cancelled() => {
                tracing::debug!(session_id = %self.id, "Cancelled before the stream opened");
                return;
            }
            result = client.open_stream(&request) => result,
        };

        let mut records = match opened {
            Ok(records) => records,
            Err(e) => {
                self.fail(&e);
                return;
            }
        };

        loop {
            let next = tokio::select! {
                biased;
                _ = self.token.cancelled() => {
                    tracing::debug!(session_id = %self.id, "Research stream cancelled");
                    return;
                }
                next = records.next() => next,
            };

            match next {
                Some(Ok(record)) => {
                    tracing::debug!(
                        session_id = %self.id,
                        event_type = %record.event_type,
                        bytes = record.data.len(),
                        "Received SSE record"
                    );
                    match parse_sse_event(&record.event_type, &record.data) {
                        Ok(event) => {
                            if self.apply(&event) {
                                return;
                            }
                        }
                        Err(e) => self.discard(&e),
                    }
                }
                Some(Err(e)) => {
                    self.fail(&SessionError::Transport(e));
                    return;
                }
                None => {
                    tracing::info!(session_id = %self.id, "Research stream ended without a terminal event");
                    self.publish(|snapshot| snapshot.busy = false);
                    return;
                }
            }
        }
    }

    /// Modify the snapshot if this loop is still the live session.
    fn publish(&self, f: impl FnOnce(&mut SessionSnapshot)) -> bool {
        self.state_tx.send_if_modified(|snapshot| {
            if self.token.is_cancelled() || snapshot.session_id != Some(self.id) {
                return false;
            }
            f(snapshot);
            true
        })
    }

    /// Reduce one event into the snapshot. Returns true once the session is
    /// terminal and the loop should stop reading.
    fn apply(&self, event: &ResearchEvent) -> bool {
        let mut stage = Stage::Idle;
        let mut failure = None;
        let published = self.publish(|snapshot| {
            snapshot.state = reduce(std::mem::take(&mut snapshot.state), event);
            stage = snapshot.state.stage;
            match stage {
                Stage::Complete => snapshot.busy = false,
                Stage::Error => {
                    let error = SessionError::backend(
                        snapshot.state.error_message.as_deref().unwrap_or_default(),
                    );
                    let message = error.user_message();
                    snapshot.state.error_message = Some(message.clone());
                    snapshot.last_error = Some(message);
                    snapshot.error_category = Some(error.category());
                    snapshot.busy = false;
                    failure = Some(error);
                }
                _ => {}
            }
        });
        if !published {
            return event.is_terminal();
        }

        match (&failure, stage) {
            (Some(error), _) => {
                tracing::error!(
                    session_id = %self.id,
                    category = %error.category(),
                    error = %error,
                    "Backend reported research failure"
                );
            }
            (None, Stage::Complete) => {
                tracing::info!(session_id = %self.id, "Research session complete");
            }
            _ => {
                tracing::debug!(session_id = %self.id, stage = %stage, "Applied research event");
            }
        }

        stage.is_terminal()
    }

    /// Terminal failure. Cancellations are not failures and only clear `busy`.
    fn fail(&self, error: &SessionError) {
        if error.is_cancelled() {
            self.publish(|snapshot| snapshot.busy = false);
            return;
        }

        let message = error.user_message();
        let published = self.publish(|snapshot| {
            snapshot.state.stage = Stage::Error;
            snapshot.state.error_message = Some(message.clone());
            snapshot.last_error = Some(message.clone());
            snapshot.error_category = Some(error.category());
            snapshot.busy = false;
        });
        if published {
            tracing::error!(
                session_id = %self.id,
                category = %error.category(),
                error = %message,
                "Research session failed"
            );
        }
    }

    fn discard(&self, error: &SseParseError) {
        if self.token.is_cancelled() {
            return;
        }
        tracing::warn!(session_id = %self.id, error = %error, "Discarded SSE event");

        let mut diagnostics = self.diagnostics.lock().unwrap_or_else(|e| e.into_inner());
        if diagnostics.len() == MAX_DIAGNOSTICS {
            diagnostics.pop_front();
        }
        diagnostics.push_back(Diagnostic {
            at: Utc::now(),
            session_id: self.id,
            event_type: error.event_type().to_string(),
            message: error.to_string(),
        });
    }
}
