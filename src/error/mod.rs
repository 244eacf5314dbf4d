//! Error handling for research sessions.
//!
//! - **Error Categories**: High-level classification for handling decisions
//! - **Session Errors**: `SessionError` covers request setup, transport,
//!   and backend-reported failures
//! - **Result Type Alias**: `SessionResult<T>`
//!
//! # Error Categories
//!
//! | Category | Description | Retryable |
//! |----------|-------------|-----------|
//! | Network | Connection, timeout, dropped stream | Yes |
//! | Server | 5xx, missing body, `error` event | Yes |
//! | Client | 4xx, invalid topic or depth | No |
//! | Cancelled | Request aborted by the transport | No |
//! | Configuration | Bad backend URL | No |

mod category;
mod session;

pub use category::ErrorCategory;
pub use session::SessionError;

/// Result alias for session operations.
pub type SessionResult<T> = Result<T, SessionError>;
