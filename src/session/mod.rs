//! Research session state machine.
//!
//! - `reducer` - pure `(SessionState, &ResearchEvent) -> SessionState`
//! - `controller` - session lifecycle, read loop, cancellation, publication

mod controller;
mod reducer;

pub use controller::{Diagnostic, SessionController, MAX_DIAGNOSTICS};
pub use reducer::reduce;
