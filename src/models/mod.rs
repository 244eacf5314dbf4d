//! Data types shared by the tokenizer, reducer, and controller.

mod request;
pub mod report;
mod session;
mod stage;

pub use report::{ChartConfig, ChartKind, KeyMetric, ParsedReport, ReportMetadata};
pub use request::{HealthStatus, ResearchDepth, ResearchRequest};
pub use session::{SessionSnapshot, SessionState, Source};
pub use stage::Stage;
