use serde::{Deserialize, Serialize};
use std::fmt;

/// Phase of a research session.
///
/// The backend reports its pipeline steps by agent name (`strategist`,
/// `researcher`, ...). Those labels are accepted as aliases of the
/// canonical stage names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// No session running
    #[default]
    Idle,
    /// Research strategy is being drafted
    #[serde(alias = "strategist")]
    Planning,
    /// Sources are being searched and collected
    #[serde(alias = "researcher")]
    Researching,
    /// Collected data is being analyzed and charted
    #[serde(alias = "analyst", alias = "visualizer")]
    Analyzing,
    /// Final report is being written
    #[serde(alias = "synthesizer")]
    Writing,
    /// Report finished
    Complete,
    /// Session failed
    Error,
}

impl Stage {
    /// Returns true for `Complete` and `Error`.
    pub fn is_terminal(self) -> bool {
        matches!(self, Stage::Complete | Stage::Error)
    }

    /// Returns true for the four working stages.
    pub fn is_working(self) -> bool {
        matches!(
            self,
            Stage::Planning | Stage::Researching | Stage::Analyzing | Stage::Writing
        )
    }

    /// Coarse progress index used by dashboards: 0 idle, 1 planning,
    /// 2 working, 3 complete. `Error` collapses to 0.
    pub fn progress_step(self) -> u8 {
        match self {
            Stage::Idle | Stage::Error => 0,
            Stage::Planning => 1,
            Stage::Researching | Stage::Analyzing | Stage::Writing => 2,
            Stage::Complete => 3,
        }
    }

    /// Human readable label.
    pub fn label(self) -> &'static str {
        match self {
            Stage::Idle => "Ready",
            Stage::Planning => "Planning research strategy",
            Stage::Researching => "Gathering sources",
            Stage::Analyzing => "Analyzing findings",
            Stage::Writing => "Writing report",
            Stage::Complete => "Complete",
            Stage::Error => "Failed",
        }
    }

    /// Canonical wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Idle => "idle",
            Stage::Planning => "planning",
            Stage::Researching => "researching",
            Stage::Analyzing => "analyzing",
            Stage::Writing => "writing",
            Stage::Complete => "complete",
            Stage::Error => "error",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
