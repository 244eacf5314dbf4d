use serde::{Deserialize, Serialize};
use std::fmt;

/// Verbosity tier of a research job.
///
/// Serialized as its integer value (`research_depth` on the wire).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ResearchDepth {
    #[default]
    Standard,
    Deep,
    Extensive,
}

impl ResearchDepth {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 3;

    pub fn as_u8(self) -> u8 {
        match self {
            ResearchDepth::Standard => 1,
            ResearchDepth::Deep => 2,
            ResearchDepth::Extensive => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ResearchDepth::Standard => "Standard",
            ResearchDepth::Deep => "Deep",
            ResearchDepth::Extensive => "Extensive",
        }
    }
}

impl TryFrom<u8> for ResearchDepth {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(ResearchDepth::Standard),
            2 => Ok(ResearchDepth::Deep),
            3 => Ok(ResearchDepth::Extensive),
            other => Err(format!(
                "research depth must be between {} and {}, got {}",
                Self::MIN,
                Self::MAX,
                other
            )),
        }
    }
}

impl From<ResearchDepth> for u8 {
    fn from(depth: ResearchDepth) -> Self {
        depth.as_u8()
    }
}

impl fmt::Display for ResearchDepth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.label(), self.as_u8())
    }
}

/// Body of `POST /research`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResearchRequest {
    /// Market or subject to research
    pub topic: String,
    /// Verbosity tier
    pub research_depth: ResearchDepth,
}

impl ResearchRequest {
    /// Create a request. The topic is trimmed.
    pub fn new(topic: &str, research_depth: ResearchDepth) -> Self {
        Self {
            topic: topic.trim().to_string(),
            research_depth,
        }
    }
}

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub model: Option<String>,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}
