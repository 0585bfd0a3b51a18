//! Error types for Dream Planner Core
//!
//! Provides error handling for:
//! - External generation failures (transport, status, shape)
//! - Roadmap storage failures
//! - Configuration loading and validation
//!
//! None of these reach the caller of
//! [`DreamPlanner::generate_roadmap`](crate::DreamPlanner::generate_roadmap):
//! generation errors are recovered by falling through to the next layer.

/// Failure of a single generation layer
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GenerationError {
    /// Network-level failure reaching the generator
    #[error("transport error: {0}")]
    Transport(String),

    /// Generator answered with a non-success status
    #[error("generator returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// Generator answered with no usable text
    #[error("generator returned an empty response")]
    EmptyResponse,

    /// Response text is not valid JSON of the expected shape
    #[error("could not parse generator response: {0}")]
    Parse(String),

    /// Response decoded but violates the contract
    #[error("invalid response shape: {0}")]
    InvalidShape(String),

    /// Sequence length outside the accepted range
    #[error("sequence length {len} outside accepted range {min}..={max}")]
    LengthOutOfRange { len: usize, min: usize, max: usize },

    /// Request exceeded its deadline
    #[error("generation timed out after {duration_secs}s")]
    Timeout { duration_secs: u64 },

    /// Generator is not configured
    #[error("generator configuration error: {0}")]
    Config(String),
}

impl GenerationError {
    /// Check if the failure happened before a response was decoded
    #[inline]
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Transport(_) | Self::Status { .. } | Self::Timeout { .. } | Self::Config(_)
        )
    }

    /// Check if the response arrived but failed validation
    #[inline]
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::EmptyResponse
                | Self::Parse(_)
                | Self::InvalidShape(_)
                | Self::LengthOutOfRange { .. }
        )
    }
}

impl From<serde_json::Error> for GenerationError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

/// Roadmap storage errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Roadmap does not exist
    #[error("roadmap not found: {0}")]
    NotFound(String),

    /// Milestone does not exist within the roadmap
    #[error("milestone {milestone} not found in roadmap {roadmap}")]
    MilestoneNotFound { roadmap: String, milestone: String },

    /// Task does not exist within the milestone
    #[error("task {task} not found in milestone {milestone}")]
    TaskNotFound { milestone: String, task: String },

    /// Record could not be encoded or decoded
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// Backend failure
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid TOML
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config values are inconsistent
    #[error("invalid config: {0}")]
    Invalid(String),
}
