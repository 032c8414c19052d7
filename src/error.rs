//! Error types surfaced by loading and simulation

use thiserror::Error;

/// Errors raised while loading inputs or running simulations
#[derive(Debug, Error)]
pub enum SimulationError {
    /// A history line that is not `<year> <percentage>`. Recoverable:
    /// the loader skips the line and keeps reading.
    #[error("{line:?} is not in the format '<year> <percentage>'")]
    MalformedHistoricalRecord { line: String },

    /// The historical record is shorter than the planning horizon.
    /// Detected before any trial consumes an index.
    #[error("historical record covers {available} years but the plan requires {required}")]
    InsufficientHistoricalData { required: usize, available: usize },

    /// A staged spending schedule with `extend_final` disabled was asked
    /// for a year past its final segment.
    #[error("no spending data for year {year}")]
    NoSpendingData { year: u32 },

    /// Plan or engine configuration failed validation.
    #[error("invalid plan: {reason}")]
    InvalidPlan { reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(#[from] serde_json::Error),
}

impl SimulationError {
    pub fn invalid_plan(reason: impl Into<String>) -> Self {
        SimulationError::InvalidPlan {
            reason: reason.into(),
        }
    }
}
