//! Retirement System - Monte Carlo survival analysis for retirement portfolios
//!
//! This library provides:
//! - Spending models (constant and staged-with-inflation withdrawal schedules)
//! - Two-bucket (growth/fixed-income) capital growth
//! - Permutation resampling of historical annual returns
//! - Per-trial portfolio evolution and trial aggregation statistics
//! - Plain-text history ingestion and JSON plan configuration

pub mod error;
pub mod history;
pub mod plan;
pub mod scenario;
pub mod simulation;

// Re-export commonly used types
pub use error::SimulationError;
pub use history::{load_returns, ReturnSeries};
pub use plan::{load_plan, RetirementPlan, SpendingSchedule, SpendingSegment};
pub use scenario::ScenarioRunner;
pub use simulation::{AggregateResult, MonteCarloEngine, SimulationConfig};
