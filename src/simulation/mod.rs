//! Monte Carlo simulation core

mod engine;
mod growth;
mod resample;
mod spending;
mod trial;

pub use engine::{AggregateResult, MonteCarloEngine, SimulationConfig};
pub use growth::{grow, TrialGrowth};
pub use resample::resample;
pub use spending::{spending_model, ConstantSpending, SpendingModel, StagedInflationSpending};
pub use trial::{run_trial, TrialOutcome, TrialResult};
