//! Single-trial portfolio evolution

use serde::{Deserialize, Serialize};

use super::growth::TrialGrowth;
use super::spending::SpendingModel;
use crate::error::SimulationError;
use crate::plan::RetirementPlan;

/// Terminal classification of a trial
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrialOutcome {
    /// Solvent through the full horizon
    Succeeded,
    /// Insolvent before the horizon
    Failed,
}

/// One simulated portfolio lifetime
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialResult {
    /// Start-of-year capital, recorded before that year's withdrawal.
    /// Length equals the number of years survived.
    pub trajectory: Vec<f64>,
    pub outcome: TrialOutcome,
}

impl TrialResult {
    pub fn is_success(&self) -> bool {
        self.outcome == TrialOutcome::Succeeded
    }

    /// Years the portfolio stayed solvent (0 if it failed in year 0).
    pub fn survived_years(&self) -> u32 {
        self.trajectory.len() as u32
    }

    /// Capital at the start of the final simulated year, if any year
    /// completed.
    pub fn final_wealth(&self) -> Option<f64> {
        self.trajectory.last().copied()
    }
}

/// Evolve one trial's capital year by year until depletion or the end of
/// the horizon.
///
/// Per year: evaluate the withdrawal, fail if capital cannot cover it,
/// record start-of-year capital, withdraw, then grow what remains.
pub fn run_trial(
    plan: &RetirementPlan,
    spending: &dyn SpendingModel,
    growth: &TrialGrowth,
) -> Result<TrialResult, SimulationError> {
    let mut capital = plan.initial_capital;
    let mut trajectory = Vec::with_capacity(plan.target_years as usize);

    for year in 0..plan.target_years {
        let spend = spending.spend(year)?;
        if capital <= spend {
            return Ok(TrialResult {
                trajectory,
                outcome: TrialOutcome::Failed,
            });
        }
        trajectory.push(capital);
        capital -= spend;
        capital = growth.apply(capital, year);
    }

    Ok(TrialResult {
        trajectory,
        outcome: TrialOutcome::Succeeded,
    })
}
