//! Scenario runner for efficient batch evaluations
//!
//! Pre-loads the historical return record once, then allows running many
//! evaluations with different plans or configurations without re-reading
//! the data file.

use std::path::Path;

use crate::error::SimulationError;
use crate::history::load_returns;
use crate::plan::RetirementPlan;
use crate::simulation::{AggregateResult, MonteCarloEngine, SimulationConfig};

/// Pre-loaded scenario runner
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::from_file("data/returns_history.txt")?;
///
/// for balance in [0.4, 0.6, 0.8] {
///     let result = runner.run(&plan.with_balance(balance)?, config)?;
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    historical_returns: Vec<f64>,
}

impl ScenarioRunner {
    /// Create a runner around an already-loaded return sequence.
    pub fn new(historical_returns: Vec<f64>) -> Self {
        Self { historical_returns }
    }

    /// Create a runner by loading a `<year> <percentage>` history file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SimulationError> {
        Ok(Self::new(load_returns(path)?.returns()))
    }

    /// Run a single evaluation with the given config.
    pub fn run(
        &self,
        plan: &RetirementPlan,
        config: SimulationConfig,
    ) -> Result<AggregateResult, SimulationError> {
        MonteCarloEngine::new(config).evaluate(plan, &self.historical_returns)
    }

    /// Evaluate multiple plans under the same config.
    pub fn run_scenarios(
        &self,
        plans: &[RetirementPlan],
        config: SimulationConfig,
    ) -> Result<Vec<AggregateResult>, SimulationError> {
        plans.iter().map(|plan| self.run(plan, config)).collect()
    }

    /// Evaluate one plan across growth allocations 0..=1 in `steps` even
    /// increments, returning `(balance, result)` pairs.
    pub fn sweep_balance(
        &self,
        plan: &RetirementPlan,
        steps: u32,
        config: SimulationConfig,
    ) -> Result<Vec<(f64, AggregateResult)>, SimulationError> {
        if steps == 0 {
            return Err(SimulationError::invalid_plan("sweep needs at least one step"));
        }

        let mut results = Vec::with_capacity(steps as usize + 1);
        for step in 0..=steps {
            let balance = step as f64 / steps as f64;
            let result = self.run(&plan.with_balance(balance)?, config)?;
            results.push((balance, result));
        }
        Ok(results)
    }

    /// The loaded return record, in its original order.
    pub fn historical_returns(&self) -> &[f64] {
        &self.historical_returns
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::SpendingSchedule;

    fn test_plan() -> RetirementPlan {
        RetirementPlan::new(
            10,
            1_000_000.0,
            0.02,
            0.0,
            0.5,
            SpendingSchedule::Constant {
                annual_amount: 80_000.0,
            },
        )
        .unwrap()
    }

    fn test_history() -> Vec<f64> {
        (0..20).map(|i| (i as f64 - 8.0) / 100.0).collect()
    }

    fn test_config() -> SimulationConfig {
        SimulationConfig {
            num_trials: 100,
            seed: Some(17),
        }
    }

    #[test]
    fn test_runner_matches_direct_engine_call() {
        let runner = ScenarioRunner::new(test_history());
        let plan = test_plan();

        let via_runner = runner.run(&plan, test_config()).unwrap();
        let direct = MonteCarloEngine::new(test_config())
            .evaluate(&plan, &test_history())
            .unwrap();

        assert_eq!(via_runner, direct);
    }

    #[test]
    fn test_run_scenarios_returns_one_result_per_plan() {
        let runner = ScenarioRunner::new(test_history());
        let plans = vec![
            test_plan(),
            test_plan().with_balance(0.0).unwrap(),
            test_plan().with_balance(1.0).unwrap(),
        ];

        let results = runner.run_scenarios(&plans, test_config()).unwrap();
        assert_eq!(results.len(), 3);
        for result in &results {
            assert_eq!(result.trials, 100);
        }
    }

    #[test]
    fn test_sweep_balance_covers_both_endpoints() {
        let runner = ScenarioRunner::new(test_history());

        let sweep = runner.sweep_balance(&test_plan(), 4, test_config()).unwrap();

        assert_eq!(sweep.len(), 5);
        assert_eq!(sweep[0].0, 0.0);
        assert_eq!(sweep[4].0, 1.0);
        assert!((sweep[2].0 - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_sweep_rejects_zero_steps() {
        let runner = ScenarioRunner::new(test_history());
        let result = runner.sweep_balance(&test_plan(), 0, test_config());
        assert!(matches!(result, Err(SimulationError::InvalidPlan { .. })));
    }
}
