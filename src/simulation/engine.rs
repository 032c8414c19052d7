//! Monte Carlo trial loop and aggregation

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::growth::TrialGrowth;
use super::resample::resample;
use super::spending::spending_model;
use super::trial::{run_trial, TrialResult};
use crate::error::SimulationError;
use crate::plan::RetirementPlan;

/// Engine configuration. Trial count and seed are explicit inputs, not
/// hidden constants, so tests can pin both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Number of independent trials
    pub num_trials: u32,
    /// Base RNG seed. `None` draws a fresh one per run.
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            num_trials: 10_000,
            seed: None,
        }
    }
}

/// Aggregate statistics over a full run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateResult {
    /// Trials executed
    pub trials: u32,
    /// Trials that stayed solvent through the horizon
    pub successes: u32,
    /// Sum of final-year capital over successful trials
    pub total_successful_wealth: f64,
    /// successes / trials
    pub success_probability: f64,
    /// Successful final wealth averaged over ALL trials, successes and
    /// failures alike (the reference statistic's denominator).
    pub average_successful_final_wealth: f64,
    /// The average above deflated to year-0 dollars by `(1+cpi)^horizon`
    pub average_successful_final_wealth_deflated: f64,
    /// Survived-year count of the most recently observed failing trial.
    /// Not a minimum over all failures; the reference tracker keeps only
    /// the last failure it saw. `None` when every trial succeeded.
    pub shortest_failing_run_length: Option<u32>,
}

/// Runs many independent trials and aggregates their outcomes
pub struct MonteCarloEngine {
    config: SimulationConfig,
}

impl MonteCarloEngine {
    pub fn new(config: SimulationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Evaluate a plan against a historical return record.
    ///
    /// Each trial binds a fresh permutation of the record into its own
    /// growth function; plan and record are shared read-only. Trials run
    /// on the rayon pool but are collected in trial order and folded
    /// sequentially, so a seeded run produces identical output at any
    /// worker count.
    pub fn evaluate(
        &self,
        plan: &RetirementPlan,
        historical_returns: &[f64],
    ) -> Result<AggregateResult, SimulationError> {
        plan.validate()?;
        if self.config.num_trials == 0 {
            return Err(SimulationError::invalid_plan("num_trials must be positive"));
        }
        if historical_returns.len() < plan.target_years as usize {
            return Err(SimulationError::InsufficientHistoricalData {
                required: plan.target_years as usize,
                available: historical_returns.len(),
            });
        }

        let base_seed = match self.config.seed {
            Some(seed) => seed,
            None => rand::thread_rng().gen(),
        };
        let spending = spending_model(&plan.schedule, plan.cpi);

        let results: Vec<TrialResult> = (0..self.config.num_trials)
            .into_par_iter()
            .map(|trial| {
                let mut rng = StdRng::seed_from_u64(derive_trial_seed(base_seed, trial));
                let resampled = resample(historical_returns, plan.target_years, &mut rng)?;
                let growth = TrialGrowth::new(resampled, plan.balance, plan.cash_rate);
                run_trial(plan, spending.as_ref(), &growth)
            })
            .collect::<Result<Vec<_>, SimulationError>>()?;

        Ok(aggregate(&results, plan))
    }
}

/// Fold ordered trial results into the run statistics.
fn aggregate(trials: &[TrialResult], plan: &RetirementPlan) -> AggregateResult {
    let mut successes = 0u32;
    let mut total_successful_wealth = 0.0;
    let mut last_failing_run = None;

    for trial in trials {
        if trial.is_success() {
            successes += 1;
            total_successful_wealth += trial.final_wealth().unwrap_or(0.0);
        } else {
            last_failing_run = Some(trial.survived_years());
        }
    }

    let trial_count = trials.len() as f64;
    let average_successful_final_wealth = total_successful_wealth / trial_count;
    let deflator = (1.0 + plan.cpi).powi(plan.target_years as i32);

    AggregateResult {
        trials: trials.len() as u32,
        successes,
        total_successful_wealth,
        success_probability: successes as f64 / trial_count,
        average_successful_final_wealth,
        average_successful_final_wealth_deflated: average_successful_final_wealth / deflator,
        shortest_failing_run_length: last_failing_run,
    }
}

/// Mix a trial index into the base seed (splitmix64 finalizer) so trials
/// get decorrelated, reproducible RNG streams.
fn derive_trial_seed(base_seed: u64, trial_index: u32) -> u64 {
    let mut z = base_seed
        .wrapping_add((trial_index as u64).wrapping_mul(0x9E3779B97F4A7C15))
        .wrapping_add(0x9E3779B97F4A7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::{SpendingSchedule, SpendingSegment};
    use crate::simulation::trial::TrialOutcome;
    use approx::assert_relative_eq;

    fn flat_plan(target_years: u32, initial_capital: f64, spend: f64) -> RetirementPlan {
        RetirementPlan::new(
            target_years,
            initial_capital,
            0.0,
            0.0,
            0.0,
            SpendingSchedule::Constant {
                annual_amount: spend,
            },
        )
        .unwrap()
    }

    fn mixed_history() -> Vec<f64> {
        (0..30)
            .map(|i| if i % 2 == 0 { 0.08 } else { -0.03 } + i as f64 * 0.001)
            .collect()
    }

    fn seeded(num_trials: u32, seed: u64) -> MonteCarloEngine {
        MonteCarloEngine::new(SimulationConfig {
            num_trials,
            seed: Some(seed),
        })
    }

    fn success(final_wealth: f64) -> TrialResult {
        TrialResult {
            trajectory: vec![final_wealth],
            outcome: TrialOutcome::Succeeded,
        }
    }

    fn failure(survived_years: usize) -> TrialResult {
        TrialResult {
            trajectory: vec![1.0; survived_years],
            outcome: TrialOutcome::Failed,
        }
    }

    #[test]
    fn test_success_probability_is_within_unit_interval() {
        let plan = RetirementPlan::new(
            10,
            1_000_000.0,
            0.02,
            0.0,
            0.7,
            SpendingSchedule::Constant {
                annual_amount: 90_000.0,
            },
        )
        .unwrap();

        let result = seeded(200, 11).evaluate(&plan, &mixed_history()).unwrap();

        assert_eq!(result.trials, 200);
        assert!(result.success_probability >= 0.0);
        assert!(result.success_probability <= 1.0);
    }

    #[test]
    fn test_same_seed_reproduces_aggregates() {
        let plan = RetirementPlan::new(
            15,
            1_500_000.0,
            0.02,
            0.03,
            0.6,
            SpendingSchedule::Staged {
                segments: vec![
                    SpendingSegment {
                        amount: 90_000.0,
                        duration_years: 5,
                    },
                    SpendingSegment {
                        amount: 70_000.0,
                        duration_years: 10,
                    },
                ],
                extend_final: true,
            },
        )
        .unwrap();
        let history = mixed_history();

        let first = seeded(300, 42).evaluate(&plan, &history).unwrap();
        let second = seeded(300, 42).evaluate(&plan, &history).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_all_cash_plan_is_deterministic_success() {
        // balance=0 ignores equity returns, so every permutation yields
        // the same trajectory.
        let plan = RetirementPlan::new(
            20,
            1_000_000.0,
            0.05,
            0.0,
            0.0,
            SpendingSchedule::Constant {
                annual_amount: 50_000.0,
            },
        )
        .unwrap();

        let result = seeded(50, 5).evaluate(&plan, &mixed_history()).unwrap();

        assert_eq!(result.successes, 50);
        assert_eq!(result.success_probability, 1.0);
        assert_eq!(result.shortest_failing_run_length, None);
        assert_relative_eq!(
            result.average_successful_final_wealth * result.trials as f64,
            result.total_successful_wealth,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_certain_failure_in_year_zero() {
        let plan = flat_plan(5, 100_000.0, 100_000.0);

        let result = seeded(25, 9).evaluate(&plan, &mixed_history()).unwrap();

        assert_eq!(result.successes, 0);
        assert_eq!(result.success_probability, 0.0);
        assert_eq!(result.total_successful_wealth, 0.0);
        assert_eq!(result.shortest_failing_run_length, Some(0));
    }

    #[test]
    fn test_insufficient_history_is_rejected_up_front() {
        let plan = flat_plan(10, 1_000_000.0, 10_000.0);
        let short_history = vec![0.05; 5];

        let result = seeded(10, 1).evaluate(&plan, &short_history);
        assert!(matches!(
            result,
            Err(SimulationError::InsufficientHistoricalData {
                required: 10,
                available: 5,
            })
        ));
    }

    #[test]
    fn test_zero_trials_is_rejected() {
        let engine = MonteCarloEngine::new(SimulationConfig {
            num_trials: 0,
            seed: Some(1),
        });
        let plan = flat_plan(5, 1_000_000.0, 10_000.0);

        let result = engine.evaluate(&plan, &mixed_history());
        assert!(matches!(result, Err(SimulationError::InvalidPlan { .. })));
    }

    #[test]
    fn test_engine_revalidates_the_plan() {
        let mut plan = flat_plan(5, 1_000_000.0, 10_000.0);
        plan.balance = 1.5;

        let result = seeded(10, 1).evaluate(&plan, &mixed_history());
        assert!(matches!(result, Err(SimulationError::InvalidPlan { .. })));
    }

    #[test]
    fn test_average_divides_by_total_trials() {
        let plan = flat_plan(1, 1_000_000.0, 10.0);
        let trials = vec![success(100.0), failure(3), success(200.0), failure(1)];

        let result = aggregate(&trials, &plan);

        assert_eq!(result.trials, 4);
        assert_eq!(result.successes, 2);
        assert_eq!(result.total_successful_wealth, 300.0);
        // 300 / 4 trials, not 300 / 2 successes
        assert_relative_eq!(result.average_successful_final_wealth, 75.0, max_relative = 1e-12);
        assert_relative_eq!(result.success_probability, 0.5, max_relative = 1e-12);
    }

    #[test]
    fn test_failing_run_tracker_keeps_the_last_failure_seen() {
        let plan = flat_plan(1, 1_000_000.0, 10.0);

        let trials = vec![failure(3), success(100.0), failure(1)];
        assert_eq!(
            aggregate(&trials, &plan).shortest_failing_run_length,
            Some(1)
        );

        // Reordered, the longer failure is observed last and wins even
        // though a shorter one exists.
        let trials = vec![failure(1), success(100.0), failure(3)];
        assert_eq!(
            aggregate(&trials, &plan).shortest_failing_run_length,
            Some(3)
        );
    }

    #[test]
    fn test_deflated_average_divides_by_compounded_cpi() {
        let plan = RetirementPlan::new(
            10,
            1_000_000.0,
            0.0,
            0.03,
            0.0,
            SpendingSchedule::Constant {
                annual_amount: 10.0,
            },
        )
        .unwrap();
        let trials = vec![success(500.0), success(300.0)];

        let result = aggregate(&trials, &plan);

        assert_relative_eq!(result.average_successful_final_wealth, 400.0, max_relative = 1e-12);
        assert_relative_eq!(
            result.average_successful_final_wealth_deflated,
            400.0 / 1.03f64.powi(10),
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_trial_seeds_are_decorrelated() {
        let seeds: Vec<u64> = (0..100).map(|i| derive_trial_seed(7, i)).collect();
        let mut deduped = seeds.clone();
        deduped.sort_unstable();
        deduped.dedup();
        assert_eq!(deduped.len(), seeds.len());
    }
}
