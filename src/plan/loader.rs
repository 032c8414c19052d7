//! JSON plan configuration loader
//!
//! The file supplies rates as percentages; they are divided by 100 here,
//! upstream of the core, which only ever sees fractions.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::Deserialize;

use super::{RetirementPlan, SpendingSchedule, SpendingSegment};
use crate::error::SimulationError;
use crate::simulation::SimulationConfig;

/// Raw JSON document shape
#[derive(Debug, Deserialize)]
struct PlanFile {
    target_years: u32,
    initial_capital: f64,
    /// Fixed-income annual return, percent
    cash_rate: f64,
    /// Annual inflation rate, percent
    cpi: f64,
    /// Growth allocation, fraction in [0, 1]
    balance: f64,
    num_runs: u32,
    /// Ordered spending stages
    spending: Vec<SpendingEntry>,
    #[serde(default = "default_extend_final")]
    extend_final: bool,
    #[serde(default)]
    seed: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct SpendingEntry {
    amount: f64,
    years: u32,
}

fn default_extend_final() -> bool {
    true
}

impl PlanFile {
    fn into_plan(self) -> Result<(RetirementPlan, SimulationConfig), SimulationError> {
        if self.num_runs == 0 {
            return Err(SimulationError::invalid_plan("num_runs must be positive"));
        }

        let segments = self
            .spending
            .into_iter()
            .map(|entry| SpendingSegment {
                amount: entry.amount,
                duration_years: entry.years,
            })
            .collect();

        let plan = RetirementPlan::new(
            self.target_years,
            self.initial_capital,
            self.cash_rate / 100.0,
            self.cpi / 100.0,
            self.balance,
            SpendingSchedule::Staged {
                segments,
                extend_final: self.extend_final,
            },
        )?;

        let config = SimulationConfig {
            num_trials: self.num_runs,
            seed: self.seed,
        };

        Ok((plan, config))
    }
}

/// Load a plan and simulation configuration from a JSON file.
pub fn load_plan<P: AsRef<Path>>(
    path: P,
) -> Result<(RetirementPlan, SimulationConfig), SimulationError> {
    let file = File::open(path)?;
    load_plan_from_reader(BufReader::new(file))
}

/// Load a plan and simulation configuration from any reader.
pub fn load_plan_from_reader<R: Read>(
    reader: R,
) -> Result<(RetirementPlan, SimulationConfig), SimulationError> {
    let raw: PlanFile = serde_json::from_reader(reader)?;
    raw.into_plan()
}
