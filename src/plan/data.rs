//! Plan data structures

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::SimulationError;

/// One stage of a staged spending schedule: a base annual amount held for
/// a number of years.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpendingSegment {
    /// Base annual withdrawal, in year-0 dollars
    pub amount: f64,
    /// How many years this stage lasts
    pub duration_years: u32,
}

/// Withdrawal schedule for a plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SpendingSchedule {
    /// Same nominal amount every year, no inflation escalation
    Constant { annual_amount: f64 },
    /// Ordered stages, each inflated from year 0 by the plan's CPI.
    /// `extend_final` keeps the last stage's amount in force past the end
    /// of the schedule; without it, years beyond the schedule are an error.
    Staged {
        segments: Vec<SpendingSegment>,
        extend_final: bool,
    },
}

impl SpendingSchedule {
    /// Total years covered by the schedule's explicit stages.
    /// A constant schedule covers every year.
    pub fn defined_years(&self) -> Option<u32> {
        match self {
            SpendingSchedule::Constant { .. } => None,
            SpendingSchedule::Staged { segments, .. } => {
                Some(segments.iter().map(|s| s.duration_years).sum())
            }
        }
    }

    fn validate(&self) -> Result<(), SimulationError> {
        match self {
            SpendingSchedule::Constant { annual_amount } => {
                if !annual_amount.is_finite() || *annual_amount < 0.0 {
                    return Err(SimulationError::invalid_plan(format!(
                        "spending amount must be non-negative and finite, got {}",
                        annual_amount
                    )));
                }
            }
            SpendingSchedule::Staged { segments, .. } => {
                if segments.is_empty() {
                    return Err(SimulationError::invalid_plan(
                        "staged spending schedule has no segments",
                    ));
                }
                for segment in segments {
                    if !segment.amount.is_finite() || segment.amount < 0.0 {
                        return Err(SimulationError::invalid_plan(format!(
                            "spending amount must be non-negative and finite, got {}",
                            segment.amount
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for SpendingSchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpendingSchedule::Constant { annual_amount } => {
                write!(f, "${:.0} per year", annual_amount)
            }
            SpendingSchedule::Staged { segments, .. } => {
                let mut first = true;
                for segment in segments {
                    if !first {
                        writeln!(f)?;
                    }
                    write!(f, "${:.0} for {} years", segment.amount, segment.duration_years)?;
                    first = false;
                }
                Ok(())
            }
        }
    }
}

/// A retirement plan: horizon, starting capital, market assumptions, and
/// withdrawal schedule. Validated at construction and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetirementPlan {
    /// Planning horizon in years; the portfolio must survive this long
    pub target_years: u32,
    /// Starting portfolio value
    pub initial_capital: f64,
    /// Annual return on the fixed-income bucket, as a fraction
    pub cash_rate: f64,
    /// Assumed annual inflation rate, as a fraction
    pub cpi: f64,
    /// Fraction of the portfolio held in growth assets, in [0, 1]
    pub balance: f64,
    /// Withdrawal schedule
    pub schedule: SpendingSchedule,
}

impl RetirementPlan {
    pub fn new(
        target_years: u32,
        initial_capital: f64,
        cash_rate: f64,
        cpi: f64,
        balance: f64,
        schedule: SpendingSchedule,
    ) -> Result<Self, SimulationError> {
        let plan = Self {
            target_years,
            initial_capital,
            cash_rate,
            cpi,
            balance,
            schedule,
        };
        plan.validate()?;
        Ok(plan)
    }

    /// Copy of this plan with a different growth allocation, re-validated.
    pub fn with_balance(&self, balance: f64) -> Result<Self, SimulationError> {
        let mut plan = self.clone();
        plan.balance = balance;
        plan.validate()?;
        Ok(plan)
    }

    /// Reject out-of-range or non-finite inputs before they can reach the
    /// simulation loop as NaNs.
    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.target_years == 0 {
            return Err(SimulationError::invalid_plan("target_years must be positive"));
        }
        if !self.initial_capital.is_finite() || self.initial_capital <= 0.0 {
            return Err(SimulationError::invalid_plan(format!(
                "initial_capital must be positive and finite, got {}",
                self.initial_capital
            )));
        }
        if !self.cash_rate.is_finite() {
            return Err(SimulationError::invalid_plan("cash_rate must be finite"));
        }
        if !self.cpi.is_finite() {
            return Err(SimulationError::invalid_plan("cpi must be finite"));
        }
        if !self.balance.is_finite() || !(0.0..=1.0).contains(&self.balance) {
            return Err(SimulationError::invalid_plan(format!(
                "balance must be within [0, 1], got {}",
                self.balance
            )));
        }
        self.schedule.validate()
    }
}
