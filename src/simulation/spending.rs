//! Withdrawal models
//!
//! A spending model answers one question: how much must be withdrawn in a
//! given simulated year. The two implementations are selected from the
//! plan's schedule at construction time.

use crate::error::SimulationError;
use crate::plan::{SpendingSchedule, SpendingSegment};

/// Required withdrawal for a simulated year
pub trait SpendingModel: Send + Sync {
    fn spend(&self, year: u32) -> Result<f64, SimulationError>;
}

/// Same nominal withdrawal every year, no inflation adjustment
#[derive(Debug, Clone)]
pub struct ConstantSpending {
    annual_spend: f64,
}

impl ConstantSpending {
    pub fn new(annual_spend: f64) -> Self {
        Self { annual_spend }
    }
}

impl SpendingModel for ConstantSpending {
    fn spend(&self, _year: u32) -> Result<f64, SimulationError> {
        Ok(self.annual_spend)
    }
}

/// Staged withdrawals escalated by inflation.
///
/// The segment containing `year` supplies the base amount, which is then
/// compounded by `(1 + cpi)^year` using the absolute year index. A stage
/// entered in year 6 therefore carries six years of compounding from day
/// one, not zero.
#[derive(Debug, Clone)]
pub struct StagedInflationSpending {
    segments: Vec<SpendingSegment>,
    cpi: f64,
    extend_final: bool,
}

impl StagedInflationSpending {
    pub fn new(segments: Vec<SpendingSegment>, cpi: f64, extend_final: bool) -> Self {
        Self {
            segments,
            cpi,
            extend_final,
        }
    }
}

impl SpendingModel for StagedInflationSpending {
    fn spend(&self, year: u32) -> Result<f64, SimulationError> {
        let mut remaining = year;
        let mut base = None;

        for segment in &self.segments {
            if remaining < segment.duration_years {
                base = Some(segment.amount);
                break;
            }
            remaining -= segment.duration_years;
        }

        let base = match base {
            Some(amount) => amount,
            None if self.extend_final => match self.segments.last() {
                Some(segment) => segment.amount,
                None => return Err(SimulationError::NoSpendingData { year }),
            },
            None => return Err(SimulationError::NoSpendingData { year }),
        };

        Ok(base * (1.0 + self.cpi).powi(year as i32))
    }
}

/// Build the spending model a plan's schedule calls for.
pub fn spending_model(schedule: &SpendingSchedule, cpi: f64) -> Box<dyn SpendingModel> {
    match schedule {
        SpendingSchedule::Constant { annual_amount } => {
            Box::new(ConstantSpending::new(*annual_amount))
        }
        SpendingSchedule::Staged {
            segments,
            extend_final,
        } => Box::new(StagedInflationSpending::new(
            segments.clone(),
            cpi,
            *extend_final,
        )),
    }
}
