//! Capital growth under a two-bucket allocation

/// One year of growth: the growth bucket earns `equity_return`, the
/// fixed-income bucket earns `cash_rate`, weighted by `balance`.
///
/// `balance = 1` isolates pure equity behavior; `balance = 0` isolates
/// pure fixed-income behavior and the equity return drops out entirely.
pub fn grow(capital: f64, equity_return: f64, balance: f64, cash_rate: f64) -> f64 {
    capital * (1.0 + equity_return) * balance + capital * (1.0 + cash_rate) * (1.0 - balance)
}

/// Growth function for one trial: a resampled return sequence bound to an
/// allocation and cash rate.
///
/// Built per trial and passed by value through the simulator, so trials
/// share no state and the mapping can be exercised in isolation.
#[derive(Debug, Clone)]
pub struct TrialGrowth {
    returns: Vec<f64>,
    balance: f64,
    cash_rate: f64,
}

impl TrialGrowth {
    pub fn new(returns: Vec<f64>, balance: f64, cash_rate: f64) -> Self {
        Self {
            returns,
            balance,
            cash_rate,
        }
    }

    /// Grow `capital` through simulated year `year` using that year's
    /// resampled return.
    pub fn apply(&self, capital: f64, year: u32) -> f64 {
        grow(
            capital,
            self.returns[year as usize],
            self.balance,
            self.cash_rate,
        )
    }

    /// Number of years of returns bound to this trial.
    pub fn years(&self) -> usize {
        self.returns.len()
    }
}
