//! Retirement System CLI
//!
//! Command-line interface for Monte Carlo analysis of retirement plans

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use retirement_system::{
    load_plan, load_returns, MonteCarloEngine, RetirementPlan, SimulationConfig, SpendingSchedule,
};

/// Monte Carlo analysis of retirement plans
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Starting portfolio value
    #[arg(short, long, default_value_t = 2_500_000.0)]
    capital: f64,

    /// Annual spending, same nominal amount every year
    #[arg(short, long, default_value_t = 120_000.0)]
    income: f64,

    /// Fixed-income (cash/bond) annual return, as a fraction
    #[arg(short = 'n', long, default_value_t = 0.03)]
    interest: f64,

    /// Assumed annual inflation rate, as a fraction
    #[arg(long, default_value_t = 0.0)]
    cpi: f64,

    /// Fraction of the portfolio held in growth assets, in [0, 1]
    #[arg(short, long, default_value_t = 0.8)]
    balance: f64,

    /// Planning horizon in years
    #[arg(short = 'y', long, default_value_t = 35)]
    years: u32,

    /// Number of Monte Carlo trials
    #[arg(short, long, default_value_t = 10_000)]
    runs: u32,

    /// RNG seed for reproducible runs
    #[arg(short, long)]
    seed: Option<u64>,

    /// Historical returns file, lines of '<year> <percentage>'
    #[arg(short, long, default_value = "data/returns_history.txt")]
    filename: PathBuf,

    /// JSON plan configuration; overrides the flat plan flags above
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();

    let (plan, mut config) = match &args.config {
        Some(path) => load_plan(path)
            .with_context(|| format!("loading plan configuration {}", path.display()))?,
        None => {
            let plan = RetirementPlan::new(
                args.years,
                args.capital,
                args.interest,
                args.cpi,
                args.balance,
                SpendingSchedule::Constant {
                    annual_amount: args.income,
                },
            )?;
            let config = SimulationConfig {
                num_trials: args.runs,
                seed: None,
            };
            (plan, config)
        }
    };
    if args.seed.is_some() {
        config.seed = args.seed;
    }

    let series = load_returns(&args.filename)
        .with_context(|| format!("loading return history {}", args.filename.display()))?;

    println!("Retirement System v0.1.0");
    println!("========================\n");
    println!(
        "Starting with ${:.0} over a {}-year horizon",
        plan.initial_capital, plan.target_years
    );
    println!("Spending:\n{}", plan.schedule);
    println!(
        "With a {:.0}:{:.0} growth:cash split",
        plan.balance * 100.0,
        (1.0 - plan.balance) * 100.0
    );
    println!(
        "Cash rate {:.2}%, CPI {:.2}%",
        plan.cash_rate * 100.0,
        plan.cpi * 100.0
    );
    println!(
        "History: {} years of annual returns from {}\n",
        series.len(),
        args.filename.display()
    );

    let engine = MonteCarloEngine::new(config);
    let result = engine.evaluate(&plan, &series.returns())?;

    println!("{} runs complete", result.trials);
    println!("Success rate: {:.2}%", result.success_probability * 100.0);
    println!(
        "Average final wealth in successful runs: ${:.2}",
        result.average_successful_final_wealth
    );
    println!(
        "  deflated to year-0 dollars: ${:.2}",
        result.average_successful_final_wealth_deflated
    );
    if let Some(years) = result.shortest_failing_run_length {
        println!("Last failing run survived {} years", years);
    }

    Ok(())
}
