//! betsizer — Simulation Runner Entry Point
//!
//! Loads `simulation.toml`, races every configured strategy through the
//! configured simulator against its own copy of the bankroll, and prints a
//! JSON summary of the outcomes.
//!
//! Wiring sequence:
//! 1. Load simulation.toml + validate
//! 2. Init tracing (JSON structured logging)
//! 3. Per strategy entry: build bankroll + strategy + RNG, run the loop
//! 4. Emit the run summary as JSON on stdout

use anyhow::{Context, Result};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use tracing::{info, warn};

mod config;
mod domain;
mod error;
mod simulators;

use config::{AppConfig, SimulatorConfig, StrategyConfig};
use domain::BankRoll;
use error::BankrollError;
use simulators::{RandomBinarySimulator, RandomUncertainBinarySimulator, RepeatedBinarySimulator};

/// Outcome of one strategy's run, serialized into the summary.
#[derive(Debug, Serialize)]
struct StrategyReport {
    name: String,
    initial_funds: f64,
    final_funds: f64,
    /// Settled trials (history entries beyond the initial snapshot).
    trials_settled: usize,
    ruined: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    ruin_reason: Option<String>,
}

#[derive(Debug, Serialize)]
struct RunSummary {
    run: String,
    trials: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<u64>,
    strategies: Vec<StrategyReport>,
}

fn main() -> Result<()> {
    // ── 1. Load configuration from simulation.toml ──────────
    let config =
        config::loader::load_config("simulation.toml").context("Failed to load configuration")?;

    // ── 2. Initialize structured JSON logging ───────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.run.log_level)),
        )
        .json()
        .init();

    info!(
        run = %config.run.name,
        version = env!("CARGO_PKG_VERSION"),
        trials = config.run.trials,
        strategies = config.strategies.len(),
        "Starting simulation run"
    );

    // ── 3. Run every strategy against its own bankroll ──────
    let mut reports = Vec::with_capacity(config.strategies.len());
    for entry in &config.strategies {
        reports.push(run_strategy(&config, entry)?);
    }

    // ── 4. Emit the summary ─────────────────────────────────
    let summary = RunSummary {
        run: config.run.name.clone(),
        trials: config.run.trials,
        seed: config.run.seed,
        strategies: reports,
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&summary).context("Failed to serialize run summary")?
    );

    Ok(())
}

/// Runs one strategy entry through the configured simulator.
///
/// A ruin error ends the run early and is reported, not propagated: early
/// termination is an outcome of the comparison, not a failure of the
/// runner.
fn run_strategy(config: &AppConfig, entry: &StrategyConfig) -> Result<StrategyReport> {
    let name = entry
        .name
        .clone()
        .unwrap_or_else(|| entry.variant.kind_name().to_string());

    let mut bankroll = BankRoll::new(
        config.bankroll.initial_funds,
        config.bankroll.percent_bettable,
        config.bankroll.max_draw_down,
    );
    let mut strategy = entry
        .variant
        .build(&config.bet, config.bankroll.initial_funds)
        .with_context(|| format!("Failed to build strategy '{name}'"))?;

    // A shared seed gives every strategy the identical outcome stream.
    let mut rng = match config.run.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let trials = config.run.trials;
    let outcome: Result<(), BankrollError> = match config.simulator {
        SimulatorConfig::Repeated { probability } => RepeatedBinarySimulator::new(
            probability, trials,
        )?
        .evaluate_strategy_with_rng(&mut *strategy, &mut bankroll, &mut rng),
        SimulatorConfig::Random { stdev } => RandomBinarySimulator::new(stdev, trials)?
            .evaluate_strategy_with_rng(&mut *strategy, &mut bankroll, &mut rng),
        SimulatorConfig::RandomUncertain {
            stdev,
            uncertainty_stdev,
        } => RandomUncertainBinarySimulator::new(stdev, uncertainty_stdev, trials)?
            .evaluate_strategy_with_rng(&mut *strategy, &mut bankroll, &mut rng),
    };

    let ruin_reason = match outcome {
        Ok(()) => None,
        Err(err) => {
            warn!(strategy = %name, error = %err, "run ended in ruin");
            Some(err.to_string())
        }
    };

    info!(
        strategy = %name,
        final_funds = bankroll.total_funds(),
        settled = bankroll.history().len() - 1,
        "strategy run complete"
    );

    Ok(StrategyReport {
        name,
        initial_funds: config.bankroll.initial_funds,
        final_funds: bankroll.total_funds(),
        trials_settled: bankroll.history().len() - 1,
        ruined: ruin_reason.is_some(),
        ruin_reason,
    })
}
