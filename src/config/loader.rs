//! Configuration loading and validation.
//!
//! Loads `simulation.toml`, checks every shared numeric range and gives a
//! clear message for misconfiguration. Variant-specific parameters are
//! re-validated by the strategy constructors themselves.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use super::{AppConfig, SimulatorConfig};

/// Load and validate a simulation configuration from a TOML file.
///
/// # Errors
/// Returns a detailed error if the file cannot be read, the TOML does not
/// parse, or a validation rule is violated.
pub fn load_config(path: &str) -> Result<AppConfig> {
    let path = Path::new(path);

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: AppConfig =
        toml::from_str(&content).with_context(|| "Failed to parse simulation.toml")?;

    validate_config(&config)?;

    info!(
        run = %config.run.name,
        trials = config.run.trials,
        strategies = config.strategies.len(),
        "Configuration loaded successfully"
    );

    Ok(config)
}

fn validate_config(config: &AppConfig) -> Result<()> {
    anyhow::ensure!(
        !config.strategies.is_empty(),
        "At least one strategy must be configured"
    );
    anyhow::ensure!(
        config.run.trials > 0,
        "Number of trials must be at least 1, got {}",
        config.run.trials
    );

    // Bankroll validation
    anyhow::ensure!(
        config.bankroll.initial_funds > 0.0,
        "initial_funds must be positive, got {}",
        config.bankroll.initial_funds
    );
    anyhow::ensure!(
        (0.0..=1.0).contains(&config.bankroll.percent_bettable),
        "percent_bettable must be in [0, 1], got {}",
        config.bankroll.percent_bettable
    );
    if let Some(mdd) = config.bankroll.max_draw_down {
        anyhow::ensure!(
            mdd > 0.0 && mdd <= 1.0,
            "max_draw_down must be in (0, 1], got {mdd}"
        );
    }

    // Bet economics validation
    anyhow::ensure!(
        config.bet.payoff > 0.0,
        "payoff must be positive, got {}",
        config.bet.payoff
    );
    anyhow::ensure!(
        config.bet.loss >= 0.0,
        "loss must be non-negative, got {}",
        config.bet.loss
    );
    anyhow::ensure!(
        config.bet.transaction_cost >= 0.0,
        "transaction_cost must be non-negative, got {}",
        config.bet.transaction_cost
    );

    // Simulator validation
    match config.simulator {
        SimulatorConfig::Repeated { probability } => {
            anyhow::ensure!(
                (0.0..=1.0).contains(&probability),
                "probability must be in [0, 1], got {probability}"
            );
        }
        SimulatorConfig::Random { stdev } => {
            anyhow::ensure!(stdev >= 0.0, "stdev must be non-negative, got {stdev}");
        }
        SimulatorConfig::RandomUncertain {
            stdev,
            uncertainty_stdev,
        } => {
            anyhow::ensure!(stdev >= 0.0, "stdev must be non-negative, got {stdev}");
            anyhow::ensure!(
                uncertainty_stdev >= 0.0,
                "uncertainty_stdev must be non-negative, got {uncertainty_stdev}"
            );
        }
    }

    Ok(())
}
