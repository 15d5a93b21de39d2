//! Simulation run configuration.
//!
//! Loaded from `simulation.toml`. A run names one bankroll, one bet's
//! economics, one simulator regime and any number of strategies to race
//! against each other under identical conditions. All numeric ranges are
//! validated in [`loader`] before anything runs.

pub mod loader;

use anyhow::Result;
use serde::Deserialize;

use crate::domain::strategy::{
    BinaryStrategy, CppiStrategy, DrawdownAdjustedKelly, DynamicBankrollManagement,
    FixedFractionStrategy, FractionalKellyCriterion, KellyCriterion, MertonShare, NaiveStrategy,
    OptimalF,
};

/// Top-level simulation configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Run identity and execution knobs.
    pub run: RunConfig,
    /// Starting bankroll shared by every strategy entry (each gets its own
    /// independent copy).
    pub bankroll: BankrollConfig,
    /// Per-unit economics of the repeated bet.
    pub bet: BetConfig,
    /// Which probability regime drives the trials.
    pub simulator: SimulatorConfig,
    /// Strategies to run, one simulation each.
    pub strategies: Vec<StrategyConfig>,
}

/// Run identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RunConfig {
    /// Human-readable run name, echoed in the summary.
    pub name: String,
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Number of trials per strategy.
    #[serde(default = "default_trials")]
    pub trials: u32,
    /// RNG seed. When set, every strategy replays the same outcome stream.
    pub seed: Option<u64>,
}

/// Starting bankroll configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BankrollConfig {
    /// Initial funds.
    pub initial_funds: f64,
    /// Fraction of funds eligible for wagering.
    #[serde(default = "default_percent_bettable")]
    pub percent_bettable: f64,
    /// Per-debit drawdown limit; omit to disable.
    pub max_draw_down: Option<f64>,
}

/// Per-unit bet economics shared by all strategies in the run.
#[derive(Debug, Clone, Deserialize)]
pub struct BetConfig {
    /// Profit per unit staked on a win.
    pub payoff: f64,
    /// Loss per unit staked on a loss.
    pub loss: f64,
    /// Flat cost charged per trial regardless of outcome.
    #[serde(default)]
    pub transaction_cost: f64,
}

/// Probability regime for the trial loop.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SimulatorConfig {
    /// Fixed probability every trial.
    Repeated { probability: f64 },
    /// Probability drawn from `Normal(0.5, stdev)`.
    Random { stdev: f64 },
    /// Like `random`, with an independent perturbation between the
    /// probability the strategy sees and the one that resolves the outcome.
    RandomUncertain { stdev: f64, uncertainty_stdev: f64 },
}

/// One strategy entry in the comparison.
#[derive(Debug, Clone, Deserialize)]
pub struct StrategyConfig {
    /// Label in the run summary; defaults to the variant kind.
    pub name: Option<String>,
    #[serde(flatten)]
    pub variant: StrategyVariant,
}

/// Strategy variant plus its specific parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StrategyVariant {
    Kelly,
    FractionalKelly {
        fraction: f64,
    },
    DrawdownKelly {
        max_acceptable_drawdown: f64,
    },
    OptimalF {
        win_rate: f64,
        #[serde(default = "default_max_risk_fraction")]
        max_risk_fraction: f64,
    },
    Naive,
    FixedFraction {
        fraction: f64,
    },
    Cppi {
        floor_fraction: f64,
        multiplier: f64,
    },
    Dynamic {
        base_fraction: f64,
        #[serde(default = "default_window_size")]
        window_size: usize,
    },
    Merton {
        risk_aversion: f64,
    },
}

impl StrategyVariant {
    /// The label used when a strategy entry has no explicit name.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Kelly => "kelly",
            Self::FractionalKelly { .. } => "fractional_kelly",
            Self::DrawdownKelly { .. } => "drawdown_kelly",
            Self::OptimalF { .. } => "optimal_f",
            Self::Naive => "naive",
            Self::FixedFraction { .. } => "fixed_fraction",
            Self::Cppi { .. } => "cppi",
            Self::Dynamic { .. } => "dynamic",
            Self::Merton { .. } => "merton",
        }
    }

    /// Builds the strategy against the run's bet economics. Construction
    /// re-validates variant parameters; the loader only checks shared
    /// ranges.
    pub fn build(
        &self,
        bet: &BetConfig,
        initial_funds: f64,
    ) -> Result<Box<dyn BinaryStrategy>> {
        let (payoff, loss, cost) = (bet.payoff, bet.loss, bet.transaction_cost);
        let strategy: Box<dyn BinaryStrategy> = match *self {
            Self::Kelly => Box::new(KellyCriterion::new(payoff, loss, cost)?),
            Self::FractionalKelly { fraction } => {
                Box::new(FractionalKellyCriterion::new(payoff, loss, cost, fraction)?)
            }
            Self::DrawdownKelly {
                max_acceptable_drawdown,
            } => Box::new(DrawdownAdjustedKelly::new(
                payoff,
                loss,
                cost,
                max_acceptable_drawdown,
            )?),
            Self::OptimalF {
                win_rate,
                max_risk_fraction,
            } => Box::new(OptimalF::with_max_risk_fraction(
                payoff,
                loss,
                cost,
                win_rate,
                max_risk_fraction,
            )?),
            Self::Naive => Box::new(NaiveStrategy::new(payoff, loss, cost)?),
            Self::FixedFraction { fraction } => {
                Box::new(FixedFractionStrategy::new(payoff, loss, cost, fraction)?)
            }
            Self::Cppi {
                floor_fraction,
                multiplier,
            } => Box::new(CppiStrategy::new(
                payoff,
                loss,
                cost,
                floor_fraction,
                multiplier,
                initial_funds,
            )?),
            Self::Dynamic {
                base_fraction,
                window_size,
            } => Box::new(DynamicBankrollManagement::new(
                payoff,
                loss,
                cost,
                base_fraction,
                window_size,
            )?),
            Self::Merton { risk_aversion } => {
                Box::new(MertonShare::new(payoff, loss, cost, risk_aversion)?)
            }
        };
        Ok(strategy)
    }
}

// Default value functions for serde

fn default_log_level() -> String {
    "info".to_string()
}

fn default_trials() -> u32 {
    1000
}

fn default_percent_bettable() -> f64 {
    1.0
}

fn default_max_risk_fraction() -> f64 {
    0.2
}

fn default_window_size() -> usize {
    10
}
