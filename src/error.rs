//! Error taxonomy for the betsizer core.
//!
//! Two failure families exist and they are deliberately distinct:
//! - `StrategyError`: invalid configuration, raised at construction and
//!   never recovered internally.
//! - `BankrollError`: a ledger operation that would breach solvency, the
//!   configured drawdown policy, or the bettable-funds cap. The ledger is
//!   left untouched when one of these is returned.
//!
//! Degenerate numeric situations inside `evaluate` (zero variance, zero net
//! odds, non-positive expected value) are NOT errors — they map to a bet
//! size of exactly 0.

use thiserror::Error;

/// Errors raised by [`crate::domain::BankRoll`] operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BankrollError {
    /// The debit would drive funds negative. Checked before the drawdown
    /// rule; the ledger is unchanged.
    #[error("bankruptcy: withdrawal of {amount} exceeds available funds {available}")]
    Bankruptcy { amount: f64, available: f64 },

    /// The debit exceeds the configured per-operation drawdown tolerance.
    #[error("slow down: withdrawal of {amount} exceeds drawdown limit {limit}")]
    DrawdownExceeded { amount: f64, limit: f64 },

    /// A bet larger than the bettable portion of the bankroll. This is a
    /// sizing error, not ruin; callers should pre-validate against
    /// `max_safe_bet`.
    #[error("bet of {amount} exceeds bettable funds {bettable}")]
    BetTooLarge { amount: f64, bettable: f64 },
}

impl BankrollError {
    /// Whether this error represents a ruin condition (bankruptcy or
    /// drawdown breach) as opposed to a plain sizing mistake.
    pub fn is_ruin(&self) -> bool {
        matches!(
            self,
            Self::Bankruptcy { .. } | Self::DrawdownExceeded { .. }
        )
    }
}

/// Construction-time validation failure for a strategy or gamble.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StrategyError {
    /// A parameter violated its documented range. The message names the
    /// violated constraint.
    #[error("{0}")]
    InvalidParameter(String),
}

impl StrategyError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }
}
