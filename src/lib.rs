//! betsizer — bet sizing strategies with bankroll management.
//!
//! A library of sizing strategies for repeated binary trials (Kelly and its
//! variants, Optimal f, CPPI, Merton share, adaptive and baseline rules), a
//! bankroll ledger with solvency and drawdown protection, CRRA utility
//! pricing for one-shot gambles, and Monte Carlo simulators to race
//! strategies against each other.
//!
//! The core is pure computation; the binary adds a config-driven comparison
//! runner on top.

pub mod config;
pub mod domain;
pub mod error;
pub mod simulators;

pub use domain::{BankRoll, BetTerms, BinaryStrategy, EntryPriceOptions, Gamble};
pub use error::{BankrollError, StrategyError};
