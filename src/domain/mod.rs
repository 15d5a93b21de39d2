//! Domain layer: bet sizing, bankroll accounting and utility theory.
//!
//! Pure computation and in-memory state only; no I/O happens here. All
//! types are testable in isolation.

pub mod bankroll;
pub mod gamble;
pub mod strategy;
pub mod utility;

pub use bankroll::BankRoll;
pub use gamble::Gamble;
pub use strategy::{
    BetTerms, BinaryStrategy, CppiStrategy, DrawdownAdjustedKelly, DynamicBankrollManagement,
    EntryPriceOptions, FixedFractionStrategy, FractionalKellyCriterion, KellyCriterion,
    MertonShare, NaiveStrategy, OptimalF,
};
pub use utility::find_indifference_price;
