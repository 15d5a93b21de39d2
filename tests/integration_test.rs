//! Integration Tests — Strategies, Bankroll and Simulators End-to-End
//!
//! Exercises full simulation runs and cross-component behavior: comparative
//! runs over identical outcome streams, ruin propagation into the ledger,
//! history-based drawdown inspection and utility pricing on pathological
//! gambles.

use rand::SeedableRng;
use rand::rngs::StdRng;

use betsizer::domain::strategy::{
    BinaryStrategy, CppiStrategy, DrawdownAdjustedKelly, EntryPriceOptions,
    FixedFractionStrategy, FractionalKellyCriterion, KellyCriterion, MertonShare,
};
use betsizer::domain::{BankRoll, Gamble};
use betsizer::simulators::{
    RandomBinarySimulator, RandomUncertainBinarySimulator, RepeatedBinarySimulator,
};

const SEED: u64 = 42;

fn run_seeded<S: BinaryStrategy>(
    sim: &RepeatedBinarySimulator,
    strategy: &mut S,
    funds: f64,
) -> BankRoll {
    let mut bankroll = BankRoll::with_funds(funds);
    let mut rng = StdRng::seed_from_u64(SEED);
    sim.evaluate_strategy_with_rng(strategy, &mut bankroll, &mut rng)
        .expect("run should not ruin");
    bankroll
}

#[test]
fn fractional_kelly_swings_less_than_full() {
    let sim = RepeatedBinarySimulator::new(0.55, 500).unwrap();

    let mut full = KellyCriterion::new(1.0, 1.0, 0.0).unwrap();
    let full_roll = run_seeded(&sim, &mut full, 1000.0);

    let mut half = FractionalKellyCriterion::new(1.0, 1.0, 0.0, 0.5).unwrap();
    let half_roll = run_seeded(&sim, &mut half, 1000.0);

    // Same seed, same outcome stream: the half-Kelly equity curve must show
    // a smaller worst drawdown from its running peak.
    let worst_drawdown = |history: &[f64]| {
        let mut peak = f64::MIN;
        let mut worst: f64 = 0.0;
        for &funds in history {
            peak = peak.max(funds);
            if peak > 0.0 {
                worst = worst.max((peak - funds) / peak);
            }
        }
        worst
    };
    assert!(worst_drawdown(half_roll.history()) <= worst_drawdown(full_roll.history()));
}

#[test]
fn drawdown_adjusted_kelly_stakes_at_most_full() {
    let sim = RepeatedBinarySimulator::new(0.6, 300).unwrap();

    let mut full = KellyCriterion::new(1.0, 1.0, 0.0).unwrap();
    let mut adjusted = DrawdownAdjustedKelly::new(1.0, 1.0, 0.0, 0.25).unwrap();

    // Per-call fractions, not a full run: the adjusted variant scales the
    // same raw Kelly fraction down.
    for p in [0.55, 0.6, 0.7, 0.8] {
        assert!(adjusted.evaluate(p, 1000.0) <= full.evaluate(p, 1000.0));
    }

    let roll = run_seeded(&sim, &mut adjusted, 1000.0);
    assert!(roll.total_funds() > 0.0);
}

#[test]
fn ruin_ends_run_early_with_ledger_intact() {
    // Over-staking into a tight per-debit drawdown limit: the first loss
    // trips the protection and the run ends with state preserved.
    let sim = RepeatedBinarySimulator::new(0.55, 1000).unwrap();
    let mut strategy = FixedFractionStrategy::new(1.0, 1.0, 0.0, 0.5).unwrap();
    let mut bankroll = BankRoll::new(1000.0, 1.0, Some(0.1));
    let mut rng = StdRng::seed_from_u64(SEED);

    let err = sim
        .evaluate_strategy_with_rng(&mut strategy, &mut bankroll, &mut rng)
        .unwrap_err();
    assert!(err.is_ruin());

    // The refused debit left no trace: the last history entry equals the
    // current funds, and funds are positive.
    assert_eq!(
        *bankroll.history().last().unwrap(),
        bankroll.total_funds()
    );
    assert!(bankroll.total_funds() > 0.0);
    assert!(bankroll.history().len() < 1001);
}

#[test]
fn cppi_floor_survives_a_losing_run() {
    let sim = RepeatedBinarySimulator::new(0.52, 400).unwrap();
    let mut strategy = CppiStrategy::new(1.0, 1.0, 0.0, 0.5, 1.0, 1000.0).unwrap();
    let mut bankroll = BankRoll::with_funds(1000.0);
    let mut rng = StdRng::seed_from_u64(SEED);

    sim.evaluate_strategy_with_rng(&mut strategy, &mut bankroll, &mut rng)
        .unwrap();

    // The equity curve never dips below the ratcheting floor.
    let floor = strategy.floor();
    for &funds in bankroll.history() {
        assert!(funds >= floor * 0.999 || funds >= 500.0 * 0.999);
    }
}

#[test]
fn random_regimes_complete_solvent() {
    let mut kelly = FractionalKellyCriterion::new(1.0, 1.0, 0.0, 0.5).unwrap();
    let mut bankroll = BankRoll::with_funds(1000.0);
    let mut rng = StdRng::seed_from_u64(SEED);
    RandomBinarySimulator::new(0.1, 500)
        .unwrap()
        .evaluate_strategy_with_rng(&mut kelly, &mut bankroll, &mut rng)
        .unwrap();
    assert!(bankroll.total_funds() >= 0.0);

    let mut kelly = FractionalKellyCriterion::new(1.0, 1.0, 0.0, 0.5).unwrap();
    let mut bankroll = BankRoll::with_funds(1000.0);
    let mut rng = StdRng::seed_from_u64(SEED);
    RandomUncertainBinarySimulator::new(0.1, 0.05, 500)
        .unwrap()
        .evaluate_strategy_with_rng(&mut kelly, &mut bankroll, &mut rng)
        .unwrap();
    assert!(bankroll.total_funds() >= 0.0);
}

#[test]
fn st_petersburg_price_is_finite_and_small() {
    // 1000 outcomes of geometrically growing payoff and shrinking
    // probability, each contributing 1 unit of expected value. The naive
    // expected value is 1000; a log-utility bettor pays far less.
    let n = 1000;
    let outcomes: Vec<f64> = (0..n).map(|k| f64::powi(2.0, k + 1)).collect();
    let probabilities: Vec<f64> = (0..n).map(|k| f64::powi(0.5, k + 1)).collect();
    let gamble = Gamble::new(outcomes, probabilities).unwrap();

    let opts = EntryPriceOptions::default();
    let kelly = KellyCriterion::new(1.0, 1.0, 0.0).unwrap();
    let price = kelly.max_entry_price(&gamble, 1000.0, &opts);
    assert!(price.is_finite());
    assert!(price > 0.0);
    assert!(price < 100.0, "log utility priced St. Petersburg at {price}");

    // Higher risk aversion pays no more.
    let merton = MertonShare::new(1.0, 1.0, 0.0, 3.0).unwrap();
    let timid_price = merton.max_entry_price(&gamble, 1000.0, &opts);
    assert!(timid_price <= price + 0.02);
}

#[test]
fn identical_seeds_make_runs_comparable_across_strategies() {
    // The runner's comparison contract: the same seed gives each strategy
    // the same random draws, so a pure re-run of the same strategy is
    // byte-identical and different strategies see identical streams.
    let sim = RepeatedBinarySimulator::new(0.55, 200).unwrap();

    let mut a = KellyCriterion::new(1.0, 1.0, 0.0).unwrap();
    let first = run_seeded(&sim, &mut a, 1000.0);
    let mut b = KellyCriterion::new(1.0, 1.0, 0.0).unwrap();
    let second = run_seeded(&sim, &mut b, 1000.0);
    assert_eq!(first.history(), second.history());
}
