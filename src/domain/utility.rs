//! CRRA utility and indifference pricing.
//!
//! The indifference price is the maximum price at which the expected
//! utility of accepting a gamble equals the utility of declining it. Found
//! by plain bisection; the functions here are stateless and independently
//! testable.

use super::gamble::Gamble;

/// Default bisection convergence width, in wealth units.
pub const DEFAULT_TOLERANCE: f64 = 0.01;

/// Default upper search bound as a fraction of current wealth.
pub const DEFAULT_MAX_SEARCH_FRACTION: f64 = 0.5;

/// Constant relative risk aversion utility.
///
/// Log utility at `risk_aversion == 1`, otherwise the power form
/// `wealth^(1-γ) / (1-γ)`. Non-positive wealth yields negative infinity:
/// an unacceptable state, consumed only comparatively, never an error.
pub fn crra_utility(wealth: f64, risk_aversion: f64) -> f64 {
    if wealth <= 0.0 {
        return f64::NEG_INFINITY;
    }
    if (risk_aversion - 1.0).abs() < f64::EPSILON {
        wealth.ln()
    } else {
        wealth.powf(1.0 - risk_aversion) / (1.0 - risk_aversion)
    }
}

/// Expected CRRA utility of accepting `gamble` at `entry_price`:
/// sum of `p_i * u(wealth - entry_price + outcome_i)`, with any residual
/// probability mass treated as a zero-payoff outcome.
pub fn expected_utility(
    gamble: &Gamble,
    current_wealth: f64,
    entry_price: f64,
    risk_aversion: f64,
) -> f64 {
    let listed: f64 = gamble
        .outcomes()
        .iter()
        .zip(gamble.probabilities())
        .map(|(outcome, p)| p * crra_utility(current_wealth - entry_price + outcome, risk_aversion))
        .sum();

    let residual = 1.0 - gamble.probabilities().iter().sum::<f64>();
    if residual > 0.0 {
        listed + residual * crra_utility(current_wealth - entry_price, risk_aversion)
    } else {
        listed
    }
}

/// Finds the price at which an agent with the given risk aversion is
/// indifferent between accepting and declining the gamble.
///
/// Bisection over `[0, max_search_fraction * current_wealth]`: prices where
/// accepting beats declining move the lower bound up, all others move the
/// upper bound down. Terminates when the interval width is at most
/// `tolerance` and returns the midpoint.
pub fn find_indifference_price(
    gamble: &Gamble,
    current_wealth: f64,
    risk_aversion: f64,
    tolerance: f64,
    max_search_fraction: f64,
) -> f64 {
    if current_wealth <= 0.0 {
        return 0.0;
    }

    let decline_utility = crra_utility(current_wealth, risk_aversion);
    let mut low = 0.0_f64;
    let mut high = max_search_fraction * current_wealth;
    // A non-positive or subnormal tolerance would never close the interval
    // once low and high are adjacent floats; floor it at one ulp of the
    // search bound.
    let tolerance = tolerance.max(high * f64::EPSILON);

    while high - low > tolerance {
        let mid = (low + high) / 2.0;
        let accept_utility = expected_utility(gamble, current_wealth, mid, risk_aversion);
        if accept_utility > decline_utility {
            low = mid;
        } else {
            high = mid;
        }
    }

    (low + high) / 2.0
}
