//! Poisson odds engine.
//!
//! Given the expected goals of each side, builds the joint scoreline grid under
//! an independent-Poisson model and collapses it into match-result (1X2) and
//! total-goals (over/under 2.5) probabilities, then into fair decimal odds.
//!
//! The grid is truncated at [`DEFAULT_MAX_GOALS`] goals per side. The omitted
//! tail is reported through [`OutcomeDistribution::omitted_mass`] and is below
//! 1e-6 for rates up to 1.5 goals.

pub mod odds;
pub mod poisson;

pub use odds::{
    compute_odds, try_compute_odds, Odds, OddsTable, Outcome, OutcomeDistribution,
    PoissonModel, DEFAULT_MAX_GOALS,
};
