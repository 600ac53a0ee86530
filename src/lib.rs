pub mod config;
pub mod dashboard;
pub mod engine;
pub mod error;
pub mod form;
pub mod presenter;

pub use engine::{compute_odds, try_compute_odds, Odds, OddsTable, Outcome, PoissonModel};
pub use error::CalcError;
