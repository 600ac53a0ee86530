use thiserror::Error;

/// Which side of the fixture a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Home,
    Away,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Home => write!(f, "home"),
            Side::Away => write!(f, "away"),
        }
    }
}

/// Errors raised when input falls outside the calculator's domain.
#[derive(Debug, Error, PartialEq)]
pub enum CalcError {
    /// An expected-goals rate was negative, NaN or infinite.
    #[error("{side} expected-goals rate must be finite and non-negative (got {rate})")]
    InvalidRate { side: Side, rate: f64 },

    /// A form statistic was negative, NaN or infinite.
    #[error("{field} must be finite and non-negative (got {value})")]
    InvalidField { field: &'static str, value: f64 },
}
