use serde::{Serialize, Serializer};
use tracing::debug;

use super::poisson;
use crate::error::{CalcError, Side};

/// Default goal-count ceiling per side.
///
/// The Poisson model has infinite support; mass above 10 goals is negligible
/// for realistic rates (< 5) and is omitted rather than renormalised.
pub const DEFAULT_MAX_GOALS: u32 = 10;

/// Total-goals line for the over/under market.
pub const OVER_UNDER_LINE: f64 = 2.5;

// ── Outcomes ─────────────────────────────────────────────────────────────────

/// The five markets the calculator prices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    HomeWin,
    Draw,
    AwayWin,
    Over,
    Under,
}

impl Outcome {
    pub const ALL: [Outcome; 5] = [
        Outcome::HomeWin,
        Outcome::Draw,
        Outcome::AwayWin,
        Outcome::Over,
        Outcome::Under,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Outcome::HomeWin => "1",
            Outcome::Draw => "X",
            Outcome::AwayWin => "2",
            Outcome::Over => "Over 2.5",
            Outcome::Under => "Under 2.5",
        }
    }
}

// ── Odds ─────────────────────────────────────────────────────────────────────

/// Decimal fair odds for one outcome.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Odds {
    Finite(f64),
    /// The outcome has zero probability under the model.
    Infinite,
}

impl Odds {
    /// Fair (margin-free) odds: the reciprocal of the probability.
    pub fn from_probability(p: f64) -> Self {
        if p > 0.0 {
            Odds::Finite(1.0 / p)
        } else {
            Odds::Infinite
        }
    }

    /// Probability implied by these odds (0 for infinite odds).
    pub fn implied_probability(self) -> f64 {
        match self {
            Odds::Finite(o) => 1.0 / o,
            Odds::Infinite => 0.0,
        }
    }

    pub fn is_infinite(self) -> bool {
        matches!(self, Odds::Infinite)
    }
}

impl std::fmt::Display for Odds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Odds::Finite(o) => write!(f, "{:.2}", o),
            Odds::Infinite => write!(f, "∞"),
        }
    }
}

/// JSON has no infinity, so the marker is written as the string `"inf"`.
impl Serialize for Odds {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Odds::Finite(o) => serializer.serialize_f64(*o),
            Odds::Infinite => serializer.serialize_str("inf"),
        }
    }
}

// ── Distribution & table ─────────────────────────────────────────────────────

/// Outcome probabilities for a single fixture.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OutcomeDistribution {
    #[serde(rename = "1")]
    pub home_win: f64,
    #[serde(rename = "X")]
    pub draw: f64,
    #[serde(rename = "2")]
    pub away_win: f64,
    #[serde(rename = "Over 2.5")]
    pub over: f64,
    #[serde(rename = "Under 2.5")]
    pub under: f64,
}

impl OutcomeDistribution {
    pub fn get(&self, outcome: Outcome) -> f64 {
        match outcome {
            Outcome::HomeWin => self.home_win,
            Outcome::Draw => self.draw,
            Outcome::AwayWin => self.away_win,
            Outcome::Over => self.over,
            Outcome::Under => self.under,
        }
    }

    /// Probability mass lost to the goal-count truncation.
    pub fn omitted_mass(&self) -> f64 {
        1.0 - (self.home_win + self.draw + self.away_win)
    }

    pub fn odds(&self) -> OddsTable {
        OddsTable {
            home_win: Odds::from_probability(self.home_win),
            draw: Odds::from_probability(self.draw),
            away_win: Odds::from_probability(self.away_win),
            over: Odds::from_probability(self.over),
            under: Odds::from_probability(self.under),
        }
    }
}

/// Fair odds keyed by market label (`"1"`, `"X"`, `"2"`, `"Over 2.5"`, `"Under 2.5"`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OddsTable {
    #[serde(rename = "1")]
    pub home_win: Odds,
    #[serde(rename = "X")]
    pub draw: Odds,
    #[serde(rename = "2")]
    pub away_win: Odds,
    #[serde(rename = "Over 2.5")]
    pub over: Odds,
    #[serde(rename = "Under 2.5")]
    pub under: Odds,
}

impl OddsTable {
    pub fn get(&self, outcome: Outcome) -> Odds {
        match outcome {
            Outcome::HomeWin => self.home_win,
            Outcome::Draw => self.draw,
            Outcome::AwayWin => self.away_win,
            Outcome::Over => self.over,
            Outcome::Under => self.under,
        }
    }

    pub fn entries(&self) -> [(Outcome, Odds); 5] {
        Outcome::ALL.map(|o| (o, self.get(o)))
    }
}

// ── Model ────────────────────────────────────────────────────────────────────

/// Independent-Poisson scoreline model.
///
/// Home and away goal counts are treated as independent. Real scorelines show
/// mild correlation (draws are slightly under-predicted); this model keeps the
/// simplification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoissonModel {
    pub max_goals: u32,
}

impl Default for PoissonModel {
    fn default() -> Self {
        Self {
            max_goals: DEFAULT_MAX_GOALS,
        }
    }
}

impl PoissonModel {
    pub fn new(max_goals: u32) -> Self {
        Self { max_goals }
    }

    /// Sum the joint scoreline grid `0..=max_goals` x `0..=max_goals` into
    /// the five outcome buckets.
    ///
    /// Rates must be finite and non-negative; use [`PoissonModel::try_distribution`]
    /// when they come from an untrusted source.
    pub fn distribution(&self, home_rate: f64, away_rate: f64) -> OutcomeDistribution {
        debug_assert!(
            home_rate.is_finite() && home_rate >= 0.0,
            "home_rate out of range"
        );
        debug_assert!(
            away_rate.is_finite() && away_rate >= 0.0,
            "away_rate out of range"
        );

        let pmf_home = poisson::pmf_table(home_rate, self.max_goals);
        let pmf_away = poisson::pmf_table(away_rate, self.max_goals);

        let mut home_win = 0.0;
        let mut draw = 0.0;
        let mut away_win = 0.0;
        let mut over = 0.0;

        for (h, p_h) in pmf_home.iter().enumerate() {
            for (a, p_a) in pmf_away.iter().enumerate() {
                let p = p_h * p_a;
                if h > a {
                    home_win += p;
                } else if h == a {
                    draw += p;
                } else {
                    away_win += p;
                }
                if (h + a) as f64 > OVER_UNDER_LINE {
                    over += p;
                }
            }
        }

        debug!(
            home_rate,
            away_rate,
            max_goals = self.max_goals,
            home_win,
            draw,
            away_win,
            over,
            "computed outcome distribution"
        );

        OutcomeDistribution {
            home_win,
            draw,
            away_win,
            over,
            under: 1.0 - over,
        }
    }

    pub fn try_distribution(
        &self,
        home_rate: f64,
        away_rate: f64,
    ) -> Result<OutcomeDistribution, CalcError> {
        validate_rate(Side::Home, home_rate)?;
        validate_rate(Side::Away, away_rate)?;
        Ok(self.distribution(home_rate, away_rate))
    }

    pub fn odds(&self, home_rate: f64, away_rate: f64) -> OddsTable {
        self.distribution(home_rate, away_rate).odds()
    }
}

fn validate_rate(side: Side, rate: f64) -> Result<(), CalcError> {
    if rate.is_finite() && rate >= 0.0 {
        Ok(())
    } else {
        Err(CalcError::InvalidRate { side, rate })
    }
}

/// Fair odds for a fixture using the default 10-goal truncation.
pub fn compute_odds(home_rate: f64, away_rate: f64) -> OddsTable {
    PoissonModel::default().odds(home_rate, away_rate)
}

/// Like [`compute_odds`] but rejects negative or non-finite rates.
pub fn try_compute_odds(home_rate: f64, away_rate: f64) -> Result<OddsTable, CalcError> {
    PoissonModel::default()
        .try_distribution(home_rate, away_rate)
        .map(|d| d.odds())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn dist(home: f64, away: f64) -> OutcomeDistribution {
        PoissonModel::default().distribution(home, away)
    }

    #[test]
    fn test_labels() {
        let labels: Vec<_> = Outcome::ALL.iter().map(|o| o.label()).collect();
        assert_eq!(labels, vec!["1", "X", "2", "Over 2.5", "Under 2.5"]);
    }

    #[test]
    fn test_match_odds_at_least_one() {
        for &(h, a) in &[(0.3, 0.4), (1.5, 1.2), (2.8, 0.6), (4.5, 4.5)] {
            let odds = compute_odds(h, a);
            for o in [odds.home_win, odds.draw, odds.away_win] {
                match o {
                    Odds::Finite(v) => assert!(v >= 1.0, "odds {v} below 1 for ({h}, {a})"),
                    Odds::Infinite => panic!("unexpected infinite odds for ({h}, {a})"),
                }
            }
        }
    }

    #[test]
    fn test_match_odds_inverses_sum_to_one() {
        for &(h, a) in &[(0.5, 0.5), (1.0, 1.5), (1.5, 1.2), (0.2, 1.4)] {
            let odds = compute_odds(h, a);
            let sum = odds.home_win.implied_probability()
                + odds.draw.implied_probability()
                + odds.away_win.implied_probability();
            assert_relative_eq!(sum, 1.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_omitted_mass_equals_truncated_tail() {
        // Larger rates leak more mass past the 10-goal ceiling.
        for &(h, a) in &[(1.5, 1.2), (3.0, 2.0), (6.0, 5.0)] {
            let d = dist(h, a);
            let kept_h: f64 = poisson::pmf_table(h, DEFAULT_MAX_GOALS).iter().sum();
            let kept_a: f64 = poisson::pmf_table(a, DEFAULT_MAX_GOALS).iter().sum();
            let kept = kept_h * kept_a;
            assert!(d.omitted_mass() >= 0.0);
            assert_relative_eq!(d.omitted_mass(), 1.0 - kept, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_over_under_complement() {
        for &(h, a) in &[(0.1, 0.1), (1.5, 1.2), (3.5, 2.5)] {
            let d = dist(h, a);
            assert_relative_eq!(d.over + d.under, 1.0, epsilon = 1e-15);

            let odds = d.odds();
            let inv = odds.over.implied_probability() + odds.under.implied_probability();
            assert_relative_eq!(inv, 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_probabilities_in_unit_interval() {
        for &(h, a) in &[(0.0, 0.0), (0.0, 2.0), (1.5, 1.2), (5.0, 0.1), (9.0, 9.0)] {
            let d = dist(h, a);
            for o in Outcome::ALL {
                let p = d.get(o);
                assert!((0.0..=1.0).contains(&p), "{} = {p} for ({h}, {a})", o.label());
            }
        }
    }

    #[test]
    fn test_side_swap_symmetry() {
        for &(x, y) in &[(1.5, 1.2), (0.4, 2.9), (2.0, 2.0)] {
            let forward = dist(x, y);
            let reverse = dist(y, x);
            assert_relative_eq!(forward.home_win, reverse.away_win, epsilon = 1e-12);
            assert_relative_eq!(forward.away_win, reverse.home_win, epsilon = 1e-12);
            assert_relative_eq!(forward.draw, reverse.draw, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_zero_home_rate() {
        let r = 1.3;
        let d = dist(0.0, r);
        assert_eq!(d.home_win, 0.0);
        assert_relative_eq!(d.draw, (-r).exp(), epsilon = 1e-15);
        assert_relative_eq!(d.away_win, 1.0 - d.draw, epsilon = 1e-6);

        let odds = d.odds();
        assert!(odds.home_win.is_infinite());
        assert!(!odds.draw.is_infinite());
    }

    #[test]
    fn test_both_rates_zero() {
        let d = dist(0.0, 0.0);
        assert_eq!(d.draw, 1.0);
        assert_eq!(d.over, 0.0);
        assert_eq!(d.under, 1.0);

        let odds = d.odds();
        assert!(odds.home_win.is_infinite());
        assert!(odds.away_win.is_infinite());
        assert!(odds.over.is_infinite());
        assert_eq!(odds.draw, Odds::Finite(1.0));
        assert_eq!(odds.under, Odds::Finite(1.0));
    }

    #[test]
    fn test_typical_fixture() {
        let d = dist(1.5, 1.2);
        assert!(d.home_win > d.away_win);
        assert!(d.draw > 0.0);
        // combined expectation 2.7 puts P(3+ goals) just above a half
        assert!(d.over > 0.5);
        assert_relative_eq!(d.over, 0.5064, epsilon = 1e-3);
    }

    #[test]
    fn test_monotonic_in_home_rate() {
        let away = 1.2;
        let mut prev = dist(0.1, away);
        for step in 2..=50 {
            let home = step as f64 * 0.1;
            let cur = dist(home, away);
            assert!(cur.home_win > prev.home_win, "home win not increasing at {home}");
            assert!(cur.away_win < prev.away_win, "away win not decreasing at {home}");
            prev = cur;
        }
    }

    #[test]
    fn test_truncation_bound_is_configurable() {
        let coarse = PoissonModel::new(3).distribution(2.0, 2.0);
        let fine = PoissonModel::default().distribution(2.0, 2.0);
        assert!(coarse.omitted_mass() > fine.omitted_mass());
        assert_eq!(PoissonModel::default().max_goals, 10);
    }

    #[test]
    fn test_try_compute_rejects_invalid_rates() {
        assert_eq!(
            try_compute_odds(-0.5, 1.0),
            Err(CalcError::InvalidRate {
                side: Side::Home,
                rate: -0.5
            })
        );
        assert!(matches!(
            try_compute_odds(1.0, f64::INFINITY),
            Err(CalcError::InvalidRate { side: Side::Away, .. })
        ));
        assert!(try_compute_odds(1.0, f64::NAN).is_err());
        assert_eq!(try_compute_odds(1.5, 1.2), Ok(compute_odds(1.5, 1.2)));
    }

    #[test]
    fn test_odds_display() {
        assert_eq!(Odds::Finite(2.456).to_string(), "2.46");
        assert_eq!(Odds::Infinite.to_string(), "∞");
    }

    #[test]
    fn test_table_serializes_with_labels() {
        let json = serde_json::to_value(compute_odds(0.0, 1.0)).unwrap();
        assert_eq!(json["1"], "inf");
        assert!(json["X"].is_f64());
        assert!(json["Over 2.5"].is_f64());
        assert!(json["Under 2.5"].is_f64());
    }
}
