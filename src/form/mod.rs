//! Match input form: the raw statistics a user types in and the
//! expected-goals derivation built on top of them.
//!
//! Attack and defence strengths are ratios against the league average, and a
//! side's expected goals are its attack strength times the opponent's defensive
//! weakness times the league average. Any ratio with a zero denominator is 0.

use serde::{Deserialize, Serialize};

use crate::error::CalcError;

/// League average goals used when the form leaves them blank.
pub const DEFAULT_LEAGUE_AVG_GOALS: f64 = 0.75;

/// Fallback values supplied by configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FormDefaults {
    pub home_league_avg: f64,
    pub away_league_avg: f64,
}

impl Default for FormDefaults {
    fn default() -> Self {
        Self {
            home_league_avg: DEFAULT_LEAGUE_AVG_GOALS,
            away_league_avg: DEFAULT_LEAGUE_AVG_GOALS,
        }
    }
}

/// Raw form submission. Missing numeric fields count as 0.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchForm {
    pub home_team: String,
    pub away_team: String,
    pub home_league_avg: Option<f64>,
    pub away_league_avg: Option<f64>,
    pub home_goals_for: f64,
    pub home_goals_against: f64,
    pub home_matches_played: f64,
    pub away_goals_for: f64,
    pub away_goals_against: f64,
    pub away_matches_played: f64,
}

/// Per-team scoring record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TeamStats {
    pub goals_for: f64,
    pub goals_against: f64,
    pub matches_played: f64,
}

impl TeamStats {
    pub fn avg_goals_for(&self) -> f64 {
        ratio(self.goals_for, self.matches_played)
    }

    pub fn avg_goals_against(&self) -> f64 {
        ratio(self.goals_against, self.matches_played)
    }
}

/// A validated form, ready for the expected-goals derivation.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchInput {
    pub home_team: String,
    pub away_team: String,
    pub home_league_avg: f64,
    pub away_league_avg: f64,
    pub home: TeamStats,
    pub away: TeamStats,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExpectedGoals {
    pub home: f64,
    pub away: f64,
}

impl ExpectedGoals {
    /// Odds are only meaningful once both sides are expected to score.
    pub fn is_priceable(&self) -> bool {
        self.home > 0.0 && self.away > 0.0
    }
}

impl MatchForm {
    /// Check every numeric field and fill blank league averages from `defaults`.
    pub fn validate(&self, defaults: FormDefaults) -> Result<MatchInput, CalcError> {
        let home_league_avg = non_negative(
            "home_league_avg",
            self.home_league_avg.unwrap_or(defaults.home_league_avg),
        )?;
        let away_league_avg = non_negative(
            "away_league_avg",
            self.away_league_avg.unwrap_or(defaults.away_league_avg),
        )?;

        let home = TeamStats {
            goals_for: non_negative("home_goals_for", self.home_goals_for)?,
            goals_against: non_negative("home_goals_against", self.home_goals_against)?,
            matches_played: non_negative("home_matches_played", self.home_matches_played)?,
        };
        let away = TeamStats {
            goals_for: non_negative("away_goals_for", self.away_goals_for)?,
            goals_against: non_negative("away_goals_against", self.away_goals_against)?,
            matches_played: non_negative("away_matches_played", self.away_matches_played)?,
        };

        Ok(MatchInput {
            home_team: self.home_team.trim().to_string(),
            away_team: self.away_team.trim().to_string(),
            home_league_avg,
            away_league_avg,
            home,
            away,
        })
    }
}

impl MatchInput {
    pub fn expected_goals(&self) -> ExpectedGoals {
        let home_attack = ratio(self.home.avg_goals_for(), self.home_league_avg);
        let home_defense = ratio(self.home.avg_goals_against(), self.away_league_avg);
        let away_attack = ratio(self.away.avg_goals_for(), self.away_league_avg);
        let away_defense = ratio(self.away.avg_goals_against(), self.home_league_avg);

        ExpectedGoals {
            home: home_attack * away_defense * self.home_league_avg,
            away: away_attack * home_defense * self.away_league_avg,
        }
    }
}

fn ratio(num: f64, denom: f64) -> f64 {
    if denom > 0.0 {
        num / denom
    } else {
        0.0
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<f64, CalcError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(CalcError::InvalidField { field, value })
    }
}
