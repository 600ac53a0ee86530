use clap::{Args, Parser, Subcommand};

use crate::engine::PoissonModel;
use crate::form::{FormDefaults, MatchForm};

/// Upper limit for the goal-count truncation bound.
const MAX_GOALS_LIMIT: u32 = 100;

/// Poisson football odds calculator
#[derive(Parser, Debug, Clone)]
#[command(name = "poisson-odds", version, about)]
pub struct Config {
    /// Odds form listen address
    #[arg(long, env = "DASHBOARD_ADDR", default_value = "127.0.0.1:8501", global = true)]
    pub addr: String,

    /// Goal-count ceiling per side when summing the scoreline grid
    #[arg(long, env = "MAX_GOALS", default_value = "10", global = true)]
    pub max_goals: u32,

    /// Default league average goals for the home side
    #[arg(long, env = "HOME_LEAGUE_AVG", default_value = "0.75", global = true)]
    pub home_league_avg: f64,

    /// Default league average goals for the away side
    #[arg(long, env = "AWAY_LEAGUE_AVG", default_value = "0.75", global = true)]
    pub away_league_avg: f64,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Serve the interactive odds form (default)
    Serve,
    /// Price a single fixture and print the result
    Calc(CalcArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct CalcArgs {
    #[arg(long, default_value = "")]
    pub home_team: String,
    #[arg(long, default_value = "")]
    pub away_team: String,

    /// Goals scored by the home team
    #[arg(long, default_value = "0")]
    pub home_goals_for: f64,
    /// Goals conceded by the home team
    #[arg(long, default_value = "0")]
    pub home_goals_against: f64,
    /// Matches played by the home team
    #[arg(long, default_value = "0")]
    pub home_matches_played: f64,

    /// Goals scored by the away team
    #[arg(long, default_value = "0")]
    pub away_goals_for: f64,
    /// Goals conceded by the away team
    #[arg(long, default_value = "0")]
    pub away_goals_against: f64,
    /// Matches played by the away team
    #[arg(long, default_value = "0")]
    pub away_matches_played: f64,

    /// Print the report as JSON instead of tables
    #[arg(long)]
    pub json: bool,
}

impl CalcArgs {
    /// League averages are left blank so the configured defaults apply.
    pub fn to_form(&self) -> MatchForm {
        MatchForm {
            home_team: self.home_team.clone(),
            away_team: self.away_team.clone(),
            home_league_avg: None,
            away_league_avg: None,
            home_goals_for: self.home_goals_for,
            home_goals_against: self.home_goals_against,
            home_matches_played: self.home_matches_played,
            away_goals_for: self.away_goals_for,
            away_goals_against: self.away_goals_against,
            away_matches_played: self.away_matches_played,
        }
    }
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.max_goals == 0 || self.max_goals > MAX_GOALS_LIMIT {
            anyhow::bail!("max_goals must be between 1 and {}", MAX_GOALS_LIMIT);
        }
        if !self.home_league_avg.is_finite() || self.home_league_avg < 0.0 {
            anyhow::bail!("home_league_avg must be a non-negative number");
        }
        if !self.away_league_avg.is_finite() || self.away_league_avg < 0.0 {
            anyhow::bail!("away_league_avg must be a non-negative number");
        }
        Ok(())
    }

    pub fn model(&self) -> PoissonModel {
        PoissonModel::new(self.max_goals)
    }

    pub fn form_defaults(&self) -> FormDefaults {
        FormDefaults {
            home_league_avg: self.home_league_avg,
            away_league_avg: self.away_league_avg,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::try_parse_from(["poisson-odds"]).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.model(), PoissonModel::default());
        assert_eq!(config.form_defaults(), FormDefaults::default());
        assert!(config.command.is_none());
    }

    #[test]
    fn test_rejects_zero_max_goals() {
        let config = Config::try_parse_from(["poisson-odds", "--max-goals", "0"]).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_negative_league_avg() {
        let config =
            Config::try_parse_from(["poisson-odds", "--home-league-avg=-1.0"]).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_calc_subcommand() {
        let config = Config::try_parse_from([
            "poisson-odds",
            "calc",
            "--home-team",
            "Porto",
            "--home-goals-for",
            "20",
            "--home-matches-played",
            "10",
            "--json",
            "--max-goals",
            "12",
        ])
        .unwrap();
        assert_eq!(config.max_goals, 12);
        let Some(Command::Calc(args)) = config.command else {
            panic!("expected calc subcommand");
        };
        assert!(args.json);
        let form = args.to_form();
        assert_eq!(form.home_team, "Porto");
        assert_eq!(form.home_goals_for, 20.0);
        assert_eq!(form.home_league_avg, None);
    }
}
