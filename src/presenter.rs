use chrono::{DateTime, Utc};
use comfy_table::Table;
use serde::Serialize;

use crate::engine::{OddsTable, Outcome, OutcomeDistribution, PoissonModel};
use crate::error::CalcError;
use crate::form::{ExpectedGoals, MatchInput};

pub const MISSING_STATS_WARNING: &str = "Please enter valid statistics to calculate odds";

/// Everything the form page and the CLI show for one fixture.
#[derive(Debug, Clone, Serialize)]
pub struct MatchReport {
    pub home_team: String,
    pub away_team: String,
    pub expected_goals: ExpectedGoals,
    pub probabilities: Option<OutcomeDistribution>,
    pub odds: Option<OddsTable>,
    pub warning: Option<String>,
    pub computed_at: DateTime<Utc>,
}

impl MatchReport {
    /// Derive expected goals and, when both sides are expected to score, price
    /// the fixture.
    ///
    /// Individually valid statistics can still overflow into a non-finite
    /// rate, so the derived rates go through the validating engine entry point.
    pub fn build(input: &MatchInput, model: &PoissonModel) -> Result<Self, CalcError> {
        let expected_goals = input.expected_goals();

        let (probabilities, warning) = if expected_goals.is_priceable() {
            let dist = model.try_distribution(expected_goals.home, expected_goals.away)?;
            (Some(dist), None)
        } else {
            (None, Some(MISSING_STATS_WARNING.to_string()))
        };

        Ok(Self {
            home_team: display_name(&input.home_team, "Home"),
            away_team: display_name(&input.away_team, "Away"),
            expected_goals,
            odds: probabilities.map(|d| d.odds()),
            probabilities,
            warning,
            computed_at: Utc::now(),
        })
    }
}

fn display_name(name: &str, fallback: &str) -> String {
    if name.is_empty() {
        fallback.to_string()
    } else {
        name.to_string()
    }
}

fn market_name(outcome: Outcome) -> &'static str {
    match outcome {
        Outcome::HomeWin => "Home Win",
        Outcome::Draw => "Draw",
        Outcome::AwayWin => "Away Win",
        Outcome::Over => "Over 2.5",
        Outcome::Under => "Under 2.5",
    }
}

fn market_table(outcomes: &[Outcome], dist: &OutcomeDistribution, odds: &OddsTable) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Market", "Label", "Probability", "Fair odds"]);
    for (outcome, price) in odds.entries() {
        if !outcomes.contains(&outcome) {
            continue;
        }
        table.add_row(vec![
            market_name(outcome).to_string(),
            outcome.label().to_string(),
            format!("{:.1}%", dist.get(outcome) * 100.0),
            price.to_string(),
        ]);
    }
    table
}

/// Plain-text rendering for terminal output.
pub fn render_text(report: &MatchReport) -> String {
    let mut out = String::new();
    out.push_str("Expected Goals\n");
    out.push_str(&format!(
        "  {}: {:.2}\n  {}: {:.2}\n",
        report.home_team, report.expected_goals.home, report.away_team, report.expected_goals.away
    ));

    match (&report.probabilities, &report.odds) {
        (Some(dist), Some(odds)) => {
            out.push_str("\n1X2 Odds\n");
            out.push_str(
                &market_table(
                    &[Outcome::HomeWin, Outcome::Draw, Outcome::AwayWin],
                    dist,
                    odds,
                )
                .to_string(),
            );
            out.push_str("\n\nGoal Markets\n");
            out.push_str(&market_table(&[Outcome::Over, Outcome::Under], dist, odds).to_string());
            out.push('\n');
        }
        _ => {
            let warning = report.warning.as_deref().unwrap_or(MISSING_STATS_WARNING);
            out.push_str(&format!("\n⚠️  {}\n", warning));
        }
    }
    out
}
