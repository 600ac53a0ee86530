use anyhow::Result;
use clap::Parser;
use std::net::SocketAddr;
use tracing::info;

use poisson_odds::config::{CalcArgs, Command, Config};
use poisson_odds::dashboard::{self, AppState};
use poisson_odds::presenter::{render_text, MatchReport};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise tracing / logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::parse();
    config.validate()?;

    match config.command.clone() {
        Some(Command::Calc(args)) => run_calc(&config, &args),
        Some(Command::Serve) | None => serve(&config).await,
    }
}

fn run_calc(config: &Config, args: &CalcArgs) -> Result<()> {
    let input = args.to_form().validate(config.form_defaults())?;
    let report = MatchReport::build(&input, &config.model())?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_text(&report));
    }
    Ok(())
}

async fn serve(config: &Config) -> Result<()> {
    let state = AppState {
        model: config.model(),
        defaults: config.form_defaults(),
    };
    info!(
        "Truncating scorelines at {} goals per side (league avg defaults {:.2} / {:.2})",
        config.max_goals, config.home_league_avg, config.away_league_avg
    );

    let app = dashboard::router(state);
    let addr: SocketAddr = config.addr.parse()?;
    info!("Odds form listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;

    Ok(())
}
