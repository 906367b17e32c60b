use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fbref_ingest::config::Settings;
use fbref_ingest::fbref::FbrefScraper;
use fbref_ingest::pipeline::{IngestPipeline, ScrapeMode, ScrapeRequest};
use fbref_ingest::repository;
use fbref_ingest::service::DataService;

#[derive(Parser)]
#[command(name = "fbref_ingest")]
#[command(about = "Scrape fbref squad pages into a local SQLite database")]
#[command(version)]
struct Cli {
    /// What to scrape
    #[arg(long, value_enum, default_value_t = ScrapeMode::Test)]
    mode: ScrapeMode,

    /// Squad page for team mode
    #[arg(long)]
    team_url: Option<String>,

    /// Season label, e.g. 2024-2025
    #[arg(long)]
    season: Option<String>,

    /// League pages for full mode
    #[arg(long, num_args = 1..)]
    leagues: Vec<String>,

    /// SQLite database file
    #[arg(long, env = "FBREF_DB_PATH")]
    db: Option<PathBuf>,

    /// Also fetch per-player match logs
    #[arg(long)]
    match_logs: bool,
}

fn main() -> ExitCode {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fbref_ingest=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match run(Cli::parse()) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<bool> {
    let settings = Settings::from_env()?;
    let db_path = cli.db.unwrap_or(settings.database.path.clone());

    let service = DataService::open(&db_path)
        .with_context(|| format!("unable to open database {}", db_path.display()))?;
    let scraper = FbrefScraper::new(&settings.scrape)?;
    let mut pipeline = IngestPipeline::new(scraper, service, settings.scrape.default_leagues)
        .with_match_logs(cli.match_logs);

    let request = ScrapeRequest {
        mode: cli.mode,
        team_url: cli.team_url,
        season: cli.season,
        leagues: (!cli.leagues.is_empty()).then_some(cli.leagues),
    };
    let result = pipeline.run(&request);
    if result.success {
        info!("{}", result.message);
    } else {
        error!("{}", result.message);
    }

    let counts = repository::summary_counts(pipeline.service().connection())
        .context("read summary counts")?;
    println!("Scrape {}", if result.success { "complete" } else { "failed" });
    println!("DB: {}", db_path.display());
    println!("{}", result.message);
    println!(
        "Stored: teams={} players={} seasons={} stat_lines={} match_logs={}",
        counts.total_teams,
        counts.total_players,
        counts.total_seasons,
        counts.total_stats,
        counts.total_match_logs
    );

    let recent = repository::recent_scraping_logs(pipeline.service().connection(), 6)
        .context("read scraping logs")?;
    let failures = recent.iter().filter(|log| log.status == "failed").collect::<Vec<_>>();
    if !failures.is_empty() {
        println!("  recent failures: {}", failures.len());
        for log in failures {
            println!(
                "   - {} {}",
                log.source_url,
                log.error_message.as_deref().unwrap_or("n/a")
            );
        }
    }

    Ok(result.success)
}
