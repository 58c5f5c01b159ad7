mod cli;
mod config;
mod prefs;
mod rank;
mod scheduler;
mod source;
mod ui;
mod utils;

use std::io::{stdout, IsTerminal};

use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Args, Command};
use crate::config::Config;
use crate::prefs::FilePrefs;
use crate::rank::{RankFetcher, RankSnapshot};
use crate::scheduler::Schedule;
use crate::source::HttpSource;
use crate::ui::{PlainLine, RankSink, StatusLine};

fn init_logging(verbose: bool, default_level: &str) {
    let level = if verbose { "debug" } else { default_level };

    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .try_init();
}

/// Resolves when the user interrupts; never resolves if the signal can't be watched
async fn interrupted() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!("cannot listen for Ctrl-C: {}", err);
        std::future::pending::<()>().await;
    }
}

async fn run_watch(args: &Args, config: &Config) -> Result<()> {
    let fetcher = RankFetcher::new(HttpSource::new(args.source_url(config))?);
    let mut store = FilePrefs::open_default()?;
    let style = args.arrow_setting(config).resolve();
    let schedule = Schedule::default();

    tracing::info!(
        source = args.source_url(config),
        prefs = %store.path().display(),
        "watching rank"
    );

    if stdout().is_terminal() {
        let mut line = StatusLine::new(stdout());
        let result =
            scheduler::run(&fetcher, &mut store, &mut line, style, schedule, interrupted()).await;
        line.finish()?;
        result
    } else {
        let mut sink = PlainLine::new(stdout());
        scheduler::run(&fetcher, &mut store, &mut sink, style, schedule, interrupted()).await
    }
}

async fn run_once(args: &Args, config: &Config) -> Result<()> {
    let fetcher = RankFetcher::new(HttpSource::new(args.source_url(config))?);
    let mut store = FilePrefs::open_default()?;
    let style = args.arrow_setting(config).resolve();

    let outcome = scheduler::tick(&fetcher, &mut store, &Schedule::default(), scheduler::now_ms()).await;
    let display = outcome.result.context("Failed to refresh rank")?;

    PlainLine::new(stdout()).show(&display.render(style))
}

fn show_cached() -> Result<()> {
    let store = FilePrefs::open_default()?;
    let snapshot = RankSnapshot::load(&store);
    let now = scheduler::now_ms();

    if snapshot.is_unset() {
        println!("No rank cached ({})", store.path().display());
        return Ok(());
    }

    let fetched = chrono::DateTime::<chrono::Utc>::from_timestamp_millis(snapshot.fetched_at_ms)
        .map(|at| at.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "unknown".to_string());
    let age = snapshot
        .age_ms(now)
        .map(utils::format_age)
        .unwrap_or_else(|| "never".to_string());
    let state = if snapshot.is_fresh(now) { "fresh" } else { "stale" };

    println!("Kotlin {} (fetched {}, {} ago, {})", snapshot, fetched, age, state);
    Ok(())
}

fn reset_cached() -> Result<()> {
    let mut store = FilePrefs::open_default()?;
    RankSnapshot::clear(&mut store)?;
    println!("Cleared cached rank in {}", store.path().display());
    Ok(())
}

fn write_default_config() -> Result<()> {
    let path = Config::config_path()?;
    if path.exists() {
        println!("{}", path.display());
        return Ok(());
    }

    Config::default().save()?;
    println!("Wrote default config to {}", path.display());
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::parse_args()?;

    if args.help {
        print!("{}", cli::USAGE);
        return Ok(());
    }

    let config = Config::load()?;
    init_logging(args.verbose, &config.log_level);

    match args.command {
        Command::Watch => run_watch(&args, &config).await,
        Command::Once => run_once(&args, &config).await,
        Command::Show => show_cached(),
        Command::Reset => reset_cached(),
        Command::Config => write_default_config(),
    }
}
