//! Job-Harvester main entry point
//!
//! This is the command-line interface for the Job-Harvester listing scraper.

use anyhow::Context;
use clap::Parser;
use job_harvester::config::{load_config_with_hash, Config};
use job_harvester::crawler::Harvester;
use job_harvester::output::print_statistics;
use job_harvester::url::page_url;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Job-Harvester: a concurrent job-listing scraper
///
/// Job-Harvester discovers how many results pages a listing has, fetches
/// them all concurrently and writes one CSV row per job listing.
#[derive(Parser, Debug)]
#[command(name = "job-harvester")]
#[command(version)]
#[command(about = "A concurrent job-listing scraper", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (built-in defaults when omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Write the CSV here instead of the configured output path
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be fetched without fetching
    #[arg(long)]
    dry_run: bool,

    /// Print run statistics after the harvest
    #[arg(long)]
    stats: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let mut config = load(&cli)?;
    if let Some(output) = &cli.output {
        config.output.path = output.display().to_string();
    }

    if cli.dry_run {
        handle_dry_run(&config)?;
    } else {
        handle_harvest(config, cli.stats).await?;
    }

    Ok(())
}

/// Loads the configuration file, or the defaults when none was given
fn load(cli: &Cli) -> anyhow::Result<Config> {
    let Some(path) = &cli.config else {
        tracing::info!("No configuration file given, using defaults");
        return Ok(Config::default());
    };

    tracing::info!("Loading configuration from: {}", path.display());
    match load_config_with_hash(path) {
        Ok((config, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            Ok(config)
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            Err(e).with_context(|| format!("loading {}", path.display()))
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("job_harvester=info,warn"),
            1 => EnvFilter::new("job_harvester=debug,info"),
            2 => EnvFilter::new("job_harvester=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: validates config and shows what would be fetched
fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    println!("=== Job-Harvester Dry Run ===\n");

    println!("Scraper Configuration:");
    println!("  Base URL: {}", config.scraper.base_url);
    println!("  Page size: {}", config.scraper.page_size);
    println!(
        "  Max concurrent pages: {}",
        config.scraper.max_concurrent_pages
    );
    println!(
        "  Max concurrent tasks: {}",
        config.scraper.max_concurrent_tasks
    );
    println!("  Request timeout: {}s", config.scraper.request_timeout_secs);

    println!("\nSelectors:");
    println!("  Card: {}", config.selectors.card);
    println!(
        "  Pagination: {} {}",
        config.selectors.pagination, config.selectors.page_link
    );
    println!("  ID attribute: {}", config.selectors.id_attribute);

    println!("\nOutput:");
    println!("  File: {}", config.output.path);
    println!(
        "  Detail URL: {}<id>{}",
        config.output.detail_url_prefix, config.output.detail_url_suffix
    );
    if config.output.title_leading_space {
        println!("  Title cells carry one leading space");
    }

    // Building the harvester compiles every selector
    Harvester::new(config.clone()).context("building harvester")?;

    let first_page = page_url(&config.scraper.base_url, 0, config.scraper.page_size)?;
    println!("\n✓ Configuration is valid");
    println!("✓ First results page would be {}", first_page);

    Ok(())
}

/// Handles the main harvest operation
async fn handle_harvest(config: Config, show_stats: bool) -> anyhow::Result<()> {
    let harvester = Harvester::new(config).context("building harvester")?;

    match harvester.run().await {
        Ok(stats) => {
            if show_stats {
                print_statistics(&stats);
            }
            println!("Done, extracted {}", stats.total_records);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Harvest failed: {}", e);
            Err(e.into())
        }
    }
}
