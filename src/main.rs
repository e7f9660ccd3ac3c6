//! Sumi-Index main entry point
//!
//! This is the command-line interface for the Sumi-Index seed-list crawler.

use anyhow::Context;
use clap::Parser;
use std::path::{Path, PathBuf};
use sumi_index::config::{load_config_with_hash, Config};
use sumi_index::crawler::run_crawl;
use sumi_index::output::{load_statistics, print_crawl_report, print_statistics};
use sumi_index::storage::{parse_seed_list, SeedListFile, SqliteStorage};
use sumi_index::url::normalize_url;
use tracing_subscriber::EnvFilter;

/// Sumi-Index: a seed-list crawler for a full-text index
///
/// Sumi-Index crawls every URL in the seed list plus the pages they link
/// to, revalidates known pages with conditional requests, and stores a
/// snippet and normalized token text for each HTML page.
#[derive(Parser, Debug)]
#[command(name = "sumi-index")]
#[command(version = "1.0.0")]
#[command(about = "A seed-list crawler for a full-text index", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Replace the stored seed list with the contents of FILE before crawling
    #[arg(long, value_name = "FILE")]
    seeds: Option<PathBuf>,

    /// Only save the seed list given with --seeds, without crawling
    #[arg(long, requires = "seeds", conflicts_with_all = ["dry_run", "stats"])]
    save_only: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show how the seeds normalize without crawling
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Show statistics from the database and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    let seed_list = SeedListFile::new(&config.storage.seed_list_path);

    if let Some(path) = &cli.seeds {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read seed list {}", path.display()))?;
        seed_list
            .save(&raw)
            .with_context(|| format!("Failed to save seed list {}", seed_list.path().display()))?;
        tracing::info!(
            "Saved {} seeds to {}",
            parse_seed_list(&raw).len(),
            seed_list.path().display()
        );
        if cli.save_only {
            return Ok(());
        }
    }

    // Handle different modes
    if cli.dry_run {
        handle_dry_run(&config, &seed_list)?;
    } else if cli.stats {
        handle_stats(&config)?;
    } else {
        handle_crawl(&config, &config_hash).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sumi_index=info,warn"),
            1 => EnvFilter::new("sumi_index=debug,info"),
            2 => EnvFilter::new("sumi_index=trace,debug"),
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

/// Handles the --dry-run mode: validates config and shows how seeds normalize
fn handle_dry_run(config: &Config, seed_list: &SeedListFile) -> anyhow::Result<()> {
    println!("=== Sumi-Index Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Max depth: {}", config.crawler.max_depth);
    println!("  Max links per page: {}", config.crawler.max_links_per_page);
    println!("  Request timeout: {}s", config.crawler.request_timeout);
    println!("  Max redirects: {}", config.crawler.max_redirects);
    match config.crawler.run_deadline {
        Some(seconds) => println!("  Run deadline: {}s", seconds),
        None => println!("  Run deadline: none"),
    }

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\nStorage:");
    println!("  Database: {}", config.storage.database_path);
    println!("  Seed list: {}", config.storage.seed_list_path);

    let seeds = seed_list
        .load_seeds()
        .with_context(|| format!("Failed to load seed list {}", seed_list.path().display()))?;

    println!("\nSeeds ({}):", seeds.len());
    let mut valid = 0;
    for seed in &seeds {
        match normalize_url(seed) {
            Ok(normalized) => {
                valid += 1;
                println!("  ✓ {} -> {}", seed, normalized);
            }
            Err(e) => println!("  ✗ {} ({})", seed, e),
        }
    }

    println!("\n✓ Configuration is valid");
    println!("✓ Would start crawling with {} seed URLs", valid);

    Ok(())
}

/// Handles the --stats mode: shows statistics from the database
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    println!("Database: {}\n", config.storage.database_path);

    let storage = SqliteStorage::new(Path::new(&config.storage.database_path))
        .context("Failed to open database")?;

    let stats = load_statistics(&storage)?;
    print_statistics(&stats);

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config, config_hash: &str) -> anyhow::Result<()> {
    tracing::info!(
        "Max depth: {}, links per page: {}",
        config.crawler.max_depth,
        config.crawler.max_links_per_page
    );

    let stats = run_crawl(config, config_hash)
        .await
        .context("Crawl aborted")?;

    print_crawl_report(&stats);

    Ok(())
}
