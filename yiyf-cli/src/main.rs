//! YIYF CLI
//!
//! Runs the program board server and offers a few maintenance commands for
//! the scraper and the curated fixture file.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use yiyf_api::{ApiConfig, ApiServer};
use yiyf_core::constants::{DEFAULT_MAX_PROGRAMS, DEFAULT_SOURCE_URL};
use yiyf_core::traits::{FixtureStore, ProgramSource};
use yiyf_core::types::{FixtureData, ProgramRecord};
use yiyf_fixtures::FileFixtureStore;
use yiyf_scraper::{HtmlScraper, ScraperConfig};

/// YIYF - youth program board backend
#[derive(Parser)]
#[command(name = "yiyf")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server
    Serve {
        /// Port to listen on [default: $PORT or 3000]
        #[arg(short, long)]
        port: Option<u16>,
        /// Bind address
        #[arg(short, long, default_value = "0.0.0.0")]
        bind: String,
    },

    /// Scrape the site once and print what was found
    Scrape {
        /// Page to scrape
        #[arg(long, env = "SCRAPE_URL", default_value = DEFAULT_SOURCE_URL)]
        url: String,
        /// Maximum number of programs
        #[arg(short, long, default_value_t = DEFAULT_MAX_PROGRAMS)]
        max: usize,
        /// Request timeout in seconds
        #[arg(short, long, default_value = "15")]
        timeout: u64,
        /// Print the records as JSON instead of a listing
        #[arg(long)]
        raw: bool,
    },

    /// Inspect or replace the curated fixture file
    Fixtures {
        #[command(subcommand)]
        command: FixtureCommands,
    },
}

#[derive(Subcommand)]
enum FixtureCommands {
    /// Print the current fixture programs
    Show {
        /// Fixture file
        #[arg(long, env = "PROGRAMS_DATA_PATH", default_value = "programs-data.json")]
        path: PathBuf,
    },

    /// Replace the fixture programs from a JSON file
    Import {
        /// JSON file holding `{"programs": [...]}` or a bare array
        input: PathBuf,
        /// Fixture file
        #[arg(long, env = "PROGRAMS_DATA_PATH", default_value = "programs-data.json")]
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "yiyf=debug,info"
    } else {
        "yiyf=info,warn"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(cli.json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!cli.json).then(|| tracing_subscriber::fmt::layer()))
        .init();

    match cli.command {
        Commands::Serve { port, bind } => cmd_serve(port, &bind).await,
        Commands::Scrape {
            url,
            max,
            timeout,
            raw,
        } => cmd_scrape(url, max, timeout, raw).await,
        Commands::Fixtures { command } => match command {
            FixtureCommands::Show { path } => cmd_fixtures_show(&path).await,
            FixtureCommands::Import { input, path } => cmd_fixtures_import(&input, &path).await,
        },
    }
}

/// Run the server
async fn cmd_serve(port: Option<u16>, bind: &str) -> Result<()> {
    let mut config = ApiConfig::from_env();
    if let Some(port) = port {
        config.port = port;
    }
    let port = config.port;

    println!("{}", "🚀 Starting YIYF program board...".cyan().bold());
    println!("   {} {}", "Environment:".dimmed(), config.environment);
    println!("   {} http://{}:{}", "Listening on:".green(), bind, port);
    println!("   {} http://{}:{}/health", "Health check:".dimmed(), bind, port);
    println!("\n   Press Ctrl+C to stop.\n");

    let addr: SocketAddr = format!("{}:{}", bind, port)
        .parse()
        .with_context(|| format!("Invalid bind address {}:{}", bind, port))?;

    let server = ApiServer::from_config(config).context("Failed to configure server")?;
    server.run(addr).await.context("Server failed")?;

    Ok(())
}

/// Scrape once
async fn cmd_scrape(url: String, max: usize, timeout: u64, raw: bool) -> Result<()> {
    let scraper = HtmlScraper::with_config(ScraperConfig {
        url: url.clone(),
        timeout_seconds: timeout,
        max_programs: max,
    })?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message(format!("Scraping {}", url));
    pb.enable_steady_tick(Duration::from_millis(100));

    let result = scraper.fetch_programs().await;
    pb.finish_and_clear();

    let now = Utc::now();
    let records: Vec<ProgramRecord> = result
        .context("Scrape failed")?
        .into_iter()
        .map(|r| r.normalize(now, None, &url))
        .collect();

    if raw {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    if records.is_empty() {
        println!("{}", "⚠️  No programs recognized on the page.".yellow());
        println!("   The server would fall back to the fixture file.");
        return Ok(());
    }

    println!("\n{} {} program(s) found:", "✅".green(), records.len());
    print_programs(&records);
    Ok(())
}

/// Show the fixture file
async fn cmd_fixtures_show(path: &Path) -> Result<()> {
    let store = FileFixtureStore::new(path);
    let data = store
        .load()
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let origin = if path.exists() {
        path.display().to_string()
    } else {
        "built-in defaults (file not created yet)".to_string()
    };

    println!("{} {}", "📄 Fixture:".cyan().bold(), origin);
    println!("   {} {}", "Source:".dimmed(), data.source);
    println!("   {} {}", "Last updated:".dimmed(), data.last_updated.to_rfc3339());
    print_programs(&data.programs);
    Ok(())
}

/// Replace the fixture file
async fn cmd_fixtures_import(input: &Path, path: &Path) -> Result<()> {
    let contents = tokio::fs::read(input)
        .await
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let value: serde_json::Value =
        serde_json::from_slice(&contents).context("Input is not valid JSON")?;

    let payload = match value.get("programs") {
        Some(programs) => programs,
        None => &value,
    };
    let programs = ProgramRecord::list_from_value(payload)?;
    if programs.is_empty() {
        bail!("{} contains no programs", input.display());
    }

    let data = FixtureData::manual_update(programs, Utc::now());
    FileFixtureStore::new(path)
        .save(&data)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!(
        "{} {} program(s) written to {}",
        "✅".green(),
        data.len(),
        path.display()
    );
    Ok(())
}

fn print_programs(programs: &[ProgramRecord]) {
    for (i, program) in programs.iter().enumerate() {
        println!("\n   {}. {}", i + 1, program.title.bold());
        println!("      {} {}", "접수:".dimmed(), program.application_period);
        if !program.participation_period.is_empty() {
            println!("      {} {}", "활동:".dimmed(), program.participation_period);
        }
        if let Some(link) = &program.link {
            println!("      {} {}", "링크:".dimmed(), link);
        }
    }
}
