//! amz-laptops - Scrapes amazon.eg laptop listings into an Excel workbook.

use amz_laptops::commands::ScrapeCommand;
use amz_laptops::config::{Config, PageAggregation};
use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "amz-laptops",
    version,
    about = "Scrapes amazon.eg laptop listings and specifications into an Excel workbook",
    long_about = "Fetches search result pages, then every product's detail page, and saves \
                  the 'General Info' and 'Details' sheets to an .xlsx file."
)]
struct Cli {
    /// Path to config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Workbook to write (overwritten if it exists)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// First search page to scrape
    #[arg(long)]
    first_page: Option<u32>,

    /// Last search page to scrape (inclusive)
    #[arg(long)]
    last_page: Option<u32>,

    /// Attempts per page before giving up
    #[arg(long)]
    retries: Option<u32>,

    /// Delay between failed attempts in milliseconds
    #[arg(long)]
    retry_delay: Option<u64>,

    /// Delay after each product page in milliseconds
    #[arg(long)]
    delay: Option<u64>,

    /// Proxy URL (e.g., socks5://host:port)
    #[arg(long, env = "AMZ_PROXY")]
    proxy: Option<String>,

    /// Keep a page's listings even if none of its product pages could be fetched
    #[arg(long)]
    keep_listings: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::from_default_env().add_directive(Level::INFO.into())
    };

    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    // Load config with layered overrides
    let mut config = Config::load(cli.config.as_deref())?.with_env();

    // Apply CLI overrides
    if let Some(output) = cli.output {
        config.output = output;
    }
    if let Some(first_page) = cli.first_page {
        config.first_page = first_page;
    }
    if let Some(last_page) = cli.last_page {
        config.last_page = last_page;
    }
    if let Some(retries) = cli.retries {
        config.max_attempts = retries;
    }
    if let Some(retry_delay) = cli.retry_delay {
        config.retry_delay_ms = retry_delay;
    }
    if let Some(delay) = cli.delay {
        config.item_delay_ms = delay;
    }
    if let Some(proxy) = cli.proxy {
        config.proxy = Some(proxy);
    }
    if cli.keep_listings {
        config.aggregation = PageAggregation::KeepListings;
    }

    let output = ScrapeCommand::new(config).execute().await?;
    println!("{}", output);

    Ok(())
}
