//! Sitegauge main entry point
//!
//! Command-line front end for the page analysis engine: analyze one URL
//! or crawl a sitemap, printing the JSON report(s) to stdout.

use clap::Parser;
use sitegauge::analyzer::Analyzer;
use sitegauge::config::{load_config, Config};
use sitegauge::sitemap::SitemapCrawler;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Sitegauge: a weighted web page analysis engine
///
/// Fetches a page (or every same-domain page in a sitemap), evaluates a
/// catalog of SEO, performance, security, miscellaneous, and technology
/// checks against it, and prints a scored JSON report.
#[derive(Parser, Debug)]
#[command(name = "sitegauge")]
#[command(version)]
#[command(about = "Analyze a web page and score it against a check catalog", long_about = None)]
struct Cli {
    /// URL to analyze (scheme optional, https assumed)
    #[arg(value_name = "URL")]
    target: String,

    /// Treat the target as a sitemap and analyze every listed page
    #[arg(long)]
    sitemap: bool,

    /// Maximum number of pages analyzed in a sitemap crawl
    #[arg(long, value_name = "N", requires = "sitemap")]
    max_pages: Option<usize>,

    /// Path to a TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Pretty-print the JSON report
    #[arg(long)]
    pretty: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)?
        }
        None => Config::default(),
    };

    let analyzer = Analyzer::new(config)?;

    if cli.sitemap {
        let crawler = SitemapCrawler::new(analyzer);
        let reports = crawler.crawl(&cli.target, cli.max_pages).await?;

        tracing::info!("Analyzed {} pages", reports.len());
        for report in &reports {
            print_report(report, cli.pretty)?;
        }
    } else {
        let report = analyzer.analyze(&cli.target).await?;
        print_report(&report, cli.pretty)?;
    }

    Ok(())
}

fn print_report(report: &sitegauge::AnalysisResult, pretty: bool) -> anyhow::Result<()> {
    let json = if pretty {
        report.to_json_pretty()?
    } else {
        report.to_json()?
    };
    println!("{}", json);
    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sitegauge=info,warn"),
            1 => EnvFilter::new("sitegauge=debug,info"),
            2 => EnvFilter::new("sitegauge=trace,debug"),
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
