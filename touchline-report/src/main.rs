//! Touchline command line
//!
//! Analyzes a recorded match (or the built-in demo) and prints the report

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use touchline_analysis::{AnalysisConfig, DemoReplay};
use touchline_core::ReplaySource;
use touchline_report::{load_config, run_report, JsonReplay};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "touchline", version, about = "Ball touch and possession report for a recorded match")]
struct Cli {
    /// JSON match recording; the demo match is used when omitted
    recording: Option<PathBuf>,

    /// JSON analysis config
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the report here instead of stdout
    #[arg(short, long)]
    out: Option<PathBuf>,
}

fn main() -> Result<()> {
    // Initialize tracing; stdout is reserved for the report
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => AnalysisConfig::default(),
    };

    let mut source: Box<dyn ReplaySource> = match &cli.recording {
        Some(path) => Box::new(JsonReplay::from_file(path)?),
        None => {
            info!("No recording given, analyzing the demo match");
            Box::new(DemoReplay::new())
        }
    };

    let report = run_report(source.as_mut(), &config)?;

    match &cli.out {
        Some(path) => {
            report.save(path)?;
            info!("Report written to {}", path.display());
        }
        None => {
            let stdout = std::io::stdout();
            report.write_json(stdout.lock())?;
            println!();
        }
    }

    Ok(())
}
