//! fraudscan - screen a PDF or image for signs of document fraud
//!
//! Usage: fraudscan [OPTIONS] <FILE>

use clap::Parser;
use fraudscan_lib::{report, AzureConfig, DocumentAnalyzer, DocumentFormat};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "fraudscan", version, about = "Document analyzer and fraud detector")]
struct Cli {
    /// Path of the file to analyze (pdf, jpg, jpeg or png)
    file: PathBuf,

    /// Document format (optional, must agree with the file extension)
    #[arg(long, value_enum)]
    format: Option<DocumentFormat>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Load .env file - current dir first, then parent
    if dotenvy::dotenv().is_err() {
        let _ = dotenvy::from_path("../.env");
    }

    init_tracing(cli.verbose);

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!("Analysis aborted: {:?}", e);
            eprintln!("error: {}", e);
            ExitCode::from(1)
        }
    }
}

async fn run(cli: &Cli) -> fraudscan_lib::Result<()> {
    let config = AzureConfig::from_env()?;
    let analyzer = DocumentAnalyzer::from_config(config)?;

    let report = analyzer.analyze_file(&cli.file, cli.format).await?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if cli.json {
        report::render_json(&report, &mut out)
    } else {
        report::render_text(&report, &mut out)
    }
}

/// Initialize tracing with RUST_LOG env filter
/// Default: warn for dependencies, info for our crates; -v raises ours to debug
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("warn,fraudscan_lib={level},fraudscan={level}"))
        }))
        .init();
}
