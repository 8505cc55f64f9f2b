use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;

use archive_ingestion::ingestion::{IngestionObserver, IngestionOptions, StdErrObserver};
use archive_ingestion::{IngestionResult, ingest_batch_with_options};

/// Load the CSV and JSON files of a zip archive (or extracted folder) and report them by format.
#[derive(Debug, Parser)]
#[command(name = "archive-ingest", version, about)]
struct Cli {
    /// Zip archive or directory of CSV/JSON files.
    source: PathBuf,

    /// Directory the archive is extracted into (created if missing).
    destination: PathBuf,

    /// Print the tables as JSON instead of a summary.
    #[arg(long)]
    json: bool,

    /// Log every extracted archive and ingested file to stderr.
    #[arg(short, long)]
    verbose: bool,
}

fn run(cli: &Cli) -> IngestionResult<()> {
    let options = IngestionOptions {
        observer: cli
            .verbose
            .then(|| Arc::new(StdErrObserver) as Arc<dyn IngestionObserver>),
        ..Default::default()
    };

    let result = ingest_batch_with_options(&cli.source, &cli.destination, &options)?;
    if cli.json {
        println!("{:#}", result.to_json_value()?);
    } else {
        print!("{result}");
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
