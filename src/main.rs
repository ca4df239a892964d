use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use jitsum::{
    aggregator::CycleAggregator, classifier::RegionClassifier, cli::Cli, filter::SampleFilter,
    replay,
};
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Open the replay source: a positional path, or stdin for "-"/absent
fn open_input(file: Option<&Path>) -> Result<Box<dyn BufRead>> {
    match file {
        Some(path) if path.as_os_str() != "-" => {
            let file =
                File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
            Ok(Box::new(BufReader::new(file)))
        }
        _ => Ok(Box::new(io::stdin().lock())),
    }
}

fn main() -> Result<()> {
    let args = Cli::parse();

    // Initialize tracing if --debug flag is set
    init_tracing(args.debug);

    // Parse filter expression if provided
    let filter = if let Some(expr) = &args.filter {
        SampleFilter::from_expr(expr)?
    } else {
        SampleFilter::all()
    };

    let reader = open_input(args.file.as_deref())?;
    let mut aggregator = CycleAggregator::new(RegionClassifier::new(&args.jit_suffix));

    let stats = replay::replay(reader, args.input_format, &filter, &mut aggregator)?;
    tracing::debug!(
        "replay complete: {} lines read, {} samples recorded, {} filtered, {} skipped",
        stats.lines_read,
        stats.samples_recorded,
        stats.samples_filtered,
        stats.lines_skipped
    );
    if stats.lines_skipped > 0 {
        tracing::warn!("{} input lines contributed no sample", stats.lines_skipped);
    }

    // The report is the program's output proper; diagnostics stay on stderr.
    aggregator
        .finalize()
        .write_to(&mut io::stdout().lock())
        .context("failed to write report")?;

    Ok(())
}
