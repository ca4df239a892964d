//! CLI argument parsing for jitsum

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Input format of the recorded sample stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InputFormat {
    /// Text output of `perf script` (default)
    PerfScript,
    /// One JSON sample object per line
    Jsonl,
}

#[derive(Parser, Debug)]
#[command(name = "jitsum")]
#[command(version)]
#[command(
    about = "Cycle attribution reporter for JIT-compiled code in Linux perf profiles",
    long_about = None
)]
pub struct Cli {
    /// Recorded stream to replay ("-" or absent reads stdin)
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Input format of the recorded stream
    #[arg(
        short = 'i',
        long = "input-format",
        value_enum,
        default_value = "perf-script"
    )]
    pub input_format: InputFormat,

    /// Module-name suffix marking JIT code regions (perf map convention)
    #[arg(long = "jit-suffix", value_name = "SUFFIX", default_value = "map")]
    pub jit_suffix: String,

    /// Restrict samples (e.g., -e symbol=foo,bar or -e dso=/\.map$/)
    #[arg(short = 'e', long = "expr", value_name = "EXPR")]
    pub filter: Option<String>,

    /// Enable internal diagnostics on stderr
    #[arg(long)]
    pub debug: bool,
}
