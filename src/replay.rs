//! Caller-owned trace replay loop
//!
//! Sprint 5: drive the aggregation from a recorded stream instead of
//! living inside a tracing host as a callback. The loop owns nothing but
//! the read cursor; the aggregator is constructed and finalized by the
//! caller, so end of input is the end-of-stream signal and a report is
//! always produced.

use std::io::BufRead;

use anyhow::{Context, Result};

use crate::aggregator::CycleAggregator;
use crate::cli::InputFormat;
use crate::filter::SampleFilter;
use crate::perf_script::PerfScriptParser;
use crate::sample::Sample;

/// Totals for one replay pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReplayStats {
    pub lines_read: u64,
    pub samples_recorded: u64,
    pub samples_filtered: u64,
    pub lines_skipped: u64,
}

/// Replay a recorded stream into `aggregator`.
///
/// Sample-level problems (malformed lines, missing fields) degrade and are
/// counted; only I/O errors on the reader abort the replay.
pub fn replay<R: BufRead>(
    reader: R,
    format: InputFormat,
    filter: &SampleFilter,
    aggregator: &mut CycleAggregator,
) -> Result<ReplayStats> {
    match format {
        InputFormat::PerfScript => replay_perf_script(reader, filter, aggregator),
        InputFormat::Jsonl => replay_jsonl(reader, filter, aggregator),
    }
}

fn replay_perf_script<R: BufRead>(
    reader: R,
    filter: &SampleFilter,
    aggregator: &mut CycleAggregator,
) -> Result<ReplayStats> {
    let mut stats = ReplayStats::default();
    let mut parser = PerfScriptParser::new();

    for line in reader.lines() {
        let line = line.context("failed to read input stream")?;
        stats.lines_read += 1;
        if let Some(sample) = parser.parse_line(&line) {
            record_sample(&sample, filter, aggregator, &mut stats);
        }
    }
    if let Some(sample) = parser.finish() {
        record_sample(&sample, filter, aggregator, &mut stats);
    }

    stats.lines_skipped = parser.lines_skipped();
    Ok(stats)
}

fn replay_jsonl<R: BufRead>(
    reader: R,
    filter: &SampleFilter,
    aggregator: &mut CycleAggregator,
) -> Result<ReplayStats> {
    let mut stats = ReplayStats::default();

    for line in reader.lines() {
        let line = line.context("failed to read input stream")?;
        stats.lines_read += 1;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        match serde_json::from_str::<Sample>(trimmed) {
            Ok(sample) => record_sample(&sample, filter, aggregator, &mut stats),
            Err(e) => {
                stats.lines_skipped += 1;
                tracing::debug!("skipping malformed record: {}", e);
            }
        }
    }

    Ok(stats)
}

fn record_sample(
    sample: &Sample,
    filter: &SampleFilter,
    aggregator: &mut CycleAggregator,
    stats: &mut ReplayStats,
) {
    if filter.should_record(sample) {
        aggregator.record(sample);
        stats.samples_recorded += 1;
    } else {
        stats.samples_filtered += 1;
    }
}
