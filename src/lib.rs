//! Jitsum - Cycle attribution reporter for JIT-compiled code regions
//!
//! This library replays a recorded CPU profile (the text output of
//! `perf script`, or a JSON-lines stream) and attributes cycle counts to
//! JIT-compiled code regions, identified by the perf map-file naming
//! convention. The result is a plain-text report of total cycles, the
//! JITed share, and a per-symbol breakdown.

pub mod aggregator;
pub mod classifier;
pub mod cli;
pub mod filter;
pub mod perf_script;
pub mod replay;
pub mod report;
pub mod sample;
