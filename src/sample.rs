//! Sample records delivered by the trace-replay stream
//!
//! Sprint 1: core data model

use serde::Deserialize;

/// Substituted when a sample's module origin was not resolved by the
/// recording host.
pub const UNKNOWN_MODULE: &str = "unknown-module";

/// Substituted when a sample's symbol was not resolved. Matches the marker
/// perf itself prints for unresolved locations, so unresolved JIT samples
/// aggregate under one key either way.
pub const UNKNOWN_SYMBOL: &str = "[unknown]";

/// One sampled profiling event.
///
/// `period` is the cycle count the recording host attributed to this sample.
/// `dso` and `symbol` are optional: samples land in regions the host could
/// not resolve, and the aggregation degrades to sentinel keys rather than
/// failing.
///
/// The struct doubles as the JSON-lines ingestion schema. Field aliases
/// accept the long names used by other drivers (`module_origin`,
/// `symbol_name`), a missing `period` reads as zero, and unknown fields are
/// ignored so richer schemas (timestamps, pids, cpu ids) pass through.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Sample {
    /// Cycle count attributed to this sample; zero is legal.
    pub period: u64,
    /// Binary, shared library, or synthetic map file the sampled address
    /// belongs to.
    #[serde(alias = "module_origin")]
    pub dso: Option<String>,
    /// Resolved function/symbol name at the sampled address.
    #[serde(alias = "symbol_name")]
    pub symbol: Option<String>,
}

impl Sample {
    /// Module origin with the sentinel substituted for unresolved samples.
    pub fn module_origin(&self) -> &str {
        self.dso.as_deref().unwrap_or(UNKNOWN_MODULE)
    }

    /// Symbol name with the sentinel substituted for unresolved samples.
    pub fn symbol_name(&self) -> &str {
        self.symbol.as_deref().unwrap_or(UNKNOWN_SYMBOL)
    }
}
