//! Cycle aggregation keyed by symbol name
//!
//! Sprint 1: record/finalize core
//!
//! The aggregator is created once before the first sample, mutated once per
//! `record`, and consumed exactly once by `finalize`. Moving `self` into
//! `finalize` makes a late `record` unrepresentable, which is the whole
//! STREAMING -> FINALIZED lifecycle of the state.

use fnv::FnvHashMap;

use crate::classifier::RegionClassifier;
use crate::report::{CycleReport, SymbolCycles};
use crate::sample::Sample;

/// Accumulated cycles for one symbol plus its insertion rank.
#[derive(Debug, Clone)]
struct SymbolEntry {
    cycles: u64,
    /// Rank of first appearance, used as the stable tie-break when two
    /// symbols end with equal cycle counts.
    first_seen: usize,
}

/// Accumulates per-symbol and global cycle totals over a sample stream.
///
/// Invariants after any sequence of `record` calls:
/// - `jited_cycles <= total_cycles`
/// - `jited_cycles` equals the sum of all per-symbol cycles
///
/// Counters saturate at `u64::MAX` instead of wrapping; malformed input can
/// degrade the numbers but never abort the replay.
#[derive(Debug, Default)]
pub struct CycleAggregator {
    classifier: RegionClassifier,
    total_cycles: u64,
    jited_cycles: u64,
    per_symbol: FnvHashMap<String, SymbolEntry>,
}

impl CycleAggregator {
    /// Create an aggregator classifying JIT regions with `classifier`.
    pub fn new(classifier: RegionClassifier) -> Self {
        Self {
            classifier,
            total_cycles: 0,
            jited_cycles: 0,
            per_symbol: FnvHashMap::default(),
        }
    }

    /// Record one sample.
    ///
    /// Every period counts toward the total; samples whose module origin
    /// classifies as a JIT code region additionally count toward the JITed
    /// total and their symbol's entry. Unresolved fields were already
    /// substituted with sentinels by [`Sample`], so `"[unknown]"`
    /// accumulates like any other symbol key.
    pub fn record(&mut self, sample: &Sample) {
        self.total_cycles = self.total_cycles.saturating_add(sample.period);

        if self.classifier.is_compiled_region(sample.module_origin()) {
            self.jited_cycles = self.jited_cycles.saturating_add(sample.period);

            let rank = self.per_symbol.len();
            let entry = self
                .per_symbol
                .entry(sample.symbol_name().to_string())
                .or_insert(SymbolEntry {
                    cycles: 0,
                    first_seen: rank,
                });
            entry.cycles = entry.cycles.saturating_add(sample.period);
        }
    }

    /// Sum of all recorded periods.
    pub fn total_cycles(&self) -> u64 {
        self.total_cycles
    }

    /// Sum of periods recorded for JIT code regions.
    pub fn jited_cycles(&self) -> u64 {
        self.jited_cycles
    }

    /// Cycles accumulated for one symbol, if it was ever seen in a JIT
    /// region.
    pub fn symbol_cycles(&self, symbol: &str) -> Option<u64> {
        self.per_symbol.get(symbol).map(|entry| entry.cycles)
    }

    /// Number of distinct symbols observed in JIT regions.
    pub fn symbol_count(&self) -> usize {
        self.per_symbol.len()
    }

    /// End-of-stream transition: consume the accumulator and produce the
    /// report, sorting symbols by descending cycles with first-seen order
    /// breaking ties.
    pub fn finalize(self) -> CycleReport {
        let mut entries: Vec<(String, SymbolEntry)> = self.per_symbol.into_iter().collect();
        entries.sort_by(|a, b| {
            b.1.cycles
                .cmp(&a.1.cycles)
                .then(a.1.first_seen.cmp(&b.1.first_seen))
        });

        CycleReport {
            total_cycles: self.total_cycles,
            jited_cycles: self.jited_cycles,
            symbols: entries
                .into_iter()
                .map(|(name, entry)| SymbolCycles {
                    name,
                    cycles: entry.cycles,
                })
                .collect(),
        }
    }
}
