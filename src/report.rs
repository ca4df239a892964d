//! End-of-stream summary rendering
//!
//! Sprint 2: exact report format
//!
//! The report is plain text on stdout: a total line, a JITed share line,
//! then one line per symbol sorted by descending cycle count. Rendering is
//! a pure function of the finalized state, so emitting it twice yields
//! identical output.

use std::io::{self, Write};

/// Cycles attributed to one symbol, in final report order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolCycles {
    pub name: String,
    pub cycles: u64,
}

/// Finalized aggregation result, produced exactly once per replay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    /// Sum of every recorded sample period.
    pub total_cycles: u64,
    /// Sum of periods for samples classified as JIT code regions.
    pub jited_cycles: u64,
    /// Per-symbol totals, sorted by descending cycles; ties keep
    /// first-seen order.
    pub symbols: Vec<SymbolCycles>,
}

impl CycleReport {
    /// Render the report as its output lines.
    ///
    /// A zero total stops after the first line: there is nothing to divide
    /// by and percentages would be meaningless. An empty symbol table skips
    /// the per-symbol section so the column-width computation never runs
    /// over an empty key set.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![format!("total cycles: {}", self.total_cycles)];
        if self.total_cycles == 0 {
            return lines;
        }

        let jited_pct = self.jited_cycles as f64 / self.total_cycles as f64 * 100.0;
        lines.push(format!(
            "JITed cycles: {} ({:.1}%)",
            self.jited_cycles, jited_pct
        ));

        let Some(width) = self.symbols.iter().map(|s| s.name.len()).max() else {
            return lines;
        };
        for symbol in &self.symbols {
            // Zero jited_cycles can still carry zero-period symbol entries;
            // their share is 0.0 rather than a division by zero.
            let pct = if self.jited_cycles > 0 {
                symbol.cycles as f64 / self.jited_cycles as f64 * 100.0
            } else {
                0.0
            };
            lines.push(format!(
                "{:<width$} {:>5.1}% {}",
                symbol.name,
                pct,
                symbol.cycles,
                width = width
            ));
        }
        lines
    }

    /// Write the report, one line per row, to `out`.
    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for line in self.lines() {
            writeln!(out, "{}", line)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn symbol(name: &str, cycles: u64) -> SymbolCycles {
        SymbolCycles {
            name: name.to_string(),
            cycles,
        }
    }

    #[test]
    fn test_report_total_only_when_no_jit_cycles() {
        // Scenario: one sample in a regular shared object.
        let report = CycleReport {
            total_cycles: 100,
            jited_cycles: 0,
            symbols: Vec::new(),
        };
        assert_eq!(
            report.lines(),
            vec!["total cycles: 100", "JITed cycles: 0 (0.0%)"]
        );
    }

    #[test]
    fn test_report_zero_total_stops_after_first_line() {
        let report = CycleReport {
            total_cycles: 0,
            jited_cycles: 0,
            symbols: Vec::new(),
        };
        assert_eq!(report.lines(), vec!["total cycles: 0"]);
    }

    #[test]
    fn test_report_full_breakdown() {
        // 175 total, 150 JITed (85.7%), foo 100/150 (66.7%), bar 50/150.
        let report = CycleReport {
            total_cycles: 175,
            jited_cycles: 150,
            symbols: vec![symbol("foo", 100), symbol("bar", 50)],
        };
        assert_eq!(
            report.lines(),
            vec![
                "total cycles: 175",
                "JITed cycles: 150 (85.7%)",
                "foo  66.7% 100",
                "bar  33.3% 50",
            ]
        );
    }

    #[test]
    fn test_report_symbol_column_width_follows_longest_name() {
        let report = CycleReport {
            total_cycles: 100,
            jited_cycles: 100,
            symbols: vec![symbol("a_rather_long_symbol", 75), symbol("x", 25)],
        };
        let lines = report.lines();
        assert_eq!(lines[2], "a_rather_long_symbol  75.0% 75");
        assert_eq!(lines[3], "x                     25.0% 25");
    }

    #[test]
    fn test_report_hundred_percent_share_keeps_width_five() {
        let report = CycleReport {
            total_cycles: 80,
            jited_cycles: 80,
            symbols: vec![symbol("foo", 80)],
        };
        assert_eq!(
            report.lines(),
            vec![
                "total cycles: 80",
                "JITed cycles: 80 (100.0%)",
                "foo 100.0% 80",
            ]
        );
    }

    #[test]
    fn test_report_zero_cycle_symbol_renders_without_division_error() {
        // A zero-period sample in a JIT region creates a symbol entry while
        // jited_cycles stays zero.
        let report = CycleReport {
            total_cycles: 25,
            jited_cycles: 0,
            symbols: vec![symbol("idle", 0)],
        };
        assert_eq!(
            report.lines(),
            vec![
                "total cycles: 25",
                "JITed cycles: 0 (0.0%)",
                "idle   0.0% 0",
            ]
        );
    }

    #[test]
    fn test_report_rendering_is_idempotent() {
        let report = CycleReport {
            total_cycles: 175,
            jited_cycles: 150,
            symbols: vec![symbol("foo", 100), symbol("bar", 50)],
        };
        assert_eq!(report.lines(), report.lines());
    }

    #[test]
    fn test_report_write_to_appends_newlines() {
        let report = CycleReport {
            total_cycles: 100,
            jited_cycles: 100,
            symbols: vec![symbol("foo", 100)],
        };
        let mut out = Vec::new();
        report.write_to(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "total cycles: 100\nJITed cycles: 100 (100.0%)\nfoo 100.0% 100\n"
        );
    }

    #[test]
    fn test_report_share_rounding_one_fractional_digit() {
        // 1/3 of 300 = 33.333..% -> 33.3; 2/3 -> 66.7.
        let report = CycleReport {
            total_cycles: 300,
            jited_cycles: 300,
            symbols: vec![symbol("two_thirds", 200), symbol("one_third", 100)],
        };
        let lines = report.lines();
        assert_eq!(lines[1], "JITed cycles: 300 (100.0%)");
        assert_eq!(lines[2], "two_thirds  66.7% 200");
        assert_eq!(lines[3], "one_third   33.3% 100");
    }
}
