//! Text replay of `perf script` sample streams
//!
//! Sprint 4: parse the human-readable stream `perf script` prints, one
//! event header per sample:
//!
//! ```text
//! ruby 12345 [002] 171798.123456:     250000 cycles:u:  7f1200000010 botch_it+0x10 (/tmp/perf-12345.map)
//! ```
//!
//! When the trace was recorded with `-g`, the location moves off the header
//! into an indented callchain block terminated by a blank line:
//!
//! ```text
//! ruby 12345 [002] 171798.123456:     250000 cycles:u:
//!         7f1200000010 botch_it+0x10 (/tmp/perf-12345.map)
//!         5625d6bdcfa0 rb_vm_exec+0x1f (/usr/lib/libruby.so.3.2)
//!
//! ```
//!
//! Only the first frame (the sampled instruction pointer) attributes the
//! sample; deeper frames are ignored. Header recognition is shape-based
//! rather than indentation-based because perf left-pads the comm column.
//! Anything unparseable is skipped and counted, never fatal.

use crate::sample::Sample;

/// Incremental line-at-a-time parser.
///
/// Every sample stays pending until its block provably ends (the next
/// event header, a blank separator, or end of input), so `parse_line`
/// returns the sample *preceding* the line it was fed. Call [`finish`]
/// after the last line to flush the final sample.
///
/// [`finish`]: PerfScriptParser::finish
#[derive(Debug, Default)]
pub struct PerfScriptParser {
    pending: Option<PendingSample>,
    lines_skipped: u64,
}

#[derive(Debug)]
struct PendingSample {
    period: u64,
    dso: Option<String>,
    symbol: Option<String>,
    /// Whether a location (flat header remainder or first callchain frame)
    /// already attributed this sample.
    located: bool,
}

impl PerfScriptParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one input line (without its trailing newline).
    ///
    /// Returns `Some` when this line terminated the previous sample's
    /// block; the sample described by a header line surfaces on a later
    /// call or at [`finish`](PerfScriptParser::finish).
    pub fn parse_line(&mut self, line: &str) -> Option<Sample> {
        if line.trim().is_empty() {
            return self.flush();
        }

        let tokens = tokenize(line);
        if let Some(ts_idx) = timestamp_index(&tokens) {
            let flushed = self.flush();
            match pending_from_header(line, &tokens, ts_idx) {
                Some(pending) => self.pending = Some(pending),
                None => {
                    self.lines_skipped += 1;
                    tracing::debug!("skipping periodless header: {}", line.trim());
                }
            }
            return flushed;
        }

        match self.pending.as_mut() {
            Some(pending) if !pending.located => {
                if let Some((symbol, dso)) = parse_frame(line.trim()) {
                    pending.symbol = symbol;
                    pending.dso = dso;
                    pending.located = true;
                } else {
                    self.lines_skipped += 1;
                    tracing::debug!("skipping unparseable frame: {}", line.trim());
                }
            }
            // Deeper callchain frames: the leaf already attributed this
            // sample.
            Some(_) => {}
            None => {
                self.lines_skipped += 1;
                tracing::debug!("skipping line outside any sample: {}", line.trim());
            }
        }
        None
    }

    /// End-of-input flush: EOF terminates the last sample's block.
    pub fn finish(&mut self) -> Option<Sample> {
        self.flush()
    }

    /// Lines that contributed nothing to any sample.
    pub fn lines_skipped(&self) -> u64 {
        self.lines_skipped
    }

    fn flush(&mut self) -> Option<Sample> {
        self.pending.take().map(|pending| Sample {
            period: pending.period,
            dso: pending.dso,
            symbol: pending.symbol,
        })
    }
}

/// Whitespace-separated tokens with their byte offsets into the line.
fn tokenize(line: &str) -> Vec<(usize, &str)> {
    let bytes = line.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        let start = i;
        while i < bytes.len() && !bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if i > start {
            tokens.push((start, &line[start..i]));
        }
    }
    tokens
}

/// Index of the event timestamp token, the header's anchor: a fractional
/// number terminated by `:` (`171798.123456:`). Frame lines and preamble
/// comments have no such token.
fn timestamp_index(tokens: &[(usize, &str)]) -> Option<usize> {
    tokens.iter().position(|(_, tok)| {
        tok.strip_suffix(':')
            .map_or(false, |ts| ts.contains('.') && ts.parse::<f64>().is_ok())
    })
}

/// Build the pending sample a header line describes.
///
/// The header shape after the timestamp is `<period> <event>:` followed by
/// an optional flat location. Returns `None` when the period count or the
/// event token is missing; such a line still acts as a block boundary but
/// yields no sample.
fn pending_from_header(
    line: &str,
    tokens: &[(usize, &str)],
    ts_idx: usize,
) -> Option<PendingSample> {
    let period: u64 = tokens.get(ts_idx + 1)?.1.parse().ok()?;
    let (event_start, event) = *tokens.get(ts_idx + 2)?;
    // Event names carry modifier suffixes (`cycles:u:`, `cpu-clock:`); the
    // token always ends with the final colon.
    if !event.ends_with(':') {
        return None;
    }

    let mut pending = PendingSample {
        period,
        dso: None,
        symbol: None,
        located: false,
    };
    let location = line[event_start + event.len()..].trim();
    if !location.is_empty() {
        if let Some((symbol, dso)) = parse_frame(location) {
            pending.symbol = symbol;
            pending.dso = dso;
            pending.located = true;
        }
    }
    Some(pending)
}

/// Split one frame (or flat-location remainder) into (symbol, dso).
///
/// Input shape: `<ip> <symbol>[+0x<off>] (<dso>)`, everything after the ip
/// optional. Returns `None` when the leading token is not a plausible
/// instruction pointer. `[unknown]` in either column maps to `None`, the
/// sentinel path.
fn parse_frame(frame: &str) -> Option<(Option<String>, Option<String>)> {
    let (ip, rest) = match frame.split_once(char::is_whitespace) {
        Some((ip, rest)) => (ip, rest),
        None => (frame, ""),
    };
    if !is_ip_token(ip) {
        return None;
    }

    let (symbol_part, dso_raw) = split_trailing_parens(rest.trim());
    let dso = dso_raw.and_then(|d| {
        // Unlinked map files show as `(/tmp/perf-1.map (deleted))`; the
        // region is still attributable.
        let d = d.strip_suffix(" (deleted)").unwrap_or(d).trim();
        if d.is_empty() || d == "[unknown]" {
            None
        } else {
            Some(d.to_string())
        }
    });
    Some((clean_symbol(symbol_part), dso))
}

/// Strip the `+0x<off>` suffix perf appends inside the symbol column and
/// map `[unknown]` to `None`.
fn clean_symbol(raw: &str) -> Option<String> {
    let raw = raw.trim();
    let stripped = match raw.rfind('+') {
        Some(plus) if is_hex_offset(&raw[plus + 1..]) => raw[..plus].trim_end(),
        _ => raw,
    };
    if stripped.is_empty() || stripped == "[unknown]" {
        None
    } else {
        Some(stripped.to_string())
    }
}

fn is_hex_offset(s: &str) -> bool {
    let digits = s.strip_prefix("0x").unwrap_or(s);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_hexdigit())
}

fn is_ip_token(tok: &str) -> bool {
    let digits = tok.strip_prefix("0x").unwrap_or(tok);
    digits.len() >= 4 && digits.chars().all(|c| c.is_ascii_hexdigit())
}

/// Split `sym (dso)` on the trailing parenthesized group, matching parens
/// from the right so C++ signatures like `operator()(int)` stay inside the
/// symbol column.
fn split_trailing_parens(rest: &str) -> (&str, Option<&str>) {
    let rest = rest.trim_end();
    if !rest.ends_with(')') {
        return (rest, None);
    }
    let mut depth = 0usize;
    for (i, b) in rest.bytes().enumerate().rev() {
        match b {
            b')' => depth += 1,
            b'(' => {
                depth -= 1;
                if depth == 0 {
                    return (rest[..i].trim_end(), Some(&rest[i + 1..rest.len() - 1]));
                }
            }
            _ => {}
        }
    }
    (rest, None)
}
