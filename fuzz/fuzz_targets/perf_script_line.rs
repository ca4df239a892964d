#![no_main]

use jitsum::perf_script::PerfScriptParser;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        // Feed each line through a fresh parser session. Parsing must never
        // panic, whatever the line shape: truncated headers, stray parens,
        // non-ASCII symbol names, binary garbage.
        let mut parser = PerfScriptParser::new();
        for line in input.lines() {
            let _ = parser.parse_line(line);
        }
        let _ = parser.finish();
    }
});
