//! Sample filtering for -e expressions
//!
//! Sprint 3: restrict which samples enter the aggregation
//! Supports:
//! - Exact symbol names: -e symbol=iseq_foo,iseq_bar
//! - Regex patterns: -e symbol=/^iseq_/
//! - Module origin: -e dso=ruby or -e dso=/\.so(\.|$)/
//!
//! Filtering happens before `record`, so the aggregate invariants hold on
//! the restricted stream exactly as they do on the full one.

use regex::Regex;
use std::collections::HashSet;
use thiserror::Error;

use crate::sample::Sample;

/// Errors surfaced while parsing a -e expression at startup.
#[derive(Error, Debug)]
pub enum FilterError {
    #[error("invalid filter expression: {0}. Expected format: symbol=SPEC or dso=SPEC")]
    MissingKey(String),

    #[error("unknown filter key: {0}. Expected symbol or dso")]
    UnknownKey(String),

    #[error("unterminated regex in filter specification: {0}")]
    UnterminatedRegex(String),

    #[error("invalid regex in filter specification: {0}")]
    BadRegex(#[from] regex::Error),
}

/// One matcher: everything, a name set, or a regex.
#[derive(Debug, Clone)]
enum Matcher {
    Any,
    Names(HashSet<String>),
    Pattern(Regex),
}

impl Matcher {
    /// Parse the part after `key=`: `/regex/` or a comma-separated name list.
    fn from_spec(spec: &str) -> Result<Self, FilterError> {
        if let Some(body) = spec.strip_prefix('/') {
            let pattern = body
                .strip_suffix('/')
                .ok_or_else(|| FilterError::UnterminatedRegex(spec.to_string()))?;
            return Ok(Self::Pattern(Regex::new(pattern)?));
        }

        let names: HashSet<String> = spec
            .split(',')
            .map(|part| part.trim())
            .filter(|part| !part.is_empty())
            .map(|part| part.to_string())
            .collect();
        Ok(Self::Names(names))
    }

    fn matches(&self, value: &str) -> bool {
        match self {
            Self::Any => true,
            Self::Names(names) => names.contains(value),
            Self::Pattern(re) => re.is_match(value),
        }
    }
}

/// Determines which samples are recorded by the aggregator.
#[derive(Debug, Clone)]
pub struct SampleFilter {
    symbol: Matcher,
    dso: Matcher,
}

impl SampleFilter {
    /// A filter that records every sample.
    pub fn all() -> Self {
        Self {
            symbol: Matcher::Any,
            dso: Matcher::Any,
        }
    }

    /// Parse a filter expression like "symbol=foo,bar" or "dso=/\.map$/".
    pub fn from_expr(expr: &str) -> Result<Self, FilterError> {
        let (key, spec) = expr
            .split_once('=')
            .ok_or_else(|| FilterError::MissingKey(expr.to_string()))?;

        let mut filter = Self::all();
        match key.trim() {
            "symbol" => filter.symbol = Matcher::from_spec(spec)?,
            "dso" => filter.dso = Matcher::from_spec(spec)?,
            other => return Err(FilterError::UnknownKey(other.to_string())),
        }
        Ok(filter)
    }

    /// Check whether a sample should be recorded. Matching is applied to the
    /// sentinel-substituted values, so `-e symbol=[unknown]` selects exactly
    /// the unresolved samples.
    pub fn should_record(&self, sample: &Sample) -> bool {
        self.symbol.matches(sample.symbol_name()) && self.dso.matches(sample.module_origin())
    }
}
