//! Compiled-region classification for sampled module origins
//!
//! Sprint 1: suffix heuristic behind the `--jit-suffix` flag

/// Default module-name suffix marking JIT code regions.
///
/// Instrumented runtimes advertise dynamically generated code to perf
/// through synthetic per-process map files (`/tmp/perf-<pid>.map`), so a
/// sample landing in JITed code carries a module origin ending in "map".
pub const DEFAULT_JIT_SUFFIX: &str = "map";

/// Classifies a sample's module origin as JIT-compiled or regular code.
///
/// The suffix is configurable because the "ends with map" convention is a
/// heuristic: a shared object whose name happens to end in the suffix would
/// be misclassified, and runtimes with different map-file naming need a
/// different suffix.
#[derive(Debug, Clone)]
pub struct RegionClassifier {
    suffix: String,
}

impl RegionClassifier {
    /// Create a classifier matching module names ending in `suffix`.
    pub fn new(suffix: impl Into<String>) -> Self {
        Self {
            suffix: suffix.into(),
        }
    }

    /// The configured suffix.
    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// True if `module` names a JIT code region.
    pub fn is_compiled_region(&self, module: &str) -> bool {
        module.ends_with(&self.suffix)
    }
}

impl Default for RegionClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_JIT_SUFFIX)
    }
}
