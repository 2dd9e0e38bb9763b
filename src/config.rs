// --- Logging ---
/// Filter used by the binary when `RUST_LOG` is not set.
pub const DEFAULT_LOG_FILTER: &str = "info";

// --- Diagnostics ---
/// Number of offending indices reported in data-loss errors.
pub const ERROR_SAMPLE_SIZE: usize = 8;

/// Options controlling a `Builder` run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuilderOptions {
    /// Verify, before merging, that the base partitions own every point and
    /// every extremum. A failed check aborts the build.
    pub check_points: bool,
}

impl Default for BuilderOptions {
    fn default() -> Self {
        BuilderOptions { check_points: true }
    }
}
