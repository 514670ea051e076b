use std::path::PathBuf;
use tracing::warn;

/// Hard ceiling for the preview budget, in bytes
pub const MAX_CONTENT_SIZE: usize = 10 * 1024;

/// Largest single read a preview performs
pub const PER_READ_CHUNK_SIZE: usize = 100;

/// Preview budget used when `--size` is not given
pub const DEFAULT_CONTENT_SIZE: usize = 1024;

/// Settings for the content preview of written files
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewConfig {
    /// Whether write events trigger a preview at all
    pub enabled: bool,

    /// Maximum number of bytes rendered before truncating (may overshoot by one chunk)
    pub byte_budget: usize,

    /// Upper bound for a single read
    pub chunk_size: usize,
}

impl PreviewConfig {
    /// Build a preview config, clamping `byte_budget` to [`MAX_CONTENT_SIZE`].
    ///
    /// An oversized budget is never rejected; it is lowered and a warning is logged.
    pub fn new(enabled: bool, byte_budget: usize) -> Self {
        Self {
            enabled,
            byte_budget: clamp_budget(byte_budget),
            chunk_size: PER_READ_CHUNK_SIZE,
        }
    }

    /// Size of every read for one preview: never above the budget or the chunk ceiling
    pub fn read_size(&self) -> usize {
        self.chunk_size.min(self.byte_budget)
    }
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            byte_budget: DEFAULT_CONTENT_SIZE,
            chunk_size: PER_READ_CHUNK_SIZE,
        }
    }
}

/// How much the process logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    Quiet,
    #[default]
    Normal,
    Verbose,
}

impl Verbosity {
    pub fn from_flags(verbose: bool, quiet: bool) -> Self {
        match (verbose, quiet) {
            (true, _) => Verbosity::Verbose,
            (false, true) => Verbosity::Quiet,
            (false, false) => Verbosity::Normal,
        }
    }

    /// Default `EnvFilter` directive when `RUST_LOG` is unset
    pub fn filter_directive(&self) -> &'static str {
        match self {
            Verbosity::Quiet => "fspeek=warn",
            Verbosity::Normal => "fspeek=info",
            Verbosity::Verbose => "fspeek=debug",
        }
    }
}

/// Startup configuration, built once and handed to the dispatcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchConfig {
    /// The single path under observation
    pub target: PathBuf,

    pub preview: PreviewConfig,

    pub verbosity: Verbosity,
}

impl WatchConfig {
    pub fn new(target: impl Into<PathBuf>, preview: PreviewConfig) -> Self {
        Self {
            target: target.into(),
            preview,
            verbosity: Verbosity::default(),
        }
    }

    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }
}

fn clamp_budget(requested: usize) -> usize {
    if requested > MAX_CONTENT_SIZE {
        warn!(
            requested,
            max = MAX_CONTENT_SIZE,
            "content size exceeds the maximum, using {} bytes",
            MAX_CONTENT_SIZE
        );
        MAX_CONTENT_SIZE
    } else {
        requested
    }
}
