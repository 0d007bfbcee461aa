//! Log subscriber setup for the command-line front end
//!
//! The library only emits `tracing` events; installing a subscriber is left
//! to the binary.

use tracing_subscriber::EnvFilter;

/// How chatty the front end should be
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Verbosity {
    /// Errors only
    Quiet,
    /// Warnings and errors, including dropped tiles
    #[default]
    Normal,
    /// Phase timings and pool details
    Verbose,
}

impl Verbosity {
    /// Pick a verbosity from the CLI flags; quiet wins over verbose
    pub const fn from_flags(quiet: bool, verbose: bool) -> Self {
        if quiet {
            Self::Quiet
        } else if verbose {
            Self::Verbose
        } else {
            Self::Normal
        }
    }

    /// Filter directive used when `RUST_LOG` is not set
    pub const fn default_directive(self) -> &'static str {
        match self {
            Self::Quiet => "error",
            Self::Normal => "warn",
            Self::Verbose => "debug",
        }
    }
}

/// Build the filter, honoring `RUST_LOG` when present
pub fn build_filter(verbosity: Verbosity) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.default_directive()))
}

/// Install a stderr formatter
///
/// Returns `false` if a global subscriber was already installed.
pub fn init_logging(verbosity: Verbosity) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(build_filter(verbosity))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .is_ok()
}
