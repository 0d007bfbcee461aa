//! Phase-scoped progress reporting
//!
//! Generation runs in three phases, each owning a fixed window of the overall
//! percentage. Workers report one increment per finished unit (a grid row, a
//! tile) and the sink receives the phase, the unit counts and the window.

use crate::io::configuration::{AVERAGING_WINDOW, COMPOSING_WINDOW, LOADING_WINDOW};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::LazyLock;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Stage of a generation run
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Per-cell color averaging of the master image
    Averaging,
    /// Resolving, decoding and resizing tiles
    LoadingTiles,
    /// Producing the output image
    Composing,
}

impl Phase {
    /// Percent window `(start, end)` this phase covers
    pub const fn window(self) -> (u8, u8) {
        match self {
            Self::Averaging => AVERAGING_WINDOW,
            Self::LoadingTiles => LOADING_WINDOW,
            Self::Composing => COMPOSING_WINDOW,
        }
    }

    /// Short human readable label
    pub const fn label(self) -> &'static str {
        match self {
            Self::Averaging => "averaging",
            Self::LoadingTiles => "loading tiles",
            Self::Composing => "composing",
        }
    }
}

/// One progress increment as delivered to a sink
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProgressUpdate {
    /// Phase the increment belongs to
    pub phase: Phase,
    /// Units finished so far in this phase, including this one
    pub completed: usize,
    /// Units the phase consists of
    pub total: usize,
}

impl ProgressUpdate {
    /// Percent window of the phase
    pub const fn window(&self) -> (u8, u8) {
        self.phase.window()
    }

    /// Overall percentage reached, scaled into the phase window
    pub fn percent(&self) -> f64 {
        let (start, end) = self.window();
        let span = f64::from(end) - f64::from(start);
        if self.total == 0 {
            return f64::from(end);
        }
        let fraction = (self.completed.min(self.total) as f64) / (self.total as f64);
        span.mul_add(fraction, f64::from(start))
    }
}

/// Receiver of progress increments
///
/// Called from worker threads, possibly concurrently.
pub trait ProgressSink: Send + Sync {
    /// Handle a single increment
    fn report(&self, update: ProgressUpdate);
}

/// Sink that discards every increment
#[derive(Clone, Copy, Debug, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&self, _update: ProgressUpdate) {}
}

/// Shared counter for one phase
///
/// Workers call [`PhaseProgress::increment`] as units complete; the counter is
/// atomic so no worker needs to coordinate with another.
pub struct PhaseProgress<'a> {
    sink: &'a dyn ProgressSink,
    phase: Phase,
    total: usize,
    completed: AtomicUsize,
}

impl<'a> PhaseProgress<'a> {
    /// Start counting a phase of `total` units
    pub fn new(sink: &'a dyn ProgressSink, phase: Phase, total: usize) -> Self {
        Self {
            sink,
            phase,
            total,
            completed: AtomicUsize::new(0),
        }
    }

    /// Record one finished unit
    pub fn increment(&self) {
        let completed = self.completed.fetch_add(1, Ordering::AcqRel) + 1;
        self.sink.report(ProgressUpdate {
            phase: self.phase,
            completed,
            total: self.total,
        });
    }

    /// Units recorded so far
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::Acquire)
    }

    /// Phase being counted
    pub const fn phase(&self) -> Phase {
        self.phase
    }
}

static PROGRESS_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template("[{elapsed_precise}] {msg:>13} [{bar:40.cyan/blue}] {pos:>3}%")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

/// Terminal progress bar spanning all three phases
pub struct TerminalProgress {
    bar: ProgressBar,
}

impl Default for TerminalProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalProgress {
    /// Create a visible progress bar
    pub fn new() -> Self {
        let bar = ProgressBar::new(100);
        bar.set_style(PROGRESS_STYLE.clone());
        Self { bar }
    }

    /// Create a bar that never draws
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    /// Current position in percent
    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    /// Clear the bar from the terminal
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl ProgressSink for TerminalProgress {
    fn report(&self, update: ProgressUpdate) {
        let percent = update.percent().round() as u64;
        // Rows and tiles finish out of order; never move the bar backwards
        if percent > self.bar.position() {
            self.bar.set_position(percent);
        }
        self.bar.set_message(update.phase.label());
    }
}
