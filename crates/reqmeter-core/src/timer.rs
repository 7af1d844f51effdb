//! Single-use stop capability for the latency histogram.

use std::fmt;
use std::time::{Duration, Instant};

use prometheus::Histogram;

/// Started timer bound to one histogram series.
///
/// `stop` consumes the timer, so a request records at most one observation.
/// A timer that is dropped without `stop` (the request future was cancelled)
/// records nothing.
#[must_use = "a timer records nothing until stop() is called"]
pub struct StopTimer {
    series: Option<Histogram>,
    start: Instant,
}

impl StopTimer {
    /// Start timing. `series` is `None` when the registry could not resolve
    /// the label set; elapsed time is still measured but not recorded.
    pub fn start(series: Option<Histogram>) -> Self {
        Self {
            series,
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Record elapsed seconds into the bound series and return them.
    pub fn stop(self) -> f64 {
        let secs = self.start.elapsed().as_secs_f64();
        if let Some(series) = &self.series {
            series.observe(secs);
        }
        secs
    }
}

impl fmt::Debug for StopTimer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StopTimer")
            .field("bound", &self.series.is_some())
            .field("elapsed", &self.elapsed())
            .finish()
    }
}
