use core::time::Duration;
use web_time::Instant;

/// Elapsed-time counter that runs at most once per game.
///
/// Nothing ticks in the background: elapsed time is computed from the instants the
/// caller supplies, and reading it never changes the state.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Stopwatch {
    started_at: Option<Instant>,
    stopped_at: Option<Instant>,
}

impl Stopwatch {
    /// Starts the stopwatch; later calls are ignored.
    pub fn start(&mut self, now: Instant) {
        if self.started_at.is_none() {
            self.started_at = Some(now);
        }
    }

    /// Stops a running stopwatch; ignored if it never started or already stopped.
    pub fn stop(&mut self, now: Instant) {
        if self.started_at.is_some() && self.stopped_at.is_none() {
            self.stopped_at = Some(now);
        }
    }

    pub fn is_running(&self) -> bool {
        self.started_at.is_some() && self.stopped_at.is_none()
    }

    pub fn elapsed_at(&self, now: Instant) -> Duration {
        match (self.started_at, self.stopped_at) {
            (None, _) => Duration::ZERO,
            (Some(started_at), Some(stopped_at)) => {
                stopped_at.saturating_duration_since(started_at)
            }
            (Some(started_at), None) => now.saturating_duration_since(started_at),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed_at(Instant::now())
    }
}
