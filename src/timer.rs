//! Wall-clock stopwatch for a single measurement trial.

use std::time::Instant;

/// Monotonic stopwatch: one `start()`/`stop()` pair per trial.
#[derive(Debug, Clone, Copy)]
pub struct Timer {
    started: Instant,
}

impl Timer {
    /// Start timing now.
    #[must_use]
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    /// Seconds elapsed since [`Timer::start`].
    #[must_use]
    pub fn stop(self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }
}

/// Run `f` once and return `(elapsed_seconds, value)`.
pub fn time<T>(f: impl FnOnce() -> T) -> (f64, T) {
    let timer = Timer::start();
    let value = f();
    (timer.stop(), value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_elapsed_non_negative() {
        let t = Timer::start();
        assert!(t.stop() >= 0.0);
    }

    #[test]
    fn test_measures_sleep() {
        let (elapsed, ()) = time(|| std::thread::sleep(Duration::from_millis(5)));
        assert!(elapsed >= 0.005, "elapsed {elapsed}");
    }

    #[test]
    fn test_distinguishes_short_intervals() {
        let (elapsed, sum) = time(|| (0..100u64).sum::<u64>());
        assert_eq!(sum, 4950);
        assert!(elapsed < 1.0, "trivial work took {elapsed}s");
    }
}
