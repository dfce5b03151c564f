//! Time-based progress for a single transition.

use web_time::{Duration, Instant};

use super::easing::Ease;

/// Raw and eased progress sampled at one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TweenFrame {
    /// Linear progress (0.0 to 1.0).
    pub raw_t: f32,
    /// Progress after the ease curve.
    pub eased_t: f32,
}

impl TweenFrame {
    /// Whether the tween has reached its end.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.raw_t >= 1.0
    }
}

/// Progress of a value interpolation over a fixed duration.
///
/// The clock starts on the first [`tick`](Tween::tick), so a tween created
/// between frames does not skip ahead.
#[derive(Debug, Clone)]
pub struct Tween {
    start_time: Option<Instant>,
    duration: Duration,
    ease: Ease,
}

impl Tween {
    /// Tween over `duration` with the given ease.
    #[must_use]
    pub fn new(duration: Duration, ease: Ease) -> Self {
        Self {
            start_time: None,
            duration,
            ease,
        }
    }

    /// Tween over a duration in seconds. Negative or non-finite durations
    /// collapse to zero.
    #[must_use]
    pub fn from_secs(seconds: f32, ease: Ease) -> Self {
        let duration = Duration::try_from_secs_f32(seconds.max(0.0))
            .unwrap_or(Duration::ZERO);
        Self::new(duration, ease)
    }

    /// Create with an explicit start time (for testing).
    #[cfg(test)]
    pub fn with_start_time(start_time: Instant, duration: Duration, ease: Ease) -> Self {
        Self {
            start_time: Some(start_time),
            duration,
            ease,
        }
    }

    /// Total duration.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Whether the clock has started.
    #[must_use]
    pub fn has_started(&self) -> bool {
        self.start_time.is_some()
    }

    /// Sample progress at `now`, starting the clock if this is the first
    /// tick. A zero-length tween completes on its first tick.
    pub fn tick(&mut self, now: Instant) -> TweenFrame {
        let start = *self.start_time.get_or_insert(now);
        let raw_t = if self.duration.is_zero() {
            1.0
        } else {
            let elapsed = now.saturating_duration_since(start);
            (elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
        };
        TweenFrame {
            raw_t,
            eased_t: self.ease.evaluate(raw_t),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_starts_on_first_tick() {
        let t0 = Instant::now();
        let mut tween = Tween::new(Duration::from_secs(1), Ease::NONE);
        assert!(!tween.has_started());
        let first = tween.tick(t0 + Duration::from_secs(5));
        assert_eq!(first.raw_t, 0.0);
        let mid = tween.tick(t0 + Duration::from_millis(5500));
        assert!((mid.raw_t - 0.5).abs() < 1e-4);
    }

    #[test]
    fn progress_is_clamped_and_eased() {
        let t0 = Instant::now();
        let mut tween = Tween::with_start_time(t0, Duration::from_secs(2), Ease::DEFAULT);
        let half = tween.tick(t0 + Duration::from_secs(1));
        assert!((half.raw_t - 0.5).abs() < 1e-4);
        assert!((half.eased_t - 0.75).abs() < 1e-4);
        let done = tween.tick(t0 + Duration::from_secs(9));
        assert!(done.is_complete());
        assert_eq!(done.eased_t, 1.0);
    }

    #[test]
    fn zero_duration_completes_immediately() {
        let mut tween = Tween::from_secs(-3.0, Ease::NONE);
        assert_eq!(tween.duration(), Duration::ZERO);
        assert!(tween.tick(Instant::now()).is_complete());
    }
}
