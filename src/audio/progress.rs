use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Elapsed and total time of the loaded clip, written by the progress ticker
/// and read by the transport bar.
#[derive(Default, Debug)]
pub struct TrackProgress {
    current_position_millis: AtomicU64,
    total_duration_millis: AtomicU64,
}

impl TrackProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_current_position(&self, position: Duration) {
        self.current_position_millis
            .store(position.as_millis() as u64, Ordering::Relaxed);
    }

    pub fn set_total_duration(&self, duration: Duration) {
        self.total_duration_millis
            .store(duration.as_millis() as u64, Ordering::Relaxed);
    }

    pub fn get_progress(&self) -> (u64, u64) {
        (
            self.current_position_millis.load(Ordering::Relaxed),
            self.total_duration_millis.load(Ordering::Relaxed),
        )
    }

    pub fn total_duration(&self) -> Duration {
        Duration::from_millis(self.total_duration_millis.load(Ordering::Relaxed))
    }

    /// Played share of the clip in `0.0..=1.0`; zero while the length is unknown.
    pub fn ratio(&self) -> f64 {
        let (current, total) = self.get_progress();
        if total == 0 {
            0.0
        } else {
            (current as f64 / total as f64).min(1.0)
        }
    }

    pub fn reset(&self) {
        self.set_current_position(Duration::ZERO);
        self.set_total_duration(Duration::ZERO);
    }
}
