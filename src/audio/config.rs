use std::time::Duration;

#[derive(Debug, Clone)]
pub struct AudioConfig {
    pub volume: u8,
    pub volume_step: u8,
    pub seek_step_secs: u64,
    pub progress_interval: Duration,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            volume: 100,
            volume_step: 5,
            seek_step_secs: 5,
            progress_interval: Duration::from_millis(100),
        }
    }
}
