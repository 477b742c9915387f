use std::time::Duration;

/// The audio element seen by the transport. Implementations report lifecycle
/// changes (`MetadataLoaded`, `Play`, `Pause`, `Failed`) on the event bus.
pub trait PlaybackControl: Send + Sync {
    /// Replaces the current source. Metadata is reported once the clip is decoded;
    /// playback does not start until `play` is called.
    fn load(&self, url: &str);
    fn play(&self);
    fn pause(&self);
    fn stop(&self);
    fn seek(&self, position: Duration);
    fn set_volume(&self, volume: f32);
    fn position(&self) -> Duration;
    fn is_finished(&self) -> bool;
}
