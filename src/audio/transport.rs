use std::{sync::Arc, time::Duration};

use flume::Sender;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::{
    audio::{
        config::AudioConfig, progress::TrackProgress, state::TransportState,
        traits::PlaybackControl,
    },
    event::events::{AudioEvent, Event},
    model::{track::Track, view::PlayIcon},
};

// Used when the decoder cannot tell the clip length up front.
const PREVIEW_LENGTH: Duration = Duration::from_secs(30);

/// Drives the audio element through `Idle → Loading → Playing ⇄ Paused`.
///
/// Transitions into `Playing` and `Paused` only happen in response to the
/// backend's lifecycle events, so the icons always reflect what the device
/// is actually doing.
pub struct Transport {
    backend: Arc<dyn PlaybackControl>,
    event_tx: Sender<Event>,
    config: AudioConfig,
    state: TransportState,
    source: Option<String>,
    current: Option<Track>,
    autoplay: bool,
    progress: Arc<TrackProgress>,
    ticker: Option<JoinHandle<()>>,
    volume: u8,
    is_muted: bool,
}

impl Transport {
    pub fn new(backend: Arc<dyn PlaybackControl>, event_tx: Sender<Event>, config: AudioConfig) -> Self {
        let transport = Self {
            backend,
            event_tx,
            volume: config.volume.min(100),
            config,
            state: TransportState::Idle,
            source: None,
            current: None,
            autoplay: false,
            progress: Arc::new(TrackProgress::new()),
            ticker: None,
            is_muted: false,
        };
        transport.apply_volume();
        transport
    }

    /// Selects a track for playback. Selecting the track whose clip is already
    /// loaded toggles play/pause instead of reloading it.
    pub fn select(&mut self, track: &Track) {
        let Some(url) = track.preview_url.as_deref() else {
            warn!(track = %track.id, "Track has no preview clip");
            return;
        };

        if self.source.as_deref() == Some(url) {
            self.toggle_play();
            return;
        }

        debug!(track = %track.id, "Loading preview");
        self.stop_ticker();
        self.progress.reset();
        self.source = Some(url.to_string());
        self.current = Some(track.clone());
        self.state = TransportState::Loading;
        self.autoplay = true;
        self.backend.load(url);
    }

    pub fn toggle_play(&mut self) {
        if self.source.is_none() {
            return;
        }

        match self.state {
            TransportState::Playing => self.backend.pause(),
            TransportState::Paused => self.backend.play(),
            TransportState::Loading => self.autoplay = !self.autoplay,
            TransportState::Idle => {}
        }
    }

    pub fn on_audio_event(&mut self, event: &AudioEvent) {
        match event {
            AudioEvent::MetadataLoaded { source, total } => {
                if self.state != TransportState::Loading || !self.is_source(source) {
                    return;
                }
                self.progress
                    .set_total_duration(total.unwrap_or(PREVIEW_LENGTH));
                if self.autoplay {
                    self.backend.play();
                } else {
                    self.state = TransportState::Paused;
                }
            }
            AudioEvent::Play => {
                if self.source.is_none() {
                    return;
                }
                self.state = TransportState::Playing;
                self.start_ticker();
            }
            AudioEvent::Pause => {
                if self.state == TransportState::Playing {
                    self.state = TransportState::Paused;
                }
                self.stop_ticker();
            }
            AudioEvent::Ended => {
                if self.state != TransportState::Playing {
                    return;
                }
                self.state = TransportState::Paused;
                self.stop_ticker();
                self.progress
                    .set_current_position(self.progress.total_duration());
            }
            AudioEvent::Failed { source, reason } => {
                if !self.is_source(source) {
                    debug!(source = %source, "Ignoring failure of a replaced clip");
                    return;
                }
                warn!(source = %source, reason = %reason, "Playback failed");
                self.stop_ticker();
                self.state = TransportState::Idle;
                self.source = None;
                self.autoplay = false;
            }
        }
    }

    fn is_source(&self, url: &str) -> bool {
        self.source.as_deref() == Some(url)
    }

    pub fn stop(&mut self) {
        self.stop_ticker();
        self.backend.stop();
        self.progress.reset();
        self.state = TransportState::Idle;
        self.source = None;
        self.current = None;
        self.autoplay = false;
    }

    pub fn seek(&mut self, position: Duration) {
        if self.source.is_none() || self.state == TransportState::Loading {
            return;
        }

        let total = self.progress.total_duration();
        let position = if total.is_zero() {
            position
        } else {
            position.min(total)
        };
        self.backend.seek(position);
        self.progress.set_current_position(position);
    }

    /// Seeks to the point of a click `offset` cells into a timeline `width` cells wide.
    pub fn seek_to_offset(&mut self, offset: u16, width: u16) {
        if let Some(target) = seek_target(offset, width, self.progress.total_duration()) {
            self.seek(target);
        }
    }

    pub fn seek_forward(&mut self) {
        let (current, _) = self.progress.get_progress();
        let step = Duration::from_secs(self.config.seek_step_secs);
        self.seek(Duration::from_millis(current) + step);
    }

    pub fn seek_backward(&mut self) {
        let (current, _) = self.progress.get_progress();
        let step = Duration::from_secs(self.config.seek_step_secs);
        self.seek(Duration::from_millis(current).saturating_sub(step));
    }

    pub fn set_volume(&mut self, volume: u8) {
        self.volume = volume.min(100);
        self.is_muted = false;
        self.apply_volume();
    }

    pub fn volume_up(&mut self) {
        self.set_volume(self.volume.saturating_add(self.config.volume_step));
    }

    pub fn volume_down(&mut self) {
        self.set_volume(self.volume.saturating_sub(self.config.volume_step));
    }

    pub fn toggle_mute(&mut self) {
        self.is_muted = !self.is_muted;
        self.apply_volume();
    }

    fn apply_volume(&self) {
        let volume = if self.is_muted {
            0.0
        } else {
            self.volume as f32 / 100.0
        };
        self.backend.set_volume(volume);
    }

    fn start_ticker(&mut self) {
        self.stop_ticker();

        let backend = self.backend.clone();
        let progress = self.progress.clone();
        let event_tx = self.event_tx.clone();
        let period = self.config.progress_interval;

        self.ticker = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            loop {
                interval.tick().await;
                progress.set_current_position(backend.position());
                if backend.is_finished() {
                    let _ = event_tx.send(Event::Audio(AudioEvent::Ended));
                    break;
                }
            }
        }));
    }

    fn stop_ticker(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
    }

    pub fn has_ticker(&self) -> bool {
        self.ticker.as_ref().is_some_and(|t| !t.is_finished())
    }

    pub fn state(&self) -> TransportState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == TransportState::Playing
    }

    pub fn play_icon(&self) -> PlayIcon {
        PlayIcon::for_playing(self.is_playing())
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.current.as_ref()
    }

    pub fn current_track_id(&self) -> Option<String> {
        self.current.as_ref().map(|t| t.id.clone())
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn progress(&self) -> &Arc<TrackProgress> {
        &self.progress
    }

    pub fn volume(&self) -> u8 {
        self.volume
    }

    pub fn is_muted(&self) -> bool {
        self.is_muted
    }
}

impl Drop for Transport {
    fn drop(&mut self) {
        self.stop_ticker();
    }
}

pub fn seek_target(offset: u16, width: u16, total: Duration) -> Option<Duration> {
    if width == 0 || total.is_zero() {
        return None;
    }
    let ratio = f64::from(offset.min(width)) / f64::from(width);
    Some(total.mul_f64(ratio))
}
