use std::{
    io::Cursor,
    sync::{Arc, Mutex},
    time::Duration,
};

use flume::Sender;
use rodio::{Decoder, OutputStream, Sink, Source};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::{
    audio::{error::AudioError, traits::PlaybackControl, util::construct_sink},
    event::events::{AudioEvent, Event},
};

type Clip = Arc<[u8]>;

/// A downloaded clip and the URL it came from.
type LoadedClip = (String, Clip);

/// Owns the output device. Must outlive every `SinkBackend` it hands out.
pub struct PlaybackEngine {
    _stream: OutputStream,
    sink: Arc<Sink>,
}

impl PlaybackEngine {
    pub fn new() -> Result<Self, AudioError> {
        let (stream, sink) = construct_sink()?;

        Ok(Self {
            _stream: stream,
            sink: Arc::new(sink),
        })
    }

    pub fn backend(&self, http: reqwest::Client, event_tx: Sender<Event>) -> SinkBackend {
        SinkBackend {
            sink: self.sink.clone(),
            http,
            event_tx,
            clip: Arc::new(Mutex::new(None)),
            load_task: Mutex::new(None),
        }
    }
}

/// Preview clips are short, so each one is downloaded whole and decoded from
/// memory. The bytes are kept so a finished clip can be replayed without a
/// second download.
pub struct SinkBackend {
    sink: Arc<Sink>,
    http: reqwest::Client,
    event_tx: Sender<Event>,
    clip: Arc<Mutex<Option<LoadedClip>>>,
    load_task: Mutex<Option<JoinHandle<()>>>,
}

impl SinkBackend {
    fn emit(&self, event: AudioEvent) {
        let _ = self.event_tx.send(Event::Audio(event));
    }

    fn abort_load(&self) {
        if let Some(task) = self.load_task.lock().unwrap_or_else(|e| e.into_inner()).take() {
            task.abort();
        }
    }
}

async fn fetch_clip(http: &reqwest::Client, url: &str) -> Result<Clip, AudioError> {
    let response = http.get(url).send().await?;
    if !response.status().is_success() {
        return Err(AudioError::HttpStatus(response.status().as_u16()));
    }
    Ok(Arc::from(response.bytes().await?.as_ref()))
}

fn decode(clip: &Clip) -> Result<Decoder<Cursor<Clip>>, AudioError> {
    Ok(Decoder::new(Cursor::new(clip.clone()))?)
}

impl PlaybackControl for SinkBackend {
    fn load(&self, url: &str) {
        self.abort_load();
        self.sink.clear();
        *self.clip.lock().unwrap_or_else(|e| e.into_inner()) = None;

        let sink = self.sink.clone();
        let http = self.http.clone();
        let event_tx = self.event_tx.clone();
        let clip_slot = self.clip.clone();
        let url = url.to_string();

        let task = tokio::spawn(async move {
            let loaded = fetch_clip(&http, &url)
                .await
                .and_then(|clip| decode(&clip).map(|source| (clip, source)));

            match loaded {
                Ok((clip, source)) => {
                    let total = source.total_duration();
                    debug!(url = %url, total = ?total, "Preview decoded");
                    *clip_slot.lock().unwrap_or_else(|e| e.into_inner()) =
                        Some((url.clone(), clip));
                    sink.append(source);
                    let _ = event_tx.send(Event::Audio(AudioEvent::MetadataLoaded {
                        source: url,
                        total,
                    }));
                }
                Err(e) => {
                    warn!(url = %url, error = %e, "Preview failed to load");
                    let _ = event_tx.send(Event::Audio(AudioEvent::Failed {
                        source: url,
                        reason: e.to_string(),
                    }));
                }
            }
        });

        *self.load_task.lock().unwrap_or_else(|e| e.into_inner()) = Some(task);
    }

    fn play(&self) {
        if self.sink.empty() {
            let clip = self.clip.lock().unwrap_or_else(|e| e.into_inner()).clone();
            let Some((url, clip)) = clip else {
                return;
            };
            match decode(&clip) {
                Ok(source) => self.sink.append(source),
                Err(e) => {
                    self.emit(AudioEvent::Failed {
                        source: url,
                        reason: e.to_string(),
                    });
                    return;
                }
            }
        }
        self.sink.play();
        self.emit(AudioEvent::Play);
    }

    fn pause(&self) {
        self.sink.pause();
        self.emit(AudioEvent::Pause);
    }

    fn stop(&self) {
        self.abort_load();
        self.sink.clear();
        *self.clip.lock().unwrap_or_else(|e| e.into_inner()) = None;
    }

    fn seek(&self, position: Duration) {
        if let Err(e) = self.sink.try_seek(position) {
            warn!(error = %e, "Seek failed");
        }
    }

    fn set_volume(&self, volume: f32) {
        self.sink.set_volume(volume);
    }

    fn position(&self) -> Duration {
        self.sink.get_pos()
    }

    fn is_finished(&self) -> bool {
        self.sink.empty()
    }
}

/// Stands in for the sink when no output device could be opened. Browsing
/// keeps working; every clip fails to load.
pub struct SilentBackend {
    event_tx: Sender<Event>,
}

impl SilentBackend {
    pub fn new(event_tx: Sender<Event>) -> Self {
        Self { event_tx }
    }
}

impl PlaybackControl for SilentBackend {
    fn load(&self, url: &str) {
        let _ = self.event_tx.send(Event::Audio(AudioEvent::Failed {
            source: url.to_string(),
            reason: "no audio output device".to_string(),
        }));
    }

    fn play(&self) {}

    fn pause(&self) {}

    fn stop(&self) {}

    fn seek(&self, _position: Duration) {}

    fn set_volume(&self, _volume: f32) {}

    fn position(&self) -> Duration {
        Duration::ZERO
    }

    fn is_finished(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn silent_backend_fails_every_clip() {
        let (tx, rx) = flume::unbounded();
        let backend = SilentBackend::new(tx);

        backend.load("https://p/a.mp3");
        backend.play();

        match rx.try_recv().unwrap() {
            Event::Audio(AudioEvent::Failed { source, .. }) => assert_eq!(source, "https://p/a.mp3"),
            other => panic!("unexpected event: {other:?}"),
        }
        assert!(rx.try_recv().is_err());
    }
}
