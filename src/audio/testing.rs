use std::{
    sync::{
        Mutex,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use crate::{audio::traits::PlaybackControl, model::track::Track};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Load(String),
    Play,
    Pause,
    Stop,
    Seek(Duration),
    Volume(f32),
}

/// Records every call instead of touching an output device.
#[derive(Default)]
pub struct FakeBackend {
    calls: Mutex<Vec<Call>>,
    position: Mutex<Duration>,
    finished: AtomicBool,
}

impl FakeBackend {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn loads(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Load(url) => Some(url),
                _ => None,
            })
            .collect()
    }

    pub fn set_position(&self, position: Duration) {
        *self.position.lock().unwrap() = position;
    }

    pub fn set_finished(&self, finished: bool) {
        self.finished.store(finished, Ordering::SeqCst);
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

impl PlaybackControl for FakeBackend {
    fn load(&self, url: &str) {
        self.record(Call::Load(url.to_string()));
    }

    fn play(&self) {
        self.record(Call::Play);
    }

    fn pause(&self) {
        self.record(Call::Pause);
    }

    fn stop(&self) {
        self.record(Call::Stop);
    }

    fn seek(&self, position: Duration) {
        self.record(Call::Seek(position));
    }

    fn set_volume(&self, volume: f32) {
        self.record(Call::Volume(volume));
    }

    fn position(&self) -> Duration {
        *self.position.lock().unwrap()
    }

    fn is_finished(&self) -> bool {
        self.finished.load(Ordering::SeqCst)
    }
}

pub fn track(id: &str) -> Track {
    Track {
        id: id.to_string(),
        name: format!("Song {id}"),
        artist_names: "Artist".to_string(),
        album_name: "Album".to_string(),
        duration_ms: 180_000,
        preview_url: Some(format!("https://p/{id}.mp3")),
        image_url: None,
    }
}
