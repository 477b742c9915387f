use std::sync::Arc;

use flume::Sender;
use tracing::{debug, warn};

use crate::{
    audio::{
        commands::AudioCommand,
        config::AudioConfig,
        queue::{Step, adjacent},
        traits::PlaybackControl,
        transport::Transport,
    },
    event::events::{AudioEvent, Event},
    model::track::Track,
    storage::{LOADED_TRACKS, Storage},
};

/// Entry point for everything audio: commands from the UI and lifecycle events
/// from the backend both land here.
pub struct AudioSystem {
    transport: Transport,
    storage: Arc<Storage>,
}

impl AudioSystem {
    pub fn new(
        backend: Arc<dyn PlaybackControl>,
        event_tx: Sender<Event>,
        storage: Arc<Storage>,
        config: AudioConfig,
    ) -> Self {
        Self {
            transport: Transport::new(backend, event_tx, config),
            storage,
        }
    }

    pub fn handle_command(&mut self, command: AudioCommand) {
        debug!(?command, "Audio command");
        match command {
            AudioCommand::PlayTrack(track) => self.transport.select(&track),
            AudioCommand::TogglePlay => self.transport.toggle_play(),
            AudioCommand::Next => self.play_adjacent(Step::Next),
            AudioCommand::Previous => self.play_adjacent(Step::Previous),
            AudioCommand::Stop => self.transport.stop(),
            AudioCommand::Seek(position) => self.transport.seek(position),
            AudioCommand::SeekToOffset { offset, width } => {
                self.transport.seek_to_offset(offset, width)
            }
            AudioCommand::SeekForward => self.transport.seek_forward(),
            AudioCommand::SeekBackward => self.transport.seek_backward(),
            AudioCommand::SetVolume(volume) => self.transport.set_volume(volume),
            AudioCommand::VolumeUp => self.transport.volume_up(),
            AudioCommand::VolumeDown => self.transport.volume_down(),
            AudioCommand::ToggleMute => self.transport.toggle_mute(),
        }
    }

    pub fn on_audio_event(&mut self, event: &AudioEvent) {
        self.transport.on_audio_event(event);
    }

    /// Prev/next resolve against the last loaded track list, not whatever the
    /// content pane shows right now.
    fn play_adjacent(&mut self, step: Step) {
        let Some(current_id) = self.transport.current_track_id() else {
            return;
        };

        let tracks: Vec<Track> = match self.storage.get_json(LOADED_TRACKS) {
            Ok(Some(tracks)) => tracks,
            Ok(None) => return,
            Err(e) => {
                warn!(error = %e, "Stored track list is unreadable");
                return;
            }
        };

        if let Some(track) = adjacent(&tracks, &current_id, step) {
            self.transport.select(track);
        }
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.transport.current_track()
    }

    pub fn is_playing(&self) -> bool {
        self.transport.is_playing()
    }
}
