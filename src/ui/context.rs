use std::sync::Arc;

use flume::Sender;

use crate::{
    audio::system::AudioSystem, config::Config, event::events::Event, http::ApiService,
    storage::Storage,
};

/// Everything a view may touch, passed explicitly instead of living in globals.
pub struct AppContext {
    pub api: Arc<ApiService>,
    pub storage: Arc<Storage>,
    pub audio_system: AudioSystem,
    pub event_tx: Sender<Event>,
    pub config: Arc<Config>,
}
