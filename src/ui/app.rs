use std::{sync::Arc, time::Duration};

use flume::{Receiver, Sender};
use ratatui::Frame;
use tracing::{error, info, warn};

use crate::{
    audio::{
        commands::AudioCommand,
        playback::{PlaybackEngine, SilentBackend},
        system::AudioSystem,
        traits::PlaybackControl,
    },
    auth::{self, AuthError, RedirectOutcome},
    config::{AuthConfig, Config},
    event::events::Event,
    http::ApiService,
    model::view::{ProfileView, user_playlist_entries},
    storage::Storage,
    util::task::TaskManager,
};

use super::{
    context::AppContext,
    layout::AppLayout,
    message::AppMessage,
    router::{Router, Section},
    state::{AppState, Screen},
    tui::{self, TerminalEvent},
    util::{handler::EventHandler, report_fetch_error},
    views::Login,
};

const AUTHORIZATION_TIMEOUT: Duration = Duration::from_secs(120);

pub struct App {
    pub event_rx: Receiver<Event>,
    pub ctx: AppContext,
    pub state: AppState,
    pub router: Router,
    pub login: Login,
    pub task_manager: TaskManager,
    pub has_focus: bool,
    pub should_quit: bool,
    // Keeps the output device open for as long as the app runs.
    _engine: Option<PlaybackEngine>,
}

/// The audio device, if one could be opened, and the backend driving it.
type AudioOutput = (Option<PlaybackEngine>, Arc<dyn PlaybackControl>);

fn open_output(http: reqwest::Client, event_tx: Sender<Event>) -> AudioOutput {
    match PlaybackEngine::new() {
        Ok(engine) => {
            let backend: Arc<dyn PlaybackControl> = Arc::new(engine.backend(http, event_tx));
            (Some(engine), backend)
        }
        Err(e) => {
            warn!(error = %e, "No audio output, previews are disabled");
            let backend: Arc<dyn PlaybackControl> = Arc::new(SilentBackend::new(event_tx));
            (None, backend)
        }
    }
}

impl App {
    pub fn new(config: Config) -> color_eyre::Result<Self> {
        Self::with_output(config, open_output)
    }

    /// Builds the app around an existing backend instead of the output device.
    pub fn with_backend(
        config: Config,
        backend: Arc<dyn PlaybackControl>,
    ) -> color_eyre::Result<Self> {
        Self::with_output(config, |_, _| (None, backend))
    }

    fn with_output<F>(config: Config, output: F) -> color_eyre::Result<Self>
    where
        F: FnOnce(reqwest::Client, Sender<Event>) -> AudioOutput,
    {
        let (event_tx, event_rx) = flume::unbounded();
        let storage = Arc::new(Storage::open(&config.data_dir)?);
        let api = Arc::new(ApiService::new(config.api_base.clone())?);

        let (engine, backend) = output(api.http(), event_tx.clone());
        let audio_system = AudioSystem::new(
            backend,
            event_tx.clone(),
            storage.clone(),
            config.audio.clone(),
        );

        info!(storage = %storage.path().display(), "Starting");

        Ok(Self {
            event_rx,
            ctx: AppContext {
                api,
                storage,
                audio_system,
                event_tx,
                config: Arc::new(config),
            },
            state: AppState::default(),
            router: Router::new(),
            login: Login::default(),
            task_manager: TaskManager::new(),
            has_focus: true,
            should_quit: false,
            _engine: engine,
        })
    }

    pub async fn run(&mut self) -> color_eyre::Result<()> {
        let mut tui = tui::Tui::new()?.mouse(true);
        tui.enter()?;

        EventHandler::handle_event(self, TerminalEvent::Init, &mut tui).await?;
        while !self.should_quit {
            tui.draw(|f| {
                self.ui(f);
            })?;

            EventHandler::handle_events(self, &mut tui).await?;
        }

        self.task_manager.abort_all();
        tui.exit()?;
        Ok(())
    }

    fn ui(&mut self, frame: &mut Frame) {
        if self.has_focus {
            let area = frame.area();
            AppLayout::new(self).render(frame, area);
        }
    }

    /// Skips the login screen when a token is already persisted.
    pub async fn restore_session(&mut self) {
        match auth::load_session(&self.ctx.storage) {
            Some(session) => {
                info!("Resuming stored session");
                self.ctx.api.set_session(&session);
                self.start_session().await;
            }
            None => self.state.ui.screen = Screen::Login,
        }
    }

    pub async fn start_session(&mut self) {
        self.state.ui.screen = Screen::Player;
        self.state.ui.status = None;
        self.login.reset(None);
        self.fetch_account();

        self.router.reset();
        self.router.navigate_to(Section::Dashboard, &self.ctx).await;
    }

    /// Profile and the sidebar playlists are fetched once per session.
    fn fetch_account(&mut self) {
        let api = self.ctx.api.clone();
        let tx = self.ctx.event_tx.clone();
        self.task_manager.spawn(
            "profile",
            tokio::spawn(async move {
                match api.fetch_user_profile().await {
                    Ok(profile) => {
                        let _ = tx.send(Event::ProfileFetched(ProfileView::from_api(&profile)));
                    }
                    Err(e) => report_fetch_error(&tx, "profile", e),
                }
            }),
        );

        let api = self.ctx.api.clone();
        let tx = self.ctx.event_tx.clone();
        self.task_manager.spawn(
            "user_playlists",
            tokio::spawn(async move {
                match api.fetch_user_playlists().await {
                    Ok(page) => {
                        let _ = tx.send(Event::UserPlaylistsFetched(user_playlist_entries(&page)));
                    }
                    Err(e) => report_fetch_error(&tx, "your playlists", e),
                }
            }),
        );
    }

    pub fn begin_login(&mut self) {
        if self.login.is_waiting() || self.task_manager.is_running("authorize") {
            return;
        }
        self.login.begin();

        let config = self.ctx.config.auth.clone();
        let tx = self.ctx.event_tx.clone();
        self.task_manager.spawn(
            "authorize",
            tokio::spawn(async move {
                match authorize(&config, &tx).await {
                    Ok(outcome) => {
                        let _ = tx.send(Event::AuthRedirect(outcome));
                    }
                    Err(e) => {
                        warn!(error = %e, "Authorization failed");
                        let _ = tx.send(Event::AuthFailed(e.to_string()));
                    }
                }
            }),
        );
    }

    pub async fn complete_login(&mut self, outcome: RedirectOutcome) {
        match auth::complete_authorization(&self.ctx.storage, &outcome) {
            Ok(Some(session)) => {
                self.ctx.api.set_session(&session);
                self.start_session().await;
            }
            Ok(None) => self.login.reset(None),
            Err(e) => {
                error!(error = %e, "Could not persist session");
                self.login.fail(e.to_string());
            }
        }
    }

    /// Clears the persisted session and returns to the login screen.
    pub fn logout(&mut self, notice: Option<String>) {
        if let Err(e) = auth::logout(&self.ctx.storage) {
            error!(error = %e, "Could not clear session");
        }
        self.ctx.api.clear_session();
        self.ctx.audio_system.handle_command(AudioCommand::Stop);
        self.task_manager.abort_all();
        self.router.reset();
        self.state = AppState::default();
        self.login.reset(notice);
    }

    pub async fn update(&mut self, msg: AppMessage) {
        match msg {
            AppMessage::Quit => self.should_quit = true,
            AppMessage::TogglePlayPause => self.audio(AudioCommand::TogglePlay),
            AppMessage::NextTrack => self.audio(AudioCommand::Next),
            AppMessage::PreviousTrack => self.audio(AudioCommand::Previous),
            AppMessage::VolumeUp => self.audio(AudioCommand::VolumeUp),
            AppMessage::VolumeDown => self.audio(AudioCommand::VolumeDown),
            AppMessage::SeekForward => self.audio(AudioCommand::SeekForward),
            AppMessage::SeekBackward => self.audio(AudioCommand::SeekBackward),
            AppMessage::ToggleMute => self.audio(AudioCommand::ToggleMute),
            AppMessage::GoBack => {
                self.router.back(&self.ctx).await;
            }
            AppMessage::GoForward => {
                self.router.forward(&self.ctx).await;
            }
            AppMessage::GoHome => {
                if self.router.current_section() != Some(&Section::Dashboard) {
                    self.router.navigate_to(Section::Dashboard, &self.ctx).await;
                }
            }
            AppMessage::ToggleFocus => self.state.ui.focus = self.state.ui.focus.toggle(),
            AppMessage::ToggleProfileMenu => {
                self.state.ui.profile_menu_open = !self.state.ui.profile_menu_open
            }
            AppMessage::Logout => self.logout(None),
        }
    }

    pub fn audio(&mut self, command: AudioCommand) {
        self.ctx.audio_system.handle_command(command);
    }
}

async fn authorize(config: &AuthConfig, tx: &Sender<Event>) -> Result<RedirectOutcome, AuthError> {
    let (url, listener) = auth::begin_authorization(config).await?;
    let _ = tx.send(Event::AuthStarted(url.to_string()));
    listener.wait(AUTHORIZATION_TIMEOUT).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        audio::testing::FakeBackend,
        auth::Session,
        storage::{ACCESS_TOKEN, EXPIRES_IN, TOKEN_TYPE},
    };

    fn app(dir: &std::path::Path) -> App {
        let data_dir = dir.to_string_lossy().into_owned();
        let config = Config::from_lookup(|key| match key {
            // Nothing listens here, so session fetches fail fast.
            "SPOTIFY_API_BASE" => Some("http://127.0.0.1:9/v1/".to_string()),
            "SPOTLITE_DATA_DIR" => Some(data_dir.clone()),
            _ => None,
        })
        .unwrap();
        App::with_backend(config, Arc::new(FakeBackend::default())).unwrap()
    }

    #[tokio::test]
    async fn authorized_redirect_opens_the_dashboard() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path());
        assert_eq!(app.state.ui.screen, Screen::Login);

        app.complete_login(RedirectOutcome::Authorized(Session {
            access_token: "tok".to_string(),
            token_type: "Bearer".to_string(),
            expires_in: 3600,
        }))
        .await;

        assert_eq!(app.state.ui.screen, Screen::Player);
        assert_eq!(app.router.current_section(), Some(&Section::Dashboard));
        assert_eq!(app.router.active_section(), Some(Section::Dashboard));
        assert_eq!(app.ctx.storage.get_item(ACCESS_TOKEN).as_deref(), Some("tok"));
    }

    #[tokio::test]
    async fn denied_redirect_stays_on_login() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path());

        app.complete_login(RedirectOutcome::Denied {
            error: Some("access_denied".to_string()),
        })
        .await;

        assert_eq!(app.state.ui.screen, Screen::Login);
        assert!(!app.login.is_waiting());
        assert_eq!(app.router.current_section(), None);
        for key in [ACCESS_TOKEN, TOKEN_TYPE, EXPIRES_IN] {
            assert_eq!(app.ctx.storage.get_item(key), None);
        }
    }

    #[tokio::test]
    async fn stored_session_skips_login_and_logout_returns_to_it() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path());
        app.ctx.storage.set_item(ACCESS_TOKEN, "tok").unwrap();

        app.restore_session().await;
        assert_eq!(app.state.ui.screen, Screen::Player);
        assert_eq!(app.router.current_section(), Some(&Section::Dashboard));

        app.logout(None);
        assert_eq!(app.state.ui.screen, Screen::Login);
        assert_eq!(app.ctx.storage.get_item(ACCESS_TOKEN), None);
        assert!(app.router.history().is_empty());
    }
}
