use ratatui::{
    crossterm::event::{
        KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    layout::{Position, Rect},
};
use tracing::{info, warn};

use crate::{
    audio::commands::AudioCommand,
    event::events::Event,
    ui::{
        app::App,
        components::sidebar::Sidebar,
        input::InputHandler,
        message::AppMessage,
        router::Section,
        state::{Focus, Screen},
        traits::Action,
        tui::{TerminalEvent, Tui},
    },
};

// Rows moved per wheel notch over the content pane.
const SCROLL_STEP: i32 = 2;

pub struct EventHandler;

impl EventHandler {
    pub async fn handle_events(app: &mut App, tui: &mut Tui) -> color_eyre::Result<bool> {
        let mut should_render = false;
        if let Some(evt) = tui.next().await {
            if Self::handle_event(app, evt, tui).await? {
                should_render = true;
            }
        }

        while let Ok(evt) = app.event_rx.try_recv() {
            Self::handle_action(app, evt).await;
            should_render = true;
        }

        Ok(should_render)
    }

    pub async fn handle_event(
        app: &mut App,
        evt: TerminalEvent,
        tui: &mut Tui,
    ) -> color_eyre::Result<bool> {
        match evt {
            TerminalEvent::Init => app.restore_session().await,
            TerminalEvent::Quit => app.should_quit = true,
            TerminalEvent::FocusGained => {
                app.has_focus = true;
                tui.clear()?;
            }
            TerminalEvent::FocusLost => app.has_focus = false,
            TerminalEvent::Key(key) => Self::handle_key_event(app, key).await,
            TerminalEvent::Mouse(mouse) => Self::handle_mouse_event(app, mouse).await,
            TerminalEvent::Tick => {
                return Ok(app.has_focus);
            }
            _ => {}
        }

        Ok(true)
    }

    pub async fn handle_action(app: &mut App, evt: Event) {
        if let Event::Audio(audio_event) = &evt {
            app.ctx.audio_system.on_audio_event(audio_event);
        }

        app.router.on_event(&evt, &app.ctx).await;

        match evt {
            Event::AuthStarted(url) => {
                info!("Consent page opened");
                app.login.set_authorize_url(url);
            }
            Event::AuthRedirect(outcome) => app.complete_login(outcome).await,
            Event::AuthFailed(error) => app.login.fail(error),
            Event::ProfileFetched(profile) => app.state.data.profile = Some(profile),
            Event::UserPlaylistsFetched(playlists) => {
                app.state.ui.sidebar_index = app
                    .state
                    .ui
                    .sidebar_index
                    .min(playlists.len().saturating_sub(1));
                app.state.data.user_playlists = playlists;
            }
            Event::PlaylistFetched(playlist) => {
                info!(id = %playlist.id, tracks = playlist.tracks.len(), "Playlist loaded");
            }
            Event::FetchError(message) => app.state.ui.status = Some(message),
            Event::SessionRejected => {
                warn!("Access token rejected, signing out");
                app.logout(Some("Your session expired, sign in again".to_string()));
            }
            _ => {}
        }
    }

    async fn handle_key_event(app: &mut App, evt: KeyEvent) {
        if evt.kind != KeyEventKind::Press {
            return;
        }

        if app.state.ui.screen == Screen::Login {
            match (evt.code, evt.modifiers) {
                (KeyCode::Enter, _) => app.begin_login(),
                (KeyCode::Char('q'), _) => app.update(AppMessage::Quit).await,
                (KeyCode::Char('c'), KeyModifiers::CONTROL) => app.update(AppMessage::Quit).await,
                _ => {}
            }
            return;
        }

        if app.state.ui.profile_menu_open {
            match evt.code {
                KeyCode::Enter => app.update(AppMessage::Logout).await,
                _ => app.state.ui.profile_menu_open = false,
            }
            return;
        }

        app.state.ui.status = None;

        if app.state.ui.focus == Focus::Sidebar && Self::handle_sidebar_key(app, evt).await {
            return;
        }

        if app.state.ui.focus == Focus::Content {
            let action = app.router.handle_input(evt, &app.state, &app.ctx).await;
            if let Some(action) = action {
                Self::dispatch_action(app, action).await;
                return;
            }
        }

        if let Some(msg) = InputHandler::handle_key(evt) {
            app.update(msg).await;
        }
    }

    /// Returns true when the key moved or opened the sidebar selection.
    async fn handle_sidebar_key(app: &mut App, evt: KeyEvent) -> bool {
        let len = app.state.data.user_playlists.len();
        match evt.code {
            KeyCode::Char('j') | KeyCode::Down => app.state.ui.select_next_playlist(len),
            KeyCode::Char('k') | KeyCode::Up => app.state.ui.select_previous_playlist(),
            KeyCode::Enter => {
                let index = app.state.ui.sidebar_index;
                Self::open_user_playlist(app, index).await
            }
            _ => return false,
        }
        true
    }

    async fn open_user_playlist(app: &mut App, index: usize) {
        let Some(entry) = app.state.data.user_playlists.get(index) else {
            return;
        };
        let section = Section::playlist(entry.id.clone());
        app.state.ui.sidebar_index = index;
        Self::dispatch_action(app, Action::Navigate(section)).await;
    }

    async fn dispatch_action(app: &mut App, action: Action) {
        match action {
            Action::Navigate(section) => {
                app.state.ui.focus = Focus::Content;
                app.router.navigate_to(section, &app.ctx).await;
            }
            Action::Audio(command) => app.audio(command),
            Action::None => {}
        }
    }

    async fn handle_mouse_event(app: &mut App, evt: MouseEvent) {
        if app.state.ui.screen != Screen::Player {
            return;
        }
        let position = Position::new(evt.column, evt.row);
        let over = |area: Option<Rect>| area.is_some_and(|a| a.contains(position));

        match (evt.kind, evt.modifiers) {
            (MouseEventKind::ScrollUp, KeyModifiers::SHIFT) => app.audio(AudioCommand::SeekForward),
            (MouseEventKind::ScrollDown, KeyModifiers::SHIFT) => {
                app.audio(AudioCommand::SeekBackward)
            }
            (MouseEventKind::ScrollUp, _) if over(app.state.ui.content_area) => {
                app.router.scroll(-SCROLL_STEP)
            }
            (MouseEventKind::ScrollDown, _) if over(app.state.ui.content_area) => {
                app.router.scroll(SCROLL_STEP)
            }
            (MouseEventKind::ScrollUp, _) => app.audio(AudioCommand::VolumeUp),
            (MouseEventKind::ScrollDown, _) => app.audio(AudioCommand::VolumeDown),
            (MouseEventKind::Down(MouseButton::Left), _) => {
                if let Some(timeline) = app.state.ui.timeline_area.filter(|a| a.contains(position)) {
                    app.audio(AudioCommand::SeekToOffset {
                        offset: evt.column - timeline.x,
                        width: timeline.width,
                    });
                } else if let Some(sidebar) = app.state.ui.sidebar_area {
                    let len = app.state.data.user_playlists.len();
                    let selected = app.state.ui.sidebar_index;
                    if sidebar.contains(position) {
                        if let Some(index) = Sidebar::index_at(sidebar, evt.row, len, selected) {
                            Self::open_user_playlist(app, index).await;
                        }
                    }
                }
            }
            _ => {}
        }
    }
}
