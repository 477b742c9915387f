use ratatui::layout::Rect;

use crate::model::view::{ProfileView, UserPlaylistEntry};

#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub data: AppData,
    pub ui: UiState,
}

#[derive(Debug, Clone, Default)]
pub struct AppData {
    pub profile: Option<ProfileView>,
    pub user_playlists: Vec<UserPlaylistEntry>,
}

#[derive(Debug, Clone, Default)]
pub struct UiState {
    pub screen: Screen,
    pub focus: Focus,
    pub sidebar_index: usize,
    pub profile_menu_open: bool,
    pub status: Option<String>,
    // Hit areas from the last draw, used for mouse input.
    pub timeline_area: Option<Rect>,
    pub content_area: Option<Rect>,
    pub sidebar_area: Option<Rect>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Screen {
    #[default]
    Login,
    Player,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Focus {
    Sidebar,
    #[default]
    Content,
}

impl Focus {
    pub fn toggle(self) -> Self {
        match self {
            Self::Sidebar => Self::Content,
            Self::Content => Self::Sidebar,
        }
    }
}

impl UiState {
    pub fn select_next_playlist(&mut self, len: usize) {
        if len > 0 {
            self.sidebar_index = (self.sidebar_index + 1).min(len - 1);
        }
    }

    pub fn select_previous_playlist(&mut self) {
        self.sidebar_index = self.sidebar_index.saturating_sub(1);
    }
}
