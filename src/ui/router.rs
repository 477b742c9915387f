use ratatui::{Frame, crossterm::event::KeyEvent, layout::Rect};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    event::events::Event,
    ui::{
        context::AppContext,
        layout::TOP_BAR_HEIGHT,
        scroll::{ContentPane, ScrollEffect, ScrollHandler},
        state::AppState,
        traits::{Action, View},
        views::{Dashboard, PlaylistDetail},
    },
};

/// The logical page shown in the content pane.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Section {
    Dashboard,
    #[serde(rename_all = "camelCase")]
    Playlist { playlist_id: String },
}

impl Section {
    pub fn playlist(id: impl Into<String>) -> Self {
        Self::Playlist {
            playlist_id: id.into(),
        }
    }

    /// Cosmetic path recorded with the history entry.
    pub fn path(&self) -> String {
        match self {
            Self::Dashboard => "/dashboard".to_string(),
            Self::Playlist { playlist_id } => format!("/playlist/{playlist_id}"),
        }
    }

    pub fn is_playlist(&self) -> bool {
        matches!(self, Self::Playlist { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub section: Section,
    pub path: String,
}

/// Back/forward stack. Pushing drops any entries ahead of the cursor.
#[derive(Debug, Default)]
pub struct History {
    entries: Vec<HistoryEntry>,
    cursor: usize,
}

impl History {
    pub fn push(&mut self, section: Section) {
        if !self.entries.is_empty() {
            self.entries.truncate(self.cursor + 1);
        }
        self.entries.push(HistoryEntry {
            path: section.path(),
            section,
        });
        self.cursor = self.entries.len() - 1;
    }

    pub fn back(&mut self) -> Option<&Section> {
        if self.cursor == 0 || self.entries.is_empty() {
            return None;
        }
        self.cursor -= 1;
        self.current()
    }

    pub fn forward(&mut self) -> Option<&Section> {
        if self.cursor + 1 >= self.entries.len() {
            return None;
        }
        self.cursor += 1;
        self.current()
    }

    pub fn current(&self) -> Option<&Section> {
        self.entries.get(self.cursor).map(|e| &e.section)
    }

    pub fn current_entry(&self) -> Option<&HistoryEntry> {
        self.entries.get(self.cursor)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = 0;
    }
}

/// Single entry point for every section change. The view in the content pane
/// is always built from the section under the history cursor.
#[derive(Default)]
pub struct Router {
    history: History,
    active: Option<Box<dyn View>>,
    content: ContentPane,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn navigate_to(&mut self, section: Section, ctx: &AppContext) {
        info!(path = %section.path(), "Navigating");
        self.history.push(section.clone());
        self.render_section(section, ctx).await;
    }

    /// History traversal. Returns false at either end of the stack.
    pub async fn back(&mut self, ctx: &AppContext) -> bool {
        match self.history.back().cloned() {
            Some(section) => {
                self.render_section(section, ctx).await;
                true
            }
            None => false,
        }
    }

    pub async fn forward(&mut self, ctx: &AppContext) -> bool {
        match self.history.forward().cloned() {
            Some(section) => {
                self.render_section(section, ctx).await;
                true
            }
            None => false,
        }
    }

    /// Builds a fresh view for `section`, starts its fetches and replaces the
    /// content-pane scroll handler.
    pub async fn render_section(&mut self, section: Section, ctx: &AppContext) {
        debug!(?section, "Rendering section");
        // Dropping the old view aborts its in-flight fetches.
        self.active = None;

        let mut view: Box<dyn View> = match &section {
            Section::Dashboard => Box::new(Dashboard::new()),
            Section::Playlist { playlist_id } => Box::new(PlaylistDetail::new(
                playlist_id.clone(),
                ctx.config.track_filter,
            )),
        };
        view.on_mount(ctx).await;

        let effect = self
            .content
            .replace_scroll_handler(scroll_handler(&section, view.cover_height()));
        view.on_scroll(&effect);
        self.active = Some(view);
    }

    pub fn render(&mut self, f: &mut Frame, area: Rect, state: &AppState, ctx: &AppContext) {
        if let Some(view) = &mut self.active {
            view.render(f, area, state, ctx);
        }
    }

    pub async fn handle_input(
        &mut self,
        key: KeyEvent,
        state: &AppState,
        ctx: &AppContext,
    ) -> Option<Action> {
        match &mut self.active {
            Some(view) => view.handle_input(key, state, ctx).await,
            None => None,
        }
    }

    pub async fn on_event(&mut self, event: &Event, ctx: &AppContext) {
        if let Some(view) = &mut self.active {
            view.on_event(event, ctx).await;
        }

        // A loaded playlist grows the cover, so the handler needs the new height.
        if matches!(event, Event::PlaylistFetched(_)) {
            if let (Some(view), Some(section)) = (&mut self.active, self.history.current()) {
                let effect = self
                    .content
                    .replace_scroll_handler(scroll_handler(section, view.cover_height()));
                view.on_scroll(&effect);
            }
        }
    }

    pub fn scroll(&mut self, delta: i32) {
        let Some(view) = &mut self.active else {
            return;
        };
        let effect = self.content.scroll_by(delta, view.scroll_extent());
        view.on_scroll(&effect);
    }

    pub fn reset(&mut self) {
        self.active = None;
        self.history.clear();
        self.content.clear();
    }

    pub fn current_section(&self) -> Option<&Section> {
        self.history.current()
    }

    pub fn active_section(&self) -> Option<Section> {
        self.active.as_ref().map(|v| v.section())
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn content(&self) -> &ContentPane {
        &self.content
    }

    pub fn scroll_effect(&self) -> ScrollEffect {
        self.content.effect()
    }
}

fn scroll_handler(section: &Section, cover_height: u16) -> ScrollHandler {
    let has_table = section.is_playlist();
    Box::new(move |top| ScrollEffect::compute(top, cover_height, TOP_BAR_HEIGHT, has_table))
}
