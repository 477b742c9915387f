use async_trait::async_trait;
use ratatui::{Frame, crossterm::event::KeyEvent, layout::Rect};

use crate::{
    audio::commands::AudioCommand,
    event::events::Event,
    ui::{context::AppContext, router::Section, scroll::ScrollEffect, state::AppState},
};

/// What a view asks the app to do after handling input.
#[derive(Debug, Clone)]
pub enum Action {
    Navigate(Section),
    Audio(AudioCommand),
    /// The key was consumed and needs no further handling.
    None,
}

/// A section painter. Views own their fetch tasks and drop their results once
/// they are no longer the active view.
#[async_trait]
pub trait View: Send {
    fn section(&self) -> Section;

    /// Starts the fetches for this section.
    async fn on_mount(&mut self, ctx: &AppContext);

    fn render(&mut self, f: &mut Frame, area: Rect, state: &AppState, ctx: &AppContext);

    async fn handle_input(
        &mut self,
        key: KeyEvent,
        state: &AppState,
        ctx: &AppContext,
    ) -> Option<Action>;

    async fn on_event(&mut self, event: &Event, ctx: &AppContext);

    /// Rows taken by the cover header at rest.
    fn cover_height(&self) -> u16 {
        0
    }

    /// Largest useful scroll offset.
    fn scroll_extent(&self) -> u16 {
        0
    }

    fn on_scroll(&mut self, _effect: &ScrollEffect) {}
}
