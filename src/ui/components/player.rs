use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    widgets::Widget,
};

use crate::{
    audio::transport::Transport,
    ui::components::{controls::PlayerControlsWidget, progress::ProgressWidget},
};

const CONTROLS_WIDTH: u16 = 23;

/// Transport bar: now-playing timeline on the left, buttons and volume on the right.
pub struct PlayerWidget<'a> {
    transport: &'a Transport,
}

impl<'a> PlayerWidget<'a> {
    pub fn new(transport: &'a Transport) -> Self {
        Self { transport }
    }

    fn split(area: Rect) -> (Rect, Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(1), Constraint::Length(CONTROLS_WIDTH)])
            .split(area);
        (chunks[0], chunks[1])
    }

    fn progress(&self) -> ProgressWidget<'a> {
        let track = self.transport.current_track();
        ProgressWidget::new(
            self.transport.progress(),
            track.map_or("Nothing playing", |t| t.name.as_str()),
            track.map(|t| t.artist_names.as_str()),
            self.transport.play_icon(),
        )
    }

    pub fn timeline_area(&self, area: Rect) -> Rect {
        let (progress_area, _) = Self::split(area);
        self.progress().timeline_area(progress_area)
    }
}

impl Widget for PlayerWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (progress_area, controls_area) = Self::split(area);

        self.progress().render(progress_area, buf);
        PlayerControlsWidget::new(
            self.transport.play_icon(),
            self.transport.current_track().is_some(),
            self.transport.volume(),
            self.transport.is_muted(),
        )
        .render(controls_area, buf);
    }
}
