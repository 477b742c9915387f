use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Style, Stylize},
    symbols::{self, border},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Widget},
};

use crate::{model::view::PlayIcon, util::colors};

pub struct PlayerControlsWidget {
    play_icon: PlayIcon,
    has_track: bool,
    volume: u8,
    is_muted: bool,
}

impl PlayerControlsWidget {
    pub fn new(play_icon: PlayIcon, has_track: bool, volume: u8, is_muted: bool) -> Self {
        Self {
            play_icon,
            has_track,
            volume,
            is_muted,
        }
    }
}

impl Widget for PlayerControlsWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let fg = if self.has_track {
            colors::ACCENT
        } else {
            colors::NEUTRAL
        };

        let mut controls_text = Line::default();
        controls_text.push_span("⏮".fg(fg));
        controls_text.push_span("  ");
        controls_text.push_span(self.play_icon.transport_glyph().fg(colors::PRIMARY).bold());
        controls_text.push_span("  ");
        controls_text.push_span("⏭".fg(fg));

        let layout = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(11), Constraint::Length(12)])
            .split(area);

        let controls_block = Block::default()
            .borders(Borders::TOP | Borders::BOTTOM)
            .border_set(border::Set {
                top_left: symbols::line::ROUNDED.horizontal_down,
                top_right: symbols::line::ROUNDED.horizontal_down,
                bottom_left: symbols::line::ROUNDED.horizontal_up,
                bottom_right: symbols::line::ROUNDED.horizontal_up,
                ..symbols::border::ROUNDED
            });
        Paragraph::new(controls_text)
            .block(controls_block)
            .centered()
            .render(layout[0], buf);

        let (ratio, volume_text) = if self.is_muted {
            (0.0, Span::raw("muted").fg(colors::NEUTRAL))
        } else {
            (
                f64::from(self.volume.min(100)) / 100.0,
                Span::raw(format!("{}%", self.volume)),
            )
        };

        let volume_block = Block::default()
            .borders(Borders::ALL)
            .border_set(border::Set {
                top_left: symbols::line::ROUNDED.horizontal_down,
                bottom_left: symbols::line::ROUNDED.horizontal_up,
                ..symbols::border::ROUNDED
            });

        Gauge::default()
            .block(volume_block)
            .gauge_style(Style::new().fg(colors::PRIMARY).bg(colors::NEUTRAL))
            .ratio(ratio)
            .label(volume_text)
            .render(layout[1], buf);
    }
}
