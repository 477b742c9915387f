use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    symbols::border,
    text::Line,
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthChar;

use crate::{model::view::PlaylistCard, util::colors};

pub const CARD_WIDTH: u16 = 24;
pub const CARD_HEIGHT: u16 = 7;

/// One tile of a dashboard grid.
pub struct CardWidget<'a> {
    card: &'a PlaylistCard,
    is_selected: bool,
}

impl<'a> CardWidget<'a> {
    pub fn new(card: &'a PlaylistCard, is_selected: bool) -> Self {
        Self { card, is_selected }
    }
}

impl Widget for CardWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.is_selected {
            Style::default().fg(colors::PRIMARY)
        } else {
            Style::default().fg(colors::NEUTRAL)
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_set(border::ROUNDED)
            .border_style(border_style);
        let inner = block.inner(area);
        block.render(area, buf);

        let width = usize::from(inner.width);
        let cover = if self.card.image_url.is_some() { "▣" } else { "□" };
        let mut lines = vec![
            Line::styled(cover, Style::default().fg(colors::NEUTRAL)),
            Line::styled(
                truncate(&self.card.name, width),
                Style::default()
                    .fg(colors::ACCENT)
                    .add_modifier(Modifier::BOLD),
            ),
        ];
        if !self.card.description.is_empty() {
            lines.push(Line::styled(
                self.card.description.clone(),
                Style::default().fg(colors::TEXT),
            ));
        }

        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .render(inner, buf);
    }
}

/// Cuts `text` to `width` terminal columns, marking the cut with an ellipsis.
pub fn truncate(text: &str, width: usize) -> String {
    let total: usize = text.chars().filter_map(UnicodeWidthChar::width).sum();
    if total <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push('…');
    out
}
