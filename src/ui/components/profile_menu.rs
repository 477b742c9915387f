use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    symbols::border,
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

use crate::util::colors;

const MENU_WIDTH: u16 = 22;
const MENU_HEIGHT: u16 = 4;

/// Drop-down under the profile button in the top bar.
pub struct ProfileMenu<'a> {
    display_name: &'a str,
}

impl<'a> ProfileMenu<'a> {
    pub fn new(display_name: &'a str) -> Self {
        Self { display_name }
    }

    /// Anchors the menu to the top-right corner of `area`.
    pub fn area(area: Rect) -> Rect {
        let width = MENU_WIDTH.min(area.width);
        Rect {
            x: area.right().saturating_sub(width + 1),
            y: area.y,
            width,
            height: MENU_HEIGHT.min(area.height),
        }
    }
}

impl Widget for ProfileMenu<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_set(border::ROUNDED)
            .title(self.display_name)
            .style(Style::default().bg(colors::SURFACE).fg(colors::TEXT));

        Paragraph::new(vec![
            Line::styled(
                "⏎ Log out",
                Style::default()
                    .fg(colors::ACCENT)
                    .add_modifier(Modifier::BOLD),
            ),
            Line::styled("any key closes", Style::default().fg(colors::NEUTRAL)),
        ])
        .block(block)
        .render(area, buf);
    }
}
