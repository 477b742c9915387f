use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::{List, ListItem, ListState, StatefulWidget, Widget},
};

use crate::{model::view::UserPlaylistEntry, util::colors};

/// The user's own playlists. The highlight is only shown while focused.
pub struct Sidebar<'a> {
    playlists: &'a [UserPlaylistEntry],
    selected_index: usize,
    is_focused: bool,
}

impl<'a> Sidebar<'a> {
    pub fn new(playlists: &'a [UserPlaylistEntry], selected_index: usize, is_focused: bool) -> Self {
        Self {
            playlists,
            selected_index,
            is_focused,
        }
    }

    /// First entry drawn when `selected_index` must stay visible in `height`
    /// rows. The list scrolls just far enough to show the selection last.
    pub fn offset(selected_index: usize, height: u16) -> usize {
        selected_index.saturating_sub(usize::from(height.max(1)) - 1)
    }

    /// Index of the entry drawn at terminal row `y` inside `area`.
    pub fn index_at(area: Rect, y: u16, len: usize, selected_index: usize) -> Option<usize> {
        if y < area.top() || y >= area.bottom() {
            return None;
        }
        let index = Self::offset(selected_index, area.height) + usize::from(y - area.top());
        (index < len).then_some(index)
    }
}

impl Widget for Sidebar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.playlists.is_empty() {
            buf.set_string(
                area.x + 1,
                area.y,
                "No playlists",
                Style::default().fg(colors::NEUTRAL),
            );
            return;
        }

        let items: Vec<ListItem> = self
            .playlists
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let style = if self.is_focused && i == self.selected_index {
                    Style::default()
                        .fg(colors::PRIMARY)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(colors::TEXT)
                };
                ListItem::new(format!(" {}", entry.name)).style(style)
            })
            .collect();

        let mut state = ListState::default()
            .with_offset(Self::offset(self.selected_index, area.height))
            .with_selected(Some(self.selected_index));
        StatefulWidget::render(List::new(items), area, buf, &mut state);
    }
}
