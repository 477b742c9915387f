use async_trait::async_trait;
use ratatui::crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};
use tokio::task::JoinHandle;

use crate::{
    event::events::Event,
    model::view::{PlaylistCard, playlist_cards},
    ui::{
        components::{
            card::{CARD_HEIGHT, CARD_WIDTH, CardWidget},
            spinner::Spinner,
        },
        context::AppContext,
        router::Section,
        scroll::ScrollEffect,
        state::AppState,
        traits::{Action, View},
        util::report_fetch_error,
    },
    util::colors,
};

const GREETING_HEIGHT: u16 = 2;
const TITLE_HEIGHT: u16 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grid {
    Featured,
    Top,
}

#[derive(Debug, Default)]
struct CardGrid {
    cards: Vec<PlaylistCard>,
    is_loading: bool,
}

impl CardGrid {
    fn loading() -> Self {
        Self {
            cards: Vec::new(),
            is_loading: true,
        }
    }
}

pub struct Dashboard {
    featured: CardGrid,
    top: CardGrid,
    grid: Grid,
    selected: usize,
    columns: u16,
    scroll: ScrollEffect,
    fetch_handles: Vec<JoinHandle<()>>,
}

impl Default for Dashboard {
    fn default() -> Self {
        Self {
            featured: CardGrid::loading(),
            top: CardGrid::loading(),
            grid: Grid::Featured,
            selected: 0,
            columns: 1,
            scroll: ScrollEffect::default(),
            fetch_handles: Vec::new(),
        }
    }
}

impl Drop for Dashboard {
    fn drop(&mut self) {
        for handle in self.fetch_handles.drain(..) {
            handle.abort();
        }
    }
}

impl Dashboard {
    pub fn new() -> Self {
        Self::default()
    }

    fn grid(&self, grid: Grid) -> &CardGrid {
        match grid {
            Grid::Featured => &self.featured,
            Grid::Top => &self.top,
        }
    }

    pub fn selected_card(&self) -> Option<&PlaylistCard> {
        self.grid(self.grid).cards.get(self.selected)
    }

    fn switch_grid(&mut self, grid: Grid) {
        if self.grid(grid).cards.is_empty() {
            return;
        }
        self.grid = grid;
        self.selected = self.selected.min(self.grid(grid).cards.len() - 1);
    }

    fn grid_height(&self, grid: Grid) -> u16 {
        let count = self.grid(grid).cards.len().max(1) as u16;
        TITLE_HEIGHT + count.div_ceil(self.columns.max(1)) * CARD_HEIGHT
    }

    /// Paints one titled grid at virtual row `top` and returns the row after it.
    fn render_grid(&self, f: &mut Frame, area: Rect, top: u16, grid: Grid, title: &str) -> u16 {
        let scroll_top = self.scroll.scroll_top;
        let visible = |row: u16, height: u16| {
            row >= scroll_top && row + height - scroll_top <= area.height
        };

        if visible(top, TITLE_HEIGHT) {
            f.render_widget(
                Paragraph::new(Span::styled(
                    title.to_string(),
                    Style::default()
                        .fg(colors::ACCENT)
                        .add_modifier(Modifier::BOLD),
                )),
                Rect {
                    y: area.y + top - scroll_top,
                    height: TITLE_HEIGHT,
                    ..area
                },
            );
        }

        let cards = self.grid(grid);
        let row = top + TITLE_HEIGHT;
        if cards.cards.is_empty() {
            let label = if cards.is_loading {
                "Loading..."
            } else {
                "Nothing here"
            };
            if visible(row, CARD_HEIGHT) {
                let slot = Rect {
                    y: area.y + row - scroll_top,
                    height: CARD_HEIGHT,
                    ..area
                };
                f.render_widget(
                    Spinner::default()
                        .with_style(Style::default().fg(colors::NEUTRAL))
                        .with_label(label),
                    slot,
                );
            }
            return row + CARD_HEIGHT;
        }

        for (i, card) in cards.cards.iter().enumerate() {
            let col = i as u16 % self.columns;
            let card_row = row + (i as u16 / self.columns) * CARD_HEIGHT;
            if !visible(card_row, CARD_HEIGHT) {
                continue;
            }
            let rect = Rect {
                x: area.x + col * CARD_WIDTH,
                y: area.y + card_row - scroll_top,
                width: CARD_WIDTH.min(area.width),
                height: CARD_HEIGHT,
            };
            let is_selected = self.grid == grid && self.selected == i;
            f.render_widget(CardWidget::new(card, is_selected), rect);
        }

        top + self.grid_height(grid)
    }
}

#[async_trait]
impl View for Dashboard {
    fn section(&self) -> Section {
        Section::Dashboard
    }

    async fn on_mount(&mut self, ctx: &AppContext) {
        let api = ctx.api.clone();
        let tx = ctx.event_tx.clone();
        self.fetch_handles.push(tokio::spawn(async move {
            match api.fetch_featured_playlists().await {
                Ok(listing) => {
                    let _ = tx.send(Event::FeaturedPlaylistsFetched(playlist_cards(&listing)));
                }
                Err(e) => report_fetch_error(&tx, "featured playlists", e),
            }
        }));

        let api = ctx.api.clone();
        let tx = ctx.event_tx.clone();
        self.fetch_handles.push(tokio::spawn(async move {
            match api.fetch_top_playlists().await {
                Ok(listing) => {
                    let _ = tx.send(Event::TopPlaylistsFetched(playlist_cards(&listing)));
                }
                Err(e) => report_fetch_error(&tx, "top playlists", e),
            }
        }));
    }

    fn render(&mut self, f: &mut Frame, area: Rect, state: &AppState, _ctx: &AppContext) {
        self.columns = (area.width / CARD_WIDTH).max(1);

        if self.scroll.scroll_top < GREETING_HEIGHT {
            let greeting = state
                .data
                .profile
                .as_ref()
                .map_or_else(|| "Hello".to_string(), |p| p.greeting());
            let fg = colors::fade(colors::BACKGROUND, colors::ACCENT, self.scroll.cover_opacity);
            f.render_widget(
                Paragraph::new(Line::from(Span::styled(
                    greeting,
                    Style::default().fg(fg).add_modifier(Modifier::BOLD),
                ))),
                Rect {
                    height: (GREETING_HEIGHT - self.scroll.scroll_top).min(area.height),
                    ..area
                },
            );
        }

        let next = self.render_grid(f, area, GREETING_HEIGHT, Grid::Featured, "Featured");
        self.render_grid(f, area, next, Grid::Top, "Top playlists");
    }

    async fn handle_input(
        &mut self,
        key: KeyEvent,
        _state: &AppState,
        _ctx: &AppContext,
    ) -> Option<Action> {
        let len = self.grid(self.grid).cards.len();
        match key.code {
            KeyCode::Right | KeyCode::Char('l') => {
                if len > 0 {
                    self.selected = (self.selected + 1).min(len - 1);
                }
                Some(Action::None)
            }
            KeyCode::Left | KeyCode::Char('h') => {
                self.selected = self.selected.saturating_sub(1);
                Some(Action::None)
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.switch_grid(Grid::Top);
                Some(Action::None)
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.switch_grid(Grid::Featured);
                Some(Action::None)
            }
            KeyCode::Enter => self
                .selected_card()
                .map(|card| Action::Navigate(Section::playlist(card.id.clone()))),
            _ => None,
        }
    }

    async fn on_event(&mut self, event: &Event, _ctx: &AppContext) {
        match event {
            Event::FeaturedPlaylistsFetched(cards) => {
                self.featured = CardGrid {
                    cards: cards.clone(),
                    is_loading: false,
                };
                if self.top.cards.is_empty() {
                    self.grid = Grid::Featured;
                }
            }
            Event::TopPlaylistsFetched(cards) => {
                self.top = CardGrid {
                    cards: cards.clone(),
                    is_loading: false,
                };
                if self.featured.cards.is_empty() && !cards.is_empty() {
                    self.grid = Grid::Top;
                }
            }
            Event::FetchError(_) => {
                self.featured.is_loading = false;
                self.top.is_loading = false;
            }
            _ => {}
        }
    }

    fn cover_height(&self) -> u16 {
        GREETING_HEIGHT
    }

    fn scroll_extent(&self) -> u16 {
        GREETING_HEIGHT + self.grid_height(Grid::Featured) + self.grid_height(Grid::Top)
    }

    fn on_scroll(&mut self, effect: &ScrollEffect) {
        self.scroll = *effect;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cards(prefix: &str, n: usize) -> Vec<PlaylistCard> {
        (0..n)
            .map(|i| PlaylistCard {
                id: format!("{prefix}{i}"),
                name: format!("Card {i}"),
                description: String::new(),
                image_url: None,
            })
            .collect()
    }

    #[test]
    fn grid_height_wraps_by_columns() {
        let mut view = Dashboard::new();
        view.top.cards = cards("t", 10);
        view.columns = 4;
        assert_eq!(view.grid_height(Grid::Top), TITLE_HEIGHT + 3 * CARD_HEIGHT);
        assert_eq!(view.grid_height(Grid::Featured), TITLE_HEIGHT + CARD_HEIGHT);
    }

    #[test]
    fn switching_grids_clamps_selection() {
        let mut view = Dashboard::new();
        view.featured.cards = cards("f", 2);
        view.top.cards = cards("t", 10);
        view.grid = Grid::Top;
        view.selected = 7;

        view.switch_grid(Grid::Featured);
        assert_eq!(view.selected_card().map(|c| c.id.as_str()), Some("f1"));

        view.grid = Grid::Top;
        view.featured.cards.clear();
        view.switch_grid(Grid::Featured);
        assert_eq!(view.grid, Grid::Top);
    }
}
