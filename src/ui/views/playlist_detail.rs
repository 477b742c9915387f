use async_trait::async_trait;
use ratatui::crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Cell, Paragraph, Row, Table, TableState, Wrap},
};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::{
    audio::commands::AudioCommand,
    event::events::Event,
    model::{
        track::TrackFilter,
        view::{PlaylistModel, TrackRow, track_rows},
    },
    storage::LOADED_TRACKS,
    ui::{
        components::spinner::Spinner,
        context::AppContext,
        router::Section,
        scroll::ScrollEffect,
        state::AppState,
        traits::{Action, View},
        util::report_fetch_error,
    },
    util::colors,
};

const COVER_HEIGHT: u16 = 6;
const ROW_HEIGHT: u16 = 2;

pub struct PlaylistDetail {
    playlist_id: String,
    filter: TrackFilter,
    playlist: Option<PlaylistModel>,
    is_loading: bool,
    table_state: TableState,
    scroll: ScrollEffect,
    fetch_handle: Option<JoinHandle<()>>,
}

impl PlaylistDetail {
    pub fn new(playlist_id: String, filter: TrackFilter) -> Self {
        Self {
            playlist_id,
            filter,
            playlist: None,
            is_loading: true,
            table_state: TableState::default(),
            scroll: ScrollEffect::default(),
            fetch_handle: None,
        }
    }

    pub fn playlist(&self) -> Option<&PlaylistModel> {
        self.playlist.as_ref()
    }

    fn track_count(&self) -> usize {
        self.playlist.as_ref().map_or(0, |p| p.tracks.len())
    }

    fn selected_track_id(&self) -> Option<&str> {
        let playlist = self.playlist.as_ref()?;
        let i = self.table_state.selected()?;
        playlist.tracks.get(i).map(|t| t.id.as_str())
    }

    fn render_cover(&self, f: &mut Frame, area: Rect, playlist: &PlaylistModel) {
        let fg = colors::fade(colors::BACKGROUND, colors::ACCENT, self.scroll.cover_opacity);
        let dim = colors::fade(colors::BACKGROUND, colors::TEXT, self.scroll.cover_opacity);
        let art = if playlist.header.image_url.is_some() {
            "▣"
        } else {
            "□"
        };

        let mut lines = vec![
            Line::from(Span::styled(format!("{art}  PLAYLIST"), Style::default().fg(dim))),
            Line::from(Span::styled(
                playlist.header.name.clone(),
                Style::default().fg(fg).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                playlist.header.description.clone(),
                Style::default().fg(dim),
            )),
            Line::from(Span::styled(
                format!("{} tracks", playlist.tracks.len()),
                Style::default().fg(dim),
            )),
        ];

        // Rows scrolled past the top are cut from the cover, not the table.
        let hidden = usize::from(self.scroll.scroll_top.min(COVER_HEIGHT));
        lines.drain(..hidden.min(lines.len()));

        f.render_widget(
            Paragraph::new(lines).wrap(Wrap { trim: true }),
            Rect {
                x: area.x + 1,
                width: area.width.saturating_sub(2),
                ..area
            },
        );
    }

    fn header_row(&self) -> Row<'static> {
        let style = if self.scroll.sticky_header {
            Style::default().fg(colors::ACCENT).bg(colors::SURFACE)
        } else {
            Style::default().fg(colors::NEUTRAL)
        };
        Row::new(vec!["#", "Title", "Album", "⏱"]).style(style)
    }
}

fn row_cells(row: &TrackRow) -> Row<'static> {
    let marker = if row.is_current || row.is_selected {
        row.play_icon.row_glyph().to_string()
    } else {
        row.number.to_string()
    };

    let title_style = if row.is_current {
        Style::default()
            .fg(colors::PRIMARY)
            .add_modifier(Modifier::BOLD)
    } else if row.playable {
        Style::default().fg(colors::ACCENT)
    } else {
        Style::default().fg(colors::NEUTRAL)
    };

    let title = Text::from(vec![
        Line::from(Span::styled(row.title.clone(), title_style)),
        Line::from(Span::styled(
            row.artist_names.clone(),
            Style::default().fg(colors::TEXT),
        )),
    ]);

    Row::new(vec![
        Cell::from(marker),
        Cell::from(title),
        Cell::from(row.album_name.clone()),
        Cell::from(row.duration.clone()),
    ])
    .height(ROW_HEIGHT)
    .style(if row.playable {
        Style::default().fg(colors::TEXT)
    } else {
        Style::default().fg(colors::NEUTRAL)
    })
}

impl Drop for PlaylistDetail {
    fn drop(&mut self) {
        if let Some(handle) = self.fetch_handle.take() {
            handle.abort();
        }
    }
}

#[async_trait]
impl View for PlaylistDetail {
    fn section(&self) -> Section {
        Section::playlist(self.playlist_id.clone())
    }

    async fn on_mount(&mut self, ctx: &AppContext) {
        self.is_loading = true;
        let api = ctx.api.clone();
        let tx = ctx.event_tx.clone();
        let id = self.playlist_id.clone();
        let filter = self.filter;

        let handle = tokio::spawn(async move {
            match api.fetch_playlist(&id).await {
                Ok(playlist) => {
                    let _ = tx.send(Event::PlaylistFetched(PlaylistModel::from_api(
                        &playlist, filter,
                    )));
                }
                Err(e) => report_fetch_error(&tx, "playlist", e),
            }
        });
        self.fetch_handle = Some(handle);
    }

    fn render(&mut self, f: &mut Frame, area: Rect, _state: &AppState, ctx: &AppContext) {
        let Some(playlist) = &self.playlist else {
            let label = if self.is_loading {
                "Loading playlist..."
            } else {
                "Playlist unavailable"
            };
            f.render_widget(
                Spinner::default()
                    .with_style(Style::default().fg(colors::PRIMARY))
                    .with_label(label),
                area,
            );
            return;
        };

        let cover_rows = COVER_HEIGHT.saturating_sub(self.scroll.scroll_top);
        let cover_area = Rect {
            height: cover_rows.min(area.height),
            ..area
        };
        let table_area = Rect {
            y: area.y + cover_area.height,
            height: area.height - cover_area.height,
            ..area
        };
        if !cover_area.is_empty() {
            self.render_cover(f, cover_area, playlist);
        }

        if playlist.tracks.is_empty() {
            f.render_widget(
                Paragraph::new("No playable tracks").style(Style::default().fg(colors::NEUTRAL)),
                table_area,
            );
            return;
        }

        let transport = ctx.audio_system.transport();
        let current_id = transport.current_track_id();
        let rows = track_rows(
            &playlist.tracks,
            self.selected_track_id(),
            current_id.as_deref(),
            transport.is_playing(),
        );

        // Once the cover is gone, further scrolling moves whole rows.
        let skip = usize::from(self.scroll.scroll_top.saturating_sub(COVER_HEIGHT) / ROW_HEIGHT)
            .min(rows.len().saturating_sub(1));
        let table_rows: Vec<Row> = rows.iter().skip(skip).map(row_cells).collect();

        let mut state = TableState::default();
        if let Some(selected) = self.table_state.selected() {
            state.select(selected.checked_sub(skip));
        }

        let table = Table::new(
            table_rows,
            [
                Constraint::Length(4),
                Constraint::Percentage(50),
                Constraint::Percentage(35),
                Constraint::Length(6),
            ],
        )
        .header(self.header_row())
        .row_highlight_style(Style::default().bg(colors::SURFACE))
        .column_spacing(1);

        f.render_stateful_widget(table, table_area, &mut state);
    }

    async fn handle_input(
        &mut self,
        key: KeyEvent,
        _state: &AppState,
        _ctx: &AppContext,
    ) -> Option<Action> {
        let len = self.track_count();
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => {
                if len > 0 {
                    let i = self
                        .table_state
                        .selected()
                        .map_or(0, |i| if i >= len - 1 { i } else { i + 1 });
                    self.table_state.select(Some(i));
                }
                Some(Action::None)
            }
            KeyCode::Up | KeyCode::Char('k') => {
                if len > 0 {
                    let i = self.table_state.selected().map_or(0, |i| i.saturating_sub(1));
                    self.table_state.select(Some(i));
                }
                Some(Action::None)
            }
            KeyCode::Char('g') => {
                if len > 0 {
                    self.table_state.select(Some(0));
                }
                Some(Action::None)
            }
            KeyCode::Char('G') => {
                if len > 0 {
                    self.table_state.select(Some(len - 1));
                }
                Some(Action::None)
            }
            KeyCode::Enter => {
                let track = self
                    .table_state
                    .selected()
                    .and_then(|i| self.playlist.as_ref()?.tracks.get(i))?;
                if !track.is_playable() {
                    debug!(track = %track.id, "Track has no preview");
                    return Some(Action::None);
                }
                Some(Action::Audio(AudioCommand::PlayTrack(track.clone())))
            }
            _ => None,
        }
    }

    async fn on_event(&mut self, event: &Event, ctx: &AppContext) {
        match event {
            Event::PlaylistFetched(playlist) if playlist.id == self.playlist_id => {
                if let Err(e) = ctx.storage.set_json(LOADED_TRACKS, &playlist.tracks) {
                    warn!(error = %e, "Could not persist loaded tracks");
                }
                self.playlist = Some(playlist.clone());
                self.is_loading = false;
            }
            Event::FetchError(_) if self.playlist.is_none() => {
                self.is_loading = false;
            }
            _ => {}
        }
    }

    fn cover_height(&self) -> u16 {
        COVER_HEIGHT
    }

    fn scroll_extent(&self) -> u16 {
        let rows = u16::try_from(self.track_count()).unwrap_or(u16::MAX);
        COVER_HEIGHT.saturating_add(rows.saturating_mul(ROW_HEIGHT))
    }

    fn on_scroll(&mut self, effect: &ScrollEffect) {
        self.scroll = *effect;
    }
}
