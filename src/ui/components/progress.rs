use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Style, Stylize},
    symbols::{self, border},
    text::Span,
    widgets::{Block, Borders, Widget},
};

use crate::{
    audio::progress::TrackProgress,
    model::view::{PlayIcon, format_time},
    ui::components::gauge::TimelineGauge,
    util::colors,
};

pub struct ProgressWidget<'a> {
    progress: &'a TrackProgress,
    track_title: &'a str,
    track_artist: Option<&'a str>,
    play_icon: PlayIcon,
}

impl<'a> ProgressWidget<'a> {
    pub fn new(
        progress: &'a TrackProgress,
        track_title: &'a str,
        track_artist: Option<&'a str>,
        play_icon: PlayIcon,
    ) -> Self {
        Self {
            progress,
            track_title,
            track_artist,
            play_icon,
        }
    }

    fn gauge(&self) -> TimelineGauge<'a> {
        let (current, total) = self.progress.get_progress();

        let mut track_info = format!("{}  {}", self.play_icon.transport_glyph(), self.track_title);
        if let Some(artist) = self.track_artist {
            track_info = format!("{track_info} · {artist}");
        }

        TimelineGauge::default()
            .block(
                Block::default()
                    .title_top(track_info)
                    .title_alignment(Alignment::Center)
                    .borders(Borders::ALL)
                    .border_set(border::Set {
                        top_right: symbols::line::ROUNDED.horizontal_down,
                        bottom_right: symbols::line::ROUNDED.horizontal_up,
                        ..symbols::border::ROUNDED
                    }),
            )
            .ratio(self.progress.ratio())
            .label(
                Span::raw(format!("{} / {}", format_time(current), format_time(total)))
                    .fg(Color::White),
            )
            .played_style(Style::default().fg(colors::PRIMARY).bg(colors::SECONDARY))
            .remaining_style(Style::default().fg(colors::BACKGROUND).bg(colors::BACKGROUND))
    }

    /// Click target of the timeline inside `area`.
    pub fn timeline_area(&self, area: Rect) -> Rect {
        self.gauge().bar_area(area)
    }
}

impl Widget for ProgressWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.gauge().render(area, buf);
    }
}
