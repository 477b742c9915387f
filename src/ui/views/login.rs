use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};

use crate::{ui::components::spinner::Spinner, util::colors};

/// Shown while there is no session.
#[derive(Debug, Default)]
pub struct Login {
    is_waiting: bool,
    authorize_url: Option<String>,
    error: Option<String>,
}

impl Login {
    pub fn is_waiting(&self) -> bool {
        self.is_waiting
    }

    pub fn begin(&mut self) {
        self.is_waiting = true;
        self.authorize_url = None;
        self.error = None;
    }

    pub fn set_authorize_url(&mut self, url: String) {
        self.authorize_url = Some(url);
    }

    pub fn fail(&mut self, error: impl Into<String>) {
        self.is_waiting = false;
        self.error = Some(error.into());
    }

    pub fn reset(&mut self, notice: Option<String>) {
        self.is_waiting = false;
        self.authorize_url = None;
        self.error = notice;
    }

    pub fn render(&self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Percentage(35),
                Constraint::Length(3),
                Constraint::Length(2),
                Constraint::Min(0),
            ])
            .split(area);

        f.render_widget(
            Paragraph::new(vec![
                Line::from(Span::styled(
                    "spotlite",
                    Style::default()
                        .fg(colors::PRIMARY)
                        .add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    "30 second previews from your library",
                    Style::default().fg(colors::TEXT),
                )),
            ])
            .alignment(Alignment::Center),
            chunks[1],
        );

        if self.is_waiting {
            f.render_widget(
                Spinner::default()
                    .with_style(Style::default().fg(colors::PRIMARY))
                    .with_label("Waiting for authorization in the browser..."),
                chunks[2],
            );
        } else {
            f.render_widget(
                Paragraph::new(Line::from(vec![
                    Span::styled("⏎ ", Style::default().fg(colors::PRIMARY)),
                    Span::styled("Log in with Spotify", Style::default().fg(colors::ACCENT)),
                    Span::styled("   q quit", Style::default().fg(colors::NEUTRAL)),
                ]))
                .alignment(Alignment::Center),
                chunks[2],
            );
        }

        let mut notes = Vec::new();
        if let Some(url) = &self.authorize_url {
            notes.push(Line::from(Span::styled(
                "If no browser opened, visit:",
                Style::default().fg(colors::TEXT),
            )));
            notes.push(Line::from(Span::styled(
                url.clone(),
                Style::default().fg(colors::NEUTRAL),
            )));
        }
        if let Some(error) = &self.error {
            notes.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(colors::ACCENT),
            )));
        }
        f.render_widget(
            Paragraph::new(notes)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: false }),
            chunks[3],
        );
    }
}
