use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    symbols::border,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::{
    ui::{
        app::App,
        components::{player::PlayerWidget, profile_menu::ProfileMenu, sidebar::Sidebar},
        state::{Focus, Screen},
    },
    util::colors,
};

pub const TOP_BAR_HEIGHT: u16 = 1;
const PLAYER_HEIGHT: u16 = 3;
const SIDEBAR_WIDTH: u16 = 28;

pub struct AppLayout<'a> {
    pub app: &'a mut App,
}

impl<'a> AppLayout<'a> {
    pub fn new(app: &'a mut App) -> Self {
        Self { app }
    }

    pub fn render(self, f: &mut Frame, area: Rect) {
        let buf = f.buffer_mut();
        buf.set_style(area, Style::new().bg(colors::BACKGROUND));

        if self.app.state.ui.screen == Screen::Login {
            self.app.login.render(f, area);
            return;
        }

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(PLAYER_HEIGHT)])
            .split(area);
        let main_area = chunks[0];
        let player_area = chunks[1];

        let main_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(1)])
            .split(main_area);
        let sidebar_area = main_chunks[0];
        let content_area = main_chunks[1];

        let focus = self.app.state.ui.focus;
        let border_style = |pane: Focus| {
            if pane == focus {
                Style::default().fg(colors::PRIMARY)
            } else {
                Style::default().fg(colors::NEUTRAL)
            }
        };

        let sidebar_block = Block::default()
            .borders(Borders::ALL)
            .border_set(border::ROUNDED)
            .border_style(border_style(Focus::Sidebar))
            .title("Your playlists")
            .title_alignment(Alignment::Center);
        let content_block = Block::default()
            .borders(Borders::ALL)
            .border_set(border::ROUNDED)
            .border_style(border_style(Focus::Content));

        let sidebar_inner = sidebar_block.inner(sidebar_area);
        let content_inner = content_block.inner(content_area);
        f.render_widget(sidebar_block, sidebar_area);
        f.render_widget(content_block, content_area);

        f.render_widget(
            Sidebar::new(
                &self.app.state.data.user_playlists,
                self.app.state.ui.sidebar_index,
                focus == Focus::Sidebar,
            ),
            sidebar_inner,
        );

        let content_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(TOP_BAR_HEIGHT), Constraint::Min(0)])
            .split(content_inner);
        let top_bar_area = content_chunks[0];
        let view_area = content_chunks[1];

        self.render_top_bar(f, top_bar_area);
        self.app
            .router
            .render(f, view_area, &self.app.state, &self.app.ctx);

        let player = PlayerWidget::new(self.app.ctx.audio_system.transport());
        let timeline_area = player.timeline_area(player_area);
        f.render_widget(player, player_area);

        if self.app.state.ui.profile_menu_open {
            let name = self
                .app
                .state
                .data
                .profile
                .as_ref()
                .map_or("Profile", |p| p.display_name.as_str());
            f.render_widget(ProfileMenu::new(name), ProfileMenu::area(view_area));
        }

        let ui = &mut self.app.state.ui;
        ui.timeline_area = Some(timeline_area);
        ui.content_area = Some(content_inner);
        ui.sidebar_area = Some(sidebar_inner);
    }

    /// Status on the left, profile button on the right. The background darkens
    /// as the content scrolls under it.
    fn render_top_bar(&self, f: &mut Frame, area: Rect) {
        let effect = self.app.router.scroll_effect();
        let bg = colors::fade(colors::BACKGROUND, colors::SURFACE, effect.header_opacity);

        let status = self
            .app
            .state
            .ui
            .status
            .clone()
            .unwrap_or_else(|| "[ back  ] forward  d home".to_string());
        let profile = match &self.app.state.data.profile {
            Some(p) if p.has_avatar => format!("◉ {} ▾", p.display_name),
            Some(p) => format!("○ {} ▾", p.display_name),
            None => "○ ▾".to_string(),
        };

        let halves = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(profile.chars().count() as u16 + 2)])
            .split(area);

        f.render_widget(
            Paragraph::new(Span::styled(status, Style::default().fg(colors::NEUTRAL)))
                .style(Style::default().bg(bg)),
            halves[0],
        );
        f.render_widget(
            Paragraph::new(Line::from(Span::styled(
                profile,
                Style::default()
                    .fg(colors::ACCENT)
                    .add_modifier(Modifier::BOLD),
            )))
            .alignment(Alignment::Right)
            .style(Style::default().bg(bg)),
            halves[1],
        );
    }
}
