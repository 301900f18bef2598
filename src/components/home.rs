// ABOUTME: Landing screen with portal actions, and the signed-in summary

use crate::app::AppState;
use crate::components::theme::{
    CORNFLOWER_BLUE, DARK_BG, GOLD, MUTED_GRAY, PANEL_BG, SELECTION_GREEN, SOFT_WHITE,
};
use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
};

pub struct HomeComponent;

impl HomeComponent {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        frame.render_widget(Block::default().style(Style::default().bg(DARK_BG)), area);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(CORNFLOWER_BLUE))
            .title(" IGCSE ICT Tutoring ")
            .title_alignment(Alignment::Center)
            .style(Style::default().bg(PANEL_BG));

        let mut lines = vec![
            Line::from(Span::styled(
                "IGCSE ICT Tutoring Portal",
                Style::default().fg(GOLD).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "Lessons, assignments, quizzes and materials in one place",
                Style::default().fg(MUTED_GRAY),
            )),
            Line::from(""),
        ];

        match &state.session {
            Some(session) => {
                lines.push(Line::from(vec![
                    Span::styled("Signed in as ", Style::default().fg(SOFT_WHITE)),
                    Span::styled(
                        session.user.display_name(),
                        Style::default().fg(SELECTION_GREEN).add_modifier(Modifier::BOLD),
                    ),
                ]));
                if let Some(role) = &session.user.role {
                    lines.push(Line::from(Span::styled(
                        format!("Role: {role}"),
                        Style::default().fg(MUTED_GRAY),
                    )));
                }
                lines.push(Line::from(Span::styled(
                    format!("Dashboard: {}", session.user.dashboard_url),
                    Style::default().fg(MUTED_GRAY),
                )));
                lines.push(Line::from(""));
                lines.push(Self::action("o", "Sign out"));
            }
            None => {
                lines.push(Self::action("r", "Register as a new student"));
                lines.push(Self::action("s", "Sign in"));
            }
        }
        lines.push(Self::action("q", "Quit"));

        let paragraph = Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn action(key: &'static str, label: &'static str) -> Line<'static> {
        Line::from(vec![
            Span::styled(format!("[{key}] "), Style::default().fg(GOLD)),
            Span::styled(label, Style::default().fg(SOFT_WHITE)),
        ])
    }
}
