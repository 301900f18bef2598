// ABOUTME: Sign-in form component

use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
};

use super::state::{SignInField, SignInState};
use crate::components::theme::{
    CORNFLOWER_BLUE, ERROR_RED, GOLD, MUTED_GRAY, PANEL_BG, SOFT_WHITE, WARNING_YELLOW,
};

pub struct SignInComponent;

impl SignInComponent {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, state: &SignInState) {
        frame.render_widget(Clear, area);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(CORNFLOWER_BLUE))
            .title(" Sign in ")
            .title_alignment(Alignment::Center)
            .style(Style::default().bg(PANEL_BG));

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Length(3), // Email
                Constraint::Length(3), // Password
                Constraint::Min(2),    // Status
                Constraint::Length(1), // Instructions
            ])
            .split(inner);

        let masked = "•".repeat(state.password.chars().count());
        self.render_input(
            frame,
            chunks[0],
            "Email",
            &state.email,
            state.focus == SignInField::Email,
            state.email_error.as_deref(),
        );
        self.render_input(
            frame,
            chunks[1],
            "Password",
            &masked,
            state.focus == SignInField::Password,
            state.password_error.as_deref(),
        );

        let status = if state.loading {
            Paragraph::new("Signing in…").style(Style::default().fg(WARNING_YELLOW))
        } else if let Some(error) = &state.general_error {
            Paragraph::new(error.as_str()).style(Style::default().fg(ERROR_RED))
        } else {
            Paragraph::new("")
        };
        frame.render_widget(status.alignment(Alignment::Center).wrap(Wrap { trim: true }), chunks[2]);

        let instructions = Paragraph::new("Tab: Switch field • Enter: Sign in • Esc: Back")
            .style(Style::default().fg(MUTED_GRAY))
            .alignment(Alignment::Center);
        frame.render_widget(instructions, chunks[3]);
    }

    fn render_input(
        &self,
        frame: &mut Frame,
        area: Rect,
        label: &str,
        value: &str,
        focused: bool,
        error: Option<&str>,
    ) {
        let border = if error.is_some() {
            ERROR_RED
        } else if focused {
            GOLD
        } else {
            MUTED_GRAY
        };
        let title = match error {
            Some(err) => format!(" {label} · {err} "),
            None => format!(" {label} "),
        };
        let cursor = if focused { "▏" } else { "" };

        let input = Paragraph::new(format!("{value}{cursor}"))
            .style(Style::default().fg(SOFT_WHITE))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(border))
                    .title(title),
            );
        frame.render_widget(input, area);
    }
}
