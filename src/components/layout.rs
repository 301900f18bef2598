// ABOUTME: Main layout component choosing the active screen and drawing toasts on top

use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
};

use super::theme::{ERROR_RED, PANEL_BG, SELECTION_GREEN, SOFT_WHITE};
use super::{HomeComponent, RegistrationComponent, SignInComponent};
use crate::app::{AppState, ToastKind, View};

pub struct LayoutComponent {
    home: HomeComponent,
    registration: RegistrationComponent,
    sign_in: SignInComponent,
}

impl LayoutComponent {
    pub fn new(show_password_hints: bool) -> Self {
        Self {
            home: HomeComponent::new(),
            registration: RegistrationComponent::new(show_password_hints),
            sign_in: SignInComponent::new(),
        }
    }

    pub fn render(&self, frame: &mut Frame, state: &AppState) {
        let area = frame.size();
        match state.current_view {
            View::Home | View::Dashboard => self.home.render(frame, area, state),
            View::Registration => {
                self.registration
                    .render(frame, centered_rect(80, 90, area), &state.registration_state);
            }
            View::SignIn => {
                self.home.render(frame, area, state);
                self.sign_in
                    .render(frame, centered_rect(50, 50, area), &state.sign_in_state);
            }
        }

        if let Some(toast) = state.toasts.last() {
            Self::render_toast(frame, area, &toast.message, toast.kind);
        }
    }

    fn render_toast(frame: &mut Frame, area: Rect, message: &str, kind: ToastKind) {
        let width = area.width.min(60);
        let toast_area = Rect {
            x: area.x + area.width.saturating_sub(width + 1),
            y: area.y + 1,
            width,
            height: 3.min(area.height),
        };
        let color = match kind {
            ToastKind::Error => ERROR_RED,
            ToastKind::RegistrationSuccess | ToastKind::SignedIn | ToastKind::SignedOut => {
                SELECTION_GREEN
            }
        };

        frame.render_widget(Clear, toast_area);
        let toast = Paragraph::new(message)
            .style(Style::default().fg(SOFT_WHITE).bg(PANEL_BG))
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(color)),
            );
        frame.render_widget(toast, toast_area);
    }
}

/// Helper function to create a centered rect
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
