// ABOUTME: Registration wizard component
// Renders the step progress, the current step's fields with inline errors, and navigation hints

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::state::{FormField, RegistrationState, RegistrationStep};
use super::validation::MIN_PASSWORD_LEN;
use crate::components::theme::{
    CORNFLOWER_BLUE, DARK_BG, ERROR_RED, GOLD, MUTED_GRAY, PANEL_BG, SELECTION_GREEN, SOFT_WHITE,
    SUBDUED_BORDER, WARNING_YELLOW,
};

/// The registration wizard component
pub struct RegistrationComponent {
    show_password_hints: bool,
}

impl RegistrationComponent {
    pub fn new(show_password_hints: bool) -> Self {
        Self { show_password_hints }
    }

    /// Main render function
    pub fn render(&self, frame: &mut Frame, area: Rect, state: &RegistrationState) {
        frame.render_widget(Clear, area);
        frame.render_widget(Block::default().style(Style::default().bg(DARK_BG)), area);

        let general_height = state
            .errors
            .general
            .as_ref()
            .map_or(0, |msg| u16::try_from(msg.lines().count() + 3).unwrap_or(u16::MAX));

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5),              // Header with progress
                Constraint::Min(10),                // Fields
                Constraint::Length(general_height), // Submission message
                Constraint::Length(3),              // Navigation footer
            ])
            .split(area);

        self.render_header(frame, layout[0], state);
        self.render_fields(frame, layout[1], state);
        if general_height > 0 {
            self.render_general_error(frame, layout[2], state);
        }
        self.render_navigation(frame, layout[3], state);
    }

    fn render_header(&self, frame: &mut Frame, area: Rect, state: &RegistrationState) {
        let block = Block::default()
            .borders(Borders::BOTTOM)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(CORNFLOWER_BLUE))
            .style(Style::default().bg(PANEL_BG));

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let header_layout = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([Constraint::Length(1), Constraint::Length(1)])
            .split(inner);

        let title = Paragraph::new(Line::from(vec![
            Span::styled(
                format!("{} Registration", state.form.role.label()),
                Style::default().fg(GOLD).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  ·  Step {} of {}", state.position(), state.total_steps()),
                Style::default().fg(MUTED_GRAY),
            ),
        ]))
        .alignment(Alignment::Center);
        frame.render_widget(title, header_layout[0]);

        self.render_progress(frame, header_layout[1], state);
    }

    /// Render step progress dots
    fn render_progress(&self, frame: &mut Frame, area: Rect, state: &RegistrationState) {
        let steps = RegistrationStep::all();
        let current_idx = state.position() - 1;

        let mut spans = Vec::new();
        for (idx, step) in steps.iter().enumerate() {
            let (icon, style) = if idx < current_idx {
                ("●", Style::default().fg(SELECTION_GREEN))
            } else if idx == current_idx {
                ("◉", Style::default().fg(GOLD).add_modifier(Modifier::BOLD))
            } else {
                ("○", Style::default().fg(MUTED_GRAY))
            };

            spans.push(Span::styled(icon, style));
            spans.push(Span::raw(" "));
            spans.push(Span::styled(
                step.title(),
                if idx == current_idx {
                    Style::default().fg(SOFT_WHITE)
                } else {
                    Style::default().fg(MUTED_GRAY)
                },
            ));

            if idx < steps.len() - 1 {
                spans.push(Span::styled(" → ", Style::default().fg(SUBDUED_BORDER)));
            }
        }

        frame.render_widget(
            Paragraph::new(Line::from(spans)).alignment(Alignment::Center),
            area,
        );
    }

    fn render_fields(&self, frame: &mut Frame, area: Rect, state: &RegistrationState) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(SUBDUED_BORDER))
            .title(format!(" {} ", state.current_step.description()))
            .title_style(Style::default().fg(SOFT_WHITE))
            .style(Style::default().bg(PANEL_BG));

        let focused = state.focused();
        let mut lines = Vec::new();

        for field in state.current_step.fields() {
            let is_focused = *field == focused;
            let marker = if is_focused { "▸ " } else { "  " };
            let label_style = if is_focused {
                Style::default().fg(GOLD).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(SOFT_WHITE)
            };

            lines.push(Line::from(vec![
                Span::styled(marker, Style::default().fg(GOLD)),
                Span::styled(format!("{:<24}", field.label()), label_style),
                Span::styled(
                    Self::display_value(state, *field, is_focused),
                    Style::default().fg(SOFT_WHITE),
                ),
            ]));

            if let Some(error) = state.errors.get(*field) {
                lines.push(Line::from(Span::styled(
                    format!("    ✗ {error}"),
                    Style::default().fg(ERROR_RED),
                )));
            } else if is_focused && field.is_secret() && self.show_password_hints {
                lines.push(Line::from(Span::styled(
                    format!("    At least {MIN_PASSWORD_LEN} characters"),
                    Style::default().fg(MUTED_GRAY),
                )));
            }
        }

        let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
        frame.render_widget(paragraph, area);
    }

    fn display_value(state: &RegistrationState, field: FormField, is_focused: bool) -> String {
        let value = state.form.value(field);
        let shown = if field.is_secret() {
            "•".repeat(value.chars().count())
        } else if field.is_toggle() {
            format!("[{value}]")
        } else {
            value
        };

        if is_focused && !field.is_toggle() {
            format!("{shown}▏")
        } else {
            shown
        }
    }

    fn render_general_error(&self, frame: &mut Frame, area: Rect, state: &RegistrationState) {
        let Some(message) = state.errors.general.as_ref() else {
            return;
        };

        let mut lines: Vec<Line> = message
            .lines()
            .map(|l| Line::from(Span::styled(l.to_string(), Style::default().fg(ERROR_RED))))
            .collect();
        if state.show_sign_in_link {
            lines.push(Line::from(vec![
                Span::styled("Press ", Style::default().fg(MUTED_GRAY)),
                Span::styled("Ctrl+L", Style::default().fg(GOLD).add_modifier(Modifier::BOLD)),
                Span::styled(" to go to sign in", Style::default().fg(MUTED_GRAY)),
            ]));
        }

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(ERROR_RED));
        frame.render_widget(
            Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
            area,
        );
    }

    fn render_navigation(&self, frame: &mut Frame, area: Rect, state: &RegistrationState) {
        let key = |k: &'static str| Span::styled(k, Style::default().fg(GOLD));
        let text = |t: &'static str| Span::styled(t, Style::default().fg(MUTED_GRAY));

        let mut spans = vec![key("Tab"), text(" field  ")];
        if state.can_go_back() {
            spans.extend([key("PgUp"), text(" back  ")]);
        }
        if state.loading {
            spans.push(Span::styled("Submitting…", Style::default().fg(WARNING_YELLOW)));
        } else if state.is_final_step() {
            spans.extend([key("Enter"), text(" submit  ")]);
        } else {
            spans.extend([key("Enter"), text(" next  ")]);
        }
        spans.extend([key("Esc"), text(" cancel")]);

        let footer = Paragraph::new(Line::from(spans))
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::TOP)
                    .border_style(Style::default().fg(SUBDUED_BORDER)),
            );
        frame.render_widget(footer, area);
    }
}
