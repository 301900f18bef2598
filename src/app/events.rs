// ABOUTME: Event handling system for keyboard input and app actions

use crate::app::state::{AppState, AsyncAction, Route, View};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    Quit,
    OpenRegistration,
    OpenSignIn,
    SignOut,
    GoHome,
    // Registration wizard events
    RegistrationInputChar(char),
    RegistrationBackspace,
    RegistrationNextField,
    RegistrationPreviousField,
    RegistrationNextStep,
    RegistrationPreviousStep,
    RegistrationSubmit,
    RegistrationGoToSignIn,
    // Sign-in events
    SignInInputChar(char),
    SignInBackspace,
    SignInSwitchField,
    SignInSubmit,
}

pub struct EventHandler;

impl EventHandler {
    pub fn handle_key_event(key_event: KeyEvent, state: &mut AppState) -> Option<AppEvent> {
        if key_event.code == KeyCode::Char('c') && key_event.modifiers.contains(KeyModifiers::CONTROL) {
            return Some(AppEvent::Quit);
        }

        match state.current_view {
            View::Home | View::Dashboard => Self::handle_home_keys(key_event, state),
            View::Registration => Self::handle_registration_keys(key_event, state),
            View::SignIn => Self::handle_sign_in_keys(key_event, state),
        }
    }

    fn handle_home_keys(key_event: KeyEvent, state: &AppState) -> Option<AppEvent> {
        match key_event.code {
            KeyCode::Char('q') | KeyCode::Esc => Some(AppEvent::Quit),
            KeyCode::Char('r') if !state.is_signed_in() => Some(AppEvent::OpenRegistration),
            KeyCode::Char('s') if !state.is_signed_in() => Some(AppEvent::OpenSignIn),
            KeyCode::Char('o') if state.is_signed_in() => Some(AppEvent::SignOut),
            _ => None,
        }
    }

    fn handle_registration_keys(key_event: KeyEvent, state: &AppState) -> Option<AppEvent> {
        let wizard = &state.registration_state;
        // Input is frozen while a submission is in flight
        if wizard.loading {
            return None;
        }

        match key_event.code {
            // Enter only submits from the last step; before that it means "next"
            KeyCode::Enter if wizard.is_final_step() => Some(AppEvent::RegistrationSubmit),
            KeyCode::Enter | KeyCode::PageDown => Some(AppEvent::RegistrationNextStep),
            KeyCode::PageUp => Some(AppEvent::RegistrationPreviousStep),
            KeyCode::Tab | KeyCode::Down => Some(AppEvent::RegistrationNextField),
            KeyCode::BackTab | KeyCode::Up => Some(AppEvent::RegistrationPreviousField),
            KeyCode::Esc => Some(AppEvent::GoHome),
            KeyCode::Backspace => Some(AppEvent::RegistrationBackspace),
            KeyCode::Char('l') if key_event.modifiers.contains(KeyModifiers::CONTROL) => {
                wizard.show_sign_in_link.then_some(AppEvent::RegistrationGoToSignIn)
            }
            KeyCode::Char(c) if !key_event.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(AppEvent::RegistrationInputChar(c))
            }
            _ => None,
        }
    }

    fn handle_sign_in_keys(key_event: KeyEvent, state: &AppState) -> Option<AppEvent> {
        if state.sign_in_state.loading {
            return None;
        }

        match key_event.code {
            KeyCode::Enter => Some(AppEvent::SignInSubmit),
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                Some(AppEvent::SignInSwitchField)
            }
            KeyCode::Esc => Some(AppEvent::GoHome),
            KeyCode::Backspace => Some(AppEvent::SignInBackspace),
            KeyCode::Char(c) if !key_event.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(AppEvent::SignInInputChar(c))
            }
            _ => None,
        }
    }

    pub fn process_event(event: AppEvent, state: &mut AppState) {
        debug!("Processing event {:?}", event);
        match event {
            AppEvent::Quit => state.should_quit = true,
            AppEvent::OpenRegistration => state.navigate(Route::Register),
            AppEvent::OpenSignIn => state.navigate(Route::SignIn),
            AppEvent::SignOut => state.pending_async_action = Some(AsyncAction::SignOut),
            AppEvent::GoHome => state.navigate(Route::Home),
            AppEvent::RegistrationInputChar(c) => state.registration_state.input_char(c),
            AppEvent::RegistrationBackspace => state.registration_state.backspace(),
            AppEvent::RegistrationNextField => state.registration_state.focus_next(),
            AppEvent::RegistrationPreviousField => state.registration_state.focus_previous(),
            AppEvent::RegistrationNextStep => {
                state.registration_state.next();
            }
            AppEvent::RegistrationPreviousStep => {
                state.registration_state.previous();
            }
            AppEvent::RegistrationSubmit => state.request_registration_submit(),
            AppEvent::RegistrationGoToSignIn => state.navigate_to_sign_in_from_registration(),
            AppEvent::SignInInputChar(c) => state.sign_in_state.input_char(c),
            AppEvent::SignInBackspace => state.sign_in_state.backspace(),
            AppEvent::SignInSwitchField => state.sign_in_state.toggle_focus(),
            AppEvent::SignInSubmit => state.request_sign_in(),
        }
    }
}
