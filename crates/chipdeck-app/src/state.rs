// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::focus::{FocusController, FocusOutcome, Panel};
use crate::nav::{NavEvent, NavigationStack, Params, ScreenId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub nav: NavigationStack,
    pub focus: FocusController,
    pub status_line: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(ScreenId::Connect)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    Push(ScreenId, Params),
    Back,
    ResetTo(ScreenId),
    FocusNext,
    FocusPrev,
    FocusPanel(Panel),
    SetInputActive(bool),
    SetStatus(String),
    ClearStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    Navigated(NavEvent),
    AtRoot,
    FocusChanged(Panel),
    FocusSuppressed,
    StatusUpdated(String),
    StatusCleared,
}

impl AppState {
    pub fn new(root: ScreenId) -> Self {
        Self {
            nav: NavigationStack::new(root),
            focus: FocusController::default(),
            status_line: None,
        }
    }

    pub fn screen(&self) -> ScreenId {
        self.nav.current().screen
    }

    /// Applies `command` and returns the events the driver must handle
    /// before reading the next key.
    pub fn dispatch(&mut self, command: AppCommand) -> Vec<AppEvent> {
        match command {
            AppCommand::Push(screen, params) => {
                let event = self.nav.push(screen, params);
                self.after_navigation(event)
            }
            AppCommand::Back => match self.nav.pop() {
                Some(event) => self.after_navigation(event),
                None => vec![AppEvent::AtRoot],
            },
            AppCommand::ResetTo(screen) => {
                let event = self.nav.reset_to(screen);
                self.after_navigation(event)
            }
            AppCommand::FocusNext => Self::focus_event(self.focus.focus_next()),
            AppCommand::FocusPrev => Self::focus_event(self.focus.focus_previous()),
            AppCommand::FocusPanel(panel) => {
                self.focus.focus_panel(panel);
                vec![AppEvent::FocusChanged(self.focus.current())]
            }
            AppCommand::SetInputActive(active) => {
                self.focus.set_input_active(active);
                Vec::new()
            }
            AppCommand::SetStatus(message) => {
                self.status_line = Some(message.clone());
                vec![AppEvent::StatusUpdated(message)]
            }
            AppCommand::ClearStatus => {
                self.status_line = None;
                vec![AppEvent::StatusCleared]
            }
        }
    }

    fn after_navigation(&mut self, event: NavEvent) -> Vec<AppEvent> {
        // The new screen reports its own input state once it is mounted.
        self.focus.set_input_active(false);
        self.focus.focus_panel(Panel::Main);
        vec![
            AppEvent::Navigated(event),
            AppEvent::FocusChanged(Panel::Main),
        ]
    }

    fn focus_event(outcome: FocusOutcome) -> Vec<AppEvent> {
        match outcome {
            FocusOutcome::Moved(panel) => vec![AppEvent::FocusChanged(panel)],
            FocusOutcome::Suppressed => vec![AppEvent::FocusSuppressed],
        }
    }
}
