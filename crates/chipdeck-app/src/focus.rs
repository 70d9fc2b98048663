// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Panel {
    Main,
    SidebarPrimary,
    SidebarSecondary,
}

impl Panel {
    pub const ALL: [Self; 3] = [Self::Main, Self::SidebarPrimary, Self::SidebarSecondary];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Main => "main",
            Self::SidebarPrimary => "databases",
            Self::SidebarSecondary => "chips",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusCommand {
    Next,
    Previous,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusOutcome {
    Moved(Panel),
    /// A text-entry step owns the keyboard; the key belongs to it.
    Suppressed,
}

/// Decides which panel receives keystrokes.
///
/// The active screen reports `input_active` while a text field is being
/// edited. Cycle commands are refused here rather than by callers, so the
/// global key router can pass every raw key through the controller first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusController {
    current: Panel,
    order: Vec<Panel>,
    input_active: bool,
}

impl Default for FocusController {
    fn default() -> Self {
        Self::new(Panel::ALL.to_vec())
    }
}

impl FocusController {
    /// `order` must be non-empty; an empty order falls back to `Main` only.
    pub fn new(order: Vec<Panel>) -> Self {
        let order = if order.is_empty() {
            vec![Panel::Main]
        } else {
            order
        };
        Self {
            current: order[0],
            order,
            input_active: false,
        }
    }

    pub const fn current(&self) -> Panel {
        self.current
    }

    pub fn is_focused(&self, panel: Panel) -> bool {
        self.current == panel
    }

    pub const fn input_active(&self) -> bool {
        self.input_active
    }

    pub fn set_input_active(&mut self, active: bool) {
        self.input_active = active;
    }

    pub fn cycle(&mut self, command: FocusCommand) -> FocusOutcome {
        if self.input_active {
            return FocusOutcome::Suppressed;
        }

        let delta = match command {
            FocusCommand::Next => 1,
            FocusCommand::Previous => -1,
        };
        let current = self
            .order
            .iter()
            .position(|panel| *panel == self.current)
            .unwrap_or(0) as isize;
        let len = self.order.len() as isize;
        let next = (current + delta).rem_euclid(len) as usize;
        self.current = self.order[next];
        FocusOutcome::Moved(self.current)
    }

    pub fn focus_next(&mut self) -> FocusOutcome {
        self.cycle(FocusCommand::Next)
    }

    pub fn focus_previous(&mut self) -> FocusOutcome {
        self.cycle(FocusCommand::Previous)
    }

    /// Direct jumps are not gated by `input_active`; screen transitions use
    /// them to land deterministically on a panel.
    pub fn focus_panel(&mut self, panel: Panel) {
        if self.order.contains(&panel) {
            self.current = panel;
        }
    }
}
