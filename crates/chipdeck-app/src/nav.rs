// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScreenId {
    Connect,
    Home,
    Database,
    Table,
    CreateChip,
    DeleteChips,
    Query,
    QueryResult,
}

impl ScreenId {
    pub const fn title(self) -> &'static str {
        match self {
            Self::Connect => "connect",
            Self::Home => "home",
            Self::Database => "database",
            Self::Table => "table",
            Self::CreateChip => "new chip",
            Self::DeleteChips => "delete chips",
            Self::Query => "query",
            Self::QueryResult => "results",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParamValue {
    Text(String),
    Int(i64),
    Bool(bool),
    List(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Params(BTreeMap<String, ParamValue>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: ParamValue) -> Self {
        self.0.insert(key.to_owned(), value);
        self
    }

    pub fn with_text(self, key: &str, value: impl Into<String>) -> Self {
        self.with(key, ParamValue::Text(value.into()))
    }

    pub fn with_int(self, key: &str, value: i64) -> Self {
        self.with(key, ParamValue::Int(value))
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.0.get(key)
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        match self.0.get(key) {
            Some(ParamValue::Text(value)) => Some(value),
            _ => None,
        }
    }

    pub fn int(&self, key: &str) -> Option<i64> {
        match self.0.get(key) {
            Some(ParamValue::Int(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn flag(&self, key: &str) -> bool {
        matches!(self.0.get(key), Some(ParamValue::Bool(true)))
    }

    pub fn list(&self, key: &str) -> &[String] {
        match self.0.get(key) {
            Some(ParamValue::List(values)) => values,
            _ => &[],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NavigationEntry {
    pub screen: ScreenId,
    pub params: Params,
}

impl NavigationEntry {
    pub fn new(screen: ScreenId, params: Params) -> Self {
        Self { screen, params }
    }

    /// Header label, e.g. `table sales.orders`.
    pub fn label(&self) -> String {
        let subject = match (self.params.text("database"), self.params.text("table")) {
            (Some(database), Some(table)) => Some(format!("{database}.{table}")),
            (Some(database), None) => Some(database.to_owned()),
            _ => None,
        };
        match subject {
            Some(subject) => format!("{} {subject}", self.screen.title()),
            None => self.screen.title().to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavEvent {
    Pushed(ScreenId),
    Popped(ScreenId),
    Reset(ScreenId),
}

impl NavEvent {
    /// Screen that is current after the mutation.
    pub const fn screen(&self) -> ScreenId {
        match self {
            Self::Pushed(screen) | Self::Popped(screen) | Self::Reset(screen) => *screen,
        }
    }
}

/// Screen history. Never empty: the root entry cannot be popped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationStack {
    entries: Vec<NavigationEntry>,
}

impl NavigationStack {
    pub fn new(screen: ScreenId) -> Self {
        Self {
            entries: vec![NavigationEntry::new(screen, Params::new())],
        }
    }

    pub fn push(&mut self, screen: ScreenId, params: Params) -> NavEvent {
        self.entries.push(NavigationEntry::new(screen, params));
        NavEvent::Pushed(screen)
    }

    /// Returns `None` when only the root remains.
    pub fn pop(&mut self) -> Option<NavEvent> {
        if self.entries.len() <= 1 {
            return None;
        }
        self.entries.pop();
        Some(NavEvent::Popped(self.current().screen))
    }

    pub fn reset_to(&mut self, screen: ScreenId) -> NavEvent {
        self.entries.clear();
        self.entries.push(NavigationEntry::new(screen, Params::new()));
        NavEvent::Reset(screen)
    }

    pub fn current(&self) -> &NavigationEntry {
        // Non-empty by construction; every mutation leaves one entry.
        &self.entries[self.entries.len() - 1]
    }

    pub fn depth(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[NavigationEntry] {
        &self.entries
    }

    pub fn breadcrumb(&self) -> String {
        self.entries
            .iter()
            .map(NavigationEntry::label)
            .collect::<Vec<_>>()
            .join(" > ")
    }
}

#[cfg(test)]
mod tests {
    use super::{NavEvent, NavigationStack, ParamValue, Params, ScreenId};

    #[test]
    fn pop_on_root_is_noop() {
        let mut stack = NavigationStack::new(ScreenId::Home);
        let before = stack.clone();

        assert_eq!(stack.pop(), None);
        assert_eq!(stack, before);
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn pop_removes_exactly_one_entry() {
        let mut stack = NavigationStack::new(ScreenId::Home);
        for depth in 0..6 {
            stack.push(ScreenId::Database, Params::new().with_int("n", depth));
        }

        while stack.depth() > 1 {
            let depth = stack.depth();
            assert!(stack.pop().is_some());
            assert_eq!(stack.depth(), depth - 1);
        }
        assert_eq!(stack.current().screen, ScreenId::Home);
    }

    #[test]
    fn pop_reports_new_current_screen() {
        let mut stack = NavigationStack::new(ScreenId::Home);
        stack.push(ScreenId::Database, Params::new().with_text("database", "sales"));
        stack.push(ScreenId::Table, Params::new());

        assert_eq!(stack.pop(), Some(NavEvent::Popped(ScreenId::Database)));
        assert_eq!(stack.current().params.text("database"), Some("sales"));
    }

    #[test]
    fn reset_leaves_single_fresh_entry() {
        let mut stack = NavigationStack::new(ScreenId::Connect);
        stack.push(ScreenId::Home, Params::new());
        stack.push(ScreenId::Query, Params::new().with_text("database", "ops"));

        let event = stack.reset_to(ScreenId::Home);
        assert_eq!(event, NavEvent::Reset(ScreenId::Home));
        assert_eq!(stack.depth(), 1);
        assert!(stack.current().params.is_empty());
        assert_eq!(stack.pop(), None);
    }

    #[test]
    fn params_accessors_check_types() {
        let params = Params::new()
            .with_text("database", "sales")
            .with_int("chip", 7)
            .with("tables", ParamValue::List(vec!["orders".to_owned()]))
            .with("confirm", ParamValue::Bool(true));

        assert_eq!(params.text("database"), Some("sales"));
        assert_eq!(params.text("chip"), None);
        assert_eq!(params.int("chip"), Some(7));
        assert_eq!(params.list("tables"), ["orders".to_owned()]);
        assert!(params.list("missing").is_empty());
        assert!(params.flag("confirm"));
        assert!(!params.flag("database"));
    }

    #[test]
    fn breadcrumb_joins_entry_labels() {
        let mut stack = NavigationStack::new(ScreenId::Home);
        stack.push(ScreenId::Database, Params::new().with_text("database", "sales"));
        stack.push(
            ScreenId::Table,
            Params::new()
                .with_text("database", "sales")
                .with_text("table", "orders"),
        );

        assert_eq!(
            stack.breadcrumb(),
            "home > database sales > table sales.orders"
        );
    }
}
