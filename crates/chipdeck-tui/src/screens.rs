// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Form-step state machines for the create, delete and query screens.
//!
//! Each wizard owns its widgets and turns keys into a [`WizardAction`]; the
//! driver performs the engine calls and navigation the action asks for.

use chipdeck_app::{Chip, ChipId, NewChip, QueryRequest, SelectList, chip_columns, fit_cell};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

pub(crate) const CHECKBOX_WIDTH: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum WizardAction {
    None,
    Status(String),
    /// Leave the screen (Esc on the first step).
    Cancel,
    LoadTables(String),
    CreateChip(NewChip),
    DeleteChips(Vec<ChipId>),
    RunQuery(QueryRequest),
}

/// What the main panel shows for a wizard step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct WizardView {
    pub title: String,
    pub lines: Vec<String>,
    /// Index into `lines` drawn highlighted.
    pub highlight: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct TextInput {
    value: String,
}

impl TextInput {
    pub(crate) fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    pub(crate) fn value(&self) -> &str {
        &self.value
    }

    /// Returns true when the key edited the value.
    pub(crate) fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.value.clear();
                true
            }
            KeyCode::Char(ch)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                self.value.push(ch);
                true
            }
            KeyCode::Backspace => self.value.pop().is_some(),
            _ => false,
        }
    }

    pub(crate) fn render(&self, label: &str) -> String {
        format!("{label}: {}▏", self.value)
    }
}

pub(crate) fn list_delta(key: KeyEvent) -> Option<isize> {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => Some(1),
        KeyCode::Char('k') | KeyCode::Up => Some(-1),
        KeyCode::PageDown => Some(10),
        KeyCode::PageUp => Some(-10),
        _ => None,
    }
}

fn is_confirm(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Enter | KeyCode::Char('y'))
}

fn list_lines<T>(
    list: &SelectList<T>,
    rows: usize,
    checkboxes: bool,
    label: impl Fn(&T) -> String,
) -> (Vec<String>, Option<usize>) {
    let mut highlight = None;
    let lines = list
        .visible(rows)
        .enumerate()
        .map(|(line, (index, item))| {
            if index == list.cursor() {
                highlight = Some(line);
            }
            let marker = match (checkboxes, list.is_checked(index)) {
                (false, _) if index == list.cursor() => "> ",
                (false, _) => "  ",
                (true, true) => "[x] ",
                (true, false) => "[ ] ",
            };
            format!("{marker}{}", label(item))
        })
        .collect();
    (lines, highlight)
}

fn offset_highlight(highlight: Option<usize>, by: usize) -> Option<usize> {
    highlight.map(|line| line + by)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CreateStep {
    Name,
    Database,
    Tables,
    Description,
    Confirm,
}

impl CreateStep {
    const fn label(self) -> &'static str {
        match self {
            Self::Name => "1/5 name",
            Self::Database => "2/5 database",
            Self::Tables => "3/5 tables",
            Self::Description => "4/5 description",
            Self::Confirm => "5/5 confirm",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CreateChipWizard {
    step: CreateStep,
    name: TextInput,
    databases: SelectList<String>,
    tables: SelectList<String>,
    tables_loaded_for: Option<String>,
    description: TextInput,
}

impl CreateChipWizard {
    pub(crate) fn new(databases: Vec<String>) -> Self {
        Self {
            step: CreateStep::Name,
            name: TextInput::default(),
            databases: SelectList::new(databases),
            tables: SelectList::default(),
            tables_loaded_for: None,
            description: TextInput::default(),
        }
    }

    pub(crate) const fn step(&self) -> CreateStep {
        self.step
    }

    pub(crate) fn input_active(&self) -> bool {
        matches!(self.step, CreateStep::Name | CreateStep::Description)
    }

    pub(crate) fn set_databases(&mut self, databases: Vec<String>) {
        self.databases.set_items_by(databases, String::clone);
    }

    fn selected_database(&self) -> Option<&str> {
        self.databases.selected().map(String::as_str)
    }

    /// Installs table names for `database`; ignored if the user has since
    /// picked another database.
    pub(crate) fn set_tables(&mut self, database: &str, tables: Vec<String>) {
        if self.selected_database() != Some(database) {
            return;
        }
        if self.tables_loaded_for.as_deref() != Some(database) {
            self.tables = SelectList::new(tables);
            self.tables_loaded_for = Some(database.to_owned());
        }
    }

    pub(crate) fn draft(&self) -> NewChip {
        NewChip {
            name: self.name.value().trim().to_owned(),
            database: self.selected_database().unwrap_or_default().to_owned(),
            tables: self.tables.checked_items().into_iter().cloned().collect(),
            description: self.description.value().trim().to_owned(),
        }
    }

    pub(crate) fn handle_key(&mut self, key: KeyEvent, rows: usize) -> WizardAction {
        match self.step {
            CreateStep::Name => match key.code {
                KeyCode::Esc => WizardAction::Cancel,
                KeyCode::Enter => {
                    let name = self.name.value().trim();
                    if name.is_empty() {
                        return WizardAction::Status("chip name is required".to_owned());
                    }
                    if name.chars().any(char::is_whitespace) {
                        return WizardAction::Status(
                            "chip name must not contain whitespace".to_owned(),
                        );
                    }
                    self.step = CreateStep::Database;
                    WizardAction::None
                }
                _ => {
                    self.name.handle_key(key);
                    WizardAction::None
                }
            },
            CreateStep::Database => {
                if let Some(delta) = list_delta(key) {
                    self.databases.move_cursor(delta, rows);
                    return WizardAction::None;
                }
                match key.code {
                    KeyCode::Esc => {
                        self.step = CreateStep::Name;
                        WizardAction::None
                    }
                    KeyCode::Enter => {
                        let Some(database) = self.selected_database().map(str::to_owned) else {
                            return WizardAction::Status(
                                "no databases to choose from; press r to reload".to_owned(),
                            );
                        };
                        self.step = CreateStep::Tables;
                        if self.tables_loaded_for.as_deref() != Some(database.as_str()) {
                            self.tables = SelectList::default();
                        }
                        WizardAction::LoadTables(database)
                    }
                    _ => WizardAction::None,
                }
            }
            CreateStep::Tables => {
                if let Some(delta) = list_delta(key) {
                    self.tables.move_cursor(delta, rows);
                    return WizardAction::None;
                }
                match key.code {
                    KeyCode::Esc => {
                        self.step = CreateStep::Database;
                        WizardAction::None
                    }
                    KeyCode::Char(' ') => {
                        self.tables.toggle_checked();
                        WizardAction::None
                    }
                    KeyCode::Enter => {
                        if self.tables.checked_count() == 0 {
                            return WizardAction::Status(
                                "select at least one table (space toggles)".to_owned(),
                            );
                        }
                        self.step = CreateStep::Description;
                        WizardAction::None
                    }
                    _ => WizardAction::None,
                }
            }
            CreateStep::Description => match key.code {
                KeyCode::Esc => {
                    self.step = CreateStep::Tables;
                    WizardAction::None
                }
                KeyCode::Enter => {
                    self.step = CreateStep::Confirm;
                    WizardAction::None
                }
                _ => {
                    self.description.handle_key(key);
                    WizardAction::None
                }
            },
            CreateStep::Confirm => {
                if is_confirm(key) {
                    let draft = self.draft();
                    return match draft.validate() {
                        Ok(()) => WizardAction::CreateChip(draft),
                        Err(error) => WizardAction::Status(error.to_string()),
                    };
                }
                if matches!(key.code, KeyCode::Esc | KeyCode::Char('n')) {
                    self.step = CreateStep::Description;
                }
                WizardAction::None
            }
        }
    }

    pub(crate) fn view(&self, rows: usize, tables_loading: bool) -> WizardView {
        let title = format!("new chip {}", self.step.label());
        let list_rows = rows.saturating_sub(2);
        let (lines, highlight) = match self.step {
            CreateStep::Name => (
                vec![
                    self.name.render("name"),
                    String::new(),
                    "enter next | esc cancel".to_owned(),
                ],
                None,
            ),
            CreateStep::Database => {
                let (mut lines, highlight) =
                    list_lines(&self.databases, list_rows, false, String::clone);
                if lines.is_empty() {
                    lines.push("no databases loaded".to_owned());
                }
                lines.insert(0, "pick a database (j/k, enter)".to_owned());
                lines.insert(1, String::new());
                (lines, offset_highlight(highlight, 2))
            }
            CreateStep::Tables => {
                let header = format!(
                    "tables in {} ({} selected; space toggles)",
                    self.selected_database().unwrap_or_default(),
                    self.tables.checked_count()
                );
                if tables_loading && self.tables.is_empty() {
                    (vec![header, String::new(), "loading…".to_owned()], None)
                } else {
                    let (mut lines, highlight) =
                        list_lines(&self.tables, list_rows, true, String::clone);
                    lines.insert(0, header);
                    lines.insert(1, String::new());
                    (lines, offset_highlight(highlight, 2))
                }
            }
            CreateStep::Description => (
                vec![
                    self.description.render("description (optional)"),
                    String::new(),
                    "enter next | esc back".to_owned(),
                ],
                None,
            ),
            CreateStep::Confirm => {
                let draft = self.draft();
                (
                    vec![
                        format!("name:        {}", draft.name),
                        format!("database:    {}", draft.database),
                        format!("tables:      {}", draft.tables.join(", ")),
                        format!("description: {}", draft.description),
                        String::new(),
                        "create this chip? y/enter submit | n/esc back".to_owned(),
                    ],
                    None,
                )
            }
        };
        WizardView {
            title,
            lines,
            highlight,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DeleteStep {
    Select,
    Confirm,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DeleteChipsWizard {
    step: DeleteStep,
    chips: SelectList<Chip>,
}

impl DeleteChipsWizard {
    pub(crate) fn new(chips: Vec<Chip>, preselect: Option<ChipId>) -> Self {
        let mut list = SelectList::new(chips);
        if let Some(index) = preselect.and_then(|id| list.items().iter().position(|c| c.id == id))
        {
            list.move_cursor(index as isize, usize::MAX);
            list.toggle_checked();
        }
        Self {
            step: DeleteStep::Select,
            chips: list,
        }
    }

    pub(crate) const fn step(&self) -> DeleteStep {
        self.step
    }

    pub(crate) fn set_chips(&mut self, chips: Vec<Chip>) {
        self.chips.set_items_by(chips, |chip| chip.id);
        if self.chips.checked_count() == 0 {
            self.step = DeleteStep::Select;
        }
    }

    pub(crate) fn checked_ids(&self) -> Vec<ChipId> {
        self.chips
            .checked_items()
            .into_iter()
            .map(|chip| chip.id)
            .collect()
    }

    pub(crate) fn handle_key(&mut self, key: KeyEvent, rows: usize) -> WizardAction {
        match self.step {
            DeleteStep::Select => {
                if let Some(delta) = list_delta(key) {
                    self.chips.move_cursor(delta, rows);
                    return WizardAction::None;
                }
                match key.code {
                    KeyCode::Esc => WizardAction::Cancel,
                    KeyCode::Char(' ') => {
                        self.chips.toggle_checked();
                        WizardAction::None
                    }
                    KeyCode::Enter => {
                        if self.chips.checked_count() == 0 {
                            return WizardAction::Status(
                                "select at least one chip (space toggles)".to_owned(),
                            );
                        }
                        self.step = DeleteStep::Confirm;
                        WizardAction::None
                    }
                    _ => WizardAction::None,
                }
            }
            DeleteStep::Confirm => {
                if is_confirm(key) {
                    return WizardAction::DeleteChips(self.checked_ids());
                }
                if matches!(key.code, KeyCode::Esc | KeyCode::Char('n')) {
                    self.step = DeleteStep::Select;
                }
                WizardAction::None
            }
        }
    }

    pub(crate) fn view(&self, width: usize, rows: usize, show_optional: bool) -> WizardView {
        match self.step {
            DeleteStep::Select => {
                let layout = chip_columns(width, CHECKBOX_WIDTH, show_optional);
                let mut highlight = None;
                let mut lines = vec![layout.render_header()];
                if self.chips.is_empty() {
                    lines.push("no chips to delete".to_owned());
                }
                for (line, (index, chip)) in
                    self.chips.visible(rows.saturating_sub(1)).enumerate()
                {
                    if index == self.chips.cursor() {
                        highlight = Some(line + 1);
                    }
                    let mark = if self.chips.is_checked(index) {
                        "[x]"
                    } else {
                        "[ ]"
                    };
                    lines.push(layout.render_chip(mark, chip));
                }
                WizardView {
                    title: format!("delete chips ({} selected)", self.chips.checked_count()),
                    lines,
                    highlight,
                }
            }
            DeleteStep::Confirm => {
                let mut lines = vec![format!(
                    "delete {} chip(s)? this cannot be undone",
                    self.chips.checked_count()
                )];
                lines.push(String::new());
                lines.extend(
                    self.chips
                        .checked_items()
                        .into_iter()
                        .map(|chip| format!("  {} {}", fit_cell(&chip.id.to_string(), 5), chip.name)),
                );
                lines.push(String::new());
                lines.push("y/enter delete | n/esc back".to_owned());
                WizardView {
                    title: "delete chips confirm".to_owned(),
                    lines,
                    highlight: None,
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum QueryStep {
    Database,
    Sql,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct QueryWizard {
    step: QueryStep,
    databases: SelectList<String>,
    preselect: Option<String>,
    chip: Option<ChipId>,
    sql: TextInput,
}

impl QueryWizard {
    pub(crate) fn new(
        databases: Vec<String>,
        preselect: Option<&str>,
        chip: Option<ChipId>,
    ) -> Self {
        let mut wizard = Self {
            step: QueryStep::Database,
            databases: SelectList::default(),
            preselect: preselect.map(str::to_owned),
            chip,
            sql: TextInput::default(),
        };
        wizard.set_databases(databases);
        wizard
    }

    pub(crate) const fn step(&self) -> QueryStep {
        self.step
    }

    pub(crate) fn input_active(&self) -> bool {
        self.step == QueryStep::Sql
    }

    /// Keeps the cursor on the pre-filled database once the list arrives.
    pub(crate) fn set_databases(&mut self, databases: Vec<String>) {
        let fresh = self.databases.is_empty();
        self.databases.set_items_by(databases, String::clone);
        if fresh
            && let Some(wanted) = &self.preselect
            && let Some(index) = self.databases.items().iter().position(|db| db == wanted)
        {
            self.databases.move_cursor(index as isize, usize::MAX);
        }
    }

    pub(crate) fn handle_key(&mut self, key: KeyEvent, rows: usize) -> WizardAction {
        match self.step {
            QueryStep::Database => {
                if let Some(delta) = list_delta(key) {
                    self.databases.move_cursor(delta, rows);
                    return WizardAction::None;
                }
                match key.code {
                    KeyCode::Esc => WizardAction::Cancel,
                    KeyCode::Enter if self.databases.selected().is_some() => {
                        self.step = QueryStep::Sql;
                        WizardAction::None
                    }
                    KeyCode::Enter => WizardAction::Status(
                        "no databases to query; press r to reload".to_owned(),
                    ),
                    _ => WizardAction::None,
                }
            }
            QueryStep::Sql => match key.code {
                KeyCode::Esc => {
                    self.step = QueryStep::Database;
                    WizardAction::None
                }
                KeyCode::Enter => {
                    let sql = self.sql.value().trim();
                    if sql.is_empty() {
                        return WizardAction::Status("type a query first".to_owned());
                    }
                    let database = self.databases.selected().cloned().unwrap_or_default();
                    WizardAction::RunQuery(QueryRequest {
                        database,
                        chip: self.chip,
                        sql: sql.to_owned(),
                    })
                }
                _ => {
                    self.sql.handle_key(key);
                    WizardAction::None
                }
            },
        }
    }

    pub(crate) fn view(&self, rows: usize) -> WizardView {
        let scope = match self.chip {
            Some(chip) => format!(" on chip {chip}"),
            None => String::new(),
        };
        match self.step {
            QueryStep::Database => {
                let (mut lines, highlight) =
                    list_lines(&self.databases, rows.saturating_sub(2), false, String::clone);
                if lines.is_empty() {
                    lines.push("no databases loaded".to_owned());
                }
                lines.insert(0, format!("query{scope}: pick a database (j/k, enter)"));
                lines.insert(1, String::new());
                WizardView {
                    title: "query 1/2 database".to_owned(),
                    lines,
                    highlight: offset_highlight(highlight, 2),
                }
            }
            QueryStep::Sql => WizardView {
                title: "query 2/2 sql".to_owned(),
                lines: vec![
                    format!(
                        "database: {}{scope}",
                        self.databases.selected().map(String::as_str).unwrap_or("-")
                    ),
                    String::new(),
                    self.sql.render("sql"),
                    String::new(),
                    "enter run | ctrl+u clear | esc back".to_owned(),
                ],
                highlight: None,
            },
        }
    }
}
