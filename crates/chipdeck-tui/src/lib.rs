// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod screens;

use anyhow::{Context, Result, anyhow};
use chipdeck_app::{
    AppCommand, AppEvent, AppState, Chip, ChipId, ColumnInfo, DatabaseInfo, EngineInfo,
    Grid, GridViewport, LoadOutcome, LoadStatus, Loader, NavEvent, NavigationEntry, NewChip,
    Panel, Params, QueryRequest, ResultSet, ScreenId, SelectList, TableInfo, Ticket,
    ViewportCommand, Window, chip_columns, columns_grid, tables_grid,
};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use screens::{
    CreateChipWizard, DeleteChipsWizard, QueryWizard, TextInput, WizardAction, list_delta,
};
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

const STATUS_CLEAR_AFTER: Duration = Duration::from_secs(4);
const SIDEBAR_PERCENT: u16 = 36;
const CHIP_CURSOR_WIDTH: usize = 2;

/// Which loader a fetch result belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Databases,
    Chips,
    Main,
    Tables,
    Action,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchRequest {
    Health,
    Databases,
    Tables { database: String },
    Columns { database: String, table: String },
    Chips,
    CreateChip(NewChip),
    DeleteChips(Vec<ChipId>),
    Query(QueryRequest),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fetched {
    Engine(EngineInfo),
    Databases(Vec<DatabaseInfo>),
    Tables(Vec<TableInfo>),
    Columns(Vec<ColumnInfo>),
    Chips(Vec<Chip>),
    Created(Chip),
    Deleted(usize),
    Rows(ResultSet),
}

impl Fetched {
    const fn kind(&self) -> &'static str {
        match self {
            Self::Engine(_) => "engine",
            Self::Databases(_) => "databases",
            Self::Tables(_) => "tables",
            Self::Columns(_) => "columns",
            Self::Chips(_) => "chips",
            Self::Created(_) => "created",
            Self::Deleted(_) => "deleted",
            Self::Rows(_) => "rows",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UiOptions {
    pub show_optional_columns: bool,
}

impl Default for UiOptions {
    fn default() -> Self {
        Self {
            show_optional_columns: true,
        }
    }
}

pub trait AppRuntime {
    fn base_url(&self) -> String;
    /// Points later fetches at `base_url`; fails on an unusable address.
    fn connect(&mut self, base_url: &str) -> Result<()>;
    fn fetch(&mut self, request: &FetchRequest) -> Result<Fetched>;
    /// Runs `request` and reports the outcome on `tx` tagged with the
    /// ticket's generation. The default runs inline on the caller's thread.
    fn spawn_fetch(
        &mut self,
        slot: Slot,
        ticket: Ticket,
        request: FetchRequest,
        tx: Sender<InternalEvent>,
    ) -> Result<()> {
        let result = self
            .fetch(&request)
            .map_err(|error| format!("{error:#}"));
        tx.send(InternalEvent::Fetched {
            slot,
            generation: ticket.generation,
            result,
        })
        .map_err(|_| anyhow!("fetch event channel closed"))?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternalEvent {
    ClearStatus {
        token: u64,
    },
    Fetched {
        slot: Slot,
        generation: u64,
        result: Result<Fetched, String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum MainContent {
    Engine(EngineInfo),
    Grid(Grid),
}

struct ScreenRegions {
    header: Rect,
    databases: Rect,
    chips: Rect,
    main: Rect,
    status: Rect,
}

fn screen_regions(area: Rect) -> ScreenRegions {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(area);
    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(SIDEBAR_PERCENT),
            Constraint::Percentage(100 - SIDEBAR_PERCENT),
        ])
        .split(rows[1]);
    let sidebar = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(body[0]);

    ScreenRegions {
        header: rows[0],
        databases: sidebar[0],
        chips: sidebar[1],
        main: body[1],
        status: rows[2],
    }
}

fn inner(area: Rect) -> Rect {
    Block::default().borders(Borders::ALL).inner(area)
}

/// Character sizes of the panels, refreshed before every draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Geometry {
    main: Window,
    sidebar_width: usize,
    database_rows: usize,
    chip_rows: usize,
}

impl Geometry {
    fn from_area(area: Rect) -> Self {
        let regions = screen_regions(area);
        let main = inner(regions.main);
        let databases = inner(regions.databases);
        let chips = inner(regions.chips);
        Self {
            main: Window::new(usize::from(main.width), usize::from(main.height)),
            sidebar_width: usize::from(chips.width),
            database_rows: usize::from(databases.height).max(1),
            // One line goes to the column header.
            chip_rows: usize::from(chips.height).saturating_sub(1).max(1),
        }
    }
}

impl Default for Geometry {
    fn default() -> Self {
        Self::from_area(Rect::new(0, 0, 120, 40))
    }
}

/// The mutation behind the action loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ActionKind {
    Create,
    Delete,
}

impl ActionKind {
    const fn of(request: &FetchRequest) -> Option<Self> {
        match request {
            FetchRequest::CreateChip(_) => Some(Self::Create),
            FetchRequest::DeleteChips(_) => Some(Self::Delete),
            _ => None,
        }
    }

    const fn verb(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Delete => "delete",
        }
    }
}

#[derive(Debug, Clone, Default)]
struct ViewData {
    options: UiOptions,
    geometry: Geometry,
    engine_url: String,
    engine: Option<EngineInfo>,
    connection_epoch: u64,
    connect_url: TextInput,
    databases: Loader<u64, Vec<DatabaseInfo>>,
    chips: Loader<u64, Vec<Chip>>,
    main: Loader<NavigationEntry, MainContent>,
    tables: Loader<String, Vec<TableInfo>>,
    action: Loader<u64, Fetched>,
    action_seq: u64,
    action_kind: Option<ActionKind>,
    database_list: SelectList<DatabaseInfo>,
    chip_list: SelectList<Chip>,
    grid: GridViewport,
    grid_cursor: usize,
    create: Option<CreateChipWizard>,
    delete: Option<DeleteChipsWizard>,
    query: Option<QueryWizard>,
    help_visible: bool,
    status_token: u64,
}

impl ViewData {
    fn new(options: UiOptions, base_url: String) -> Self {
        Self {
            options,
            connect_url: TextInput::new(base_url.clone()),
            engine_url: base_url,
            ..Self::default()
        }
    }

    fn any_loading(&self) -> bool {
        self.databases.loading()
            || self.chips.loading()
            || self.main.loading()
            || self.tables.loading()
            || self.action.loading()
    }
}

pub fn run_app<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    options: UiOptions,
) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let mut view_data = ViewData::new(options, runtime.base_url());
    let (internal_tx, internal_rx) = mpsc::channel();
    start_session(state, runtime, &mut view_data, &internal_tx);

    let mut result = Ok(());
    loop {
        process_internal_events(state, runtime, &mut view_data, &internal_tx, &internal_rx);

        match terminal.size() {
            Ok(size) => {
                view_data.geometry =
                    Geometry::from_area(Rect::new(0, 0, size.width, size.height));
            }
            Err(error) => {
                result = Err(error).context("read terminal size");
                break;
            }
        }

        if let Err(error) = terminal.draw(|frame| render(frame, state, &view_data)) {
            result = Err(error).context("draw frame");
            break;
        }

        let has_event = match event::poll(Duration::from_millis(120)).context("poll event") {
            Ok(has_event) => has_event,
            Err(error) => {
                result = Err(error);
                break;
            }
        };
        if has_event {
            match event::read().context("read event") {
                Ok(Event::Key(key)) => {
                    if handle_key_event(state, runtime, &mut view_data, &internal_tx, key) {
                        break;
                    }
                }
                Ok(_) => {}
                Err(error) => {
                    result = Err(error);
                    break;
                }
            }
        }
    }

    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    result
}

fn start_session<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
) {
    sync_input_claim(state, view_data);
    start_connect(state, runtime, view_data, tx);
}

fn process_internal_events<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    rx: &Receiver<InternalEvent>,
) {
    while let Ok(event) = rx.try_recv() {
        match event {
            InternalEvent::ClearStatus { token } if token == view_data.status_token => {
                state.dispatch(AppCommand::ClearStatus);
            }
            InternalEvent::ClearStatus { .. } => {}
            InternalEvent::Fetched {
                slot,
                generation,
                result,
            } => handle_fetched(state, runtime, view_data, tx, slot, generation, result),
        }
    }
}

fn unexpected(slot: Slot, fetched: &Fetched) -> String {
    format!("unexpected {} response for {slot:?}", fetched.kind())
}

fn handle_fetched<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    slot: Slot,
    generation: u64,
    result: Result<Fetched, String>,
) {
    match slot {
        Slot::Databases => {
            let result = result.and_then(|fetched| match fetched {
                Fetched::Databases(databases) => Ok(databases),
                other => Err(unexpected(slot, &other)),
            });
            if view_data.databases.apply(generation, result) == LoadOutcome::Applied {
                refresh_database_lists(view_data);
            }
        }
        Slot::Chips => {
            let result = result.and_then(|fetched| match fetched {
                Fetched::Chips(chips) => Ok(chips),
                other => Err(unexpected(slot, &other)),
            });
            if view_data.chips.apply(generation, result) == LoadOutcome::Applied {
                refresh_chip_lists(view_data);
            }
        }
        Slot::Main => {
            let content = result.and_then(|fetched| main_content(generation, fetched));
            if view_data.main.apply(generation, content) == LoadOutcome::Applied {
                on_main_applied(state, runtime, view_data, tx);
            }
        }
        Slot::Tables => {
            let result = result.and_then(|fetched| match fetched {
                Fetched::Tables(tables) => Ok(tables),
                other => Err(unexpected(slot, &other)),
            });
            if view_data.tables.apply(generation, result) != LoadOutcome::Applied {
                return;
            }
            if let Some(error) = view_data.tables.error().map(str::to_owned) {
                emit_status(state, view_data, tx, format!("loading tables failed: {error}"));
                return;
            }
            install_wizard_tables(view_data);
        }
        Slot::Action => {
            if view_data.action.apply(generation, result) == LoadOutcome::Applied {
                on_action_applied(state, runtime, view_data, tx);
            }
        }
    }
}

/// `identity` is the load generation, so each landed result set starts
/// scrolled to the top.
fn main_content(identity: u64, fetched: Fetched) -> Result<MainContent, String> {
    match fetched {
        Fetched::Engine(info) => Ok(MainContent::Engine(info)),
        Fetched::Tables(tables) => Ok(MainContent::Grid(tables_grid(identity, &tables))),
        Fetched::Columns(columns) => Ok(MainContent::Grid(columns_grid(identity, &columns))),
        Fetched::Rows(result) => Ok(MainContent::Grid(result.into_grid(identity))),
        other => Err(unexpected(Slot::Main, &other)),
    }
}

fn on_main_applied<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
) {
    match view_data.main.data() {
        Some(MainContent::Engine(info)) if state.screen() == ScreenId::Connect => {
            let info = info.clone();
            connected(state, runtime, view_data, tx, info);
        }
        Some(MainContent::Grid(grid)) => {
            view_data.grid.install(grid);
            view_data.grid_cursor = view_data
                .grid_cursor
                .min(grid.row_count().saturating_sub(1));
        }
        _ => {}
    }
}

fn connected<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    info: EngineInfo,
) {
    view_data.engine_url = runtime.base_url();
    tracing::info!(
        url = %view_data.engine_url,
        engine = %info.name,
        version = %info.version,
        "connected"
    );
    let message = format!("connected to {} {}", info.name, info.version);
    view_data.engine = Some(info);
    view_data.connection_epoch = view_data.connection_epoch.wrapping_add(1);
    dispatch_and_sync(
        state,
        runtime,
        view_data,
        tx,
        AppCommand::ResetTo(ScreenId::Home),
    );
    sync_sidebars(state, runtime, view_data, tx);
    emit_status(state, view_data, tx, message);
}

fn on_action_applied<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
) {
    if let Some(error) = view_data.action.error().map(str::to_owned) {
        let kind = view_data.action_kind;
        // A multi-delete can fail after removing some chips.
        if kind == Some(ActionKind::Delete) {
            reload_slot(state, runtime, view_data, tx, Slot::Chips);
        }
        let verb = kind.map_or("action", ActionKind::verb);
        emit_status(state, view_data, tx, format!("{verb} failed: {error}"));
        return;
    }

    let message = match view_data.action.data() {
        Some(Fetched::Created(chip)) => format!("created chip {}", chip.name),
        Some(Fetched::Deleted(count)) => format!("deleted {count} chip(s)"),
        Some(other) => unexpected(Slot::Action, other),
        None => return,
    };
    reload_slot(state, runtime, view_data, tx, Slot::Chips);
    dispatch_and_sync(state, runtime, view_data, tx, AppCommand::Back);
    emit_status(state, view_data, tx, message);
}

fn database_names(view_data: &ViewData) -> Vec<String> {
    view_data
        .databases
        .data()
        .map(|databases| databases.iter().map(|db| db.name.clone()).collect())
        .unwrap_or_default()
}

fn refresh_database_lists(view_data: &mut ViewData) {
    let databases = view_data.databases.data().cloned().unwrap_or_default();
    let names = databases
        .iter()
        .map(|db| db.name.clone())
        .collect::<Vec<_>>();
    view_data
        .database_list
        .set_items_by(databases, |db| db.name.clone());
    if let Some(wizard) = view_data.create.as_mut() {
        wizard.set_databases(names.clone());
    }
    if let Some(wizard) = view_data.query.as_mut() {
        wizard.set_databases(names);
    }
}

fn refresh_chip_lists(view_data: &mut ViewData) {
    let chips = view_data.chips.data().cloned().unwrap_or_default();
    if let Some(wizard) = view_data.delete.as_mut() {
        wizard.set_chips(chips.clone());
    }
    view_data.chip_list.set_items_by(chips, |chip| chip.id);
}

fn install_wizard_tables(view_data: &mut ViewData) {
    let (Some(database), Some(tables)) = (view_data.tables.key(), view_data.tables.data()) else {
        return;
    };
    let names = tables.iter().map(|table| table.name.clone()).collect();
    if let Some(wizard) = view_data.create.as_mut() {
        wizard.set_tables(database, names);
    }
}

fn spawn_fetch<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    slot: Slot,
    ticket: Ticket,
    request: FetchRequest,
) {
    tracing::debug!(?slot, generation = ticket.generation, ?request, "fetch");
    if let Err(error) = runtime.spawn_fetch(slot, ticket, request, tx.clone()) {
        let message = format!("{error:#}");
        handle_fetched(
            state,
            runtime,
            view_data,
            tx,
            slot,
            ticket.generation,
            Err(message),
        );
    }
}

fn start_connect<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
) {
    let url = view_data.connect_url.value().trim().to_owned();
    if let Err(error) = runtime.connect(&url) {
        emit_status(state, view_data, tx, format!("{error:#}"));
        return;
    }
    view_data.engine_url = runtime.base_url();
    tracing::info!(url = %view_data.engine_url, "connecting");
    let ticket = view_data.main.issue(state.nav.current().clone());
    spawn_fetch(
        state,
        runtime,
        view_data,
        tx,
        Slot::Main,
        ticket,
        FetchRequest::Health,
    );
}

fn sync_sidebars<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
) {
    let epoch = view_data.connection_epoch;
    if let Some(ticket) = view_data.databases.sync(epoch) {
        spawn_fetch(
            state,
            runtime,
            view_data,
            tx,
            Slot::Databases,
            ticket,
            FetchRequest::Databases,
        );
    }
    if let Some(ticket) = view_data.chips.sync(epoch) {
        spawn_fetch(
            state,
            runtime,
            view_data,
            tx,
            Slot::Chips,
            ticket,
            FetchRequest::Chips,
        );
    }
}

fn query_params(request: &QueryRequest) -> Params {
    let params = Params::new()
        .with_text("database", request.database.clone())
        .with_text("sql", request.sql.clone());
    match request.chip {
        Some(chip) => params.with_int("chip", chip.get()),
        None => params,
    }
}

/// What the main loader fetches for `entry`; `None` for screens that draw
/// from other loaders.
fn main_request(entry: &NavigationEntry) -> Option<FetchRequest> {
    let params = &entry.params;
    match entry.screen {
        ScreenId::Database => Some(FetchRequest::Tables {
            database: params.text("database")?.to_owned(),
        }),
        ScreenId::Table => Some(FetchRequest::Columns {
            database: params.text("database")?.to_owned(),
            table: params.text("table")?.to_owned(),
        }),
        ScreenId::QueryResult => Some(FetchRequest::Query(QueryRequest {
            database: params.text("database")?.to_owned(),
            chip: params.int("chip").map(ChipId::new),
            sql: params.text("sql")?.to_owned(),
        })),
        ScreenId::Connect
        | ScreenId::Home
        | ScreenId::CreateChip
        | ScreenId::DeleteChips
        | ScreenId::Query => None,
    }
}

fn sync_main<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
) {
    let entry = state.nav.current().clone();
    let Some(request) = main_request(&entry) else {
        view_data.main.unmount();
        return;
    };
    if let Some(ticket) = view_data.main.sync(entry) {
        view_data.grid_cursor = 0;
        spawn_fetch(state, runtime, view_data, tx, Slot::Main, ticket, request);
    }
}

fn reload_slot<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    slot: Slot,
) -> bool {
    let (ticket, request) = match slot {
        Slot::Databases => (view_data.databases.reload(), Some(FetchRequest::Databases)),
        Slot::Chips => (view_data.chips.reload(), Some(FetchRequest::Chips)),
        Slot::Main => {
            let request = main_request(state.nav.current());
            let ticket = request.as_ref().and_then(|_| view_data.main.reload());
            (ticket, request)
        }
        Slot::Tables => {
            let request = view_data
                .tables
                .key()
                .map(|database| FetchRequest::Tables {
                    database: database.clone(),
                });
            (view_data.tables.reload(), request)
        }
        Slot::Action => (None, None),
    };
    match (ticket, request) {
        (Some(ticket), Some(request)) => {
            spawn_fetch(state, runtime, view_data, tx, slot, ticket, request);
            true
        }
        _ => false,
    }
}

fn reload_focused<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
) {
    let reloaded = match state.focus.current() {
        Panel::SidebarPrimary => reload_slot(state, runtime, view_data, tx, Slot::Databases),
        Panel::SidebarSecondary => reload_slot(state, runtime, view_data, tx, Slot::Chips),
        Panel::Main => match state.screen() {
            ScreenId::Connect => {
                start_connect(state, runtime, view_data, tx);
                return;
            }
            ScreenId::Home => {
                let databases = reload_slot(state, runtime, view_data, tx, Slot::Databases);
                let chips = reload_slot(state, runtime, view_data, tx, Slot::Chips);
                databases || chips
            }
            ScreenId::CreateChip => reload_slot(state, runtime, view_data, tx, Slot::Tables),
            _ => reload_slot(state, runtime, view_data, tx, Slot::Main),
        },
    };
    let message = if reloaded {
        "reloading"
    } else {
        "nothing to reload"
    };
    emit_status(state, view_data, tx, message);
}

fn dispatch_and_sync<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    command: AppCommand,
) {
    for event in state.dispatch(command) {
        if let AppEvent::Navigated(nav) = event {
            on_navigated(state, runtime, view_data, tx, nav);
        }
    }
}

fn on_navigated<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    nav: NavEvent,
) {
    tracing::debug!(?nav, breadcrumb = %state.nav.breadcrumb(), "navigated");
    // Action results only make sense on the screen that submitted them.
    view_data.action.unmount();
    if let NavEvent::Pushed(screen) | NavEvent::Reset(screen) = nav {
        open_wizard(state, view_data, screen);
    }
    prune_wizards(state, view_data);
    sync_main(state, runtime, view_data, tx);
    sync_input_claim(state, view_data);
}

fn open_wizard(state: &AppState, view_data: &mut ViewData, screen: ScreenId) {
    let params = &state.nav.current().params;
    let chip = params.int("chip").map(ChipId::new);
    match screen {
        ScreenId::CreateChip => {
            view_data.create = Some(CreateChipWizard::new(database_names(view_data)));
        }
        ScreenId::DeleteChips => {
            let chips = view_data.chips.data().cloned().unwrap_or_default();
            view_data.delete = Some(DeleteChipsWizard::new(chips, chip));
        }
        ScreenId::Query => {
            view_data.query = Some(QueryWizard::new(
                database_names(view_data),
                params.text("database"),
                chip,
            ));
        }
        _ => {}
    }
}

fn prune_wizards(state: &AppState, view_data: &mut ViewData) {
    let on_stack = |screen: ScreenId| {
        state
            .nav
            .entries()
            .iter()
            .any(|entry| entry.screen == screen)
    };
    if !on_stack(ScreenId::CreateChip) {
        view_data.create = None;
        view_data.tables.unmount();
    }
    if !on_stack(ScreenId::DeleteChips) {
        view_data.delete = None;
    }
    if !on_stack(ScreenId::Query) {
        view_data.query = None;
    }
}

fn screen_claims_input(state: &AppState, view_data: &ViewData) -> bool {
    match state.screen() {
        ScreenId::Connect => true,
        ScreenId::CreateChip => view_data
            .create
            .as_ref()
            .is_some_and(CreateChipWizard::input_active),
        ScreenId::Query => view_data
            .query
            .as_ref()
            .is_some_and(QueryWizard::input_active),
        _ => false,
    }
}

fn sync_input_claim(state: &mut AppState, view_data: &ViewData) {
    let claims = screen_claims_input(state, view_data);
    if state.focus.input_active() != claims {
        state.dispatch(AppCommand::SetInputActive(claims));
    }
}

fn schedule_status_clear(internal_tx: &Sender<InternalEvent>, token: u64) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(STATUS_CLEAR_AFTER);
        let _ = sender.send(InternalEvent::ClearStatus { token });
    });
}

fn emit_status(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    message: impl Into<String>,
) {
    state.dispatch(AppCommand::SetStatus(message.into()));
    view_data.status_token = view_data.status_token.saturating_add(1);
    schedule_status_clear(internal_tx, view_data.status_token);
}

/// Tab and Shift-Tab move focus before any screen sees the key. Returns
/// true when the key was consumed; a suppressed cycle falls through.
fn route_focus_key(state: &mut AppState, key: KeyEvent) -> bool {
    let command = match key.code {
        KeyCode::Tab if !key.modifiers.contains(KeyModifiers::SHIFT) => AppCommand::FocusNext,
        KeyCode::Tab | KeyCode::BackTab => AppCommand::FocusPrev,
        _ => return false,
    };
    state
        .dispatch(command)
        .iter()
        .any(|event| matches!(event, AppEvent::FocusChanged(_)))
}

fn is_wizard(screen: ScreenId) -> bool {
    matches!(
        screen,
        ScreenId::CreateChip | ScreenId::DeleteChips | ScreenId::Query
    )
}

fn handle_key_event<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    if key.code == KeyCode::Char('q') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }

    if view_data.help_visible {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?')) {
            view_data.help_visible = false;
        }
        return false;
    }

    if route_focus_key(state, key) {
        return false;
    }

    if state.focus.input_active() {
        handle_main_key(state, runtime, view_data, internal_tx, key);
        sync_input_claim(state, view_data);
        return false;
    }

    if !key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
    {
        let on_wizard_main = is_wizard(state.screen()) && state.focus.current() == Panel::Main;
        match key.code {
            KeyCode::Char('q') => return true,
            KeyCode::Char('?') => {
                view_data.help_visible = true;
                return false;
            }
            KeyCode::Char('r') => {
                reload_focused(state, runtime, view_data, internal_tx);
                return false;
            }
            KeyCode::Char('H') => {
                if require_connection(state, view_data, internal_tx) {
                    dispatch_and_sync(
                        state,
                        runtime,
                        view_data,
                        internal_tx,
                        AppCommand::ResetTo(ScreenId::Home),
                    );
                }
                return false;
            }
            KeyCode::Char('c') => {
                open_screen(
                    state,
                    runtime,
                    view_data,
                    internal_tx,
                    ScreenId::CreateChip,
                    Params::new(),
                );
                return false;
            }
            KeyCode::Char('d') => {
                let params = match focused_chip(state, view_data) {
                    Some(chip) => Params::new().with_int("chip", chip.id.get()),
                    None => Params::new(),
                };
                open_screen(
                    state,
                    runtime,
                    view_data,
                    internal_tx,
                    ScreenId::DeleteChips,
                    params,
                );
                return false;
            }
            KeyCode::Char('/') | KeyCode::Char('e') => {
                let params = query_wizard_params(state, view_data);
                open_screen(
                    state,
                    runtime,
                    view_data,
                    internal_tx,
                    ScreenId::Query,
                    params,
                );
                return false;
            }
            KeyCode::Esc if !on_wizard_main => {
                dispatch_and_sync(state, runtime, view_data, internal_tx, AppCommand::Back);
                return false;
            }
            _ => {}
        }
    }

    match state.focus.current() {
        Panel::SidebarPrimary => {
            handle_databases_key(state, runtime, view_data, internal_tx, key);
        }
        Panel::SidebarSecondary => {
            handle_chips_key(state, runtime, view_data, internal_tx, key);
        }
        Panel::Main => handle_main_key(state, runtime, view_data, internal_tx, key),
    }
    sync_input_claim(state, view_data);
    false
}

fn require_connection(
    state: &mut AppState,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
) -> bool {
    if view_data.engine.is_some() {
        return true;
    }
    emit_status(state, view_data, tx, "connect to an engine first");
    false
}

fn open_screen<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    screen: ScreenId,
    params: Params,
) {
    if !require_connection(state, view_data, tx) {
        return;
    }
    if state.screen() == screen {
        return;
    }
    dispatch_and_sync(
        state,
        runtime,
        view_data,
        tx,
        AppCommand::Push(screen, params),
    );
}

fn focused_chip<'a>(state: &AppState, view_data: &'a ViewData) -> Option<&'a Chip> {
    if state.focus.current() != Panel::SidebarSecondary {
        return None;
    }
    view_data.chip_list.selected()
}

fn query_wizard_params(state: &AppState, view_data: &ViewData) -> Params {
    if let Some(chip) = focused_chip(state, view_data) {
        return Params::new()
            .with_text("database", chip.database.clone())
            .with_int("chip", chip.id.get());
    }
    let database = match state.focus.current() {
        Panel::SidebarPrimary => view_data.database_list.selected().map(|db| db.name.clone()),
        _ => state.nav.current().params.text("database").map(str::to_owned),
    };
    match database {
        Some(database) => Params::new().with_text("database", database),
        None => Params::new(),
    }
}

fn handle_databases_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    if let Some(delta) = list_delta(key) {
        let rows = view_data.geometry.database_rows;
        view_data.database_list.move_cursor(delta, rows);
        return;
    }
    if key.code == KeyCode::Enter
        && let Some(database) = view_data.database_list.selected()
    {
        let params = Params::new().with_text("database", database.name.clone());
        dispatch_and_sync(
            state,
            runtime,
            view_data,
            tx,
            AppCommand::Push(ScreenId::Database, params),
        );
    }
}

fn handle_chips_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    if let Some(delta) = list_delta(key) {
        let rows = view_data.geometry.chip_rows;
        view_data.chip_list.move_cursor(delta, rows);
        return;
    }
    if key.code == KeyCode::Enter && view_data.chip_list.selected().is_some() {
        let params = query_wizard_params(state, view_data);
        open_screen(state, runtime, view_data, tx, ScreenId::Query, params);
    }
}

fn viewport_command_for_key(key: KeyEvent) -> Option<ViewportCommand> {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => Some(ViewportCommand::Up),
        KeyCode::Down | KeyCode::Char('j') => Some(ViewportCommand::Down),
        KeyCode::PageUp => Some(ViewportCommand::PageUp),
        KeyCode::PageDown => Some(ViewportCommand::PageDown),
        KeyCode::Left | KeyCode::Char('h') => Some(ViewportCommand::Left),
        KeyCode::Right | KeyCode::Char('l') => Some(ViewportCommand::Right),
        KeyCode::Home | KeyCode::Char('g') => Some(ViewportCommand::Top),
        KeyCode::End | KeyCode::Char('G') => Some(ViewportCommand::Bottom),
        _ => None,
    }
}

fn handle_main_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    let rows = view_data.geometry.main.height;
    let action = match state.screen() {
        ScreenId::Connect => {
            if key.code == KeyCode::Enter {
                if !view_data.main.loading() {
                    start_connect(state, runtime, view_data, tx);
                }
            } else {
                view_data.connect_url.handle_key(key);
            }
            return;
        }
        ScreenId::Home => return,
        ScreenId::Database => {
            handle_database_grid_key(state, runtime, view_data, tx, key);
            return;
        }
        ScreenId::Table | ScreenId::QueryResult => {
            let window = view_data.geometry.main;
            if let (Some(command), Some(MainContent::Grid(grid))) =
                (viewport_command_for_key(key), view_data.main.data())
            {
                view_data.grid.handle(command, grid, window);
            }
            return;
        }
        ScreenId::CreateChip => match view_data.create.as_mut() {
            Some(wizard) => wizard.handle_key(key, rows),
            None => return,
        },
        ScreenId::DeleteChips => match view_data.delete.as_mut() {
            Some(wizard) => wizard.handle_key(key, rows.saturating_sub(1)),
            None => return,
        },
        ScreenId::Query => match view_data.query.as_mut() {
            Some(wizard) => wizard.handle_key(key, rows),
            None => return,
        },
    };
    perform_wizard_action(state, runtime, view_data, tx, action);
}

/// The database screen keeps a row cursor for drilling into a table; the
/// viewport follows it.
fn handle_database_grid_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    let window = view_data.geometry.main;
    let Some(MainContent::Grid(grid)) = view_data.main.data() else {
        return;
    };
    let last = grid.row_count().saturating_sub(1);
    match key.code {
        KeyCode::Char('j') => {
            view_data.grid_cursor = (view_data.grid_cursor + 1).min(last);
            view_data.grid.reveal(view_data.grid_cursor, grid, window);
        }
        KeyCode::Char('k') => {
            view_data.grid_cursor = view_data.grid_cursor.saturating_sub(1);
            view_data.grid.reveal(view_data.grid_cursor, grid, window);
        }
        KeyCode::Enter => {
            let Some(table) = grid
                .rows()
                .get(view_data.grid_cursor)
                .and_then(|row| row.first())
                .cloned()
            else {
                return;
            };
            let database = state
                .nav
                .current()
                .params
                .text("database")
                .unwrap_or_default()
                .to_owned();
            let params = Params::new()
                .with_text("database", database)
                .with_text("table", table);
            dispatch_and_sync(
                state,
                runtime,
                view_data,
                tx,
                AppCommand::Push(ScreenId::Table, params),
            );
        }
        _ => {
            if let Some(command) = viewport_command_for_key(key) {
                view_data.grid.handle(command, grid, window);
                let visible = view_data.grid.visible_rows(grid, window);
                view_data.grid_cursor = view_data
                    .grid_cursor
                    .clamp(visible.start, visible.end.saturating_sub(1).max(visible.start));
            }
        }
    }
}

fn perform_wizard_action<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    action: WizardAction,
) {
    match action {
        WizardAction::None => {}
        WizardAction::Status(message) => emit_status(state, view_data, tx, message),
        WizardAction::Cancel => {
            dispatch_and_sync(state, runtime, view_data, tx, AppCommand::Back);
        }
        WizardAction::LoadTables(database) => {
            let request = FetchRequest::Tables {
                database: database.clone(),
            };
            match view_data.tables.sync(database) {
                Some(ticket) => {
                    spawn_fetch(state, runtime, view_data, tx, Slot::Tables, ticket, request);
                }
                None if view_data.tables.status() == LoadStatus::Failure => {
                    reload_slot(state, runtime, view_data, tx, Slot::Tables);
                }
                None => install_wizard_tables(view_data),
            }
        }
        WizardAction::CreateChip(chip) => {
            submit_action(state, runtime, view_data, tx, FetchRequest::CreateChip(chip));
        }
        WizardAction::DeleteChips(ids) => {
            submit_action(state, runtime, view_data, tx, FetchRequest::DeleteChips(ids));
        }
        WizardAction::RunQuery(request) => {
            dispatch_and_sync(
                state,
                runtime,
                view_data,
                tx,
                AppCommand::Push(ScreenId::QueryResult, query_params(&request)),
            );
        }
    }
}

fn submit_action<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    request: FetchRequest,
) {
    if view_data.action.loading() {
        emit_status(state, view_data, tx, "still submitting; wait for the engine");
        return;
    }
    view_data.action_seq = view_data.action_seq.wrapping_add(1);
    view_data.action_kind = ActionKind::of(&request);
    let ticket = view_data.action.issue(view_data.action_seq);
    emit_status(state, view_data, tx, "submitting…");
    spawn_fetch(state, runtime, view_data, tx, Slot::Action, ticket, request);
}

/// Title, lines and highlighted line of one panel.
#[derive(Debug, Clone, PartialEq, Eq)]
struct PanelView {
    title: String,
    lines: Vec<String>,
    highlight: Option<usize>,
}

impl PanelView {
    fn text(title: impl Into<String>, lines: Vec<String>) -> Self {
        Self {
            title: title.into(),
            lines,
            highlight: None,
        }
    }
}

fn loader_notice<K, T>(loader: &Loader<K, T>) -> Option<Vec<String>>
where
    K: Clone + PartialEq + std::fmt::Debug,
{
    if let Some(error) = loader.error() {
        return Some(vec![format!("error: {error}"), "r to retry".to_owned()]);
    }
    if loader.loading() && loader.data().is_none() {
        return Some(vec!["loading…".to_owned()]);
    }
    None
}

fn main_view(state: &AppState, view_data: &ViewData) -> PanelView {
    let entry = state.nav.current();
    let title = entry.label();
    match entry.screen {
        ScreenId::Connect => PanelView::text(title, connect_lines(view_data)),
        ScreenId::Home => PanelView::text(title, home_lines(view_data)),
        ScreenId::Database | ScreenId::Table | ScreenId::QueryResult => {
            grid_view(entry, title, view_data)
        }
        ScreenId::CreateChip => match &view_data.create {
            Some(wizard) => {
                let view = wizard.view(view_data.geometry.main.height, view_data.tables.loading());
                PanelView {
                    title: view.title,
                    lines: view.lines,
                    highlight: view.highlight,
                }
            }
            None => PanelView::text(title, Vec::new()),
        },
        ScreenId::DeleteChips => match &view_data.delete {
            Some(wizard) => {
                let window = view_data.geometry.main;
                let view = wizard.view(
                    window.width,
                    window.height,
                    view_data.options.show_optional_columns,
                );
                PanelView {
                    title: view.title,
                    lines: view.lines,
                    highlight: view.highlight,
                }
            }
            None => PanelView::text(title, Vec::new()),
        },
        ScreenId::Query => match &view_data.query {
            Some(wizard) => {
                let view = wizard.view(view_data.geometry.main.height);
                PanelView {
                    title: view.title,
                    lines: view.lines,
                    highlight: view.highlight,
                }
            }
            None => PanelView::text(title, Vec::new()),
        },
    }
}

fn connect_lines(view_data: &ViewData) -> Vec<String> {
    let mut lines = vec![
        "connect to a data engine".to_owned(),
        String::new(),
        view_data.connect_url.render("url"),
        String::new(),
    ];
    if view_data.main.loading() {
        lines.push("connecting…".to_owned());
    } else if let Some(error) = view_data.main.error() {
        lines.push(format!("error: {error}"));
    }
    lines.push(String::new());
    lines.push("enter connect | ctrl+u clear | ctrl+q quit".to_owned());
    lines
}

fn count_label<T>(loader: &Loader<u64, Vec<T>>) -> String {
    match (loader.data(), loader.loading()) {
        (Some(items), _) => items.len().to_string(),
        (None, true) => "…".to_owned(),
        (None, false) => "-".to_owned(),
    }
}

fn home_lines(view_data: &ViewData) -> Vec<String> {
    let engine = view_data
        .engine
        .as_ref()
        .map(|info| format!("{} {}", info.name, info.version))
        .unwrap_or_else(|| "-".to_owned());
    vec![
        format!("engine:    {engine}"),
        format!("url:       {}", view_data.engine_url),
        format!("databases: {}", count_label(&view_data.databases)),
        format!("chips:     {}", count_label(&view_data.chips)),
        String::new(),
        "tab focus panels | enter open | / query | c new chip | d delete chips".to_owned(),
        "r reload | esc back | H home | ? help | q quit".to_owned(),
    ]
}

fn grid_view(entry: &NavigationEntry, title: String, view_data: &ViewData) -> PanelView {
    if let Some(lines) = loader_notice(&view_data.main) {
        return PanelView::text(title, lines);
    }
    let Some(MainContent::Grid(grid)) = view_data.main.data() else {
        return PanelView::text(title, Vec::new());
    };

    let placeholder = match entry.screen {
        ScreenId::Database => "no tables in this database",
        ScreenId::Table => "table has no columns",
        _ => "query returned no rows",
    };
    let window = view_data.geometry.main;
    let lines = view_data.grid.render(grid, window, placeholder);
    let highlight = (entry.screen == ScreenId::Database && grid.row_count() > 0).then(|| {
        let visible = view_data.grid.visible_rows(grid, window);
        // Header and separator precede the data rows.
        2 + view_data.grid_cursor.saturating_sub(visible.start)
    });
    let title = if view_data.main.loading() {
        format!("{title} (reloading)")
    } else {
        title
    };
    PanelView {
        title,
        lines,
        highlight,
    }
}

fn databases_view(state: &AppState, view_data: &ViewData) -> PanelView {
    let focused = state.focus.is_focused(Panel::SidebarPrimary);
    let title = format!("databases ({})", count_label(&view_data.databases));
    if view_data.engine.is_none() {
        return PanelView::text(title, vec!["not connected".to_owned()]);
    }
    if let Some(lines) = loader_notice(&view_data.databases) {
        return PanelView::text(title, lines);
    }
    let list = &view_data.database_list;
    let mut highlight = None;
    let lines = list
        .visible(view_data.geometry.database_rows)
        .enumerate()
        .map(|(line, (index, db))| {
            let cursor = focused && index == list.cursor();
            if cursor {
                highlight = Some(line);
            }
            let marker = if cursor { "> " } else { "  " };
            format!("{marker}{} ({})", db.name, db.table_count)
        })
        .collect();
    PanelView {
        title,
        lines,
        highlight,
    }
}

fn chips_view(state: &AppState, view_data: &ViewData) -> PanelView {
    let focused = state.focus.is_focused(Panel::SidebarSecondary);
    let title = format!("chips ({})", count_label(&view_data.chips));
    if view_data.engine.is_none() {
        return PanelView::text(title, vec!["not connected".to_owned()]);
    }
    if let Some(lines) = loader_notice(&view_data.chips) {
        return PanelView::text(title, lines);
    }
    let layout = chip_columns(
        view_data.geometry.sidebar_width,
        CHIP_CURSOR_WIDTH,
        view_data.options.show_optional_columns,
    );
    let list = &view_data.chip_list;
    let mut highlight = None;
    let mut lines = vec![layout.render_header()];
    if list.is_empty() {
        lines.push("no chips yet; c creates one".to_owned());
    }
    for (line, (index, chip)) in list.visible(view_data.geometry.chip_rows).enumerate() {
        let cursor = focused && index == list.cursor();
        if cursor {
            highlight = Some(line + 1);
        }
        lines.push(layout.render_chip(if cursor { ">" } else { "" }, chip));
    }
    PanelView {
        title,
        lines,
        highlight,
    }
}

fn header_text(state: &AppState, view_data: &ViewData) -> String {
    let engine = match &view_data.engine {
        Some(info) => format!("{} {}", info.name, info.version),
        None => "disconnected".to_owned(),
    };
    format!(
        "{} ({engine}) | {}",
        view_data.engine_url,
        state.nav.breadcrumb()
    )
}

fn status_text(state: &AppState, view_data: &ViewData) -> String {
    if view_data.help_visible {
        return "esc or ? closes help".to_owned();
    }

    let mode = if state.focus.input_active() {
        "INPUT"
    } else {
        "NAV"
    };
    let focus = state.focus.current().label();
    let loading = if view_data.any_loading() {
        " | loading…"
    } else {
        ""
    };
    let hints = if state.focus.input_active() {
        "enter submit | esc back | ctrl+q quit"
    } else {
        "tab focus | esc back | H home | r reload | c/d chips | / query | ? help | q quit"
    };
    match &state.status_line {
        Some(status) => format!("{mode} {focus}{loading} | {status} | {hints}"),
        None => format!("{mode} {focus}{loading} | {hints}"),
    }
}

fn help_overlay_text() -> &'static str {
    "global: ctrl+q quit | q quit (outside text input) | ? help\n\
focus: tab next panel | shift+tab previous panel (locked while typing)\n\
nav: esc back | H home | r reload focused panel\n\
lists: j/k up/down | pgup/pgdn | enter open\n\
grid: arrows or h/j/k/l scroll | pgup/pgdn page | home/end first/last page\n\
chips: c create | d delete (space toggles) | / or e query\n\
wizards: enter next | esc previous step | y confirm | n back"
}

fn panel_block(title: &str, focused: bool) -> Block<'static> {
    let border = if focused {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    Block::default()
        .title(title.to_owned())
        .borders(Borders::ALL)
        .border_style(border)
}

fn panel_paragraph(view: PanelView, focused: bool) -> Paragraph<'static> {
    let highlight = view.highlight;
    let lines = view
        .lines
        .into_iter()
        .enumerate()
        .map(|(index, line)| {
            if Some(index) == highlight {
                Line::styled(line, Style::default().add_modifier(Modifier::REVERSED))
            } else {
                Line::raw(line)
            }
        })
        .collect::<Vec<_>>();
    Paragraph::new(lines).block(panel_block(&view.title, focused))
}

fn render(frame: &mut ratatui::Frame<'_>, state: &AppState, view_data: &ViewData) {
    let regions = screen_regions(frame.area());

    let header = Paragraph::new(header_text(state, view_data))
        .block(Block::default().title("chipdeck").borders(Borders::ALL));
    frame.render_widget(header, regions.header);

    frame.render_widget(
        panel_paragraph(
            databases_view(state, view_data),
            state.focus.is_focused(Panel::SidebarPrimary),
        ),
        regions.databases,
    );
    frame.render_widget(
        panel_paragraph(
            chips_view(state, view_data),
            state.focus.is_focused(Panel::SidebarSecondary),
        ),
        regions.chips,
    );
    frame.render_widget(
        panel_paragraph(
            main_view(state, view_data),
            state.focus.is_focused(Panel::Main),
        ),
        regions.main,
    );

    let status = Paragraph::new(status_text(state, view_data))
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status, regions.status);

    if view_data.help_visible {
        let area = centered_rect(80, 50, frame.area());
        frame.render_widget(Clear, area);
        let help = Paragraph::new(help_overlay_text())
            .block(Block::default().title("help").borders(Borders::ALL));
        frame.render_widget(help, area);
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
