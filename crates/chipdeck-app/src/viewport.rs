// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Scrollable character grid.
//!
//! A [`Grid`] holds cells as display strings with column widths measured
//! once. [`GridViewport`] keeps the scroll offsets and renders the visible
//! window line by line; it knows nothing about the terminal.

use std::collections::BTreeSet;
use std::ops::Range;

pub const MAX_COLUMN_WIDTH: usize = 40;
/// Header, separator and status line.
pub const RESERVED_LINES: usize = 3;
pub const CELL_SEPARATOR: &str = " │ ";
pub const SEPARATOR_WIDTH: usize = 3;
pub const PAN_STEP: usize = 8;
const ELLIPSIS: char = '…';

/// Pads `value` with spaces or truncates it with an ellipsis so the result
/// is exactly `width` chars.
pub fn fit_cell(value: &str, width: usize) -> String {
    let len = value.chars().count();
    if len <= width {
        let mut out = String::with_capacity(value.len() + width - len);
        out.push_str(value);
        out.extend(std::iter::repeat_n(' ', width - len));
        return out;
    }
    if width == 0 {
        return String::new();
    }
    let mut out: String = value.chars().take(width - 1).collect();
    out.push(ELLIPSIS);
    out
}

fn slice_chars(line: &str, start: usize, width: usize) -> String {
    line.chars().skip(start).take(width).collect()
}

fn clamp_offset(value: i64, max: usize) -> usize {
    if value <= 0 {
        return 0;
    }
    usize::try_from(value).unwrap_or(usize::MAX).min(max)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    identity: u64,
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
    widths: Vec<usize>,
}

impl Grid {
    /// `identity` distinguishes result sets; installing a grid with a new
    /// identity into a [`GridViewport`] resets its scroll offsets.
    pub fn new(identity: u64, columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let widths = columns
            .iter()
            .enumerate()
            .map(|(index, header)| {
                rows.iter()
                    .filter_map(|row| row.get(index))
                    .map(|cell| cell.chars().count())
                    .chain(std::iter::once(header.chars().count()))
                    .max()
                    .unwrap_or(0)
                    .min(MAX_COLUMN_WIDTH)
            })
            .collect();
        Self {
            identity,
            columns,
            rows,
            widths,
        }
    }

    pub const fn identity(&self) -> u64 {
        self.identity
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn widths(&self) -> &[usize] {
        &self.widths
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Width of one fully rendered row, separators included.
    pub fn total_width(&self) -> usize {
        let cells: usize = self.widths.iter().sum();
        cells + self.widths.len().saturating_sub(1) * SEPARATOR_WIDTH
    }

    fn render_cells<'a>(&self, mut cells: impl Iterator<Item = &'a str>) -> String {
        self.widths
            .iter()
            .map(|width| fit_cell(cells.next().unwrap_or(""), *width))
            .collect::<Vec<_>>()
            .join(CELL_SEPARATOR)
    }

    fn header_line(&self) -> String {
        self.render_cells(self.columns.iter().map(String::as_str))
    }

    fn separator_line(&self) -> String {
        self.widths
            .iter()
            .map(|width| "─".repeat(*width))
            .collect::<Vec<_>>()
            .join("─┼─")
    }

    fn row_line(&self, row: &[String]) -> String {
        self.render_cells(row.iter().map(String::as_str))
    }
}

/// Visible character window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub width: usize,
    pub height: usize,
}

impl Window {
    pub const fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    pub fn page_size(self) -> usize {
        self.height.saturating_sub(RESERVED_LINES).max(1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewportBounds {
    pub page_size: usize,
    pub max_row: usize,
    pub max_col: usize,
}

impl ViewportBounds {
    pub fn new(row_count: usize, total_width: usize, window: Window) -> Self {
        let page_size = window.page_size();
        Self {
            page_size,
            max_row: row_count.saturating_sub(page_size),
            max_col: total_width.saturating_sub(window.width),
        }
    }

    pub fn for_grid(grid: &Grid, window: Window) -> Self {
        Self::new(grid.row_count(), grid.total_width(), window)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewportCommand {
    Up,
    Down,
    PageUp,
    PageDown,
    Left,
    Right,
    Top,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewportState {
    pub scroll_row: usize,
    pub scroll_col: usize,
}

impl ViewportState {
    /// Builds a state from possibly negative or oversized offsets.
    pub fn clamped(scroll_row: i64, scroll_col: i64, bounds: ViewportBounds) -> Self {
        Self {
            scroll_row: clamp_offset(scroll_row, bounds.max_row),
            scroll_col: clamp_offset(scroll_col, bounds.max_col),
        }
    }

    pub fn clamp(self, bounds: ViewportBounds) -> Self {
        Self {
            scroll_row: self.scroll_row.min(bounds.max_row),
            scroll_col: self.scroll_col.min(bounds.max_col),
        }
    }

    pub fn apply(self, command: ViewportCommand, bounds: ViewportBounds) -> Self {
        let row = self.scroll_row;
        let col = self.scroll_col;
        let page = bounds.page_size;
        let next = match command {
            ViewportCommand::Up => Self {
                scroll_row: row.saturating_sub(1),
                ..self
            },
            ViewportCommand::Down => Self {
                scroll_row: row.saturating_add(1),
                ..self
            },
            ViewportCommand::PageUp => Self {
                scroll_row: row.saturating_sub(page),
                ..self
            },
            ViewportCommand::PageDown => Self {
                scroll_row: row.saturating_add(page),
                ..self
            },
            ViewportCommand::Left => Self {
                scroll_col: col.saturating_sub(PAN_STEP),
                ..self
            },
            ViewportCommand::Right => Self {
                scroll_col: col.saturating_add(PAN_STEP),
                ..self
            },
            ViewportCommand::Top => Self {
                scroll_row: 0,
                ..self
            },
            ViewportCommand::Bottom => Self {
                scroll_row: bounds.max_row,
                ..self
            },
        };
        next.clamp(bounds)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GridViewport {
    identity: Option<u64>,
    state: ViewportState,
}

impl GridViewport {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn state(&self) -> ViewportState {
        self.state
    }

    /// Resets offsets to `(0, 0)` when `grid` is a different result set.
    pub fn install(&mut self, grid: &Grid) {
        if self.identity != Some(grid.identity()) {
            self.identity = Some(grid.identity());
            self.state = ViewportState::default();
        }
    }

    pub fn handle(&mut self, command: ViewportCommand, grid: &Grid, window: Window) {
        self.install(grid);
        self.state = self
            .state
            .apply(command, ViewportBounds::for_grid(grid, window));
    }

    /// Scrolls the minimum amount that brings `row` into the window.
    pub fn reveal(&mut self, row: usize, grid: &Grid, window: Window) {
        self.install(grid);
        let bounds = ViewportBounds::for_grid(grid, window);
        let mut state = self.state.clamp(bounds);
        if row < state.scroll_row {
            state.scroll_row = row;
        } else if row >= state.scroll_row + bounds.page_size {
            state.scroll_row = row + 1 - bounds.page_size;
        }
        self.state = state.clamp(bounds);
    }

    /// Data rows currently on screen.
    pub fn visible_rows(&self, grid: &Grid, window: Window) -> Range<usize> {
        let bounds = ViewportBounds::for_grid(grid, window);
        let start = self.state.clamp(bounds).scroll_row;
        start..(start + bounds.page_size).min(grid.row_count())
    }

    pub fn page_indicator(&self, grid: &Grid, window: Window) -> (usize, usize) {
        let page_size = window.page_size();
        let state = self.state.clamp(ViewportBounds::for_grid(grid, window));
        let current = state.scroll_row / page_size + 1;
        let total = grid.row_count().div_ceil(page_size).max(1);
        (current, total)
    }

    pub fn status_line(&self, grid: &Grid, window: Window) -> String {
        let (page, pages) = self.page_indicator(grid, window);
        let mut status = format!(
            "{} cols | {} rows | pg {page}/{pages}",
            grid.column_count(),
            grid.row_count()
        );
        if grid.total_width() > window.width {
            status.push_str(" | ←→ pan");
        }
        status
    }

    /// Lines for the visible window. An empty grid yields `placeholder`
    /// alone.
    pub fn render(&self, grid: &Grid, window: Window, placeholder: &str) -> Vec<String> {
        if grid.row_count() == 0 {
            return vec![slice_chars(placeholder, 0, window.width)];
        }

        let bounds = ViewportBounds::for_grid(grid, window);
        let state = self.state.clamp(bounds);
        let start = state.scroll_col;
        let width = window.width;

        let mut lines = Vec::with_capacity(bounds.page_size + RESERVED_LINES);
        lines.push(slice_chars(&grid.header_line(), start, width));
        lines.push(slice_chars(&grid.separator_line(), start, width));
        lines.extend(
            grid.rows
                .iter()
                .skip(state.scroll_row)
                .take(bounds.page_size)
                .map(|row| slice_chars(&grid.row_line(row), start, width)),
        );
        lines.push(slice_chars(&self.status_line(grid, window), 0, width));
        lines
    }
}

/// Cursor list with a checked set, scrolled so the cursor stays visible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectList<T> {
    items: Vec<T>,
    cursor: usize,
    scroll_row: usize,
    checked: BTreeSet<usize>,
}

impl<T> Default for SelectList<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            cursor: 0,
            scroll_row: 0,
            checked: BTreeSet::new(),
        }
    }
}

impl<T> SelectList<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items,
            ..Self::default()
        }
    }

    /// Replaces the items. Checks and the cursor follow `key`, so a reload
    /// that reorders rows keeps them on the same items; checks whose key is
    /// gone are dropped.
    pub fn set_items_by<K, F>(&mut self, items: Vec<T>, key: F)
    where
        K: Ord,
        F: Fn(&T) -> K,
    {
        let checked_keys = self
            .checked
            .iter()
            .filter_map(|index| self.items.get(*index))
            .map(&key)
            .collect::<BTreeSet<_>>();
        let cursor_key = self.items.get(self.cursor).map(&key);

        self.checked = items
            .iter()
            .enumerate()
            .filter(|(_, item)| checked_keys.contains(&key(item)))
            .map(|(index, _)| index)
            .collect();
        let last = items.len().saturating_sub(1);
        self.cursor = cursor_key
            .and_then(|wanted| items.iter().position(|item| key(item) == wanted))
            .unwrap_or(self.cursor)
            .min(last);
        self.scroll_row = self.scroll_row.min(self.cursor);
        self.items = items;
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn selected(&self) -> Option<&T> {
        self.items.get(self.cursor)
    }

    pub fn move_cursor(&mut self, delta: isize, visible_rows: usize) {
        if self.items.is_empty() {
            self.cursor = 0;
            self.scroll_row = 0;
            return;
        }
        let last = self.items.len() - 1;
        let next = if delta.is_negative() {
            self.cursor.saturating_sub(delta.unsigned_abs())
        } else {
            self.cursor.saturating_add(delta as usize)
        };
        self.cursor = next.min(last);
        self.follow_cursor(visible_rows);
    }

    fn follow_cursor(&mut self, visible_rows: usize) {
        let visible = visible_rows.max(1);
        if self.cursor < self.scroll_row {
            self.scroll_row = self.cursor;
        } else if self.cursor >= self.scroll_row.saturating_add(visible) {
            self.scroll_row = self.cursor + 1 - visible;
        }
        let max_row = self.items.len().saturating_sub(visible);
        self.scroll_row = self.scroll_row.min(max_row);
    }

    pub fn toggle_checked(&mut self) -> bool {
        if self.cursor >= self.items.len() {
            return false;
        }
        if !self.checked.insert(self.cursor) {
            self.checked.remove(&self.cursor);
            return false;
        }
        true
    }

    pub fn is_checked(&self, index: usize) -> bool {
        self.checked.contains(&index)
    }

    pub fn checked_items(&self) -> Vec<&T> {
        self.checked
            .iter()
            .filter_map(|index| self.items.get(*index))
            .collect()
    }

    pub fn checked_count(&self) -> usize {
        self.checked.len()
    }

    /// `(index, item)` pairs inside the scrolled window.
    pub fn visible(&self, visible_rows: usize) -> impl Iterator<Item = (usize, &T)> {
        self.items
            .iter()
            .enumerate()
            .skip(self.scroll_row)
            .take(visible_rows.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::{
        Grid, GridViewport, SelectList, ViewportBounds, ViewportCommand, ViewportState, Window,
        fit_cell,
    };

    fn numbered_grid(identity: u64, rows: usize) -> Grid {
        Grid::new(
            identity,
            vec!["id".to_owned(), "name".to_owned(), "note".to_owned()],
            (0..rows)
                .map(|row| {
                    vec![
                        row.to_string(),
                        format!("row-{row}"),
                        "x".repeat(row % 50),
                    ]
                })
                .collect(),
        )
    }

    #[test]
    fn fit_cell_pads_and_truncates() {
        assert_eq!(fit_cell("ab", 4), "ab  ");
        assert_eq!(fit_cell("abcdef", 4), "abc…");
        assert_eq!(fit_cell("abcd", 4), "abcd");
        assert_eq!(fit_cell("abc", 0), "");
    }

    #[test]
    fn widths_measure_headers_and_cells_with_cap() {
        let grid = Grid::new(
            1,
            vec!["k".to_owned(), "longer header".to_owned()],
            vec![
                vec!["abc".to_owned(), "v".to_owned()],
                vec!["y".repeat(90), String::new()],
            ],
        );
        assert_eq!(grid.widths(), [40, 13]);
        assert_eq!(grid.total_width(), 40 + 3 + 13);
    }

    #[test]
    fn page_down_scenario_five_hundred_rows() {
        let grid = numbered_grid(1, 500);
        let window = Window::new(80, 23);
        assert_eq!(window.page_size(), 20);

        let mut viewport = GridViewport::new();
        viewport.install(&grid);
        assert!(viewport.status_line(&grid, window).contains("pg 1/25"));

        viewport.handle(ViewportCommand::PageDown, &grid, window);
        assert_eq!(viewport.state().scroll_row, 20);
        assert!(viewport.status_line(&grid, window).contains("pg 2/25"));

        for _ in 0..30 {
            viewport.handle(ViewportCommand::PageDown, &grid, window);
        }
        assert_eq!(viewport.state().scroll_row, 480);
        assert!(viewport.status_line(&grid, window).contains("pg 25/25"));
    }

    #[test]
    fn clamp_is_idempotent_for_out_of_range_inputs() {
        let bounds = ViewportBounds::new(120, 300, Window::new(70, 13));
        for row in [-50_i64, -1, 0, 5, 110, 111, 10_000] {
            for col in [-9_i64, 0, 17, 230, 231, 5_000] {
                let once = ViewportState::clamped(row, col, bounds);
                let twice = once.clamp(bounds);
                assert_eq!(once, twice, "row={row} col={col}");
                assert!(once.scroll_row <= bounds.max_row);
                assert!(once.scroll_col <= bounds.max_col);
            }
        }
        assert_eq!(
            ViewportState::clamped(-3, -3, bounds),
            ViewportState::default()
        );
    }

    #[test]
    fn moves_clamp_instead_of_failing() {
        let grid = numbered_grid(1, 5);
        let window = Window::new(10, 10);
        let mut viewport = GridViewport::new();

        viewport.handle(ViewportCommand::Up, &grid, window);
        viewport.handle(ViewportCommand::Left, &grid, window);
        assert_eq!(viewport.state(), ViewportState::default());

        viewport.handle(ViewportCommand::Down, &grid, window);
        assert_eq!(viewport.state().scroll_row, 0, "five rows fit one page");

        for _ in 0..50 {
            viewport.handle(ViewportCommand::Right, &grid, window);
        }
        let max_col = grid.total_width() - window.width;
        assert_eq!(viewport.state().scroll_col, max_col);
    }

    #[test]
    fn new_identity_resets_offsets() {
        let first = numbered_grid(1, 100);
        let window = Window::new(20, 12);
        let mut viewport = GridViewport::new();
        viewport.handle(ViewportCommand::PageDown, &first, window);
        viewport.handle(ViewportCommand::Right, &first, window);
        assert_ne!(viewport.state(), ViewportState::default());

        viewport.install(&first);
        assert_ne!(viewport.state(), ViewportState::default());

        let second = numbered_grid(2, 100);
        viewport.install(&second);
        assert_eq!(viewport.state(), ViewportState::default());
    }

    #[test]
    fn render_slices_lines_to_window() {
        let grid = numbered_grid(1, 40);
        let window = Window::new(12, 8);
        let mut viewport = GridViewport::new();
        viewport.handle(ViewportCommand::Right, &grid, window);

        let lines = viewport.render(&grid, window, "no rows");
        assert_eq!(lines.len(), window.page_size() + 3);
        for line in &lines {
            assert!(line.chars().count() <= window.width, "{line:?}");
        }
        // Header starts with "id" padded to 2, then separator; panned 8.
        let full_header = "id │ name   │ note";
        let expected: String = full_header.chars().skip(8).take(12).collect();
        assert!(lines[0].starts_with(expected.trim_end()));
        assert!(lines.last().is_some_and(|line| line.starts_with("3 cols")));
    }

    #[test]
    fn status_reports_pan_only_when_wider_than_window() {
        let grid = numbered_grid(1, 3);
        let wide = Window::new(400, 10);
        let narrow = Window::new(10, 10);
        let viewport = GridViewport::new();

        assert!(!viewport.status_line(&grid, wide).contains("pan"));
        assert!(viewport.status_line(&grid, narrow).contains("←→ pan"));
    }

    #[test]
    fn empty_grid_renders_placeholder() {
        let grid = numbered_grid(1, 0);
        let viewport = GridViewport::new();
        let lines = viewport.render(&grid, Window::new(30, 10), "query returned no rows");
        assert_eq!(lines, vec!["query returned no rows".to_owned()]);
    }

    #[test]
    fn tiny_window_still_pages_by_one() {
        let window = Window::new(10, 2);
        assert_eq!(window.page_size(), 1);
    }

    #[test]
    fn select_list_scrolls_with_cursor_and_tracks_checks() {
        let mut list = SelectList::new((0..10).collect::<Vec<u32>>());
        list.move_cursor(6, 3);
        assert_eq!(list.cursor(), 6);
        let visible: Vec<usize> = list.visible(3).map(|(index, _)| index).collect();
        assert_eq!(visible, vec![4, 5, 6]);

        assert!(list.toggle_checked());
        list.move_cursor(-5, 3);
        assert_eq!(list.cursor(), 1);
        assert!(list.toggle_checked());
        assert_eq!(list.checked_items(), vec![&1, &6]);

        assert!(!list.toggle_checked());
        assert_eq!(list.checked_count(), 1);

        list.move_cursor(100, 3);
        assert_eq!(list.selected(), Some(&9));
    }

    #[test]
    fn select_list_checks_follow_items_across_reorder() {
        let mut list = SelectList::new(vec!["a", "b", "c"]);
        list.move_cursor(2, 5);
        list.toggle_checked();

        list.set_items_by(vec!["c", "a", "b"], |item| *item);
        assert_eq!(list.selected(), Some(&"c"));
        assert_eq!(list.checked_items(), vec![&"c"]);

        list.set_items_by(vec!["b", "a", "d"], |item| *item);
        assert_eq!(list.checked_count(), 0);
        assert_eq!(list.cursor(), 0);

        list.set_items_by(vec!["a"], |item| *item);
        assert_eq!(list.selected(), Some(&"a"));

        list.set_items_by(Vec::new(), |item| *item);
        assert_eq!(list.cursor(), 0);
        assert_eq!(list.selected(), None);
    }

    #[test]
    fn reveal_scrolls_minimally() {
        let grid = numbered_grid(7, 100);
        let window = Window::new(80, 13);
        let mut viewport = GridViewport::new();

        viewport.reveal(5, &grid, window);
        assert_eq!(viewport.state().scroll_row, 0);
        assert_eq!(viewport.visible_rows(&grid, window), 0..10);

        viewport.reveal(14, &grid, window);
        assert_eq!(viewport.state().scroll_row, 5);
        assert_eq!(viewport.visible_rows(&grid, window), 5..15);

        viewport.reveal(2, &grid, window);
        assert_eq!(viewport.state().scroll_row, 2);

        viewport.reveal(500, &grid, window);
        assert_eq!(viewport.state().scroll_row, 90);
        assert_eq!(viewport.visible_rows(&grid, window), 90..100);
    }
}
