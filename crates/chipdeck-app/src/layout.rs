// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Fixed-width column budgets for chip rows.
//!
//! Every widget that prints chips (sidebar list, selection lists, headers)
//! goes through [`chip_columns`] so header and data rows stay aligned.

use crate::model::Chip;
use crate::viewport::fit_cell;
use time::macros::format_description;

pub const MIN_COLUMN_WIDTH: usize = 10;
pub const DATE_WIDTH: usize = 6;
pub const COUNT_WIDTH: usize = 5;
pub const DESCRIPTION_MIN_WIDTH: usize = 6;
pub const COLUMN_GAP: usize = 1;
const NAME_PERCENT: usize = 30;
const DETAIL_PERCENT: usize = 35;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    pub label: &'static str,
    pub width: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnLayout {
    pub indicator: usize,
    pub columns: Vec<ColumnSpec>,
}

impl ColumnLayout {
    pub fn width_of(&self, label: &str) -> usize {
        self.columns
            .iter()
            .find(|column| column.label == label)
            .map(|column| column.width)
            .unwrap_or(0)
    }

    pub fn has(&self, label: &str) -> bool {
        self.width_of(label) > 0
    }

    /// Indicator margin plus every present column and the gaps between them.
    pub fn total_width(&self) -> usize {
        let present = self.present().count();
        let cells: usize = self.present().map(|column| column.width).sum();
        self.indicator + cells + present.saturating_sub(1) * COLUMN_GAP
    }

    fn present(&self) -> impl Iterator<Item = &ColumnSpec> {
        self.columns.iter().filter(|column| column.width > 0)
    }

    pub fn render_header(&self) -> String {
        let labels = self
            .present()
            .map(|column| column.label)
            .collect::<Vec<_>>();
        self.render_cells(&" ".repeat(self.indicator), &labels)
    }

    /// `indicator` is padded or cut to the reserved margin.
    pub fn render_row(&self, indicator: &str, cells: &[&str]) -> String {
        self.render_cells(&fit_cell(indicator, self.indicator), cells)
    }

    pub fn render_chip(&self, indicator: &str, chip: &Chip) -> String {
        let date = chip
            .created_at
            .format(format_description!("[month repr:short] [day]"))
            .unwrap_or_default();
        let count = format!("[{}]", chip.tables.len());
        let detail = chip.detail();
        let mut cells = vec![chip.name.as_str(), detail.as_str(), date.as_str()];
        if self.has("count") {
            cells.push(count.as_str());
        }
        if self.has("description") {
            cells.push(chip.description.as_str());
        }
        self.render_row(indicator, &cells)
    }

    fn render_cells(&self, indicator: &str, cells: &[&str]) -> String {
        let gap = " ".repeat(COLUMN_GAP);
        let body = self
            .present()
            .enumerate()
            .map(|(index, column)| fit_cell(cells.get(index).copied().unwrap_or(""), column.width))
            .collect::<Vec<_>>()
            .join(&gap);
        format!("{indicator}{body}")
    }
}

/// Splits `available_width` into chip row columns.
///
/// The result is a pure function of its inputs. If the width cannot hold the
/// floors the floored widths are returned anyway and the row overflows.
pub fn chip_columns(
    available_width: usize,
    indicator_width: usize,
    show_optional: bool,
) -> ColumnLayout {
    let usable = available_width.saturating_sub(indicator_width);
    let (fixed, gaps) = if show_optional {
        (DATE_WIDTH + COUNT_WIDTH, 4 * COLUMN_GAP)
    } else {
        (DATE_WIDTH, 2 * COLUMN_GAP)
    };
    let flex = usable.saturating_sub(fixed + gaps);

    let name = (flex * NAME_PERCENT / 100).max(MIN_COLUMN_WIDTH);
    let mut detail = (flex * DETAIL_PERCENT / 100).max(MIN_COLUMN_WIDTH);
    let leftover = flex.saturating_sub(name + detail);

    let mut columns = vec![
        ColumnSpec {
            label: "name",
            width: name,
        },
        ColumnSpec {
            label: "detail",
            width: detail,
        },
        ColumnSpec {
            label: "date",
            width: DATE_WIDTH,
        },
    ];

    if show_optional {
        let description = if leftover >= DESCRIPTION_MIN_WIDTH {
            leftover
        } else {
            0
        };
        columns.push(ColumnSpec {
            label: "count",
            width: COUNT_WIDTH,
        });
        columns.push(ColumnSpec {
            label: "description",
            width: description,
        });
    } else {
        detail += leftover;
        columns[1].width = detail;
    }

    ColumnLayout {
        indicator: indicator_width,
        columns,
    }
}

#[cfg(test)]
mod tests {
    use super::{COUNT_WIDTH, DATE_WIDTH, MIN_COLUMN_WIDTH, chip_columns};
    use crate::{Chip, ChipId};
    use time::{Date, Month, OffsetDateTime, Time};

    #[test]
    fn sixty_columns_with_optional_fields() {
        let layout = chip_columns(60, 4, true);

        assert!(layout.width_of("name") >= MIN_COLUMN_WIDTH);
        assert!(layout.width_of("detail") >= MIN_COLUMN_WIDTH);
        assert_eq!(layout.width_of("date"), DATE_WIDTH);
        assert_eq!(layout.width_of("count"), COUNT_WIDTH);
        // flex = 56 - 11 - 4 = 41 -> name 12, detail 14, leftover 15
        assert_eq!(layout.width_of("name"), 12);
        assert_eq!(layout.width_of("detail"), 14);
        assert_eq!(layout.width_of("description"), 15);
        assert!(layout.render_header().contains("description"));
        assert_eq!(layout.total_width(), 60);
    }

    #[test]
    fn description_omitted_when_leftover_too_small() {
        let layout = chip_columns(44, 4, true);

        assert_eq!(layout.width_of("description"), 0);
        assert!(!layout.has("description"));
        assert!(!layout.render_header().contains("description"));
        assert!(layout.total_width() <= 44);
    }

    #[test]
    fn totals_never_exceed_available_width() {
        for available in 40..=240 {
            for indicator in 0..=4 {
                for show_optional in [false, true] {
                    let layout = chip_columns(available, indicator, show_optional);
                    assert!(
                        layout.total_width() <= available,
                        "available={available} indicator={indicator} optional={show_optional} total={}",
                        layout.total_width()
                    );
                }
            }
        }
    }

    #[test]
    fn underflow_keeps_minimum_widths() {
        let layout = chip_columns(12, 4, true);
        assert_eq!(layout.width_of("name"), MIN_COLUMN_WIDTH);
        assert_eq!(layout.width_of("detail"), MIN_COLUMN_WIDTH);
        assert!(layout.total_width() > 12);
    }

    #[test]
    fn without_optional_columns_detail_absorbs_leftover() {
        let layout = chip_columns(80, 2, false);
        assert!(!layout.has("count"));
        assert!(!layout.has("description"));
        assert_eq!(layout.total_width(), 80);
    }

    #[test]
    fn allocation_is_deterministic() {
        assert_eq!(chip_columns(97, 3, true), chip_columns(97, 3, true));
    }

    #[test]
    fn header_and_rows_share_widths() {
        let layout = chip_columns(70, 4, true);
        let chip = Chip {
            id: ChipId::new(1),
            name: "a-very-long-chip-name-that-overflows".to_owned(),
            database: "sales".to_owned(),
            tables: vec!["orders".to_owned(), "items".to_owned()],
            created_at: OffsetDateTime::new_utc(
                Date::from_calendar_date(2026, Month::March, 4).expect("valid date"),
                Time::MIDNIGHT,
            ),
            description: "weekly".to_owned(),
        };

        let header = layout.render_header();
        let row = layout.render_chip("[x]", &chip);
        assert_eq!(header.chars().count(), row.chars().count());
        assert_eq!(row.chars().count(), layout.total_width());
        assert!(row.starts_with("[x] "));
        assert!(row.contains("Mar 04"));
        assert!(row.contains("[2]"));
        assert!(row.contains('…'));
    }
}
