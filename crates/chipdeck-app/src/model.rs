// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::ids::ChipId;
use crate::viewport::Grid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineInfo {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseInfo {
    pub name: String,
    #[serde(default)]
    pub table_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableInfo {
    pub name: String,
    #[serde(default)]
    pub row_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub name: String,
    pub data_type: String,
    #[serde(default)]
    pub nullable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chip {
    pub id: ChipId,
    pub name: String,
    pub database: String,
    #[serde(default)]
    pub tables: Vec<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(default)]
    pub description: String,
}

impl Chip {
    /// Text for the `detail` column of a chip row.
    pub fn detail(&self) -> String {
        match self.tables.as_slice() {
            [] => self.database.clone(),
            [table] => format!("{}.{}", self.database, table),
            tables => format!("{} ({} tables)", self.database, tables.len()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewChip {
    pub name: String,
    pub database: String,
    pub tables: Vec<String>,
    pub description: String,
}

impl NewChip {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.name.trim().is_empty() {
            anyhow::bail!("chip name is required");
        }
        if self.name.chars().any(char::is_whitespace) {
            anyhow::bail!("chip name {:?} must not contain whitespace", self.name);
        }
        if self.database.trim().is_empty() {
            anyhow::bail!("pick a database for the chip");
        }
        if self.tables.is_empty() {
            anyhow::bail!("select at least one table");
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRequest {
    pub database: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chip: Option<ChipId>,
    pub sql: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResultSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ResultSet {
    pub fn into_grid(self, identity: u64) -> Grid {
        Grid::new(identity, self.columns, self.rows)
    }
}

pub fn tables_grid(identity: u64, tables: &[TableInfo]) -> Grid {
    Grid::new(
        identity,
        vec!["table".to_owned(), "rows".to_owned()],
        tables
            .iter()
            .map(|table| vec![table.name.clone(), table.row_count.to_string()])
            .collect(),
    )
}

pub fn columns_grid(identity: u64, columns: &[ColumnInfo]) -> Grid {
    Grid::new(
        identity,
        vec!["column".to_owned(), "type".to_owned(), "null".to_owned()],
        columns
            .iter()
            .map(|column| {
                vec![
                    column.name.clone(),
                    column.data_type.clone(),
                    if column.nullable { "yes" } else { "no" }.to_owned(),
                ]
            })
            .collect(),
    )
}
