// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use chipdeck_app::{
    Chip, ChipId, ColumnInfo, DatabaseInfo, EngineInfo, NewChip, QueryRequest, ResultSet,
    TableInfo,
};
use std::collections::BTreeMap;
use std::path::PathBuf;
use time::{Date, Duration, Month, OffsetDateTime, Time};

const DATABASE_NAMES: [&str; 8] = [
    "sales",
    "inventory",
    "billing",
    "telemetry",
    "support",
    "marketing",
    "payroll",
    "logistics",
];

const TABLE_NAMES: [&str; 16] = [
    "orders",
    "items",
    "customers",
    "invoices",
    "payments",
    "refunds",
    "shipments",
    "events",
    "sessions",
    "tickets",
    "accounts",
    "regions",
    "products",
    "suppliers",
    "campaigns",
    "employees",
];

const COLUMN_NAMES: [&str; 14] = [
    "id",
    "created_at",
    "updated_at",
    "amount",
    "status",
    "region",
    "customer_id",
    "quantity",
    "note",
    "email",
    "total",
    "currency",
    "source",
    "owner",
];

const DATA_TYPES: [&str; 7] = [
    "int",
    "bigint",
    "text",
    "decimal(12,2)",
    "timestamp",
    "bool",
    "uuid",
];

const CHIP_ADJECTIVES: [&str; 10] = [
    "weekly", "nightly", "q1", "q2", "q3", "q4", "audit", "baseline", "trial", "frozen",
];

const DESCRIPTION_WORDS: [&str; 16] = [
    "snapshot",
    "before",
    "after",
    "migration",
    "backfill",
    "reconcile",
    "export",
    "review",
    "finance",
    "close",
    "compare",
    "regression",
    "cleanup",
    "reporting",
    "rollout",
    "check",
];

const REFERENCE_YEAR: i32 = 2026;

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }

    fn bool(&mut self) -> bool {
        (self.next_u64() & 1) == 1
    }
}

/// Seeded generator for engine catalog fixtures.
#[derive(Debug, Clone)]
pub struct EngineFaker {
    rng: DeterministicRng,
    seed: u64,
}

impl EngineFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
            seed: normalized,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn int_n(&mut self, n: usize) -> usize {
        self.rng.int_n(n)
    }

    pub fn table_names(&mut self, count: usize) -> Vec<String> {
        let mut names = Vec::with_capacity(count);
        let mut offset = self.rng.int_n(TABLE_NAMES.len());
        while names.len() < count {
            let base = TABLE_NAMES[offset % TABLE_NAMES.len()];
            let round = offset / TABLE_NAMES.len();
            names.push(if round == 0 {
                base.to_owned()
            } else {
                format!("{base}_{round}")
            });
            offset += 1;
        }
        names
    }

    pub fn tables(&mut self, count: usize) -> Vec<TableInfo> {
        self.table_names(count)
            .into_iter()
            .map(|name| TableInfo {
                name,
                row_count: self.int_range_u64(0, 250_000),
            })
            .collect()
    }

    pub fn columns(&mut self, count: usize) -> Vec<ColumnInfo> {
        (0..count)
            .map(|index| {
                let base = COLUMN_NAMES[index % COLUMN_NAMES.len()];
                let name = if index < COLUMN_NAMES.len() {
                    base.to_owned()
                } else {
                    format!("{base}_{}", index / COLUMN_NAMES.len())
                };
                ColumnInfo {
                    name,
                    data_type: self.pick(&DATA_TYPES).to_owned(),
                    nullable: index != 0 && self.rng.bool(),
                }
            })
            .collect()
    }

    pub fn chip(&mut self, id: ChipId, database: &str, tables: &[String]) -> Chip {
        let picked = if tables.is_empty() {
            Vec::new()
        } else {
            let count = 1 + self.rng.int_n(tables.len());
            tables.iter().take(count).cloned().collect()
        };
        Chip {
            id,
            name: format!("{}-{}", self.pick(&CHIP_ADJECTIVES), database),
            database: database.to_owned(),
            tables: picked,
            created_at: self.date_in_year(REFERENCE_YEAR),
            description: self.sentence(0, 5),
        }
    }

    /// `rows` x `columns` of short cell text; every row has `columns` cells.
    pub fn result_set(&mut self, columns: usize, rows: usize) -> ResultSet {
        let columns = (0..columns)
            .map(|index| COLUMN_NAMES[index % COLUMN_NAMES.len()].to_owned())
            .collect::<Vec<_>>();
        let rows = (0..rows)
            .map(|row| {
                (0..columns.len())
                    .map(|column| {
                        if column == 0 {
                            (row + 1).to_string()
                        } else {
                            self.pick(&DESCRIPTION_WORDS).to_owned()
                        }
                    })
                    .collect()
            })
            .collect();
        ResultSet { columns, rows }
    }

    pub fn date_in_year(&mut self, year: i32) -> OffsetDateTime {
        let start = midnight_utc(year, Month::January, 1);
        let end =
            midnight_utc(year, Month::December, 31) + Duration::days(1) - Duration::seconds(1);
        self.random_datetime_between(start, end)
    }

    fn pick<'a>(&mut self, items: &'a [&'a str]) -> &'a str {
        items[self.rng.int_n(items.len())]
    }

    fn int_range_u64(&mut self, min: u64, max: u64) -> u64 {
        if max <= min {
            return min;
        }
        min + self.rng.next_u64() % (max - min + 1)
    }

    fn random_datetime_between(
        &mut self,
        start: OffsetDateTime,
        end: OffsetDateTime,
    ) -> OffsetDateTime {
        let span = (end - start).whole_seconds();
        if span <= 0 {
            return start;
        }
        let offset = self.rng.next_u64() % (span as u64 + 1);
        start + Duration::seconds(offset as i64)
    }

    fn sentence(&mut self, min_words: usize, max_words: usize) -> String {
        let count = min_words + self.rng.int_n(max_words.saturating_sub(min_words) + 1);
        (0..count)
            .map(|_| self.pick(&DESCRIPTION_WORDS))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// In-memory engine with the same operations the HTTP client exposes.
#[derive(Debug, Clone)]
pub struct FakeEngine {
    info: EngineInfo,
    databases: BTreeMap<String, Vec<TableInfo>>,
    columns: BTreeMap<(String, String), Vec<ColumnInfo>>,
    chips: Vec<Chip>,
    next_chip_id: i64,
    query_results: BTreeMap<String, ResultSet>,
}

impl Default for FakeEngine {
    fn default() -> Self {
        Self {
            info: EngineInfo {
                name: "fake-engine".to_owned(),
                version: "0.0.0".to_owned(),
            },
            databases: BTreeMap::new(),
            columns: BTreeMap::new(),
            chips: Vec::new(),
            next_chip_id: 1,
            query_results: BTreeMap::new(),
        }
    }
}

impl FakeEngine {
    /// A small catalog: a handful of databases with tables, columns and chips.
    pub fn seeded(seed: u64) -> Self {
        let mut faker = EngineFaker::new(seed);
        let mut engine = Self::default();
        let database_count = 3 + faker.int_n(3);
        for name in DATABASE_NAMES.iter().take(database_count) {
            let table_count = 2 + faker.int_n(5);
            let tables = faker.tables(table_count);
            for table in &tables {
                let column_count = 3 + faker.int_n(6);
                engine.set_columns(name, &table.name, faker.columns(column_count));
            }
            engine.add_database(name, tables);
        }

        let names = engine.databases.keys().cloned().collect::<Vec<_>>();
        for _ in 0..(2 + faker.int_n(4)) {
            let database = &names[faker.int_n(names.len())];
            let tables = engine.table_names(database);
            let id = engine.allocate_id();
            engine.chips.push(faker.chip(id, database, &tables));
        }
        engine
    }

    pub fn add_database(&mut self, name: &str, tables: Vec<TableInfo>) {
        self.databases.insert(name.to_owned(), tables);
    }

    pub fn set_columns(&mut self, database: &str, table: &str, columns: Vec<ColumnInfo>) {
        self.columns
            .insert((database.to_owned(), table.to_owned()), columns);
    }

    pub fn insert_chip(&mut self, chip: Chip) {
        self.next_chip_id = self.next_chip_id.max(chip.id.get() + 1);
        self.chips.push(chip);
    }

    /// Canned answer for `sql`, matched after trimming.
    pub fn set_query_result(&mut self, sql: &str, result: ResultSet) {
        self.query_results.insert(sql.trim().to_owned(), result);
    }

    pub fn health(&self) -> Result<EngineInfo> {
        Ok(self.info.clone())
    }

    pub fn list_databases(&self) -> Result<Vec<DatabaseInfo>> {
        Ok(self
            .databases
            .iter()
            .map(|(name, tables)| DatabaseInfo {
                name: name.clone(),
                table_count: tables.len() as u64,
            })
            .collect())
    }

    pub fn list_tables(&self, database: &str) -> Result<Vec<TableInfo>> {
        self.databases
            .get(database)
            .cloned()
            .ok_or_else(|| anyhow!("engine error (404): unknown database {database}"))
    }

    pub fn describe_table(&self, database: &str, table: &str) -> Result<Vec<ColumnInfo>> {
        self.columns
            .get(&(database.to_owned(), table.to_owned()))
            .cloned()
            .ok_or_else(|| anyhow!("engine error (404): unknown table {database}.{table}"))
    }

    pub fn list_chips(&self) -> Result<Vec<Chip>> {
        Ok(self.chips.clone())
    }

    pub fn create_chip(&mut self, chip: &NewChip) -> Result<Chip> {
        chip.validate()?;
        let known = self
            .databases
            .get(&chip.database)
            .ok_or_else(|| anyhow!("engine error (404): unknown database {}", chip.database))?;
        if let Some(missing) = chip
            .tables
            .iter()
            .find(|table| !known.iter().any(|info| &info.name == *table))
        {
            bail!("engine error (404): unknown table {}.{missing}", chip.database);
        }
        if self.chips.iter().any(|existing| existing.name == chip.name) {
            bail!("engine error (409): chip {} already exists", chip.name);
        }

        let created = Chip {
            id: self.allocate_id(),
            name: chip.name.clone(),
            database: chip.database.clone(),
            tables: chip.tables.clone(),
            created_at: midnight_utc(REFERENCE_YEAR, Month::March, 4),
            description: chip.description.clone(),
        };
        self.chips.push(created.clone());
        Ok(created)
    }

    pub fn delete_chip(&mut self, id: ChipId) -> Result<()> {
        let before = self.chips.len();
        self.chips.retain(|chip| chip.id != id);
        if self.chips.len() == before {
            bail!("engine error (404): no chip {id}");
        }
        Ok(())
    }

    pub fn run_query(&self, request: &QueryRequest) -> Result<ResultSet> {
        if !self.databases.contains_key(&request.database) {
            bail!("engine error (404): unknown database {}", request.database);
        }
        self.query_results
            .get(request.sql.trim())
            .cloned()
            .ok_or_else(|| anyhow!("engine error (400): cannot run {:?}", request.sql.trim()))
    }

    fn table_names(&self, database: &str) -> Vec<String> {
        self.databases
            .get(database)
            .map(|tables| tables.iter().map(|table| table.name.clone()).collect())
            .unwrap_or_default()
    }

    fn allocate_id(&mut self) -> ChipId {
        let id = ChipId::new(self.next_chip_id);
        self.next_chip_id += 1;
        id
    }
}

pub fn temp_config_path() -> Result<(tempfile::TempDir, PathBuf)> {
    let dir = tempfile::tempdir().context("create temp dir")?;
    let path = dir.path().join("config.toml");
    Ok((dir, path))
}

pub fn database_names() -> &'static [&'static str] {
    &DATABASE_NAMES
}

fn midnight_utc(year: i32, month: Month, day: u8) -> OffsetDateTime {
    let date = Date::from_calendar_date(year, month, day).unwrap_or(Date::MIN);
    OffsetDateTime::new_utc(date, Time::MIDNIGHT)
}
