// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const APP_NAME: &str = "chipdeck";
const CONFIG_VERSION: i64 = 1;
const DEFAULT_TIMEOUT: &str = "10s";
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub engine: Engine,
    #[serde(default)]
    pub ui: Ui,
    #[serde(default)]
    pub log: Log,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            engine: Engine::default(),
            ui: Ui::default(),
            log: Log::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Engine {
    pub base_url: Option<String>,
    pub timeout: Option<String>,
}

impl Default for Engine {
    fn default() -> Self {
        Self {
            base_url: Some(chipdeck_client::DEFAULT_BASE_URL.to_owned()),
            timeout: Some(DEFAULT_TIMEOUT.to_owned()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Ui {
    pub show_optional_columns: Option<bool>,
}

impl Default for Ui {
    fn default() -> Self {
        Self {
            show_optional_columns: Some(true),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Log {
    pub level: Option<String>,
    pub file: Option<String>,
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os("CHIPDECK_CONFIG_PATH") {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!("cannot resolve config directory; set CHIPDECK_CONFIG_PATH to the config file")
        })?;
        Ok(config_root.join(APP_NAME).join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let value: toml::Value = toml::from_str(&raw)
            .with_context(|| format!("parse TOML config {}", path.display()))?;

        let version = value
            .get("version")
            .and_then(toml::Value::as_integer)
            .ok_or_else(|| {
                anyhow!(
                    "config file {} has no version; add `version = 1` and put values under [engine], [ui], and [log]",
                    path.display()
                )
            })?;

        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = 1",
                version,
                path.display()
            );
        }

        let config: Config = value
            .try_into()
            .with_context(|| format!("decode config {}", path.display()))?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if let Some(base_url) = &self.engine.base_url {
            chipdeck_client::parse_base_url(base_url)
                .with_context(|| format!("check [engine].base_url in {}", path.display()))?;
        }

        if let Some(timeout) = &self.engine.timeout {
            let parsed = parse_duration(timeout)?;
            if parsed.is_zero() {
                bail!(
                    "engine.timeout in {} must be positive, got {}",
                    path.display(),
                    timeout
                );
            }
        }

        if let Some(level) = &self.log.level
            && level.trim().is_empty()
        {
            bail!(
                "log.level in {} must not be empty; use a level like \"info\" or \"debug\"",
                path.display()
            );
        }

        Ok(())
    }

    /// `cli_url` wins over `[engine].base_url`.
    pub fn base_url<'a>(&'a self, cli_url: Option<&'a str>) -> &'a str {
        cli_url
            .or(self.engine.base_url.as_deref())
            .unwrap_or(chipdeck_client::DEFAULT_BASE_URL)
    }

    pub fn timeout(&self) -> Result<Duration> {
        parse_duration(self.engine.timeout.as_deref().unwrap_or(DEFAULT_TIMEOUT))
    }

    pub fn show_optional_columns(&self) -> bool {
        self.ui.show_optional_columns.unwrap_or(true)
    }

    pub fn log_level(&self) -> &str {
        self.log.level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    pub fn log_file(&self) -> Result<PathBuf> {
        if let Some(file) = &self.log.file {
            return Ok(PathBuf::from(file));
        }
        let cache_root = dirs::cache_dir().ok_or_else(|| {
            anyhow!("cannot resolve cache directory; set [log].file in the config")
        })?;
        Ok(cache_root.join(APP_NAME).join(format!("{APP_NAME}.log")))
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# chipdeck config\n# Place this file at: {}\n\nversion = 1\n\n[engine]\nbase_url = \"{}\"\ntimeout = \"{}\"\n\n[ui]\n# Hide the count and description chip columns on narrow terminals.\nshow_optional_columns = true\n\n[log]\nlevel = \"{}\"\n# Optional. Default is the platform cache dir (for example ~/.cache/chipdeck/chipdeck.log)\n# file = \"/absolute/path/to/chipdeck.log\"\n",
            path.display(),
            chipdeck_client::DEFAULT_BASE_URL,
            DEFAULT_TIMEOUT,
            DEFAULT_LOG_LEVEL,
        )
    }
}

fn parse_duration(raw: &str) -> Result<Duration> {
    if let Some(value) = raw.strip_suffix("ms") {
        let millis: u64 = value
            .parse()
            .with_context(|| format!("invalid timeout duration {raw:?}"))?;
        return Ok(Duration::from_millis(millis));
    }
    if let Some(value) = raw.strip_suffix('s') {
        let secs: u64 = value
            .parse()
            .with_context(|| format!("invalid timeout duration {raw:?}"))?;
        return Ok(Duration::from_secs(secs));
    }
    if let Some(value) = raw.strip_suffix('m') {
        let mins: u64 = value
            .parse()
            .with_context(|| format!("invalid timeout duration {raw:?}"))?;
        return Ok(Duration::from_secs(mins * 60));
    }

    bail!("invalid duration {raw:?}; use one of: <N>ms, <N>s, <N>m (for example 500ms or 10s)")
}
