// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

/// Installs the global subscriber. Events go to `log_file` because the
/// terminal belongs to the TUI.
pub fn init(config_level: &str, log_file: &Path) -> Result<()> {
    if let Some(parent) = log_file.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("create log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .with_context(|| {
            format!(
                "open log file {}; set [log].file to a writable path",
                log_file.display()
            )
        })?;

    let fmt_layer = fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .with_level(true);

    tracing_subscriber::registry()
        .with(build_env_filter(config_level))
        .with(fmt_layer)
        .try_init()
        .context("install tracing subscriber")
}

/// `CHIPDECK_LOG` > `RUST_LOG` > `[log].level`. Unparseable values fall
/// through to the next source.
fn build_env_filter(config_level: &str) -> EnvFilter {
    if let Ok(directives) = std::env::var("CHIPDECK_LOG")
        && let Ok(filter) = EnvFilter::try_new(&directives)
    {
        return filter;
    }

    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }

    EnvFilter::try_new(config_level).unwrap_or_else(|_| EnvFilter::new("info"))
}

#[cfg(test)]
mod tests {
    use super::build_env_filter;
    use std::sync::{Mutex, OnceLock};

    fn env_lock() -> std::sync::MutexGuard<'static, ()> {
        static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        match ENV_LOCK.get_or_init(|| Mutex::new(())).lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn without_env_filters<T>(check: impl FnOnce() -> T) -> T {
        let _guard = env_lock();
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::remove_var("CHIPDECK_LOG");
            std::env::remove_var("RUST_LOG");
        }
        check()
    }

    #[test]
    fn config_level_is_used_without_env() {
        let filter = without_env_filters(|| build_env_filter("debug"));
        assert_eq!(filter.to_string(), "debug");
    }

    #[test]
    fn project_env_wins_over_config() {
        let filter = without_env_filters(|| {
            // SAFETY: test-only process-local env mutation.
            unsafe {
                std::env::set_var("CHIPDECK_LOG", "chipdeck_client=trace");
            }
            let filter = build_env_filter("warn");
            // SAFETY: test cleanup for process-local env mutation.
            unsafe {
                std::env::remove_var("CHIPDECK_LOG");
            }
            filter
        });
        assert_eq!(filter.to_string(), "chipdeck_client=trace");
    }

    #[test]
    fn garbage_config_level_falls_back_to_info() {
        let filter = without_env_filters(|| build_env_filter("not a [level"));
        assert_eq!(filter.to_string(), "info");
    }
}
