// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod logging;
mod runtime;

use anyhow::{Context, Result};
use chipdeck_app::AppState;
use chipdeck_client::Client;
use chipdeck_tui::UiOptions;
use config::Config;
use runtime::EngineRuntime;
use std::env;
use std::path::PathBuf;

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `chipdeck --print-example-config` to generate a template",
            options.config_path.display()
        )
    })?;

    let base_url = config.base_url(options.engine_url.as_deref());
    let client = Client::new(base_url, config.timeout()?).with_context(|| {
        format!(
            "invalid engine address; pass a URL like {} or set [engine].base_url",
            chipdeck_client::DEFAULT_BASE_URL
        )
    })?;

    if options.check_only {
        let info = client.health()?;
        println!("{} {} at {}", info.name, info.version, client.base_url());
        return Ok(());
    }

    let log_file = config.log_file()?;
    logging::init(config.log_level(), &log_file)?;
    tracing::info!(
        config = %options.config_path.display(),
        engine = %client.base_url(),
        "starting chipdeck"
    );

    let ui = UiOptions {
        show_optional_columns: config.show_optional_columns(),
    };
    let mut state = AppState::default();
    let mut runtime = EngineRuntime::new(client);
    let result = chipdeck_tui::run_app(&mut state, &mut runtime, ui);
    if let Err(error) = &result {
        tracing::error!(error = %format!("{error:#}"), "chipdeck exited with an error");
    }
    result
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    engine_url: Option<String>,
    print_config_path: bool,
    print_example: bool,
    check_only: bool,
    show_help: bool,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        engine_url: None,
        print_config_path: false,
        print_example: false,
        check_only: false,
        show_help: false,
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            unknown if unknown.starts_with('-') => {
                return Err(anyhow::anyhow!(
                    "unknown argument {unknown:?}; run with --help to see supported options"
                ));
            }
            url => {
                if let Some(previous) = &options.engine_url {
                    return Err(anyhow::anyhow!(
                        "engine URL given twice ({previous:?} and {url:?}); pass one"
                    ));
                }
                options.engine_url = Some(url.to_owned());
            }
        }
    }

    Ok(options)
}

fn print_help() {
    println!("chipdeck [URL]");
    println!(
        "  URL                      Engine address (default {})",
        chipdeck_client::DEFAULT_BASE_URL
    );
    println!("  --config <path>          Use a specific config path");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-example-config   Print a config template");
    println!("  --check                  Validate config and ping the engine, then exit");
    println!("  --help                   Show this help");
}
