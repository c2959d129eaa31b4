// github-archive: GitHub Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Entry point.
//!
//! ```text
//! cli::parse() --> ConfigLoader --> Logging --> Command Dispatch
//!   Options | Inis | (none: archive run)
//! ```

use std::process::ExitCode;

use github_archive::cli::{self, Cli, Command};
use github_archive::cmd::archive::run_archive;
use github_archive::cmd::config::{run_inis_command, run_options_command};
use github_archive::config::loader::ConfigLoader;
use github_archive::config::{Config, DEFAULT_CONFIG_FILE, ENV_PREFIX};
use github_archive::logging::{LogConfig, default_log_file, init_logging};

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = cli::parse();

    let loader = match build_config_loader(&cli) {
        Ok(loader) => loader,
        Err(e) => {
            eprintln!("Error: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    if matches!(cli.command, Some(Command::Inis)) {
        run_inis_command(&loader.format_loaded_files());
        return ExitCode::SUCCESS;
    }

    let config = match loader.build() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    if matches!(cli.command, Some(Command::Options)) {
        run_options_command(&config);
        return ExitCode::SUCCESS;
    }

    let _log_guard = match init_logging(&build_log_config(&config)) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            return ExitCode::FAILURE;
        }
    };

    match run_archive(&cli.archive, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn build_log_config(config: &Config) -> LogConfig {
    let log_file = config
        .global
        .log_file
        .clone()
        .unwrap_or_else(|| default_log_file(config.location()));

    LogConfig::builder()
        .with_console_level(config.global.output_log_level)
        .with_file_level(config.global.file_log_level)
        .with_log_file(log_file)
        .build()
}

fn build_config_loader(cli: &Cli) -> github_archive::error::Result<ConfigLoader> {
    let mut loader = ConfigLoader::new();
    if !cli.global.no_default_inis {
        loader = loader.add_toml_file_optional(DEFAULT_CONFIG_FILE);
    }
    for ini_path in &cli.global.inis {
        loader = loader.add_toml_file(ini_path);
    }
    loader = loader.with_env_prefix(ENV_PREFIX);
    for option in cli.global.to_config_overrides() {
        loader = loader.set_option(&option)?;
    }
    cli.archive.apply(loader)
}
