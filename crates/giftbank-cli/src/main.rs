use std::io;
use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use giftbank_config::Config;
use giftbank_engine::{JsonFileRepository, validate_data_dir};

mod cli;
mod commands;

use cli::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);
    let config = load_config(&cli, &config_path)?;
    validate_data_dir(&config.data_dir)?;
    log::info!("Data directory: {}", config.data_dir.display());

    let repo = JsonFileRepository::new(config.data_dir.clone())
        .with_default_category_name(config.default_category_name.clone());
    let session = commands::Session::new(repo, config, config_path);

    let mut stdout = io::stdout().lock();
    commands::dispatch(cli.command, &session, &mut stdout)
}

// RUST_LOG takes precedence over --verbose
fn init_logging(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Info
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn load_config(cli: &Cli, config_path: &Path) -> Result<Config> {
    log::info!("Config path: {}", config_path.display());

    let mut config = Config::load_or_default(config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    if let Some(dir) = &cli.data_dir {
        config.data_dir = Config::expand_path(dir).unwrap_or_else(|| dir.clone());
    }
    Ok(config)
}
