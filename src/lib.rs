//! synthriders-rpc library root.
//! Exposes the CLI parser, the high-level run() function, and the presence pipeline.

pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod logging;
pub mod models;
pub mod net;
pub mod presence;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;
use std::path::Path;

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config, cfg_path: &Path) -> AppResult<()> {
    match &cli.command {
        Commands::Init { .. } => cli::commands::init::handle(&cli.command, cfg_path),
        Commands::Config { .. } => cli::commands::config::handle(&cli.command, cfg, cfg_path),
        Commands::Status { .. } => cli::commands::status::handle(&cli.command, cfg),
        Commands::Lookup { .. } => cli::commands::lookup::handle(&cli.command, cfg),
        Commands::CheckUpdate => cli::commands::update::handle(cfg),
        Commands::Run => cli::commands::run::handle(cfg, cfg_path),
    }
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    let cli = Cli::parse();

    let cfg_path = Config::resolve_path(cli.config.as_deref());

    // `init` and `config --check/--migrate` must work on a broken or missing file.
    let cfg = match &cli.command {
        Commands::Init { .. } => Config::default(),
        Commands::Config {
            check, migrate, ..
        } if *check || *migrate => Config::load(&cfg_path).unwrap_or_default(),
        _ => Config::load(&cfg_path)?,
    };

    dispatch(&cli, &cfg, &cfg_path)
}
