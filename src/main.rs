use anyhow::Context;
use bioalgos::cli::{self, Cli, Command};
use bioalgos::config::ConfigManager;
use bioalgos::logging;
use clap::Parser;
use std::io;

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let mut manager = match &args.config {
        Some(path) => ConfigManager::load_from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => ConfigManager::new(),
    };
    manager.load_from_env()?;
    manager.apply_overrides(&args.overrides())?;
    let config = manager.into_config();

    let _guard = logging::init_logging(&config.logging)?;
    tracing::debug!(?config, "Configuration resolved");

    match args.command.unwrap_or(Command::Interactive) {
        Command::Interactive => cli::run_interactive(&config)?,
        command => cli::run_command(&command, &config, &mut io::stdout().lock())?,
    }
    Ok(())
}
