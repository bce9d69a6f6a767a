use std::io::Write;

use anyhow::{Result, bail};
use giftbank_engine::BankRepository;

use super::Session;
use crate::cli::ConfigCommands;

pub fn handle<R: BankRepository>(
    action: &ConfigCommands,
    session: &Session<R>,
    out: &mut impl Write,
) -> Result<()> {
    match action {
        ConfigCommands::Init { force } => {
            let path = &session.config_path;
            if path.exists() && !force {
                bail!(
                    "Config file {} already exists (use --force to replace it)",
                    path.display()
                );
            }
            session.config.save_to_path(path)?;
            log::info!("wrote config to {}", path.display());
            writeln!(out, "Wrote config to {}", path.display())?;
        }
    }
    Ok(())
}
