use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use giftbank_config::Config;
use giftbank_engine::{BankMetadata, BankRepository, QuestionBank, RegistryError};

use crate::cli::Commands;

pub mod bank;
pub mod config;
pub mod export;
pub mod import;
pub mod list;
pub mod validate;

/// Repository and settings shared by the command handlers
pub struct Session<R> {
    pub repo: R,
    pub config: Config,
    /// Where `config` was read from, and where `config init` writes it
    pub config_path: PathBuf,
}

impl<R: BankRepository> Session<R> {
    pub fn new(repo: R, config: Config, config_path: PathBuf) -> Self {
        Self {
            repo,
            config,
            config_path,
        }
    }

    /// The bank named by `bank_id`, or the active bank when it is `None`
    pub fn bank_meta(&self, bank_id: Option<&str>) -> Result<BankMetadata> {
        let registry = self.repo.load_registry()?;
        let id = bank_id.unwrap_or(&registry.active_bank_id);
        let meta = registry
            .get(id)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound(id.to_string()))?;
        Ok(meta)
    }

    pub fn open_bank(&self, meta: &BankMetadata) -> Result<QuestionBank> {
        let snapshot = self
            .repo
            .load(&meta.id)
            .with_context(|| format!("Failed to load bank '{}'", meta.name))?;
        Ok(QuestionBank::new(snapshot))
    }

    pub fn save_bank(&self, meta: &BankMetadata, bank: &QuestionBank) -> Result<()> {
        self.repo
            .save(&meta.id, &bank.snapshot())
            .with_context(|| format!("Failed to save bank '{}'", meta.name))
    }
}

/// Dispatch a parsed command to the corresponding handler module.
pub fn dispatch<R: BankRepository>(
    command: Commands,
    session: &Session<R>,
    out: &mut impl Write,
) -> Result<ExitCode> {
    match command {
        Commands::Validate(args) => {
            let clean = validate::handle(&args, out)?;
            return Ok(if clean {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            });
        }
        Commands::Import(args) => import::handle(&args, session, out)?,
        Commands::Export(args) => export::handle(&args, session, out)?,
        Commands::List(args) => list::handle(&args, session, out)?,
        Commands::Bank { action } => bank::handle(&action, session, out)?,
        Commands::Config { action } => config::handle(&action, session, out)?,
    }
    Ok(ExitCode::SUCCESS)
}


#[cfg(test)]
mod tests {
    use super::test_support::memory_session;

    #[test]
    fn test_bank_meta_defaults_to_active_bank() {
        let session = memory_session();

        let meta = session.bank_meta(None).unwrap();

        assert_eq!(meta.id, "default");
        assert_eq!(meta.name, "Default Bank");
    }

    #[test]
    fn test_bank_meta_unknown_id_fails() {
        let session = memory_session();

        let err = session.bank_meta(Some("nope")).unwrap_err();

        assert!(err.to_string().contains("nope"));
    }
}
