use std::io::Write;

use anyhow::Result;
use giftbank_engine::{BankRepository, BankSnapshot};

use super::Session;
use crate::cli::BankCommands;

pub fn handle<R: BankRepository>(
    action: &BankCommands,
    session: &Session<R>,
    out: &mut impl Write,
) -> Result<()> {
    let mut registry = session.repo.load_registry()?;

    match action {
        BankCommands::List => {
            for bank in &registry.banks {
                let marker = if bank.id == registry.active_bank_id {
                    '*'
                } else {
                    ' '
                };
                writeln!(out, "{marker} {} [{}]", bank.name, bank.id)?;
            }
            return Ok(());
        }
        BankCommands::Create { name } => {
            let id = registry.create_bank(name.as_str());
            session.repo.save(
                &id,
                &BankSnapshot::with_root_name(&session.config.default_category_name),
            )?;
            writeln!(out, "Created bank '{name}' [{id}] and made it active")?;
        }
        BankCommands::Rename { id, name } => {
            registry.rename_bank(id, name.as_str())?;
            writeln!(out, "Renamed bank [{id}] to '{name}'")?;
        }
        BankCommands::Delete { id } => {
            let removed = registry.delete_bank(id)?;
            session.repo.remove(&removed.id)?;
            writeln!(out, "Deleted bank '{}' [{}]", removed.name, removed.id)?;
        }
        BankCommands::Use { id } => {
            registry.switch_bank(id)?;
            writeln!(out, "Active bank is now [{id}]")?;
        }
    }

    session.repo.save_registry(&registry)?;
    Ok(())
}
