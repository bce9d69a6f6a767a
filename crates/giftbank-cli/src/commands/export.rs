use std::fs;
use std::io::Write;

use anyhow::{Context, Result};
use giftbank_engine::gift::suggested_file_name;
use giftbank_engine::{BankRepository, ExportOptions, StoreError};

use super::Session;
use crate::cli::ExportArgs;

pub fn handle<R: BankRepository>(
    args: &ExportArgs,
    session: &Session<R>,
    out: &mut impl Write,
) -> Result<()> {
    let meta = session.bank_meta(args.bank.as_deref())?;
    let bank = session.open_bank(&meta)?;

    if let Some(id) = args.category.as_deref()
        && bank.category(id).is_none()
    {
        return Err(StoreError::CategoryNotFound(id.to_string()).into());
    }

    let context_prefix = args
        .context_prefix
        .as_deref()
        .unwrap_or(&session.config.context_prefix);
    let text = bank.export_gift(&ExportOptions {
        scope: args.category.as_deref(),
        context_prefix: Some(context_prefix),
    });

    match &args.output {
        Some(path) => {
            let path = if path.is_dir() {
                path.join(suggested_file_name(&meta.name))
            } else {
                path.clone()
            };
            fs::write(&path, format!("{text}\n"))
                .with_context(|| format!("Failed to write {}", path.display()))?;
            log::info!("wrote {} bytes to {}", text.len() + 1, path.display());
            writeln!(out, "Exported '{}' to {}", meta.name, path.display())?;
        }
        None => writeln!(out, "{text}")?,
    }
    Ok(())
}
