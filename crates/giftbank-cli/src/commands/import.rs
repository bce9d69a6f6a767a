use std::fs;
use std::io::Write;

use anyhow::{Context, Result};
use giftbank_engine::{BankRepository, StoreError};

use super::Session;
use crate::cli::ImportArgs;

pub fn handle<R: BankRepository>(
    args: &ImportArgs,
    session: &Session<R>,
    out: &mut impl Write,
) -> Result<()> {
    let text = fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    let meta = session.bank_meta(args.bank.as_deref())?;
    let mut bank = session.open_bank(&meta)?;

    let summary = match bank.import_gift(&text) {
        Ok(summary) => summary,
        Err(StoreError::ImportBlocked(findings)) => {
            for finding in findings.iter().filter(|f| f.is_error()) {
                writeln!(out, "{finding}")?;
            }
            anyhow::bail!(
                "Import blocked: fix the errors in {} first",
                args.file.display()
            );
        }
        Err(e) => return Err(e.into()),
    };
    session.save_bank(&meta, &bank)?;

    for warning in &summary.warnings {
        writeln!(out, "{warning}")?;
    }
    writeln!(
        out,
        "Imported {} question(s) and {} new category(ies) into '{}'",
        summary.questions_added, summary.categories_added, meta.name
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{memory_session, output};
    use tempfile::TempDir;

    fn args_for(dir: &TempDir, text: &str) -> ImportArgs {
        let file = dir.path().join("input.gift");
        fs::write(&file, text).unwrap();
        ImportArgs { file, bank: None }
    }

    #[test]
    fn test_import_saves_bank() {
        let dir = TempDir::new().unwrap();
        let session = memory_session();
        let args = args_for(
            &dir,
            "$CATEGORY: top/Physics\n\n::Q1::Speed?{\n=Fast\n~Slow\n}\n\n::Q2::{\n~A\n~B\n}",
        );
        let mut out = Vec::new();

        handle(&args, &session, &mut out).unwrap();

        let out = output(out);
        assert!(out.contains("warning"));
        assert!(out.ends_with("Imported 2 question(s) and 1 new category(ies) into 'Default Bank'\n"));
        let saved = session.repo.load("default").unwrap();
        assert_eq!(saved.questions.len(), 2);
        assert!(saved.categories.iter().any(|c| c.name == "Physics"));
    }

    #[test]
    fn test_import_blocked_by_errors() {
        let dir = TempDir::new().unwrap();
        let session = memory_session();
        let args = args_for(&dir, "::Q1::no braces");
        let mut out = Vec::new();

        let err = handle(&args, &session, &mut out).unwrap_err();

        assert!(err.to_string().starts_with("Import blocked"));
        assert!(output(out).contains("Missing opening brace"));
        assert!(session.repo.load("default").unwrap().questions.is_empty());
    }
}
