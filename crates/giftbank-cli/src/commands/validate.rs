use std::fs;
use std::io::Write;

use anyhow::{Context, Result};
use giftbank_engine::ValidationReport;

use crate::cli::ValidateArgs;

/// Prints every finding in `args.file`. Returns `false` if any is an error.
pub fn handle(args: &ValidateArgs, out: &mut impl Write) -> Result<bool> {
    let text = fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    let report = ValidationReport::new(&text);

    for finding in &report.findings {
        writeln!(out, "{finding}")?;
    }

    let errors = report.errors().count();
    let warnings = report.warnings().count();
    if report.is_clean() {
        writeln!(out, "{}: no problems found", args.file.display())?;
    } else {
        writeln!(
            out,
            "{}: {errors} error(s), {warnings} warning(s)",
            args.file.display()
        )?;
    }
    Ok(errors == 0)
}
