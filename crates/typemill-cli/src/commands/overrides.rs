//! Override command - declare a column's type in a saved report.

use std::path::PathBuf;

use colored::Colorize;
use typemill::job::override_column;
use typemill::{FileReport, TypeCandidate};

pub fn run(
    report_path: PathBuf,
    column: String,
    requested: String,
) -> Result<(), Box<dyn std::error::Error>> {
    let requested = TypeCandidate::parse(&requested)
        .ok_or_else(|| format!("unknown type '{requested}'; see `typemill types`"))?;

    let mut report = FileReport::load(&report_path)?;
    let updated = override_column(&mut report, &column, requested)?;
    report.save(&report_path)?;

    println!(
        "{} {} inferred {} overridden to {}",
        "Overridden".cyan().bold(),
        updated.name.white(),
        updated.inferred.display_name(),
        updated.effective_type().display_name().green()
    );
    Ok(())
}
