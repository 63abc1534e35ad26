//! Output formatters for extraction reports

use anyhow::Result;
use colored::*;
use labelcraft_core::{Extraction, SheetReport, SkipReason};
use serde::Serialize;
use std::path::Path;

/// A file written by the run
#[derive(Debug, Serialize)]
pub struct Output {
    pub kind: String,
    pub path: String,
    pub count: usize,
}

impl Output {
    pub fn new(kind: &str, path: &Path, count: usize) -> Self {
        Self {
            kind: kind.to_string(),
            path: path.display().to_string(),
            count,
        }
    }
}

/// Print per-sheet progress, skip advisories and a summary with colors
pub fn print_human(file_path: &Path, extraction: &Extraction, outputs: &[Output]) {
    println!("{}", format!("Reading: {}", file_path.display()).bold());
    if extraction.category_codes > 0 {
        println!(
            "  {} {} category codes",
            "Nomenclature:".bold(),
            extraction.category_codes
        );
    }
    println!();

    for report in &extraction.sheets {
        print_sheet(report);
    }
    println!();

    if extraction.records.is_empty() {
        println!("{}", "✗ No records found in any sheet".red().bold());
    }

    println!("{}", "Summary:".bold().underline());
    println!(
        "  {} {} from {} sheets",
        "Records:".green().bold(),
        extraction.records.len(),
        extraction.processed_sheets().count()
    );
    let skipped = extraction.skipped_sheets().count();
    if skipped > 0 {
        println!("  {} {}", "Skipped:".yellow().bold(), skipped);
    }
    for output in outputs {
        let unit = if output.kind == "pdf" { "pages" } else { "records" };
        println!(
            "  {} {} ({} {})",
            format!("{}:", output.kind.to_uppercase()).blue().bold(),
            output.path,
            output.count,
            unit
        );
    }
}

fn print_sheet(report: &SheetReport) {
    match &report.outcome {
        Ok(count) => println!(
            "  {} {} {} {} records",
            "✓".green().bold(),
            report.name.cyan().bold(),
            format!("[{}]", report.branch).bright_black(),
            count
        ),
        Err(SkipReason::Ignored { .. }) => {
            println!("  {} {}", "-".bright_black(), report.name.bright_black())
        }
        Err(reason) => println!(
            "  {} {} {}",
            "SKIP".yellow().bold(),
            report.name.cyan(),
            reason.to_string().bright_black()
        ),
    }
}

/// Print the run report in JSON format
pub fn print_json(file_path: &Path, extraction: &Extraction, outputs: &[Output]) -> Result<()> {
    let output = serde_json::json!({
        "file": file_path.display().to_string(),
        "sheets": extraction.sheets,
        "outputs": outputs,
        "summary": {
            "records": extraction.records.len(),
            "processed_sheets": extraction.processed_sheets().count(),
            "skipped_sheets": extraction.skipped_sheets().count(),
            "category_codes": extraction.category_codes,
        }
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
