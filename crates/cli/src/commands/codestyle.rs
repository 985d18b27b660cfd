use std::path::PathBuf;

use anyhow::Result;
use colored::*;
use testbed_core::orchestrator::Orchestrator;

pub fn execute(
    orchestrator: &Orchestrator,
    standards_path: Option<PathBuf>,
    folders: Vec<String>,
) -> Result<()> {
    println!(
        "{} {}",
        "Checking code style in".bold(),
        folders.join(", ").cyan()
    );
    println!();

    orchestrator
        .check_code_style(standards_path, folders)
        .map_err(|e| anyhow::anyhow!("Code style check failed: {}", e))?;

    println!();
    println!("{} {}", "✓".green().bold(), "No code style errors detected".green().bold());

    Ok(())
}
