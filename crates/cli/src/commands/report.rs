use anyhow::Result;
use colored::*;
use testbed_core::orchestrator::Orchestrator;

pub fn execute(
    orchestrator: &Orchestrator,
    comment: &str,
    images: Vec<String>,
    images_folder: &str,
) -> Result<()> {
    println!("{}", "Publishing test results".bold());
    println!();

    orchestrator
        .publish_report(comment, images, images_folder)
        .map_err(|e| anyhow::anyhow!("Reporting failed: {}", e))?;

    println!();
    println!("{} {}", "✓".green().bold(), "Results published".green().bold());

    Ok(())
}
