use anyhow::Result;
use colored::*;
use testbed_core::orchestrator::{Orchestrator, RunOptions};

pub fn execute(orchestrator: &Orchestrator, options: RunOptions) -> Result<()> {
    println!(
        "{} {}",
        "Preparing the testing environment".bold(),
        format!("(env: {})", options.env).cyan()
    );
    println!();

    orchestrator
        .run_test_preparation(&options)
        .map_err(|e| anyhow::anyhow!("Test preparation failed: {}", e))?;

    println!();
    println!(
        "{} {}",
        "✓".green().bold(),
        "Testing environment prepared successfully!".green().bold()
    );

    Ok(())
}
