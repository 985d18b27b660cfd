use anyhow::Result;
use colored::*;
use testbed_core::orchestrator::{Orchestrator, RunOptions};

pub fn execute(orchestrator: &Orchestrator, options: RunOptions) -> Result<()> {
    println!(
        "{} {}",
        "Running the extension test script".bold(),
        format!("(env: {})", options.env).cyan()
    );
    println!();

    orchestrator
        .run_tests(&options)
        .map_err(|e| anyhow::anyhow!("Test run failed: {}", e))?;

    println!();
    println!(
        "{} {}",
        "✓".green().bold(),
        "All tests completed successfully!".green().bold()
    );

    Ok(())
}
