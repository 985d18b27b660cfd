use anyhow::Result;
use colored::*;
use testbed_core::orchestrator::Orchestrator;

pub fn run(orchestrator: &Orchestrator, debug: bool) -> Result<()> {
    println!("{}", "Starting Selenium standalone server".bold());

    orchestrator
        .run_selenium(debug)
        .map_err(|e| anyhow::anyhow!("Selenium startup failed: {}", e))?;

    println!("{} {}", "✓".green().bold(), "Selenium server is ready".green());

    Ok(())
}

pub fn kill(orchestrator: &Orchestrator) -> Result<()> {
    println!("{}", "Stopping Selenium standalone server".bold());

    orchestrator
        .kill_selenium()
        .map_err(|e| anyhow::anyhow!("Selenium shutdown failed: {}", e))?;

    println!("{} {}", "✓".green().bold(), "Selenium server stopped".green());

    Ok(())
}
