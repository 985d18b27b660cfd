use anyhow::Result;
use colored::*;
use testbed_core::orchestrator::Orchestrator;

pub fn build(orchestrator: &Orchestrator) -> Result<()> {
    println!("{}", "Building Codeception tester classes".bold());

    orchestrator
        .codeception_build()
        .map_err(|e| anyhow::anyhow!("Codeception build failed: {}", e))?;

    println!("{} {}", "✓".green().bold(), "Codeception build complete".green());

    Ok(())
}

pub fn run_suite(
    orchestrator: &Orchestrator,
    suite: &str,
    test: &str,
    debug: bool,
    env: &str,
) -> Result<()> {
    println!(
        "{} {}",
        "Running Codeception suite".bold(),
        format!("{} {}", suite, test).cyan()
    );
    println!();

    let result = orchestrator
        .run_codeception_suite(suite, test, debug, env)
        .map_err(|e| anyhow::anyhow!("Suite run failed: {}", e))?;

    println!();
    println!(
        "{} {} {}",
        "✓".green().bold(),
        result.message.green().bold(),
        format!("({:.1}s)", result.elapsed.as_secs_f64()).bright_black()
    );

    Ok(())
}
