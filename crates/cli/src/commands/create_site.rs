use anyhow::Result;
use colored::*;
use testbed_core::orchestrator::Orchestrator;

pub fn execute(
    orchestrator: &Orchestrator,
    use_htaccess: bool,
    append_certificates: &str,
) -> Result<()> {
    println!("{}", "Creating the testing site".bold());
    println!();

    let result = orchestrator
        .create_testing_site(use_htaccess, append_certificates)
        .map_err(|e| anyhow::anyhow!("Site creation failed: {}", e))?;

    println!();
    println!(
        "{} {} {}",
        "✓".green().bold(),
        result.message.green().bold(),
        format!("({:.1}s)", result.elapsed.as_secs_f64()).bright_black()
    );

    Ok(())
}
