//! Colored terminal output for task progress

use colored::*;

/// Print a progress message for a task step
pub fn task_info(task: &str, message: &str) {
    println!("{} {}", format!("[{}]", task).cyan().bold(), message);
}

/// Print a task-level error message
pub fn task_error(task: &str, message: &str) {
    eprintln!(
        "{} {} {}",
        format!("[{}]", task).cyan().bold(),
        "✗".red().bold(),
        message.red()
    );
}

/// Print a task-level success message
pub fn task_success(task: &str, message: &str) {
    println!(
        "{} {} {}",
        format!("[{}]", task).cyan().bold(),
        "✓".green().bold(),
        message.green()
    );
}
