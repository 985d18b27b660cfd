//! Steps for packaging the extension under test

use crate::execution::CommandExecutor;
use crate::output::{task_error, task_info};

const TASK_NAME: &str = "Application setup";

/// Step provider for building the installable extension package
pub struct ApplicationSetup<'a> {
    executor: &'a CommandExecutor,
    package_command: String,
    package_args: String,
}

impl<'a> ApplicationSetup<'a> {
    pub fn new(executor: &'a CommandExecutor) -> Self {
        Self {
            executor,
            package_command: "gulp release".to_string(),
            package_args: "--skip-version".to_string(),
        }
    }

    pub fn package_command(mut self, command: impl Into<String>) -> Self {
        self.package_command = command.into();
        self
    }

    pub fn package_args(mut self, args: impl Into<String>) -> Self {
        self.package_args = args.into();
        self
    }

    /// Package the application using the configured command
    pub fn package_application(&self) -> bool {
        if self.package_command.is_empty() {
            task_error(TASK_NAME, "No specified command was given for packaging the application");
            return false;
        }

        let command = if self.package_args.is_empty() {
            self.package_command.clone()
        } else {
            format!("{} {}", self.package_command, self.package_args)
        };

        task_info(TASK_NAME, &format!("Packaging with {}", command));

        if !self.executor.execute(&command, true) {
            task_error(TASK_NAME, "Application packager failed");
            return false;
        }

        true
    }
}
