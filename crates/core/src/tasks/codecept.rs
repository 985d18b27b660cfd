//! Steps for building and running Codeception test suites

use crate::execution::CommandExecutor;
use crate::output::{task_error, task_info};

const TASK_NAME: &str = "Codeception";

/// Step provider for the Codeception build and suite runs
pub struct Codeception<'a> {
    executor: &'a CommandExecutor,
    binary: String,
}

impl<'a> Codeception<'a> {
    pub fn new(executor: &'a CommandExecutor) -> Self {
        Self {
            executor,
            binary: "vendor/bin/codecept".to_string(),
        }
    }

    /// Path to the Codeception binary
    pub fn binary(mut self, binary: impl Into<String>) -> Self {
        self.binary = binary.into();
        self
    }

    /// Generate the tester classes for the configured suites
    pub fn build(&self) -> bool {
        if self.binary.is_empty() {
            task_error(TASK_NAME, "No Codeception binary was given");
            return false;
        }

        let command = format!("{} build", self.binary);
        task_info(TASK_NAME, &format!("Executing {}", command));

        if !self.executor.execute(&command, true) {
            task_error(TASK_NAME, "Codeception build failed");
            return false;
        }

        true
    }

    /// Run one suite/test combination, streaming its output
    pub fn run_suite(&self, suite: &str, test: &str, debug: bool, env: &str) -> bool {
        if self.binary.is_empty() {
            task_error(TASK_NAME, "No Codeception binary was given");
            return false;
        }

        if suite.is_empty() || test.is_empty() {
            task_error(TASK_NAME, "No suite or test was given for execution");
            return false;
        }

        let command = self.suite_command(suite, test, debug, env);
        task_info(TASK_NAME, &format!("Executing {}", command));

        if !self.executor.execute(&command, true) {
            task_error(TASK_NAME, &format!("Suite {} failed", suite));
            return false;
        }

        true
    }

    fn suite_command(&self, suite: &str, test: &str, debug: bool, env: &str) -> String {
        let mut command = format!("{} run {} {} --fail-fast", self.binary, suite, test);

        if debug {
            command.push_str(" --steps --debug");
        }

        if !env.is_empty() {
            command.push_str(&format!(" --env {}", env));
        }

        command
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suite_command_is_fail_fast_by_default() {
        let executor = CommandExecutor::new();
        let codecept = Codeception::new(&executor).binary("codecept");

        assert_eq!(
            codecept.suite_command("acceptance", "install", false, ""),
            "codecept run acceptance install --fail-fast"
        );
    }

    #[test]
    fn suite_command_adds_debug_and_environment_flags() {
        let executor = CommandExecutor::new();
        let codecept = Codeception::new(&executor).binary("codecept");

        assert_eq!(
            codecept.suite_command("acceptance", "install", true, "desktop"),
            "codecept run acceptance install --fail-fast --steps --debug --env desktop"
        );
    }

    #[test]
    fn run_suite_requires_suite_and_test() {
        let executor = CommandExecutor::new();
        let codecept = Codeception::new(&executor);

        assert!(!codecept.run_suite("", "install", false, ""));
        assert!(!codecept.run_suite("acceptance", "", false, ""));
    }
}
