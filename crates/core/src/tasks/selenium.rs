//! Steps for executing and stopping a Selenium standalone server
//!
//! The server binary is launched detached so the caller is not blocked;
//! readiness is then polled against the webdriver hub endpoint with a
//! bounded wait.

use std::path::Path;
use std::time::Duration;

use crate::execution::{CommandExecutor, Waiter};
use crate::output::{task_error, task_info, task_success};

const TASK_NAME: &str = "Selenium server";

/// Step provider for the Selenium standalone server lifecycle
pub struct SeleniumServer<'a> {
    executor: &'a CommandExecutor,
    url: String,
    binary: String,
    debug: bool,
    log_file: String,
    timeout: u64,
    insecure: bool,
}

impl<'a> SeleniumServer<'a> {
    pub fn new(executor: &'a CommandExecutor) -> Self {
        Self {
            executor,
            url: "http://localhost:4444".to_string(),
            binary: "vendor/bin/selenium-server-standalone".to_string(),
            debug: false,
            log_file: "selenium.log".to_string(),
            timeout: 60,
            insecure: false,
        }
    }

    /// Domain and port of the Selenium hub site
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Binary of the Selenium standalone server
    pub fn binary(mut self, binary: impl Into<String>) -> Self {
        self.binary = binary.into();
        self
    }

    /// Include the debug option in the server parameters
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Catch-all log file for the server output (empty disables logging)
    pub fn log_file(mut self, log_file: impl Into<String>) -> Self {
        self.log_file = log_file.into();
        self
    }

    /// Seconds to wait for the server to start
    pub fn timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Probe availability over insecure connections
    pub fn insecure(mut self, insecure: bool) -> Self {
        self.insecure = insecure;
        self
    }

    /// Start the server with the given options, detached
    pub fn run_server(&self) -> bool {
        task_info(TASK_NAME, "Executing Selenium standalone server");

        // Without a binary on disk there is nothing to start
        if self.binary.is_empty() || !Path::new(&self.binary).exists() {
            task_error(TASK_NAME, "No Selenium binary provided for execution");
            return false;
        }

        if !self.executor.execute_detached(&self.server_command()) {
            task_error(TASK_NAME, "Selenium server execution failed");
            return false;
        }

        true
    }

    /// Wait for the webdriver hub to become available
    pub fn wait_for_server(&self) -> bool {
        task_info(TASK_NAME, "Waiting for Selenium standalone server to launch");

        let waiter = Waiter::new(Duration::from_secs(1), Duration::from_secs(self.timeout));
        let hub = format!("{}/wd/hub", self.url);

        match waiter.wait_for("Selenium server", || self.is_url_available(&hub)) {
            Ok(()) => {
                task_success(TASK_NAME, "Selenium server is executing correctly");
                true
            }
            Err(e) => {
                task_error(TASK_NAME, &format!("Selenium server execution failed ({})", e));
                false
            }
        }
    }

    /// Stop the server in execution
    pub fn kill_server(&self) -> bool {
        task_info(TASK_NAME, "Stopping Selenium server");

        let command = format!(
            "curl {}/selenium-server/driver/?cmd=shutDownSeleniumServer",
            self.url
        );

        if self.executor.execute(&command, false) {
            task_success(TASK_NAME, "Selenium stopped successfully");
            return true;
        }

        task_error(TASK_NAME, "Selenium failed to be stopped");
        false
    }

    fn server_command(&self) -> String {
        let mut command = self.binary.clone();

        if self.debug {
            command.push_str(" -debug");
        }

        if !self.log_file.is_empty() {
            command.push_str(&format!(" >> {} 2>&1", self.log_file));
        }

        command
    }

    fn is_url_available(&self, url: &str) -> bool {
        let insecure = if self.insecure { "--insecure " } else { "" };
        let command = format!("curl {}--output /dev/null --silent {}", insecure, url);

        self.executor.execute(&command, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_command_includes_debug_and_log_redirection() {
        let executor = CommandExecutor::new();
        let server = SeleniumServer::new(&executor)
            .binary("bin/selenium")
            .debug(true)
            .log_file("selenium.log");

        assert_eq!(server.server_command(), "bin/selenium -debug >> selenium.log 2>&1");
    }

    #[test]
    fn server_command_without_log_file_keeps_output() {
        let executor = CommandExecutor::new();
        let server = SeleniumServer::new(&executor).binary("bin/selenium").log_file("");

        assert_eq!(server.server_command(), "bin/selenium");
    }

    #[test]
    fn run_server_requires_an_existing_binary() {
        let executor = CommandExecutor::new();
        let server = SeleniumServer::new(&executor).binary("does/not/exist");

        assert!(!server.run_server());
    }
}
