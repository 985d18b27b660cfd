//! High-level test orchestration interface
//!
//! The orchestrator loads the run configuration, owns the command
//! executor, and composes the step providers into ordered tasks. It is
//! the only entry point the CLI talks to; the CLI layer itself stays
//! presentation only.

use std::path::{Path, PathBuf};

use crate::config::TestbedConfig;
use crate::execution::{CommandExecutor, ExecutionResult, Task};
use crate::tasks::{
    ApplicationSetup, CmsSetup, CodeChecks, Codeception, Reporting, SeleniumServer,
};
use crate::types::TestbedResult;

/// Configuration for creating an [`Orchestrator`]
pub struct OrchestratorConfig {
    /// Base path where tests are executed
    pub base_path: PathBuf,
    /// Configuration file; defaults to `testbed.toml` under the base path
    pub config_file: Option<PathBuf>,
}

/// Options shared by the preparation and full-run flows
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Environment to get suite configuration from
    pub env: String,
    /// Execute Codeception with extended debug
    pub debug: bool,
    /// Rename and enable the embedded `.htaccess` file
    pub use_htaccess: bool,
    /// Path with extra certificates to append (empty disables)
    pub append_certificates: String,
    /// Installation suite to run after preparation (empty disables)
    pub install_suite: String,
    /// Installation test to run after preparation (empty disables)
    pub install_test: String,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            env: "desktop".to_string(),
            debug: false,
            use_htaccess: false,
            append_certificates: String::new(),
            install_suite: "acceptance".to_string(),
            install_test: "install".to_string(),
        }
    }
}

/// High-level interface over the whole testing flow
pub struct Orchestrator {
    base_path: PathBuf,
    config: TestbedConfig,
    executor: CommandExecutor,
}

impl Orchestrator {
    pub fn new(config: OrchestratorConfig) -> TestbedResult<Self> {
        let config_file = config
            .config_file
            .unwrap_or_else(|| config.base_path.join("testbed.toml"));

        Ok(Self {
            base_path: config.base_path,
            config: TestbedConfig::load(&config_file)?,
            executor: CommandExecutor::new(),
        })
    }

    pub fn config(&self) -> &TestbedConfig {
        &self.config
    }

    /// Create a testing CMS site for running the tests
    pub fn create_testing_site(
        &self,
        use_htaccess: bool,
        append_certificates: &str,
    ) -> TestbedResult<ExecutionResult> {
        let cms = CmsSetup::new(&self.executor, &self.base_path)
            .repository(&self.config.cms_repository)
            .branch(&self.config.cms_branch)
            .cache_time(self.config.cms_cache_time)
            .cms_path(&self.config.cms_path)
            .cache_path(&self.config.cache_path)
            .execute_user(&self.config.cms_path_owner)
            .cms_root_folder(&self.config.cms_root_folder)
            .certificates_path(append_certificates);

        let mut task = Task::new("CMS setup");

        // Cloning is skipped when requested and a cache is present
        let cache_present = self.base_path.join(&self.config.cache_path).is_dir();
        if !self.config.cms_skip_clone || !cache_present {
            task = task.add_step("clone repository", || cms.clone_repository());
        }

        task = task.add_step("setup CMS path", || cms.setup_cms_path());

        if !self.config.cms_path_owner.is_empty() {
            task = task.add_step("fix path permissions", || cms.fix_path_permissions());
        }

        if use_htaccess {
            task = task.add_step("setup htaccess", || cms.setup_htaccess());
        }

        if !append_certificates.is_empty() && Path::new(append_certificates).exists() {
            task = task.add_step("append certificates", || cms.append_certificates());
        }

        task.run()
    }

    /// Package the extension under test
    pub fn package_application(&self) -> TestbedResult<ExecutionResult> {
        let setup = ApplicationSetup::new(&self.executor);

        let result = Task::new("Application setup")
            .add_step("package application", || setup.package_application())
            .run();
        result
    }

    /// Start the Selenium standalone server and wait for it to be ready
    pub fn run_selenium(&self, debug: bool) -> TestbedResult<ExecutionResult> {
        let server = self.selenium_server().debug(debug).log_file("selenium.log");

        let result = Task::new("Selenium server")
            .add_step("run server", || server.run_server())
            .add_step("wait for server", || server.wait_for_server())
            .run();
        result
    }

    /// Stop the Selenium standalone server
    pub fn kill_selenium(&self) -> TestbedResult<ExecutionResult> {
        let server = self.selenium_server();

        let result = Task::new("Selenium server")
            .add_step("kill server", || server.kill_server())
            .run();
        result
    }

    /// Build the Codeception tester classes
    pub fn codeception_build(&self) -> TestbedResult<ExecutionResult> {
        let codecept = Codeception::new(&self.executor).binary(&self.config.codecept_binary);

        let result = Task::new("Codeception")
            .add_step("build", || codecept.build())
            .run();
        result
    }

    /// Run a Codeception suite/test combination
    pub fn run_codeception_suite(
        &self,
        suite: &str,
        test: &str,
        debug: bool,
        env: &str,
    ) -> TestbedResult<ExecutionResult> {
        let codecept = Codeception::new(&self.executor).binary(&self.config.codecept_binary);

        let result = Task::new("Codeception")
            .add_step("run suite", || codecept.run_suite(suite, test, debug, env))
            .run();
        result
    }

    /// Check the code style of the extension against the coding standards
    pub fn check_code_style(
        &self,
        standards_path: Option<PathBuf>,
        check_folders: Vec<String>,
    ) -> TestbedResult<ExecutionResult> {
        let standards = standards_path
            .unwrap_or_else(|| self.base_path.join(".tmp/coding-standards"))
            .display()
            .to_string();

        let checks = CodeChecks::new(&self.executor, &self.base_path)
            .standards_folder(standards)
            .style_check_folders(check_folders);

        let result = Task::new("Code checking")
            .add_step("check code style", || checks.check_code_style())
            .run();
        result
    }

    /// Upload screenshots and post the results comment to the Github PR
    pub fn publish_report(
        &self,
        comment: &str,
        images: Vec<String>,
        images_folder: &str,
    ) -> TestbedResult<ExecutionResult> {
        let reporting = Reporting::new()
            .cloudinary_cloud_name(&self.config.cloudinary_cloud_name)
            .cloudinary_api_key(&self.config.cloudinary_api_key)
            .cloudinary_api_secret(&self.config.cloudinary_api_secret)
            .github_token(&self.config.github_token)
            .github_repo(&self.config.github_repo)
            .github_pr(self.config.github_pr)
            .github_comment_body(comment)
            .folder_images_to_upload(images_folder);
        let upload = !images.is_empty() || !images_folder.is_empty();
        let reporting = reporting.images_to_upload(images);

        let mut task = Task::new("Reporting");

        if upload {
            task = task.add_step("publish images", || reporting.publish_images());
        }

        let result = task
            .add_step("publish github comment", || reporting.publish_github_comment())
            .run();
        result
    }

    /// Prepare the environment and run the install suite when configured
    pub fn run_test_preparation(&self, options: &RunOptions) -> TestbedResult<()> {
        self.create_testing_site(options.use_htaccess, &options.append_certificates)?;
        self.package_application()?;
        self.run_selenium(options.debug)?;
        self.codeception_build()?;

        if !options.install_suite.is_empty() && !options.install_test.is_empty() {
            self.run_codeception_suite(
                &options.install_suite,
                &options.install_test,
                options.debug,
                &options.env,
            )?;
        }

        Ok(())
    }

    /// Run the whole test script, stopping the Selenium server at the end
    pub fn run_tests(&self, options: &RunOptions) -> TestbedResult<()> {
        self.run_test_preparation(options)?;
        self.kill_selenium()?;

        Ok(())
    }

    fn selenium_server(&self) -> SeleniumServer<'_> {
        SeleniumServer::new(&self.executor)
            .url(&self.config.selenium_url)
            .binary(&self.config.selenium_binary)
            .timeout(self.config.selenium_timeout)
            .insecure(self.config.insecure_connections)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TestbedError;

    fn orchestrator(base: &Path) -> Orchestrator {
        Orchestrator::new(OrchestratorConfig {
            base_path: base.to_path_buf(),
            config_file: None,
        })
        .expect("defaults load without a config file")
    }

    #[test]
    fn orchestrator_loads_defaults_without_config_file() {
        let temp = tempfile::tempdir().unwrap();
        let orchestrator = orchestrator(temp.path());

        assert_eq!(orchestrator.config().cms_branch, "staging");
    }

    #[test]
    fn orchestrator_reads_the_config_file_from_the_base_path() {
        let temp = tempfile::tempdir().unwrap();
        std::fs::write(
            temp.path().join("testbed.toml"),
            "cms_branch = \"4.4-dev\"\n",
        )
        .unwrap();

        let orchestrator = orchestrator(temp.path());
        assert_eq!(orchestrator.config().cms_branch, "4.4-dev");
    }

    #[test]
    fn run_selenium_fails_without_a_server_binary() {
        let temp = tempfile::tempdir().unwrap();
        let orchestrator = orchestrator(temp.path());

        let err = orchestrator
            .run_selenium(false)
            .expect_err("missing binary must fail the task");
        assert!(matches!(err, TestbedError::Execution(_)));
    }

    #[test]
    fn reporting_without_credentials_fails_the_task() {
        let temp = tempfile::tempdir().unwrap();
        let orchestrator = orchestrator(temp.path());

        let err = orchestrator
            .publish_report("results", Vec::new(), "")
            .expect_err("missing credentials must fail the task");
        assert!(matches!(err, TestbedError::Execution(_)));
    }
}
