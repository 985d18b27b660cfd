//! Steps for performing code checks over the extension repository
//!
//! Three independent checks: PHP parse errors, debug leftovers
//! (`var_dump`, `console.log`) and code style against a cloned
//! coding-standards repository. The first two visit every configured
//! folder before giving their verdict, so a single run reports all
//! offending folders.

use std::path::{Path, PathBuf};

use crate::execution::CommandExecutor;
use crate::output::{task_error, task_info};
use crate::platform;
use crate::tasks::cms_setup::is_valid_repository;

const TASK_NAME: &str = "Code checking";

/// Step provider for the repository code checks
pub struct CodeChecks<'a> {
    executor: &'a CommandExecutor,
    base_repository_path: PathBuf,
    php_executable: String,
    parse_check_folders: Vec<String>,
    debug_leftover_folders: Vec<String>,
    standards_folder: String,
    standards_repo: String,
    standards_branch: String,
    style_check_folders: Vec<String>,
    style_excluded_paths: Vec<String>,
    style_extra_folder: bool,
    style_name: String,
}

impl<'a> CodeChecks<'a> {
    pub fn new(executor: &'a CommandExecutor, base_repository_path: impl Into<PathBuf>) -> Self {
        Self {
            executor,
            base_repository_path: base_repository_path.into(),
            php_executable: "php".to_string(),
            parse_check_folders: Vec::new(),
            debug_leftover_folders: Vec::new(),
            standards_folder: String::new(),
            standards_repo: "joomla/coding-standards".to_string(),
            standards_branch: "master".to_string(),
            style_check_folders: Vec::new(),
            style_excluded_paths: Vec::new(),
            style_extra_folder: false,
            style_name: "Joomla".to_string(),
        }
    }

    pub fn php_executable(mut self, php: impl Into<String>) -> Self {
        self.php_executable = php.into();
        self
    }

    /// Folders (under the repository base) included in the parse check
    pub fn parse_check_folders(mut self, folders: Vec<String>) -> Self {
        self.parse_check_folders = folders;
        self
    }

    /// Folders (under the repository base) checked for debug leftovers
    pub fn debug_leftover_folders(mut self, folders: Vec<String>) -> Self {
        self.debug_leftover_folders = folders;
        self
    }

    /// Folder where the coding standard definitions are stored/cloned
    pub fn standards_folder(mut self, folder: impl Into<String>) -> Self {
        self.standards_folder = folder.into();
        self
    }

    /// Repository (owner/repo) with the coding standard definitions
    pub fn standards_repo(mut self, repo: impl Into<String>) -> Self {
        self.standards_repo = repo.into();
        self
    }

    pub fn standards_branch(mut self, branch: impl Into<String>) -> Self {
        self.standards_branch = branch.into();
        self
    }

    /// Folders (under the repository base) to run the style check in
    pub fn style_check_folders(mut self, folders: Vec<String>) -> Self {
        self.style_check_folders = folders;
        self
    }

    /// Paths excluded from the style check
    pub fn style_excluded_paths(mut self, paths: Vec<String>) -> Self {
        self.style_excluded_paths = paths;
        self
    }

    /// Clone into an extra standard-name folder (sniffs in the repo root)
    pub fn style_extra_folder(mut self, extra: bool) -> Self {
        self.style_extra_folder = extra;
        self
    }

    /// Name of the coding standard to check against
    pub fn style_name(mut self, name: impl Into<String>) -> Self {
        self.style_name = name.into();
        self
    }

    /// Check for parse errors through the code
    pub fn check_parse_errors(&self) -> bool {
        task_info(TASK_NAME, "Checking for parse errors over the code");

        if !self.check_preconditions(&self.parse_check_folders, "checking parse errors") {
            return false;
        }

        let mut clean = true;

        for folder in &self.parse_check_folders {
            task_info(TASK_NAME, &format!("Performing parse errors check in folder {}", folder));

            let Some(full_path) = self.existing_folder(folder) else {
                clean = false;
                continue;
            };

            let command = format!(
                "find {} -name \"*.php\" -exec {} -l {{}} \\; | grep \"Errors parsing\"",
                full_path.display(),
                self.php_executable
            );

            // grep exits non-zero when nothing matches, so only the
            // captured output decides the verdict
            let outcome = self.executor.execute_capturing(&command, false);

            if !outcome.captured_output.is_empty() {
                task_error(
                    TASK_NAME,
                    &format!("Parse errors were found in folder {}:\n{}", folder, outcome.captured_output),
                );
                clean = false;
            }
        }

        clean
    }

    /// Check for debug leftovers (var_dump, console.log, etc)
    pub fn check_debug_leftovers(&self) -> bool {
        task_info(TASK_NAME, "Checking for debug leftovers");

        if !self.check_preconditions(&self.debug_leftover_folders, "checking for debug leftovers") {
            return false;
        }

        let mut clean = true;

        for folder in &self.debug_leftover_folders {
            task_info(TASK_NAME, &format!("Performing debug leftovers check in folder {}", folder));

            let Some(full_path) = self.existing_folder(folder) else {
                clean = false;
                continue;
            };

            let php_command = format!("grep -r --include \"*.php\" var_dump {}", full_path.display());
            let js_command = format!(
                "grep -r --include \"*.js\" --include \"*.php\" console.log {}",
                full_path.display()
            );

            let php_leftovers = self.executor.execute_capturing(&php_command, false).captured_output;
            let js_leftovers = self.executor.execute_capturing(&js_command, false).captured_output;

            if !php_leftovers.is_empty() || !js_leftovers.is_empty() {
                task_error(
                    TASK_NAME,
                    &format!(
                        "Debug leftovers were found in folder {}:\n{}{}",
                        folder, php_leftovers, js_leftovers
                    ),
                );
                clean = false;
            }
        }

        clean
    }

    /// Check code style against the configured standard
    pub fn check_code_style(&self) -> bool {
        task_info(TASK_NAME, "Checking for code style standards");

        if !self.check_preconditions(&self.style_check_folders, "checking for code styling") {
            return false;
        }

        if self.standards_folder.is_empty() {
            task_error(TASK_NAME, "No folder for coding standards was given");
            return false;
        }

        if !Path::new(&self.standards_folder).is_dir() && !self.clone_standards() {
            return false;
        }

        let command = self.style_command();

        if !self.executor.execute(&command, true) {
            task_error(TASK_NAME, "There were code styling errors detected");
            return false;
        }

        true
    }

    fn check_preconditions(&self, folders: &[String], purpose: &str) -> bool {
        if self.php_executable.is_empty() {
            task_error(TASK_NAME, "No valid PHP executable was given");
            return false;
        }

        if self.base_repository_path.as_os_str().is_empty() {
            task_error(TASK_NAME, "Please set the base path of the repository");
            return false;
        }

        if folders.is_empty() {
            task_error(TASK_NAME, &format!("No folders for {} were given", purpose));
            return false;
        }

        true
    }

    fn existing_folder(&self, folder: &str) -> Option<PathBuf> {
        let full_path = self.base_repository_path.join(folder);

        if !full_path.is_dir() {
            task_error(TASK_NAME, &format!("Folder {} is not valid", folder));
            return None;
        }

        Some(full_path)
    }

    /// Clone the coding standards definition repository
    fn clone_standards(&self) -> bool {
        if !is_valid_repository(&self.standards_repo) || self.standards_branch.is_empty() {
            task_error(TASK_NAME, "No repo/branch for coding standards were given");
            return false;
        }

        let mut destination = self.standards_folder.clone();

        // Standards with sniffs in the repository root need the standard
        // name as an extra folder level
        if self.style_extra_folder {
            destination = format!("{}/{}", destination, self.style_name);
        }

        let command = format!(
            "{} clone -b {} --single-branch --depth 1 https://github.com/{}.git {}",
            platform::git_executable(self.executor),
            self.standards_branch,
            self.standards_repo,
            destination
        );

        if !self.executor.execute(&command, true) {
            task_error(TASK_NAME, "Cloning the code style standards definition failed");
            return false;
        }

        true
    }

    fn style_command(&self) -> String {
        let folders: Vec<String> = self
            .style_check_folders
            .iter()
            .map(|f| self.base_repository_path.join(f).display().to_string())
            .collect();

        let mut command = format!(
            "phpcs -p --extensions=php --standard={} --runtime-set installed_paths {}",
            self.style_name, self.standards_folder
        );

        if !self.style_excluded_paths.is_empty() {
            let excluded: Vec<String> = self
                .style_excluded_paths
                .iter()
                .map(|p| self.base_repository_path.join(p).display().to_string())
                .collect();
            command.push_str(&format!(" --ignore={}", excluded.join(",")));
        }

        command.push(' ');
        command.push_str(&folders.join(" "));
        command
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn style_command_includes_standard_and_folders() {
        let executor = CommandExecutor::new();
        let checks = CodeChecks::new(&executor, "/repo")
            .standards_folder("/standards")
            .style_check_folders(vec!["src".to_string(), "lib".to_string()]);

        let command = checks.style_command();

        assert!(command.starts_with("phpcs -p --extensions=php --standard=Joomla"));
        assert!(command.contains("--runtime-set installed_paths /standards"));
        assert!(command.ends_with("/repo/src /repo/lib"));
    }

    #[test]
    fn style_command_appends_ignored_paths() {
        let executor = CommandExecutor::new();
        let checks = CodeChecks::new(&executor, "/repo")
            .standards_folder("/standards")
            .style_check_folders(vec!["src".to_string()])
            .style_excluded_paths(vec!["src/vendor".to_string()]);

        assert!(checks.style_command().contains("--ignore=/repo/src/vendor"));
    }

    #[test]
    fn checks_fail_without_configured_folders() {
        let executor = CommandExecutor::new();
        let checks = CodeChecks::new(&executor, "/repo");

        assert!(!checks.check_parse_errors());
        assert!(!checks.check_debug_leftovers());
        assert!(!checks.check_code_style());
    }

    #[test]
    fn parse_check_reports_missing_folders() {
        let temp = tempfile::tempdir().unwrap();
        let executor = CommandExecutor::new();
        let checks = CodeChecks::new(&executor, temp.path())
            .parse_check_folders(vec!["missing".to_string()]);

        assert!(!checks.check_parse_errors());
    }
}
