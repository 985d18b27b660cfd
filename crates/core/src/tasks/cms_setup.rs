//! Steps for setting up the CMS for testing
//!
//! The CMS is either shallow-cloned from Github into a cache directory
//! (reused until it goes stale) or copied from a local folder, then
//! unpacked into the path the web server serves it from.

use std::path::{Path, PathBuf};

use crate::execution::CommandExecutor;
use crate::fsx;
use crate::output::{task_error, task_info};
use crate::platform;

const TASK_NAME: &str = "CMS setup";

/// Step provider for preparing a CMS copy to run the tests against
pub struct CmsSetup<'a> {
    executor: &'a CommandExecutor,
    base_tests_path: PathBuf,
    repository: String,
    branch: String,
    cache_time: u64,
    cms_path: String,
    cache_path: String,
    execute_user: String,
    certificates_path: String,
    cms_root_folder: String,
    cms_original_folder: String,
    exclude_copy_folders: Vec<String>,
}

impl<'a> CmsSetup<'a> {
    pub fn new(executor: &'a CommandExecutor, base_tests_path: impl Into<PathBuf>) -> Self {
        Self {
            executor,
            base_tests_path: base_tests_path.into(),
            repository: "joomla/joomla-cms".to_string(),
            branch: "staging".to_string(),
            cache_time: 86400,
            cms_path: "joomla".to_string(),
            cache_path: "cache".to_string(),
            execute_user: String::new(),
            certificates_path: String::new(),
            cms_root_folder: String::new(),
            cms_original_folder: String::new(),
            exclude_copy_folders: Vec::new(),
        }
    }

    /// Github repository (owner/repo) with the CMS
    pub fn repository(mut self, repository: impl Into<String>) -> Self {
        self.repository = repository.into();
        self
    }

    pub fn branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = branch.into();
        self
    }

    /// Cache lifetime for the cloned repository, in seconds
    pub fn cache_time(mut self, seconds: u64) -> Self {
        self.cache_time = seconds;
        self
    }

    /// Path (under the base tests path) where the CMS will run
    pub fn cms_path(mut self, cms_path: impl Into<String>) -> Self {
        self.cms_path = cms_path.into();
        self
    }

    /// Path (under the base tests path) caching the cloned repository
    pub fn cache_path(mut self, cache_path: impl Into<String>) -> Self {
        self.cache_path = cache_path.into();
        self
    }

    /// User that must own the CMS path for the web server to run it
    pub fn execute_user(mut self, user: impl Into<String>) -> Self {
        self.execute_user = user.into();
        self
    }

    /// File with extra certificates to append to the CMS certificate store
    pub fn certificates_path(mut self, path: impl Into<String>) -> Self {
        self.certificates_path = path.into();
        self
    }

    /// Root folder of the CMS in the web server
    pub fn cms_root_folder(mut self, folder: impl Into<String>) -> Self {
        self.cms_root_folder = folder.into();
        self
    }

    /// Local folder to copy the CMS from instead of cloning it
    pub fn cms_original_folder(mut self, folder: impl Into<String>) -> Self {
        self.cms_original_folder = folder.into();
        self
    }

    /// Folders excluded when copying the CMS from a local folder
    pub fn exclude_copy_folders(mut self, folders: Vec<String>) -> Self {
        self.exclude_copy_folders = folders;
        self
    }

    fn full_cache_path(&self) -> PathBuf {
        self.base_tests_path.join(&self.cache_path)
    }

    fn full_cms_path(&self) -> PathBuf {
        self.base_tests_path.join(&self.cms_path)
    }

    /// Clone the CMS repository, or reuse a still-valid cache or local copy
    pub fn clone_repository(&self) -> bool {
        task_info(TASK_NAME, "Cloning CMS repository (or validated cache)");

        if !self.base_tests_path.is_dir() {
            task_error(TASK_NAME, "No valid base path defined for tests");
            return false;
        }

        let original = Path::new(&self.cms_original_folder);
        if !self.cms_original_folder.is_empty() && original.exists() {
            if let Err(e) = fsx::copy_dir(original, &self.full_cms_path(), &self.exclude_copy_folders)
            {
                task_error(TASK_NAME, &format!("Error copying the original CMS folder: {}", e));
                return false;
            }

            return true;
        }

        if self.cache_path.is_empty() {
            task_error(TASK_NAME, "No valid base path defined for caching the CMS repository");
            return false;
        }

        let cache = self.full_cache_path();
        let stale = match fsx::modified_age(&cache) {
            Ok(age) => age.as_secs() > self.cache_time,
            Err(_) => true,
        };

        // A still-valid cache is reused as-is
        if cache.is_dir() && !stale {
            return true;
        }

        if cache.exists() {
            if let Err(e) = fsx::delete_directory(&cache) {
                task_error(TASK_NAME, &format!("Error trying to remove an old cache directory: {}", e));
                return false;
            }
        }

        let Some(command) = self.build_clone_command() else {
            return false;
        };

        self.executor.execute(&command, true)
    }

    /// Set up the CMS path from the cached repository
    pub fn setup_cms_path(&self) -> bool {
        task_info(TASK_NAME, "Setting up the CMS in its path");

        if !self.base_tests_path.is_dir() {
            task_error(TASK_NAME, "No valid base path defined for tests");
            return false;
        }

        if self.cms_path.is_empty() {
            task_error(TASK_NAME, "No valid path defined for the CMS");
            return false;
        }

        let cache = self.full_cache_path();
        if !cache.is_dir() {
            task_error(TASK_NAME, "No valid cache path defined for tests");
            return false;
        }

        let cms = self.full_cms_path();
        if cms.exists() {
            if let Err(e) = fsx::delete_directory(&cms) {
                task_error(TASK_NAME, &format!("Error trying to remove an old CMS directory: {}", e));
                return false;
            }
        }

        if let Err(e) = fsx::copy_dir(&cache, &cms, &[]) {
            task_error(TASK_NAME, &format!("Error copying from cache to create a new CMS path: {}", e));
            return false;
        }

        true
    }

    /// Fix ownership of the CMS path when an execute user is configured
    pub fn fix_path_permissions(&self) -> bool {
        task_info(TASK_NAME, "Fixing permissions to the CMS path");

        // No permission fixing on Windows
        if platform::is_windows() {
            return true;
        }

        let cms = self.full_cms_path();
        if self.cms_path.is_empty() || !cms.is_dir() {
            task_error(TASK_NAME, "No CMS path to set permissions to");
            return false;
        }

        if !self.execute_user.is_empty() {
            let command = format!("chown -R {} {}", self.execute_user, cms.display());

            if !self.executor.execute(&command, false) {
                task_error(TASK_NAME, "Permissions could not be set to the CMS path");
                return false;
            }
        }

        true
    }

    /// Enable the `.htaccess` file shipped with the CMS
    pub fn setup_htaccess(&self) -> bool {
        task_info(TASK_NAME, "Setting up .htaccess file in CMS folder");

        let cms = self.full_cms_path();
        if self.cms_path.is_empty() || !cms.is_dir() {
            task_error(TASK_NAME, "No CMS path was found");
            return false;
        }

        let source = cms.join("htaccess.txt");
        if !source.exists() {
            task_error(TASK_NAME, "No htaccess.txt found in the CMS");
            return false;
        }

        let htaccess = cms.join(".htaccess");
        if fsx::copy_file(&source, &htaccess).is_err() {
            task_error(TASK_NAME, "htaccess.txt file could not be setup");
            return false;
        }

        if !self.cms_root_folder.is_empty() {
            let rewrite = format!("RewriteBase /{}", self.cms_root_folder);

            if let Err(e) = fsx::replace_in_file(&htaccess, "# RewriteBase /", &rewrite) {
                task_error(TASK_NAME, &format!("RewriteBase could not be adjusted: {}", e));
                return false;
            }
        }

        true
    }

    /// Append the configured certificates to the CMS certificate store
    pub fn append_certificates(&self) -> bool {
        task_info(TASK_NAME, "Appending certificates to default CMS certificates file");

        let cms = self.full_cms_path();
        if self.cms_path.is_empty() || !cms.is_dir() {
            task_error(TASK_NAME, "No CMS path was found");
            return false;
        }

        let extra = Path::new(&self.certificates_path);
        if self.certificates_path.is_empty() || !extra.exists() {
            task_error(TASK_NAME, "No valid path was set for the files containing the certificates");
            return false;
        }

        let store = cms.join("libraries/joomla/http/transport/cacert.pem");
        if !store.exists() {
            task_error(TASK_NAME, "No cacert.pem file was found in the CMS folder");
            return false;
        }

        if let Err(e) = fsx::concat_files(&[&store, extra], &store) {
            task_error(TASK_NAME, &format!("Certificates could not be added to the CMS file: {}", e));
            return false;
        }

        true
    }

    /// Build the shallow clone command, validating every required parameter
    fn build_clone_command(&self) -> Option<String> {
        if self.branch.is_empty() {
            task_error(TASK_NAME, "No branch is defined for the CMS");
            return None;
        }

        if !is_valid_repository(&self.repository) {
            task_error(TASK_NAME, "No valid CMS repository was provided");
            return None;
        }

        if !self.base_tests_path.is_dir() {
            task_error(TASK_NAME, "Invalid base path for tests");
            return None;
        }

        let cache = self.full_cache_path();
        if self.cache_path.is_empty() || cache.exists() {
            task_error(TASK_NAME, "Invalid or not empty path for caching the CMS repository");
            return None;
        }

        Some(format!(
            "{} clone -b {} --single-branch --depth 1 https://github.com/{}.git {}",
            platform::git_executable(self.executor),
            self.branch,
            self.repository,
            cache.display()
        ))
    }
}

/// Check an `owner/repo` Github repository identifier
pub fn is_valid_repository(repository: &str) -> bool {
    let Some((owner, repo)) = repository.split_once('/') else {
        return false;
    };

    let valid = |part: &str| {
        !part.is_empty()
            && part
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    };

    valid(owner) && valid(repo)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repository_identifiers_are_validated() {
        assert!(is_valid_repository("joomla/joomla-cms"));
        assert!(is_valid_repository("acme_org/Extension-1"));
        assert!(!is_valid_repository("no-slash"));
        assert!(!is_valid_repository("/missing-owner"));
        assert!(!is_valid_repository("owner/"));
        assert!(!is_valid_repository("owner/repo/extra"));
        assert!(!is_valid_repository("owner/repo name"));
    }

    #[test]
    fn clone_command_is_shallow_and_single_branch() {
        let temp = tempfile::tempdir().unwrap();
        let executor = CommandExecutor::new();
        let setup = CmsSetup::new(&executor, temp.path())
            .repository("acme/extension-cms")
            .branch("4.4-dev");

        let command = setup.build_clone_command().expect("valid parameters");

        assert!(command.starts_with("git"));
        assert!(command.contains("clone -b 4.4-dev --single-branch --depth 1"));
        assert!(command.contains("https://github.com/acme/extension-cms.git"));
        assert!(command.ends_with(&temp.path().join("cache").display().to_string()));
    }

    #[test]
    fn clone_command_rejects_an_existing_cache() {
        let temp = tempfile::tempdir().unwrap();
        std::fs::create_dir(temp.path().join("cache")).unwrap();

        let executor = CommandExecutor::new();
        let setup = CmsSetup::new(&executor, temp.path());

        assert!(setup.build_clone_command().is_none());
    }

    #[test]
    fn setup_cms_path_replaces_a_previous_copy() {
        let temp = tempfile::tempdir().unwrap();
        let cache = temp.path().join("cache");
        let cms = temp.path().join("joomla");

        std::fs::create_dir_all(&cache).unwrap();
        std::fs::write(cache.join("index.php"), "<?php").unwrap();
        std::fs::create_dir_all(&cms).unwrap();
        std::fs::write(cms.join("stale.txt"), "old").unwrap();

        let executor = CommandExecutor::new();
        let setup = CmsSetup::new(&executor, temp.path());

        assert!(setup.setup_cms_path());
        assert!(cms.join("index.php").exists());
        assert!(!cms.join("stale.txt").exists());
    }

    #[test]
    fn original_folder_copy_honors_exclusions() {
        let temp = tempfile::tempdir().unwrap();
        let original = temp.path().join("original");
        std::fs::create_dir_all(original.join("node_modules")).unwrap();
        std::fs::write(original.join("index.php"), "<?php").unwrap();

        let executor = CommandExecutor::new();
        let setup = CmsSetup::new(&executor, temp.path())
            .cms_original_folder(original.display().to_string())
            .exclude_copy_folders(vec!["node_modules".to_string()]);

        assert!(setup.clone_repository());
        let cms = temp.path().join("joomla");
        assert!(cms.join("index.php").exists());
        assert!(!cms.join("node_modules").exists());
    }
}
