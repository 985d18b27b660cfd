//! Test run configuration
//!
//! Configuration is a flat `key = value` file (`testbed.toml` in the base
//! tests path by default) layered over built-in defaults. Values are
//! coerced to the target field's type; unknown keys, empty values and
//! type-incompatible values are silently ignored, and a missing file
//! simply leaves every default in place.

use std::fs;
use std::path::Path;

use toml::Value;

use crate::types::{TestbedError, TestbedResult};

/// Typed settings for a test run
#[derive(Debug, Clone)]
pub struct TestbedConfig {
    /// If true, the CMS repo is not cloned and the local cache is reused
    pub cms_skip_clone: bool,
    /// CMS repository (owner/repo)
    pub cms_repository: String,
    /// Base CMS branch
    pub cms_branch: String,
    /// Path of the CMS under the base tests path
    pub cms_path: String,
    /// (Linux/Mac) owner user of the CMS path, when an override is needed
    pub cms_path_owner: String,
    /// CMS root folder in the web server
    pub cms_root_folder: String,
    /// Repository cache lifetime in seconds
    pub cms_cache_time: u64,
    /// Path for the cached CMS repository, under the base tests path
    pub cache_path: String,
    /// Use insecure connections for availability probes
    pub insecure_connections: bool,

    /// Domain and port of the Selenium hub site
    pub selenium_url: String,
    /// Binary of the Selenium standalone server
    pub selenium_binary: String,
    /// Seconds to wait for the Selenium server to start
    pub selenium_timeout: u64,

    /// Path to the Codeception binary
    pub codecept_binary: String,

    pub cloudinary_cloud_name: String,
    pub cloudinary_api_key: String,
    pub cloudinary_api_secret: String,
    pub github_token: String,
    /// Github repository (owner/repo) for PR comments
    pub github_repo: String,
    /// Github pull request number
    pub github_pr: u64,
}

impl Default for TestbedConfig {
    fn default() -> Self {
        Self {
            cms_skip_clone: false,
            cms_repository: "joomla/joomla-cms".to_string(),
            cms_branch: "staging".to_string(),
            cms_path: "joomla".to_string(),
            cms_path_owner: String::new(),
            cms_root_folder: String::new(),
            cms_cache_time: 86400,
            cache_path: "cache".to_string(),
            insecure_connections: false,
            selenium_url: "http://localhost:4444".to_string(),
            selenium_binary: "vendor/bin/selenium-server-standalone".to_string(),
            selenium_timeout: 60,
            codecept_binary: "vendor/bin/codecept".to_string(),
            cloudinary_cloud_name: String::new(),
            cloudinary_api_key: String::new(),
            cloudinary_api_secret: String::new(),
            github_token: String::new(),
            github_repo: String::new(),
            github_pr: 0,
        }
    }
}

impl TestbedConfig {
    /// Load the configuration file on top of the defaults
    ///
    /// A missing file is not an error; a file that cannot be parsed is.
    pub fn load(path: &Path) -> TestbedResult<Self> {
        let mut config = Self::default();

        if !path.exists() {
            return Ok(config);
        }

        let content = fs::read_to_string(path)?;
        let table: toml::Table = content.parse().map_err(|e| {
            TestbedError::Config(format!(
                "configuration file {} could not be parsed: {}",
                path.display(),
                e
            ))
        })?;

        config.apply(&table);
        Ok(config)
    }

    /// Apply a flat key/value table, coercing each value to its field type
    pub fn apply(&mut self, table: &toml::Table) {
        for (key, value) in table {
            match key.as_str() {
                "cms_skip_clone" => set_bool(&mut self.cms_skip_clone, value),
                "cms_repository" => set_string(&mut self.cms_repository, value),
                "cms_branch" => set_string(&mut self.cms_branch, value),
                "cms_path" => set_string(&mut self.cms_path, value),
                "cms_path_owner" => set_string(&mut self.cms_path_owner, value),
                "cms_root_folder" => set_string(&mut self.cms_root_folder, value),
                "cms_cache_time" => set_integer(&mut self.cms_cache_time, value),
                "cache_path" => set_string(&mut self.cache_path, value),
                "insecure_connections" => set_bool(&mut self.insecure_connections, value),
                "selenium_url" => set_string(&mut self.selenium_url, value),
                "selenium_binary" => set_string(&mut self.selenium_binary, value),
                "selenium_timeout" => set_integer(&mut self.selenium_timeout, value),
                "codecept_binary" => set_string(&mut self.codecept_binary, value),
                "cloudinary_cloud_name" => set_string(&mut self.cloudinary_cloud_name, value),
                "cloudinary_api_key" => set_string(&mut self.cloudinary_api_key, value),
                "cloudinary_api_secret" => set_string(&mut self.cloudinary_api_secret, value),
                "github_token" => set_string(&mut self.github_token, value),
                "github_repo" => set_string(&mut self.github_repo, value),
                "github_pr" => set_integer(&mut self.github_pr, value),
                // Unknown keys are silently ignored
                _ => {}
            }
        }
    }
}

fn set_string(target: &mut String, value: &Value) {
    if let Value::String(s) = value {
        // Empty values keep the default
        if !s.is_empty() {
            *target = s.clone();
        }
    }
}

fn set_bool(target: &mut bool, value: &Value) {
    match value {
        Value::Boolean(b) => *target = *b,
        Value::Integer(i) => *target = *i != 0,
        Value::String(s) => match s.as_str() {
            "1" | "true" => *target = true,
            "0" | "false" => *target = false,
            _ => {}
        },
        _ => {}
    }
}

fn set_integer(target: &mut u64, value: &Value) {
    match value {
        Value::Integer(i) if *i >= 0 => *target = *i as u64,
        Value::String(s) => {
            if let Ok(parsed) = s.parse() {
                *target = parsed;
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_keeps_defaults() {
        let temp = tempfile::tempdir().unwrap();
        let config = TestbedConfig::load(&temp.path().join("absent.toml")).unwrap();

        assert_eq!(config.cms_repository, "joomla/joomla-cms");
        assert_eq!(config.cms_branch, "staging");
        assert_eq!(config.selenium_timeout, 60);
    }

    #[test]
    fn values_are_coerced_to_field_types() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("testbed.toml");
        fs::write(
            &path,
            concat!(
                "cms_repository = \"acme/extension-cms\"\n",
                "cms_skip_clone = \"1\"\n",
                "selenium_timeout = \"120\"\n",
                "github_pr = 42\n",
            ),
        )
        .unwrap();

        let config = TestbedConfig::load(&path).unwrap();

        assert_eq!(config.cms_repository, "acme/extension-cms");
        assert!(config.cms_skip_clone);
        assert_eq!(config.selenium_timeout, 120);
        assert_eq!(config.github_pr, 42);
    }

    #[test]
    fn unknown_and_empty_values_are_ignored() {
        let mut config = TestbedConfig::default();
        let table: toml::Table = concat!(
            "not_a_known_key = \"whatever\"\n",
            "cms_branch = \"\"\n",
            "cms_cache_time = \"not-a-number\"\n",
        )
        .parse()
        .unwrap();

        config.apply(&table);

        assert_eq!(config.cms_branch, "staging");
        assert_eq!(config.cms_cache_time, 86400);
    }

    #[test]
    fn unparseable_file_is_a_configuration_error() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("broken.toml");
        fs::write(&path, "cms_branch = [unterminated").unwrap();

        let err = TestbedConfig::load(&path).expect_err("broken file must fail");
        assert!(matches!(err, TestbedError::Config(_)));
    }
}
