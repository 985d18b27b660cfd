//! Platform detection utilities

use crate::execution::CommandExecutor;

/// Check if the local OS is Windows
pub fn is_windows() -> bool {
    cfg!(target_os = "windows")
}

/// Get the git executable name according to the operating system
///
/// On Windows the `.exe` suffix is only used when `git.exe` actually
/// responds; everywhere else plain `git` is assumed to be on the path.
pub fn git_executable(executor: &CommandExecutor) -> String {
    if is_windows() && executor.execute("git.exe --version", false) {
        return "git.exe".to_string();
    }

    "git".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(not(target_os = "windows"))]
    fn git_executable_has_no_extension_outside_windows() {
        let executor = CommandExecutor::new();
        assert_eq!(git_executable(&executor), "git");
    }
}
