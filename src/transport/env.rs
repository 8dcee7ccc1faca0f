//! Allow-listed child process environment
//!
//! Server subprocesses never inherit the full parent environment. Only a small
//! platform-specific set of variables is forwarded, and values that look like
//! exported shell functions are skipped.

use std::collections::HashMap;

#[cfg(unix)]
const DEFAULT_ENVIRONMENT_VARIABLES: &[&str] = &[
    "HOME", "LOGNAME", "PATH", "SHELL", "TERM", "USER",
];

#[cfg(windows)]
const DEFAULT_ENVIRONMENT_VARIABLES: &[&str] = &[
    "HOMEDRIVE",
    "HOMEPATH",
    "LOCALAPPDATA",
    "PATH",
    "PROCESSOR_ARCHITECTURE",
    "SYSTEMDRIVE",
    "SYSTEMROOT",
    "TEMP",
    "USERNAME",
    "USERPROFILE",
];

/// The default environment for a server subprocess, read from this process
pub fn default_environment() -> HashMap<String, String> {
    default_environment_from(|name| std::env::var(name).ok())
}

/// Build the default environment using the given variable lookup
///
/// The lookup is injectable so tests can run against a fixed fake environment
/// instead of whatever the host happens to export.
pub fn default_environment_from<F>(lookup: F) -> HashMap<String, String>
where
    F: Fn(&str) -> Option<String>,
{
    let mut env = HashMap::new();
    for &name in DEFAULT_ENVIRONMENT_VARIABLES {
        if let Some(value) = lookup(name) {
            // Exported bash functions begin with "()" and could carry code
            if value.starts_with("()") {
                continue;
            }
            env.insert(name.to_string(), value);
        }
    }
    env
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[cfg(unix)]
    #[test]
    fn test_only_allow_listed_variables_are_forwarded() {
        let fake = |name: &str| match name {
            "PATH" => Some("/usr/bin".to_string()),
            "HOME" => Some("/home/test".to_string()),
            _ => None,
        };
        let env = default_environment_from(fake);
        assert_eq!(env.get("PATH").map(String::as_str), Some("/usr/bin"));
        assert_eq!(env.get("HOME").map(String::as_str), Some("/home/test"));
        assert_eq!(env.len(), 2);
    }

    #[test]
    fn test_secrets_never_leak_through() {
        let fake = |name: &str| match name {
            "AWS_SECRET_ACCESS_KEY" => Some("hunter2".to_string()),
            "PATH" => Some("/bin".to_string()),
            _ => None,
        };
        let env = default_environment_from(fake);
        assert!(!env.contains_key("AWS_SECRET_ACCESS_KEY"));
    }

    #[cfg(unix)]
    #[test]
    fn test_exported_shell_functions_are_skipped() {
        let fake = |name: &str| match name {
            "PATH" => Some("() { echo pwned; }".to_string()),
            "TERM" => Some("xterm".to_string()),
            _ => None,
        };
        let env = default_environment_from(fake);
        assert!(!env.contains_key("PATH"));
        assert_eq!(env.get("TERM").map(String::as_str), Some("xterm"));
    }
}
