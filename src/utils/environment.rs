use std::collections::HashMap;
use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Snapshot of the process environment that configuration is resolved against
///
/// Captured once at startup so resolution stays a pure function of its inputs.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    vars: HashMap<String, String>,
    pub home: Option<PathBuf>,
    pub cwd: PathBuf,
    /// Platform config directory (`~/.config` on Linux)
    pub config_dir: Option<PathBuf>,
}

impl Environment {
    pub fn capture() -> Result<Self> {
        // Non-UTF-8 variables cannot hold anything we read, so they are dropped
        let vars: HashMap<String, String> = env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect();
        let home = vars
            .get("HOME")
            .filter(|h| !h.is_empty())
            .map(PathBuf::from)
            .or_else(dirs::home_dir);
        let cwd = env::current_dir().context("Failed to read current directory")?;

        Ok(Self { vars, home, cwd, config_dir: dirs::config_dir() })
    }

    /// Builds an environment from explicit parts
    pub fn new(home: Option<PathBuf>, cwd: PathBuf, config_dir: Option<PathBuf>) -> Self {
        Self { vars: HashMap::new(), home, cwd, config_dir }
    }

    pub fn with_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }

    /// Value of a variable, treating empty as unset
    pub fn var(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str).filter(|v| !v.is_empty())
    }

    /// The assistant's data directory (`~/.claude`)
    pub fn claude_dir(&self) -> Result<PathBuf> {
        let home = self.home.as_ref().context("HOME environment variable not set")?;
        Ok(home.join(".claude"))
    }
}
