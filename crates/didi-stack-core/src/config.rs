use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::error::{Result, ScaffoldError};

/// Environment variable naming an optional TOML settings file.
pub const CONFIG_ENV: &str = "DIDI_STACK_CONFIG";

/// Root configuration for a scaffolding run.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScaffoldConfig {
    /// External tool programs.
    pub tools: ToolsConfig,

    /// Per-command timeout in seconds (0 disables it).
    pub step_timeout_secs: u64,

    /// Template selector passed to the Vite generator.
    pub vite_template: String,

    /// Message of the initial commit.
    pub commit_message: String,
}

impl Default for ScaffoldConfig {
    fn default() -> Self {
        Self {
            tools: ToolsConfig::default(),
            step_timeout_secs: 600,
            vite_template: "react-ts".to_string(),
            commit_message: "Initial commit".to_string(),
        }
    }
}

impl ScaffoldConfig {
    /// Load configuration from `DIDI_STACK_CONFIG` (if set) and apply
    /// per-variable environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_file(Path::new(&path))?,
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ScaffoldError::Settings(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        Self::parse_toml(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse_toml(content: &str) -> Result<Self> {
        let content = substitute_env_vars(content);

        toml::from_str(&content)
            .map_err(|e| ScaffoldError::Settings(format!("Failed to parse config: {}", e)))
    }

    /// Apply `DIDI_STACK_*` overrides supplied by `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(npm) = lookup("DIDI_STACK_NPM") {
            self.tools.npm = npm;
        }
        if let Some(npx) = lookup("DIDI_STACK_NPX") {
            self.tools.npx = npx;
        }
        if let Some(git) = lookup("DIDI_STACK_GIT") {
            self.tools.git = git;
        }
        if let Some(raw) = lookup("DIDI_STACK_STEP_TIMEOUT") {
            self.step_timeout_secs = raw.trim().parse().map_err(|_| {
                ScaffoldError::Settings(format!(
                    "DIDI_STACK_STEP_TIMEOUT must be a number of seconds, got {:?}",
                    raw
                ))
            })?;
        }
        Ok(())
    }

    /// Timeout applied to each external command, if enabled.
    pub fn step_timeout(&self) -> Option<Duration> {
        (self.step_timeout_secs > 0).then(|| Duration::from_secs(self.step_timeout_secs))
    }
}

/// Programs used for external steps.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    pub npm: String,
    pub npx: String,
    pub git: String,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        // npm and npx are batch shims on Windows and cannot be spawned bare.
        let (npm, npx) = if cfg!(windows) {
            ("npm.cmd", "npx.cmd")
        } else {
            ("npm", "npx")
        };
        Self {
            npm: npm.to_string(),
            npx: npx.to_string(),
            git: "git".to_string(),
        }
    }
}

/// Substitute `${VAR}` references with environment values.
fn substitute_env_vars(content: &str) -> String {
    let mut result = content.to_string();
    let Ok(re) = regex_lite::Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}") else {
        return result;
    };

    for cap in re.captures_iter(content) {
        let var_name = &cap[1];
        if let Ok(value) = std::env::var(var_name) {
            result = result.replace(&cap[0], &value);
        }
    }

    result
}
