use crate::{
    ConfigError, ConfigErrorResult, DEFAULT_BUNDLED_CLI, DEFAULT_BUNDLED_NODE, DEFAULT_DEV_ARGS,
    DEFAULT_DEV_COMMAND, DEFAULT_LOG_BUFFER_LINES, DEFAULT_RESOURCES_DIR, DEFAULT_SLIDES_FILE,
    DEFAULT_STARTUP_TIMEOUT_SECS, DEFAULT_URL_HOST, MAX_LOG_BUFFER_LINES, MAX_STARTUP_TIMEOUT_SECS,
    MIN_LOG_BUFFER_LINES,
};

use std::path::{Component, Path};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Settings for the slide server supervisor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SupervisorConfig {
    /// How long a start waits for the child to print its URL
    pub startup_timeout_secs: u64,
    /// Number of recent child output lines kept for diagnostics
    pub log_buffer_lines: usize,
    /// Deck served when a start request names no file
    pub default_file: String,
    /// Host spelled into the reported URL
    pub url_host: String,
    /// Bundled resource directory, relative to the application binary
    pub resources_dir: String,
    /// Bundled Node runtime, relative to the resource directory
    pub bundled_node: String,
    /// Bundled Slidev CLI entry script, relative to the resource directory
    pub bundled_cli: String,
    /// Development fallback launcher
    pub dev_command: String,
    pub dev_args: Vec<String>,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            startup_timeout_secs: DEFAULT_STARTUP_TIMEOUT_SECS,
            log_buffer_lines: DEFAULT_LOG_BUFFER_LINES,
            default_file: String::from(DEFAULT_SLIDES_FILE),
            url_host: String::from(DEFAULT_URL_HOST),
            resources_dir: String::from(DEFAULT_RESOURCES_DIR),
            bundled_node: String::from(DEFAULT_BUNDLED_NODE),
            bundled_cli: String::from(DEFAULT_BUNDLED_CLI),
            dev_command: String::from(DEFAULT_DEV_COMMAND),
            dev_args: DEFAULT_DEV_ARGS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl SupervisorConfig {
    pub fn startup_timeout(&self) -> Duration {
        Duration::from_secs(self.startup_timeout_secs)
    }

    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.startup_timeout_secs == 0 || self.startup_timeout_secs > MAX_STARTUP_TIMEOUT_SECS {
            return Err(ConfigError::supervisor(format!(
                "supervisor.startup_timeout_secs must be 1-{}, got {}",
                MAX_STARTUP_TIMEOUT_SECS, self.startup_timeout_secs
            )));
        }

        if self.log_buffer_lines < MIN_LOG_BUFFER_LINES
            || self.log_buffer_lines > MAX_LOG_BUFFER_LINES
        {
            return Err(ConfigError::supervisor(format!(
                "supervisor.log_buffer_lines must be {}-{}, got {}",
                MIN_LOG_BUFFER_LINES, MAX_LOG_BUFFER_LINES, self.log_buffer_lines
            )));
        }

        if !self.default_file.ends_with(".md") {
            return Err(ConfigError::supervisor(format!(
                "supervisor.default_file must be a .md file, got '{}'",
                self.default_file
            )));
        }

        if self.url_host.trim().is_empty() {
            return Err(ConfigError::supervisor("supervisor.url_host cannot be empty"));
        }

        if self.dev_command.trim().is_empty() {
            return Err(ConfigError::supervisor(
                "supervisor.dev_command cannot be empty",
            ));
        }

        for (key, value) in [
            ("resources_dir", &self.resources_dir),
            ("bundled_node", &self.bundled_node),
            ("bundled_cli", &self.bundled_cli),
        ] {
            if !is_contained_relative(value) {
                return Err(ConfigError::supervisor(format!(
                    "supervisor.{key} must be relative and cannot contain '..', got '{value}'"
                )));
            }
        }

        Ok(())
    }
}

fn is_contained_relative(value: &str) -> bool {
    let path = Path::new(value);
    !value.is_empty()
        && path
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}
