use crate::{
    AiConfig, CONFIG_DIR_ENV, ConfigError, ConfigErrorResult, DEFAULT_CONFIG_DIR, LoggingConfig,
    SupervisorConfig, UpdateConfig,
};

use std::path::{Path, PathBuf};

use log::info;
use serde::{Deserialize, Serialize};

pub const CONFIG_FILENAME: &str = "config.toml";

/// Application configuration.
///
/// Constructed once at startup and handed to the supervisor and the slide
/// toolbox; nothing reads configuration from global state.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub supervisor: SupervisorConfig,
    pub logging: LoggingConfig,
    pub ai: AiConfig,
    pub updates: UpdateConfig,
}

impl Config {
    /// Load config from the resolved config directory.
    ///
    /// Loading order:
    /// 1. Check for STUDIO_CONFIG_DIR env var, else use ./.slidev-studio/
    /// 2. Auto-create config directory if it doesn't exist
    /// 3. Load config.toml if it exists, else use defaults
    /// 4. Apply STUDIO_* environment variable overrides
    ///
    /// Does NOT validate - call validate() after load().
    pub fn load() -> ConfigErrorResult<Self> {
        let config_dir = Self::config_dir()?;
        Self::load_from(&config_dir)
    }

    /// Same as [`Config::load`] for an explicit directory.
    pub fn load_from(config_dir: &Path) -> ConfigErrorResult<Self> {
        if !config_dir.exists() {
            std::fs::create_dir_all(config_dir).map_err(|e| ConfigError::Io {
                path: config_dir.to_path_buf(),
                source: e,
            })?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);

        let mut config = if config_path.exists() {
            Self::load_toml(&config_path)?
        } else {
            Config::default()
        };

        config.apply_env_overrides();

        Ok(config)
    }

    fn load_toml(path: &Path) -> ConfigErrorResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::Toml {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Save config to `<config_dir>/config.toml` atomically.
    ///
    /// Writes to a temp file and renames it over the target so an
    /// interrupted save never leaves a truncated file behind.
    pub fn save(&self, config_dir: &Path) -> ConfigErrorResult<PathBuf> {
        std::fs::create_dir_all(config_dir).map_err(|e| ConfigError::Io {
            path: config_dir.to_path_buf(),
            source: e,
        })?;

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = toml::to_string_pretty(self).map_err(ConfigError::from_toml_ser)?;

        let temp_path = config_path.with_extension("toml.tmp");
        std::fs::write(&temp_path, &content).map_err(|e| ConfigError::Io {
            path: temp_path.clone(),
            source: e,
        })?;
        std::fs::rename(&temp_path, &config_path).map_err(|e| ConfigError::Io {
            path: config_path.clone(),
            source: e,
        })?;

        Ok(config_path)
    }

    /// Get the config directory.
    /// Priority: STUDIO_CONFIG_DIR env var > ./.slidev-studio/ (relative to cwd)
    pub fn config_dir() -> ConfigErrorResult<PathBuf> {
        if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
            return Ok(PathBuf::from(dir));
        }

        let cwd = std::env::current_dir()
            .map_err(|_| ConfigError::config("Cannot determine current working directory"))?;
        Ok(cwd.join(DEFAULT_CONFIG_DIR))
    }

    /// Validate all configuration.
    /// Call after load() to catch all errors at startup.
    pub fn validate(&self) -> ConfigErrorResult<()> {
        self.supervisor.validate()?;
        self.ai.validate()?;
        self.updates.validate()?;

        let log_dir = Path::new(&self.logging.dir);
        if log_dir.is_absolute() || self.logging.dir.contains("..") {
            return Err(ConfigError::config(
                "logging.dir must be relative and cannot contain '..'",
            ));
        }

        Ok(())
    }

    /// Absolute log directory for a given config directory.
    pub fn log_dir(&self, config_dir: &Path) -> PathBuf {
        config_dir.join(&self.logging.dir)
    }

    /// Log configuration summary (NEVER logs the API key).
    pub fn log_summary(&self) {
        info!("Configuration loaded:");
        info!(
            "  supervisor: timeout={}s, log buffer={} lines, default file={}",
            self.supervisor.startup_timeout_secs,
            self.supervisor.log_buffer_lines,
            self.supervisor.default_file
        );
        info!(
            "  runtime: bundled={}/{{{}, {}}}, dev fallback={} {}",
            self.supervisor.resources_dir,
            self.supervisor.bundled_node,
            self.supervisor.bundled_cli,
            self.supervisor.dev_command,
            self.supervisor.dev_args.join(" ")
        );
        info!(
            "  logging: {} (dir: {})",
            *self.logging.level, self.logging.dir
        );
        info!(
            "  ai: provider={}, model={}, key={}",
            self.ai.provider,
            self.ai.model,
            if self.ai.api_key.is_empty() {
                "unset"
            } else {
                "set"
            }
        );
        info!(
            "  updates: {}/{} (current {})",
            self.updates.repo_owner, self.updates.repo_name, self.updates.current_version
        );
    }

    fn apply_env_overrides(&mut self) {
        // Supervisor
        Self::apply_env_parse(
            "STUDIO_STARTUP_TIMEOUT_SECS",
            &mut self.supervisor.startup_timeout_secs,
        );
        Self::apply_env_parse(
            "STUDIO_LOG_BUFFER_LINES",
            &mut self.supervisor.log_buffer_lines,
        );
        Self::apply_env_string("STUDIO_DEFAULT_FILE", &mut self.supervisor.default_file);
        Self::apply_env_string("STUDIO_DEV_COMMAND", &mut self.supervisor.dev_command);

        // Logging
        Self::apply_env_parse("STUDIO_LOG_LEVEL", &mut self.logging.level);
        Self::apply_env_string("STUDIO_LOG_DIR", &mut self.logging.dir);

        // AI
        Self::apply_env_string("STUDIO_AI_PROVIDER", &mut self.ai.provider);
        Self::apply_env_string("STUDIO_AI_API_KEY", &mut self.ai.api_key);
        Self::apply_env_string("STUDIO_AI_BASE_URL", &mut self.ai.base_url);
        Self::apply_env_string("STUDIO_AI_MODEL", &mut self.ai.model);
    }

    /// Helper: Apply environment variable override for String values
    fn apply_env_string(var_name: &str, target: &mut String) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val;
        }
    }

    /// Helper: Apply environment variable override for parseable values
    fn apply_env_parse<T: std::str::FromStr>(var_name: &str, target: &mut T) {
        if let Ok(val) = std::env::var(var_name)
            && let Ok(parsed) = val.parse()
        {
            *target = parsed;
        }
    }
}
