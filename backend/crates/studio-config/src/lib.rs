mod ai_config;
mod config;
mod error;
mod log_level;
mod logging_config;
mod supervisor_config;
mod update_config;

#[cfg(test)]
mod tests;

pub use ai_config::AiConfig;
pub use config::{CONFIG_FILENAME, Config};
pub use error::{ConfigError, ConfigErrorResult};
pub use log_level::LogLevel;
pub use logging_config::LoggingConfig;
pub use supervisor_config::SupervisorConfig;
pub use update_config::UpdateConfig;

const CONFIG_DIR_ENV: &str = "STUDIO_CONFIG_DIR";
const DEFAULT_CONFIG_DIR: &str = ".slidev-studio";

const DEFAULT_STARTUP_TIMEOUT_SECS: u64 = 45;
const MAX_STARTUP_TIMEOUT_SECS: u64 = 600;
const DEFAULT_LOG_BUFFER_LINES: usize = 100;
const MIN_LOG_BUFFER_LINES: usize = 1;
const MAX_LOG_BUFFER_LINES: usize = 10_000;
const DEFAULT_SLIDES_FILE: &str = "slides.md";
const DEFAULT_URL_HOST: &str = "localhost";
const DEFAULT_RESOURCES_DIR: &str = "resources";
#[cfg(windows)]
const DEFAULT_BUNDLED_NODE: &str = "node/node.exe";
#[cfg(not(windows))]
const DEFAULT_BUNDLED_NODE: &str = "node/bin/node";
const DEFAULT_BUNDLED_CLI: &str = "node_modules/@slidev/cli/bin/slidev.mjs";
#[cfg(windows)]
const DEFAULT_DEV_COMMAND: &str = "npx.cmd";
#[cfg(not(windows))]
const DEFAULT_DEV_COMMAND: &str = "npx";
const DEFAULT_DEV_ARGS: [&str; 2] = ["--yes", "@slidev/cli"];

const DEFAULT_LOG_LEVEL_STRING: &str = "info";
const DEFAULT_LOG_LEVEL: log::LevelFilter = log::LevelFilter::Info;
const DEFAULT_LOG_DIRECTORY: &str = "logs";

const DEFAULT_AI_PROVIDER: &str = "ollama";
const DEFAULT_AI_BASE_URL: &str = "http://localhost:11434/v1";
const DEFAULT_AI_MODEL: &str = "llama3";

const DEFAULT_UPDATE_API_BASE_URL: &str = "https://api.github.com";
const DEFAULT_UPDATE_REPO_OWNER: &str = "slidev-studio";
const DEFAULT_UPDATE_REPO_NAME: &str = "slidev-studio";
