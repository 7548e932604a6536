use std::panic::Location;
use std::path::PathBuf;
use std::sync::Arc;

use error_location::ErrorLocation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Configuration invalid: {message} {location}")]
    ConfigInvalid {
        message: String,
        location: ErrorLocation,
    },

    #[error("Bundled resources are incomplete, missing {path} {location}")]
    BundleIncomplete {
        path: PathBuf,
        location: ErrorLocation,
    },

    #[error("Failed to spawn {program}: {source} {location}")]
    ProcessSpawn {
        program: String,
        #[source]
        source: std::io::Error,
        location: ErrorLocation,
    },

    #[error("No available port: {source} {location}")]
    NoAvailablePort {
        #[source]
        source: std::io::Error,
        location: ErrorLocation,
    },

    #[error("Slidev did not report its URL within {timeout_secs}s {location}. Last logs:\n{logs}")]
    StartupTimeout {
        timeout_secs: u64,
        logs: String,
        location: ErrorLocation,
    },

    #[error("Slidev exited before reporting its URL {location}. Last logs:\n{logs}")]
    ExitedBeforeReady {
        logs: String,
        location: ErrorLocation,
    },

    #[error("Server start was cancelled {location}")]
    Cancelled { location: ErrorLocation },

    #[error("Deck operation failed: {source} {location}")]
    Deck {
        #[source]
        source: studio_slides::SlidesError,
        location: ErrorLocation,
    },

    #[error("IO error: {source} {location}")]
    Io {
        #[source]
        source: std::io::Error,
        location: ErrorLocation,
    },

    #[error("HTTP error: {source} {location}")]
    Http {
        #[source]
        source: reqwest::Error,
        location: ErrorLocation,
    },

    #[error("Update check failed: {message} {location}")]
    UpdateCheckFailed {
        message: String,
        location: ErrorLocation,
    },
}

impl ServerError {
    #[track_caller]
    pub fn config_invalid<S: Into<String>>(message: S) -> Self {
        Self::ConfigInvalid {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn bundle_incomplete(path: impl Into<PathBuf>) -> Self {
        Self::BundleIncomplete {
            path: path.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn process_spawn<S: Into<String>>(program: S, source: std::io::Error) -> Self {
        Self::ProcessSpawn {
            program: program.into(),
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn no_available_port(source: std::io::Error) -> Self {
        Self::NoAvailablePort {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn startup_timeout(timeout_secs: u64, logs: String) -> Self {
        Self::StartupTimeout {
            timeout_secs,
            logs,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn exited_before_ready(logs: String) -> Self {
        Self::ExitedBeforeReady {
            logs,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn cancelled() -> Self {
        Self::Cancelled {
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn update_check_failed<S: Into<String>>(message: S) -> Self {
        Self::UpdateCheckFailed {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }

    /// Buffered child output attached to a failed start, if any.
    pub fn logs(&self) -> Option<&str> {
        match self {
            Self::StartupTimeout { logs, .. } | Self::ExitedBeforeReady { logs, .. } => {
                Some(logs.as_str())
            }
            _ => None,
        }
    }

    pub fn recovery_hint(&self) -> &'static str {
        match self {
            Self::BundleIncomplete { .. } => {
                "The application installation appears incomplete. \
                   Please reinstall Slidev Studio."
            }
            Self::ProcessSpawn { .. } => {
                "Slidev could not be launched. \
                   Make sure Node.js and npx are installed and on your PATH."
            }
            Self::NoAvailablePort { .. } => {
                "No free local port could be reserved. \
                   Check your network configuration or restart your computer."
            }
            Self::StartupTimeout { .. } => {
                "Slidev is taking too long to start. \
                   Check the logs below or increase supervisor.startup_timeout_secs."
            }
            Self::ExitedBeforeReady { .. } => {
                "Slidev stopped before it was ready. \
                   Check the deck for syntax errors and the logs below."
            }
            Self::Cancelled { .. } => "The start request was superseded by a stop or another start.",
            Self::ConfigInvalid { .. } => {
                "Configuration file has invalid settings. \
                   Check the logs for details or delete the config file to use defaults."
            }
            Self::Deck { .. } => {
                "The deck could not be read or edited. \
                   Check the file name and that the deck starts with a frontmatter block."
            }
            Self::Http { .. } | Self::UpdateCheckFailed { .. } => {
                "Could not reach the release server. Check your internet connection."
            }
            Self::Io { .. } => "An unexpected error occurred. Please check the logs for details.",
        }
    }
}

impl From<std::io::Error> for ServerError {
    #[track_caller]
    fn from(source: std::io::Error) -> Self {
        Self::Io {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<reqwest::Error> for ServerError {
    #[track_caller]
    fn from(source: reqwest::Error) -> Self {
        Self::Http {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<studio_slides::SlidesError> for ServerError {
    #[track_caller]
    fn from(source: studio_slides::SlidesError) -> Self {
        Self::Deck {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<studio_config::ConfigError> for ServerError {
    #[track_caller]
    fn from(source: studio_config::ConfigError) -> Self {
        Self::config_invalid(source.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ServerError>;

/// Outcome shared by every caller waiting on one start attempt.
pub type StartResult = std::result::Result<String, Arc<ServerError>>;
