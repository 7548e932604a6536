//! Resolves how Slidev is launched for the current install.

use crate::server::{ServerError, ServerResult};

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};

use studio_config::SupervisorConfig;
use tracing::info;

const PORT_FLAG: &str = "--port";

/// A fully resolved child command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchCommand {
    pub program: PathBuf,
    pub args: Vec<OsString>,
    pub current_dir: PathBuf,
}

impl fmt::Display for LaunchCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// Builds the command that serves `target` from `dir` on `port`.
pub trait Launcher: Send + Sync {
    fn command(&self, dir: &Path, target: &str, port: u16) -> ServerResult<LaunchCommand>;
}

/// Which Slidev runtime an install provides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Runtime {
    /// Node and the Slidev CLI shipped next to the application binary.
    Bundled { node: PathBuf, cli: PathBuf },
    /// No bundle present; fetch the CLI on the fly.
    Development { command: String, args: Vec<String> },
}

/// Launches the real Slidev CLI.
///
/// When a resource directory sits beside the application binary the install
/// is treated as bundled, and both the bundled Node runtime and CLI script
/// must exist. A half-present bundle is an error, never a fallback to the
/// development command.
pub struct SlidevLauncher {
    app_dir: PathBuf,
    config: SupervisorConfig,
}

impl SlidevLauncher {
    pub fn new(app_dir: impl Into<PathBuf>, config: SupervisorConfig) -> Self {
        Self {
            app_dir: app_dir.into(),
            config,
        }
    }

    /// Use the directory holding the running executable as the app dir.
    pub fn from_current_exe(config: SupervisorConfig) -> ServerResult<Self> {
        let exe = std::env::current_exe()?;
        let app_dir = exe
            .parent()
            .map(Path::to_path_buf)
            .ok_or_else(|| ServerError::config_invalid("executable has no parent directory"))?;
        Ok(Self::new(app_dir, config))
    }

    pub fn resources_dir(&self) -> PathBuf {
        self.app_dir.join(&self.config.resources_dir)
    }

    pub fn runtime(&self) -> ServerResult<Runtime> {
        let resources = self.resources_dir();
        if !resources.is_dir() {
            return Ok(Runtime::Development {
                command: self.config.dev_command.clone(),
                args: self.config.dev_args.clone(),
            });
        }

        let node = resources.join(&self.config.bundled_node);
        if !node.is_file() {
            return Err(ServerError::bundle_incomplete(node));
        }

        let cli = resources.join(&self.config.bundled_cli);
        if !cli.is_file() {
            return Err(ServerError::bundle_incomplete(cli));
        }

        Ok(Runtime::Bundled { node, cli })
    }
}

impl Launcher for SlidevLauncher {
    fn command(&self, dir: &Path, target: &str, port: u16) -> ServerResult<LaunchCommand> {
        let tail = [
            OsString::from(target),
            OsString::from(PORT_FLAG),
            OsString::from(port.to_string()),
        ];

        let command = match self.runtime()? {
            Runtime::Bundled { node, cli } => {
                info!("Using bundled Slidev at {}", cli.display());
                LaunchCommand {
                    program: node,
                    args: std::iter::once(cli.into_os_string()).chain(tail).collect(),
                    current_dir: dir.to_path_buf(),
                }
            }
            Runtime::Development { command, args } => {
                info!("No bundled resources, using {command}");
                LaunchCommand {
                    program: PathBuf::from(command),
                    args: args.into_iter().map(OsString::from).chain(tail).collect(),
                    current_dir: dir.to_path_buf(),
                }
            }
        };

        Ok(command)
    }
}
