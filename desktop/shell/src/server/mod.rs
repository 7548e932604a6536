mod completion;
mod error;
mod launcher;
mod lifecycle;
mod port;
mod scanner;
mod state;
mod terminator;

pub use completion::Completion;
pub use error::{Result as ServerResult, ServerError, StartResult};
pub use launcher::{LaunchCommand, Launcher, Runtime, SlidevLauncher};
pub use lifecycle::SlideServer;
pub use port::PortAllocator;
pub use scanner::{
    LineFindings, LogBuffer, MAX_LINE_BYTES, ReadinessScanner, forward_lines, strip_ansi,
};
pub use state::{ServerState, StartPlan};
#[cfg(unix)]
pub use terminator::{PosixTerminator, in_process_group};
#[cfg(windows)]
pub use terminator::WindowsTerminator;
pub use terminator::{ProcessTerminator, default_terminator};
