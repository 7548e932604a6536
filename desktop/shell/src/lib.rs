//! Slidev Studio shell.
//!
//! Supervises a local Slidev dev server for the open deck ([`server`]),
//! checks for new releases ([`updater`]) and sets up logging ([`logging`]).

pub mod logging;
pub mod server;
pub mod updater;

#[cfg(test)]
mod tests;

pub use server::{ServerError, ServerResult, ServerState, SlideServer, StartResult};
pub use updater::{UpdateChecker, UpdateInfo};

/// Title of the deck created when a project has none.
pub const STARTER_DECK_TITLE: &str = "Slidev Studio";
