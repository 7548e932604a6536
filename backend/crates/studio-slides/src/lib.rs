//! Slide deck editing for the studio.
//!
//! [`SlideToolbox`] rewrites markdown decks in a working directory by
//! splitting on `---` delimiter lines. [`SlideTool`] exposes the subset of
//! those operations the chat assistant may invoke as tool calls.

mod deck;
mod error;
mod tool;
mod toolbox;

#[cfg(test)]
mod tests;

pub use deck::{insert_page, replace_page, set_theme, starter_deck};
pub use error::{SlidesError, SlidesResult};
pub use tool::{
    APPLY_THEME, ApplyThemeArgs, INSERT_PAGE, InsertPageArgs, SlideTool, UPDATE_PAGE,
    UpdatePageArgs, tool_definitions, tool_result_message,
};
pub use toolbox::{DeckSummary, SlideToolbox};

pub const DEFAULT_SLIDES_FILE: &str = "slides.md";
pub const DEFAULT_THEME: &str = "seriph";
const README_FILE: &str = "README.md";
