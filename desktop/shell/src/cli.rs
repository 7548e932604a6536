use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "slidev-studio")]
#[command(about = "Edit Slidev decks and preview them through a supervised dev server")]
#[command(version)]
#[command(propagate_version = true)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Commands,

    /// Config directory (defaults to STUDIO_CONFIG_DIR, then ./.slidev-studio)
    #[arg(long, global = true)]
    pub(crate) config_dir: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub(crate) pretty: bool,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Serve a deck with Slidev until interrupted
    Serve {
        /// Project directory holding the deck
        #[arg(long, default_value = ".")]
        dir: PathBuf,

        /// Deck file (defaults to supervisor.default_file)
        #[arg(long)]
        file: Option<String>,
    },

    /// Deck file operations
    Slides {
        /// Project directory holding the decks
        #[arg(long, default_value = ".")]
        dir: PathBuf,

        #[command(subcommand)]
        action: SlidesCommands,
    },

    /// Check GitHub for a newer release
    CheckUpdate,
}

#[derive(Subcommand)]
pub(crate) enum SlidesCommands {
    /// List decks in the directory
    List,

    /// Print a deck's markdown
    Read {
        /// Deck file (defaults to supervisor.default_file)
        #[arg(default_value = "")]
        file: String,
    },

    /// Replace one slide's content
    UpdatePage {
        /// Slide index, 0-based, frontmatter excluded
        index: usize,

        /// New markdown for the slide
        markdown: String,

        #[arg(long, default_value = "")]
        file: String,
    },

    /// Insert a blank slide after an index
    InsertPage {
        after: usize,

        #[arg(long, default_value = "default")]
        layout: String,

        #[arg(long, default_value = "")]
        file: String,
    },

    /// Set the deck-wide theme
    ApplyTheme {
        theme: String,

        #[arg(long, default_value = "")]
        file: String,
    },

    /// Write a starter deck
    Create {
        file: String,

        #[arg(long, default_value = studio_lib::STARTER_DECK_TITLE)]
        title: String,

        #[arg(long, default_value = studio_slides::DEFAULT_THEME)]
        theme: String,
    },

    /// Run an assistant tool call against a deck
    Tool {
        /// Tool name (update_page, insert_page, apply_theme)
        name: String,

        /// JSON arguments as sent by the model
        arguments: String,

        #[arg(long, default_value = "")]
        file: String,
    },

    /// Print the tool definitions offered to the assistant
    ToolDefinitions,
}
