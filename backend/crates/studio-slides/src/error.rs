use std::panic::Location;
use std::path::PathBuf;

use error_location::ErrorLocation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SlidesError {
    #[error("IO error at {path}: {source} {location}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
        location: ErrorLocation,
    },

    #[error("Invalid slide format: {message} {location}")]
    InvalidFormat {
        message: String,
        location: ErrorLocation,
    },

    #[error("Page index {index} out of range ({pages} pages) {location}")]
    PageOutOfRange {
        index: usize,
        pages: usize,
        location: ErrorLocation,
    },

    #[error("Invalid deck file name '{name}' {location}")]
    InvalidFileName {
        name: String,
        location: ErrorLocation,
    },

    #[error("Unknown tool '{name}' {location}")]
    UnknownTool {
        name: String,
        location: ErrorLocation,
    },

    #[error("Invalid arguments for tool '{tool}': {source} {location}")]
    InvalidArguments {
        tool: String,
        #[source]
        source: serde_json::Error,
        location: ErrorLocation,
    },
}

impl SlidesError {
    #[track_caller]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn invalid_format<S: Into<String>>(message: S) -> Self {
        Self::InvalidFormat {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn page_out_of_range(index: usize, pages: usize) -> Self {
        Self::PageOutOfRange {
            index,
            pages,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn invalid_file_name<S: Into<String>>(name: S) -> Self {
        Self::InvalidFileName {
            name: name.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn unknown_tool<S: Into<String>>(name: S) -> Self {
        Self::UnknownTool {
            name: name.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn invalid_arguments<S: Into<String>>(tool: S, source: serde_json::Error) -> Self {
        Self::InvalidArguments {
            tool: tool.into(),
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type SlidesResult<T> = std::result::Result<T, SlidesError>;
