use crate::{
    DEFAULT_SLIDES_FILE, README_FILE, SlidesError, SlidesResult, deck, deck::starter_deck,
};

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

const MARKDOWN_EXTENSION: &str = ".md";

/// A deck file found in the working directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeckSummary {
    pub name: String,
    /// RFC 3339 modification time
    pub modified: String,
}

/// File-level deck operations, keyed by file name inside one directory.
///
/// Operations are serialized through an internal lock so a read-modify-write
/// never interleaves with another one on the same toolbox.
pub struct SlideToolbox {
    working_dir: PathBuf,
    default_file: String,
    lock: Mutex<()>,
}

impl SlideToolbox {
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self::with_default_file(working_dir, DEFAULT_SLIDES_FILE)
    }

    /// Use `default_file` whenever an operation is given an empty file name.
    pub fn with_default_file(working_dir: impl Into<PathBuf>, default_file: &str) -> Self {
        Self {
            working_dir: working_dir.into(),
            default_file: default_file.to_string(),
            lock: Mutex::new(()),
        }
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// List `.md` decks (README excluded), sorted by name.
    pub fn list_decks(&self) -> SlidesResult<Vec<DeckSummary>> {
        let _guard = self.guard();

        let entries = std::fs::read_dir(&self.working_dir)
            .map_err(|e| SlidesError::io(&self.working_dir, e))?;

        let mut decks = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| SlidesError::io(&self.working_dir, e))?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if !name.ends_with(MARKDOWN_EXTENSION) || name == README_FILE {
                continue;
            }

            let metadata = entry.metadata().map_err(|e| SlidesError::io(entry.path(), e))?;
            if !metadata.is_file() {
                continue;
            }

            let modified = metadata
                .modified()
                .map(|t| DateTime::<Utc>::from(t).to_rfc3339())
                .unwrap_or_default();

            decks.push(DeckSummary { name, modified });
        }

        decks.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(decks)
    }

    /// Write a starter deck, appending `.md` when missing. Returns the file name.
    pub fn create_deck(&self, file: &str, title: &str, theme: &str) -> SlidesResult<String> {
        let _guard = self.guard();

        let file = if file.ends_with(MARKDOWN_EXTENSION) {
            file.to_string()
        } else {
            format!("{file}{MARKDOWN_EXTENSION}")
        };
        let path = self.resolve(&file)?;
        write_file(&path, &starter_deck(title, theme))?;

        info!("Created deck {}", path.display());
        Ok(file)
    }

    /// Create the default deck unless it already exists.
    pub fn ensure_default_deck(&self, title: &str, theme: &str) -> SlidesResult<bool> {
        let path = self.resolve("")?;
        if path.exists() {
            return Ok(false);
        }
        let default_file = self.default_file.clone();
        self.create_deck(&default_file, title, theme)?;
        Ok(true)
    }

    pub fn read_slides(&self, file: &str) -> SlidesResult<String> {
        let _guard = self.guard();
        let path = self.resolve(file)?;
        read_file(&path)
    }

    pub fn save_slides(&self, file: &str, content: &str) -> SlidesResult<()> {
        let _guard = self.guard();
        let path = self.resolve(file)?;
        write_file(&path, content)
    }

    /// Replace slide `index` (0-based, frontmatter excluded).
    pub fn update_page(&self, file: &str, index: usize, markdown: &str) -> SlidesResult<()> {
        self.rewrite(file, |content| deck::replace_page(content, index, markdown))
    }

    /// Insert a blank slide using `layout` after slide `after_index`.
    pub fn insert_page(&self, file: &str, after_index: usize, layout: &str) -> SlidesResult<()> {
        self.rewrite(file, |content| {
            Ok(deck::insert_page(content, after_index, layout))
        })
    }

    pub fn apply_theme(&self, file: &str, theme: &str) -> SlidesResult<()> {
        self.rewrite(file, |content| deck::set_theme(content, theme))
    }

    fn rewrite<F>(&self, file: &str, transform: F) -> SlidesResult<()>
    where
        F: FnOnce(&str) -> SlidesResult<String>,
    {
        let _guard = self.guard();
        let path = self.resolve(file)?;
        let content = read_file(&path)?;
        let updated = transform(&content)?;
        write_file(&path, &updated)?;
        debug!("Rewrote {}", path.display());
        Ok(())
    }

    /// Map a bare file name to a path inside the working directory.
    fn resolve(&self, file: &str) -> SlidesResult<PathBuf> {
        let file = if file.is_empty() {
            self.default_file.as_str()
        } else {
            file
        };

        if file.contains('/') || file.contains('\\') || file.contains("..") {
            return Err(SlidesError::invalid_file_name(file));
        }

        Ok(self.working_dir.join(file))
    }

    fn guard(&self) -> MutexGuard<'_, ()> {
        self.lock.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn read_file(path: &Path) -> SlidesResult<String> {
    std::fs::read_to_string(path).map_err(|e| SlidesError::io(path, e))
}

fn write_file(path: &Path, content: &str) -> SlidesResult<()> {
    std::fs::write(path, content).map_err(|e| SlidesError::io(path, e))
}
