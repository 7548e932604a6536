
use crate::SlideToolbox;

use tempfile::TempDir;

pub(crate) const DECK: &str = "---\ntheme: default\n---\n# One\n---\n# Two\n";

/// Toolbox over a fresh temp directory holding `slides.md` = [`DECK`].
pub(crate) fn toolbox_with_deck() -> (TempDir, SlideToolbox) {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("slides.md"), DECK).unwrap();
    let toolbox = SlideToolbox::new(temp.path());
    (temp, toolbox)
}
