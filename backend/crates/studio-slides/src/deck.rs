//! Pure text transforms over a deck's markdown.
//!
//! A deck looks like:
//!
//! ```text
//! ---
//! theme: seriph
//! ---
//! # Slide 0
//! ---
//! # Slide 1
//! ```
//!
//! Splitting on delimiter lines yields `["", frontmatter, slide 0, slide 1, ...]`,
//! so slide `n` lives at part `n + 2`.

use crate::{SlidesError, SlidesResult};

use std::sync::LazyLock;

use regex::{NoExpand, Regex};

const DELIMITER: &str = "---";
const FIRST_SLIDE_PART: usize = 2;

static DELIMITER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^---$").expect("delimiter pattern is valid"));
static FRONTMATTER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^---\n(.*?)\n---").expect("frontmatter pattern is valid"));
static THEME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^theme:[ \t]*\S*").expect("theme pattern is valid"));

fn normalize(content: &str) -> String {
    content.replace("\r\n", "\n")
}

/// Replace the body of slide `index` (0-based, frontmatter excluded).
pub fn replace_page(content: &str, index: usize, markdown: &str) -> SlidesResult<String> {
    let content = normalize(content);
    if !content.starts_with(DELIMITER) {
        return Err(SlidesError::invalid_format("missing frontmatter"));
    }

    let mut parts: Vec<String> = DELIMITER_RE.split(&content).map(str::to_owned).collect();
    let target = index + FIRST_SLIDE_PART;
    if target >= parts.len() {
        let pages = parts.len().saturating_sub(FIRST_SLIDE_PART);
        return Err(SlidesError::page_out_of_range(index, pages));
    }

    parts[target] = format!("\n{markdown}\n");
    Ok(parts.join(DELIMITER))
}

/// Insert a blank slide with `layout` after slide `after_index`.
///
/// The new slide goes right before the delimiter closing `after_index`;
/// when that slide is the last one it is appended at the end.
pub fn insert_page(content: &str, after_index: usize, layout: &str) -> String {
    let content = normalize(content);
    let insertion = format!("\n---\nlayout: {layout}\n---\n\n# New Slide\n\n");

    let position = DELIMITER_RE
        .find_iter(&content)
        .nth(after_index + FIRST_SLIDE_PART)
        .map(|m| m.start());

    match position {
        Some(pos) => {
            let mut updated = String::with_capacity(content.len() + insertion.len());
            updated.push_str(&content[..pos]);
            updated.push_str(&insertion);
            updated.push_str(&content[pos..]);
            updated
        }
        None => content + &insertion,
    }
}

/// Set the deck-wide `theme:` key in the leading frontmatter.
pub fn set_theme(content: &str, theme: &str) -> SlidesResult<String> {
    let content = normalize(content);
    let frontmatter = FRONTMATTER_RE
        .captures(&content)
        .and_then(|caps| caps.get(1))
        .ok_or_else(|| SlidesError::invalid_format("frontmatter not found"))?;

    let current = frontmatter.as_str();
    let replacement = format!("theme: {theme}");
    let updated_frontmatter = if THEME_RE.is_match(current) {
        THEME_RE
            .replace_all(current, NoExpand(&replacement))
            .into_owned()
    } else if current.is_empty() {
        replacement
    } else {
        format!("{current}\n{replacement}")
    };

    let range = frontmatter.range();
    let mut updated = String::with_capacity(content.len() + theme.len());
    updated.push_str(&content[..range.start]);
    updated.push_str(&updated_frontmatter);
    updated.push_str(&content[range.end..]);
    Ok(updated)
}

/// Starter deck written for new projects.
pub fn starter_deck(title: &str, theme: &str) -> String {
    format!(
        "---
theme: {theme}
background: https://picsum.photos/id/10/1920/1080
class: text-center
highlighter: shiki
lineNumbers: true
---

# {title}

Welcome to Slidev

---
layout: default
---

# Page 2

Content
"
    )
}
