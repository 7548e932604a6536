//! Tool-call surface offered to the chat assistant.
//!
//! The model picks a tool by name and sends JSON arguments; each tool maps
//! onto exactly one [`SlideToolbox`] operation against the open deck.

use crate::{SlideToolbox, SlidesError, SlidesResult};

use serde::Deserialize;
use serde_json::{Value, json};

pub const UPDATE_PAGE: &str = "update_page";
pub const INSERT_PAGE: &str = "insert_page";
pub const APPLY_THEME: &str = "apply_theme";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePageArgs {
    pub page_index: usize,
    pub markdown: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertPageArgs {
    pub after_index: usize,
    pub layout: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyThemeArgs {
    pub theme_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlideTool {
    UpdatePage(UpdatePageArgs),
    InsertPage(InsertPageArgs),
    ApplyTheme(ApplyThemeArgs),
}

impl SlideTool {
    /// Decode a tool call from its function name and JSON argument string.
    pub fn parse(name: &str, arguments: &str) -> SlidesResult<Self> {
        let tool = match name {
            UPDATE_PAGE => Self::UpdatePage(decode(name, arguments)?),
            INSERT_PAGE => Self::InsertPage(decode(name, arguments)?),
            APPLY_THEME => Self::ApplyTheme(decode(name, arguments)?),
            other => return Err(SlidesError::unknown_tool(other)),
        };
        Ok(tool)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::UpdatePage(_) => UPDATE_PAGE,
            Self::InsertPage(_) => INSERT_PAGE,
            Self::ApplyTheme(_) => APPLY_THEME,
        }
    }

    /// Run the tool against `file` and return the message reported to the model.
    pub fn execute(&self, toolbox: &SlideToolbox, file: &str) -> SlidesResult<&'static str> {
        match self {
            Self::UpdatePage(args) => {
                toolbox.update_page(file, args.page_index, &args.markdown)?;
                Ok("Page updated successfully.")
            }
            Self::InsertPage(args) => {
                toolbox.insert_page(file, args.after_index, &args.layout)?;
                Ok("Page inserted successfully.")
            }
            Self::ApplyTheme(args) => {
                toolbox.apply_theme(file, &args.theme_name)?;
                Ok("Theme applied.")
            }
        }
    }
}

fn decode<T: for<'de> Deserialize<'de>>(tool: &str, arguments: &str) -> SlidesResult<T> {
    serde_json::from_str(arguments).map_err(|e| SlidesError::invalid_arguments(tool, e))
}

/// Parse and run a tool call, rendering failures as an `Error: ...` result.
pub fn tool_result_message(toolbox: &SlideToolbox, file: &str, name: &str, arguments: &str) -> String {
    match SlideTool::parse(name, arguments).and_then(|tool| tool.execute(toolbox, file)) {
        Ok(message) => message.to_string(),
        Err(e) => format!("Error: {e}"),
    }
}

/// Function definitions in the chat-completions `tools` format.
pub fn tool_definitions() -> Value {
    json!([
        {
            "type": "function",
            "function": {
                "name": UPDATE_PAGE,
                "description": "Update the content of a specific slide page",
                "parameters": {
                    "type": "object",
                    "properties": {
                        "pageIndex": { "type": "integer", "description": "The index of the slide (0-based)" },
                        "markdown": { "type": "string", "description": "The new markdown content for the slide" }
                    },
                    "required": ["pageIndex", "markdown"]
                }
            }
        },
        {
            "type": "function",
            "function": {
                "name": INSERT_PAGE,
                "description": "Insert a new slide page after a specific index",
                "parameters": {
                    "type": "object",
                    "properties": {
                        "afterIndex": { "type": "integer", "description": "The index to insert after" },
                        "layout": { "type": "string", "description": "The layout type (default, section, etc.)" }
                    },
                    "required": ["afterIndex", "layout"]
                }
            }
        },
        {
            "type": "function",
            "function": {
                "name": APPLY_THEME,
                "description": "Apply a global theme to the presentation",
                "parameters": {
                    "type": "object",
                    "properties": {
                        "themeName": { "type": "string", "description": "The name of the theme" }
                    },
                    "required": ["themeName"]
                }
            }
        }
    ])
}
