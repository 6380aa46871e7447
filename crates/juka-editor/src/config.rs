//! Editor configuration.

use juka_core::layout::{Canvas, MIN_ELEMENT_SIZE};
use juka_core::model::FontSizes;
use juka_core::EXPORT_FILE_NAME;
use std::path::PathBuf;

/// Where the browser editor looks for a document to open on startup.
pub const DEFAULT_CONFIG_PATH: &str = "player/jukaconfig.json";

/// Session-wide settings. Everything has a default matching the shipped
/// editor.
#[derive(Debug, Clone)]
pub struct EditorConfig {
    /// Canvas size a new session starts with.
    pub canvas: Canvas,

    /// Font-size table given to new and reset documents.
    pub font_sizes: FontSizes,

    /// Resize gestures never make an element smaller than this on either
    /// axis.
    pub min_element_size: i32,

    /// Document auto-loaded at startup. Failure to load it is not an error.
    pub default_config_path: PathBuf,

    /// File name used for export downloads.
    pub export_file_name: String,

    /// Put a bottom menu on the initial scene of a new session. Scenes added
    /// later always get one.
    pub startup_menu: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            canvas: Canvas::default(),
            font_sizes: FontSizes::default(),
            min_element_size: MIN_ELEMENT_SIZE,
            default_config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
            export_file_name: EXPORT_FILE_NAME.to_string(),
            startup_menu: false,
        }
    }
}
