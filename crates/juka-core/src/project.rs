//! The complete in-memory document: metadata, variables, scenes.

use crate::model::{Color, FontSizes};
use crate::scene::SceneTable;
use crate::variables::VariableStore;
use std::collections::BTreeMap;

/// Document-level metadata. Everything except the three text fields lives
/// under reserved keys of the export file's `variables` object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentMeta {
    pub title: String,
    pub author: String,
    pub description: String,
    /// Data URI or filename of the canvas background.
    pub background_image: Option<String>,
    pub font_sizes: FontSizes,
    /// Font name → font file, passed through for the player.
    pub fonts: Option<BTreeMap<String, String>>,
    /// Decorative defaults passed through for the player.
    pub button_color: Option<Color>,
    pub label_color: Option<Color>,
}

/// Everything that is persisted: the unit of export and import.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Project {
    pub meta: DocumentMeta,
    pub variables: VariableStore,
    pub scenes: SceneTable,
}

impl Project {
    /// An empty project with a single default scene.
    pub fn new() -> Self {
        Self::default()
    }
}
