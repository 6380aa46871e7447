//! Document formatting pipeline: parse → fit → emit.
//!
//! Rewrites any readable export file into the canonical form the editor
//! itself would save: defaults filled in, legacy trigger fields migrated,
//! keys in emit order. Used by the CLI `fmt` subcommand.

use crate::emitter::emit_json;
use crate::error::Result;
use crate::layout::Canvas;
use crate::parser::parse_document;

// ─── Config ───────────────────────────────────────────────────────────────

/// Configuration for `format_document`.
#[derive(Debug, Clone)]
pub struct FormatConfig {
    /// Canvas the document is loaded into. Menus take its width.
    pub canvas: Canvas,

    /// Clamp every stored element back inside `canvas`. Default: **false**,
    /// since a document authored on a larger canvas would be moved.
    pub fit_to_canvas: bool,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            canvas: Canvas::default(),
            fit_to_canvas: false,
        }
    }
}

// ─── Pipeline ─────────────────────────────────────────────────────────────

/// Parse an export document and re-emit it canonically.
///
/// The output is idempotent: `format_document(format_document(s, c), c) == format_document(s, c)`.
///
/// # Errors
/// Returns the parse error if the input is not a readable export document.
pub fn format_document(text: &str, config: &FormatConfig) -> Result<String> {
    let mut project = parse_document(text, config.canvas)?;

    if config.fit_to_canvas {
        let fonts = project.meta.font_sizes;
        project.scenes.fit_to_canvas(config.canvas, &fonts);
    }

    emit_json(&project)
}

// ─── Tests ────────────────────────────────────────────────────────────────
