pub mod document;
pub mod emitter;
pub mod error;
pub mod format;
pub mod id;
pub mod interpolate;
pub mod layout;
pub mod lint;
pub mod model;
pub mod parser;
pub mod project;
pub mod scene;
pub mod variables;

pub use document::{Document, EXPORT_FILE_NAME};
pub use emitter::{emit_document, emit_json};
pub use error::{Error, Result};
pub use format::{FormatConfig, format_document};
pub use id::ElementId;
pub use interpolate::{Interpolation, interpolate};
pub use layout::{Canvas, clamp_position, clamp_size, fit_to_canvas};
pub use lint::{LintDiagnostic, LintSeverity, lint_project};
pub use model::*;
pub use parser::parse_document;
pub use project::{DocumentMeta, Project};
pub use scene::{DEFAULT_SCENE, Scene, SceneTable};
pub use variables::VariableStore;
