//! Loading and saving export files on disk.

use crate::config::EditorConfig;
use crate::error::SessionError;
use crate::session::EditorSession;
use juka_core::layout::Canvas;
use juka_core::parser::parse_document;
use juka_core::project::Project;
use std::path::{Path, PathBuf};

/// Read and parse an export file.
pub fn load_project(path: &Path, canvas: Canvas) -> Result<Project, SessionError> {
    let text = std::fs::read_to_string(path).map_err(|source| SessionError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_document(&text, canvas)?)
}

/// Open a session on the configured default document, falling back to a
/// blank session if it is missing or unreadable.
pub fn open_default(config: EditorConfig) -> EditorSession {
    let path = config.default_config_path.clone();
    match load_project(&path, config.canvas) {
        Ok(project) => {
            log::debug!("loaded default document from {}", path.display());
            EditorSession::from_project(project, config)
        }
        Err(e) => {
            log::debug!("no default document ({e}); starting blank");
            EditorSession::new(config)
        }
    }
}

/// Export the session into `dir` under the configured file name. Returns
/// the written path.
pub fn save_export(session: &mut EditorSession, dir: &Path) -> Result<PathBuf, SessionError> {
    let json = session.export_json()?;
    let path = dir.join(&session.config().export_file_name);
    std::fs::write(&path, json).map_err(|source| SessionError::Io {
        path: path.clone(),
        source,
    })?;
    log::debug!("wrote {}", path.display());
    Ok(path)
}
