//! Session error type.

use std::path::PathBuf;

/// A rejected session operation. The session is unchanged whenever one of
/// these is returned.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("name must not be empty")]
    EmptyName,

    #[error("a scene named {0:?} already exists")]
    DuplicateScene(String),

    #[error("a variable named {0:?} already exists")]
    DuplicateVariable(String),

    #[error("{0:?} is reserved for document metadata")]
    ReservedVariable(String),

    #[error("no scene named {0:?}")]
    UnknownScene(String),

    #[error("no variable named {0:?}")]
    UnknownVariable(String),

    #[error("cannot delete the last scene")]
    LastScene,

    #[error("no element {0} on the canvas")]
    UnknownElement(String),

    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Document(#[from] juka_core::Error),
}
