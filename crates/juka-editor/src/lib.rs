pub mod config;
pub mod error;
pub mod gesture;
pub mod io;
pub mod menu;
pub mod session;

pub use config::EditorConfig;
pub use error::SessionError;
pub use gesture::{Gesture, GestureKind};
pub use menu::{MenuButton, MenuRow, derive_menu_buttons, format_clock};
pub use session::{EditorSession, ElementEdit};
