//! Menu projection: scene table → button row.
//!
//! A menu element stores nothing but its geometry. Its buttons are derived
//! from the scene names every time the table or the active scene changes,
//! so no operation has to re-wire menus by hand.

use serde::Serialize;
use smallvec::SmallVec;

/// One scene-switch button in a menu bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuButton {
    /// Scene switched to when pressed; also the label.
    pub scene: String,
    /// `true` for exactly the button of the active scene.
    pub active: bool,
}

/// Buttons in scene-table order.
pub type MenuRow = SmallVec<[MenuButton; 8]>;

/// Project scene names into a button row with the active scene marked.
#[must_use]
pub fn derive_menu_buttons<'a, I>(scene_names: I, active_scene: &str) -> MenuRow
where
    I: IntoIterator<Item = &'a str>,
{
    scene_names
        .into_iter()
        .map(|name| MenuButton {
            scene: name.to_string(),
            active: name == active_scene,
        })
        .collect()
}

/// Format the menu clock as zero-padded `HH:MM`. Out-of-range input wraps.
pub fn format_clock(hours: u32, minutes: u32) -> String {
    format!("{:02}:{:02}", hours % 24, minutes % 60)
}
