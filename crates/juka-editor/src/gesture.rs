//! Drag and resize gestures.
//!
//! A gesture is a short-lived value created on pointer-down, fed pointer
//! positions while the button is held, and dropped on pointer-up. It only
//! remembers where things started; each update computes the new geometry
//! from the total pointer delta, so missed move events never accumulate
//! error. Clamping is applied by the session when the resulting
//! `ElementEdit` is applied.

use crate::session::ElementEdit;
use juka_core::id::ElementId;
use juka_core::layout::resolved_size;
use juka_core::model::{Element, FontSizes, Position};

/// What the pointer is doing to the element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureKind {
    /// Moving the element by its body.
    Drag,
    /// Pulling the bottom-right resize handle.
    Resize,
}

/// State captured at pointer-down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gesture {
    pub element: ElementId,
    pub kind: GestureKind,
    start_pointer: (i32, i32),
    start_position: Position,
    start_size: (i32, i32),
}

impl Gesture {
    /// Begin a gesture on `element` with the pointer at `(x, y)` in canvas
    /// coordinates.
    pub fn begin(kind: GestureKind, element: &Element, x: i32, y: i32, fonts: &FontSizes) -> Self {
        Self {
            element: element.id,
            kind,
            start_pointer: (x, y),
            start_position: element.position,
            start_size: resolved_size(element, fonts),
        }
    }

    /// The edit for the pointer now being at `(x, y)`.
    pub fn update(&self, x: i32, y: i32) -> ElementEdit {
        let dx = x - self.start_pointer.0;
        let dy = y - self.start_pointer.1;
        match self.kind {
            GestureKind::Drag => ElementEdit::Move {
                x: self.start_position.x + dx,
                y: self.start_position.y + dy,
            },
            GestureKind::Resize => ElementEdit::Resize {
                width: self.start_size.0 + dx,
                height: self.start_size.1 + dy,
            },
        }
    }
}
