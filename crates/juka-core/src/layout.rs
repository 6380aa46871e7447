//! Canvas geometry: presets, clamping, resize floor, text extents.
//!
//! Everything here is pure integer arithmetic on element records. Pointer
//! handling lives in the editor's gesture module and calls into these.

use crate::model::*;
use winnow::ascii::digit1;
use winnow::combinator::separated_pair;
use winnow::prelude::*;
use winnow::token::one_of;

/// Height of a menu bar, and the distance of its top edge from the canvas
/// bottom.
pub const MENU_HEIGHT: i32 = 50;

/// Smallest width/height a resize gesture may produce.
pub const MIN_ELEMENT_SIZE: i32 = 50;

/// Horizontal padding added to a measured text run.
const TEXT_PADDING: i32 = 16;

/// The canvas (authoring surface) dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Canvas {
    pub width: i32,
    pub height: i32,
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

/// Named canvas sizes offered by the size selector.
pub const CANVAS_PRESETS: &[&str] = &["1280x720", "1920x1080", "1024x768", "800x600"];

/// Selector value for the free-form size fields.
pub const CUSTOM_PRESET: &str = "custom";

impl Canvas {
    /// Resolve the size selector. `preset` is either a `WxH` string or
    /// `custom`, in which case the two free-form fields are used. Fields that
    /// do not hold a positive integer fall back to 1280 / 720.
    pub fn from_selector(preset: &str, custom_width: &str, custom_height: &str) -> Self {
        let fallback = Canvas::default();
        if preset == CUSTOM_PRESET {
            let width = parse_positive(custom_width).unwrap_or(fallback.width);
            let height = parse_positive(custom_height).unwrap_or(fallback.height);
            return Canvas { width, height };
        }
        match parse_preset(preset) {
            Some((width, height)) => Canvas { width, height },
            None => {
                log::warn!("unrecognised canvas preset {preset:?}, using default");
                fallback
            }
        }
    }

    /// Format as a `WxH` preset string.
    pub fn preset_name(&self) -> String {
        format!("{}x{}", self.width, self.height)
    }
}

/// Parse a `WxH` preset like `1280x720`.
pub fn parse_preset(input: &str) -> Option<(i32, i32)> {
    let mut rest = input.trim();
    let dims = parse_dimensions.parse_next(&mut rest).ok()?;
    if !rest.is_empty() || dims.0 <= 0 || dims.1 <= 0 {
        return None;
    }
    Some(dims)
}

fn parse_dimensions(input: &mut &str) -> ModalResult<(i32, i32)> {
    separated_pair(parse_int, one_of(['x', 'X']), parse_int).parse_next(input)
}

fn parse_int(input: &mut &str) -> ModalResult<i32> {
    digit1.parse_to().parse_next(input)
}

fn parse_positive(field: &str) -> Option<i32> {
    let mut rest = field.trim();
    let n = parse_int.parse_next(&mut rest).ok()?;
    (rest.is_empty() && n > 0).then_some(n)
}

// ─── Clamping ────────────────────────────────────────────────────────────

/// Keep a box of `width × height` fully inside the canvas:
/// `clamp(x) = max(0, min(x, canvasWidth - width))`, same for y.
pub fn clamp_position(x: i32, y: i32, width: i32, height: i32, canvas: Canvas) -> (i32, i32) {
    let cx = x.min(canvas.width - width).max(0);
    let cy = y.min(canvas.height - height).max(0);
    (cx, cy)
}

/// Apply the resize floor (normally `MIN_ELEMENT_SIZE`).
pub fn clamp_size(width: i32, height: i32, floor: i32) -> (i32, i32) {
    (width.max(floor), height.max(floor))
}

/// Estimate the box of a single text run: advance width at roughly 0.6em
/// per character plus padding, and a 1.4 line-height.
pub fn estimate_text_extent(text: &str, font_px: u32) -> (i32, i32) {
    let font_px = font_px as f32;
    let chars = text.chars().count() as f32;
    let width = (chars * font_px * 0.6).ceil() as i32 + TEXT_PADDING;
    let height = (font_px * 1.4).ceil() as i32;
    (width.max(1), height.max(1))
}

/// The element's pixel size, measuring `Auto` sides from its text.
pub fn resolved_size(element: &Element, fonts: &FontSizes) -> (i32, i32) {
    if let (Dimension::Px(w), Dimension::Px(h)) = (element.size.width, element.size.height) {
        return (w, h);
    }
    let font_px = fonts.px(element.style.font.unwrap_or_default());
    let text = if element.text.is_empty() {
        element.kind.tag()
    } else {
        element.text.as_str()
    };
    let (mw, mh) = estimate_text_extent(text, font_px);
    (
        element.size.width.px().unwrap_or(mw),
        element.size.height.px().unwrap_or(mh),
    )
}

/// Bring an element back inside a (possibly resized) canvas.
///
/// Menus are re-anchored to the bottom edge at full width; everything else
/// is clamped by position only. Returns `true` if anything changed.
pub fn fit_to_canvas(element: &mut Element, canvas: Canvas, fonts: &FontSizes) -> bool {
    let before = (element.position, element.size);

    if element.kind.is_menu() {
        let height = element.size.height.px().unwrap_or(MENU_HEIGHT);
        element.size = Size::px(canvas.width, height);
        element.position.y = canvas.height - height;
        element.position.x = 0;
    } else {
        let (w, h) = resolved_size(element, fonts);
        let (x, y) = clamp_position(element.position.x, element.position.y, w, h, canvas);
        element.position = Position { x, y };
    }

    before != (element.position, element.size)
}
