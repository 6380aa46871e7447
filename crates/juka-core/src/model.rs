//! Element records: the canonical in-memory form of one placed item.
//!
//! An element is a plain value. Snapshotting a scene is `Vec<Element>::clone`,
//! so nothing here points back into a rendering tree. Coordinates are
//! integer pixels relative to the canvas origin (top-left).

use crate::id::ElementId;
use crate::layout::{Canvas, MENU_HEIGHT};
use serde::{Deserialize, Serialize};

// ─── Colors ──────────────────────────────────────────────────────────────

/// Opaque RGB color.
///
/// Element colors travel as `#rrggbb` strings; the decorative
/// `buttonColor` / `labelColor` metadata travels as `{r, g, b}`, which is
/// what the serde derive produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Helper to parse a single hex digit.
pub fn hex_val(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RGB` or `#RRGGBB` (the leading `#` is optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let bytes = hex.as_bytes();

        match bytes.len() {
            3 => {
                let r = hex_val(bytes[0])?;
                let g = hex_val(bytes[1])?;
                let b = hex_val(bytes[2])?;
                Some(Self::rgb(r * 17, g * 17, b * 17))
            }
            6 => {
                let r = hex_val(bytes[0])? << 4 | hex_val(bytes[1])?;
                let g = hex_val(bytes[2])? << 4 | hex_val(bytes[3])?;
                let b = hex_val(bytes[4])? << 4 | hex_val(bytes[5])?;
                Some(Self::rgb(r, g, b))
            }
            _ => None,
        }
    }

    /// Emit as lowercase `#rrggbb`, the form a browser color picker reports.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

// ─── Fonts ───────────────────────────────────────────────────────────────

/// Font-size category. The pixel size comes from the document's
/// `FontSizes` table so a single edit restyles every element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FontCategory {
    Title,
    Big,
    #[default]
    Medium,
    Small,
}

impl FontCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            FontCategory::Title => "title",
            FontCategory::Big => "big",
            FontCategory::Medium => "medium",
            FontCategory::Small => "small",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "title" => Some(FontCategory::Title),
            "big" => Some(FontCategory::Big),
            "medium" => Some(FontCategory::Medium),
            "small" => Some(FontCategory::Small),
            _ => None,
        }
    }
}

/// Category → pixel size table (`variables.fontSizes` in the export file).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontSizes {
    pub title: u32,
    pub big: u32,
    pub medium: u32,
    pub small: u32,
}

impl Default for FontSizes {
    fn default() -> Self {
        Self {
            title: 48,
            big: 36,
            medium: 24,
            small: 18,
        }
    }
}

impl FontSizes {
    /// Pixel size for a category.
    pub fn px(&self, category: FontCategory) -> u32 {
        match category {
            FontCategory::Title => self.title,
            FontCategory::Big => self.big,
            FontCategory::Medium => self.medium,
            FontCategory::Small => self.small,
        }
    }
}

// ─── Geometry ────────────────────────────────────────────────────────────

/// One side of an element's size. `Auto` exists only between creation and
/// first layout of an element whose type has no fixed default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Px(i32),
    Auto,
}

impl Dimension {
    pub fn px(self) -> Option<i32> {
        match self {
            Dimension::Px(n) => Some(n),
            Dimension::Auto => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    pub width: Dimension,
    pub height: Dimension,
}

impl Size {
    pub const fn px(width: i32, height: i32) -> Self {
        Self {
            width: Dimension::Px(width),
            height: Dimension::Px(height),
        }
    }

    pub const AUTO: Size = Size {
        width: Dimension::Auto,
        height: Dimension::Auto,
    };
}

// ─── Element kinds ───────────────────────────────────────────────────────

/// The element variants, with the data only that variant carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementKind {
    Button,
    /// Text without a background.
    Label,
    /// Image element; `source` is a data URI or a filename.
    Image { source: Option<String> },
    Input,
    /// Video placeholder, optionally bound to a variable holding the path.
    Video { variable: Option<String> },
    /// Bottom bar with one button per scene and a clock.
    Menu,
    /// Runs `command` and lists the result stored in `list_variable`.
    CollapsedList {
        command: String,
        list_variable: String,
    },
    /// A type tag this editor does not know. Kept so documents written by
    /// newer editors survive a load/save cycle.
    Other(String),
}

impl ElementKind {
    /// Map a wire type tag to a kind. Unknown tags never fail.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "button" => ElementKind::Button,
            "label" => ElementKind::Label,
            "image" => ElementKind::Image { source: None },
            "input" => ElementKind::Input,
            "video" => ElementKind::Video { variable: None },
            // The palette entry is called `menu-element`.
            "menu" | "menu-element" => ElementKind::Menu,
            "collapsedlist" => ElementKind::CollapsedList {
                command: String::new(),
                list_variable: String::new(),
            },
            other => ElementKind::Other(other.to_string()),
        }
    }

    /// The wire type tag.
    pub fn tag(&self) -> &str {
        match self {
            ElementKind::Button => "button",
            ElementKind::Label => "label",
            ElementKind::Image { .. } => "image",
            ElementKind::Input => "input",
            ElementKind::Video { .. } => "video",
            ElementKind::Menu => "menu",
            ElementKind::CollapsedList { .. } => "collapsedlist",
            ElementKind::Other(tag) => tag,
        }
    }

    /// Text shown on a freshly created element.
    pub fn display_name(&self) -> String {
        match self {
            ElementKind::Input | ElementKind::Menu => String::new(),
            ElementKind::CollapsedList { .. } => "Collapsed List".to_string(),
            other => {
                let tag = other.tag();
                let mut chars = tag.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => String::new(),
                }
            }
        }
    }

    /// Whether the element carries display text in the document.
    pub fn has_text(&self) -> bool {
        !matches!(self, ElementKind::Menu | ElementKind::Image { .. })
    }

    /// Whether a background color applies. Only buttons get one.
    pub fn has_background(&self) -> bool {
        matches!(self, ElementKind::Button)
    }

    /// Whether the generic text/trigger/style behavior applies.
    pub fn is_menu(&self) -> bool {
        matches!(self, ElementKind::Menu)
    }

    /// Factory size for this type on the given canvas.
    pub fn default_size(&self, canvas: Canvas) -> Size {
        match self {
            ElementKind::Button | ElementKind::Label => Size::px(120, 40),
            ElementKind::Image { .. } => Size::px(100, 100),
            ElementKind::Input => Size::px(150, 40),
            ElementKind::Video { .. } => Size::px(200, 150),
            ElementKind::Menu => Size::px(canvas.width, MENU_HEIGHT),
            ElementKind::CollapsedList { .. } => Size::px(600, 40),
            ElementKind::Other(_) => Size::AUTO,
        }
    }
}

// ─── Style ───────────────────────────────────────────────────────────────

/// Visual attributes of a non-menu element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementStyle {
    pub color: Option<Color>,
    /// Always `None` for labels.
    pub bg_color: Option<Color>,
    pub font: Option<FontCategory>,
    /// Percentage, 0–100.
    pub opacity: u8,
}

impl Default for ElementStyle {
    fn default() -> Self {
        Self {
            color: None,
            bg_color: None,
            font: None,
            opacity: 100,
        }
    }
}

// ─── Triggers ────────────────────────────────────────────────────────────

/// Trigger kind tags as they appear in the `trigger` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerKind {
    ChangeScene,
    SetVariable,
    ExternalApp,
    PlayVideo,
    PlayImage,
}

impl TriggerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TriggerKind::ChangeScene => "change_scene",
            TriggerKind::SetVariable => "set_variable",
            TriggerKind::ExternalApp => "external_app",
            TriggerKind::PlayVideo => "play_video",
            TriggerKind::PlayImage => "play_image",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "change_scene" => Some(TriggerKind::ChangeScene),
            "set_variable" => Some(TriggerKind::SetVariable),
            "external_app" => Some(TriggerKind::ExternalApp),
            "play_video" => Some(TriggerKind::PlayVideo),
            "play_image" => Some(TriggerKind::PlayImage),
            _ => None,
        }
    }
}

/// Action fired by the player when the element is activated.
///
/// Each variant holds only its own sub-fields, so replacing the trigger
/// with another kind drops whatever the previous kind had configured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    ChangeScene { scene: String },
    SetVariable { variable: String, value: String },
    ExternalApp { path: String, return_variable: String },
    PlayVideo { path: String },
    PlayImage { path: String },
}

impl Trigger {
    /// A trigger of the given kind with every sub-field blank, which is what
    /// the property panel holds right after the kind selector changes.
    pub fn blank(kind: TriggerKind) -> Self {
        match kind {
            TriggerKind::ChangeScene => Trigger::ChangeScene {
                scene: String::new(),
            },
            TriggerKind::SetVariable => Trigger::SetVariable {
                variable: String::new(),
                value: String::new(),
            },
            TriggerKind::ExternalApp => Trigger::ExternalApp {
                path: String::new(),
                return_variable: String::new(),
            },
            TriggerKind::PlayVideo => Trigger::PlayVideo {
                path: String::new(),
            },
            TriggerKind::PlayImage => Trigger::PlayImage {
                path: String::new(),
            },
        }
    }

    pub fn kind(&self) -> TriggerKind {
        match self {
            Trigger::ChangeScene { .. } => TriggerKind::ChangeScene,
            Trigger::SetVariable { .. } => TriggerKind::SetVariable,
            Trigger::ExternalApp { .. } => TriggerKind::ExternalApp,
            Trigger::PlayVideo { .. } => TriggerKind::PlayVideo,
            Trigger::PlayImage { .. } => TriggerKind::PlayImage,
        }
    }
}

// ─── Element ─────────────────────────────────────────────────────────────

/// One placed visual item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Session-local handle; not persisted.
    pub id: ElementId,
    pub kind: ElementKind,
    pub position: Position,
    pub size: Size,
    /// Display text, possibly containing `$name` tokens. Empty for menus
    /// and images.
    pub text: String,
    pub style: ElementStyle,
    pub trigger: Option<Trigger>,
}

impl Element {
    /// Build an element with the factory defaults for its type, placed at
    /// `(x, y)`. Menus ignore the requested position and pin to the bottom
    /// edge at full canvas width.
    pub fn create(kind: ElementKind, x: i32, y: i32, canvas: Canvas) -> Self {
        let size = kind.default_size(canvas);
        let id = ElementId::fresh(kind.tag());

        if kind.is_menu() {
            return Self {
                id,
                kind,
                position: Position {
                    x: 0,
                    y: canvas.height - MENU_HEIGHT,
                },
                size,
                text: String::new(),
                style: ElementStyle::default(),
                trigger: None,
            };
        }

        let style = ElementStyle {
            color: Some(Color::BLACK),
            bg_color: kind.has_background().then_some(Color::WHITE),
            font: Some(FontCategory::Medium),
            opacity: 100,
        };

        let mut element = Self {
            id,
            text: kind.display_name(),
            kind,
            position: Position { x, y },
            size,
            style,
            trigger: None,
        };
        element.enforce_invariants();
        element
    }

    /// Re-apply per-type invariants after an edit or a load:
    /// labels never keep a background; menus carry no text, style or trigger.
    pub fn enforce_invariants(&mut self) {
        match self.kind {
            ElementKind::Label => self.style.bg_color = None,
            ElementKind::Menu => {
                self.text.clear();
                self.style = ElementStyle::default();
                self.trigger = None;
            }
            _ => {}
        }
        self.style.opacity = self.style.opacity.min(100);
    }

    /// Copy with a fresh ID, for duplicating a scene.
    pub fn duplicate(&self) -> Self {
        let mut copy = self.clone();
        copy.id = ElementId::fresh(self.kind.tag());
        copy
    }
}
