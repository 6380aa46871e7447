//! Deserializer: export document → `Project`.
//!
//! The whole document is converted into a fresh `Project` before the caller
//! sees anything, so a failed import can never leave half-applied state.
//! Absent fields are filled with the same defaults the element factory
//! uses.

use crate::document::{Document, WireDimension, WireElement, scalar_to_string};
use crate::error::{Error, Result};
use crate::layout::{Canvas, MENU_HEIGHT, estimate_text_extent};
use crate::model::*;
use crate::project::{DocumentMeta, Project};
use crate::scene::{Scene, SceneTable};
use crate::variables::VariableStore;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Size used for any dimension nothing else can resolve.
const FALLBACK_SIZE: Size = Size::px(100, 40);

/// Parse export JSON into a project. `canvas` is needed because menus are
/// always as wide as the canvas they are loaded into.
#[must_use = "parsing result should be used"]
pub fn parse_document(json: &str, canvas: Canvas) -> Result<Project> {
    let doc: Document = serde_json::from_str(json)?;
    from_document(doc, canvas)
}

/// Convert an already-decoded document.
pub fn from_document(doc: Document, canvas: Canvas) -> Result<Project> {
    let wire_scenes = doc.scenes.ok_or(Error::MissingScenes)?;

    let (variables, meta_vars) = split_variables(doc.variables);
    let meta = DocumentMeta {
        title: doc.title,
        author: doc.author,
        description: doc.description,
        ..meta_vars
    };

    let mut scenes = Vec::with_capacity(wire_scenes.len());
    for wire_scene in wire_scenes {
        let mut scene = Scene::new(wire_scene.name);
        for wire in wire_scene.elements {
            match element_from_wire(wire, canvas, &meta.font_sizes) {
                Some(element) => scene.elements.push(element),
                None => log::warn!("skipping element without a type in {:?}", scene.name),
            }
        }
        scenes.push(scene);
    }

    let scenes = if scenes.is_empty() {
        log::debug!("document defines no scenes; starting from the default scene");
        SceneTable::new()
    } else {
        let names: Vec<String> = scenes.iter().map(|s| s.name.clone()).collect();
        SceneTable::from_scenes(scenes).ok_or_else(|| {
            Error::InvalidDocument(format!("duplicate scene names in {names:?}"))
        })?
    };

    log::debug!(
        "parsed document: {} scene(s), {} variable(s)",
        scenes.len(),
        variables.len()
    );

    Ok(Project {
        meta,
        variables,
        scenes,
    })
}

/// Separate user variables from the reserved metadata keys.
fn split_variables(raw: Map<String, Value>) -> (VariableStore, DocumentMeta) {
    let mut variables = VariableStore::new();
    let mut meta = DocumentMeta::default();

    for (key, value) in raw {
        match key.as_str() {
            "backgroundImage" => {
                meta.background_image = scalar_to_string(&value).filter(|s| !s.is_empty());
            }
            "fontSizes" => meta.font_sizes = parse_font_sizes(&value),
            "fonts" => meta.fonts = parse_fonts(&value),
            "buttonColor" => meta.button_color = parse_rgb(&key, value),
            "labelColor" => meta.label_color = parse_rgb(&key, value),
            _ => match &value {
                Value::Null => variables.insert(key, ""),
                Value::String(_) | Value::Number(_) | Value::Bool(_) => {
                    if !value.is_string() {
                        log::warn!("variable {key:?} is not a string; storing {value}");
                    }
                    let text = scalar_to_string(&value).unwrap_or_default();
                    variables.insert(key, text);
                }
                _ => log::warn!("skipping variable {key:?}: value is not a scalar"),
            },
        }
    }

    (variables, meta)
}

fn parse_font_sizes(value: &Value) -> FontSizes {
    let mut sizes = FontSizes::default();
    let Some(obj) = value.as_object() else {
        return sizes;
    };
    let read = |key: &str, fallback: u32| -> u32 {
        obj.get(key)
            .and_then(|v| match v {
                Value::Number(n) => n.as_u64(),
                Value::String(s) => s.trim().parse::<u64>().ok(),
                _ => None,
            })
            .filter(|&n| n > 0)
            .and_then(|n| u32::try_from(n).ok())
            .unwrap_or(fallback)
    };
    sizes.title = read("title", sizes.title);
    sizes.big = read("big", sizes.big);
    sizes.medium = read("medium", sizes.medium);
    sizes.small = read("small", sizes.small);
    sizes
}

fn parse_fonts(value: &Value) -> Option<BTreeMap<String, String>> {
    let obj = value.as_object()?;
    Some(
        obj.iter()
            .filter_map(|(k, v)| scalar_to_string(v).map(|s| (k.clone(), s)))
            .collect(),
    )
}

fn parse_rgb(key: &str, value: Value) -> Option<Color> {
    match serde_json::from_value::<Color>(value) {
        Ok(color) => Some(color),
        Err(e) => {
            log::warn!("ignoring {key}: {e}");
            None
        }
    }
}

fn parse_color(raw: Option<&str>, fallback: Color) -> Color {
    match raw {
        Some(hex) => Color::from_hex(hex).unwrap_or_else(|| {
            log::warn!("unparseable color {hex:?}, using {}", fallback.to_hex());
            fallback
        }),
        None => fallback,
    }
}

/// Rebuild one element record. Returns `None` for an element without a
/// type tag.
pub fn element_from_wire(wire: WireElement, canvas: Canvas, fonts: &FontSizes) -> Option<Element> {
    if wire.kind.is_empty() {
        return None;
    }

    let mut kind = ElementKind::from_tag(&wire.kind);
    match &mut kind {
        ElementKind::Image { source } => *source = wire.image.clone().filter(|s| !s.is_empty()),
        ElementKind::Video { variable } => *variable = wire.video_variable.clone(),
        ElementKind::CollapsedList {
            command,
            list_variable,
        } => {
            *command = wire.command.clone().unwrap_or_default();
            *list_variable = wire.list_variable.clone().unwrap_or_default();
        }
        _ => {}
    }

    let opacity = wire
        .opacity
        .map(|o| (o * 100.0).round().clamp(0.0, 100.0) as u8)
        .unwrap_or(100);
    let position = Position {
        x: wire.x,
        y: wire.y,
    };

    log::trace!("rebuild {} at ({}, {})", wire.kind, wire.x, wire.y);

    if kind.is_menu() {
        let height = match wire.height {
            Some(WireDimension::Px(h)) if h > 0 => h,
            _ => MENU_HEIGHT,
        };
        let mut menu = Element::create(kind, 0, 0, canvas);
        menu.position.y = canvas.height - height;
        menu.size = Size::px(canvas.width, height);
        return Some(menu);
    }

    let style = ElementStyle {
        color: Some(parse_color(wire.color.as_deref(), Color::BLACK)),
        bg_color: kind
            .has_background()
            .then(|| parse_color(wire.bg_color.as_deref(), Color::WHITE)),
        font: Some(
            wire.font
                .as_deref()
                .and_then(FontCategory::from_name)
                .unwrap_or_default(),
        ),
        opacity,
    };

    let text = if kind.has_text() {
        wire.text.clone().unwrap_or_else(|| kind.display_name())
    } else {
        String::new()
    };

    let size = resolve_wire_size(&kind, wire.width, wire.height, &text, &style, canvas, fonts);
    let trigger = trigger_from_wire(&wire);

    let mut element = Element::create(kind, position.x, position.y, canvas);
    element.size = size;
    element.text = text;
    element.style = style;
    element.trigger = trigger;
    element.enforce_invariants();
    Some(element)
}

/// Fill width/height: positive integers are kept; a `null` side of a
/// button or label is measured from its text; anything else takes the
/// factory default for the type.
fn resolve_wire_size(
    kind: &ElementKind,
    width: Option<WireDimension>,
    height: Option<WireDimension>,
    text: &str,
    style: &ElementStyle,
    canvas: Canvas,
    fonts: &FontSizes,
) -> Size {
    let defaults = kind.default_size(canvas);
    let measured = || {
        let font_px = fonts.px(style.font.unwrap_or_default());
        let sample = if text.is_empty() { kind.tag() } else { text };
        estimate_text_extent(sample, font_px)
    };
    let measures_text = matches!(kind, ElementKind::Button | ElementKind::Label);

    let fallback = |axis: usize| {
        let side = if axis == 0 {
            FALLBACK_SIZE.width
        } else {
            FALLBACK_SIZE.height
        };
        side.px().unwrap_or(0)
    };
    let pick = |wire: Option<WireDimension>, default: Dimension, axis: usize| match wire {
        Some(WireDimension::Px(n)) if n > 0 => n,
        Some(WireDimension::Auto) if measures_text => {
            let (w, h) = measured();
            if axis == 0 { w } else { h }
        }
        _ => default.px().unwrap_or_else(|| fallback(axis)),
    };

    Size::px(pick(width, defaults.width, 0), pick(height, defaults.height, 1))
}

fn trigger_from_wire(wire: &WireElement) -> Option<Trigger> {
    let name = wire.trigger.as_deref().filter(|s| !s.is_empty())?;
    let Some(kind) = TriggerKind::from_name(name) else {
        log::warn!("ignoring unknown trigger {name:?}");
        return None;
    };

    let target = |primary: &Option<String>| {
        primary
            .clone()
            .or_else(|| wire.trigger_target.clone())
            .unwrap_or_default()
    };
    let value = |primary: &Option<String>| {
        primary
            .clone()
            .or_else(|| wire.trigger_value.clone())
            .unwrap_or_default()
    };

    Some(match kind {
        TriggerKind::ChangeScene => Trigger::ChangeScene {
            scene: target(&wire.scene_change),
        },
        TriggerKind::SetVariable => Trigger::SetVariable {
            variable: target(&wire.variable_change),
            value: value(&wire.variable_change_value),
        },
        TriggerKind::ExternalApp => Trigger::ExternalApp {
            path: target(&wire.external_app_path),
            return_variable: value(&wire.external_app_return),
        },
        TriggerKind::PlayVideo => Trigger::PlayVideo {
            path: target(&wire.video_path),
        },
        TriggerKind::PlayImage => Trigger::PlayImage {
            path: target(&wire.image_path),
        },
    })
}
