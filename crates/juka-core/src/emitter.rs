//! Serializer: `Project` → export document.
//!
//! Output is deterministic for a given project: scenes in table order,
//! elements in definition order, variables in insertion order followed by
//! the reserved metadata keys. Attribute presence follows the element type:
//!
//! - `menu` emits only `type`, `x`, `y`, `height`
//! - `bgColor` only for buttons
//! - trigger sub-fields only for the selected trigger kind
//! - `text` for every type except `menu` and `image`

use crate::document::{Document, WireDimension, WireElement, WireScene};
use crate::error::Result;
use crate::model::*;
use crate::project::Project;
use serde_json::{Map, Value, json};

/// Build the export document for a project.
#[must_use]
pub fn emit_document(project: &Project) -> Document {
    let meta = &project.meta;

    let mut variables = Map::new();
    for (name, value) in project.variables.iter() {
        variables.insert(name.to_string(), Value::String(value.to_string()));
    }
    variables.insert(
        "backgroundImage".into(),
        Value::String(meta.background_image.clone().unwrap_or_default()),
    );
    variables.insert(
        "fontSizes".into(),
        json!({
            "title": meta.font_sizes.title,
            "big": meta.font_sizes.big,
            "medium": meta.font_sizes.medium,
            "small": meta.font_sizes.small,
        }),
    );
    if let Some(fonts) = &meta.fonts {
        let fonts: Map<String, Value> = fonts
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect();
        variables.insert("fonts".into(), Value::Object(fonts));
    }
    if let Some(c) = meta.button_color {
        variables.insert("buttonColor".into(), json!({ "r": c.r, "g": c.g, "b": c.b }));
    }
    if let Some(c) = meta.label_color {
        variables.insert("labelColor".into(), json!({ "r": c.r, "g": c.g, "b": c.b }));
    }

    let scenes = project
        .scenes
        .iter()
        .map(|scene| WireScene {
            name: scene.name.clone(),
            elements: scene.elements.iter().map(emit_element).collect(),
        })
        .collect();

    Document {
        title: meta.title.clone(),
        author: meta.author.clone(),
        description: meta.description.clone(),
        variables,
        scenes: Some(scenes),
    }
}

/// Serialize a project to pretty-printed JSON (two-space indent).
pub fn emit_json(project: &Project) -> Result<String> {
    let doc = emit_document(project);
    Ok(serde_json::to_string_pretty(&doc)?)
}

/// Flatten one element record.
#[must_use]
pub fn emit_element(element: &Element) -> WireElement {
    let mut wire = WireElement {
        kind: element.kind.tag().to_string(),
        x: element.position.x,
        y: element.position.y,
        height: Some(wire_dimension(element.size.height)),
        ..Default::default()
    };

    if element.kind.is_menu() {
        return wire;
    }

    wire.width = Some(wire_dimension(element.size.width));

    let style = &element.style;
    wire.color = style.color.map(|c| c.to_hex());
    if element.kind.has_background() {
        wire.bg_color = style.bg_color.map(|c| c.to_hex());
    }
    wire.font = style.font.map(|f| f.as_str().to_string());
    wire.opacity = Some(f64::from(style.opacity.min(100)) / 100.0);

    if let Some(trigger) = &element.trigger {
        emit_trigger(trigger, &mut wire);
    }

    if element.kind.has_text() {
        wire.text = Some(element.text.clone());
    }

    match &element.kind {
        ElementKind::CollapsedList {
            command,
            list_variable,
        } => {
            wire.command = Some(command.clone());
            wire.list_variable = Some(list_variable.clone());
        }
        ElementKind::Image { source } => wire.image = source.clone(),
        ElementKind::Video { variable } => wire.video_variable = variable.clone(),
        _ => {}
    }

    wire
}

fn emit_trigger(trigger: &Trigger, wire: &mut WireElement) {
    wire.trigger = Some(trigger.kind().as_str().to_string());
    match trigger {
        Trigger::ChangeScene { scene } => wire.scene_change = Some(scene.clone()),
        Trigger::SetVariable { variable, value } => {
            wire.variable_change = Some(variable.clone());
            wire.variable_change_value = Some(value.clone());
        }
        Trigger::ExternalApp {
            path,
            return_variable,
        } => {
            wire.external_app_path = Some(path.clone());
            wire.external_app_return = Some(return_variable.clone());
        }
        Trigger::PlayVideo { path } => wire.video_path = Some(path.clone()),
        Trigger::PlayImage { path } => wire.image_path = Some(path.clone()),
    }
}

fn wire_dimension(d: Dimension) -> WireDimension {
    match d {
        Dimension::Px(n) => WireDimension::Px(n),
        Dimension::Auto => WireDimension::Auto,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Canvas;
    use pretty_assertions::assert_eq;

    fn canvas() -> Canvas {
        Canvas::default()
    }

    #[test]
    fn menu_emits_only_geometry() {
        let menu = Element::create(ElementKind::Menu, 0, 0, canvas());
        let out = serde_json::to_value(emit_element(&menu)).unwrap();
        assert_eq!(out, json!({ "type": "menu", "x": 0, "y": 670, "height": 50 }));
    }

    #[test]
    fn button_emits_bg_color_label_does_not() {
        let button = Element::create(ElementKind::Button, 1, 2, canvas());
        let out = serde_json::to_value(emit_element(&button)).unwrap();
        assert_eq!(out["bgColor"], "#ffffff");
        assert_eq!(out["color"], "#000000");
        assert_eq!(out["font"], "medium");
        assert_eq!(out["opacity"], 1.0);
        assert_eq!(out["text"], "Button");

        let mut label = Element::create(ElementKind::Label, 1, 2, canvas());
        label.style.bg_color = Some(Color::WHITE);
        let out = serde_json::to_value(emit_element(&label)).unwrap();
        assert!(out.get("bgColor").is_none());
    }

    #[test]
    fn opacity_is_a_fraction() {
        let mut el = Element::create(ElementKind::Label, 0, 0, canvas());
        el.style.opacity = 35;
        assert_eq!(emit_element(&el).opacity, Some(0.35));
    }

    #[test]
    fn only_selected_trigger_fields_are_emitted() {
        let mut el = Element::create(ElementKind::Button, 0, 0, canvas());
        el.trigger = Some(Trigger::SetVariable {
            variable: "score".into(),
            value: "10".into(),
        });
        el.trigger = Some(Trigger::ChangeScene {
            scene: "Scene 2".into(),
        });
        let out = serde_json::to_value(emit_element(&el)).unwrap();
        assert_eq!(out["trigger"], "change_scene");
        assert_eq!(out["sceneChange"], "Scene 2");
        assert!(out.get("variableChange").is_none());
        assert!(out.get("variableChangeValue").is_none());
    }

    #[test]
    fn image_emits_source_not_text() {
        let mut el = Element::create(ElementKind::from_tag("image"), 0, 0, canvas());
        el.kind = ElementKind::Image {
            source: Some("cat.png".into()),
        };
        let wire = emit_element(&el);
        assert_eq!(wire.image.as_deref(), Some("cat.png"));
        assert_eq!(wire.text, None);
    }

    #[test]
    fn variables_precede_reserved_keys() {
        let mut project = Project::new();
        project.variables.insert("zeta", "1");
        project.variables.insert("alpha", "2");
        let doc = emit_document(&project);
        let keys: Vec<&str> = doc.variables.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "backgroundImage", "fontSizes"]);
        assert_eq!(doc.variables["fontSizes"]["title"], 48);
    }

    #[test]
    fn emit_is_deterministic() {
        let mut project = Project::new();
        project.scenes.insert("Scene 2", vec![]);
        let a = emit_json(&project).unwrap();
        let b = emit_json(&project).unwrap();
        assert_eq!(a, b);
    }
}
