//! WASM bridge for Juka: exposes the editor session to the browser editor.
//!
//! Compiled via `wasm-pack build --target web`. The JavaScript side owns the
//! DOM: it renders elements from `elements_json`, forwards pointer events,
//! and calls back in for every edit. Structured results travel as JSON
//! strings; failures return `false` / `""` and are logged to the console.

use juka_core::emitter::emit_element;
use juka_core::id::ElementId;
use juka_core::layout::Canvas;
use juka_core::lint::{LintSeverity, lint_project};
use juka_core::model::{Color, Element, ElementKind, FontCategory, Trigger, TriggerKind};
use juka_editor::{
    EditorConfig, EditorSession, ElementEdit, Gesture, GestureKind, format_clock,
};
use serde_json::{Value, json};
use std::fmt::Display;
use wasm_bindgen::prelude::*;

/// The main WASM-facing editor controller.
///
/// Holds the session and the gesture in progress, if any. All interaction
/// from the page goes through this struct.
#[wasm_bindgen]
pub struct JukaEditor {
    session: EditorSession,
    gesture: Option<Gesture>,
}

impl Default for JukaEditor {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl JukaEditor {
    /// Create an editor on a blank document whose first scene has a menu.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        console_error_panic_hook_setup();
        let config = EditorConfig {
            startup_menu: true,
            ..Default::default()
        };
        Self {
            session: EditorSession::new(config),
            gesture: None,
        }
    }

    // ─── Scenes ──────────────────────────────────────────────────────────

    pub fn current_scene(&self) -> String {
        self.session.current_scene().to_string()
    }

    /// Scene names in table order, as a JSON array.
    pub fn scene_names_json(&self) -> String {
        json!(self.session.scene_names()).to_string()
    }

    pub fn switch_scene(&mut self, name: &str) -> bool {
        self.gesture = None;
        ok_or_report(self.session.switch_to(name))
    }

    /// Returns the new scene's name, or `""` on failure.
    pub fn add_scene(&mut self) -> String {
        self.gesture = None;
        match self.session.add_scene() {
            Ok(name) => name,
            Err(e) => {
                report(e);
                String::new()
            }
        }
    }

    pub fn rename_scene(&mut self, new_name: &str) -> bool {
        ok_or_report(self.session.rename_scene(new_name))
    }

    pub fn duplicate_scene(&mut self, new_name: &str) -> bool {
        self.gesture = None;
        ok_or_report(self.session.duplicate_scene(new_name))
    }

    /// Delete the active scene. The caller confirms with the user first.
    pub fn delete_scene(&mut self) -> bool {
        self.gesture = None;
        ok_or_report(self.session.delete_scene())
    }

    /// Menu bar contents: `{"buttons":[{"scene","active"}],"clock":"HH:MM"}`.
    pub fn menu_json(&self) -> String {
        let now = js_sys::Date::new_0();
        menu_value(&self.session, now.get_hours(), now.get_minutes()).to_string()
    }

    // ─── Elements ────────────────────────────────────────────────────────

    /// Create an element of `kind` (a palette type tag) and return its ID.
    pub fn create_element(&mut self, kind: &str, x: i32, y: i32) -> String {
        let id = self.session.add_element(ElementKind::from_tag(kind), x, y);
        id.to_string()
    }

    pub fn remove_element(&mut self, id: &str) -> bool {
        let Some(id) = known_id(id) else {
            return false;
        };
        if self.gesture.is_some_and(|g| g.element == id) {
            self.gesture = None;
        }
        ok_or_report(self.session.remove_element(id))
    }

    /// Live canvas elements as a JSON array of export-shaped objects, each
    /// with an extra `id`.
    pub fn elements_json(&self) -> String {
        let items: Vec<Value> = self.session.live_elements().iter().map(element_value).collect();
        Value::Array(items).to_string()
    }

    /// Set one property from the property panel. `key` uses export field
    /// names (`text`, `color`, `bgColor`, `font`, `opacity`, `image`,
    /// `videoVariable`).
    pub fn set_element_prop(&mut self, id: &str, key: &str, value: &str) -> bool {
        let Some(id) = known_id(id) else {
            return false;
        };
        let edit = match key {
            "text" => ElementEdit::SetText(value.to_string()),
            "color" => match Color::from_hex(value) {
                Some(c) => ElementEdit::SetColor(c),
                None => return false,
            },
            "bgColor" => ElementEdit::SetBackground(Color::from_hex(value)),
            "font" => match FontCategory::from_name(value) {
                Some(f) => ElementEdit::SetFont(f),
                None => return false,
            },
            "opacity" => match value.trim().parse::<f64>() {
                Ok(pct) => ElementEdit::SetOpacity(pct.round() as i32),
                Err(_) => return false,
            },
            "image" => ElementEdit::SetImageSource(non_empty(value)),
            "videoVariable" => ElementEdit::SetVideoVariable(non_empty(value)),
            _ => {
                report(format!("unknown element property {key:?}"));
                return false;
            }
        };
        ok_or_report(self.session.apply_edit(id, edit))
    }

    /// Configure a collapsed list's command and result variable.
    pub fn set_collapsed_list(&mut self, id: &str, command: &str, list_variable: &str) -> bool {
        let Some(id) = known_id(id) else {
            return false;
        };
        let edit = ElementEdit::SetCollapsedList {
            command: command.to_string(),
            list_variable: list_variable.to_string(),
        };
        ok_or_report(self.session.apply_edit(id, edit))
    }

    /// Replace an element's trigger. An empty `kind` removes it. `target`
    /// is the scene, variable or path; `value` is the new variable value or
    /// the external app's return variable.
    pub fn set_trigger(&mut self, id: &str, kind: &str, target: &str, value: &str) -> bool {
        let Some(id) = known_id(id) else {
            return false;
        };
        let trigger = if kind.is_empty() {
            None
        } else {
            match TriggerKind::from_name(kind) {
                Some(k) => Some(trigger_from_parts(k, target, value)),
                None => {
                    report(format!("unknown trigger kind {kind:?}"));
                    return false;
                }
            }
        };
        ok_or_report(self.session.apply_edit(id, ElementEdit::SetTrigger(trigger)))
    }

    // ─── Pointer gestures ────────────────────────────────────────────────

    /// Pointer went down on an element body (`resize == false`) or on its
    /// resize handle.
    pub fn pointer_down(&mut self, id: &str, x: i32, y: i32, resize: bool) -> bool {
        let Some(id) = known_id(id) else {
            return false;
        };
        let kind = if resize {
            GestureKind::Resize
        } else {
            GestureKind::Drag
        };
        match self.session.begin_gesture(id, kind, x, y) {
            Ok(g) => {
                self.gesture = Some(g);
                true
            }
            Err(e) => {
                report(e);
                false
            }
        }
    }

    /// Returns `true` if an element changed and needs re-rendering.
    pub fn pointer_move(&mut self, x: i32, y: i32) -> bool {
        match self.gesture {
            Some(g) => ok_or_report(self.session.update_gesture(&g, x, y)),
            None => false,
        }
    }

    pub fn pointer_up(&mut self) {
        self.gesture = None;
    }

    // ─── Variables ───────────────────────────────────────────────────────

    /// Variables as a JSON object in insertion order.
    pub fn variables_json(&self) -> String {
        let map: serde_json::Map<String, Value> = self
            .session
            .project()
            .variables
            .iter()
            .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
            .collect();
        Value::Object(map).to_string()
    }

    pub fn add_variable(&mut self, name: &str) -> bool {
        ok_or_report(self.session.add_variable(name))
    }

    pub fn edit_variable(&mut self, name: &str, value: &str) -> bool {
        ok_or_report(self.session.edit_variable(name, value))
    }

    pub fn rename_variable(&mut self, old: &str, new: &str) -> bool {
        ok_or_report(self.session.rename_variable(old, new))
    }

    /// Delete a variable. The caller confirms with the user first.
    pub fn delete_variable(&mut self, name: &str) -> bool {
        ok_or_report(self.session.delete_variable(name))
    }

    /// Hover text for an element, or `""` if its text references nothing.
    pub fn tooltip(&self, id: &str) -> String {
        ElementId::lookup(id)
            .and_then(|id| self.session.tooltip(id))
            .unwrap_or_default()
    }

    /// `{"<id>": "<tooltip>"}` for every live element that references a
    /// variable. Elements missing from the map drop their tooltip.
    pub fn tooltips_json(&self) -> String {
        let map: serde_json::Map<String, Value> = self
            .session
            .previews()
            .into_iter()
            .filter_map(|(id, preview)| preview.tooltip().map(|t| (id.to_string(), Value::String(t))))
            .collect();
        Value::Object(map).to_string()
    }

    // ─── Document ────────────────────────────────────────────────────────

    /// Apply the canvas size selector.
    pub fn set_canvas(&mut self, preset: &str, custom_width: &str, custom_height: &str) {
        self.gesture = None;
        self.session
            .set_canvas(Canvas::from_selector(preset, custom_width, custom_height));
    }

    pub fn canvas_json(&self) -> String {
        let c = self.session.canvas();
        json!({ "width": c.width, "height": c.height }).to_string()
    }

    /// Set the background to a data URI or filename; `""` clears it.
    pub fn set_background(&mut self, value: &str) {
        self.session.set_background(non_empty(value));
    }

    pub fn set_metadata(&mut self, title: &str, author: &str, description: &str) {
        self.session.set_metadata(title, author, description);
    }

    pub fn reset(&mut self) {
        self.gesture = None;
        self.session.reset();
    }

    pub fn export_file_name(&self) -> String {
        self.session.config().export_file_name.clone()
    }

    /// The export document, or `""` on failure.
    pub fn export_json(&mut self) -> String {
        match self.session.export_json() {
            Ok(json) => json,
            Err(e) => {
                report(e);
                String::new()
            }
        }
    }

    /// Replace the document. On `false` the editor is unchanged and the
    /// page should show the console message to the user.
    pub fn import_json(&mut self, json: &str) -> bool {
        self.gesture = None;
        ok_or_report(self.session.import_json(json))
    }

    /// Lint findings for the current document as a JSON array.
    pub fn lint_json(&mut self) -> String {
        self.session.snapshot();
        let diags: Vec<Value> = lint_project(self.session.project())
            .into_iter()
            .map(|d| {
                json!({
                    "scene": d.scene,
                    "element": d.element.map(|id| id.to_string()),
                    "message": d.message,
                    "severity": match d.severity {
                        LintSeverity::Warning => "warning",
                        LintSeverity::Info => "info",
                    },
                    "rule": d.rule,
                })
            })
            .collect();
        Value::Array(diags).to_string()
    }
}

// ─── Helpers ─────────────────────────────────────────────────────────────

fn element_value(element: &Element) -> Value {
    let mut value = serde_json::to_value(emit_element(element)).unwrap_or(Value::Null);
    if let Value::Object(map) = &mut value {
        map.insert("id".into(), Value::String(element.id.to_string()));
        if element.kind.is_menu() {
            map.insert("width".into(), json!(element.size.width.px()));
        }
    }
    value
}

fn menu_value(session: &EditorSession, hours: u32, minutes: u32) -> Value {
    json!({
        "buttons": session.menu_buttons().as_slice(),
        "clock": format_clock(hours, minutes),
    })
}

fn trigger_from_parts(kind: TriggerKind, target: &str, value: &str) -> Trigger {
    let (target, value) = (target.to_string(), value.to_string());
    match kind {
        TriggerKind::ChangeScene => Trigger::ChangeScene { scene: target },
        TriggerKind::SetVariable => Trigger::SetVariable {
            variable: target,
            value,
        },
        TriggerKind::ExternalApp => Trigger::ExternalApp {
            path: target,
            return_variable: value,
        },
        TriggerKind::PlayVideo => Trigger::PlayVideo { path: target },
        TriggerKind::PlayImage => Trigger::PlayImage { path: target },
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

fn ok_or_report<T, E: Display>(result: Result<T, E>) -> bool {
    match result {
        Ok(_) => true,
        Err(e) => {
            report(e);
            false
        }
    }
}

/// Resolve an id string from the page. Ids the session never handed out
/// are reported and not interned.
fn known_id(id: &str) -> Option<ElementId> {
    let found = ElementId::lookup(id);
    if found.is_none() {
        report(format!("unknown element {id:?}"));
    }
    found
}

fn report(err: impl Display) {
    let msg = format!("Juka: {err}");
    log::warn!("{msg}");
    #[cfg(target_arch = "wasm32")]
    web_sys::console::error_1(&msg.into());
}

// ─── Panic hook for WASM debugging ───────────────────────────────────────

fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("Juka WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}

// ─── Standalone validation (no editor needed) ────────────────────────────

/// Validate an export document. Returns JSON: `{"ok":true,"scenes":N}` or
/// `{"ok":false,"error":"..."}`.
#[wasm_bindgen]
pub fn validate(json_text: &str) -> String {
    match juka_core::parser::parse_document(json_text, Canvas::default()) {
        Ok(project) => json!({ "ok": true, "scenes": project.scenes.len() }).to_string(),
        Err(e) => json!({ "ok": false, "error": e.to_string() }).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn new_editor_starts_with_menu() {
        let editor = JukaEditor::new();
        let elements: Value = serde_json::from_str(&editor.elements_json()).unwrap();
        assert_eq!(elements[0]["type"], "menu");
        assert_eq!(elements[0]["width"], 1280);
    }

    #[test]
    fn drag_through_pointer_events() {
        let mut editor = JukaEditor::new();
        let id = editor.create_element("button", 100, 100);
        assert!(editor.pointer_down(&id, 110, 110, false));
        assert!(editor.pointer_move(2000, 130));
        editor.pointer_up();
        assert!(!editor.pointer_move(0, 0));

        let elements: Value = serde_json::from_str(&editor.elements_json()).unwrap();
        let button = &elements[1];
        assert_eq!(button["x"], 1160);
        assert_eq!(button["y"], 120);
    }

    #[test]
    fn unknown_ids_are_rejected() {
        let mut editor = JukaEditor::new();
        assert!(!editor.remove_element("no_such_element_7"));
        assert!(!editor.pointer_down("no_such_element_7", 0, 0, false));
        assert!(!editor.set_element_prop("no_such_element_7", "text", "x"));
        assert_eq!(editor.tooltip("no_such_element_7"), "");
        assert_eq!(ElementId::lookup("no_such_element_7"), None);
    }

    #[test]
    fn menu_stays_pinned_under_pointer_drag() {
        let mut editor = JukaEditor::new();
        let elements: Value = serde_json::from_str(&editor.elements_json()).unwrap();
        let menu_id = elements[0]["id"].as_str().unwrap().to_string();

        assert!(editor.pointer_down(&menu_id, 10, 680, true));
        editor.pointer_move(300, 100);
        editor.pointer_up();

        let elements: Value = serde_json::from_str(&editor.elements_json()).unwrap();
        assert_eq!(elements[0]["y"], 670);
        assert_eq!(elements[0]["height"], 50);
        assert_eq!(elements[0]["width"], 1280);
    }

    #[test]
    fn trigger_and_props() {
        let mut editor = JukaEditor::new();
        let id = editor.create_element("button", 0, 0);
        assert!(editor.set_trigger(&id, "set_variable", "score", "10"));
        assert!(!editor.set_trigger(&id, "explode", "", ""));
        assert!(editor.set_element_prop(&id, "opacity", "40"));
        assert!(!editor.set_element_prop(&id, "font", "huge"));

        let elements: Value = serde_json::from_str(&editor.elements_json()).unwrap();
        assert_eq!(elements[1]["variableChange"], "score");
        assert_eq!(elements[1]["opacity"], 0.4);
    }

    #[test]
    fn menu_marks_active_scene() {
        let mut editor = JukaEditor::new();
        editor.add_scene();
        let menu = menu_value(&editor.session, 7, 3);
        assert_eq!(menu["clock"], "07:03");
        assert_eq!(menu["buttons"][1]["active"], true);
        assert_eq!(menu["buttons"][0]["active"], false);
    }

    #[test]
    fn validate_reports_errors() {
        let ok: Value = serde_json::from_str(&validate(r#"{"scenes":[]}"#)).unwrap();
        assert_eq!(ok["ok"], true);
        let bad: Value = serde_json::from_str(&validate("{}")).unwrap();
        assert_eq!(bad["ok"], false);
    }
}
