//! The editing session: one open document plus the live canvas.
//!
//! The session holds two views of the active scene:
//!
//! - **Live canvas**: the elements currently being edited. Gestures and
//!   property edits touch only this.
//! - **Scene table**: the stored copy of every scene. The active scene's
//!   entry is refreshed from the live canvas by `snapshot`, which runs
//!   before every scene switch, scene mutation and export.
//!
//! Elements are plain values, so a snapshot is a `clone` and nothing edited
//! afterwards can reach back into the stored scene. Every fallible
//! operation validates first and mutates second; an `Err` means the
//! session is unchanged.

use crate::config::EditorConfig;
use crate::error::SessionError;
use crate::gesture::{Gesture, GestureKind};
use crate::menu::{MenuRow, derive_menu_buttons};
use juka_core::emitter::emit_json;
use juka_core::id::ElementId;
use juka_core::interpolate::{Interpolation, interpolate};
use juka_core::layout::{Canvas, clamp_position, clamp_size, resolved_size};
use juka_core::model::*;
use juka_core::parser::parse_document;
use juka_core::project::Project;
use juka_core::scene::DEFAULT_SCENE;
use juka_core::variables::is_reserved;

type Result<T> = std::result::Result<T, SessionError>;

/// A property change to one element on the live canvas.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementEdit {
    /// Move to `(x, y)`; clamped inside the canvas.
    Move { x: i32, y: i32 },
    /// Resize; each side is floored at the configured minimum.
    Resize { width: i32, height: i32 },
    SetText(String),
    SetColor(Color),
    /// Ignored for labels, which never carry a background.
    SetBackground(Option<Color>),
    SetFont(FontCategory),
    /// Percentage; clamped to 0–100.
    SetOpacity(i32),
    /// Replaces the previous trigger entirely.
    SetTrigger(Option<Trigger>),
    SetImageSource(Option<String>),
    SetVideoVariable(Option<String>),
    SetCollapsedList {
        command: String,
        list_variable: String,
    },
}

pub struct EditorSession {
    project: Project,
    current: String,
    live: Vec<Element>,
    canvas: Canvas,
    config: EditorConfig,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl EditorSession {
    /// A fresh session: one empty `Scene 1`, no variables.
    pub fn new(config: EditorConfig) -> Self {
        let mut project = Project::new();
        project.meta.font_sizes = config.font_sizes;
        let mut session = Self {
            project,
            current: DEFAULT_SCENE.to_string(),
            live: Vec::new(),
            canvas: config.canvas,
            config,
        };
        if session.config.startup_menu {
            session.add_element(ElementKind::Menu, 0, 0);
        }
        session
    }

    /// Open an already-parsed project on its first scene.
    pub fn from_project(mut project: Project, config: EditorConfig) -> Self {
        project
            .scenes
            .fit_to_canvas(config.canvas, &project.meta.font_sizes);
        let current = project.scenes.first().name.clone();
        let live = project.scenes.elements(&current).to_vec();
        Self {
            canvas: config.canvas,
            project,
            current,
            live,
            config,
        }
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    /// The stored project. The active scene's entry may lag behind the live
    /// canvas until the next `snapshot`.
    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    pub fn current_scene(&self) -> &str {
        &self.current
    }

    pub fn scene_names(&self) -> Vec<&str> {
        self.project.scenes.names()
    }

    /// Elements on the live canvas, in definition order.
    pub fn live_elements(&self) -> &[Element] {
        &self.live
    }

    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.live.iter().find(|e| e.id == id)
    }

    fn element_mut(&mut self, id: ElementId) -> Result<&mut Element> {
        self.live
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| SessionError::UnknownElement(id.to_string()))
    }

    /// The button row every menu on the live canvas shows.
    pub fn menu_buttons(&self) -> MenuRow {
        derive_menu_buttons(self.project.scenes.names(), &self.current)
    }

    // ─── Scene state machine ─────────────────────────────────────────────

    /// Copy the live canvas into the active scene's stored entry.
    pub fn snapshot(&mut self) {
        self.project.scenes.store(&self.current, self.live.clone());
    }

    /// Make `name` the active scene. Switching to the active scene
    /// re-stores and reloads it, which changes nothing.
    pub fn switch_to(&mut self, name: &str) -> Result<()> {
        if !self.project.scenes.contains(name) {
            return Err(SessionError::UnknownScene(name.to_string()));
        }
        self.snapshot();
        self.load_scene(name);
        log::debug!("switched to scene {name:?}");
        Ok(())
    }

    fn load_scene(&mut self, name: &str) {
        self.current = name.to_string();
        self.live = self.project.scenes.elements(name).to_vec();
    }

    /// Add `Scene N` (N = scene count + 1), switch to it and give it a
    /// bottom menu. Returns the new name.
    pub fn add_scene(&mut self) -> Result<String> {
        let name = self.project.scenes.next_default_name();
        if self.project.scenes.contains(&name) {
            return Err(SessionError::DuplicateScene(name));
        }
        self.snapshot();
        self.project.scenes.insert(&name, Vec::new());
        self.load_scene(&name);
        self.add_element(ElementKind::Menu, 0, 0);
        log::debug!("added scene {name:?}");
        Ok(name)
    }

    /// Rename the active scene, keeping its position and elements.
    pub fn rename_scene(&mut self, new_name: &str) -> Result<()> {
        self.check_new_scene_name(new_name)?;
        self.snapshot();
        let old = std::mem::replace(&mut self.current, new_name.to_string());
        self.project.scenes.rename(&old, new_name);
        log::debug!("renamed scene {old:?} to {new_name:?}");
        Ok(())
    }

    /// Copy the active scene under `new_name` and switch to the copy.
    pub fn duplicate_scene(&mut self, new_name: &str) -> Result<()> {
        self.check_new_scene_name(new_name)?;
        self.snapshot();
        let copies = self.live.iter().map(Element::duplicate).collect();
        self.project.scenes.insert(new_name, copies);
        log::debug!("duplicated scene {:?} as {new_name:?}", self.current);
        self.load_scene(new_name);
        Ok(())
    }

    /// Delete the active scene and switch to its predecessor (or the next
    /// scene if it was first). Returns the scene now active.
    pub fn delete_scene(&mut self) -> Result<String> {
        if self.project.scenes.len() <= 1 {
            return Err(SessionError::LastScene);
        }
        let (index, removed) = self
            .project
            .scenes
            .remove(&self.current)
            .ok_or_else(|| SessionError::UnknownScene(self.current.clone()))?;
        let fallback = self.project.scenes.fallback_after_removal(index).name.clone();
        self.load_scene(&fallback);
        log::debug!("deleted scene {:?}, now on {fallback:?}", removed.name);
        Ok(fallback)
    }

    fn check_new_scene_name(&self, name: &str) -> Result<()> {
        if name.is_empty() {
            return Err(SessionError::EmptyName);
        }
        if self.project.scenes.contains(name) {
            return Err(SessionError::DuplicateScene(name.to_string()));
        }
        Ok(())
    }

    // ─── Elements ────────────────────────────────────────────────────────

    /// Create an element with factory defaults and append it to the active
    /// scene. Position is clamped into the canvas.
    pub fn add_element(&mut self, kind: ElementKind, x: i32, y: i32) -> ElementId {
        let mut element = Element::create(kind, x, y, self.canvas);
        juka_core::layout::fit_to_canvas(&mut element, self.canvas, &self.project.meta.font_sizes);
        let id = element.id;
        log::debug!("added {} to {:?}", id, self.current);
        if let Some(scene) = self.project.scenes.get_mut(&self.current) {
            scene.elements.push(element.clone());
        }
        self.live.push(element);
        id
    }

    /// Remove an element from the active scene.
    pub fn remove_element(&mut self, id: ElementId) -> Result<Element> {
        let pos = self
            .live
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| SessionError::UnknownElement(id.to_string()))?;
        if let Some(scene) = self.project.scenes.get_mut(&self.current) {
            scene.elements.retain(|e| e.id != id);
        }
        log::debug!("removed {id} from {:?}", self.current);
        Ok(self.live.remove(pos))
    }

    /// Apply a property change to a live element, then re-check the
    /// element's type invariants.
    pub fn apply_edit(&mut self, id: ElementId, edit: ElementEdit) -> Result<()> {
        let canvas = self.canvas;
        let fonts = self.project.meta.font_sizes;
        let floor = self.config.min_element_size;
        let element = self.element_mut(id)?;

        match edit {
            ElementEdit::Move { .. } | ElementEdit::Resize { .. } if element.kind.is_menu() => {
                log::debug!("menu {id} keeps its bottom anchor");
            }
            ElementEdit::Move { x, y } => {
                let (w, h) = resolved_size(element, &fonts);
                let (x, y) = clamp_position(x, y, w, h, canvas);
                element.position = Position { x, y };
            }
            ElementEdit::Resize { width, height } => {
                let (w, h) = clamp_size(width, height, floor);
                element.size = Size::px(w, h);
            }
            ElementEdit::SetText(text) => element.text = text,
            ElementEdit::SetColor(color) => element.style.color = Some(color),
            ElementEdit::SetBackground(color) => element.style.bg_color = color,
            ElementEdit::SetFont(font) => element.style.font = Some(font),
            ElementEdit::SetOpacity(pct) => element.style.opacity = pct.clamp(0, 100) as u8,
            ElementEdit::SetTrigger(trigger) => element.trigger = trigger,
            ElementEdit::SetImageSource(src) => match &mut element.kind {
                ElementKind::Image { source } => *source = src,
                other => log::warn!("ignoring image source on {}", other.tag()),
            },
            ElementEdit::SetVideoVariable(var) => match &mut element.kind {
                ElementKind::Video { variable } => *variable = var,
                other => log::warn!("ignoring video variable on {}", other.tag()),
            },
            ElementEdit::SetCollapsedList {
                command: cmd,
                list_variable: var,
            } => match &mut element.kind {
                ElementKind::CollapsedList {
                    command,
                    list_variable,
                } => {
                    *command = cmd;
                    *list_variable = var;
                }
                other => log::warn!("ignoring list settings on {}", other.tag()),
            },
        }

        element.enforce_invariants();
        Ok(())
    }

    /// Start a drag or resize on a live element.
    pub fn begin_gesture(&self, id: ElementId, kind: GestureKind, x: i32, y: i32) -> Result<Gesture> {
        let element = self
            .element(id)
            .ok_or_else(|| SessionError::UnknownElement(id.to_string()))?;
        Ok(Gesture::begin(kind, element, x, y, &self.project.meta.font_sizes))
    }

    /// Feed a pointer position to an active gesture.
    pub fn update_gesture(&mut self, gesture: &Gesture, x: i32, y: i32) -> Result<()> {
        self.apply_edit(gesture.element, gesture.update(x, y))
    }

    // ─── Variables ───────────────────────────────────────────────────────

    /// Add a variable with an empty value.
    pub fn add_variable(&mut self, name: &str) -> Result<()> {
        self.check_new_variable_name(name)?;
        self.project.variables.add(name);
        log::debug!("added variable {name:?}");
        Ok(())
    }

    /// Overwrite a variable's value. Call `previews` afterwards to refresh
    /// displayed text.
    pub fn edit_variable(&mut self, name: &str, value: &str) -> Result<()> {
        if !self.project.variables.set(name, value) {
            return Err(SessionError::UnknownVariable(name.to_string()));
        }
        Ok(())
    }

    /// Rename a variable in place. References in element text are left as
    /// they are.
    pub fn rename_variable(&mut self, old: &str, new: &str) -> Result<()> {
        if !self.project.variables.contains(old) {
            return Err(SessionError::UnknownVariable(old.to_string()));
        }
        self.check_new_variable_name(new)?;
        self.project.variables.rename(old, new);
        log::debug!("renamed variable {old:?} to {new:?}");
        Ok(())
    }

    /// Delete a variable, returning its last value.
    pub fn delete_variable(&mut self, name: &str) -> Result<String> {
        let value = self
            .project
            .variables
            .remove(name)
            .ok_or_else(|| SessionError::UnknownVariable(name.to_string()))?;
        log::debug!("deleted variable {name:?}");
        Ok(value)
    }

    fn check_new_variable_name(&self, name: &str) -> Result<()> {
        if name.is_empty() {
            return Err(SessionError::EmptyName);
        }
        if is_reserved(name) {
            return Err(SessionError::ReservedVariable(name.to_string()));
        }
        if self.project.variables.contains(name) {
            return Err(SessionError::DuplicateVariable(name.to_string()));
        }
        Ok(())
    }

    /// Interpolate one live element's text.
    pub fn interpolate_element(&self, id: ElementId) -> Option<Interpolation> {
        self.element(id)
            .map(|e| interpolate(&e.text, &self.project.variables))
    }

    /// Hover text for one live element, `None` if it references nothing.
    pub fn tooltip(&self, id: ElementId) -> Option<String> {
        self.interpolate_element(id)?.tooltip()
    }

    /// Interpolation results for every live element that references at
    /// least one variable.
    pub fn previews(&self) -> Vec<(ElementId, Interpolation)> {
        self.live
            .iter()
            .map(|e| (e.id, interpolate(&e.text, &self.project.variables)))
            .filter(|(_, i)| i.has_variables())
            .collect()
    }

    // ─── Document ────────────────────────────────────────────────────────

    pub fn set_metadata(&mut self, title: &str, author: &str, description: &str) {
        let meta = &mut self.project.meta;
        meta.title = title.to_string();
        meta.author = author.to_string();
        meta.description = description.to_string();
    }

    /// Set or clear the canvas background (data URI or filename).
    pub fn set_background(&mut self, background: Option<String>) {
        self.project.meta.background_image = background.filter(|b| !b.is_empty());
    }

    pub fn set_font_sizes(&mut self, sizes: FontSizes) {
        self.project.meta.font_sizes = sizes;
    }

    /// Resize the canvas. Every element, live and stored, is pulled back
    /// inside and menus re-anchor to the new bottom edge.
    pub fn set_canvas(&mut self, canvas: Canvas) {
        let fonts = self.project.meta.font_sizes;
        self.canvas = canvas;
        for element in &mut self.live {
            juka_core::layout::fit_to_canvas(element, canvas, &fonts);
        }
        self.project.scenes.fit_to_canvas(canvas, &fonts);
        log::debug!("canvas is now {}", canvas.preset_name());
    }

    /// Collapse to a blank document: one `Scene 1` with a bottom menu.
    pub fn reset(&mut self) {
        let mut project = Project::new();
        project.meta.font_sizes = self.config.font_sizes;
        self.project = project;
        self.current = DEFAULT_SCENE.to_string();
        self.live.clear();
        self.add_element(ElementKind::Menu, 0, 0);
        log::debug!("session reset");
    }

    /// Snapshot and serialize the whole document.
    pub fn export_json(&mut self) -> Result<String> {
        self.snapshot();
        let json = emit_json(&self.project)?;
        log::debug!(
            "exported {} scene(s), {} bytes",
            self.project.scenes.len(),
            json.len()
        );
        Ok(json)
    }

    /// Replace the whole document with `json` and open its first scene.
    /// On error the session is untouched.
    pub fn import_json(&mut self, json: &str) -> Result<()> {
        let project = parse_document(json, self.canvas)?;
        self.replace_project(project);
        Ok(())
    }

    /// Replace the whole document and open its first scene. Elements
    /// authored for another canvas are pulled inside this one.
    pub fn replace_project(&mut self, mut project: Project) {
        project
            .scenes
            .fit_to_canvas(self.canvas, &project.meta.font_sizes);
        let first = project.scenes.first().name.clone();
        self.project = project;
        self.load_scene(&first);
        log::debug!("loaded document, opened scene {first:?}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn session() -> EditorSession {
        EditorSession::default()
    }

    #[test]
    fn new_session_has_one_empty_scene() {
        let s = session();
        assert_eq!(s.scene_names(), vec!["Scene 1"]);
        assert_eq!(s.current_scene(), "Scene 1");
        assert!(s.live_elements().is_empty());
    }

    #[test]
    fn startup_menu_option() {
        let s = EditorSession::new(EditorConfig {
            startup_menu: true,
            ..Default::default()
        });
        assert_eq!(s.live_elements().len(), 1);
        assert!(s.live_elements()[0].kind.is_menu());
    }

    #[test]
    fn add_element_is_clamped() {
        let mut s = session();
        let id = s.add_element(ElementKind::Button, 5000, -30);
        let el = s.element(id).unwrap();
        assert_eq!(el.position, Position { x: 1160, y: 0 });
        assert_eq!(s.project().scenes.elements("Scene 1").len(), 1);
    }

    #[test]
    fn move_edit_clamps_and_resize_floors() {
        let mut s = session();
        let id = s.add_element(ElementKind::Label, 0, 0);
        s.apply_edit(id, ElementEdit::Move { x: 2000, y: 2000 }).unwrap();
        assert_eq!(s.element(id).unwrap().position, Position { x: 1160, y: 680 });

        s.apply_edit(
            id,
            ElementEdit::Resize {
                width: 10,
                height: 300,
            },
        )
        .unwrap();
        assert_eq!(s.element(id).unwrap().size, Size::px(50, 300));
    }

    #[test]
    fn menu_ignores_drag_and_resize() {
        let mut s = session();
        let id = s.add_element(ElementKind::Menu, 0, 0);
        s.apply_edit(id, ElementEdit::Move { x: 300, y: 100 }).unwrap();
        s.apply_edit(
            id,
            ElementEdit::Resize {
                width: 60,
                height: 60,
            },
        )
        .unwrap();

        let menu = s.element(id).unwrap();
        assert_eq!(menu.position, Position { x: 0, y: 670 });
        assert_eq!(menu.size, Size::px(1280, 50));

        let gesture = s.begin_gesture(id, GestureKind::Drag, 10, 680).unwrap();
        s.update_gesture(&gesture, 400, 100).unwrap();
        assert_eq!(s.element(id).unwrap().position, Position { x: 0, y: 670 });
    }

    #[test]
    fn import_fits_elements_to_session_canvas() {
        let mut s = session();
        s.import_json(
            r#"{"scenes":[{"name":"Big","elements":[
                {"type":"menu","x":0,"y":1030,"height":50},
                {"type":"button","x":1800,"y":900,"width":120,"height":40}
            ]}]}"#,
        )
        .unwrap();

        let live = s.live_elements();
        assert_eq!(live[0].position, Position { x: 0, y: 670 });
        assert_eq!(live[0].size, Size::px(1280, 50));
        assert_eq!(live[1].position, Position { x: 1160, y: 680 });
        assert_eq!(s.project().scenes.elements("Big")[1].position, live[1].position);
    }

    #[test]
    fn label_background_edit_is_cleared() {
        let mut s = session();
        let id = s.add_element(ElementKind::Label, 0, 0);
        s.apply_edit(id, ElementEdit::SetBackground(Some(Color::WHITE)))
            .unwrap();
        assert_eq!(s.element(id).unwrap().style.bg_color, None);
    }

    #[test]
    fn opacity_edit_is_clamped() {
        let mut s = session();
        let id = s.add_element(ElementKind::Button, 0, 0);
        s.apply_edit(id, ElementEdit::SetOpacity(140)).unwrap();
        assert_eq!(s.element(id).unwrap().style.opacity, 100);
        s.apply_edit(id, ElementEdit::SetOpacity(-5)).unwrap();
        assert_eq!(s.element(id).unwrap().style.opacity, 0);
    }

    #[test]
    fn trigger_switch_drops_previous_fields() {
        let mut s = session();
        let id = s.add_element(ElementKind::Button, 0, 0);
        s.apply_edit(
            id,
            ElementEdit::SetTrigger(Some(Trigger::SetVariable {
                variable: "score".into(),
                value: "1".into(),
            })),
        )
        .unwrap();
        s.apply_edit(
            id,
            ElementEdit::SetTrigger(Some(Trigger::blank(TriggerKind::ChangeScene))),
        )
        .unwrap();
        assert_eq!(
            s.element(id).unwrap().trigger,
            Some(Trigger::ChangeScene {
                scene: String::new()
            })
        );
    }

    #[test]
    fn edit_unknown_element_fails() {
        let mut s = session();
        let stray = ElementId::intern("nowhere");
        assert!(matches!(
            s.apply_edit(stray, ElementEdit::SetOpacity(1)),
            Err(SessionError::UnknownElement(_))
        ));
    }

    #[test]
    fn remove_element_updates_both_views() {
        let mut s = session();
        let id = s.add_element(ElementKind::Input, 0, 0);
        s.remove_element(id).unwrap();
        assert!(s.live_elements().is_empty());
        assert!(s.project().scenes.elements("Scene 1").is_empty());
    }

    #[test]
    fn variable_validation() {
        let mut s = session();
        s.add_variable("user").unwrap();
        assert!(matches!(s.add_variable(""), Err(SessionError::EmptyName)));
        assert!(matches!(
            s.add_variable("user"),
            Err(SessionError::DuplicateVariable(_))
        ));
        assert!(matches!(
            s.add_variable("fontSizes"),
            Err(SessionError::ReservedVariable(_))
        ));
        assert!(matches!(
            s.edit_variable("nobody", "x"),
            Err(SessionError::UnknownVariable(_))
        ));
        assert_eq!(s.project().variables.get("user"), Some(""));
    }

    #[test]
    fn previews_follow_variable_edits() {
        let mut s = session();
        let id = s.add_element(ElementKind::Label, 0, 0);
        s.apply_edit(id, ElementEdit::SetText("Hi $user".into()))
            .unwrap();
        s.add_variable("user").unwrap();
        s.edit_variable("user", "Ana").unwrap();
        assert_eq!(
            s.tooltip(id).as_deref(),
            Some("Evaluated: Hi Ana\n\nVariables:\nuser: Ana")
        );

        s.delete_variable("user").unwrap();
        let previews = s.previews();
        assert_eq!(previews.len(), 1);
        assert_eq!(previews[0].1.evaluated, "Hi \"\"");
        assert_eq!(s.element(id).unwrap().text, "Hi $user");
    }

    #[test]
    fn reset_collapses_to_default_scene_with_menu() {
        let mut s = session();
        s.add_scene().unwrap();
        s.add_variable("x").unwrap();
        s.set_background(Some("bg.png".into()));
        s.reset();
        assert_eq!(s.scene_names(), vec!["Scene 1"]);
        assert!(s.project().variables.is_empty());
        assert_eq!(s.project().meta.background_image, None);
        assert_eq!(s.live_elements().len(), 1);
        assert!(s.live_elements()[0].kind.is_menu());
    }

    #[test]
    fn menu_buttons_track_active_scene() {
        let mut s = session();
        s.add_scene().unwrap();
        let row = s.menu_buttons();
        assert_eq!(row.len(), 2);
        assert!(!row[0].active);
        assert!(row[1].active);
        assert_eq!(row[1].scene, "Scene 2");
    }
}
