//! The scene table: scene name → ordered element sequence.
//!
//! Insertion order is significant: the first scene is the one a freshly
//! loaded document opens on, and a deleted scene falls back to its
//! predecessor. Element order is definition order.

use crate::layout::Canvas;
use crate::model::{Element, FontSizes};

/// Name given to the scene of a new, empty document.
pub const DEFAULT_SCENE: &str = "Scene 1";

/// One named screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scene {
    pub name: String,
    pub elements: Vec<Element>,
}

impl Scene {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            elements: Vec::new(),
        }
    }
}

/// Ordered, uniquely named scenes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneTable {
    scenes: Vec<Scene>,
}

impl Default for SceneTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneTable {
    /// A table holding one empty default scene.
    pub fn new() -> Self {
        Self {
            scenes: vec![Scene::new(DEFAULT_SCENE)],
        }
    }

    /// Build from already-validated scenes. Returns `None` if empty or if
    /// two scenes share a name.
    pub fn from_scenes(scenes: Vec<Scene>) -> Option<Self> {
        if scenes.is_empty() {
            return None;
        }
        for (i, scene) in scenes.iter().enumerate() {
            if scenes[..i].iter().any(|s| s.name == scene.name) {
                return None;
            }
        }
        Some(Self { scenes })
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    /// Never true; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Scene> {
        self.scenes.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Scene> {
        self.scenes.iter_mut()
    }

    /// Scene names in table order.
    pub fn names(&self) -> Vec<&str> {
        self.scenes.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn first(&self) -> &Scene {
        // The table is never empty.
        &self.scenes[0]
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.scenes.iter().position(|s| s.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn get(&self, name: &str) -> Option<&Scene> {
        self.scenes.iter().find(|s| s.name == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Scene> {
        self.scenes.iter_mut().find(|s| s.name == name)
    }

    /// The stored elements of `name`, or an empty slice.
    pub fn elements(&self, name: &str) -> &[Element] {
        self.get(name).map(|s| s.elements.as_slice()).unwrap_or(&[])
    }

    /// Append a new scene. Returns `false` if the name is blank or taken.
    pub fn insert(&mut self, name: &str, elements: Vec<Element>) -> bool {
        if name.is_empty() || self.contains(name) {
            return false;
        }
        self.scenes.push(Scene {
            name: name.to_string(),
            elements,
        });
        true
    }

    /// Replace the stored elements of an existing scene.
    pub fn store(&mut self, name: &str, elements: Vec<Element>) -> bool {
        match self.get_mut(name) {
            Some(scene) => {
                scene.elements = elements;
                true
            }
            None => false,
        }
    }

    /// Change a scene's key in place, keeping its position and elements.
    pub fn rename(&mut self, old: &str, new: &str) -> bool {
        if new.is_empty() || self.contains(new) {
            return false;
        }
        match self.get_mut(old) {
            Some(scene) => {
                scene.name = new.to_string();
                true
            }
            None => false,
        }
    }

    /// Remove a scene, returning its former index. Refuses to remove the
    /// last remaining scene.
    pub fn remove(&mut self, name: &str) -> Option<(usize, Scene)> {
        if self.scenes.len() <= 1 {
            return None;
        }
        let pos = self.position(name)?;
        Some((pos, self.scenes.remove(pos)))
    }

    /// The scene to show after the scene at `removed_index` was deleted:
    /// its predecessor, or else the scene that moved into its slot.
    pub fn fallback_after_removal(&self, removed_index: usize) -> &Scene {
        let idx = if removed_index > 0 {
            removed_index - 1
        } else {
            0
        };
        &self.scenes[idx.min(self.scenes.len() - 1)]
    }

    /// `Scene N` with N = scene count + 1. May collide with a renamed scene;
    /// callers must check.
    pub fn next_default_name(&self) -> String {
        format!("Scene {}", self.scenes.len() + 1)
    }

    /// Re-fit every stored element into `canvas`.
    pub fn fit_to_canvas(&mut self, canvas: Canvas, fonts: &FontSizes) {
        for scene in &mut self.scenes {
            for element in &mut scene.elements {
                crate::layout::fit_to_canvas(element, canvas, fonts);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ElementKind;

    fn table(names: &[&str]) -> SceneTable {
        let scenes = names.iter().map(|n| Scene::new(*n)).collect();
        SceneTable::from_scenes(scenes).unwrap()
    }

    #[test]
    fn starts_with_default_scene() {
        let t = SceneTable::new();
        assert_eq!(t.names(), vec!["Scene 1"]);
        assert_eq!(t.next_default_name(), "Scene 2");
    }

    #[test]
    fn from_scenes_rejects_duplicates_and_empty() {
        assert!(SceneTable::from_scenes(vec![]).is_none());
        assert!(SceneTable::from_scenes(vec![Scene::new("A"), Scene::new("A")]).is_none());
    }

    #[test]
    fn insert_rejects_collision() {
        let mut t = table(&["A"]);
        assert!(!t.insert("A", vec![]));
        assert!(!t.insert("", vec![]));
        assert!(t.insert("B", vec![]));
        assert_eq!(t.names(), vec!["A", "B"]);
    }

    #[test]
    fn rename_keeps_position_and_elements() {
        let mut t = table(&["A", "B", "C"]);
        let el = Element::create(ElementKind::Button, 0, 0, Canvas::default());
        t.store("B", vec![el.clone()]);

        assert!(t.rename("B", "Bee"));
        assert_eq!(t.names(), vec!["A", "Bee", "C"]);
        assert_eq!(t.elements("Bee"), &[el]);

        assert!(!t.rename("A", "C"));
        assert_eq!(t.names(), vec!["A", "Bee", "C"]);
    }

    #[test]
    fn remove_refuses_last_scene() {
        let mut t = SceneTable::new();
        assert!(t.remove("Scene 1").is_none());
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn fallback_prefers_predecessor() {
        let mut t = table(&["A", "B", "C"]);
        let (idx, _) = t.remove("B").unwrap();
        assert_eq!(t.fallback_after_removal(idx).name, "A");

        let mut t = table(&["A", "B", "C"]);
        let (idx, _) = t.remove("A").unwrap();
        assert_eq!(t.fallback_after_removal(idx).name, "B");
    }
}
