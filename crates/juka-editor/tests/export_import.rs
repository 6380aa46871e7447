//! Integration tests: export → import through two editor sessions.

use juka_core::layout::Canvas;
use juka_core::model::*;
use juka_editor::{EditorSession, ElementEdit, SessionError};
use pretty_assertions::assert_eq;

// ─── Round-trip ──────────────────────────────────────────────────────────

#[test]
fn exported_text_keeps_variable_tokens() {
    let mut editor = EditorSession::default();
    let id = editor.add_element(ElementKind::Button, 10, 20);
    editor
        .apply_edit(id, ElementEdit::SetText("Go $dest".into()))
        .unwrap();
    editor.add_variable("dest").unwrap();
    editor.edit_variable("dest", "Home").unwrap();
    let json = editor.export_json().unwrap();

    let mut fresh = EditorSession::default();
    fresh.import_json(&json).unwrap();

    assert_eq!(fresh.scene_names(), vec!["Scene 1"]);
    let elements = fresh.live_elements();
    assert_eq!(elements.len(), 1);
    assert_eq!(elements[0].kind, ElementKind::Button);
    assert_eq!(elements[0].position, Position { x: 10, y: 20 });
    assert_eq!(elements[0].text, "Go $dest");
    assert_eq!(fresh.project().variables.get("dest"), Some("Home"));

    let preview = fresh.interpolate_element(elements[0].id).unwrap();
    assert_eq!(preview.evaluated, "Go Home");
}

#[test]
fn roundtrip_preserves_scene_and_element_order() {
    let mut editor = EditorSession::default();
    editor.add_element(ElementKind::Label, 0, 0);
    editor.add_element(ElementKind::Button, 0, 50);
    editor.add_scene().unwrap();
    editor.add_element(ElementKind::from_tag("video"), 100, 100);
    editor.duplicate_scene("Encore").unwrap();
    editor.add_variable("a").unwrap();
    editor.add_variable("b").unwrap();
    let json = editor.export_json().unwrap();

    let mut fresh = EditorSession::default();
    fresh.import_json(&json).unwrap();

    assert_eq!(fresh.scene_names(), editor.scene_names());
    for name in editor.scene_names() {
        let tags = |s: &EditorSession| -> Vec<String> {
            s.project()
                .scenes
                .elements(name)
                .iter()
                .map(|e| e.kind.tag().to_string())
                .collect()
        };
        assert_eq!(tags(&fresh), tags(&editor), "scene {name}");
    }
    assert_eq!(fresh.project().variables.names(), vec!["a", "b"]);
    assert_eq!(fresh.current_scene(), "Scene 1");
}

#[test]
fn export_includes_unsnapshotted_edits() {
    let mut editor = EditorSession::default();
    let id = editor.add_element(ElementKind::Label, 0, 0);
    editor
        .apply_edit(id, ElementEdit::SetText("latest".into()))
        .unwrap();
    let json = editor.export_json().unwrap();
    assert!(json.contains(r#""text": "latest""#));
}

// ─── Failed import ───────────────────────────────────────────────────────

#[test]
fn malformed_import_leaves_session_untouched() {
    let mut editor = EditorSession::default();
    editor.add_element(ElementKind::Button, 5, 5);
    editor.add_variable("keep").unwrap();
    let before = editor.export_json().unwrap();

    let err = editor.import_json("{ \"scenes\": [ oops").unwrap_err();
    assert!(matches!(err, SessionError::Document(_)));
    let err = editor.import_json(r#"{"title": "no scenes"}"#).unwrap_err();
    assert!(matches!(err, SessionError::Document(_)));

    assert_eq!(editor.export_json().unwrap(), before);
}

#[test]
fn import_replaces_rather_than_merges() {
    let mut editor = EditorSession::default();
    editor.add_variable("old").unwrap();
    editor.add_scene().unwrap();
    editor
        .import_json(r#"{"variables":{"new":"1"},"scenes":[{"name":"Only","elements":[]}]}"#)
        .unwrap();
    assert_eq!(editor.scene_names(), vec!["Only"]);
    assert_eq!(editor.project().variables.names(), vec!["new"]);
    assert!(editor.live_elements().is_empty());
}

// ─── Canvas resize ───────────────────────────────────────────────────────

#[test]
fn canvas_resize_keeps_every_element_inside() {
    let mut editor = EditorSession::default();
    let positions = [(0, 0), (1100, 600), (640, 360), (1279, 719), (300, 700)];
    for (x, y) in positions {
        editor.add_element(ElementKind::Button, x, y);
        editor.add_element(ElementKind::from_tag("image"), x, y);
    }
    editor.add_scene().unwrap();
    editor.add_element(ElementKind::from_tag("video"), 1200, 700);

    for (w, h) in [(800, 600), (1024, 768), (640, 480)] {
        let canvas = Canvas {
            width: w,
            height: h,
        };
        editor.set_canvas(canvas);
        editor.snapshot();
        for scene in editor.project().scenes.iter() {
            for el in &scene.elements {
                let ew = el.size.width.px().unwrap();
                let eh = el.size.height.px().unwrap();
                if el.kind.is_menu() {
                    assert_eq!(el.position, Position { x: 0, y: h - 50 });
                    assert_eq!(ew, w);
                    continue;
                }
                assert!(
                    (0..=w - ew).contains(&el.position.x),
                    "x out of bounds on {w}x{h}: {el:?}"
                );
                assert!(
                    (0..=h - eh).contains(&el.position.y),
                    "y out of bounds on {w}x{h}: {el:?}"
                );
            }
        }
    }
}

#[test]
fn canvas_from_selector_feeds_session() {
    let mut editor = EditorSession::default();
    editor.set_canvas(Canvas::from_selector("custom", "900", "not a number"));
    assert_eq!(
        editor.canvas(),
        Canvas {
            width: 900,
            height: 720
        }
    );
}
