//! Lint diagnostics for projects.
//!
//! Reports references that will not resolve at play time without modifying
//! the project. Renaming a scene or variable never rewrites the references
//! that point at it, so these rules are how dangling ones are surfaced.

use crate::id::ElementId;
use crate::interpolate::variable_refs;
use crate::model::Trigger;
use crate::project::Project;

// ─── Diagnostic types ────────────────────────────────────────────────────

/// Severity of a lint finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LintSeverity {
    /// The player will misbehave.
    Warning,
    /// Probably intended, worth a look.
    Info,
}

/// A single lint diagnostic.
#[derive(Debug, Clone)]
pub struct LintDiagnostic {
    /// Scene the finding belongs to.
    pub scene: String,
    /// The element this diagnostic refers to, if any.
    pub element: Option<ElementId>,
    /// Human-readable message.
    pub message: String,
    pub severity: LintSeverity,
    /// Short rule identifier (e.g. "unknown-scene-target").
    pub rule: &'static str,
}

// ─── Public API ───────────────────────────────────────────────────────────

/// Run all lint rules over the stored scenes and return diagnostics.
#[must_use]
pub fn lint_project(project: &Project) -> Vec<LintDiagnostic> {
    let mut diags = Vec::new();
    lint_trigger_targets(project, &mut diags);
    lint_text_references(project, &mut diags);
    lint_empty_scenes(project, &mut diags);
    diags
}

// ─── Rules ────────────────────────────────────────────────────────────────

/// Warn on `change_scene` triggers naming a missing scene, and on
/// `set_variable` / `external_app` triggers writing a missing variable.
fn lint_trigger_targets(project: &Project, diags: &mut Vec<LintDiagnostic>) {
    for scene in project.scenes.iter() {
        for element in &scene.elements {
            match &element.trigger {
                Some(Trigger::ChangeScene { scene: target })
                    if !project.scenes.contains(target) =>
                {
                    diags.push(LintDiagnostic {
                        scene: scene.name.clone(),
                        element: Some(element.id),
                        message: format!("`{}` changes to unknown scene {target:?}.", element.id),
                        severity: LintSeverity::Warning,
                        rule: "unknown-scene-target",
                    });
                }
                Some(Trigger::SetVariable { variable, .. })
                    if !project.variables.contains(variable) =>
                {
                    diags.push(LintDiagnostic {
                        scene: scene.name.clone(),
                        element: Some(element.id),
                        message: format!("`{}` sets unknown variable {variable:?}.", element.id),
                        severity: LintSeverity::Warning,
                        rule: "unknown-variable-target",
                    });
                }
                Some(Trigger::ExternalApp {
                    return_variable, ..
                }) if !return_variable.is_empty()
                    && !project.variables.contains(return_variable) =>
                {
                    diags.push(LintDiagnostic {
                        scene: scene.name.clone(),
                        element: Some(element.id),
                        message: format!(
                            "`{}` stores the app result in unknown variable {return_variable:?}.",
                            element.id
                        ),
                        severity: LintSeverity::Warning,
                        rule: "unknown-variable-target",
                    });
                }
                _ => {}
            }
        }
    }
}

/// Warning for `$name` references in element text with no matching variable.
fn lint_text_references(project: &Project, diags: &mut Vec<LintDiagnostic>) {
    for scene in project.scenes.iter() {
        for element in &scene.elements {
            let mut reported: Vec<&str> = Vec::new();
            for name in variable_refs(&element.text) {
                if project.variables.contains(name) || reported.contains(&name) {
                    continue;
                }
                reported.push(name);
                diags.push(LintDiagnostic {
                    scene: scene.name.clone(),
                    element: Some(element.id),
                    message: format!("`{}` references undefined variable `${name}`.", element.id),
                    severity: LintSeverity::Warning,
                    rule: "undefined-variable-ref",
                });
            }
        }
    }
}

/// Info when a scene has no elements at all.
fn lint_empty_scenes(project: &Project, diags: &mut Vec<LintDiagnostic>) {
    for scene in project.scenes.iter() {
        if scene.elements.is_empty() {
            diags.push(LintDiagnostic {
                scene: scene.name.clone(),
                element: None,
                message: format!("Scene {:?} is empty.", scene.name),
                severity: LintSeverity::Info,
                rule: "empty-scene",
            });
        }
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────
