//! `$name` interpolation for element text previews.
//!
//! Element text is stored verbatim. Interpolation only produces a derived
//! preview (the hover tooltip); it never rewrites the stored text.
//!
//! A reference is `$` followed by an ASCII letter or `_`, then any run of
//! ASCII letters, digits or `_`. A `$` that does not start a reference is
//! literal text.

use crate::variables::VariableStore;
use smallvec::SmallVec;
use winnow::combinator::preceded;
use winnow::error::ContextError;
use winnow::prelude::*;
use winnow::token::{one_of, take_till, take_while};

/// Shown in place of a variable that is undefined or has an empty value.
pub const UNDEFINED_PLACEHOLDER: &str = "\"\"";

/// Result of interpolating one text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interpolation {
    /// Distinct referenced names with their resolved values, in order of
    /// first appearance.
    pub variables_used: Vec<(String, String)>,
    /// The text with each reference's first occurrence replaced.
    pub evaluated: String,
}

impl Interpolation {
    /// `false` means the caller should drop any interpolation affordance
    /// (tooltip, highlight) from the element.
    pub fn has_variables(&self) -> bool {
        !self.variables_used.is_empty()
    }

    /// Hover text: the evaluated string followed by one `name: value` line
    /// per variable. `None` when the text references nothing.
    pub fn tooltip(&self) -> Option<String> {
        if !self.has_variables() {
            return None;
        }
        let lines: Vec<String> = self
            .variables_used
            .iter()
            .map(|(name, value)| format!("{name}: {value}"))
            .collect();
        Some(format!(
            "Evaluated: {}\n\nVariables:\n{}",
            self.evaluated,
            lines.join("\n")
        ))
    }
}

/// Resolve one name, applying the placeholder policy.
pub fn resolve<'a>(name: &str, vars: &'a VariableStore) -> &'a str {
    match vars.get(name) {
        Some(value) if !value.is_empty() => value,
        _ => UNDEFINED_PLACEHOLDER,
    }
}

/// Interpolate `text` against the store.
pub fn interpolate(text: &str, vars: &VariableStore) -> Interpolation {
    let variables_used: Vec<(String, String)> = variable_refs(text)
        .into_iter()
        .map(|name| (name.to_string(), resolve(name, vars).to_string()))
        .collect();

    let mut evaluated = text.to_string();
    for (name, value) in &variables_used {
        evaluated = evaluated.replacen(&format!("${name}"), value, 1);
    }

    Interpolation {
        variables_used,
        evaluated,
    }
}

/// Distinct variable names referenced by `text`, in order of first
/// appearance, without the `$`.
pub fn variable_refs(text: &str) -> SmallVec<[&str; 4]> {
    let mut names: SmallVec<[&str; 4]> = SmallVec::new();
    let mut rest = text;

    loop {
        let _ = take_till::<_, _, ContextError>(0.., '$').parse_next(&mut rest);
        if rest.is_empty() {
            break;
        }
        let checkpoint = rest;
        match parse_variable_ref.parse_next(&mut rest) {
            Ok(name) => {
                if !names.contains(&name) {
                    names.push(name);
                }
            }
            // Lone `$`: skip it and keep scanning.
            Err(_) => rest = &checkpoint[1..],
        }
    }

    names
}

fn parse_variable_ref<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    preceded(
        '$',
        (
            one_of(|c: char| c.is_ascii_alphabetic() || c == '_'),
            take_while(0.., |c: char| c.is_ascii_alphanumeric() || c == '_'),
        )
            .take(),
    )
    .parse_next(input)
}
