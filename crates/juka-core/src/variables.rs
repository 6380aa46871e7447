//! The document-wide variable store.
//!
//! Variables are global (never per-scene) and hold strings. Insertion order
//! is kept so the variable list and the export file read in the order the
//! author created them.

/// Keys of the export file's `variables` object that carry document
/// metadata instead of user variables.
pub const RESERVED_KEYS: &[&str] = &[
    "backgroundImage",
    "fontSizes",
    "buttonColor",
    "labelColor",
    "fonts",
];

/// Whether `name` collides with a metadata key in the export file.
pub fn is_reserved(name: &str) -> bool {
    RESERVED_KEYS.contains(&name)
}

/// Ordered name → value map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableStore {
    entries: Vec<(String, String)>,
}

impl VariableStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| n == name)
    }

    /// Create `name` with an empty value. Returns `false` without touching
    /// the store if the name is blank, reserved, or already present.
    pub fn add(&mut self, name: &str) -> bool {
        if name.is_empty() || is_reserved(name) || self.contains(name) {
            return false;
        }
        self.entries.push((name.to_string(), String::new()));
        true
    }

    /// Insert or overwrite, keeping the original position on overwrite.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, v)) => *v = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Overwrite an existing variable's value. Returns `false` if it does
    /// not exist.
    pub fn set(&mut self, name: &str, value: impl Into<String>) -> bool {
        match self.entries.iter_mut().find(|(n, _)| n == name) {
            Some((_, v)) => {
                *v = value.into();
                true
            }
            None => false,
        }
    }

    /// Rename in place, keeping value and position.
    pub fn rename(&mut self, old: &str, new: &str) -> bool {
        if new.is_empty() || is_reserved(new) || self.contains(new) {
            return false;
        }
        match self.entries.iter_mut().find(|(n, _)| n == old) {
            Some((n, _)) => {
                *n = new.to_string();
                true
            }
            None => false,
        }
    }

    /// Remove and return the old value.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        let pos = self.entries.iter().position(|(n, _)| n == name)?;
        Some(self.entries.remove(pos).1)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Iterate `(name, value)` in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Variable names in insertion order, for selectors.
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|(n, _)| n.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_rejects_empty_duplicate_and_reserved() {
        let mut vars = VariableStore::new();
        assert!(vars.add("score"));
        assert_eq!(vars.get("score"), Some(""));

        assert!(!vars.add("score"));
        assert!(!vars.add(""));
        assert!(!vars.add("fontSizes"));
        assert_eq!(vars.len(), 1);
    }

    #[test]
    fn set_only_touches_existing() {
        let mut vars = VariableStore::new();
        assert!(!vars.set("missing", "x"));
        vars.add("name");
        assert!(vars.set("name", "Ada"));
        assert_eq!(vars.get("name"), Some("Ada"));
    }

    #[test]
    fn rename_keeps_value_and_order() {
        let mut vars = VariableStore::new();
        vars.insert("a", "1");
        vars.insert("b", "2");
        assert!(vars.rename("a", "z"));
        assert_eq!(vars.names(), vec!["z", "b"]);
        assert_eq!(vars.get("z"), Some("1"));
        assert!(!vars.rename("z", "b"));
        assert!(!vars.rename("nope", "c"));
    }

    #[test]
    fn insert_overwrites_in_place() {
        let mut vars = VariableStore::new();
        vars.insert("a", "1");
        vars.insert("b", "2");
        vars.insert("a", "3");
        assert_eq!(vars.iter().collect::<Vec<_>>(), vec![("a", "3"), ("b", "2")]);
    }

    #[test]
    fn remove_returns_value() {
        let mut vars = VariableStore::new();
        vars.insert("a", "1");
        assert_eq!(vars.remove("a"), Some("1".to_string()));
        assert_eq!(vars.remove("a"), None);
        assert!(vars.is_empty());
    }
}
