//! Registry of known identifiers.
//!
//! The registry is owned by the caller and passed by reference into every
//! conversion. All lookups are case-insensitive; names are stored lowercased.
//! Entries are only ever added, so a classification made between two
//! conversions takes effect on the next one.

use std::collections::{HashMap, HashSet};

/// How an identifier was declared by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    /// A function provided by the host runtime; calls render with the `rt.` prefix.
    BuiltinFunction,
    /// A function defined by the user's own scripts; calls render bare.
    UserFunction,
    /// A variable the user wants to keep track of.
    UserVariable,
}

/// Identifier tables consulted by the Block engine.
#[derive(Debug, Clone, Default)]
pub struct IdentifierRegistry {
    builtins: HashSet<String>,
    user_functions: HashSet<String>,
    user_variables: HashSet<String>,
    renames: HashMap<String, String>,
}

impl IdentifierRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`classify`](Self::classify).
    pub fn with(mut self, name: &str, class: Classification) -> Self {
        self.classify(name, class);
        self
    }

    /// Record `name` under `class`. Returns `false` if it was already known.
    pub fn classify(&mut self, name: &str, class: Classification) -> bool {
        let key = name.trim().to_lowercase();
        if key.is_empty() {
            return false;
        }
        match class {
            Classification::BuiltinFunction => self.builtins.insert(key),
            Classification::UserFunction => self.user_functions.insert(key),
            Classification::UserVariable => self.user_variables.insert(key),
        }
    }

    /// Add every name in `names` under `class`.
    pub fn extend<I, S>(&mut self, names: I, class: Classification)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for name in names {
            self.classify(name.as_ref(), class);
        }
    }

    /// Register a variable rename: `name` (any case) is rewritten to `target`.
    pub fn add_rename(&mut self, name: &str, target: &str) {
        let key = name.trim().to_lowercase();
        if !key.is_empty() {
            self.renames.insert(key, target.trim().to_string());
        }
    }

    pub fn is_builtin(&self, name: &str) -> bool {
        self.builtins.contains(&name.to_lowercase())
    }

    pub fn is_user_function(&self, name: &str) -> bool {
        self.user_functions.contains(&name.to_lowercase())
    }

    pub fn is_user_variable(&self, name: &str) -> bool {
        self.user_variables.contains(&name.to_lowercase())
    }

    /// Membership in built-in ∪ user-defined functions.
    pub fn is_known_function(&self, name: &str) -> bool {
        let key = name.to_lowercase();
        self.builtins.contains(&key) || self.user_functions.contains(&key)
    }

    /// Target spelling for a declared variable, if any.
    pub fn rename(&self, name: &str) -> Option<&str> {
        self.renames.get(&name.to_lowercase()).map(String::as_str)
    }

    /// Names recorded under `class`, sorted.
    pub fn names(&self, class: Classification) -> Vec<&str> {
        let set = match class {
            Classification::BuiltinFunction => &self.builtins,
            Classification::UserFunction => &self.user_functions,
            Classification::UserVariable => &self.user_variables,
        };
        let mut names: Vec<&str> = set.iter().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Rename table entries, sorted by source name.
    pub fn renames(&self) -> Vec<(&str, &str)> {
        let mut pairs: Vec<(&str, &str)> = self
            .renames
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        pairs.sort_unstable();
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive() {
        let registry = IdentifierRegistry::new()
            .with("PolyOp", Classification::BuiltinFunction)
            .with("myHelper", Classification::UserFunction);

        assert!(registry.is_builtin("polyop"));
        assert!(registry.is_builtin("POLYOP"));
        assert!(!registry.is_builtin("myhelper"));
        assert!(registry.is_user_function("MYHELPER"));
        assert!(registry.is_known_function("polyOp"));
        assert!(registry.is_known_function("MyHelper"));
        assert!(!registry.is_known_function("unknown"));
    }

    #[test]
    fn test_classify_reports_new_entries() {
        let mut registry = IdentifierRegistry::new();
        assert!(registry.classify("foo", Classification::UserFunction));
        assert!(!registry.classify("FOO", Classification::UserFunction));
        assert!(!registry.classify("  ", Classification::UserFunction));
        assert!(registry.classify("foo", Classification::BuiltinFunction));
        assert_eq!(registry.names(Classification::UserFunction), vec!["foo"]);
    }

    #[test]
    fn test_user_variables_do_not_count_as_functions() {
        let registry = IdentifierRegistry::new().with("counter", Classification::UserVariable);
        assert!(registry.is_user_variable("Counter"));
        assert!(!registry.is_known_function("counter"));
    }

    #[test]
    fn test_rename_lookup() {
        let mut registry = IdentifierRegistry::new();
        registry.add_rename("myVar", "my_var");
        assert_eq!(registry.rename("MYVAR"), Some("my_var"));
        assert_eq!(registry.rename("other"), None);
        assert_eq!(registry.renames(), vec![("myvar", "my_var")]);
    }

    #[test]
    fn test_extend_and_sorted_names() {
        let mut registry = IdentifierRegistry::new();
        registry.extend(["print", "Format", "box"], Classification::BuiltinFunction);
        assert_eq!(
            registry.names(Classification::BuiltinFunction),
            vec!["box", "format", "print"]
        );
    }
}
