//! On-disk registry: plain word lists in one directory.
//!
//! ```text
//! <dir>/maxscript_functions.txt   host built-ins, one per line
//! <dir>/custom_functions.txt      user functions
//! <dir>/custom_variables.txt      user variables
//! <dir>/variables.txt             renames, `name=target` per line
//! <dir>/dictionary.txt            word list for snake_case suggestions
//! ```

use mxs2py_surface_syntax::{Classification, IdentifierRegistry};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

pub const BUILTIN_FILE: &str = "maxscript_functions.txt";
pub const USER_FUNCTION_FILE: &str = "custom_functions.txt";
pub const USER_VARIABLE_FILE: &str = "custom_variables.txt";
pub const RENAME_FILE: &str = "variables.txt";
pub const DICTIONARY_FILE: &str = "dictionary.txt";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// A registry directory.
#[derive(Debug, Clone)]
pub struct RegistryStore {
    dir: PathBuf,
}

impl RegistryStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Word list file for a classification.
    pub fn file_for(class: Classification) -> &'static str {
        match class {
            Classification::BuiltinFunction => BUILTIN_FILE,
            Classification::UserFunction => USER_FUNCTION_FILE,
            Classification::UserVariable => USER_VARIABLE_FILE,
        }
    }

    /// Build an [`IdentifierRegistry`] from every file present. Missing files
    /// count as empty.
    pub fn load(&self) -> Result<IdentifierRegistry, StoreError> {
        let mut registry = IdentifierRegistry::new();
        for class in [
            Classification::BuiltinFunction,
            Classification::UserFunction,
            Classification::UserVariable,
        ] {
            registry.extend(self.read_words(Self::file_for(class))?, class);
        }
        for (name, target) in self.read_renames()? {
            registry.add_rename(&name, &target);
        }
        tracing::debug!(dir = %self.dir.display(), "loaded registry");
        Ok(registry)
    }

    /// Persist `name` under `class`. Returns `false` if it was already there.
    pub fn add(&self, name: &str, class: Classification) -> Result<bool, StoreError> {
        let file = Self::file_for(class);
        let mut words = self.read_words(file)?;
        if !words.insert(name.trim().to_string()) {
            return Ok(false);
        }
        self.write_lines(file, words.iter().map(String::as_str))?;
        Ok(true)
    }

    /// Persist a rename; the source name is stored lowercased.
    pub fn add_rename(&self, name: &str, target: &str) -> Result<(), StoreError> {
        let mut renames = self.read_renames()?;
        renames.insert(name.trim().to_lowercase(), target.trim().to_string());
        let lines: Vec<String> = renames.iter().map(|(k, v)| format!("{k}={v}")).collect();
        self.write_lines(RENAME_FILE, lines.iter().map(String::as_str))
    }

    /// Replace the whole contents of the built-in list.
    pub fn write_builtins(&self, names: &[String]) -> Result<(), StoreError> {
        self.write_lines(BUILTIN_FILE, names.iter().map(String::as_str))
    }

    /// Lines of a word list, trimmed, blanks dropped.
    pub fn read_words(&self, file: &str) -> Result<BTreeSet<String>, StoreError> {
        Ok(self
            .read_lines(file)?
            .into_iter()
            .filter(|line| !line.is_empty())
            .collect())
    }

    pub fn read_renames(&self) -> Result<BTreeMap<String, String>, StoreError> {
        let mut renames = BTreeMap::new();
        for line in self.read_lines(RENAME_FILE)? {
            if line.is_empty() {
                continue;
            }
            match line.split_once('=') {
                Some((name, target)) => {
                    renames.insert(name.trim().to_lowercase(), target.trim().to_string());
                }
                None => tracing::warn!(line = %line, "skipping rename without `=`"),
            }
        }
        Ok(renames)
    }

    fn read_lines(&self, file: &str) -> Result<Vec<String>, StoreError> {
        let path = self.dir.join(file);
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(content.lines().map(|l| l.trim().to_string()).collect()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(source) => Err(StoreError::Read { path, source }),
        }
    }

    fn write_lines<'a>(
        &self,
        file: &str,
        lines: impl Iterator<Item = &'a str>,
    ) -> Result<(), StoreError> {
        let path = self.dir.join(file);
        std::fs::create_dir_all(&self.dir).map_err(|source| StoreError::Write {
            path: self.dir.clone(),
            source,
        })?;
        let mut content = String::new();
        for line in lines {
            content.push_str(line);
            content.push('\n');
        }
        std::fs::write(&path, content).map_err(|source| StoreError::Write { path, source })
    }
}
