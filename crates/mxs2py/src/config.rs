//! Configuration system for mxs2py.
//!
//! Loads config from:
//! 1. Global: ~/.config/mxs2py/config.toml
//! 2. Per-project: .mxs2py/config.toml (overrides global)
//!
//! Example config.toml:
//! ```toml
//! [registry]
//! dir = "/home/me/mxs2py-words"
//!
//! [render]
//! indent = "    "
//!
//! [convert]
//! expand_includes = true
//! header = false
//! ```

use mxs2py_surface_syntax::RenderOptions;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Where the identifier word lists live.
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct RegistryConfig {
    /// Directory holding the registry files.
    pub dir: Option<PathBuf>,
}

/// Output formatting.
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    /// One indentation unit. Defaults to a tab.
    pub indent: Option<String>,
}

/// Conversion behaviour.
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct ConvertConfig {
    /// Inline `include "file"` directives before converting.
    pub expand_includes: Option<bool>,
    /// Prepend a `# Automatically converted` comment.
    pub header: Option<bool>,
}

/// Root configuration structure.
///
/// Every leaf is optional so that a project file only overrides the keys it
/// actually sets.
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Mxs2pyConfig {
    pub registry: RegistryConfig,
    pub render: RenderConfig,
    pub convert: ConvertConfig,
}

impl Mxs2pyConfig {
    /// Load configuration for a project.
    ///
    /// Loads global config from ~/.config/mxs2py/config.toml,
    /// then merges with per-project config from .mxs2py/config.toml.
    pub fn load(root: &Path) -> Self {
        let mut config = Self::default();

        if let Some(global_path) = Self::global_config_path() {
            if let Some(global) = Self::load_file(&global_path) {
                config = config.merge(global);
            }
        }

        let project_path = root.join(".mxs2py").join("config.toml");
        if let Some(project) = Self::load_file(&project_path) {
            config = config.merge(project);
        }

        config
    }

    /// Base directory for mxs2py's own files.
    pub fn config_home() -> Option<PathBuf> {
        let config_home = std::env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .ok()
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))?;
        Some(config_home.join("mxs2py"))
    }

    /// Get the global config path.
    fn global_config_path() -> Option<PathBuf> {
        Some(Self::config_home()?.join("config.toml"))
    }

    /// Load config from a file path.
    fn load_file(path: &Path) -> Option<Self> {
        let content = std::fs::read_to_string(path).ok()?;
        match toml::from_str(&content) {
            Ok(config) => Some(config),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring malformed config");
                None
            }
        }
    }

    /// Merge another config into this one; keys set in `other` win.
    fn merge(self, other: Self) -> Self {
        Self {
            registry: RegistryConfig {
                dir: other.registry.dir.or(self.registry.dir),
            },
            render: RenderConfig {
                indent: other.render.indent.or(self.render.indent),
            },
            convert: ConvertConfig {
                expand_includes: other.convert.expand_includes.or(self.convert.expand_includes),
                header: other.convert.header.or(self.convert.header),
            },
        }
    }

    /// Registry directory, defaulting to `<config home>/registry`.
    pub fn registry_dir(&self) -> Option<PathBuf> {
        self.registry
            .dir
            .clone()
            .or_else(|| Some(Self::config_home()?.join("registry")))
    }

    pub fn render_options(&self) -> RenderOptions {
        match &self.render.indent {
            Some(indent) => RenderOptions {
                indent: indent.clone(),
            },
            None => RenderOptions::default(),
        }
    }

    pub fn expand_includes(&self) -> bool {
        self.convert.expand_includes.unwrap_or(true)
    }

    pub fn header(&self) -> bool {
        self.convert.header.unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_project_config(dir: &TempDir, body: &str) {
        let config_dir = dir.path().join(".mxs2py");
        std::fs::create_dir_all(&config_dir).unwrap();
        let mut file = std::fs::File::create(config_dir.join("config.toml")).unwrap();
        writeln!(file, "{body}").unwrap();
    }

    #[test]
    fn test_default_config() {
        let config = Mxs2pyConfig::default();
        assert!(config.expand_includes());
        assert!(!config.header());
        assert_eq!(config.render_options().indent, "\t");
    }

    #[test]
    fn test_load_project_config() {
        let dir = TempDir::new().unwrap();
        write_project_config(
            &dir,
            r#"
[render]
indent = "    "

[convert]
header = true
"#,
        );

        let config = Mxs2pyConfig::load(dir.path());
        assert_eq!(config.render_options().indent, "    ");
        assert!(config.header());
        assert!(config.expand_includes()); // default
    }

    #[test]
    fn test_merge_keeps_unset_keys() {
        let global = Mxs2pyConfig {
            registry: RegistryConfig {
                dir: Some(PathBuf::from("/words")),
            },
            convert: ConvertConfig {
                expand_includes: Some(false),
                header: None,
            },
            ..Default::default()
        };
        let project: Mxs2pyConfig = toml::from_str("[convert]\nheader = true").unwrap();

        let merged = global.merge(project);
        assert_eq!(merged.registry_dir(), Some(PathBuf::from("/words")));
        assert!(!merged.expand_includes());
        assert!(merged.header());
    }

    #[test]
    fn test_malformed_config_is_ignored() {
        let dir = TempDir::new().unwrap();
        write_project_config(&dir, "[render\nindent = 3");
        assert_eq!(
            Mxs2pyConfig::load_file(&dir.path().join(".mxs2py").join("config.toml")),
            None
        );
    }
}
