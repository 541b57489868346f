//! Source preprocessing ahead of conversion.

use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static INCLUDE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"include +"([^"]*)""#).expect("include pattern is valid"));

#[derive(Debug, thiserror::Error)]
#[error("failed to include {path}: {source}")]
pub struct IncludeError {
    pub path: PathBuf,
    pub source: std::io::Error,
}

/// Normalize line endings and, when `base_dir` is given, inline every
/// `include "file"` directive relative to it.
///
/// Included text has its tabs expanded to four spaces. Includes are expanded
/// one level deep.
pub fn preprocess(source: &str, base_dir: Option<&Path>) -> Result<String, IncludeError> {
    let source = source.replace("\r\n", "\n");
    let Some(base_dir) = base_dir else {
        return Ok(source);
    };

    let mut expanded = String::with_capacity(source.len());
    let mut last = 0;
    for caps in INCLUDE.captures_iter(&source) {
        let (Some(whole), Some(file)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let path = base_dir.join(file.as_str());
        let included = std::fs::read_to_string(&path)
            .map_err(|source| IncludeError {
                path: path.clone(),
                source,
            })?
            .replace("\r\n", "\n")
            .replace('\t', "    ");
        tracing::debug!(path = %path.display(), "expanded include");

        expanded.push_str(&source[last..whole.start()]);
        expanded.push_str(&included);
        last = whole.end();
    }
    expanded.push_str(&source[last..]);
    Ok(expanded)
}
