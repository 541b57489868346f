//! Built-in function names from Python type stubs.

use regex::Regex;
use std::collections::{BTreeSet, HashSet};
use std::sync::LazyLock;

static DEF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"def\s+(\w+)\s*\(").expect("def pattern is valid"));

/// Public function names defined in a `.pyi` stub, in file order.
pub fn extract_function_names(stub: &str) -> Vec<String> {
    DEF.captures_iter(stub)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .filter(|name| !name.starts_with('_'))
        .map(String::from)
        .collect()
}

/// Merge `extracted` into `existing`: an existing entry that matches an
/// extracted one case-insensitively is replaced by it. Sorted, unique.
pub fn merge_names<I>(existing: I, extracted: &[String]) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let lowered: HashSet<String> = extracted.iter().map(|n| n.to_lowercase()).collect();
    let mut names: BTreeSet<String> = existing
        .into_iter()
        .filter(|n| !lowered.contains(&n.to_lowercase()))
        .collect();
    names.extend(extracted.iter().cloned());
    names.into_iter().collect()
}
