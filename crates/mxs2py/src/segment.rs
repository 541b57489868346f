//! snake_case suggestions for renamed variables.

use std::collections::{BTreeSet, HashSet};

/// Suggest a snake_case spelling for `name`.
///
/// Each `_`-separated part is split into the fewest dictionary words that
/// spell it exactly (digit runs always count as a word). When any part
/// cannot be spelled from the dictionary, the name is split on case
/// boundaries instead.
pub fn suggest_snake_case(name: &str, dictionary: &BTreeSet<String>) -> String {
    let words: HashSet<String> = dictionary.iter().map(|w| w.to_lowercase()).collect();
    let lower = name.to_lowercase();

    let segmented: Option<Vec<String>> = lower
        .split('_')
        .filter(|part| !part.is_empty())
        .map(|part| segment(part, &words).map(|pieces| pieces.join("_")))
        .collect();

    match segmented {
        Some(parts) if !words.is_empty() && !parts.is_empty() => parts.join("_"),
        _ => split_case_boundaries(name),
    }
}

/// Fewest-pieces segmentation of `text` into dictionary words.
fn segment<'a>(text: &'a str, words: &HashSet<String>) -> Option<Vec<&'a str>> {
    let bounds: Vec<usize> = text
        .char_indices()
        .map(|(i, _)| i)
        .chain(Some(text.len()))
        .collect();
    let n = bounds.len();
    // best[j]: (pieces, previous boundary) for text[..bounds[j]]
    let mut best: Vec<Option<(usize, usize)>> = vec![None; n];
    best[0] = Some((0, 0));
    for j in 1..n {
        for i in 0..j {
            let Some((count, _)) = best[i] else {
                continue;
            };
            let piece = &text[bounds[i]..bounds[j]];
            let is_number = piece.chars().all(|c| c.is_ascii_digit());
            if !is_number && !words.contains(piece) {
                continue;
            }
            if best[j].is_none_or(|(current, _)| count + 1 < current) {
                best[j] = Some((count + 1, i));
            }
        }
    }

    best[n - 1]?;
    let mut pieces = Vec::new();
    let mut j = n - 1;
    while j > 0 {
        let (_, i) = best[j]?;
        pieces.push(&text[bounds[i]..bounds[j]]);
        j = i;
    }
    pieces.reverse();
    Some(pieces)
}

/// `myVarName` → `my_var_name`, `XMLParser` → `xml_parser`.
pub fn split_case_boundaries(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_is_lower)
            {
                out.push('_');
            }
        }
        if c == '_' && out.ends_with('_') {
            continue;
        }
        out.extend(c.to_lowercase());
    }
    out
}
