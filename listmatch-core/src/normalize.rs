//! Normalization of the input list
//!
//! Filtering drops empty items and applies trimming and whitespace
//! collapsing. Normalization then rewrites every item in terms of
//! placeholder characters, folds case, injects boundary placeholders and
//! returns the sorted, deduplicated list the tree builder works on.

use std::collections::BTreeSet;

use log::trace;

use crate::config::MatcherConfig;
use crate::error::Result;
use crate::special::{Run, SpecialRegistry};

/// A normalized list together with what normalization discovered
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Normalized {
    /// Sorted, unique items in placeholder form
    pub words: Vec<String>,
    /// Whether any item received a left boundary placeholder
    pub left_used: bool,
    /// Whether any item received a right boundary placeholder
    pub right_used: bool,
}

/// Drop empty items, then trim and collapse whitespace as configured
pub fn filter<I, S>(list: I, config: &MatcherConfig) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    list.into_iter()
        .filter_map(|item| {
            let item = item.as_ref();
            let item = if config.trim { item.trim() } else { item };
            if item.is_empty() {
                return None;
            }
            if config.normalize_whitespace {
                Some(item.split_whitespace().collect::<Vec<_>>().join(" "))
            } else {
                Some(item.to_string())
            }
        })
        .collect()
}

/// Rewrite a filtered list into placeholder form
pub fn normalize(
    list: &[String],
    registry: &SpecialRegistry,
    config: &MatcherConfig,
) -> Result<Normalized> {
    let mut words = BTreeSet::new();
    let mut left_used = false;
    let mut right_used = false;

    for item in list {
        let runs = registry.tokenize(item)?;
        let last = runs.len().saturating_sub(1);
        let mut word = String::with_capacity(item.len());
        for (i, run) in runs.iter().enumerate() {
            let (text, first_char, last_char, can_left, can_right) = match run {
                Run::Special(entry) => (
                    entry.placeholder.to_string(),
                    None,
                    None,
                    entry.left,
                    entry.right,
                ),
                Run::Literal(text) => {
                    let text = if config.case_insensitive {
                        text.to_lowercase()
                    } else {
                        text.to_string()
                    };
                    let first = text.chars().next();
                    let end = text.chars().next_back();
                    (text, first, end, true, true)
                }
            };
            let boundary = config.boundary.as_ref();
            let qualifies = |c: Option<char>, flag: bool| match c {
                Some(c) => boundary.is_some_and(|b| b.test.matches(c)),
                None => flag,
            };
            if i == 0 && qualifies(first_char, can_left) {
                if let Some(left) = registry.left_boundary() {
                    word.push(left.placeholder);
                    left_used = true;
                }
            }
            word.push_str(&text);
            if i == last && qualifies(last_char, can_right) {
                if let Some(right) = registry.right_boundary() {
                    word.push(right.placeholder);
                    right_used = true;
                }
            }
        }
        if !word.is_empty() {
            words.insert(word);
        }
    }

    let words: Vec<String> = words.into_iter().collect();
    trace!("normalized {} items into {:?}", list.len(), words);
    Ok(Normalized {
        words,
        left_used,
        right_used,
    })
}
