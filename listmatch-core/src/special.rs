//! Registry of special placeholders
//!
//! Every special (and every boundary marker) is given a single placeholder
//! character from above the highest codepoint in use. Once the input strings
//! are rewritten in terms of placeholders, the tree builder can treat each
//! special as one character. The registry maps placeholders back to what
//! they emit.

use std::collections::HashMap;

use fancy_regex::Regex;

use crate::config::{MatcherConfig, SpecialKey, SpecialSpec};
use crate::error::{MatcherError, Result};

/// What a placeholder stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialRole {
    /// A caller-supplied pattern
    Pattern,
    /// A zero-width assertion before an item
    LeftBoundary,
    /// A zero-width assertion after an item
    RightBoundary,
    /// A right boundary after which the input ends
    End,
}

/// A special with its assigned placeholder
#[derive(Debug, Clone, PartialEq)]
pub struct SpecialEntry {
    /// The placeholder character standing in for the special
    pub placeholder: char,
    /// Human-readable name of the key
    pub key: String,
    /// The pattern emitted for the placeholder
    pub pattern: String,
    /// Whether the pattern can be quantified without grouping
    pub atomic: bool,
    /// Whether a left boundary may be placed before it
    pub left: bool,
    /// Whether a right boundary may be placed after it
    pub right: bool,
    pub role: SpecialRole,
}

/// A piece of an input string, as split by the registry
#[derive(Debug, Clone, PartialEq)]
pub enum Run<'a> {
    /// Literal text
    Literal(&'a str),
    /// Text matched by a special
    Special(&'a SpecialEntry),
}

/// Registry of specials for one list
#[derive(Debug, Clone)]
pub struct SpecialRegistry {
    /// User specials in placeholder order
    entries: Vec<SpecialEntry>,
    left: Option<SpecialEntry>,
    right: Option<SpecialEntry>,
    by_char: HashMap<char, usize>,
    /// Alternation of every special key, one named group per entry
    split: Option<Regex>,
}

impl SpecialRegistry {
    /// Build the registry for a list of (filtered) input strings
    pub fn new(config: &MatcherConfig, list: &[String]) -> Result<Self> {
        let mut max = list
            .iter()
            .flat_map(|w| w.chars())
            .flat_map(|c| std::iter::once(c).chain(c.to_lowercase()))
            .map(u32::from)
            .max()
            .unwrap_or(0);
        for spec in &config.specials {
            if let SpecialKey::Literal(s) = &spec.key {
                if let Some(c) = s.chars().map(u32::from).max() {
                    max = max.max(c);
                }
            }
        }

        let mut specs: Vec<&SpecialSpec> = config.specials.iter().collect();
        specs.sort_by(|a, b| placeholder_order(&a.key, &b.key));

        let mut next = || -> Result<char> {
            let c = next_placeholder(max)?;
            max = u32::from(c);
            Ok(c)
        };

        let mut entries = Vec::with_capacity(specs.len());
        for spec in &specs {
            entries.push(SpecialEntry {
                placeholder: next()?,
                key: spec.key.to_string(),
                pattern: spec.pattern.clone(),
                atomic: spec.atomic,
                left: spec.left,
                right: spec.right,
                role: SpecialRole::Pattern,
            });
        }

        let boundary_entry = |c: char, name: &str, pattern: &str, role| SpecialEntry {
            placeholder: c,
            key: name.to_string(),
            pattern: pattern.to_string(),
            atomic: true,
            left: false,
            right: false,
            role,
        };
        let mut left = None;
        let mut right = None;
        if let Some(boundary) = &config.boundary {
            if let Some(pattern) = &boundary.left {
                left = Some(boundary_entry(
                    next()?,
                    "left boundary",
                    pattern,
                    SpecialRole::LeftBoundary,
                ));
            }
            if let Some(pattern) = &boundary.right {
                let role = if pattern == "\\z" {
                    SpecialRole::End
                } else {
                    SpecialRole::RightBoundary
                };
                right = Some(boundary_entry(next()?, "right boundary", pattern, role));
            }
        }

        let split = if entries.is_empty() {
            None
        } else {
            let source = specs
                .iter()
                .enumerate()
                .map(|(i, spec)| format!("(?<{}>{})", group_name(i), spec.matcher))
                .collect::<Vec<_>>()
                .join("|");
            Some(Regex::new(&source)?)
        };

        let mut by_char = HashMap::new();
        for (i, entry) in entries.iter().enumerate() {
            by_char.insert(entry.placeholder, i);
        }

        Ok(SpecialRegistry {
            entries,
            left,
            right,
            by_char,
            split,
        })
    }

    /// Look up the special standing behind a placeholder
    pub fn lookup(&self, c: char) -> Option<&SpecialEntry> {
        if let Some(&i) = self.by_char.get(&c) {
            return Some(&self.entries[i]);
        }
        [&self.left, &self.right]
            .into_iter()
            .flatten()
            .find(|e| e.placeholder == c)
    }

    /// Whether a character is a placeholder
    pub fn is_special(&self, c: char) -> bool {
        self.lookup(c).is_some()
    }

    /// The registered user specials, in placeholder order
    pub fn entries(&self) -> &[SpecialEntry] {
        &self.entries
    }

    pub fn left_boundary(&self) -> Option<&SpecialEntry> {
        self.left.as_ref()
    }

    pub fn right_boundary(&self) -> Option<&SpecialEntry> {
        self.right.as_ref()
    }

    /// The alternation of all special keys; `None` when nothing is registered
    pub fn split_pattern(&self) -> Option<&Regex> {
        self.split.as_ref()
    }

    /// Split a string into literal runs and special runs
    pub fn tokenize<'a>(&'a self, s: &'a str) -> Result<Vec<Run<'a>>> {
        let Some(split) = &self.split else {
            return Ok(if s.is_empty() {
                Vec::new()
            } else {
                vec![Run::Literal(s)]
            });
        };
        let mut runs = Vec::new();
        let mut last = 0;
        for caps in split.captures_iter(s) {
            let caps = caps?;
            let Some(whole) = caps.get(0) else { continue };
            if whole.start() == whole.end() {
                continue;
            }
            let entry = (0..self.entries.len())
                .find(|&i| caps.name(&group_name(i)).is_some())
                .map(|i| &self.entries[i])
                .ok_or_else(|| {
                    MatcherError::Compile(format!("no special matched {:?}", whole.as_str()))
                })?;
            if whole.start() > last {
                runs.push(Run::Literal(&s[last..whole.start()]));
            }
            runs.push(Run::Special(entry));
            last = whole.end();
        }
        if last < s.len() {
            runs.push(Run::Literal(&s[last..]));
        }
        Ok(runs)
    }
}

fn group_name(i: usize) -> String {
    format!("lmspecial{}", i)
}

/// Literal keys come first, longest and lexically last leading; regex keys
/// follow, shortest first.
fn placeholder_order(a: &SpecialKey, b: &SpecialKey) -> std::cmp::Ordering {
    match (a, b) {
        (SpecialKey::Literal(x), SpecialKey::Literal(y)) => y.cmp(x),
        (SpecialKey::Literal(_), SpecialKey::Pattern(_)) => std::cmp::Ordering::Less,
        (SpecialKey::Pattern(_), SpecialKey::Literal(_)) => std::cmp::Ordering::Greater,
        (SpecialKey::Pattern(x), SpecialKey::Pattern(y)) => {
            x.len().cmp(&y.len()).then_with(|| x.cmp(y))
        }
    }
}

fn next_placeholder(after: u32) -> Result<char> {
    let mut n = after + 1;
    loop {
        if let Some(c) = char::from_u32(n) {
            return Ok(c);
        }
        if n > u32::from(char::MAX) {
            return Err(MatcherError::Compile(
                "no codepoints left for placeholders".to_string(),
            ));
        }
        n += 1;
    }
}
