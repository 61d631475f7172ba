//! Tree construction
//!
//! Builds a [`Node`] tree from a normalized list. At every step the builder
//! tries, in order: a single word, a list of single characters, the best
//! shared prefix, the best shared suffix, and finally grouping by first
//! character. Prefixes and suffixes are only factored out when the list is a
//! true cross product of prefixes and suffixes.

use std::collections::BTreeMap;

use log::debug;

use crate::ast::{CharClass, Node, Position, SpecialPattern};
use crate::config::MatcherConfig;
use crate::special::SpecialRegistry;

type Word = Vec<char>;

/// A list factored into a prefix set and a suffix set
#[derive(Debug, Clone, PartialEq)]
struct Split {
    prefixes: Vec<Word>,
    suffixes: Vec<Word>,
}

/// Which end of the words a split is anchored at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Anchor {
    Start,
    End,
}

/// Builds pattern trees over one registry
pub struct TreeBuilder<'a> {
    config: &'a MatcherConfig,
    registry: &'a SpecialRegistry,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(config: &'a MatcherConfig, registry: &'a SpecialRegistry) -> Self {
        TreeBuilder { config, registry }
    }

    /// Build, flatten and annotate the tree for a sorted, deduplicated list
    pub fn build(&self, words: &[String]) -> Node {
        let list: Vec<Word> = words.iter().map(|w| w.chars().collect()).collect();
        let mut root = self.tree(&list);
        root.flatten();
        root.annotate(Position::Root);
        root
    }

    fn tree(&self, list: &[Word]) -> Node {
        match list {
            [] => Node::never(),
            [word] => Node::sequence(word.iter().map(|&c| self.symbol(c)).collect()),
            _ if list.iter().all(|w| w.len() == 1) => self.single_chars(list),
            _ => {
                if let Some(split) = best_split(list, Anchor::Start) {
                    debug!(
                        "prefix split: {} prefixes x {} suffixes",
                        split.prefixes.len(),
                        split.suffixes.len()
                    );
                    let (suffixes, optional) = without_empty(split.suffixes);
                    let head = self.tree(&split.prefixes);
                    let tail = self.tree(&suffixes).optionalize(optional);
                    Node::sequence(vec![head, tail])
                } else if let Some(split) = best_split(list, Anchor::End) {
                    debug!(
                        "suffix split: {} prefixes x {} suffixes",
                        split.prefixes.len(),
                        split.suffixes.len()
                    );
                    let (prefixes, optional) = without_empty(split.prefixes);
                    let head = self.tree(&prefixes).optionalize(optional);
                    let tail = self.tree(&split.suffixes);
                    Node::sequence(vec![head, tail])
                } else {
                    self.by_first_char(list)
                }
            }
        }
    }

    /// The node for one character of a normalized word
    fn symbol(&self, c: char) -> Node {
        match self.registry.lookup(c) {
            Some(entry) => Node::special(SpecialPattern::from(entry)),
            None => Node::leaf(c.to_string()),
        }
    }

    fn char_class(&self, chars: Vec<char>) -> Node {
        Node::char_class(CharClass::new(chars, self.config.case_insensitive))
    }

    fn single_chars(&self, list: &[Word]) -> Node {
        let chars: Vec<char> = list.iter().map(|w| w[0]).collect();
        let (literals, specials): (Vec<char>, Vec<char>) =
            chars.iter().partition(|&&c| !self.registry.is_special(c));
        let mut branches = Vec::new();
        let rest = if literals.len() > 1 {
            debug!("character class of {} characters", literals.len());
            branches.push(self.char_class(literals));
            specials
        } else {
            chars
        };
        branches.extend(rest.into_iter().map(|c| self.symbol(c)));
        Node::alternate(branches)
    }

    fn by_first_char(&self, list: &[Word]) -> Node {
        let mut groups: Vec<Vec<Word>> = Vec::new();
        for word in list {
            match groups.last_mut() {
                Some(group) if group[0].first() == word.first() => group.push(word.clone()),
                _ => groups.push(vec![word.clone()]),
            }
        }
        let is_lone_char = |group: &Vec<Word>| {
            matches!(group.as_slice(), [word] if word.len() == 1 && !self.registry.is_special(word[0]))
        };
        let lone = groups.iter().filter(|g| is_lone_char(*g)).count();
        debug!("grouping {} words by first character into {} groups", list.len(), groups.len());

        let mut branches = Vec::with_capacity(groups.len());
        if lone > 1 {
            let (singles, rest): (Vec<_>, Vec<_>) = groups.into_iter().partition(is_lone_char);
            branches.push(self.char_class(singles.into_iter().map(|g| g[0][0]).collect()));
            groups = rest;
        }
        branches.extend(groups.iter().map(|g| self.tree(g)));
        Node::alternate(branches)
    }
}

/// Remove the empty word, reporting whether it was there
fn without_empty(mut list: Vec<Word>) -> (Vec<Word>, bool) {
    let before = list.len();
    list.retain(|w| !w.is_empty());
    let removed = list.len() != before;
    (list, removed)
}

/// Find the fixed-width split at `anchor` that leaves the fewest characters
///
/// Only cross products qualify: every anchor must combine with exactly the
/// same set of remainders. The split must beat leaving the list whole.
fn best_split(list: &[Word], anchor: Anchor) -> Option<Split> {
    let total: usize = list.iter().map(Vec::len).sum();
    let shortest = list.iter().map(Vec::len).min()?;
    let uniform = list.iter().all(|w| w.len() == shortest);
    let limit = if uniform { shortest.saturating_sub(1) } else { shortest };

    let mut best = None;
    let mut min = total;
    for l in 1..=limit {
        let mut groups: BTreeMap<&[char], Vec<&[char]>> = BTreeMap::new();
        for word in list {
            let (fixed, rest) = match anchor {
                Anchor::Start => (&word[..l], &word[l..]),
                Anchor::End => {
                    let i = word.len() - l;
                    (&word[i..], &word[..i])
                }
            };
            groups.entry(fixed).or_default().push(rest);
        }
        for rests in groups.values_mut() {
            rests.sort();
        }
        let mut sets = groups.values();
        let Some(first) = sets.next() else { continue };
        if !sets.all(|rests| rests == first) {
            continue;
        }
        let fixed: Vec<Word> = groups.keys().map(|k| k.to_vec()).collect();
        let rests: Vec<Word> = first.iter().map(|r| r.to_vec()).collect();
        let count = fixed.iter().chain(&rests).map(Vec::len).sum::<usize>();
        if count < min {
            min = count;
            best = Some(match anchor {
                Anchor::Start => Split {
                    prefixes: fixed,
                    suffixes: rests,
                },
                Anchor::End => Split {
                    prefixes: rests,
                    suffixes: fixed,
                },
            });
        }
    }
    best
}
