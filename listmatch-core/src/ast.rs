//! Abstract Syntax Tree (AST) for generated patterns
//!
//! The tree builder produces a [`Node`] tree; [`Node::convert`] turns it
//! into pattern text. There are five kinds of node:
//! - Leaves holding literal text
//! - Character classes
//! - Sequences (concatenation)
//! - Alternations
//! - Special patterns emitted verbatim

use std::collections::BTreeSet;
use std::fmt::Write;

use crate::config::MatcherConfig;
use crate::emit::{condense, condense_for, ranges};
use crate::escape::{class_quote, quote_char};
use crate::special::{SpecialEntry, SpecialRole};

/// A pattern that can never match
pub const NEVER: &str = "(?!)";

/// Where a node sits relative to its parent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    /// The top of the tree
    Root,
    /// First child of a sequence
    First,
    /// Neither first nor last child of a sequence
    Middle,
    /// Last child of a sequence
    Last,
    /// The sole child of a sequence, or a branch spanning the whole pattern
    Only,
}

/// A registered pattern standing in for a placeholder
#[derive(Debug, Clone, PartialEq)]
pub struct SpecialPattern {
    pub pattern: String,
    pub atomic: bool,
    pub left: bool,
    pub right: bool,
    pub role: SpecialRole,
}

impl SpecialPattern {
    /// Whether the pattern consumes nothing and leaves the next character
    /// to whatever follows it
    fn is_transparent(&self) -> bool {
        matches!(self.role, SpecialRole::LeftBoundary | SpecialRole::End)
    }
}

impl From<&SpecialEntry> for SpecialPattern {
    fn from(entry: &SpecialEntry) -> Self {
        SpecialPattern {
            pattern: entry.pattern.clone(),
            atomic: entry.atomic,
            left: entry.left,
            right: entry.right,
            role: entry.role,
        }
    }
}

/// The characters that may come next at some point of a match
#[derive(Debug, Clone, PartialEq, Eq)]
enum Lookahead {
    Chars(BTreeSet<char>),
    /// Anything; an opaque pattern or text outside the match
    Any,
}

impl Lookahead {
    fn none() -> Self {
        Lookahead::Chars(BTreeSet::new())
    }

    fn union(self, other: &Lookahead) -> Self {
        match (self, other) {
            (Lookahead::Chars(mut a), Lookahead::Chars(b)) => {
                a.extend(b.iter().copied());
                Lookahead::Chars(a)
            }
            _ => Lookahead::Any,
        }
    }

    fn is_disjoint(&self, other: &Lookahead) -> bool {
        match (self, other) {
            (Lookahead::Chars(a), Lookahead::Chars(b)) => a.is_disjoint(b),
            _ => false,
        }
    }
}

/// A set of characters, with the canned shorthand sets factored out
#[derive(Debug, Clone, PartialEq)]
pub struct CharClass {
    /// Characters not covered by a shorthand
    pub chars: BTreeSet<char>,
    /// `[:word:]` covers part of the set
    pub word: bool,
    /// `[:digit:]` covers part of the set
    pub digit: bool,
    /// `[:space:]` covers part of the set
    pub space: bool,
}

const DIGIT_CHARS: [char; 10] = ['0', '1', '2', '3', '4', '5', '6', '7', '8', '9'];
const SPACE_CHARS: [char; 6] = ['\t', '\n', '\x0B', '\x0C', '\r', ' '];

fn word_chars(case_insensitive: bool) -> Vec<char> {
    let upper = if case_insensitive { None } else { Some('A'..='Z') };
    ('0'..='9')
        .chain(upper.into_iter().flatten())
        .chain('a'..='z')
        .chain(std::iter::once('_'))
        .collect()
}

impl CharClass {
    /// Create a class from its members
    ///
    /// With `case_insensitive` the input is expected to be folded already,
    /// so the lowercase word characters alone count as `[:word:]`.
    pub fn new<I>(chars: I, case_insensitive: bool) -> Self
    where
        I: IntoIterator<Item = char>,
    {
        let mut chars: BTreeSet<char> = chars.into_iter().collect();
        let mut take = |set: &[char]| {
            let covered = set.iter().all(|c| chars.contains(c));
            if covered {
                for c in set {
                    chars.remove(c);
                }
            }
            covered
        };
        let word = take(word_chars(case_insensitive).as_slice());
        let digit = !word && take(DIGIT_CHARS.as_slice());
        let space = take(SPACE_CHARS.as_slice());
        CharClass {
            chars,
            word,
            digit,
            space,
        }
    }

    /// Every character the class matches
    fn members(&self) -> BTreeSet<char> {
        let mut all = self.chars.clone();
        if self.word {
            all.extend(word_chars(false));
        }
        if self.digit {
            all.extend(DIGIT_CHARS);
        }
        if self.space {
            all.extend(SPACE_CHARS);
        }
        all
    }

    fn shorthands(&self) -> impl Iterator<Item = &'static str> {
        [
            (self.word, "[:word:]"),
            (self.digit, "[:digit:]"),
            (self.space, "[:space:]"),
        ]
        .into_iter()
        .filter_map(|(on, s)| on.then_some(s))
    }

    /// Convert the class to pattern text
    ///
    /// Shorthands are written as ASCII POSIX classes, which only exist
    /// inside brackets.
    pub fn to_regex_string(&self) -> String {
        let shorthands: Vec<_> = self.shorthands().collect();
        if self.chars.is_empty() && shorthands.is_empty() {
            return NEVER.to_string();
        }
        if shorthands.is_empty() && self.chars.len() == 1 {
            if let Some(&c) = self.chars.first() {
                return quote_char(c);
            }
        }
        let mut mid = String::new();
        for (start, end) in ranges(self.chars.iter().copied()) {
            mid.push_str(&class_quote(start));
            if end == start {
                continue;
            }
            if u32::from(end) != u32::from(start) + 1 {
                mid.push('-');
            }
            mid.push_str(&class_quote(end));
        }
        for s in shorthands {
            mid.push_str(s);
        }
        format!("[{}]", mid)
    }
}

/// The kinds of node
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Literal text
    Leaf(String),
    /// A character class
    CharClass(CharClass),
    /// Concatenation
    Sequence(Vec<Node>),
    /// Alternation; an empty one never matches
    Alternate(Vec<Node>),
    /// A special pattern
    Special(SpecialPattern),
}

/// A node in the pattern tree
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    /// Emit as zero-or-one
    pub optional: bool,
    pub position: Position,
}

impl Node {
    fn new(kind: NodeKind) -> Self {
        Node {
            kind,
            optional: false,
            position: Position::Middle,
        }
    }

    /// Create a leaf
    pub fn leaf(text: impl Into<String>) -> Self {
        Node::new(NodeKind::Leaf(text.into()))
    }

    /// Create a character class node
    pub fn char_class(class: CharClass) -> Self {
        Node::new(NodeKind::CharClass(class))
    }

    /// Create a sequence; a single child stands for itself
    pub fn sequence(mut children: Vec<Node>) -> Self {
        match children.len() {
            1 => children.remove(0),
            _ => Node::new(NodeKind::Sequence(children)),
        }
    }

    /// Create an alternation; a single branch stands for itself
    pub fn alternate(mut children: Vec<Node>) -> Self {
        match children.len() {
            1 => children.remove(0),
            _ => Node::new(NodeKind::Alternate(children)),
        }
    }

    /// Create a special pattern node
    pub fn special(pattern: SpecialPattern) -> Self {
        Node::new(NodeKind::Special(pattern))
    }

    /// A node that matches nothing
    pub fn never() -> Self {
        Node::new(NodeKind::Alternate(Vec::new()))
    }

    /// Mark the node optional when `yes`
    pub fn optionalize(mut self, yes: bool) -> Self {
        if yes {
            self.optional = true;
        }
        self
    }

    pub fn is_root(&self) -> bool {
        self.position == Position::Root
    }

    pub fn children(&self) -> &[Node] {
        match &self.kind {
            NodeKind::Sequence(children) | NodeKind::Alternate(children) => children,
            _ => &[],
        }
    }

    /// Splice non-optional sequences into their parent sequences
    pub fn flatten(&mut self) {
        match &mut self.kind {
            NodeKind::Sequence(children) => {
                for child in children.iter_mut() {
                    child.flatten();
                }
                for child in std::mem::take(children) {
                    match child {
                        Node {
                            kind: NodeKind::Sequence(inner),
                            optional: false,
                            ..
                        } => children.extend(inner),
                        other => children.push(other),
                    }
                }
            }
            NodeKind::Alternate(children) => children.iter_mut().for_each(Node::flatten),
            _ => {}
        }
    }

    /// Record every node's position, starting from `position` at this node
    pub fn annotate(&mut self, position: Position) {
        self.position = position;
        match &mut self.kind {
            NodeKind::Sequence(children) => {
                let n = children.len();
                for (i, child) in children.iter_mut().enumerate() {
                    let p = match (i, n) {
                        (_, 1) => Position::Only,
                        (0, _) => Position::First,
                        (i, n) if i + 1 == n => Position::Last,
                        _ => Position::Middle,
                    };
                    child.annotate(p);
                }
            }
            NodeKind::Alternate(children) => {
                let p = match position {
                    Position::Root => Position::Only,
                    other => other,
                };
                for child in children.iter_mut() {
                    child.annotate(p);
                }
            }
            _ => {}
        }
    }

    /// Whether the converted text binds as a single unit under quantification
    pub fn is_atomic(&self) -> bool {
        match &self.kind {
            NodeKind::Leaf(text) => text.chars().count() == 1,
            NodeKind::CharClass(_) => true,
            NodeKind::Sequence(_) => false,
            NodeKind::Alternate(children) => children.is_empty() || !self.is_root(),
            NodeKind::Special(p) => p.atomic,
        }
    }

    fn nullable(&self) -> bool {
        self.optional
            || match &self.kind {
                NodeKind::Leaf(text) => text.is_empty(),
                NodeKind::CharClass(_) => false,
                NodeKind::Sequence(children) => children.iter().all(Node::nullable),
                NodeKind::Alternate(children) => children.iter().any(Node::nullable),
                NodeKind::Special(p) => p.is_transparent(),
            }
    }

    /// Characters a match of the node can begin with
    fn first(&self) -> Lookahead {
        match &self.kind {
            NodeKind::Leaf(text) => Lookahead::Chars(text.chars().take(1).collect()),
            NodeKind::CharClass(class) => Lookahead::Chars(class.members()),
            NodeKind::Sequence(children) => Node::first_of(children),
            NodeKind::Alternate(children) => children
                .iter()
                .fold(Lookahead::none(), |acc, c| acc.union(&c.first())),
            NodeKind::Special(p) if p.is_transparent() => Lookahead::none(),
            NodeKind::Special(_) => Lookahead::Any,
        }
    }

    fn first_of(nodes: &[Node]) -> Lookahead {
        let mut first = Lookahead::none();
        for node in nodes {
            first = first.union(&node.first());
            if !node.nullable() {
                break;
            }
        }
        first
    }

    /// What may come after the child at `i`, given what follows the sequence
    fn follow_of(children: &[Node], i: usize, follow: &Lookahead) -> Lookahead {
        let rest = &children[i + 1..];
        let first = Node::first_of(rest);
        if rest.iter().all(Node::nullable) {
            first.union(follow)
        } else {
            first
        }
    }

    /// Whether the next character alone settles every choice inside the node
    fn settled(&self, follow: &Lookahead) -> bool {
        match &self.kind {
            NodeKind::Leaf(_) | NodeKind::CharClass(_) => true,
            NodeKind::Special(p) => p.role != SpecialRole::Pattern,
            NodeKind::Sequence(children) => children
                .iter()
                .enumerate()
                .all(|(i, c)| c.committable(&Node::follow_of(children, i, follow))),
            NodeKind::Alternate(children) => {
                let mut seen = Lookahead::none();
                for child in children {
                    let first = child.first();
                    if child.nullable() || !seen.is_disjoint(&first) {
                        return false;
                    }
                    if !child.committable(follow) {
                        return false;
                    }
                    seen = seen.union(&first);
                }
                true
            }
        }
    }

    /// Whether the node can be matched without backtracking into it
    ///
    /// Atomic groups and possessive quantifiers are only emitted for such
    /// nodes: an optional part must not begin with anything that could
    /// follow it, and alternatives must begin with distinct characters.
    fn committable(&self, follow: &Lookahead) -> bool {
        (!self.optional || self.first().is_disjoint(follow)) && self.settled(follow)
    }

    /// Convert the node to pattern text
    pub fn convert(&self, config: &MatcherConfig) -> String {
        self.emit(config, &Lookahead::none())
    }

    fn emit(&self, config: &MatcherConfig, follow: &Lookahead) -> String {
        let commit = !config.backtracking && self.committable(follow);
        match &self.kind {
            NodeKind::Leaf(text) => {
                let rx = condense(text.chars().map(quote_char).collect(), config);
                self.finalize(rx, config, commit)
            }
            NodeKind::CharClass(class) => {
                let mut rx = class.to_regex_string();
                if self.optional {
                    rx.push_str(config.qmark_for(commit));
                }
                rx
            }
            NodeKind::Sequence(children) => {
                let fragments = children
                    .iter()
                    .enumerate()
                    .map(|(i, c)| c.emit(config, &Node::follow_of(children, i, follow)))
                    .collect();
                let rx = condense_for(fragments, config, self.settled(follow));
                self.finalize(rx, config, commit)
            }
            NodeKind::Alternate(children) => {
                if children.is_empty() {
                    return NEVER.to_string();
                }
                let rx = children
                    .iter()
                    .map(|c| c.emit(config, follow))
                    .collect::<Vec<_>>()
                    .join("|");
                let rx = if self.is_root() {
                    rx
                } else {
                    config.wrap_for(&rx, self.settled(follow))
                };
                self.finalize(rx, config, commit)
            }
            NodeKind::Special(p) => self.finalize(p.pattern.clone(), config, commit),
        }
    }

    fn finalize(&self, rx: String, config: &MatcherConfig, commit: bool) -> String {
        if !self.optional {
            return rx;
        }
        let mut rx = if self.is_atomic() && !rx.is_empty() {
            rx
        } else {
            config.wrap_for(&rx, commit)
        };
        rx.push_str(config.qmark_for(commit));
        rx
    }

    /// An indented outline of the tree, for debugging
    pub fn dump(&self) -> String {
        let mut out = String::new();
        self.dump_into(&mut out, 0);
        out
    }

    fn dump_into(&self, out: &mut String, depth: usize) {
        let indent = "  ".repeat(depth);
        let opt = if self.optional { "?" } else { "" };
        let label = match &self.kind {
            NodeKind::Leaf(text) => format!("Leaf {:?}", text),
            NodeKind::CharClass(class) => format!("CharClass {}", class.to_regex_string()),
            NodeKind::Sequence(_) => "Sequence".to_string(),
            NodeKind::Alternate(_) => "Alternate".to_string(),
            NodeKind::Special(p) => format!("Special {}", p.pattern),
        };
        let _ = writeln!(out, "{}{}{} [{:?}]", indent, label, opt, self.position);
        for child in self.children() {
            child.dump_into(out, depth + 1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Options;
    use fancy_regex::Regex;

    fn config() -> MatcherConfig {
        MatcherConfig::from_options(&Options::default()).unwrap()
    }

    fn word(s: &str) -> Node {
        Node::sequence(s.chars().map(|c| Node::leaf(c.to_string())).collect())
    }

    #[test]
    fn test_leaf() {
        assert_eq!(Node::leaf("a").convert(&config()), "a");
        assert_eq!(Node::leaf(".").convert(&config()), "\\.");
        assert!(Node::leaf("a").is_atomic());
    }

    #[test]
    fn test_leaf_condenses_its_text() {
        assert_eq!(Node::leaf("aaaaaaaaaa").convert(&config()), "a{10}");
        assert!(!Node::leaf("ab").is_atomic());
    }

    #[test]
    fn test_optional_leaf() {
        assert_eq!(Node::leaf("m").optionalize(true).convert(&config()), "m?");
        assert_eq!(
            Node::leaf("ab").optionalize(true).convert(&config()),
            "(?:ab)?"
        );
    }

    #[test]
    fn test_possessive_optional() {
        let node = word("alog").optionalize(true);
        assert_eq!(node.convert(&possessive()), "(?>alog)?+");
    }

    fn possessive() -> MatcherConfig {
        MatcherConfig::from_options(&Options::new().backtracking(false)).unwrap()
    }

    #[test]
    fn test_possessive_optional_before_same_char() {
        // a?a must be able to give the optional a back
        let seq = Node::sequence(vec![
            Node::leaf("a"),
            Node::leaf("a").optionalize(true),
            Node::leaf("b"),
        ]);
        assert_eq!(seq.convert(&possessive()), "aa?+b");
        let seq = Node::sequence(vec![Node::leaf("a").optionalize(true), Node::leaf("a")]);
        assert_eq!(seq.convert(&possessive()), "a?a");
    }

    #[test]
    fn test_possessive_alternation_before_shared_suffix() {
        let alt = Node::alternate(vec![
            word(".0"),
            Node::sequence(vec![Node::leaf("a"), Node::leaf("a").optionalize(true)]),
        ]);
        let seq = Node::sequence(vec![Node::leaf("0"), alt, Node::leaf("a")]);
        assert_eq!(seq.convert(&possessive()), "0(?:\\.0|aa?)a");

        let alt = Node::alternate(vec![word("cat"), word("dog")]);
        let seq = Node::sequence(vec![alt, Node::leaf("s")]);
        assert_eq!(seq.convert(&possessive()), "(?>cat|dog)s");
    }

    #[test]
    fn test_possessive_alternation_with_shared_first_char() {
        let alt = Node::alternate(vec![Node::leaf("a"), word("ab")]);
        assert_eq!(alt.convert(&possessive()), "(?:a|ab)");
    }

    #[test]
    fn test_possessive_around_opaque_special() {
        let digits = SpecialPattern {
            pattern: "\\d+".to_string(),
            atomic: false,
            left: false,
            right: false,
            role: SpecialRole::Pattern,
        };
        let seq = Node::sequence(vec![
            Node::leaf("x").optionalize(true),
            Node::special(digits),
        ]);
        assert_eq!(seq.convert(&possessive()), "x?\\d+");
    }

    #[test]
    fn test_sequence() {
        assert_eq!(word("cat").convert(&config()), "cat");
    }

    #[test]
    fn test_alternate_wrapping() {
        let mut alt = Node::alternate(vec![word("cat"), word("dog")]);
        assert_eq!(alt.convert(&config()), "(?:cat|dog)");
        assert!(alt.is_atomic());
        alt.annotate(Position::Root);
        assert_eq!(alt.convert(&config()), "cat|dog");
        assert!(!alt.is_atomic());
    }

    #[test]
    fn test_never() {
        assert_eq!(Node::never().convert(&config()), NEVER);
    }

    #[test]
    fn test_special() {
        let p = SpecialPattern {
            pattern: "\\s++".to_string(),
            atomic: false,
            left: false,
            right: false,
            role: SpecialRole::Pattern,
        };
        let node = Node::special(p.clone());
        assert_eq!(node.convert(&config()), "\\s++");
        let node = Node::special(p).optionalize(true);
        assert_eq!(node.convert(&config()), "(?:\\s++)?");
    }

    #[test]
    fn test_flatten() {
        let inner = word("ca");
        let mut seq = Node::sequence(vec![inner, Node::leaf("t")]);
        seq.flatten();
        assert_eq!(seq.children().len(), 3);

        let optional = word("ca").optionalize(true);
        let mut seq = Node::sequence(vec![optional, Node::leaf("t")]);
        seq.flatten();
        assert_eq!(seq.children().len(), 2);
        assert_eq!(seq.convert(&config()), "(?:ca)?t");
    }

    #[test]
    fn test_annotate_positions() {
        let mut root = Node::sequence(vec![Node::leaf("a"), Node::leaf("b"), Node::leaf("c")]);
        root.annotate(Position::Root);
        let positions: Vec<_> = root.children().iter().map(|c| c.position).collect();
        assert_eq!(
            positions,
            vec![Position::First, Position::Middle, Position::Last]
        );
        assert!(root.is_root());
    }

    #[test]
    fn test_char_class_ranges() {
        let class = CharClass::new("bcd".chars(), false);
        assert_eq!(class.to_regex_string(), "[b-d]");
        let class = CharClass::new("cr".chars(), false);
        assert_eq!(class.to_regex_string(), "[cr]");
        let class = CharClass::new("ab".chars(), false);
        assert_eq!(class.to_regex_string(), "[ab]");
    }

    #[test]
    fn test_char_class_shorthands() {
        let digits = CharClass::new('0'..='9', false);
        assert_eq!(digits.to_regex_string(), "[[:digit:]]");
        let word = CharClass::new(word_chars(false).into_iter().chain(['+']), false);
        assert_eq!(word.to_regex_string(), "[+[:word:]]");
        let folded = CharClass::new(word_chars(true), true);
        assert_eq!(folded.to_regex_string(), "[[:word:]]");
        let unfolded = CharClass::new(word_chars(true), false);
        assert!(!unfolded.word);
        assert!(unfolded.digit);
        let space = CharClass::new(SPACE_CHARS, false);
        assert_eq!(space.to_regex_string(), "[[:space:]]");
    }

    #[test]
    fn test_char_class_shorthands_stay_ascii() {
        let cases = [
            (CharClass::new('0'..='9', false), '\u{0663}'),
            (CharClass::new(word_chars(false), false), '\u{e9}'),
            (CharClass::new(SPACE_CHARS, false), '\u{a0}'),
        ];
        for (class, outsider) in cases {
            let re = Regex::new(&format!("\\A{}\\z", class.to_regex_string())).unwrap();
            assert!(re.is_match("0").unwrap() || re.is_match(" ").unwrap());
            assert!(!re.is_match(&outsider.to_string()).unwrap());
        }
    }

    #[test]
    fn test_char_class_escapes() {
        let class = CharClass::new(['-', ']', '^'], false);
        assert_eq!(class.to_regex_string(), "[\\-\\]\\^]");
        let single = CharClass::new(['.'], false);
        assert_eq!(single.to_regex_string(), "\\.");
    }

    #[test]
    fn test_optional_char_class() {
        let node = Node::char_class(CharClass::new("01".chars(), false)).optionalize(true);
        assert_eq!(node.convert(&config()), "[01]?");
    }

    #[test]
    fn test_dump() {
        let mut root = Node::alternate(vec![word("ab"), Node::leaf("c")]);
        root.annotate(Position::Root);
        let dump = root.dump();
        assert!(dump.starts_with("Alternate [Root]"));
        assert!(dump.contains("  Sequence [Only]"));
        assert!(dump.contains("    Leaf \"a\" [First]"));
    }
}
