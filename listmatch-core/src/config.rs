//! Matcher configuration
//!
//! [`Options`] is the caller-facing bag of settings. [`MatcherConfig`] is the
//! validated, immutable form the rest of the pipeline reads from. Every
//! configuration error is raised while converting one into the other.

use std::fmt;

use fancy_regex::Regex;

use crate::error::{MatcherError, Result};

/// Which sides of a built-in boundary are enforced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Edges {
    /// Both the start and the end of each item
    #[default]
    Both,
    /// Only the start of each item
    Left,
    /// Only the end of each item
    Right,
}

impl Edges {
    fn left(self) -> bool {
        matches!(self, Edges::Both | Edges::Left)
    }

    fn right(self) -> bool {
        matches!(self, Edges::Both | Edges::Right)
    }
}

/// Boundary conditions placed around the items of the list
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Bound {
    /// No boundary assertions
    #[default]
    None,
    /// Word boundaries (`\b`) next to word characters
    Word(Edges),
    /// Whole-string anchors (`\A`, `\z`)
    String(Edges),
    /// Line anchors (`^`, `$`)
    Line(Edges),
    /// Caller-supplied boundary patterns
    Custom {
        /// Pattern a single character must match to get a boundary next to it
        test: String,
        /// Pattern emitted before qualifying items
        left: Option<String>,
        /// Pattern emitted after qualifying items
        right: Option<String>,
    },
}

impl Bound {
    /// Word boundaries on both sides
    pub fn word() -> Self {
        Bound::Word(Edges::Both)
    }

    /// Whole-string anchors on both sides
    pub fn string() -> Self {
        Bound::String(Edges::Both)
    }

    /// Line anchors on both sides
    pub fn line() -> Self {
        Bound::Line(Edges::Both)
    }

    /// A custom boundary
    pub fn custom(
        test: impl Into<String>,
        left: Option<impl Into<String>>,
        right: Option<impl Into<String>>,
    ) -> Self {
        Bound::Custom {
            test: test.into(),
            left: left.map(Into::into),
            right: right.map(Into::into),
        }
    }
}

/// What a special matches in the input strings
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SpecialKey {
    /// A literal substring
    Literal(String),
    /// A regular expression
    Pattern(String),
}

impl SpecialKey {
    /// A literal key
    pub fn literal(s: impl Into<String>) -> Self {
        SpecialKey::Literal(s.into())
    }

    /// A regex key
    pub fn pattern(s: impl Into<String>) -> Self {
        SpecialKey::Pattern(s.into())
    }
}

impl fmt::Display for SpecialKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpecialKey::Literal(s) => write!(f, "{}", s),
            SpecialKey::Pattern(p) => write!(f, "/{}/", p),
        }
    }
}

impl From<&str> for SpecialKey {
    fn from(value: &str) -> Self {
        SpecialKey::Literal(value.to_string())
    }
}

/// How a special is emitted
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Special {
    /// The pattern emitted in place of the special
    pub pattern: Option<String>,
    /// Whether the pattern can be quantified without grouping
    pub atomic: Option<bool>,
    /// Whether a left boundary may be placed before it
    pub left: bool,
    /// Whether a right boundary may be placed after it
    pub right: bool,
}

impl Special {
    /// A special emitting `pattern`
    pub fn new(pattern: impl Into<String>) -> Self {
        Special {
            pattern: Some(pattern.into()),
            ..Special::default()
        }
    }

    /// A regex special emitting its own key
    pub fn verbatim() -> Self {
        Special::default()
    }

    pub fn atomic(mut self, yes: bool) -> Self {
        self.atomic = Some(yes);
        self
    }

    pub fn left(mut self, yes: bool) -> Self {
        self.left = yes;
        self
    }

    pub fn right(mut self, yes: bool) -> Self {
        self.right = yes;
        self
    }
}

impl From<&str> for Special {
    fn from(value: &str) -> Self {
        Special::new(value)
    }
}

impl From<String> for Special {
    fn from(value: String) -> Self {
        Special::new(value)
    }
}

/// Caller-facing configuration
///
/// # Example
/// ```
/// use listmatch_core::{Bound, Options};
///
/// let options = Options::new().atomic(false).bound(Bound::word());
/// assert!(!options.atomic);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    pub atomic: bool,
    pub backtracking: bool,
    pub bound: Bound,
    pub trim: bool,
    pub case_insensitive: bool,
    pub multiline: bool,
    pub not_extended: bool,
    pub normalize_whitespace: bool,
    pub specials: Vec<(SpecialKey, Special)>,
    pub name: Option<String>,
    pub vet: bool,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            atomic: true,
            backtracking: true,
            bound: Bound::None,
            trim: false,
            case_insensitive: false,
            multiline: false,
            not_extended: false,
            normalize_whitespace: false,
            specials: Vec::new(),
            name: None,
            vet: false,
        }
    }
}

impl Options {
    pub fn new() -> Self {
        Options::default()
    }

    /// Wrap the whole pattern so it can be quantified
    pub fn atomic(mut self, yes: bool) -> Self {
        self.atomic = yes;
        self
    }

    /// Use plain groups and quantifiers; `false` selects atomic groups and
    /// possessive quantifiers
    pub fn backtracking(mut self, yes: bool) -> Self {
        self.backtracking = yes;
        self
    }

    pub fn bound(mut self, bound: Bound) -> Self {
        self.bound = bound;
        self
    }

    pub fn trim(mut self, yes: bool) -> Self {
        self.trim = yes;
        self
    }

    pub fn case_insensitive(mut self, yes: bool) -> Self {
        self.case_insensitive = yes;
        self
    }

    pub fn multiline(mut self, yes: bool) -> Self {
        self.multiline = yes;
        self
    }

    /// Mark the pattern as not extended, so spaces and `#` are literal
    pub fn not_extended(mut self, yes: bool) -> Self {
        self.not_extended = yes;
        self
    }

    pub fn normalize_whitespace(mut self, yes: bool) -> Self {
        self.normalize_whitespace = yes;
        self
    }

    /// Register a special, replacing any earlier one with the same key
    pub fn special(mut self, key: impl Into<SpecialKey>, special: impl Into<Special>) -> Self {
        upsert(&mut self.specials, key.into(), special.into());
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Compile every special pattern up front
    pub fn vet(mut self, yes: bool) -> Self {
        self.vet = yes;
        self
    }
}

fn upsert(specials: &mut Vec<(SpecialKey, Special)>, key: SpecialKey, special: Special) {
    match specials.iter_mut().find(|(k, _)| *k == key) {
        Some(entry) => entry.1 = special,
        None => specials.push((key, special)),
    }
}

/// The test deciding whether a character gets a boundary next to it
#[derive(Debug, Clone)]
pub enum WordTest {
    /// ASCII word characters
    Word,
    /// Anything but a newline
    AnyChar,
    /// A caller-supplied pattern
    Custom(Regex),
}

impl WordTest {
    pub fn matches(&self, c: char) -> bool {
        match self {
            WordTest::Word => c.is_ascii_alphanumeric() || c == '_',
            WordTest::AnyChar => c != '\n',
            WordTest::Custom(re) => {
                let mut buf = [0u8; 4];
                re.is_match(c.encode_utf8(&mut buf)).unwrap_or(false)
            }
        }
    }
}

/// A resolved boundary
#[derive(Debug, Clone)]
pub struct Boundary {
    pub test: WordTest,
    pub left: Option<String>,
    pub right: Option<String>,
}

/// A validated special
#[derive(Debug, Clone)]
pub struct SpecialSpec {
    pub key: SpecialKey,
    /// Regex source matching the key in input strings
    pub matcher: String,
    /// Emitted pattern
    pub pattern: String,
    pub atomic: bool,
    pub left: bool,
    pub right: bool,
}

/// Validated, immutable configuration for one matcher
#[derive(Debug, Clone)]
pub struct MatcherConfig {
    pub atomic: bool,
    pub backtracking: bool,
    pub trim: bool,
    pub case_insensitive: bool,
    pub multiline: bool,
    pub not_extended: bool,
    pub normalize_whitespace: bool,
    pub name: Option<String>,
    pub boundary: Option<Boundary>,
    pub specials: Vec<SpecialSpec>,
    pub vet: bool,
}

impl MatcherConfig {
    /// Validate a set of options
    pub fn from_options(options: &Options) -> Result<Self> {
        if let Some(name) = &options.name {
            validate_name(name)?;
        }
        let boundary = resolve_bound(&options.bound)?;

        let mut raw = options.specials.clone();
        if options.normalize_whitespace {
            upsert(&mut raw, SpecialKey::literal(" "), Special::new("[[:space:]]++"));
        } else if options.not_extended {
            upsert(&mut raw, SpecialKey::literal(" "), Special::new(" "));
        }
        if options.not_extended {
            upsert(&mut raw, SpecialKey::literal("#"), Special::new("#"));
        }
        let specials = raw
            .into_iter()
            .map(|(key, special)| resolve_special(key, special))
            .collect::<Result<Vec<_>>>()?;

        let config = MatcherConfig {
            atomic: options.atomic,
            backtracking: options.backtracking,
            trim: options.trim || options.normalize_whitespace,
            case_insensitive: options.case_insensitive,
            multiline: options.multiline || matches!(options.bound, Bound::Line(_)),
            not_extended: options.not_extended,
            normalize_whitespace: options.normalize_whitespace,
            name: options.name.clone(),
            boundary,
            specials,
            vet: options.vet,
        };
        if config.vet {
            config.verify()?;
        }
        Ok(config)
    }

    /// Confirm that every special pattern compiles on its own
    pub fn verify(&self) -> Result<()> {
        for spec in &self.specials {
            if Regex::new(&spec.pattern).is_err() {
                return Err(MatcherError::MalformedSpecialPattern {
                    key: spec.key.to_string(),
                    pattern: spec.pattern.clone(),
                });
            }
        }
        Ok(())
    }

    /// Opening of a wrapping group
    pub fn pfx(&self) -> &'static str {
        self.pfx_for(true)
    }

    /// Opening of a wrapping group; `commit` says whether the group may be atomic
    pub fn pfx_for(&self, commit: bool) -> &'static str {
        if self.backtracking || !commit { "(?:" } else { "(?>" }
    }

    /// The zero-or-one quantifier
    pub fn qmark(&self) -> &'static str {
        self.qmark_for(true)
    }

    /// The zero-or-one quantifier; possessive only when `commit`
    pub fn qmark_for(&self, commit: bool) -> &'static str {
        if self.backtracking || !commit { "?" } else { "?+" }
    }

    pub fn wrap(&self, s: &str) -> String {
        self.wrap_for(s, true)
    }

    pub fn wrap_for(&self, s: &str, commit: bool) -> String {
        format!("{}{})", self.pfx_for(commit), s)
    }

    /// Characters added by [`wrap`](Self::wrap)
    pub fn wrap_size(&self) -> usize {
        self.pfx().len() + 1
    }

    /// The inline flags to apply to the whole pattern, if any
    pub fn modifiers(&self) -> Option<String> {
        if !(self.case_insensitive || self.multiline || self.not_extended) {
            return None;
        }
        let mut m = String::new();
        if self.case_insensitive {
            m.push('i');
        }
        if self.multiline {
            m.push('m');
        }
        if self.not_extended {
            m.push_str("-x");
        }
        Some(m)
    }
}

fn validate_name(name: &str) -> Result<()> {
    let invalid = || MatcherError::InvalidName(name.to_string());
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return Err(invalid()),
    }
    if !chars.all(|c| c.is_alphanumeric() || c == '_') {
        return Err(invalid());
    }
    Regex::new(&format!("(?<{}>.*)", name)).map_err(|_| invalid())?;
    Ok(())
}

fn resolve_bound(bound: &Bound) -> Result<Option<Boundary>> {
    let builtin = |test: WordTest, left: &str, right: &str, edges: Edges| Boundary {
        test,
        left: edges.left().then(|| left.to_string()),
        right: edges.right().then(|| right.to_string()),
    };
    let boundary = match bound {
        Bound::None => return Ok(None),
        Bound::Word(edges) => builtin(WordTest::Word, "\\b", "\\b", *edges),
        Bound::String(edges) => builtin(WordTest::AnyChar, "\\A", "\\z", *edges),
        Bound::Line(edges) => builtin(WordTest::AnyChar, "^", "$", *edges),
        Bound::Custom { test, left, right } => {
            if left.is_none() && right.is_none() {
                return Err(MatcherError::MissingBound);
            }
            let test_rx = Regex::new(test).map_err(|e| MatcherError::BadBoundaryTest {
                test: test.clone(),
                reason: e.to_string(),
            })?;
            for pattern in [left, right].into_iter().flatten() {
                Regex::new(pattern).map_err(|e| MatcherError::BadBoundaryPattern {
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                })?;
            }
            Boundary {
                test: WordTest::Custom(test_rx),
                left: left.clone(),
                right: right.clone(),
            }
        }
    };
    Ok(Some(boundary))
}

fn resolve_special(key: SpecialKey, special: Special) -> Result<SpecialSpec> {
    let (matcher, pattern, default_atomic) = match &key {
        SpecialKey::Literal(s) => {
            let pattern = special
                .pattern
                .clone()
                .ok_or_else(|| MatcherError::MissingPattern(s.clone()))?;
            if s.is_empty() {
                return Err(MatcherError::BadSpecialKey {
                    key: s.clone(),
                    reason: "empty literal".to_string(),
                });
            }
            (crate::escape::quote(s).into_owned(), pattern, false)
        }
        SpecialKey::Pattern(p) => {
            Regex::new(p).map_err(|e| MatcherError::BadSpecialKey {
                key: key.to_string(),
                reason: e.to_string(),
            })?;
            match &special.pattern {
                Some(pattern) => (p.clone(), pattern.clone(), false),
                None => (p.clone(), format!("(?:{})", p), true),
            }
        }
    };
    Ok(SpecialSpec {
        atomic: special.atomic.unwrap_or(default_atomic),
        left: special.left,
        right: special.right,
        key,
        matcher,
        pattern,
    })
}
