//! The matcher: the public front of the pipeline
//!
//! A [`Matcher`] holds validated options. Each call to
//! [`pattern`](Matcher::pattern) runs the whole pipeline on a fresh list:
//! filtering, special registration, normalization, tree construction,
//! conversion and the final top-level wrapping.

use fancy_regex::Regex;
use log::debug;

use crate::ast::{NEVER, Node};
use crate::config::{MatcherConfig, Options};
use crate::error::Result;
use crate::normalize::{self, Normalized};
use crate::special::SpecialRegistry;
use crate::tree::TreeBuilder;

/// A reusable, validated pattern generator
#[derive(Debug, Clone)]
pub struct Matcher {
    options: Options,
    config: MatcherConfig,
}

impl Matcher {
    /// Validate `options` and create a matcher
    ///
    /// Every configuration error is reported here, before any list is seen.
    pub fn new(options: Options) -> Result<Self> {
        let config = MatcherConfig::from_options(&options)?;
        Ok(Matcher { options, config })
    }

    /// The options this matcher was created with
    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    /// Derive a matcher from a modified copy of this one's options
    ///
    /// # Example
    /// ```
    /// use listmatch_core::Matcher;
    ///
    /// let base = Matcher::new(Default::default()).unwrap();
    /// let named = base.bud(|o| o.name("pet")).unwrap();
    /// assert_eq!(named.pattern(["cat", "dog"]).unwrap().as_deref(), Some("(?<pet>cat|dog)"));
    /// assert_eq!(base.pattern(["cat", "dog"]).unwrap().as_deref(), Some("(?:cat|dog)"));
    /// ```
    pub fn bud<F>(&self, f: F) -> Result<Self>
    where
        F: FnOnce(Options) -> Options,
    {
        Matcher::new(f(self.options.clone()))
    }

    /// Generate a pattern matching exactly the items of `list`
    ///
    /// Returns `None` when no items survive filtering.
    pub fn pattern<I, S>(&self, list: I) -> Result<Option<String>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(self.run(list)?.map(|run| run.pattern))
    }

    /// Generate a pattern and compile it
    ///
    /// An empty list compiles to a pattern that never matches.
    pub fn rx<I, S>(&self, list: I) -> Result<Regex>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let pattern = self.pattern(list)?;
        Ok(Regex::new(pattern.as_deref().unwrap_or(NEVER))?)
    }

    /// Generate a pattern along with the intermediate stages
    pub fn report<I, S>(&self, list: I) -> Result<PatternReport>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let input: Vec<String> = list.into_iter().map(|s| s.as_ref().to_string()).collect();
        let Some(run) = self.run(&input)? else {
            return Ok(PatternReport {
                input,
                normalized: Vec::new(),
                left_bounded: false,
                right_bounded: false,
                tree: String::new(),
                output: None,
            });
        };
        let normalized = run
            .normalized
            .words
            .iter()
            .map(|w| {
                w.chars()
                    .map(|c| match run.registry.lookup(c) {
                        Some(entry) => format!("<{}>", entry.key),
                        None => c.to_string(),
                    })
                    .collect()
            })
            .collect();
        Ok(PatternReport {
            input,
            normalized,
            left_bounded: run.normalized.left_used,
            right_bounded: run.normalized.right_used,
            tree: run.root.dump(),
            output: Some(run.pattern),
        })
    }

    fn run<I, S>(&self, list: I) -> Result<Option<Run>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let list = normalize::filter(list, &self.config);
        if list.is_empty() {
            debug!("nothing to match after filtering");
            return Ok(None);
        }
        let registry = SpecialRegistry::new(&self.config, &list)?;
        let normalized = normalize::normalize(&list, &registry, &self.config)?;
        let root = TreeBuilder::new(&self.config, &registry).build(&normalized.words);
        let pattern = self.wrap_root(&root);
        debug!("{} items -> {}", list.len(), pattern);
        Ok(Some(Run {
            registry,
            normalized,
            root,
            pattern,
        }))
    }

    /// Apply modifiers, the capture name or the atomic wrapping, outermost
    fn wrap_root(&self, root: &Node) -> String {
        let mut rx = root.convert(&self.config);
        let mut grouped = false;
        if let Some(m) = self.config.modifiers() {
            rx = format!("(?{}:{})", m, rx);
            grouped = true;
        }
        if let Some(name) = &self.config.name {
            rx = format!("(?<{}>{})", name, rx);
            grouped = true;
        }
        if !grouped && self.config.atomic && !root.is_atomic() {
            rx = self.config.wrap(&rx);
        }
        rx
    }
}

struct Run {
    registry: SpecialRegistry,
    normalized: Normalized,
    root: Node,
    pattern: String,
}

/// The stages of one pattern generation, for debugging
#[derive(Debug, Clone, PartialEq)]
pub struct PatternReport {
    /// Items as given
    pub input: Vec<String>,
    /// Normalized items, with specials shown as `<key>`
    pub normalized: Vec<String>,
    /// Some item starts with a boundary assertion
    pub left_bounded: bool,
    /// Some item ends with a boundary assertion
    pub right_bounded: bool,
    /// Outline of the annotated tree
    pub tree: String,
    /// The generated pattern; `None` when nothing survived filtering
    pub output: Option<String>,
}

impl PatternReport {
    /// Print a formatted report
    pub fn report(&self) {
        println!("Pattern Report");
        println!("==============");
        println!("Input:      {:?}", self.input);
        println!("Normalized: {:?}", self.normalized);
        let bounded = match (self.left_bounded, self.right_bounded) {
            (true, true) => "left and right",
            (true, false) => "left",
            (false, true) => "right",
            (false, false) => "none",
        };
        println!("Boundaries: {}", bounded);
        println!("Tree:");
        for line in self.tree.lines() {
            println!("  {}", line);
        }
        println!("Output:     {}", self.output.as_deref().unwrap_or(NEVER));
    }
}

/// Generate a pattern for `list` with one-off options
///
/// # Example
/// ```
/// use listmatch_core::{pattern, Options};
///
/// let rx = pattern(["cat", "camel"], Options::default()).unwrap();
/// assert_eq!(rx.as_deref(), Some("(?:ca(?:mel|t))"));
/// ```
pub fn pattern<I, S>(list: I, options: Options) -> Result<Option<String>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    Matcher::new(options)?.pattern(list)
}

/// Generate and compile a pattern for `list` with one-off options
pub fn rx<I, S>(list: I, options: Options) -> Result<Regex>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    Matcher::new(options)?.rx(list)
}
