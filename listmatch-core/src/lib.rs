//! Listmatch Core Library
//!
//! Compiles a list of literal strings into a compact regular expression
//! matching exactly those strings. Shared prefixes and suffixes are factored
//! out, single characters are merged into classes and repeated fragments are
//! condensed into counted repetitions.

pub mod ast;
pub mod config;
pub mod emit;
pub mod error;
pub mod escape;
pub mod matcher;
pub mod normalize;
pub mod special;
pub mod tree;

pub use ast::{CharClass, NEVER, Node, NodeKind, Position, SpecialPattern};
pub use config::{Bound, Edges, MatcherConfig, Options, Special, SpecialKey};
pub use error::{MatcherError, Result};
pub use escape::quote;
pub use fancy_regex::Regex;
pub use matcher::{Matcher, PatternReport, pattern, rx};
pub use special::{SpecialEntry, SpecialRegistry, SpecialRole};
pub use tree::TreeBuilder;
