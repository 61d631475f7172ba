//! Error types for the list matcher
//!
//! This module provides error handling using the `thiserror` crate.
//! Every configuration problem is reported when a [`Matcher`](crate::Matcher)
//! is constructed, before any list is processed.

use thiserror::Error;

/// The main error type for pattern generation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MatcherError {
    /// The capture group name cannot be used in a named group
    #[error("{0} does not work as the name of a named group")]
    InvalidName(String),

    /// A custom boundary gave neither a left nor a right pattern
    #[error("neither bound provided")]
    MissingBound,

    /// A custom boundary word test failed to compile
    #[error("bad boundary test {test}: {reason}")]
    BadBoundaryTest {
        /// The test pattern as given
        test: String,
        /// What the regex engine complained about
        reason: String,
    },

    /// A custom left or right boundary failed to compile
    #[error("bad boundary pattern: {pattern}")]
    BadBoundaryPattern {
        /// The boundary pattern as given
        pattern: String,
        /// What the regex engine complained about
        reason: String,
    },

    /// A literal special has nothing to emit
    #[error("symbol {0} requires a pattern")]
    MissingPattern(String),

    /// A regex special key failed to compile
    #[error("special key {key} is not a valid regex: {reason}")]
    BadSpecialKey {
        /// The key source
        key: String,
        /// What the regex engine complained about
        reason: String,
    },

    /// A vetted special pattern failed to compile
    #[error("the symbol {key} has an ill-formed pattern: {pattern}")]
    MalformedSpecialPattern {
        /// The key the pattern was registered under
        key: String,
        /// The offending emission pattern
        pattern: String,
    },

    /// The regex engine rejected generated pattern text
    #[error("compilation error: {0}")]
    Compile(String),
}

impl From<fancy_regex::Error> for MatcherError {
    fn from(value: fancy_regex::Error) -> Self {
        MatcherError::Compile(value.to_string())
    }
}

/// Result type alias for matcher operations
pub type Result<T> = std::result::Result<T, MatcherError>;
