//! Emission helpers shared by the node types
//!
//! Repeat condensation turns runs of identical adjacent fragments into a
//! single quantified fragment (`ababab` becomes `(?:ab){3}`) whenever that
//! is shorter, and range compression turns a sorted character set into
//! codepoint ranges.

use log::trace;

use crate::config::MatcherConfig;

#[derive(Debug, Clone, Copy)]
struct Repeat {
    count: usize,
    start: usize,
    end: usize,
}

/// Join emitted fragments, condensing repeated runs until nothing shrinks
pub fn condense(elements: Vec<String>, config: &MatcherConfig) -> String {
    condense_for(elements, config, true)
}

/// Like [`condense`], grouping repeats atomically only when `commit`
pub fn condense_for(mut elements: Vec<String>, config: &MatcherConfig, commit: bool) -> String {
    while elements.len() > 1 {
        match condense_repeats(&elements, config, commit) {
            Some(condensed) => elements = condensed,
            None => break,
        }
    }
    elements.concat()
}

/// One round of condensation; `None` if no run is worth condensing
fn condense_repeats(
    elements: &[String],
    config: &MatcherConfig,
    commit: bool,
) -> Option<Vec<String>> {
    let n = elements.len();
    for l in 1..=n / 2 {
        for offset in 0..l {
            let chunks = (n - offset) / l;
            let mut runs: Vec<Option<Repeat>> = vec![None; chunks];
            for s in 1..chunks {
                let s2 = s * l + offset;
                let s1 = s2 - l;
                if elements[s1..s1 + l] == elements[s2..s2 + l] {
                    let mut run = runs[s - 1].take().unwrap_or(Repeat {
                        count: 1,
                        start: s1,
                        end: s2,
                    });
                    run.count += 1;
                    run.end = s2 + l;
                    runs[s] = Some(run);
                }
            }
            for run in runs.into_iter().flatten().rev() {
                let seq = elements[run.start..run.start + l].concat();
                let atomic = is_atomic_fragment(&seq);
                let len = seq.chars().count();
                let overhead = if atomic { 0 } else { config.wrap_size() };
                let condensed_len = overhead + 2 + digits(run.count) + len;
                if condensed_len < len * run.count {
                    let body = if atomic { seq } else { config.wrap_for(&seq, commit) };
                    let quantified = format!("{}{{{}}}", body, run.count);
                    trace!("condensed {} repeats into {}", run.count, quantified);
                    let mut copy = Vec::with_capacity(n - (run.end - run.start) + 1);
                    copy.extend_from_slice(&elements[..run.start]);
                    copy.push(quantified);
                    copy.extend_from_slice(&elements[run.end..]);
                    return Some(copy);
                }
            }
        }
    }
    None
}

fn digits(mut n: usize) -> usize {
    let mut d = 1;
    while n >= 10 {
        n /= 10;
        d += 1;
    }
    d
}

/// Whether an emitted fragment can take a quantifier without grouping
///
/// True for single characters, shorthand escapes such as `\d`, and
/// bracketed character classes, including ones holding POSIX classes.
pub fn is_atomic_fragment(s: &str) -> bool {
    let chars: Vec<char> = s.chars().collect();
    match chars.as_slice() {
        [_] => true,
        ['\\', c] => c.is_ascii_alphanumeric() || *c == '_',
        ['[', inner @ .., ']'] if !inner.is_empty() => {
            let mut i = 0;
            while i < inner.len() {
                match inner[i] {
                    '\\' if i + 1 < inner.len() => i += 2,
                    '[' if inner.get(i + 1) == Some(&':') => match posix_end(&inner[i + 2..]) {
                        Some(len) => i += len + 4,
                        None => return false,
                    },
                    '\\' | '[' | ']' => return false,
                    _ => i += 1,
                }
            }
            true
        }
        _ => false,
    }
}

/// Length of the name in a `[:name:]` item, given the text after `[:`
fn posix_end(rest: &[char]) -> Option<usize> {
    let len = rest.iter().position(|c| !c.is_ascii_lowercase())?;
    (len > 0 && rest[len..].starts_with(&[':', ']'])).then_some(len)
}

/// Collapse sorted characters into inclusive ranges
pub fn ranges<I>(chars: I) -> Vec<(char, char)>
where
    I: IntoIterator<Item = char>,
{
    let mut out: Vec<(char, char)> = Vec::new();
    for c in chars {
        match out.last_mut() {
            Some((_, end)) if u32::from(*end) + 1 == u32::from(c) => *end = c,
            _ => out.push((c, c)),
        }
    }
    out
}
