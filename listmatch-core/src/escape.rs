//! Escaping of literal text for inclusion in a pattern
//!
//! Two flavors are needed: one for text outside a character class and one
//! for members of a character class. Outside a class the hyphen is left
//! alone; inside a class it is escaped along with the other set syntax.
//! Space and `#` are always escaped so the output survives being embedded
//! in an extended-mode pattern.

use std::borrow::Cow;

/// Escape a string for use outside a character class
pub fn quote(value: &str) -> Cow<'_, str> {
    if !value.chars().any(needs_quote) {
        return Cow::Borrowed(value);
    }
    let mut out = String::with_capacity(value.len() * 2);
    for c in value.chars() {
        push_quoted(&mut out, c);
    }
    Cow::Owned(out)
}

/// Escape a single character for use outside a character class
pub fn quote_char(c: char) -> String {
    let mut out = String::with_capacity(2);
    push_quoted(&mut out, c);
    out
}

/// Escape a single character for use inside a character class
pub fn class_quote(c: char) -> String {
    if let Some(esc) = whitespace_escape(c) {
        return esc.to_string();
    }
    match c {
        '[' | ']' | '\\' | '-' | '^' | '&' | '~' => format!("\\{}", c),
        _ => c.to_string(),
    }
}

fn push_quoted(out: &mut String, c: char) {
    if let Some(esc) = whitespace_escape(c) {
        out.push_str(esc);
    } else if is_meta(c) {
        out.push('\\');
        out.push(c);
    } else {
        out.push(c);
    }
}

fn needs_quote(c: char) -> bool {
    is_meta(c) || whitespace_escape(c).is_some()
}

fn is_meta(c: char) -> bool {
    matches!(
        c,
        '\\' | '.' | '*' | '+' | '?' | '(' | ')' | '[' | ']' | '{' | '}' | '|' | '^' | '$' | '#'
    )
}

fn whitespace_escape(c: char) -> Option<&'static str> {
    match c {
        ' ' => Some("\\ "),
        '\t' => Some("\\t"),
        '\n' => Some("\\n"),
        '\r' => Some("\\r"),
        '\x0B' => Some("\\x0B"),
        '\x0C' => Some("\\x0C"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_borrowed() {
        assert!(matches!(quote("cat"), Cow::Borrowed("cat")));
    }

    #[test]
    fn test_meta_characters() {
        assert_eq!(quote("a.b*c"), "a\\.b\\*c");
        assert_eq!(quote("(x|y)"), "\\(x\\|y\\)");
        assert_eq!(quote("$5^"), "\\$5\\^");
    }

    #[test]
    fn test_hyphen_only_escaped_in_class() {
        assert_eq!(quote("a-b"), "a-b");
        assert_eq!(class_quote('-'), "\\-");
    }

    #[test]
    fn test_whitespace() {
        assert_eq!(quote("a b"), "a\\ b");
        assert_eq!(quote_char('\n'), "\\n");
        assert_eq!(class_quote('\t'), "\\t");
        assert_eq!(class_quote(' '), "\\ ");
    }

    #[test]
    fn test_class_specials() {
        assert_eq!(class_quote(']'), "\\]");
        assert_eq!(class_quote('\\'), "\\\\");
        assert_eq!(class_quote('^'), "\\^");
        assert_eq!(class_quote('.'), ".");
    }

    #[test]
    fn test_quoted_text_matches_itself() {
        let text = "a.b (c) [d] {e} f|g h#i $j^ k\\l";
        let re = fancy_regex::Regex::new(&format!("^{}$", quote(text))).unwrap();
        assert!(re.is_match(text).unwrap());
        assert!(!re.is_match("a-b (c) [d] {e} f|g h#i $j^ k\\l").unwrap());
    }
}
