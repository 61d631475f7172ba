//! Documented scenarios
//!
//! Exact pattern text for the documented lists and option combinations,
//! plus matching checks through the compiled pattern.

use listmatch_core::{Bound, Edges, Matcher, Options, Special, SpecialKey, pattern, rx};

fn pat(list: &[&str], options: Options) -> String {
    pattern(list, options).unwrap().unwrap()
}

fn numbers(range: std::ops::RangeInclusive<u32>) -> Vec<String> {
    range.map(|n| n.to_string()).collect()
}

mod factoring {
    use super::*;

    #[test]
    fn test_alternation() {
        assert_eq!(pat(&["cat", "dog"], Options::new()), "(?:cat|dog)");
    }

    #[test]
    fn test_character_class_prefix() {
        assert_eq!(pat(&["cat", "rat"], Options::new()), "(?:[cr]at)");
        assert_eq!(pat(&["cad", "bad", "dad"], Options::new()), "(?:[b-d]ad)");
    }

    #[test]
    fn test_shared_prefix() {
        assert_eq!(pat(&["cat", "camel"], Options::new()), "(?:ca(?:mel|t))");
    }

    #[test]
    fn test_shared_suffix() {
        assert_eq!(
            pat(&["cat", "flat", "sprat"], Options::new()),
            "(?:(?:c|fl|spr)at)"
        );
    }

    #[test]
    fn test_optional_parts() {
        assert_eq!(pat(&["the", "them"], Options::new()), "(?:them?)");
        assert_eq!(pat(&["at", "cat"], Options::new()), "(?:c?at)");
        assert_eq!(pat(&["cat", "catalog"], Options::new()), "(?:cat(?:alog)?)");
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            pattern(numbers(1..=31), Options::new()).unwrap().as_deref(),
            Some("(?:[4-9]|1[[:digit:]]?|2[[:digit:]]?|3[01]?)")
        );
    }

    #[test]
    fn test_case_variants() {
        assert_eq!(
            pat(&["Cat", "cat", "CAT"], Options::new()),
            "(?:C(?:AT|at)|cat)"
        );
        assert_eq!(
            pat(&["Cat", "cat", "CAT"], Options::new().case_insensitive(true)),
            "(?i:cat)"
        );
    }

    #[test]
    fn test_escaped_text() {
        assert_eq!(
            pat(&["cat and dog", "# is sometimes called the pound symbol"], Options::new()),
            "(?:\\#\\ is\\ sometimes\\ called\\ the\\ pound\\ symbol|cat\\ and\\ dog)"
        );
        assert_eq!(
            pat(&[" cat  walker ", "  dog walker", "camel  walker"], Options::new()),
            "(?:\\ (?:\\ dog\\ walker|cat\\ \\ walker\\ )|camel\\ \\ walker)"
        );
    }
}

mod character_classes {
    use super::*;

    fn word_chars() -> Vec<String> {
        ('0'..='9')
            .chain('A'..='Z')
            .chain('a'..='z')
            .chain(['_'])
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_word_shorthand() {
        let mut chars = word_chars();
        chars.push("+".to_string());
        assert_eq!(
            pattern(&chars, Options::new()).unwrap().as_deref(),
            Some("[+[:word:]]")
        );
        let re = rx(&chars, Options::new().bound(Bound::string())).unwrap();
        for c in &chars {
            assert!(re.is_match(c).unwrap(), "{} should match", c);
        }
        for c in ["\u{e9}", "\u{0663}", "\u{3b1}", "-", "ab"] {
            assert!(!re.is_match(c).unwrap(), "{} should not match", c);
        }

        let mut chars = word_chars();
        chars.push("@".to_string());
        assert_eq!(
            pattern(&chars, Options::new()).unwrap().as_deref(),
            Some("[@[:word:]]")
        );
    }

    #[test]
    fn test_word_shorthand_case_insensitive() {
        let mut chars = word_chars();
        chars.push("+".to_string());
        let options = Options::new().case_insensitive(true);
        assert_eq!(
            pattern(&chars, options.clone()).unwrap().as_deref(),
            Some("(?i:[+[:word:]])")
        );
        let re = rx(&chars, options.bound(Bound::string())).unwrap();
        for c in &chars {
            assert!(re.is_match(c).unwrap());
        }
        assert!(!re.is_match("\u{c9}").unwrap());
    }

    #[test]
    fn test_digit_shorthand() {
        let digits = numbers(0..=9);
        assert_eq!(
            pattern(&digits, Options::new()).unwrap().as_deref(),
            Some("[[:digit:]]")
        );
        let re = rx(&digits, Options::new().bound(Bound::string())).unwrap();
        assert!(re.is_match("7").unwrap());
        for c in ["\u{0663}", "\u{ff17}", "\u{096a}"] {
            assert!(!re.is_match(c).unwrap(), "{} should not match", c);
        }
    }

    #[test]
    fn test_digit_shorthand_in_numbers() {
        let re = rx(&numbers(1..=31), Options::new().bound(Bound::string())).unwrap();
        assert!(re.is_match("13").unwrap());
        assert!(!re.is_match("1\u{0663}").unwrap());
        assert!(!re.is_match("32").unwrap());
    }

    #[test]
    fn test_space_shorthand() {
        let spaces = ["\t", "\n", "\x0B", "\x0C", "\r", " "];
        assert_eq!(pat(&spaces, Options::new()), "[[:space:]]");
        let re = rx(spaces, Options::new().bound(Bound::string())).unwrap();
        for s in spaces {
            assert!(re.is_match(s).unwrap());
        }
        assert!(!re.is_match("\u{a0}").unwrap());
        assert!(!re.is_match("\u{2003}").unwrap());
    }
}

mod repeats {
    use super::*;

    #[test]
    fn test_single_character_repeat() {
        assert_eq!(pat(&["aaaaaaaaaa"], Options::new()), "(?:a{10})");
        let re = rx(["aaaaaaaaaa"], Options::new().bound(Bound::string())).unwrap();
        assert!(re.is_match("aaaaaaaaaa").unwrap());
        assert!(!re.is_match("aaaaaaaaa").unwrap());
        assert!(!re.is_match("aaaaaaaaaaa").unwrap());
    }

    #[test]
    fn test_nested_repeat() {
        assert_eq!(
            pat(&["bbbaaaaaaaaaabbbaaaaaaaaaa"], Options::new()),
            "(?:(?:bbba{10}){2})"
        );
    }

    #[test]
    fn test_repeat_after_factoring() {
        assert_eq!(pat(&["catttttttttt"], Options::new()), "(?:cat{10})");
        assert_eq!(
            pat(&["cat-t-t-t-t-t-t-t-t-t"], Options::new()),
            "(?:ca(?:t-){9}t)"
        );
        assert_eq!(
            pat(&["catttttttttt", "batttttttttt"], Options::new()),
            "(?:[bc]at{10})"
        );
    }

    #[test]
    fn test_escaped_repeat() {
        assert_eq!(
            pat(&["     cat     "], Options::new()),
            "(?:(?:\\ ){5}cat(?:\\ ){5})"
        );
        assert_eq!(pat(&["     cat     "], Options::new().trim(true)), "(?:cat)");
    }
}

mod wrapping {
    use super::*;

    #[test]
    fn test_atomic() {
        assert_eq!(pat(&["cat", "dog"], Options::new().atomic(false)), "cat|dog");
        assert_eq!(pat(&["cat", "dog"], Options::new().atomic(true)), "(?:cat|dog)");
    }

    #[test]
    fn test_backtracking() {
        assert_eq!(
            pat(&["cat", "dog"], Options::new().backtracking(false)),
            "(?>cat|dog)"
        );
    }

    #[test]
    fn test_modifiers() {
        assert_eq!(pat(&["cat"], Options::new().multiline(true)), "(?m:cat)");
        assert_eq!(
            pat(&["cat", "dog"], Options::new().multiline(true).atomic(false)),
            "(?m:cat|dog)"
        );
    }

    #[test]
    fn test_not_extended() {
        assert_eq!(
            pat(
                &["cat and dog", "# is sometimes called the pound symbol"],
                Options::new().not_extended(true)
            ),
            "(?-x:cat and dog|# is sometimes called the pound symbol)"
        );
    }

    #[test]
    fn test_named() {
        assert_eq!(pat(&["cat"], Options::new().name("cat")), "(?<cat>cat)");
        let re = rx(["cat", "dog"], Options::new().name("pet")).unwrap();
        let caps = re.captures("hot dog").unwrap().unwrap();
        assert_eq!(caps.name("pet").map(|m| m.as_str()), Some("dog"));
    }
}

mod bounds {
    use super::*;

    #[test]
    fn test_word() {
        let options = Options::new().bound(Bound::word());
        assert_eq!(pat(&["cat", "dog"], options.clone()), "(?:\\b(?:cat|dog)\\b)");
        let re = rx(["cat", "dog"], options).unwrap();
        assert!(re.is_match("cat").unwrap());
        assert!(re.is_match("a dog").unwrap());
        assert!(!re.is_match("concatenate").unwrap());
        assert!(!re.is_match("doggy").unwrap());
    }

    #[test]
    fn test_word_only_next_to_word_characters() {
        assert_eq!(
            pat(&["cat", "#@%"], Options::new().bound(Bound::word())),
            "(?:\\#@%|\\bcat\\b)"
        );
    }

    #[test]
    fn test_string() {
        let options = Options::new().bound(Bound::string());
        assert_eq!(pat(&["cat"], options.clone()), "(?:\\Acat\\z)");
        let re = rx(["cat"], options).unwrap();
        assert!(re.is_match("cat").unwrap());
        assert!(!re.is_match("cat\ndog").unwrap());
        assert!(!re.is_match(" cat ").unwrap());
    }

    #[test]
    fn test_line() {
        let options = Options::new().bound(Bound::line());
        assert_eq!(pat(&["cat"], options.clone()), "(?m:^cat$)");
        let re = rx(["cat"], options).unwrap();
        assert!(re.is_match("cat").unwrap());
        assert!(re.is_match("cat\ndog").unwrap());
        assert!(re.is_match("dog\ncat").unwrap());
        assert!(!re.is_match(" cat ").unwrap());
    }

    #[test]
    fn test_single_edges() {
        assert_eq!(
            pat(&["cat"], Options::new().bound(Bound::Word(Edges::Left))),
            "(?:\\bcat)"
        );
        assert_eq!(
            pat(&["cat"], Options::new().bound(Bound::String(Edges::Left))),
            "(?:\\Acat)"
        );
        assert_eq!(
            pat(&["cat"], Options::new().bound(Bound::Line(Edges::Right))),
            "(?m:cat$)"
        );
    }

    #[test]
    fn test_unwrapped_bounds() {
        let base = Matcher::new(Options::new().atomic(false)).unwrap();
        let with = |bound: Bound| {
            base.bud(|o| o.bound(bound))
                .unwrap()
                .pattern(["cat", "dog"])
                .unwrap()
                .unwrap()
        };
        assert_eq!(with(Bound::word()), "\\b(?:cat|dog)\\b");
        assert_eq!(with(Bound::string()), "\\A(?:cat|dog)\\z");
        assert_eq!(with(Bound::line()), "(?m:^(?:cat|dog)$)");
    }

    #[test]
    fn test_custom() {
        let digits = Bound::custom("\\d", Some("(?<!\\d)"), Some("(?!\\d)"));
        assert_eq!(
            pat(&["1", "2"], Options::new().atomic(false).bound(digits.clone())),
            "(?<!\\d)[12](?!\\d)"
        );
        assert_eq!(
            pattern(numbers(1..=999), Options::new().bound(digits.clone()))
                .unwrap()
                .as_deref(),
            Some("(?:(?<!\\d)[1-9](?:[[:digit:]][[:digit:]]?)?(?!\\d))")
        );

        let list = numbers(1..=31);
        let re = rx(&list, Options::new().bound(digits)).unwrap();
        for n in &list {
            assert!(re.is_match(&format!("a{}b", n)).unwrap());
            assert!(!re.is_match(&format!("0{}0", n)).unwrap());
        }
    }
}

mod specials {
    use super::*;

    #[test]
    fn test_literal_special() {
        assert_eq!(
            pat(&["cat dog"], Options::new().special(" ", "\\s++")),
            "(?:cat\\s++dog)"
        );
        assert_eq!(
            pat(&["cat dog"], Options::new().atomic(false).special(" ", "\\s++")),
            "cat\\s++dog"
        );
    }

    #[test]
    fn test_regex_special_emits_itself() {
        let options = Options::new().special(
            SpecialKey::pattern("(?<!\\d)\\d{4}(?!\\d)"),
            Special::verbatim(),
        );
        let list = ["year", "year2000", "year1999"];
        assert_eq!(
            pat(&list, options.clone()),
            "(?:year(?:(?<!\\d)\\d{4}(?!\\d))?)"
        );
        let re = rx(list, options).unwrap();
        assert!(re.is_match("year1066").unwrap());
        for w in list {
            assert!(re.is_match(w).unwrap());
        }
    }

    #[test]
    fn test_regex_and_literal_keys() {
        let expected = "(?:(?:(?:Catch|Fahrenheit)\\ )?\\d++)";
        assert_eq!(
            pat(
                &["Catch 22", "1984", "Fahrenheit 451"],
                Options::new().special(SpecialKey::pattern("\\d+"), "\\d++")
            ),
            expected
        );
        assert_eq!(
            pat(
                &["Catch foo", "foo", "Fahrenheit foo"],
                Options::new().special("foo", "\\d++")
            ),
            expected
        );
    }

    #[test]
    fn test_normalized_whitespace() {
        let options = Options::new().bound(Bound::word()).normalize_whitespace(true);
        assert_eq!(pat(&["   cat   dog  "], options.clone()), "(?:\\bcat[[:space:]]++dog\\b)");
        let re = rx(["   cat   dog  "], options).unwrap();
        assert!(re.is_match("the cat  dog is an odd beast").unwrap());
        assert!(!re.is_match("the cat\u{a0}dog is an odd beast").unwrap());
        for bad in [
            "the catdog is an odd beast",
            "the cat doggy is an odd beast",
            "the scat dog is an odd beast",
        ] {
            assert!(!re.is_match(bad).unwrap(), "{} should not match", bad);
        }
    }

    #[test]
    fn test_normalized_whitespace_factoring() {
        let list = [" cat  walker ", "  dog walker", "camel  walker"];
        assert_eq!(
            pat(&list, Options::new().normalize_whitespace(true)),
            "(?:(?:ca(?:mel|t)|dog)[[:space:]]++walker)"
        );
        assert_eq!(
            pat(&["  cat     dog  "], Options::new().atomic(false).normalize_whitespace(true)),
            "cat[[:space:]]++dog"
        );
    }
}
