use unicode_normalization::UnicodeNormalization;

/// Canonicalize pasted text so that visually identical characters compare equal
/// against what a plain keyboard produces.
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.nfkc().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{201B}' => out.push('\''),
            '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{201F}' => out.push('"'),
            '\u{2013}' | '\u{2014}' | '\u{2012}' | '\u{2015}' => out.push('-'),
            '\u{2026}' => out.push_str("..."),
            '\u{00A0}' | '\u{2000}'..='\u{200B}' | '\u{202F}' | '\u{205F}' | '\u{3000}' => {
                out.push(' ')
            }
            '\u{200C}' | '\u{200D}' | '\u{FEFF}' => {}
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                out.push('\n');
            }
            c => out.push(c),
        }
    }

    // dropping a joiner can leave a base letter next to its combining mark
    let out: String = out.nfkc().collect();
    out.trim().to_string()
}

/// Collapse runs of spaces into one and drop leading/trailing spaces.
/// Only `' '` is a separator here, newlines pass through untouched.
pub fn collapse_internal_spaces(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    text.split(' ')
        .filter(|fragment| !fragment.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Turn a pasted block into the ordered list of phrases for a session.
pub fn derive_phrases(raw: &str) -> Vec<String> {
    collapse_internal_spaces(raw)
        .split('\n')
        .map(normalize)
        .filter(|line| !line.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_many_spaces() {
        assert_eq!(collapse_internal_spaces("helo    world"), "helo world");
    }

    #[test]
    fn test_collapse_one_word() {
        assert_eq!(collapse_internal_spaces("helo"), "helo");
    }

    #[test]
    fn test_collapse_space_before_and_after() {
        assert_eq!(
            collapse_internal_spaces(" hello  thanh dep trai "),
            "hello thanh dep trai"
        );
    }

    #[test]
    fn test_collapse_keeps_newlines() {
        assert_eq!(collapse_internal_spaces("a  b\nc   d"), "a b\nc d");
    }

    #[test]
    fn test_collapse_empty() {
        assert_eq!(collapse_internal_spaces(""), "");
    }

    #[test]
    fn test_normalize_empty() {
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_normalize_smart_quotes() {
        assert_eq!(normalize("\u{2018}it\u{2019}s\u{2019}"), "'it's'");
        assert_eq!(normalize("\u{201C}quoted\u{201D}"), "\"quoted\"");
    }

    #[test]
    fn test_normalize_dashes_and_ellipsis() {
        assert_eq!(normalize("a\u{2013}b\u{2014}c"), "a-b-c");
        assert_eq!(normalize("wait\u{2026}"), "wait...");
    }

    #[test]
    fn test_normalize_space_variants() {
        assert_eq!(normalize("a\u{00A0}b\u{2009}c\u{202F}d"), "a b c d");
        assert_eq!(normalize("a\u{3000}b"), "a b");
    }

    #[test]
    fn test_normalize_strips_zero_width() {
        assert_eq!(normalize("\u{FEFF}zero\u{200D}width\u{200C}"), "zerowidth");
    }

    #[test]
    fn test_normalize_line_endings() {
        assert_eq!(normalize("a\r\nb\rc"), "a\nb\nc");
    }

    #[test]
    fn test_normalize_compatibility_forms() {
        // fullwidth latin and the "fi" ligature decompose under NFKC
        assert_eq!(normalize("\u{FF21}\u{FB01}"), "Afi");
    }

    #[test]
    fn test_normalize_trims() {
        assert_eq!(normalize("  \t padded \n "), "padded");
    }

    #[test]
    fn test_normalize_idempotent() {
        let samples = [
            "",
            "plain text",
            " \u{201C}Hello\u{201D} \u{2014} world\u{2026} ",
            "tab\tand\r\nnewline\r",
            "\u{00A0}\u{200B}\u{FEFF}",
            "\u{FF21}\u{FB01} caf\u{0065}\u{0301}",
            "e\u{200D}\u{0301}",
            "e\u{FEFF}\u{0301}",
            "e\u{200C}\u{0301}",
        ];
        for s in samples {
            let once = normalize(s);
            assert_eq!(normalize(&once), once, "not idempotent for {s:?}");
        }
    }

    #[test]
    fn test_normalize_composes_across_removed_joiner() {
        assert_eq!(normalize("caf\u{0065}\u{200D}\u{0301}"), "caf\u{00E9}");
        assert_eq!(normalize("\u{FEFF}e\u{FEFF}\u{0301}"), "\u{00E9}");
    }

    #[test]
    fn test_derive_phrases() {
        let raw = "  first   line \n\n\u{201C}second\u{201D}\r\n   \nthird\n";
        assert_eq!(
            derive_phrases(raw),
            vec!["first line", "\"second\"", "third"]
        );
    }

    #[test]
    fn test_derive_phrases_keeps_duplicates_in_order() {
        assert_eq!(derive_phrases("b\na\nb"), vec!["b", "a", "b"]);
    }

    #[test]
    fn test_derive_phrases_blank_input() {
        assert!(derive_phrases("").is_empty());
        assert!(derive_phrases(" \n \n\u{FEFF}").is_empty());
    }
}
