//! Backslash escaping of GIFT metacharacters.
//!
//! GIFT reserves `: ~ = # { }` inside titles, question text and answers.
//! Writers escape exactly those six; readers accept a backslash before any
//! character.

/// Characters that must be escaped in GIFT free text.
pub const RESERVED: [char; 6] = [':', '~', '=', '#', '{', '}'];

/// Escapes every reserved character with a backslash in a single pass.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 8);
    for c in text.chars() {
        if RESERVED.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Removes one backslash before any character.
///
/// A trailing backslash with nothing after it is kept.
pub fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some(next) => out.push(next),
                None => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Byte offsets of every unescaped occurrence of `needle` in `text`.
///
/// An occurrence is escaped when it starts right after a backslash that is
/// not itself escaped.
pub fn find_all_unescaped(text: &str, needle: &str) -> Vec<usize> {
    let mut found = Vec::new();
    if needle.is_empty() {
        return found;
    }

    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'\\' {
            // Skip the escaped character, whatever its width.
            i += 1;
            if i < bytes.len() {
                i += utf8_width(bytes[i]);
            }
            continue;
        }
        if text[i..].starts_with(needle) {
            found.push(i);
            i += needle.len();
        } else {
            i += utf8_width(bytes[i]);
        }
    }
    found
}

/// Byte offset of the first unescaped occurrence of `needle`.
pub fn find_unescaped(text: &str, needle: &str) -> Option<usize> {
    find_all_unescaped(text, needle).into_iter().next()
}

/// Byte offset of the last unescaped occurrence of `needle`.
pub fn rfind_unescaped(text: &str, needle: &str) -> Option<usize> {
    find_all_unescaped(text, needle).pop()
}

/// Splits `text` before every unescaped character in `markers`.
///
/// Each returned piece after the first starts with its marker. The leading
/// piece (text before the first marker) is returned too, possibly empty.
pub fn split_before_unescaped<'a>(text: &'a str, markers: &[char]) -> Vec<&'a str> {
    let mut cuts = Vec::new();
    let mut escaped = false;
    for (i, c) in text.char_indices() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if markers.contains(&c) {
            cuts.push(i);
        }
    }

    let mut pieces = Vec::with_capacity(cuts.len() + 1);
    let mut start = 0;
    for cut in cuts {
        pieces.push(&text[start..cut]);
        start = cut;
    }
    pieces.push(&text[start..]);
    pieces
}

fn utf8_width(first_byte: u8) -> usize {
    match first_byte {
        b if b < 0x80 => 1,
        b if b >= 0xF0 => 4,
        b if b >= 0xE0 => 3,
        _ => 2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "")]
    #[case("plain text", "plain text")]
    #[case("a:b", r"a\:b")]
    #[case("1+1=2", r"1+1\=2")]
    #[case("~=#{}:", r"\~\=\#\{\}\:")]
    #[case("{{", r"\{\{")]
    #[case("ação = ç", r"ação \= ç")]
    fn test_escape(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(escape(input), expected);
    }

    #[test]
    fn test_escape_does_not_rescan_inserted_backslashes() {
        // Each reserved character gets exactly one backslash.
        let escaped = escape("~=");
        assert_eq!(escaped.matches('\\').count(), 2);
        assert_eq!(escaped, r"\~\=");
    }

    #[rstest]
    #[case(r"a\:b", "a:b")]
    #[case(r"\n", "n")]
    #[case(r"\\", r"\")]
    #[case(r"trailing\", r"trailing\")]
    #[case(r"\~\=\#\{\}\:", "~=#{}:")]
    #[case("no escapes", "no escapes")]
    fn test_unescape(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(unescape(input), expected);
    }

    #[rstest]
    #[case("")]
    #[case("What is 2+2? {answer}")]
    #[case("<p style=\"color:red\">a ~ b = c # d</p>")]
    #[case("::title:: with ~tilde~ and == and ##")]
    #[case("ünïcödé: ~ok~")]
    fn test_unescape_reverses_escape(#[case] input: &str) {
        assert_eq!(unescape(&escape(input)), input);
    }

    #[test]
    fn test_find_unescaped_skips_escaped_markers() {
        let text = r"a\::b::c";
        assert_eq!(find_unescaped(text, "::"), Some(5));
        assert_eq!(find_all_unescaped(text, ":"), vec![3, 5, 6]);
    }

    #[test]
    fn test_find_unescaped_treats_double_backslash_as_literal() {
        // `\\{` is an escaped backslash followed by a real brace.
        let text = r"x\\{y";
        assert_eq!(find_unescaped(text, "{"), Some(3));
    }

    #[test]
    fn test_rfind_unescaped() {
        assert_eq!(rfind_unescaped("{a}b}", "}"), Some(4));
        assert_eq!(rfind_unescaped(r"{a\}", "}"), None);
    }

    #[test]
    fn test_split_before_unescaped() {
        let pieces = split_before_unescaped(r" =A ~B\=C #fb", &['=', '~', '#']);
        assert_eq!(pieces, vec![" ", "=A ", r"~B\=C ", "#fb"]);
    }

    #[test]
    fn test_split_without_markers_returns_whole_text() {
        assert_eq!(split_before_unescaped("abc", &['=']), vec!["abc"]);
    }
}
