//! Typographic punctuation ("smart quotes") for text and HTML.
//!
//! This is a character-level pass, not an HTML parser: anything between `<`
//! and `>` is copied through untouched, as is the content of elements whose
//! text must stay literal (`pre`, `code`, `kbd`, `script`, `style`).

const LEFT_DOUBLE: char = '\u{201c}';
const RIGHT_DOUBLE: char = '\u{201d}';
const LEFT_SINGLE: char = '\u{2018}';
const RIGHT_SINGLE: char = '\u{2019}';
const EN_DASH: char = '\u{2013}';
const EM_DASH: char = '\u{2014}';
const ELLIPSIS: char = '\u{2026}';

const LITERAL_ELEMENTS: &[&str] = &["pre", "code", "kbd", "script", "style"];

/// Elements that start a new run of text, so quotes after them open afresh
const BLOCK_ELEMENTS: &[&str] = &[
    "p", "br", "div", "li", "ul", "ol", "dl", "dt", "dd", "blockquote", "h1", "h2", "h3", "h4",
    "h5", "h6", "table", "tr", "td", "th", "hr", "pre", "figure", "figcaption",
];

/// The `smartify` transform
pub fn smartify(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + input.len() / 8);
    // Last character of visible text, carried across inline tags
    let mut prev: Option<char> = None;
    // Literal element we are inside of, if any
    let mut literal: Option<String> = None;
    let mut rest = input;

    while let Some(c) = rest.chars().next() {
        if c == '<' {
            if let Some(tag_len) = tag_length(rest) {
                let tag = &rest[..tag_len];
                out.push_str(tag);
                let (closing, name) = tag_name(tag);
                if BLOCK_ELEMENTS.contains(&name.as_str()) {
                    prev = None;
                }
                literal = next_literal_state(tag, closing, name, literal);
                rest = &rest[tag_len..];
                continue;
            }
        }

        if literal.is_some() {
            out.push(c);
            prev = Some(c);
            rest = &rest[c.len_utf8()..];
            continue;
        }

        let (replacement, consumed) = if rest.starts_with("---") {
            (EM_DASH, 3)
        } else if rest.starts_with("--") {
            (EN_DASH, 2)
        } else if rest.starts_with("...") {
            (ELLIPSIS, 3)
        } else if c == '"' {
            let next = rest[1..].chars().next();
            let quote = if opens_quote(prev, next) {
                LEFT_DOUBLE
            } else {
                RIGHT_DOUBLE
            };
            (quote, 1)
        } else if c == '\'' {
            let next = rest[1..].chars().next();
            let quote = if prev.is_some_and(char::is_alphanumeric) {
                // Apostrophe: it's, Ada's
                RIGHT_SINGLE
            } else if opens_quote(prev, next) {
                LEFT_SINGLE
            } else {
                RIGHT_SINGLE
            };
            (quote, 1)
        } else {
            (c, c.len_utf8())
        };

        out.push(replacement);
        prev = Some(replacement);
        rest = &rest[consumed..];
    }

    out
}

/// Byte length of the tag starting at `s`, if `s` starts with one
fn tag_length(s: &str) -> Option<usize> {
    let after = s[1..].chars().next()?;
    if !(after.is_ascii_alphabetic() || after == '/' || after == '!' || after == '?') {
        return None;
    }
    s.find('>').map(|end| end + 1)
}

/// Whether `tag` is a closing tag, and its lowercased element name
fn tag_name(tag: &str) -> (bool, String) {
    let inner = tag.trim_start_matches('<');
    let (closing, inner) = match inner.strip_prefix('/') {
        Some(rest) => (true, rest),
        None => (false, inner),
    };
    let name = inner
        .chars()
        .take_while(char::is_ascii_alphanumeric)
        .collect::<String>()
        .to_ascii_lowercase();
    (closing, name)
}

fn next_literal_state(
    tag: &str,
    closing: bool,
    name: String,
    current: Option<String>,
) -> Option<String> {
    match current {
        Some(open) if closing && open == name => None,
        Some(open) => Some(open),
        None if !closing && !tag.ends_with("/>") && LITERAL_ELEMENTS.contains(&name.as_str()) => {
            Some(name)
        }
        None => None,
    }
}

/// A quote opens when it follows nothing, whitespace or opening punctuation,
/// and is followed by something other than whitespace.
fn opens_quote(prev: Option<char>, next: Option<char>) -> bool {
    let after_break = match prev {
        None => true,
        Some(p) => p.is_whitespace() || matches!(p, '(' | '[' | '{' | '-' | '/' | EN_DASH | EM_DASH | LEFT_DOUBLE | LEFT_SINGLE),
    };
    after_break && next.is_some_and(|n| !n.is_whitespace())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_double_quotes() {
        assert_eq!(smartify("\"Hello\""), "\u{201c}Hello\u{201d}");
        assert_eq!(
            smartify("she said \"hi\" twice"),
            "she said \u{201c}hi\u{201d} twice"
        );
    }

    #[test]
    fn test_single_quotes_and_apostrophes() {
        assert_eq!(smartify("it's"), "it\u{2019}s");
        assert_eq!(smartify("'tis 'quoted'"), "\u{2018}tis \u{2018}quoted\u{2019}");
    }

    #[test]
    fn test_dashes_and_ellipsis() {
        assert_eq!(smartify("a -- b --- c..."), "a \u{2013} b \u{2014} c\u{2026}");
    }

    #[test]
    fn test_tags_untouched() {
        assert_eq!(
            smartify("<a href=\"http://x.org/a--b\" title='t'>\"link\"</a>"),
            "<a href=\"http://x.org/a--b\" title='t'>\u{201c}link\u{201d}</a>"
        );
    }

    #[test]
    fn test_quote_state_crosses_tags() {
        assert_eq!(
            smartify("<p>\"<em>emphatic</em>\"</p>"),
            "<p>\u{201c}<em>emphatic</em>\u{201d}</p>"
        );
    }

    #[test]
    fn test_quotes_reset_at_block_boundaries() {
        assert_eq!(
            smartify("<p>one</p><p>\"two\"</p>"),
            "<p>one</p><p>\u{201c}two\u{201d}</p>"
        );
        assert_eq!(
            smartify("<li>a</li><li>'b'</li>"),
            "<li>a</li><li>\u{2018}b\u{2019}</li>"
        );
        assert_eq!(smartify("line<br>\"next\""), "line<br>\u{201c}next\u{201d}");
        assert_eq!(
            smartify("<blockquote>x</blockquote>\"y\""),
            "<blockquote>x</blockquote>\u{201c}y\u{201d}"
        );
    }

    #[test]
    fn test_code_is_literal() {
        assert_eq!(
            smartify("<code>x -- \"y\"</code> and \"z\""),
            "<code>x -- \"y\"</code> and \u{201c}z\u{201d}"
        );
        assert_eq!(
            smartify("<pre><code>a...b</code>'c'</pre>..."),
            "<pre><code>a...b</code>'c'</pre>\u{2026}"
        );
    }

    #[test]
    fn test_bare_angle_bracket_is_text() {
        assert_eq!(smartify("1 < 2 \"ok\""), "1 < 2 \u{201c}ok\u{201d}");
    }
}
