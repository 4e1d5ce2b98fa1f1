//! Allow-list HTML sanitizer.
//!
//! The input is parsed as an HTML fragment and re-serialized keeping only
//! allow-listed elements and attributes. Elements that can execute or embed
//! active content are removed together with everything inside them; any other
//! element outside the allow-list is unwrapped so its text survives.

use scraper::{ElementRef, Html, Node};

/// Elements removed along with their content
const DROPPED: &[&str] = &[
    "script", "style", "object", "embed", "iframe", "applet", "noscript", "template", "frame",
    "frameset", "form", "svg", "math", "head", "title", "base", "link", "meta",
];

/// Allowed elements and the attributes each may keep
const ALLOWED: &[(&str, &[&str])] = &[
    ("a", &["href", "title"]),
    ("abbr", &["title"]),
    ("acronym", &["title"]),
    ("b", &[]),
    ("blockquote", &["cite"]),
    ("br", &[]),
    ("cite", &[]),
    ("code", &["class"]),
    ("dd", &[]),
    ("del", &[]),
    ("dfn", &[]),
    ("dl", &[]),
    ("dt", &[]),
    ("em", &[]),
    ("h1", &[]),
    ("h2", &[]),
    ("h3", &[]),
    ("h4", &[]),
    ("h5", &[]),
    ("h6", &[]),
    ("hr", &[]),
    ("i", &[]),
    ("img", &["src", "alt", "title", "width", "height"]),
    ("ins", &[]),
    ("kbd", &[]),
    ("li", &[]),
    ("mark", &[]),
    ("ol", &["start"]),
    ("p", &[]),
    ("pre", &[]),
    ("q", &["cite"]),
    ("s", &[]),
    ("samp", &[]),
    ("small", &[]),
    ("strike", &[]),
    ("strong", &[]),
    ("sub", &[]),
    ("sup", &[]),
    ("table", &[]),
    ("tbody", &[]),
    ("td", &["colspan", "rowspan"]),
    ("tfoot", &[]),
    ("th", &["colspan", "rowspan"]),
    ("thead", &[]),
    ("tr", &[]),
    ("tt", &[]),
    ("u", &[]),
    ("ul", &[]),
    ("var", &[]),
];

const VOID: &[&str] = &["br", "hr", "img"];

const URL_ATTRIBUTES: &[&str] = &["href", "src", "cite"];

const SAFE_SCHEMES: &[&str] = &["http", "https", "mailto", "ftp"];

/// The `sanitize` transform
pub fn sanitize(input: &str) -> String {
    let fragment = Html::parse_fragment(input);
    let mut out = String::with_capacity(input.len());
    write_children(fragment.root_element(), &mut out);
    out
}

fn write_children(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => push_escaped_text(out, text),
            Node::Element(_) => {
                if let Some(child) = ElementRef::wrap(child) {
                    write_element(child, out);
                }
            }
            // Comments, doctypes and processing instructions are dropped
            _ => {}
        }
    }
}

fn write_element(element: ElementRef<'_>, out: &mut String) {
    let name = element.value().name();

    if DROPPED.contains(&name) {
        return;
    }

    let Some(allowed_attrs) = allowed_attributes(name) else {
        write_children(element, out);
        return;
    };

    out.push('<');
    out.push_str(name);
    for (attr, value) in element.value().attrs() {
        if !allowed_attrs.contains(&attr) {
            continue;
        }
        if URL_ATTRIBUTES.contains(&attr) && !is_safe_url(value) {
            continue;
        }
        out.push(' ');
        out.push_str(attr);
        out.push_str("=\"");
        push_escaped_attr(out, value);
        out.push('"');
    }
    out.push('>');

    if VOID.contains(&name) {
        return;
    }

    write_children(element, out);
    out.push_str("</");
    out.push_str(name);
    out.push('>');
}

fn allowed_attributes(name: &str) -> Option<&'static [&'static str]> {
    ALLOWED
        .iter()
        .find(|(element, _)| *element == name)
        .map(|(_, attrs)| *attrs)
}

/// Relative URLs and a few plain schemes pass; everything else
/// (`javascript:`, `data:`, `vbscript:`, ...) is refused.
fn is_safe_url(value: &str) -> bool {
    // Browsers ignore embedded whitespace and control characters in schemes
    let compact: String = value
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect::<String>()
        .to_ascii_lowercase();

    match compact.find(|c: char| matches!(c, ':' | '/' | '?' | '#')) {
        Some(idx) if compact[idx..].starts_with(':') => {
            SAFE_SCHEMES.contains(&&compact[..idx])
        }
        _ => true,
    }
}

fn push_escaped_text(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}

fn push_escaped_attr(out: &mut String, value: &str) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}
