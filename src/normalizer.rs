//! Textual pre-pass run on raw markup before it reaches the HTML parser.
//!
//! This is deliberately shallow: the transparent wrapper tags are removed by regex, not by
//! structural unwrapping. Known limitations:
//!
//! - an opening tag whose attributes span a newline is not matched and survives to the parser
//!   (which then reports it as an unknown node)
//! - `<div.*?>` style matching also eats tags that merely *start* with a stripped name, e.g.
//!   `<mainframe>`
//! - tag-like text inside comments or attribute values is stripped all the same
//! - matching is case-sensitive, so `<DIV>` is left alone
//! - lines are split with [`str::lines`], so a `\r\n` ending counts as a plain line break and a
//!   tag line followed by `\r` still passes through unwrapped instead of being put in a `<p>`

use once_cell::sync::Lazy;
use regex::Regex;

/// Tags treated as carrying no content of their own
pub const TRANSPARENT_TAGS: [&str; 3] = ["div", "main", "br"];

static RE_TRANSPARENT_OPEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!("<(?:{}).*?>", TRANSPARENT_TAGS.join("|"))).unwrap()
});
static RE_TRANSPARENT_CLOSE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!("</(?:{})>", TRANSPARENT_TAGS.join("|"))).unwrap()
});

/// Removes transparent wrapper tags, then turns every non-blank line that does not already look
/// like a tag into a paragraph, concatenating everything into a single line.
pub fn normalize(html: &str) -> String {
    let stripped = strip_transparent_tags(html);
    let mut normalized = String::with_capacity(stripped.len());
    for line in stripped.lines() {
        if line.trim().is_empty() {
            continue;
        }
        if line.starts_with('<') && line.ends_with('>') {
            normalized.push_str(line);
        } else {
            normalized.push_str("<p>");
            normalized.push_str(line);
            normalized.push_str("</p>");
        }
    }
    normalized
}

pub fn strip_transparent_tags(html: &str) -> String {
    let without_open = RE_TRANSPARENT_OPEN.replace_all(html, "");
    RE_TRANSPARENT_CLOSE
        .replace_all(&without_open, "")
        .into_owned()
}

/// Places a normalized fragment inside a full document so the parser puts it in `<body>`
pub fn wrap_document(fragment: &str) -> String {
    format!("<!DOCTYPE html><body>{}</body>", fragment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::div("<div class=\"x\"><p>a</p></div>", "<p>a</p>")]
    #[case::main("<main><p>a</p></main>", "<p>a</p>")]
    #[case::br("<p>a<br>b<br/></p>", "<p>ab</p>")]
    #[case::nested("<div><div id=\"y\">t</div></div>", "t")]
    fn strips_transparent_tags(#[case] html: &str, #[case] expected: &str) {
        assert_eq!(strip_transparent_tags(html), expected)
    }

    #[test]
    fn leaves_uppercase_tags() {
        assert_eq!(strip_transparent_tags("<DIV>a</DIV>"), "<DIV>a</DIV>")
    }

    #[test]
    fn bare_lines_become_paragraphs() {
        assert_eq!(
            normalize("First line\n\n   \nSecond line\n"),
            "<p>First line</p><p>Second line</p>"
        )
    }

    #[test]
    fn tag_lines_pass_through() {
        assert_eq!(
            normalize("<h1>Title</h1>\nSome text\n<p>Para</p>"),
            "<h1>Title</h1><p>Some text</p><p>Para</p>"
        )
    }

    #[test]
    fn partial_tag_lines_are_wrapped() {
        // starts with a tag but trails off into text
        assert_eq!(normalize("<b>bold</b> tail"), "<p><b>bold</b> tail</p>")
    }

    #[test]
    fn windows_line_endings() {
        assert_eq!(normalize("<p>a</p>\r\nb\r\n"), "<p>a</p><p>b</p>")
    }

    #[test]
    fn wrapped_lines_from_divs() {
        assert_eq!(
            normalize("<div>\n<p>a</p>\n</div>\n<div>plain</div>"),
            "<p>a</p><p>plain</p>"
        )
    }

    #[test]
    fn document_wrapper() {
        assert_eq!(
            wrap_document("<p>a</p>"),
            "<!DOCTYPE html><body><p>a</p></body>"
        )
    }
}
