//! Regex-based Markdown flattening.
//!
//! The output only feeds heuristics (excerpts, descriptions, reading time and
//! label-line detection), so it is approximate on purpose: there is no
//! Markdown parser behind it and nothing here is ever rendered.

use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};

static LEADING_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\A\s*#{1,6}\s+.*\n").unwrap());
static CODE_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    RegexBuilder::new(r"```.*?```")
        .dot_matches_new_line(true)
        .build()
        .unwrap()
});
static INLINE_CODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`[^`]*`").unwrap());
static IMAGE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"!\[[^\]]*\]\([^)]*\)").unwrap());
static LINK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\([^)]*\)").unwrap());
static EMPHASIS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[*_~]").unwrap());
static HEADING_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s{0,3}#{1,6}\s+").unwrap());
static BLOCKQUOTE_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s{0,3}>\s?").unwrap());
static LIST_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s{0,3}([-*+]|[0-9]+\.)\s+").unwrap());
static HORIZONTAL_RULE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*[-*_]{3,}\s*$").unwrap());
static TABLE_ROW: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^\s*\|.*\|\s*$").unwrap());
// "publish time" / "reading time" banners that posts carry in their body
static PUBLISH_INFO_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^.*(发布时间|阅读时间).*$\n?").unwrap());
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

static FIRST_HEADING_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*#{1,6}\s+.*$").unwrap());
static LINE_QUOTE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s{0,3}>\s?").unwrap());
static LINE_EMPHASIS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[*_`~]").unwrap());

pub(crate) fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n")
}

/// Flattens Markdown to a single line of plain text.
///
/// The substitutions run in a fixed order: code, images and links go before
/// emphasis markers so URLs are not mangled, and line-start markers are only
/// stripped once links have been replaced by their text.
pub(crate) fn strip_markdown(markdown: &str) -> String {
    let text = normalize_newlines(markdown);
    let text = LEADING_HEADING.replace(&text, "");
    let text = CODE_BLOCK.replace_all(&text, " ");
    let text = INLINE_CODE.replace_all(&text, " ");
    let text = IMAGE.replace_all(&text, " ");
    let text = LINK.replace_all(&text, "${1}");
    let text = EMPHASIS.replace_all(&text, "");
    let text = HEADING_MARKER.replace_all(&text, "");
    let text = BLOCKQUOTE_MARKER.replace_all(&text, "");
    let text = LIST_MARKER.replace_all(&text, "");
    let text = HORIZONTAL_RULE.replace_all(&text, " ");
    let text = TABLE_ROW.replace_all(&text, " ");
    let text = PUBLISH_INFO_LINE.replace_all(&text, " ");
    let text = WHITESPACE.replace_all(&text, " ");
    text.trim().to_string()
}

/// Drops everything before the first heading line. Text without a heading is
/// returned unchanged.
pub(crate) fn slice_from_first_heading(markdown: &str) -> &str {
    match FIRST_HEADING_LINE.find(markdown) {
        Some(m) => &markdown[m.start()..],
        None => markdown,
    }
}

/// One body line with its blockquote marker and inline emphasis/code marks
/// removed, ready for `Label: value` matching.
pub(crate) fn normalize_line(line: &str) -> String {
    let line = LINE_QUOTE.replace(line, "");
    let line = LINE_EMPHASIS.replace_all(&line, "");
    line.trim().to_string()
}
