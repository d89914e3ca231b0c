//! Field extractors.
//!
//! Every extractor prefers the explicit frontmatter value and only then falls
//! back to mining the Markdown body. The chains are plain `Option` fallbacks:
//! the first step that yields something wins.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta};
use regex::Regex;

use crate::{
    frontmatter::clean_value,
    markdown::{normalize_line, normalize_newlines, strip_markdown},
    metadata::FrontMatter,
};

static TITLE_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^#{1,6}\s+(.+)\s*$").unwrap());
static TRAILING_HASHES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+#+$").unwrap());

static ISO_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]{4})[-/]([0-9]{1,2})[-/]([0-9]{1,2})").unwrap());
static CN_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]{4})\s*年\s*([0-9]{1,2})\s*月\s*([0-9]{1,2})\s*日").unwrap()
});
static LEADING_INT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*([+-]?[0-9]+)").unwrap());

// "项目关键词" = project keywords, "关键词" = keywords
static TAG_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(项目关键词|关键词|Tags?|Tag)\s*[:：]\s*(.+)$").unwrap()
});
// "源码仓库" = source repository, "仓库" = repository
static PROJECT_LABEL_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(项目关键词|关键词|Tags?|Tag|源码仓库|仓库|Repo|Repository)\s*[:：]").unwrap()
});
static MARKDOWN_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\[[^\]]+\]\((https?://[^)]+)\)").unwrap());
static BARE_URL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)https?://\S+").unwrap());

const WORDS_PER_MINUTE: usize = 200;

// alternative formats tried once the anchored patterns fail
const GENERIC_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];
const GENERIC_DATE_FORMATS: &[&str] = &[
    "%B %d, %Y",
    "%b %d, %Y",
    "%B %d %Y",
    "%b %d %Y",
    "%d %B %Y",
    "%d %b %Y",
    "%Y.%m.%d",
    "%m/%d/%Y",
];

pub(crate) fn pick_title(metadata: &FrontMatter, body: &str, fallback: &str) -> String {
    if let Some(title) = metadata.get("title") {
        return title.to_string();
    }
    match TITLE_HEADING.captures(body) {
        Some(caps) => TRAILING_HASHES.replace(caps[1].trim(), "").into_owned(),
        None => fallback.to_string(),
    }
}

/// Splits a tag list such as `[a, b]`, `a, b`, `a，b` or `a | b`.
pub(crate) fn parse_tags(value: &str) -> Vec<String> {
    let raw = value.trim();
    if raw.is_empty() {
        return vec![];
    }
    let fragments: Vec<&str> = if raw.starts_with('[') && raw.ends_with(']') {
        // a lone `[` both starts and ends the value
        raw.get(1..raw.len() - 1).unwrap_or("").split(',').collect()
    } else {
        raw.split([',', '，', '|']).collect()
    };
    fragments
        .into_iter()
        .map(clean_value)
        .filter(|tag| !tag.is_empty())
        .collect()
}

/// Tags from the first `Tags: ...` / `关键词：...` line of the body.
pub(crate) fn extract_inline_tags(body: &str) -> Vec<String> {
    normalize_newlines(body)
        .split('\n')
        .map(normalize_line)
        .find_map(|line| TAG_LINE.captures(&line).map(|caps| parse_tags(&caps[2])))
        .unwrap_or_default()
}

pub(crate) fn pick_tags(metadata: &FrontMatter, body: &str) -> Vec<String> {
    let tags = metadata
        .first_of(&["tags", "tag"])
        .map(parse_tags)
        .unwrap_or_default();
    if tags.is_empty() {
        extract_inline_tags(body)
    } else {
        tags
    }
}

/// First `http(s)` URL in the body: a Markdown link target wins over a bare
/// URL on the same line.
pub(crate) fn extract_inline_link(body: &str) -> Option<String> {
    normalize_newlines(body)
        .split('\n')
        .map(normalize_line)
        .find_map(|line| {
            if let Some(caps) = MARKDOWN_LINK.captures(&line) {
                return Some(caps[1].trim().to_string());
            }
            BARE_URL
                .find(&line)
                .map(|m| m.as_str().trim_end_matches([')', ',', '.']).to_string())
        })
}

pub(crate) fn pick_link(metadata: &FrontMatter, body: &str) -> Option<String> {
    metadata
        .first_of(&["link", "url", "repo"])
        .map(str::to_string)
        .or_else(|| extract_inline_link(body))
        .filter(|link| !link.is_empty())
}

/// Drops `Tags:` / `Repo:` style label lines so they do not end up in a
/// derived description.
pub(crate) fn remove_project_meta_lines(body: &str) -> String {
    normalize_newlines(body)
        .split('\n')
        .filter(|line| !PROJECT_LABEL_LINE.is_match(&normalize_line(line)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Builds a date from year/month/day captures. Out-of-range months and days
/// roll over into the neighbouring months (`2024-02-30` is `2024-03-01`).
fn ymd(caps: &regex::Captures) -> Option<NaiveDate> {
    let year: i32 = caps[1].parse().ok()?;
    let month: i32 = caps[2].parse().ok()?;
    let day: i64 = caps[3].parse().ok()?;
    let months = year * 12 + month - 1;
    let month_index = months.rem_euclid(12) as u32;
    let first = NaiveDate::from_ymd_opt(months.div_euclid(12), month_index + 1, 1)?;
    first.checked_add_signed(TimeDelta::try_days(day - 1)?)
}

fn parse_generic_date(value: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(value) {
        return Some(dt.date_naive());
    }
    GENERIC_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .map(|dt| dt.date())
        .or_else(|| {
            GENERIC_DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
        })
}

/// Parses a frontmatter date.
///
/// `2024-3-5` / `2024/03/05` and `2024年3月5日` are recognised at the start of
/// the string (trailing text such as a time is ignored); an out-of-range month
/// or day rolls over instead of failing. Anything else goes to a best-effort
/// parser for RFC 3339, RFC 2822 and a few spelled-out forms.
pub(crate) fn parse_date_string(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    ISO_DATE
        .captures(trimmed)
        .and_then(|caps| ymd(&caps))
        .or_else(|| CN_DATE.captures(trimmed).and_then(|caps| ymd(&caps)))
        .or_else(|| parse_generic_date(trimmed))
}

pub(crate) fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// `date` from the frontmatter, else the file's modification date.
pub(crate) fn pick_date(metadata: &FrontMatter, modified: Option<NaiveDate>) -> Option<NaiveDate> {
    metadata
        .get("date")
        .and_then(parse_date_string)
        .or(modified)
}

/// `parseInt`-style: leading sign and digits, anything after is ignored.
/// Only positive values are accepted.
pub(crate) fn parse_reading_time(value: &str) -> Option<u32> {
    let caps = LEADING_INT.captures(value)?;
    let minutes: i64 = caps[1].parse().ok()?;
    u32::try_from(minutes).ok().filter(|m| *m >= 1)
}

fn is_cjk(c: char) -> bool {
    ('\u{4e00}'..='\u{9fff}').contains(&c)
}

/// Minutes to read `plain`: each CJK ideograph and each remaining
/// whitespace-separated word counts once, at 200 per minute, at least 1.
pub(crate) fn reading_time(plain: &str) -> u32 {
    let cjk = plain.chars().filter(|c| is_cjk(*c)).count();
    let words = plain
        .split(|c: char| c.is_whitespace() || is_cjk(c))
        .filter(|word| !word.is_empty())
        .count();
    let minutes = (cjk + words).div_ceil(WORDS_PER_MINUTE).max(1);
    u32::try_from(minutes).unwrap_or(u32::MAX)
}

pub(crate) fn pick_reading_time(metadata: &FrontMatter, plain: &str) -> u32 {
    metadata
        .get("readingTime")
        .and_then(parse_reading_time)
        .unwrap_or_else(|| reading_time(plain))
}

/// First `length` characters of `plain`, with `...` appended when cut.
pub(crate) fn generate_excerpt(plain: &str, length: usize) -> String {
    match plain.char_indices().nth(length) {
        Some((cut, _)) => format!("{}...", &plain[..cut]),
        None => plain.to_string(),
    }
}

pub(crate) fn pick_excerpt(metadata: &FrontMatter, plain: &str, length: usize) -> String {
    match metadata.get("excerpt") {
        Some(excerpt) => excerpt.trim().to_string(),
        None => generate_excerpt(plain, length),
    }
}

/// `description`, `summary` or `excerpt` from the frontmatter, else the
/// flattened project body cut to `length`.
pub(crate) fn pick_description(metadata: &FrontMatter, project_body: &str, length: usize) -> String {
    match metadata.first_of(&["description", "summary", "excerpt"]) {
        Some(direct) => direct.trim().to_string(),
        None => generate_excerpt(&strip_markdown(project_body), length),
    }
}
