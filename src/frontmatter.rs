use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};

use crate::{
    markdown::normalize_newlines,
    metadata::{Document, FrontMatter},
};

// pandoc-style metadata block: `---`, the block, `---`, then the body
static HEADER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    RegexBuilder::new(r"\A---\n(.*?)\n---\n?(.*)\z")
        .dot_matches_new_line(true)
        .build()
        .unwrap()
});

/// Trims `value` and peels off one layer of matching `"` or `'` quotes.
pub(crate) fn clean_value(value: &str) -> String {
    let trimmed = value.trim();
    for quote in ['"', '\''] {
        if trimmed.starts_with(quote) && trimmed.ends_with(quote) {
            let inner = trimmed.get(1..trimmed.len() - 1).unwrap_or("");
            return inner.trim().to_string();
        }
    }
    trimmed.to_string()
}

/// Splits a raw Markdown file into frontmatter and body.
///
/// Line endings are normalized and a leading BOM is dropped first. A file that
/// does not open with a complete `---` block is all body; this never fails.
pub(crate) fn extract_frontmatter(raw: &str) -> Document {
    let normalized = normalize_newlines(raw);
    let normalized = normalized
        .strip_prefix('\u{feff}')
        .unwrap_or(&normalized);

    let Some(caps) = HEADER_PATTERN.captures(normalized) else {
        return Document {
            metadata: FrontMatter::default(),
            body: normalized.to_string(),
        };
    };

    let mut metadata = FrontMatter::default();
    for line in caps[1].split('\n') {
        if line.trim().is_empty() {
            continue;
        }
        let Some((name, value)) = line.split_once(':') else {
            continue;
        };
        let name = name.trim();
        if name.is_empty() || value.is_empty() {
            continue;
        }
        metadata.insert(name, clean_value(value));
    }

    Document {
        metadata,
        body: caps[2].to_string(),
    }
}
