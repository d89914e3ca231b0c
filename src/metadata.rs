use std::collections::HashMap;

/// `key: value` pairs read from a frontmatter block.
///
/// Keys keep their case (`readingTime` stays `readingTime`). Values are stored
/// already cleaned; an empty value is treated as if the key were missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct FrontMatter {
    fields: HashMap<String, String>,
}

impl FrontMatter {
    pub fn insert(&mut self, key: &str, value: String) {
        self.fields.insert(key.to_string(), value);
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// First non-empty value among `keys`, in the given order.
    pub fn first_of(&self, keys: &[&str]) -> Option<&str> {
        keys.iter().find_map(|key| self.get(key))
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// A Markdown file split into its frontmatter and the text that follows it.
#[derive(Debug, Clone, Default)]
pub(crate) struct Document {
    pub metadata: FrontMatter,
    pub body: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_values_read_as_missing() {
        let mut fm = FrontMatter::default();
        fm.insert("title", "".to_string());
        assert_eq!(fm.get("title"), None);
        assert!(!fm.is_empty());
    }

    #[test]
    fn first_of_respects_key_order() {
        let mut fm = FrontMatter::default();
        fm.insert("repo", "https://example.com/repo".to_string());
        fm.insert("url", "https://example.com/url".to_string());
        assert_eq!(
            fm.first_of(&["link", "url", "repo"]),
            Some("https://example.com/url")
        );
        assert_eq!(fm.first_of(&["link"]), None);
    }
}
