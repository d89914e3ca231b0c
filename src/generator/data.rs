use serde::Serialize;
use std::fs::Metadata as FileMetadata;

/// A Markdown file as read from a content directory.
#[derive(Debug, Clone)]
pub(super) struct SourceFile {
    /// File name without the `.md` suffix.
    pub id: String,
    pub file_name: String,
    pub raw: String,
    pub file_meta: FileMetadata,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BlogEntry {
    pub id: String,
    pub title: String,
    pub excerpt: String,
    pub date: String,
    pub reading_time: u32,
    pub details_file: String,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProjectEntry {
    pub id: String,
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    pub details_file: String,
    pub date: String,
}

/// What the manifest ordering needs to know about an entry.
pub(crate) trait Dated {
    fn id(&self) -> &str;
    /// `YYYY-MM-DD`, or empty when no date could be determined.
    fn date(&self) -> &str;
}

impl Dated for BlogEntry {
    fn id(&self) -> &str {
        &self.id
    }

    fn date(&self) -> &str {
        &self.date
    }
}

impl Dated for ProjectEntry {
    fn id(&self) -> &str {
        &self.id
    }

    fn date(&self) -> &str {
        &self.date
    }
}
