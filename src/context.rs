use std::path::{Path, PathBuf};

use anyhow::bail;

pub(crate) const DEFAULT_EXCERPT_LENGTH: usize = 150;
pub(crate) const DEFAULT_DESCRIPTION_LENGTH: usize = 160;

/// Everything one generation run needs; passed down explicitly.
#[derive(Debug, Clone)]
pub(crate) struct Context {
    pub blog_dir: PathBuf,
    pub projects_dir: PathBuf,
    pub blog_output: PathBuf,
    pub projects_output: PathBuf,

    pub excerpt_length: usize,
    pub description_length: usize,
    /// Derive entries but leave the output files alone.
    pub check_only: bool,
}

impl Context {
    /// Default layout of the site repository, relative to `root`.
    pub fn with_root(root: &Path) -> Self {
        let public = root.join("client").join("public");
        Self {
            blog_dir: public.join("blog"),
            projects_dir: public.join("projects"),
            blog_output: public.join("blog.json"),
            projects_output: public.join("projects.json"),
            excerpt_length: DEFAULT_EXCERPT_LENGTH,
            description_length: DEFAULT_DESCRIPTION_LENGTH,
            check_only: false,
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        for dir in [&self.blog_dir, &self.projects_dir] {
            if !dir.is_dir() {
                bail!("content directory {dir:?} must be a directory.");
            }
        }
        for out in [&self.blog_output, &self.projects_output] {
            if out.is_dir() {
                bail!("if {out:?} exists, it must be a file.");
            }
        }
        Ok(())
    }
}
