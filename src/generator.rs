use std::path::Path;

use anyhow::Context as _;
use chrono::{DateTime, Local, NaiveDate};
use log::{debug, info, warn};

use crate::{
    context::Context,
    frontmatter::extract_frontmatter,
    heuristics::{
        format_date, pick_date, pick_description, pick_excerpt, pick_link, pick_reading_time,
        pick_tags, pick_title, remove_project_meta_lines,
    },
    markdown::{slice_from_first_heading, strip_markdown},
    metadata::FrontMatter,
};

mod data;
mod utils;

use data::{BlogEntry, ProjectEntry, SourceFile};
use utils::{sort_entry, write_manifest};

const TEMPLATE_FILE_NAME: &str = "template.md";

/// Counts reported after a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Summary {
    pub posts: usize,
    pub projects: usize,
}

/// Reads every publishable `*.md` file directly inside `dir`.
///
/// `template.md` (any case) is the authoring template and is skipped.
fn read_markdown_entries(dir: &Path) -> anyhow::Result<Vec<SourceFile>> {
    let mut files = vec![];
    for entry in std::fs::read_dir(dir).with_context(|| format!("while reading {dir:?}"))? {
        let entry = entry.with_context(|| format!("while reading {dir:?}"))?;
        let file_type = entry
            .file_type()
            .with_context(|| format!("while reading {dir:?}"))?;
        if !file_type.is_file() {
            continue;
        }
        let Ok(file_name) = entry.file_name().into_string() else {
            warn!("Skipping non UTF-8 file name {:?}", entry.file_name());
            continue;
        };
        let lower = file_name.to_lowercase();
        if !lower.ends_with(".md") || lower == TEMPLATE_FILE_NAME {
            continue;
        }

        let path = entry.path();
        let raw =
            std::fs::read_to_string(&path).with_context(|| format!("while reading {path:?}"))?;
        let file_meta =
            std::fs::metadata(&path).with_context(|| format!("while inspecting {path:?}"))?;
        files.push(SourceFile {
            id: file_name
                .strip_suffix(".md")
                .unwrap_or(&file_name)
                .to_string(),
            file_name,
            raw,
            file_meta,
        });
    }
    Ok(files)
}

fn modified_date(file: &SourceFile) -> Option<NaiveDate> {
    match file.file_meta.modified() {
        Ok(mtime) => Some(DateTime::<Local>::from(mtime).date_naive()),
        Err(e) => {
            warn!("No modification time for {}: {e}", file.file_name);
            None
        }
    }
}

fn entry_date(file: &SourceFile, metadata: &FrontMatter) -> String {
    let date = pick_date(metadata, modified_date(file));
    debug!(
        "{}: date {date:?} (from {})",
        file.file_name,
        if metadata.get("date").is_some() { "frontmatter" } else { "mtime" }
    );
    date.map(format_date).unwrap_or_default()
}

fn build_post(file: &SourceFile, excerpt_length: usize) -> BlogEntry {
    let doc = extract_frontmatter(&file.raw);
    let body = doc.body.trim();
    if doc.metadata.is_empty() {
        debug!("{}: no frontmatter", file.file_name);
    }
    let plain = strip_markdown(body);

    BlogEntry {
        id: file.id.clone(),
        title: pick_title(&doc.metadata, body, &file.id),
        excerpt: pick_excerpt(&doc.metadata, &plain, excerpt_length),
        date: entry_date(file, &doc.metadata),
        reading_time: pick_reading_time(&doc.metadata, &plain),
        details_file: file.file_name.clone(),
    }
}

fn build_project(file: &SourceFile, description_length: usize) -> ProjectEntry {
    let doc = extract_frontmatter(&file.raw);
    let body = doc.body.trim();
    if doc.metadata.is_empty() {
        debug!("{}: no frontmatter", file.file_name);
    }
    // label lines feed tags/link but must not leak into the description
    let project_body = remove_project_meta_lines(slice_from_first_heading(body));

    ProjectEntry {
        id: file.id.clone(),
        title: pick_title(&doc.metadata, body, &file.id),
        description: pick_description(&doc.metadata, &project_body, description_length),
        tags: pick_tags(&doc.metadata, body),
        link: pick_link(&doc.metadata, body),
        details_file: file.file_name.clone(),
        date: entry_date(file, &doc.metadata),
    }
}

/// Blog entries of `dir`, newest first.
pub(crate) fn collect_posts(dir: &Path, excerpt_length: usize) -> anyhow::Result<Vec<BlogEntry>> {
    let mut posts: Vec<BlogEntry> = read_markdown_entries(dir)?
        .iter()
        .map(|file| build_post(file, excerpt_length))
        .collect();
    posts.sort_by(sort_entry);
    Ok(posts)
}

/// Project entries of `dir`, newest first.
pub(crate) fn collect_projects(
    dir: &Path,
    description_length: usize,
) -> anyhow::Result<Vec<ProjectEntry>> {
    let mut projects: Vec<ProjectEntry> = read_markdown_entries(dir)?
        .iter()
        .map(|file| build_project(file, description_length))
        .collect();
    projects.sort_by(sort_entry);
    Ok(projects)
}

pub(crate) fn generate(ctx: &Context) -> anyhow::Result<Summary> {
    let posts = collect_posts(&ctx.blog_dir, ctx.excerpt_length)
        .context("while collecting blog posts")?;
    let projects = collect_projects(&ctx.projects_dir, ctx.description_length)
        .context("while collecting projects")?;

    if ctx.check_only {
        info!(
            "Checked {} posts in {:?} and {} projects in {:?}; nothing written",
            posts.len(),
            ctx.blog_dir,
            projects.len(),
            ctx.projects_dir
        );
    } else {
        write_manifest(&ctx.blog_output, &posts)
            .with_context(|| format!("while writing {:?}", ctx.blog_output))?;
        write_manifest(&ctx.projects_output, &projects)
            .with_context(|| format!("while writing {:?}", ctx.projects_output))?;
        info!("Generated {} posts -> {:?}", posts.len(), ctx.blog_output);
        info!("Generated {} projects -> {:?}", projects.len(), ctx.projects_output);
    }

    Ok(Summary {
        posts: posts.len(),
        projects: projects.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{fs, path::PathBuf};
    use tempfile::TempDir;

    struct Site {
        _tmp: TempDir,
        ctx: Context,
    }

    fn site() -> Site {
        let tmp = TempDir::new().unwrap();
        let ctx = Context::with_root(tmp.path());
        fs::create_dir_all(&ctx.blog_dir).unwrap();
        fs::create_dir_all(&ctx.projects_dir).unwrap();
        Site { _tmp: tmp, ctx }
    }

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    const HELLO: &str = "---\ntitle: Hello World\ndate: 2024-03-05\ntags: [foo, bar]\n---\nSome **content** here.\n";

    #[test]
    fn hello_post_end_to_end() {
        let site = site();
        write(&site.ctx.blog_dir, "hello.md", HELLO);

        let summary = generate(&site.ctx).unwrap();
        assert_eq!(summary, Summary { posts: 1, projects: 0 });

        let written = fs::read_to_string(&site.ctx.blog_output).unwrap();
        let expected = r#"[
  {
    "id": "hello",
    "title": "Hello World",
    "excerpt": "Some content here.",
    "date": "2024-03-05",
    "readingTime": 1,
    "detailsFile": "hello.md"
  }
]
"#;
        assert_eq!(written, expected);
        assert_eq!(fs::read_to_string(&site.ctx.projects_output).unwrap(), "[]\n");
    }

    #[test]
    fn project_without_frontmatter_mines_body() {
        let site = site();
        write(
            &site.ctx.projects_dir,
            "my-project.md",
            "# My Project\n\nA small tool.\n\n关键词: cli, tool\n\nSource at https://example.com/repo\n",
        );

        let projects = collect_projects(&site.ctx.projects_dir, 160).unwrap();
        assert_eq!(projects.len(), 1);
        let project = &projects[0];
        assert_eq!(project.id, "my-project");
        assert_eq!(project.title, "My Project");
        assert_eq!(project.tags, vec!["cli", "tool"]);
        assert_eq!(project.link.as_deref(), Some("https://example.com/repo"));
        assert_eq!(project.description, "A small tool. Source at https://example.com/repo");
        assert!(!project.description.contains("关键词"));
        assert_eq!(project.details_file, "my-project.md");
        // falls back to the file's modification date
        assert!(NaiveDate::parse_from_str(&project.date, "%Y-%m-%d").is_ok());
    }

    #[test]
    fn project_description_skips_text_before_heading() {
        let site = site();
        write(
            &site.ctx.projects_dir,
            "dup.md",
            "---\ndate: 2024/1/2\nrepo: https://example.com/dup\n---\nDup title line\n\n# Dup\n\n> Tags: a | b\n\nReal description.",
        );

        let projects = collect_projects(&site.ctx.projects_dir, 160).unwrap();
        let project = &projects[0];
        assert_eq!(project.title, "Dup");
        assert_eq!(project.description, "Real description.");
        assert_eq!(project.tags, vec!["a", "b"]);
        assert_eq!(project.link.as_deref(), Some("https://example.com/dup"));
        assert_eq!(project.date, "2024-01-02");
    }

    #[test]
    fn templates_and_other_files_are_skipped() {
        let site = site();
        write(&site.ctx.blog_dir, "Template.MD", HELLO);
        write(&site.ctx.projects_dir, "template.md", "# Template\n");
        write(&site.ctx.blog_dir, "notes.txt", "not markdown");
        fs::create_dir_all(site.ctx.blog_dir.join("drafts.md")).unwrap();
        write(&site.ctx.blog_dir, "Upper.MD", HELLO);

        let summary = generate(&site.ctx).unwrap();
        assert_eq!(summary, Summary { posts: 1, projects: 0 });

        let posts = collect_posts(&site.ctx.blog_dir, 150).unwrap();
        // only a literal lowercase suffix is cut from the id
        assert_eq!(posts[0].id, "Upper.MD");
        assert_eq!(posts[0].details_file, "Upper.MD");
    }

    #[test]
    fn posts_are_sorted_newest_first() {
        let site = site();
        write(&site.ctx.blog_dir, "y.md", "---\ndate: 2024-05-01\n---\nY");
        write(&site.ctx.blog_dir, "z.md", "---\ndate: 2023-12-31\n---\nZ");
        write(&site.ctx.blog_dir, "x.md", "---\ndate: 2024年5月1日\n---\nX");

        let posts = collect_posts(&site.ctx.blog_dir, 150).unwrap();
        let ids: Vec<&str> = posts.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["x", "y", "z"]);
        assert_eq!(posts[0].date, "2024-05-01");
    }

    #[test]
    fn post_fallbacks() {
        let site = site();
        let long_body = format!("# Heading Title\n\n{}", "词".repeat(450));
        write(&site.ctx.blog_dir, "long.md", &long_body);
        write(
            &site.ctx.blog_dir,
            "given.md",
            "---\ndate: 2022-02-02\nexcerpt: '  Hand written  '\nreadingTime: 12\n---\nbody",
        );

        let posts = collect_posts(&site.ctx.blog_dir, 150).unwrap();
        let long = posts.iter().find(|p| p.id == "long").unwrap();
        assert_eq!(long.title, "Heading Title");
        assert_eq!(long.excerpt, format!("{}...", "词".repeat(150)));
        assert_eq!(long.reading_time, 3);

        let given = posts.iter().find(|p| p.id == "given").unwrap();
        assert_eq!(given.title, "given");
        assert_eq!(given.excerpt, "Hand written");
        assert_eq!(given.reading_time, 12);
        assert_eq!(given.date, "2022-02-02");
    }

    #[test]
    fn check_mode_writes_nothing() {
        let site = site();
        let mut ctx = site.ctx.clone();
        ctx.check_only = true;
        write(&ctx.blog_dir, "hello.md", HELLO);

        let summary = generate(&ctx).unwrap();
        assert_eq!(summary.posts, 1);
        assert!(!ctx.blog_output.exists());
        assert!(!ctx.projects_output.exists());
    }

    #[test]
    fn missing_directory_is_fatal() {
        let site = site();
        fs::remove_dir_all(&site.ctx.projects_dir).unwrap();

        let err = generate(&site.ctx).unwrap_err();
        assert!(format!("{err:?}").contains("while collecting projects"));
    }

    #[test]
    fn unwritable_output_is_fatal() {
        let site = site();
        write(&site.ctx.blog_dir, "hello.md", HELLO);
        let mut ctx = site.ctx.clone();
        let blocker = write(&site.ctx.blog_dir, "not-a-dir", "");
        ctx.blog_output = blocker.join("blog.json");

        let err = generate(&ctx).unwrap_err();
        assert!(format!("{err:?}").contains("while writing"));
        assert!(!ctx.projects_output.exists());
    }
}
