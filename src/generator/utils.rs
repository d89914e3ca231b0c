use std::{
    cmp::Ordering,
    fs::OpenOptions,
    io::{BufWriter, Write},
    path::Path,
};

use anyhow::Context;
use chrono::NaiveDate;
use serde::Serialize;

use super::data::Dated;

/// Seconds since the epoch for a `YYYY-MM-DD` string; anything unparseable
/// counts as 0.
fn sort_timestamp(date: &str) -> i64 {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map_or(0, |dt| dt.and_utc().timestamp())
}

/// Newest first; same-day entries in ascending `id` order.
pub(super) fn sort_entry<T: Dated>(a: &T, b: &T) -> Ordering {
    sort_timestamp(b.date())
        .cmp(&sort_timestamp(a.date()))
        .then_with(|| a.id().cmp(b.id()))
}

/// Writes `entries` as pretty JSON (two-space indent) plus a trailing newline.
pub(super) fn write_manifest<T: Serialize>(path: &Path, entries: &[T]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("while creating {parent:?}"))?;
    }
    let fd = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)
        .with_context(|| format!("while opening {path:?}"))?;
    let mut writer = BufWriter::new(fd);
    serde_json::to_writer_pretty(&mut writer, entries)?;
    writer.write_all(b"\n")?;
    writer.flush()?;

    Ok(())
}
