use std::path::Path;

use anyhow::Context as _;

use crate::formats::HistoryRecord;

/// Loads generation history, migrating it from `legacy` on first use.
/// A missing file at both locations is an empty history.
pub fn load(primary: &Path, legacy: &Path) -> anyhow::Result<Vec<HistoryRecord>> {
    if let Some(history) = read_json(primary)? {
        return Ok(history);
    }

    let Some(history): Option<Vec<HistoryRecord>> = read_json(legacy)? else {
        return Ok(Vec::new());
    };
    tracing::info!(
        from = %legacy.display(),
        to = %primary.display(),
        records = history.len(),
        "migrating generation history"
    );
    save(primary, &history).context("migrate legacy history")?;
    Ok(history)
}

pub fn save(path: &Path, history: &[HistoryRecord]) -> anyhow::Result<()> {
    write_json_atomic(path, &history)
}

/// Puts `record` first and drops any older record with the same slug.
pub fn record(history: Vec<HistoryRecord>, record: HistoryRecord) -> Vec<HistoryRecord> {
    let mut updated = Vec::with_capacity(history.len() + 1);
    let slug = record.slug.clone();
    updated.push(record);
    updated.extend(history.into_iter().filter(|entry| entry.slug != slug));
    updated
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<Option<T>> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err).with_context(|| format!("read: {}", path.display())),
    };
    let value =
        serde_json::from_slice(&bytes).with_context(|| format!("parse: {}", path.display()))?;
    Ok(Some(value))
}

fn write_json_atomic<T: serde::Serialize>(path: &Path, value: &T) -> anyhow::Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| anyhow::anyhow!("path has no parent: {}", path.display()))?;
    std::fs::create_dir_all(parent)
        .with_context(|| format!("create parent dir: {}", parent.display()))?;

    let tmp_path = path.with_extension(format!("tmp.{}", uuid::Uuid::new_v4().simple()));
    let data = serde_json::to_vec_pretty(value).context("serialize json")?;
    std::fs::write(&tmp_path, &data)
        .with_context(|| format!("write tmp: {}", tmp_path.display()))?;
    std::fs::rename(&tmp_path, path)
        .with_context(|| format!("rename tmp to final: {}", path.display()))?;
    Ok(())
}
