//! Persistence of records, batch aggregates and media files.

use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::types::{ContentRecord, MediaAsset, RecordKind};
use crate::Result;

static UNSAFE_FILE_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9._-]").expect("file name pattern is valid"));

/// Replace every character outside `[A-Za-z0-9._-]` with `_`.
///
/// Leading dots are replaced too so a subject can never produce a hidden
/// file or a `..` path component.
pub fn sanitize_file_stem(subject: &str) -> String {
    let cleaned = UNSAFE_FILE_CHARS.replace_all(subject.trim(), "_");
    let cleaned = cleaned.trim_start_matches('.');
    let dots = subject.trim().len() - subject.trim().trim_start_matches('.').len();
    let stem = format!("{}{}", "_".repeat(dots), cleaned);
    if stem.is_empty() {
        "_".to_string()
    } else {
        stem
    }
}

/// Writes everything under one output root.
///
/// ```text
/// <root>/<id>.json, analogies.json          shape analogies
/// <root>/images/                            shape images, topic diagrams
/// <root>/packages/<title>.json, educational_packages_batch.json
/// <root>/metadata/<concept>.json, animation_batch_results.json
/// <root>/animations/                        animation media
/// ```
#[derive(Debug, Clone)]
pub struct OutputWriter {
    root: PathBuf,
}

impl OutputWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn record_dir(&self, kind: RecordKind) -> PathBuf {
        match kind.record_dir() {
            "" => self.root.clone(),
            sub => self.root.join(sub),
        }
    }

    pub fn media_dir(&self, sub: &str) -> PathBuf {
        self.root.join(sub)
    }

    pub fn record_path(&self, record: &ContentRecord) -> PathBuf {
        self.record_dir(record.kind())
            .join(format!("{}.json", sanitize_file_stem(record.file_stem())))
    }

    pub async fn write_record(&self, record: &ContentRecord) -> Result<PathBuf> {
        let path = self.record_path(record);
        write_json(&path, record).await?;
        debug!(path = %path.display(), id = record.id(), "record written");
        Ok(path)
    }

    pub async fn write_aggregate(&self, kind: RecordKind, records: &[ContentRecord]) -> Result<PathBuf> {
        let path = self.record_dir(kind).join(kind.aggregate_file());
        write_json(&path, &records).await?;
        info!(path = %path.display(), count = records.len(), "aggregate written");
        Ok(path)
    }

    /// Store a file asset under `dir`. Remote assets are left alone.
    pub async fn write_media(&self, dir: &Path, asset: &MediaAsset) -> Result<Option<PathBuf>> {
        match asset {
            MediaAsset::Remote(_) => Ok(None),
            MediaAsset::File { file_name, bytes } => {
                tokio::fs::create_dir_all(dir).await?;
                let path = dir.join(file_name);
                tokio::fs::write(&path, bytes).await?;
                debug!(path = %path.display(), bytes = bytes.len(), "media written");
                Ok(Some(path))
            }
        }
    }

    /// Copy an already written media file to `to`. A no-op when both paths
    /// are the same.
    pub async fn copy_media(&self, from: &Path, to: &Path) -> Result<PathBuf> {
        if from != to {
            if let Some(parent) = to.parent() {
                tokio::fs::create_dir_all(parent).await?;
            }
            tokio::fs::copy(from, to).await?;
            debug!(from = %from.display(), to = %to.display(), "media copied");
        }
        Ok(to.to_path_buf())
    }
}

async fn write_json<T: serde::Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    let mut body = serde_json::to_vec_pretty(value)?;
    body.push(b'\n');
    tokio::fs::write(path, body).await?;
    Ok(())
}
