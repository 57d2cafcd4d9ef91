//! Artifact persistence
//!
//! Each successfully scraped title produces two co-named files in the output
//! directory: `<normalized_title>.txt` with the flattened script text and
//! `<normalized_title>.meta` with the original input line. Artifacts are
//! created once and never mutated; the metadata file's existence is the
//! pipeline's idempotence marker.

use std::path::{Path, PathBuf};

use tokio::fs::File;
use tokio::io::AsyncWriteExt;

use crate::error::PersistError;

/// Writes and probes per-title artifacts in a fixed output directory
#[derive(Clone, Debug)]
pub struct ArtifactStore {
    output_dir: PathBuf,
}

impl ArtifactStore {
    /// Create a store rooted at `output_dir`
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Path of the text artifact for a normalized title
    pub fn txt_path(&self, normalized_title: &str) -> PathBuf {
        self.output_dir.join(format!("{}.txt", normalized_title))
    }

    /// Path of the metadata artifact for a normalized title
    pub fn meta_path(&self, normalized_title: &str) -> PathBuf {
        self.output_dir.join(format!("{}.meta", normalized_title))
    }

    /// Whether the metadata artifact already exists
    ///
    /// This is the sole idempotence marker: if it exists the whole item is
    /// skipped, including the fetch. The check-then-create sequence is not
    /// atomic against a duplicate title in the same run; titles are assumed
    /// unique per run.
    pub async fn meta_exists(&self, normalized_title: &str) -> bool {
        tokio::fs::try_exists(self.meta_path(normalized_title))
            .await
            .unwrap_or(false)
    }

    /// Create the text artifact and write the flattened content verbatim
    pub async fn write_script(
        &self,
        normalized_title: &str,
        content: &str,
    ) -> Result<(), PersistError> {
        let path = self.txt_path(normalized_title);
        let mut file = File::create(&path)
            .await
            .map_err(|source| PersistError::TxtOpen {
                path: path.clone(),
                source,
            })?;
        write_and_flush(&mut file, content.as_bytes(), &path)
            .await
            .map_err(|source| PersistError::TxtWrite { path, source })
    }

    /// Create the metadata artifact and write the raw input line plus a
    /// trailing newline
    pub async fn write_meta(
        &self,
        normalized_title: &str,
        raw_line: &str,
    ) -> Result<(), PersistError> {
        let path = self.meta_path(normalized_title);
        let mut file = File::create(&path)
            .await
            .map_err(|source| PersistError::MetaOpen {
                path: path.clone(),
                source,
            })?;
        let record = format!("{}\n", raw_line);
        write_and_flush(&mut file, record.as_bytes(), &path)
            .await
            .map_err(|source| PersistError::MetaWrite { path, source })
    }
}

async fn write_and_flush(file: &mut File, bytes: &[u8], path: &Path) -> std::io::Result<()> {
    file.write_all(bytes).await?;
    file.flush().await?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "wrote artifact");
    Ok(())
}
