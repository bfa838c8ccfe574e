use crate::core::io::Storage;
use crate::core::podcast::ScriptRecord;
use crate::services::synthesis::AudioAsset;
use anyhow::{Context, Result};
use log::{info, warn};
use std::path::Path;

/// File stem for an episode: whitespace runs become `_` and characters
/// that are not allowed in file names are dropped.
pub fn file_stem(title: &str) -> String {
    let stem = title
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .filter(|c| !matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|'))
        .collect::<String>();
    if stem.is_empty() {
        "podcast".to_string()
    } else {
        stem
    }
}

fn join(folder: &str, name: &str) -> String {
    Path::new(folder).join(name).to_string_lossy().to_string()
}

/// Writes exported files for finished episodes into one folder.
pub struct Exporter<'a> {
    storage: &'a dyn Storage,
    folder: String,
}

impl<'a> Exporter<'a> {
    pub fn new(storage: &'a dyn Storage, folder: impl Into<String>) -> Self {
        Self {
            storage,
            folder: folder.into(),
        }
    }

    pub async fn export_transcript(&self, record: &ScriptRecord) -> Result<String> {
        let path = join(&self.folder, &format!("{}_transcript.txt", file_stem(&record.title)));
        self.storage
            .write(&path, record.transcript.as_bytes())
            .await
            .with_context(|| format!("Failed to write transcript to {}", path))?;
        info!("Transcript saved to {}", path);
        Ok(path)
    }

    pub async fn export_audio(&self, record: &ScriptRecord, audio: &AudioAsset) -> Result<String> {
        let path = join(
            &self.folder,
            &format!("{}_podcast.{}", file_stem(&record.title), audio.format.extension()),
        );
        self.storage
            .write(&path, &audio.bytes)
            .await
            .with_context(|| format!("Failed to write audio to {}", path))?;
        info!("Audio saved to {} ({} bytes, {})", path, audio.bytes.len(), audio.media_type());
        Ok(path)
    }

    /// The full record as JSON, keyed by id so reruns of one title never
    /// overwrite each other.
    pub async fn export_record(&self, record: &ScriptRecord) -> Result<String> {
        let path = join(&self.folder, &format!("{}.json", record.id));
        let json = serde_json::to_string_pretty(record)?;
        self.storage
            .write(&path, json.as_bytes())
            .await
            .with_context(|| format!("Failed to write record to {}", path))?;
        Ok(path)
    }

    /// Previously exported records, newest first. Unreadable files are
    /// skipped.
    pub async fn load_records(&self) -> Result<Vec<ScriptRecord>> {
        let mut records = Vec::new();
        for path in self.storage.list(&self.folder).await? {
            if !path.ends_with(".json") {
                continue;
            }
            let bytes = self.storage.read(&path).await?;
            match serde_json::from_slice::<ScriptRecord>(&bytes) {
                Ok(record) => records.push(record),
                Err(e) => warn!("Skipping {}: {}", path, e),
            }
        }
        records.sort_by(|a, b| b.generated_at.cmp(&a.generated_at));
        Ok(records)
    }
}
