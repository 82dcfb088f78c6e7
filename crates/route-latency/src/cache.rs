use crate::record::AnalyzedRecords;
use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

/// Whole-file JSON copy of the analyzed records.
///
/// There is no invalidation: delete the file (or pass `--refresh`) to fetch again.
/// Writes are not atomic, a crash mid-write leaves a truncated file behind.
#[derive(Default)]
pub struct CacheManager {}

impl CacheManager {
    pub fn new() -> Self {
        Self {}
    }

    pub fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    pub fn load(&self, path: &Path) -> Result<AnalyzedRecords> {
        info!("Loading cache from JSON: {:?}", path);

        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read cache file: {path:?}"))?;
        let records: AnalyzedRecords = serde_json::from_str(&json).with_context(|| {
            format!("Cache file {path:?} is corrupt, delete it to fetch again")
        })?;

        info!("Cache loaded successfully: {} records", records.len());

        Ok(records)
    }

    pub fn save(&self, records: &AnalyzedRecords, path: &Path) -> Result<()> {
        info!("Saving cache to JSON: {:?}", path);

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create cache directory: {parent:?}"))?;
        }
        let json = serde_json::to_string(records)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write cache file: {path:?}"))?;

        info!("Cache saved successfully: {} records", records.len());

        Ok(())
    }
}
