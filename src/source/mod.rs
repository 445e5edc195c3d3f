//! Resource providers
//!
//! A provider delivers raw resource records. Discovery against the Azure
//! management API lives outside this crate; what ships here is the snapshot
//! file provider, which reads the JSON written by `az resource list` or
//! `az graph query` style exports.

use crate::models::RawResource;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Source of raw resource records
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ResourceProvider: Send + Sync {
    /// Fetch every record this provider knows about
    async fn fetch(&self) -> Result<Vec<RawResource>>;

    /// Short description used in error messages and logs
    fn describe(&self) -> String;
}

/// Snapshot layouts accepted on input
#[derive(Deserialize)]
#[serde(untagged)]
enum Snapshot {
    List(Vec<RawResource>),
    Envelope { value: Vec<RawResource> },
}

/// Parse snapshot JSON: a plain array of records or an ARM `{ "value": [...] }` envelope
pub fn parse_snapshot(content: &str) -> Result<Vec<RawResource>> {
    let snapshot: Snapshot = serde_json::from_str(content)
        .context("Expected a JSON array of resources or an object with a 'value' array")?;
    Ok(match snapshot {
        Snapshot::List(records) => records,
        Snapshot::Envelope { value } => value,
    })
}

/// Reads records from a JSON snapshot file
pub struct SnapshotFileProvider {
    file_path: PathBuf,
}

impl SnapshotFileProvider {
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        let file_path = file_path.into();
        tracing::debug!("Created snapshot provider: {:?}", file_path);
        Self { file_path }
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }
}

#[async_trait]
impl ResourceProvider for SnapshotFileProvider {
    async fn fetch(&self) -> Result<Vec<RawResource>> {
        tracing::debug!("Reading snapshot: {:?}", self.file_path);

        let content = tokio::fs::read_to_string(&self.file_path)
            .await
            .with_context(|| format!("Failed to read snapshot: {:?}", self.file_path))?;

        let records = parse_snapshot(&content)
            .with_context(|| format!("Failed to parse snapshot: {:?}", self.file_path))?;

        tracing::debug!(
            "Loaded {} records from {:?}",
            records.len(),
            self.file_path
        );
        Ok(records)
    }

    fn describe(&self) -> String {
        format!("snapshot {}", self.file_path.display())
    }
}

/// Fetch from all providers concurrently; records keep provider order
pub async fn collect(providers: &[Box<dyn ResourceProvider>]) -> Result<Vec<RawResource>> {
    let fetches = providers.iter().map(|provider| async move {
        provider
            .fetch()
            .await
            .with_context(|| format!("Failed to fetch from {}", provider.describe()))
    });

    let batches = futures::future::try_join_all(fetches).await?;
    let records: Vec<RawResource> = batches.into_iter().flatten().collect();
    tracing::info!(
        "Collected {} records from {} providers",
        records.len(),
        providers.len()
    );
    Ok(records)
}
