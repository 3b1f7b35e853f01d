use crate::core::tree::PatternTree;
use crate::domain::model::{BrowscapVersion, Properties};
use crate::domain::ports::Storage;
use crate::utils::error::{BrowscapError, Result};
use serde::{Deserialize, Serialize};

pub const CACHE_FILE: &str = "cache.json";

/// Converted browscap data: the optimized pattern tree and the property rows
/// its full nodes point at.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Database {
    pub version: Option<BrowscapVersion>,
    pub tree: PatternTree,
    pub properties: Vec<Properties>,
}

impl Database {
    pub fn properties(&self, entry: usize) -> Option<&Properties> {
        self.properties.get(entry)
    }

    pub async fn save<S: Storage>(&self, storage: &S) -> Result<()> {
        let data = serde_json::to_vec(self)?;
        storage.write_file(CACHE_FILE, &data).await?;
        tracing::debug!(
            "Wrote {} patterns ({} bytes) to {}",
            self.tree.len(),
            data.len(),
            storage.location(CACHE_FILE)
        );
        Ok(())
    }

    pub async fn load<S: Storage>(storage: &S) -> Result<Self> {
        if !storage.exists(CACHE_FILE).await {
            return Err(BrowscapError::CacheNotFound {
                path: storage.location(CACHE_FILE),
            });
        }
        let data = storage.read_file(CACHE_FILE).await?;
        let mut database: Database = serde_json::from_slice(&data)?;
        if !database.tree.is_optimized() {
            database.tree.optimize();
        }
        tracing::debug!(
            "Loaded {} patterns from {}",
            database.tree.len(),
            storage.location(CACHE_FILE)
        );
        Ok(database)
    }
}

/// Accumulates property rows in file order.
#[derive(Debug, Default)]
pub struct DatabaseBuilder {
    tree: PatternTree,
    properties: Vec<Properties>,
    duplicates: usize,
}

impl DatabaseBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one row. Rows without a `PropertyName` are rejected; a pattern
    /// seen before is reported as `DuplicatePattern` and not stored.
    pub fn add(&mut self, properties: Properties) -> Result<()> {
        let pattern = properties
            .pattern()
            .ok_or_else(|| BrowscapError::InvalidCsv {
                record: self.properties.len() as u64,
                message: "row has no PropertyName".to_string(),
            })?
            .to_string();

        let entry = self.properties.len();
        if let Err(e) = self.tree.insert(&pattern, entry) {
            self.duplicates += 1;
            return Err(e);
        }
        self.properties.push(properties);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn duplicates(&self) -> usize {
        self.duplicates
    }

    pub fn finish(mut self, version: Option<BrowscapVersion>) -> Database {
        self.tree.optimize();
        Database {
            version,
            tree: self.tree,
            properties: self.properties,
        }
    }
}
