//! Sled-based planning store for content ideas.
//!
//! Generation never writes here; callers add ideas explicitly.

use chrono::{DateTime, NaiveDate, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("database error: {0}")]
    DbError(#[from] sled::Error),
    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
    #[error("planned content not found: {0}")]
    NotFound(u64),
    #[error("planned content needs a name")]
    EmptyName,
}

/// Platform a planned piece of content targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum PlanPlatform {
    #[value(name = "youtube")]
    YouTube,
    #[value(name = "reels")]
    Reels,
    #[value(name = "tiktok")]
    TikTok,
    #[value(name = "shorts")]
    Shorts,
}

/// Production stage of planned content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
pub enum PlanStatus {
    #[default]
    Idea,
    Production,
    Recorded,
    Edited,
    Ready,
}

impl fmt::Display for PlanPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PlanPlatform::YouTube => "YouTube",
            PlanPlatform::Reels => "Reels",
            PlanPlatform::TikTok => "TikTok",
            PlanPlatform::Shorts => "Shorts",
        })
    }
}

impl fmt::Display for PlanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PlanStatus::Idea => "Idea",
            PlanStatus::Production => "Production",
            PlanStatus::Recorded => "Recorded",
            PlanStatus::Edited => "Edited",
            PlanStatus::Ready => "Ready",
        })
    }
}

/// A planned piece of content with metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannedContent {
    pub id: u64,
    pub name: String,
    pub platform: PlanPlatform,
    /// Target publishing date
    #[serde(default)]
    pub date: Option<NaiveDate>,
    pub status: PlanStatus,
    pub created_at: DateTime<Utc>,
}

/// Fields for a new planned item
#[derive(Debug, Clone)]
pub struct NewPlannedContent {
    pub name: String,
    pub platform: PlanPlatform,
    pub date: Option<NaiveDate>,
    pub status: PlanStatus,
}

/// Sled-based storage for planned content.
///
/// Items are keyed by a sled-generated id in big-endian form.
pub struct Storage {
    db: sled::Db,
}

impl Storage {
    /// Open or create storage at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let db = sled::open(path)?;
        Ok(Self { db })
    }

    /// Store a new planned item and return it
    pub fn create(&self, new: NewPlannedContent) -> Result<PlannedContent, StorageError> {
        let name = new.name.trim();
        if name.is_empty() {
            return Err(StorageError::EmptyName);
        }

        let item = PlannedContent {
            id: self.db.generate_id()?,
            name: name.to_string(),
            platform: new.platform,
            date: new.date,
            status: new.status,
            created_at: Utc::now(),
        };
        self.put(&item)?;
        Ok(item)
    }

    /// Retrieve an item by id
    pub fn get(&self, id: u64) -> Result<Option<PlannedContent>, StorageError> {
        match self.db.get(id.to_be_bytes())? {
            Some(data) => Ok(Some(serde_json::from_slice(&data)?)),
            None => Ok(None),
        }
    }

    /// List all planned items, newest first
    pub fn list(&self) -> Result<Vec<PlannedContent>, StorageError> {
        let mut results = Vec::new();
        for item in self.db.iter() {
            let (_key, value) = item?;
            let stored: PlannedContent = serde_json::from_slice(&value)?;
            results.push(stored);
        }
        results.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(results)
    }

    /// Move an item to a new production stage
    pub fn update_status(
        &self,
        id: u64,
        status: PlanStatus,
    ) -> Result<PlannedContent, StorageError> {
        let mut item = self.get(id)?.ok_or(StorageError::NotFound(id))?;
        item.status = status;
        self.put(&item)?;
        Ok(item)
    }

    /// Delete an item by id
    pub fn delete(&self, id: u64) -> Result<bool, StorageError> {
        let existed = self.db.remove(id.to_be_bytes())?.is_some();
        self.db.flush()?;
        Ok(existed)
    }

    fn put(&self, item: &PlannedContent) -> Result<(), StorageError> {
        let value = serde_json::to_vec(item)?;
        self.db.insert(item.id.to_be_bytes(), value)?;
        self.db.flush()?;
        Ok(())
    }
}
