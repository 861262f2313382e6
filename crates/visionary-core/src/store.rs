//! Persistent capsule storage using redb.
//!
//! # Table design
//!
//! A single `CAPSULES` table uses a 24-byte composite key:
//! ```text
//! [ created_at_ms: u64 big-endian (8 bytes) | uuid: 16 bytes ]
//! ```
//!
//! Big-endian timestamps in the high bytes make byte order equal creation
//! order, so a plain table scan lists capsules oldest first.

use std::path::Path;

use chrono::{DateTime, Utc};
use redb::{Database, ReadableTable, TableDefinition};
use uuid::Uuid;

use crate::capsule::Capsule;
use crate::error::{Result, VisionaryError};

// ---------------------------------------------------------------------------
// Table definition
// ---------------------------------------------------------------------------

/// Key: 24-byte composite (created_at_ms big-endian ++ uuid bytes)
/// Value: JSON-encoded Capsule
const CAPSULES: TableDefinition<&[u8], &[u8]> = TableDefinition::new("capsules");

fn capsule_key(created_at: DateTime<Utc>, id: Uuid) -> [u8; 24] {
    let mut key = [0u8; 24];
    let ms = created_at.timestamp_millis().max(0) as u64;
    key[..8].copy_from_slice(&ms.to_be_bytes());
    key[8..].copy_from_slice(id.as_bytes());
    key
}

fn store_err(e: impl std::fmt::Display) -> VisionaryError {
    VisionaryError::Store(e.to_string())
}

// ---------------------------------------------------------------------------
// CapsuleDb
// ---------------------------------------------------------------------------

pub struct CapsuleDb {
    db: Database,
}

impl CapsuleDb {
    /// Open or create the redb database at `path`.
    ///
    /// Creates the `CAPSULES` table if it doesn't already exist.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let db = Database::create(path).map_err(store_err)?;
        let wt = db.begin_write().map_err(store_err)?;
        wt.open_table(CAPSULES).map_err(store_err)?;
        wt.commit().map_err(store_err)?;
        Ok(Self { db })
    }

    pub fn insert(&self, capsule: &Capsule) -> Result<()> {
        self.put(capsule)
    }

    fn put(&self, capsule: &Capsule) -> Result<()> {
        let key = capsule_key(capsule.created_at, capsule.id);
        let value = serde_json::to_vec(capsule)?;
        let wt = self.db.begin_write().map_err(store_err)?;
        {
            let mut table = wt.open_table(CAPSULES).map_err(store_err)?;
            table
                .insert(key.as_slice(), value.as_slice())
                .map_err(store_err)?;
        }
        wt.commit().map_err(store_err)?;
        Ok(())
    }

    pub fn get(&self, id: Uuid) -> Result<Option<Capsule>> {
        let rt = self.db.begin_read().map_err(store_err)?;
        let table = rt.open_table(CAPSULES).map_err(store_err)?;
        let Some(key) = find_key(&table, id)? else {
            return Ok(None);
        };
        match table.get(key.as_slice()).map_err(store_err)? {
            Some(v) => Ok(Some(serde_json::from_slice(v.value())?)),
            None => Ok(None),
        }
    }

    /// All capsules, oldest first.
    ///
    /// Rows that no longer decode are logged and skipped so one bad record
    /// cannot hide the rest.
    pub fn list_all(&self) -> Result<Vec<Capsule>> {
        let rt = self.db.begin_read().map_err(store_err)?;
        let table = rt.open_table(CAPSULES).map_err(store_err)?;

        let mut result = Vec::new();
        for entry in table.iter().map_err(store_err)? {
            let (k, v) = entry.map_err(store_err)?;
            match serde_json::from_slice::<Capsule>(v.value()) {
                Ok(capsule) => result.push(capsule),
                Err(e) => {
                    tracing::warn!(key = ?k.value(), error = %e, "skipping undecodable capsule row");
                }
            }
        }
        Ok(result)
    }

    /// Capsules whose unseal email is due by `now` and not yet delivered.
    pub fn pending_unseal(&self, now: DateTime<Utc>) -> Result<Vec<Capsule>> {
        Ok(self
            .list_all()?
            .into_iter()
            .filter(|c| c.is_due(now))
            .collect())
    }

    /// Record that the unseal email for `id` was delivered at `at`.
    pub fn mark_unsealed(&self, id: Uuid, at: DateTime<Utc>) -> Result<()> {
        let mut capsule = self
            .get(id)?
            .ok_or_else(|| VisionaryError::CapsuleNotFound(id.to_string()))?;
        capsule.unsealed_at = Some(at);
        self.put(&capsule)
    }

    /// Delete the capsule `id`. Returns `false` if there was none.
    pub fn remove(&self, id: Uuid) -> Result<bool> {
        let wt = self.db.begin_write().map_err(store_err)?;
        let removed = {
            let mut table = wt.open_table(CAPSULES).map_err(store_err)?;
            match find_key(&table, id)? {
                Some(key) => {
                    table.remove(key.as_slice()).map_err(store_err)?;
                    true
                }
                None => false,
            }
        };
        wt.commit().map_err(store_err)?;
        Ok(removed)
    }
}

/// Locate the row key for `id` by comparing the uuid half of each key.
/// Values are not decoded.
fn find_key<T>(table: &T, id: Uuid) -> Result<Option<[u8; 24]>>
where
    T: ReadableTable<&'static [u8], &'static [u8]>,
{
    for entry in table.iter().map_err(store_err)? {
        let (k, _) = entry.map_err(store_err)?;
        let key = k.value();
        if key.len() == 24 && &key[8..] == id.as_bytes() {
            let mut found = [0u8; 24];
            found.copy_from_slice(key);
            return Ok(Some(found));
        }
    }
    Ok(None)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
