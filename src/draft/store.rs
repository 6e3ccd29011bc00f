//! Draft persistence: one ordered list of snapshots under the
//! `recipeDrafts` record, upserted by draft identity.

use chrono::{DateTime, Utc};
use recipebook_common::{DraftIdentity, RecipeDraft};
use serde::{Deserialize, Serialize};

use super::storage::LocalStorage;
use crate::errors::DraftError;

/// Record name the draft list is stored under.
pub const DRAFTS_KEY: &str = "recipeDrafts";

/// A saved snapshot and the identity it is keyed by.
#[derive(Debug, Clone, PartialEq)]
pub struct DraftRecord {
    pub identity: DraftIdentity,
    pub snapshot: RecipeDraft,
    pub saved_at: DateTime<Utc>,
}

/// Wire form of one list entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredDraft {
    #[serde(default)]
    id: Option<String>,
    #[serde(rename = "tempId", default)]
    temp_id: Option<i64>,
    #[serde(flatten)]
    snapshot: RecipeDraft,
    #[serde(rename = "savedAt", default = "Utc::now")]
    saved_at: DateTime<Utc>,
}

impl StoredDraft {
    fn identity(&self) -> Option<DraftIdentity> {
        match (&self.id, self.temp_id) {
            (Some(id), _) => Some(DraftIdentity::Recipe(id.clone())),
            (None, Some(temp)) => Some(DraftIdentity::Temp(temp)),
            (None, None) => None,
        }
    }

    fn into_record(self) -> Option<DraftRecord> {
        let identity = self.identity()?;
        Some(DraftRecord {
            identity,
            snapshot: self.snapshot,
            saved_at: self.saved_at,
        })
    }
}

impl From<&DraftRecord> for StoredDraft {
    fn from(record: &DraftRecord) -> Self {
        let (id, temp_id) = match &record.identity {
            DraftIdentity::Recipe(id) => (Some(id.clone()), None),
            DraftIdentity::Temp(temp) => (None, Some(*temp)),
        };
        Self {
            id,
            temp_id,
            snapshot: record.snapshot.clone(),
            saved_at: record.saved_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DraftStore {
    storage: LocalStorage,
}

impl DraftStore {
    pub fn new(storage: LocalStorage) -> Self {
        Self { storage }
    }

    /// Replace the entry with the same identity, or append a new one.
    pub fn save(
        &self,
        identity: &DraftIdentity,
        snapshot: &RecipeDraft,
    ) -> Result<DraftRecord, DraftError> {
        let mut entries = self.load_entries()?;
        let record = DraftRecord {
            identity: identity.clone(),
            snapshot: snapshot.clone(),
            saved_at: Utc::now(),
        };
        let stored = StoredDraft::from(&record);

        match entries
            .iter()
            .position(|e| e.identity().as_ref() == Some(identity))
        {
            Some(index) => entries[index] = stored,
            None => entries.push(stored),
        }

        self.store_entries(&entries)?;
        tracing::info!(%identity, name = %snapshot.name, "Draft saved");
        Ok(record)
    }

    /// All drafts in saved order. Entries without any identity are skipped.
    pub fn list(&self) -> Result<Vec<DraftRecord>, DraftError> {
        Ok(self
            .load_entries()?
            .into_iter()
            .filter_map(|entry| {
                let record = entry.into_record();
                if record.is_none() {
                    tracing::warn!("Skipping draft entry with neither id nor tempId");
                }
                record
            })
            .collect())
    }

    pub fn get(&self, identity: &DraftIdentity) -> Result<Option<DraftRecord>, DraftError> {
        Ok(self.list()?.into_iter().find(|r| &r.identity == identity))
    }

    pub fn remove(&self, identity: &DraftIdentity) -> Result<DraftRecord, DraftError> {
        let mut entries = self.load_entries()?;
        let index = entries
            .iter()
            .position(|e| e.identity().as_ref() == Some(identity))
            .ok_or_else(|| DraftError::NotFound {
                identity: identity.to_string(),
            })?;
        let removed = entries.remove(index);
        self.store_entries(&entries)?;
        tracing::info!(%identity, "Draft removed");
        removed.into_record().ok_or_else(|| DraftError::NotFound {
            identity: identity.to_string(),
        })
    }

    fn load_entries(&self) -> Result<Vec<StoredDraft>, DraftError> {
        match self.storage.get_item(DRAFTS_KEY)? {
            None => Ok(Vec::new()),
            Some(raw) => serde_json::from_str(&raw).map_err(|source| DraftError::Corrupt {
                key: DRAFTS_KEY.to_string(),
                source,
            }),
        }
    }

    fn store_entries(&self, entries: &[StoredDraft]) -> Result<(), DraftError> {
        let raw = serde_json::to_string(entries).map_err(|source| DraftError::Corrupt {
            key: DRAFTS_KEY.to_string(),
            source,
        })?;
        self.storage.set_item(DRAFTS_KEY, raw)
    }
}
