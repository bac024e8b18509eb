use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::documents::examples::DocumentRef;
use crate::models::resume::{stamp_now, DocumentMeta, ResumeDocument};
use crate::storage::KvStore;

pub const META_KEY: &str = "resumes_meta";
pub const ACTIVE_KEY: &str = "active_resume_id";
/// Pre-index single-document layout.
pub const LEGACY_KEY: &str = "resumeData";
pub const SCHEMA_VERSION_KEY: &str = "schema_version";

pub fn body_key(id: Uuid) -> String {
    format!("resume_{id}")
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Resume {0} not found")]
    NotFound(Uuid),

    #[error("At least one resume must remain")]
    LastDocument,

    #[error("Corrupt value under '{key}': {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Storage backend error: {0}")]
    Backend(#[from] anyhow::Error),
}

/// Named resume documents plus their metadata index, over a [`KvStore`].
#[derive(Clone)]
pub struct DocumentStore {
    kv: Arc<dyn KvStore>,
}

impl DocumentStore {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self { kv }
    }

    pub fn kv(&self) -> &Arc<dyn KvStore> {
        &self.kv
    }

    pub(crate) async fn read_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        match self.kv.get(key).await? {
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|source| StoreError::Corrupt {
                    key: key.to_string(),
                    source,
                }),
            None => Ok(None),
        }
    }

    pub(crate) async fn write_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let raw = serde_json::to_string(value).map_err(|source| StoreError::Corrupt {
            key: key.to_string(),
            source,
        })?;
        self.kv.set(key, &raw).await?;
        Ok(())
    }

    pub(crate) async fn index_exists(&self) -> Result<bool, StoreError> {
        Ok(self.kv.get(META_KEY).await?.is_some())
    }

    pub(crate) async fn write_index(&self, index: &[DocumentMeta]) -> Result<(), StoreError> {
        self.write_json(META_KEY, index).await
    }

    /// The index in insertion order. A missing index reads as empty.
    pub async fn list_meta(&self) -> Result<Vec<DocumentMeta>, StoreError> {
        Ok(self.read_json(META_KEY).await?.unwrap_or_default())
    }

    pub async fn find_meta(&self, id: Uuid) -> Result<Option<DocumentMeta>, StoreError> {
        Ok(self.list_meta().await?.into_iter().find(|m| m.id == id))
    }

    pub async fn load_body(&self, id: Uuid) -> Result<ResumeDocument, StoreError> {
        self.read_json(&body_key(id))
            .await?
            .ok_or(StoreError::NotFound(id))
    }

    /// Upsert. Examples are never persisted, so saving one is a no-op.
    pub async fn save_body(&self, target: &DocumentRef, doc: &ResumeDocument) -> Result<(), StoreError> {
        match target {
            DocumentRef::User(id) => self.write_json(&body_key(*id), doc).await,
            DocumentRef::Example(key) => {
                debug!("Skipping save for read-only example '{}'", key.short_name());
                Ok(())
            }
        }
    }

    /// Appends a new entry, stamped now, to the end of the index.
    pub async fn create_meta(&self, name: &str) -> Result<DocumentMeta, StoreError> {
        let meta = DocumentMeta::new(name);
        let mut index = self.list_meta().await?;
        index.push(meta.clone());
        self.write_index(&index).await?;
        info!("Created resume {} ({})", meta.id, meta.name);
        Ok(meta)
    }

    pub async fn rename_meta(&self, id: Uuid, name: &str) -> Result<DocumentMeta, StoreError> {
        let mut index = self.list_meta().await?;
        let entry = index
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or(StoreError::NotFound(id))?;
        entry.name = name.to_string();
        entry.last_modified = stamp_now();
        let renamed = entry.clone();
        self.write_index(&index).await?;
        Ok(renamed)
    }

    /// Removes the index entry and its body. Refuses to remove the last document.
    pub async fn delete_meta(&self, id: Uuid) -> Result<(), StoreError> {
        let index = self.list_meta().await?;
        if !index.iter().any(|m| m.id == id) {
            return Err(StoreError::NotFound(id));
        }
        if index.len() <= 1 {
            warn!("Refusing to delete resume {id}: it is the only one left");
            return Err(StoreError::LastDocument);
        }
        let remaining: Vec<DocumentMeta> = index.into_iter().filter(|m| m.id != id).collect();
        self.write_index(&remaining).await?;
        self.kv.delete(&body_key(id)).await?;
        info!("Deleted resume {id}");
        Ok(())
    }

    /// The recorded active pointer. An unparseable value reads as absent.
    pub async fn active_ref(&self) -> Result<Option<DocumentRef>, StoreError> {
        let Some(raw) = self.kv.get(ACTIVE_KEY).await? else {
            return Ok(None);
        };
        match raw.parse() {
            Ok(r) => Ok(Some(r)),
            Err(e) => {
                warn!("Ignoring stored active id '{raw}': {e}");
                Ok(None)
            }
        }
    }

    pub async fn set_active_ref(&self, target: &DocumentRef) -> Result<(), StoreError> {
        self.kv.set(ACTIVE_KEY, &target.to_string()).await?;
        Ok(())
    }

    /// Validates the active pointer against the index.
    ///
    /// Examples are always valid. A user id missing from the index (or no
    /// pointer at all) falls back to the first indexed document, which is then
    /// recorded as active. Returns `None` only when the index is empty.
    pub async fn resolve_active(&self) -> Result<Option<DocumentRef>, StoreError> {
        let index = self.list_meta().await?;
        match self.active_ref().await? {
            Some(r @ DocumentRef::Example(_)) => return Ok(Some(r)),
            Some(r @ DocumentRef::User(id)) if index.iter().any(|m| m.id == id) => {
                return Ok(Some(r))
            }
            Some(DocumentRef::User(id)) => {
                warn!("Active resume {id} is not in the index; falling back to the first one");
            }
            None => {}
        }
        let Some(first) = index.first() else {
            return Ok(None);
        };
        let fallback = DocumentRef::User(first.id);
        self.set_active_ref(&fallback).await?;
        Ok(Some(fallback))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::examples::ExampleKey;
    use crate::storage::MemoryKv;

    fn store() -> DocumentStore {
        DocumentStore::new(Arc::new(MemoryKv::new()))
    }

    #[tokio::test]
    async fn test_create_meta_preserves_insertion_order() {
        let store = store();
        let a = store.create_meta("A").await.unwrap();
        let b = store.create_meta("B").await.unwrap();
        let index = store.list_meta().await.unwrap();
        assert_eq!(
            index.iter().map(|m| m.id).collect::<Vec<_>>(),
            vec![a.id, b.id]
        );
    }

    #[tokio::test]
    async fn test_load_missing_body_is_not_found() {
        let store = store();
        let id = Uuid::new_v4();
        assert!(matches!(
            store.load_body(id).await,
            Err(StoreError::NotFound(missing)) if missing == id
        ));
    }

    #[tokio::test]
    async fn test_save_body_ignores_examples() {
        let kv = Arc::new(MemoryKv::new());
        let store = DocumentStore::new(kv.clone());
        store
            .save_body(
                &DocumentRef::Example(ExampleKey::Frontend),
                &ResumeDocument::default(),
            )
            .await
            .unwrap();
        assert_eq!(kv.len().await, 0);
    }

    #[tokio::test]
    async fn test_rename_updates_name_and_timestamp() {
        let store = store();
        let meta = store.create_meta("Draft").await.unwrap();
        let renamed = store.rename_meta(meta.id, "Final").await.unwrap();
        assert_eq!(renamed.name, "Final");
        assert!(renamed.last_modified >= meta.last_modified);
        assert_eq!(store.list_meta().await.unwrap(), vec![renamed]);
    }

    #[tokio::test]
    async fn test_created_meta_equals_stored_copy() {
        let store = store();
        let meta = store.create_meta("Draft").await.unwrap();
        assert_eq!(meta.last_modified.timestamp_subsec_nanos() % 1_000_000, 0);
        assert_eq!(store.list_meta().await.unwrap()[0], meta);
    }

    #[tokio::test]
    async fn test_rename_unknown_id_is_not_found() {
        let store = store();
        assert!(matches!(
            store.rename_meta(Uuid::new_v4(), "x").await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_last_document_is_refused() {
        let store = store();
        let only = store.create_meta("Only").await.unwrap();
        assert!(matches!(
            store.delete_meta(only.id).await,
            Err(StoreError::LastDocument)
        ));
        assert_eq!(store.list_meta().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_removes_meta_and_body() {
        let store = store();
        let keep = store.create_meta("Keep").await.unwrap();
        let gone = store.create_meta("Gone").await.unwrap();
        store
            .save_body(&DocumentRef::User(gone.id), &ResumeDocument::default())
            .await
            .unwrap();

        store.delete_meta(gone.id).await.unwrap();

        let index = store.list_meta().await.unwrap();
        assert_eq!(index.len(), 1);
        assert_eq!(index[0].id, keep.id);
        assert!(matches!(
            store.load_body(gone.id).await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_resolve_active_falls_back_to_first_indexed() {
        let store = store();
        let first = store.create_meta("First").await.unwrap();
        store.create_meta("Second").await.unwrap();
        store
            .set_active_ref(&DocumentRef::User(Uuid::new_v4()))
            .await
            .unwrap();

        let resolved = store.resolve_active().await.unwrap();
        assert_eq!(resolved, Some(DocumentRef::User(first.id)));
        assert_eq!(
            store.active_ref().await.unwrap(),
            Some(DocumentRef::User(first.id))
        );
    }

    #[tokio::test]
    async fn test_resolve_active_keeps_examples() {
        let store = store();
        store.create_meta("Mine").await.unwrap();
        let example = DocumentRef::Example(ExampleKey::Backend);
        store.set_active_ref(&example).await.unwrap();
        assert_eq!(store.resolve_active().await.unwrap(), Some(example));
    }

    #[tokio::test]
    async fn test_garbage_active_pointer_reads_as_absent() {
        let kv = Arc::new(MemoryKv::new());
        kv.set(ACTIVE_KEY, "???").await.unwrap();
        let store = DocumentStore::new(kv);
        assert_eq!(store.active_ref().await.unwrap(), None);
    }
}
