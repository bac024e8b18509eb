//! Startup schema upgrade.
//!
//! Version 1 kept a single document under `resumeData`. Version 2 keeps an
//! index plus one body per document. The upgrade is guarded by the
//! `schema_version` marker, written last, so it runs at most once.

use tracing::{info, warn};
use uuid::Uuid;

use crate::documents::examples::{initial_document, DocumentRef};
use crate::documents::store::{DocumentStore, StoreError, LEGACY_KEY, SCHEMA_VERSION_KEY};
use crate::models::resume::{DocumentMeta, ResumeDocument};

pub const CURRENT_SCHEMA_VERSION: u32 = 2;
pub const DEFAULT_DOCUMENT_NAME: &str = "My Resume";

#[derive(Debug, Clone, PartialEq)]
pub enum MigrationOutcome {
    /// Marker already at the current version; nothing touched.
    UpToDate,
    /// An index existed without a marker; only the marker was written.
    AdoptedIndex,
    /// The legacy single document was moved under a new id.
    MigratedLegacy(Uuid),
    /// Empty environment; a default document was created.
    Seeded(Uuid),
}

pub async fn run_migrations(store: &DocumentStore) -> Result<MigrationOutcome, StoreError> {
    let version: Option<u32> = store.read_json(SCHEMA_VERSION_KEY).await?;
    if version.is_some_and(|v| v >= CURRENT_SCHEMA_VERSION) {
        return Ok(MigrationOutcome::UpToDate);
    }

    if store.index_exists().await? {
        write_marker(store).await?;
        info!("Existing resume index adopted at schema v{CURRENT_SCHEMA_VERSION}");
        return Ok(MigrationOutcome::AdoptedIndex);
    }

    let legacy = match store.read_json::<ResumeDocument>(LEGACY_KEY).await {
        Ok(doc) => doc,
        Err(StoreError::Corrupt { source, .. }) => {
            warn!("Legacy resume is unreadable and will be left in place: {source}");
            None
        }
        Err(e) => return Err(e),
    };

    let outcome = match legacy {
        Some(doc) => {
            let name = match doc.basics.name.trim() {
                "" => DEFAULT_DOCUMENT_NAME.to_string(),
                name => name.to_string(),
            };
            let id = install_first_document(store, &name, &doc).await?;
            store.kv().delete(LEGACY_KEY).await?;
            info!("Migrated legacy resume into {id} ({name})");
            MigrationOutcome::MigratedLegacy(id)
        }
        None => {
            let id = install_first_document(store, DEFAULT_DOCUMENT_NAME, &initial_document()).await?;
            info!("Seeded default resume {id}");
            MigrationOutcome::Seeded(id)
        }
    };

    write_marker(store).await?;
    Ok(outcome)
}

/// Writes the body before the index so an interrupted run never indexes a
/// document without content.
async fn install_first_document(
    store: &DocumentStore,
    name: &str,
    doc: &ResumeDocument,
) -> Result<Uuid, StoreError> {
    let meta = DocumentMeta::new(name);
    let target = DocumentRef::User(meta.id);
    store.save_body(&target, doc).await?;
    store.write_index(&[meta.clone()]).await?;
    store.set_active_ref(&target).await?;
    Ok(meta.id)
}

async fn write_marker(store: &DocumentStore) -> Result<(), StoreError> {
    store
        .write_json(SCHEMA_VERSION_KEY, &CURRENT_SCHEMA_VERSION)
        .await
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::documents::store::{body_key, META_KEY};
    use crate::storage::{KvStore, MemoryKv};

    fn store_with(kv: Arc<MemoryKv>) -> DocumentStore {
        DocumentStore::new(kv)
    }

    #[tokio::test]
    async fn test_fresh_environment_is_seeded() {
        let kv = Arc::new(MemoryKv::new());
        let store = store_with(kv.clone());

        let outcome = run_migrations(&store).await.unwrap();
        let MigrationOutcome::Seeded(id) = outcome else {
            panic!("expected seeding, got {outcome:?}");
        };

        let index = store.list_meta().await.unwrap();
        assert_eq!(index.len(), 1);
        assert_eq!(index[0].name, DEFAULT_DOCUMENT_NAME);
        assert_eq!(store.load_body(id).await.unwrap(), initial_document());
        assert_eq!(
            store.active_ref().await.unwrap(),
            Some(DocumentRef::User(id))
        );
    }

    #[tokio::test]
    async fn test_legacy_document_is_migrated_and_removed() {
        let kv = Arc::new(MemoryKv::new());
        kv.set(LEGACY_KEY, r#"{"basics":{"name":"Ada Lovelace"},"work":[{"id":"w1","name":"Analytical Engines"}]}"#)
            .await
            .unwrap();
        let store = store_with(kv.clone());

        let outcome = run_migrations(&store).await.unwrap();
        let MigrationOutcome::MigratedLegacy(id) = outcome else {
            panic!("expected legacy migration, got {outcome:?}");
        };

        let index = store.list_meta().await.unwrap();
        assert_eq!(index.len(), 1);
        assert_eq!(index[0].name, "Ada Lovelace");
        let body = store.load_body(id).await.unwrap();
        assert_eq!(body.work[0].name, "Analytical Engines");
        assert_eq!(kv.get(LEGACY_KEY).await.unwrap(), None);
        assert!(kv.get(&body_key(id)).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_legacy_without_name_uses_default_name() {
        let kv = Arc::new(MemoryKv::new());
        kv.set(LEGACY_KEY, r#"{"basics":{"name":"  "}}"#).await.unwrap();
        let store = store_with(kv);

        run_migrations(&store).await.unwrap();
        assert_eq!(store.list_meta().await.unwrap()[0].name, DEFAULT_DOCUMENT_NAME);
    }

    #[tokio::test]
    async fn test_running_twice_creates_no_duplicates() {
        let kv = Arc::new(MemoryKv::new());
        kv.set(LEGACY_KEY, r#"{"basics":{"name":"Ada"}}"#).await.unwrap();
        let store = store_with(kv);

        run_migrations(&store).await.unwrap();
        let first = store.list_meta().await.unwrap();
        let second_outcome = run_migrations(&store).await.unwrap();

        assert_eq!(second_outcome, MigrationOutcome::UpToDate);
        assert_eq!(store.list_meta().await.unwrap(), first);
    }

    #[tokio::test]
    async fn test_unmarked_index_is_adopted_untouched() {
        let kv = Arc::new(MemoryKv::new());
        let meta = DocumentMeta::new("Existing");
        kv.set(META_KEY, &serde_json::to_string(&vec![meta.clone()]).unwrap())
            .await
            .unwrap();
        let store = store_with(kv.clone());

        assert_eq!(
            run_migrations(&store).await.unwrap(),
            MigrationOutcome::AdoptedIndex
        );
        assert_eq!(store.list_meta().await.unwrap(), vec![meta]);
        assert_eq!(
            kv.get(SCHEMA_VERSION_KEY).await.unwrap().as_deref(),
            Some("2")
        );
    }

    #[tokio::test]
    async fn test_corrupt_legacy_falls_back_to_seed() {
        let kv = Arc::new(MemoryKv::new());
        kv.set(LEGACY_KEY, "{not json").await.unwrap();
        let store = store_with(kv.clone());

        assert!(matches!(
            run_migrations(&store).await.unwrap(),
            MigrationOutcome::Seeded(_)
        ));
        assert!(kv.get(LEGACY_KEY).await.unwrap().is_some());
    }
}
