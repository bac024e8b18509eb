//! Active document session.
//!
//! Owns the active pointer and the in-memory document. Every mutation ends in
//! exactly one body write for user documents; while an example is active the
//! first mutation forks it into a new indexed document instead.

use tracing::{error, info, warn};

use crate::documents::examples::{initial_document, DocumentRef, ExampleKey};
use crate::documents::migration::{run_migrations, DEFAULT_DOCUMENT_NAME};
use crate::documents::store::{DocumentStore, StoreError};
use crate::errors::AppError;
use crate::models::resume::{DocumentMeta, PartialResume, ResumeDocument, SectionUpdate};

pub const NEW_DOCUMENT_NAME: &str = "New Resume";

pub struct Session {
    store: DocumentStore,
    active: DocumentRef,
    document: ResumeDocument,
}

impl Session {
    /// Runs the schema upgrade, then loads whichever document the stored
    /// active pointer resolves to.
    pub async fn bootstrap(store: DocumentStore) -> Result<Self, AppError> {
        let outcome = run_migrations(&store).await?;
        info!("Storage schema check: {outcome:?}");

        let active = match store.resolve_active().await? {
            Some(active) => active,
            None => {
                warn!("Resume index is empty; creating a default resume");
                let meta = store.create_meta(DEFAULT_DOCUMENT_NAME).await?;
                let active = DocumentRef::User(meta.id);
                store.save_body(&active, &initial_document()).await?;
                store.set_active_ref(&active).await?;
                active
            }
        };

        let document = match active {
            DocumentRef::Example(key) => key.document(),
            DocumentRef::User(id) => match store.load_body(id).await {
                Ok(doc) => doc,
                Err(StoreError::NotFound(_)) => {
                    error!("Resume {id} has no stored body; starting from the default content");
                    initial_document()
                }
                Err(e) => return Err(e.into()),
            },
        };

        Ok(Self {
            store,
            active,
            document,
        })
    }

    pub fn active(&self) -> DocumentRef {
        self.active
    }

    pub fn document(&self) -> &ResumeDocument {
        &self.document
    }

    pub fn is_example(&self) -> bool {
        self.active.is_example()
    }

    #[cfg(test)]
    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    pub async fn list(&self) -> Result<Vec<DocumentMeta>, AppError> {
        Ok(self.store.list_meta().await?)
    }

    /// Loads `target` into memory and records it as active. On a missing body
    /// the session is left untouched.
    pub async fn switch_to(&mut self, target: DocumentRef) -> Result<(), AppError> {
        let document = match target {
            DocumentRef::Example(key) => key.document(),
            DocumentRef::User(id) => self.store.load_body(id).await.map_err(|e| {
                error!("Cannot switch to resume {id}: {e}");
                AppError::from(e)
            })?,
        };
        self.store.set_active_ref(&target).await?;
        self.active = target;
        self.document = document;
        info!("Switched to {target}");
        Ok(())
    }

    /// Replaces one section of the active document.
    pub async fn mutate_section(&mut self, update: SectionUpdate) -> Result<DocumentRef, AppError> {
        let mut next = self.document.clone();
        update.apply_to(&mut next);
        self.commit(next).await
    }

    /// Merges a partial document into the active one.
    pub async fn import_bulk(&mut self, partial: PartialResume) -> Result<DocumentRef, AppError> {
        let next = partial.merge_into(&self.document);
        self.commit(next).await
    }

    /// Persists `next` as the active document, forking first if an example is active.
    async fn commit(&mut self, next: ResumeDocument) -> Result<DocumentRef, AppError> {
        match self.active {
            DocumentRef::Example(key) => self.fork_example(key, next).await,
            DocumentRef::User(_) => {
                self.store.save_body(&self.active, &next).await?;
                self.document = next;
                Ok(self.active)
            }
        }
    }

    async fn fork_example(&mut self, key: ExampleKey, document: ResumeDocument) -> Result<DocumentRef, AppError> {
        let name = format!("Copy of {}", key.display_name());
        let meta = self.store.create_meta(&name).await?;
        let forked = DocumentRef::User(meta.id);
        self.store.save_body(&forked, &document).await?;
        self.store.set_active_ref(&forked).await?;
        self.active = forked;
        self.document = document;
        info!("Forked example '{}' into {}", key.short_name(), meta.id);
        Ok(forked)
    }

    /// Copies `source` into a new user document. The active document is unchanged.
    pub async fn duplicate(&self, source: DocumentRef) -> Result<DocumentMeta, AppError> {
        let (body, source_name) = match source {
            DocumentRef::Example(key) => (key.document(), key.display_name()),
            DocumentRef::User(id) => {
                let body = self.store.load_body(id).await.map_err(|e| {
                    error!("Cannot duplicate resume {id}: {e}");
                    AppError::from(e)
                })?;
                let name = self
                    .store
                    .find_meta(id)
                    .await?
                    .map(|m| m.name)
                    .unwrap_or_else(|| "Resume".to_string());
                (body, name)
            }
        };

        let meta = self
            .store
            .create_meta(&format!("Copy of {source_name}"))
            .await?;
        self.store
            .save_body(&DocumentRef::User(meta.id), &body)
            .await?;
        Ok(meta)
    }

    pub async fn create_empty(&mut self) -> Result<DocumentMeta, AppError> {
        self.create_with_data(ResumeDocument::default(), NEW_DOCUMENT_NAME)
            .await
    }

    /// Creates a new user document and makes it active.
    pub async fn create_with_data(&mut self, document: ResumeDocument, name: &str) -> Result<DocumentMeta, AppError> {
        let meta = self.store.create_meta(name).await?;
        let target = DocumentRef::User(meta.id);
        self.store.save_body(&target, &document).await?;
        self.store.set_active_ref(&target).await?;
        self.active = target;
        self.document = document;
        Ok(meta)
    }

    pub async fn rename(&self, target: DocumentRef, name: &str) -> Result<DocumentMeta, AppError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::Validation("Resume name must not be empty".to_string()));
        }
        match target {
            DocumentRef::Example(key) => {
                warn!("Rejected rename of built-in example '{}'", key.short_name());
                Err(AppError::InvariantViolation(
                    "Built-in examples cannot be renamed".to_string(),
                ))
            }
            DocumentRef::User(id) => Ok(self.store.rename_meta(id, name).await?),
        }
    }

    /// Deletes a user document. If it was active, the first remaining document
    /// becomes active.
    pub async fn delete(&mut self, target: DocumentRef) -> Result<(), AppError> {
        let DocumentRef::User(id) = target else {
            warn!("Rejected deletion of built-in example {target}");
            return Err(AppError::InvariantViolation(
                "Built-in examples cannot be deleted".to_string(),
            ));
        };

        self.store.delete_meta(id).await?;

        if self.active == target {
            let first = self
                .store
                .list_meta()
                .await?
                .into_iter()
                .next()
                .ok_or_else(|| AppError::Storage("Index emptied during delete".to_string()))?;
            self.switch_to(DocumentRef::User(first.id)).await?;
        }
        Ok(())
    }
}
