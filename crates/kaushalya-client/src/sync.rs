//! Generic fetch → mirror → mutate → re-fetch controller.
//!
//! A [`SyncController`] owns the local copy of one backend collection. Every
//! successful mutation is followed by a fresh [`SyncController::load`]; there
//! is no optimistic insert and no rollback. Drafts are borrowed, so a caller
//! still holds its input when a save fails.

use kaushalya_core::{filter_records, CatalogEntry, ProductDraft, RecordId, Validate};
use serde_json::Value;

use crate::client::ApiClient;
use crate::envelope::{decode_items, Envelope};
use crate::error::SyncError;
use crate::resources::{MutableResource, ProductCollection, Resource};

/// Asks the operator to approve a destructive action.
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

/// Approves everything. Used for `--yes`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysConfirm;

impl Confirm for AlwaysConfirm {
    fn confirm(&mut self, _prompt: &str) -> bool {
        true
    }
}

/// Result of a successful mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MutationOutcome {
    /// Backend `message`, if it sent one.
    pub message: Option<String>,
    /// Whether the follow-up reload succeeded. When `false` the local list
    /// is stale until the next successful load.
    pub refreshed: bool,
}

/// Local mirror of one backend collection.
///
/// Keeps both the typed records and the list exactly as the backend sent
/// it; exports use the latter so no field is renamed, dropped or coerced.
pub struct SyncController<R: Resource> {
    client: ApiClient,
    records: Vec<R::Record>,
    raw: Vec<Value>,
}

impl<R: Resource> SyncController<R> {
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            records: Vec::new(),
            raw: Vec::new(),
        }
    }

    /// The last successfully loaded list.
    #[must_use]
    pub fn records(&self) -> &[R::Record] {
        &self.records
    }

    /// The last successfully loaded list as received, in backend order.
    #[must_use]
    pub fn raw_records(&self) -> &[Value] {
        &self.raw
    }

    /// Records whose searchable fields contain `query`.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<&R::Record> {
        filter_records(&self.records, query)
    }

    #[must_use]
    pub fn find(&self, id: &RecordId) -> Option<&R::Record> {
        self.records.iter().find(|r| R::record_id(r) == id)
    }

    /// Replaces local state with the backend collection.
    ///
    /// On failure the previous list is kept.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Client`] on transport failure or `success: false`.
    pub async fn load(&mut self) -> Result<&[R::Record], SyncError> {
        match self.client.get(R::PATH).await {
            Ok(envelope) => {
                let raw = envelope.into_items(R::NAME);
                let mut records = decode_items::<R::Record>(&raw, R::NAME);
                R::after_load(&mut records);
                tracing::debug!(resource = R::NAME, count = records.len(), "loaded");
                self.records = records;
                self.raw = raw;
                Ok(&self.records)
            }
            Err(e) => {
                tracing::warn!(resource = R::NAME, error = %e, "load failed; keeping previous list");
                Err(e.into())
            }
        }
    }

    async fn refresh_after(&mut self, operation: &str, envelope: Envelope) -> MutationOutcome {
        tracing::info!(resource = R::NAME, operation, "mutation accepted");
        let refreshed = self.load().await.is_ok();
        MutationOutcome {
            message: envelope.message,
            refreshed,
        }
    }
}

impl<R: MutableResource> SyncController<R> {
    /// Validates `draft`, creates the record, then reloads.
    ///
    /// # Errors
    ///
    /// - [`SyncError::Validation`] before any request when the draft is invalid.
    /// - [`SyncError::Client`] when the backend call fails.
    pub async fn create(&mut self, draft: &R::Draft) -> Result<MutationOutcome, SyncError> {
        draft.validate()?;
        let envelope = self
            .client
            .post_json(R::PATH, &R::create_body(draft))
            .await?;
        Ok(self.refresh_after("create", envelope).await)
    }

    /// Validates `draft`, saves it over record `id`, then reloads.
    ///
    /// # Errors
    ///
    /// - [`SyncError::Unsupported`] when the resource has no update endpoint.
    /// - [`SyncError::Validation`] before any request when the draft is invalid.
    /// - [`SyncError::Client`] when the backend call fails.
    pub async fn update(
        &mut self,
        id: &RecordId,
        draft: &R::Draft,
    ) -> Result<MutationOutcome, SyncError> {
        let Some(path) = R::UPDATE_PATH else {
            return Err(SyncError::Unsupported {
                resource: R::NAME,
                operation: "update",
            });
        };
        draft.validate()?;
        let envelope = self
            .client
            .post_json(path, &R::update_body(id, draft))
            .await?;
        Ok(self.refresh_after("update", envelope).await)
    }

    /// Deletes record `id` after the operator confirms, then reloads.
    ///
    /// Protected records, matched by id or by the loaded record itself, are
    /// refused before prompting.
    ///
    /// # Errors
    ///
    /// - [`SyncError::Protected`] for a protected record.
    /// - [`SyncError::Declined`] when confirmation is refused.
    /// - [`SyncError::Client`] when the backend call fails.
    pub async fn delete(
        &mut self,
        id: &RecordId,
        confirm: &mut impl Confirm,
    ) -> Result<MutationOutcome, SyncError> {
        let protected = R::protected_id() == Some(id.as_str())
            || self.find(id).is_some_and(R::is_protected);
        if protected {
            return Err(SyncError::Protected {
                resource: R::NAME,
                id: id.to_string(),
            });
        }
        if !confirm.confirm(&format!("Delete {} {id}?", R::NAME)) {
            return Err(SyncError::Declined);
        }
        let envelope = self.client.delete(R::PATH, id.as_str()).await?;
        Ok(self.refresh_after("delete", envelope).await)
    }
}

impl<R: ProductCollection> SyncController<R> {
    /// The loaded grouping called `name`, compared case-insensitively.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<&CatalogEntry> {
        let name = name.trim();
        self.records
            .iter()
            .find(|entry| entry.category_name.trim().eq_ignore_ascii_case(name))
    }

    /// Adds a product to grouping `parent`, or edits `product_id` in it, then
    /// reloads. `parent` must be in the loaded list.
    ///
    /// # Errors
    ///
    /// - [`SyncError::Validation`] before any request when the draft is invalid.
    /// - [`SyncError::UnknownParent`] when `parent` is not loaded.
    /// - [`SyncError::Client`] when the backend call fails.
    pub async fn upsert_product(
        &mut self,
        parent: &str,
        product_id: Option<&RecordId>,
        draft: &ProductDraft,
    ) -> Result<MutationOutcome, SyncError> {
        draft.validate()?;
        let Some(entry) = self.find_by_name(parent) else {
            return Err(SyncError::UnknownParent {
                resource: R::NAME,
                name: parent.to_owned(),
            });
        };
        let body = R::product_body(entry, product_id, draft);
        let envelope = self.client.post_json(R::PRODUCT_PATH, &body).await?;
        Ok(self.refresh_after("save product", envelope).await)
    }
}
