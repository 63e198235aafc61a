//! Keeps a local, ordered copy of the backend's user collection in sync with
//! explicit caller intents: reload, create, update, remove. Every mutation
//! is applied only after the corresponding backend call succeeds; a failed
//! call leaves the collection exactly as it was.

pub mod error;
pub mod filter;
pub mod validate;

pub use error::{FieldErrors, ReconcileError};
pub use filter::filter_users;
pub use validate::validate_draft;

use crate::api::ApiError;
use crate::models::{User, UserDraft};

/// The remote side of the reconciler: the four calls the directory backend
/// exposes. Implemented by [`crate::api::HttpUserStore`] in production and
/// by in-memory fakes in tests.
#[allow(async_fn_in_trait)]
pub trait UserStore {
    async fn list_all(&self) -> Result<Vec<User>, ApiError>;
    async fn create(&self, draft: &UserDraft) -> Result<User, ApiError>;
    async fn update(&self, id: i64, draft: &UserDraft) -> Result<User, ApiError>;
    async fn delete(&self, id: i64) -> Result<(), ApiError>;
}

/// Local mirror of the backend's user collection.
///
/// Every intent takes `&mut self`, so a single reconciler value can never
/// have two calls in flight at once; callers that share one across tasks
/// put it behind a lock and thereby serialize intents.
pub struct ListReconciler<S> {
    store: S,
    users: Vec<User>,
}

impl<S: UserStore> ListReconciler<S> {
    /// Start with an empty collection; call [`reload`](Self::reload) to
    /// populate it.
    pub fn new(store: S) -> Self {
        Self {
            store,
            users: Vec::new(),
        }
    }

    /// Last-known-good view of the collection, in backend list order with
    /// created records appended.
    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn get(&self, id: i64) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    /// Replace the local collection wholesale with the backend's current
    /// one. On failure the previous collection is kept; there is no retry.
    pub async fn reload(&mut self) -> Result<(), ReconcileError> {
        let fresh = self.store.list_all().await.map_err(ReconcileError::Fetch)?;
        tracing::debug!(count = fresh.len(), "reloaded user collection");
        self.users = fresh;
        Ok(())
    }

    /// Validate `draft` locally, then create it on the backend and append
    /// the server-returned record (which carries the assigned id).
    pub async fn create(&mut self, draft: &UserDraft) -> Result<User, ReconcileError> {
        validate_draft(draft).map_err(ReconcileError::Validation)?;
        let created = self.store.create(draft).await.map_err(ReconcileError::Create)?;
        tracing::info!(id = created.id, "user created");
        self.users.push(created.clone());
        Ok(created)
    }

    /// Validate `draft` locally, then update `id` on the backend. The local
    /// record is replaced with the server response, not the draft, so any
    /// server-side normalization shows through.
    pub async fn update(&mut self, id: i64, draft: &UserDraft) -> Result<User, ReconcileError> {
        validate_draft(draft).map_err(ReconcileError::Validation)?;
        if self.get(id).is_none() {
            return Err(ReconcileError::UnknownId(id));
        }
        let updated = self
            .store
            .update(id, draft)
            .await
            .map_err(ReconcileError::Update)?;
        tracing::info!(id, "user updated");
        if let Some(slot) = self.users.iter_mut().find(|u| u.id == id) {
            *slot = updated.clone();
        }
        Ok(updated)
    }

    /// Delete `id` on the backend, then drop it locally. The caller is
    /// expected to have obtained user confirmation before invoking this.
    pub async fn remove(&mut self, id: i64) -> Result<(), ReconcileError> {
        self.store.delete(id).await.map_err(ReconcileError::Delete)?;
        tracing::info!(id, "user deleted");
        self.users.retain(|u| u.id != id);
        Ok(())
    }
}
