/// Error types for list reconciliation
use std::fmt;
use thiserror::Error;

use crate::api::ApiError;

/// Per-field validation messages for a submitted draft. A field is `None`
/// when it passed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.role.is_none()
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(msg) = &self.name {
            parts.push(format!("name: {}", msg));
        }
        if let Some(msg) = &self.email {
            parts.push(format!("email: {}", msg));
        }
        if let Some(msg) = &self.role {
            parts.push(format!("role: {}", msg));
        }
        write!(f, "{}", parts.join("; "))
    }
}

/// Errors produced by [`ListReconciler`] intents. A failed intent never
/// changes the local collection.
///
/// [`ListReconciler`]: super::ListReconciler
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// The draft failed local validation; no request was made.
    #[error("validation failed: {0}")]
    Validation(FieldErrors),

    /// `reload` could not fetch the collection.
    #[error("failed to load users: {0}")]
    Fetch(ApiError),

    /// The backend rejected a create call.
    #[error("failed to create user: {0}")]
    Create(ApiError),

    /// The backend rejected an update call.
    #[error("failed to update user: {0}")]
    Update(ApiError),

    /// The backend rejected a delete call.
    #[error("failed to delete user: {0}")]
    Delete(ApiError),

    /// `update` was asked about an id that is not in the local collection;
    /// no request was made.
    #[error("no user with id {0}")]
    UnknownId(i64),
}

impl ReconcileError {
    /// Server-provided detail message, when the failure carries one.
    pub fn detail(&self) -> Option<&str> {
        match self {
            ReconcileError::Fetch(e)
            | ReconcileError::Create(e)
            | ReconcileError::Update(e)
            | ReconcileError::Delete(e) => e.detail(),
            ReconcileError::Validation(_) | ReconcileError::UnknownId(_) => None,
        }
    }
}
