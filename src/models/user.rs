use serde::{Deserialize, Serialize};

use super::role::Role;

/// One user record as stored by the backend. `id` is assigned by the server
/// on create and never changes afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
}

/// The fields of a record before the server has assigned an id: what a form
/// or CLI invocation submits for create and update. Values are kept exactly
/// as entered so a rejected form can be re-rendered with what the user typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserDraft {
    pub name: String,
    pub email: String,
    pub role: String,
}

impl UserDraft {
    /// JSON body for the backend's create/update endpoints.
    pub fn payload(&self) -> serde_json::Value {
        serde_json::json!({
            "name": self.name.trim(),
            "email": self.email.trim(),
            "role": self.role.trim(),
        })
    }

    /// Draft pre-filled from an existing record, for the edit form.
    pub fn from_user(user: &User) -> UserDraft {
        UserDraft {
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role.to_string(),
        }
    }
}
