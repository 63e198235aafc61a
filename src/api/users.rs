use serde_json::Value;

use crate::models::{User, UserDraft};
use crate::reconciler::UserStore;

use super::client::api_call;
use super::error::ApiError;

/// REST implementation of [`UserStore`] against the user-directory backend:
/// `GET/POST /users/` and `PUT/DELETE /users/{id}`.
pub struct HttpUserStore {
    client: reqwest::Client,
    base_url: String,
}

impl HttpUserStore {
    pub fn new(client: reqwest::Client, base_url: String) -> Self {
        Self { client, base_url }
    }

    fn decode_user(payload: Value) -> Result<User, ApiError> {
        serde_json::from_value(payload)
            .map_err(|e| ApiError::Transport(format!("unexpected user payload: {}", e)))
    }
}

impl UserStore for HttpUserStore {
    async fn list_all(&self) -> Result<Vec<User>, ApiError> {
        let payload = api_call(&self.client, &self.base_url, "GET", "/users/", None).await?;
        serde_json::from_value(payload)
            .map_err(|e| ApiError::Transport(format!("unexpected user list payload: {}", e)))
    }

    async fn create(&self, draft: &UserDraft) -> Result<User, ApiError> {
        let payload =
            api_call(&self.client, &self.base_url, "POST", "/users/", Some(draft.payload())).await?;
        Self::decode_user(payload)
    }

    async fn update(&self, id: i64, draft: &UserDraft) -> Result<User, ApiError> {
        let endpoint = format!("/users/{}", id);
        let payload =
            api_call(&self.client, &self.base_url, "PUT", &endpoint, Some(draft.payload())).await?;
        Self::decode_user(payload)
    }

    async fn delete(&self, id: i64) -> Result<(), ApiError> {
        let endpoint = format!("/users/{}", id);
        api_call(&self.client, &self.base_url, "DELETE", &endpoint, None).await?;
        Ok(())
    }
}
