use std::sync::Arc;
use tokio::sync::Mutex;

use crate::api::HttpUserStore;
use crate::reconciler::ListReconciler;

/// Shared state for the web dashboard. The reconciler sits behind an async
/// mutex, so intents arriving from concurrent requests are applied one at a
/// time and never observe a half-applied mutation.
#[derive(Clone)]
pub struct AppState {
    pub reconciler: Arc<Mutex<ListReconciler<HttpUserStore>>>,
    pub api_base_url: String,
    pub custom_css: Option<String>,
}
