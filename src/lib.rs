pub mod api;
pub mod config;
pub mod handlers;
pub mod models;
pub mod reconciler;
pub mod templates;
pub mod util;
