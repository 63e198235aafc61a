// Atomic API modules
pub mod client;
pub mod error;
pub mod users;

// Re-export commonly used items
pub use client::{api_call, set_silent};
pub use error::ApiError;
pub use users::HttpUserStore;
