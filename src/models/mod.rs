pub mod app_state;
pub mod role;
pub mod user;

pub use app_state::AppState;
pub use role::{Role, RoleFilter, UnknownRole};
pub use user::{User, UserDraft};
