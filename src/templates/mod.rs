// Base template trait for inheritance
pub mod base_template;
pub use base_template::BaseTemplate;

// Individual template files
pub mod confirm_delete_template;
pub mod user_form_template;
pub mod users_page_template;

// Re-export all templates
pub use confirm_delete_template::ConfirmDeleteTemplate;
pub use user_form_template::UserFormTemplate;
pub use users_page_template::UsersPageTemplate;
