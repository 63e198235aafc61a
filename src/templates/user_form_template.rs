use askama::Template;

use crate::models::{Role, UserDraft};
use crate::reconciler::FieldErrors;

/// Shared by the add and edit pages; `action` decides which one it is.
#[derive(Template)]
#[template(path = "user_form.html")]
pub struct UserFormTemplate {
    pub api_hostname: String,
    pub notice: Option<String>,
    pub error: Option<String>,
    pub heading: String,
    pub submit_label: String,
    pub action: String,
    pub draft: UserDraft,
    pub field_errors: FieldErrors,
    pub roles: &'static [Role],
}

crate::impl_base_template!(UserFormTemplate);
