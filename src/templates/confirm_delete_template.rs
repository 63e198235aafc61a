use askama::Template;

use crate::models::User;

#[derive(Template)]
#[template(path = "confirm_delete.html")]
pub struct ConfirmDeleteTemplate {
    pub api_hostname: String,
    pub notice: Option<String>,
    pub error: Option<String>,
    pub user: User,
}

crate::impl_base_template!(ConfirmDeleteTemplate);
