use askama::Template;

use crate::models::{Role, User};

#[derive(Template)]
#[template(path = "users.html")]
pub struct UsersPageTemplate {
    pub api_hostname: String,
    pub notice: Option<String>,
    pub error: Option<String>,
    pub search_term: String,
    pub role_filter: String,
    pub roles: &'static [Role],
    pub total: usize,
    pub showing: usize,
    pub users: Vec<User>,
}

crate::impl_base_template!(UsersPageTemplate);
