use axum::extract::{Form, Path, Query, State};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use crate::models::{AppState, Role, RoleFilter, UserDraft};
use crate::reconciler::{filter_users, FieldErrors, ReconcileError};
use crate::templates::{ConfirmDeleteTemplate, UserFormTemplate, UsersPageTemplate};
use crate::util::hostname_from_url;

use super::helpers::{redirect_with_error, redirect_with_notice, render_template};

/// Message shown in a banner when a backend call fails: the server's detail
/// when it sent one, otherwise the transport error.
fn failure_message(e: &ReconcileError) -> String {
    match e {
        ReconcileError::Fetch(api)
        | ReconcileError::Create(api)
        | ReconcileError::Update(api)
        | ReconcileError::Delete(api) => api.to_string(),
        other => other.to_string(),
    }
}

#[derive(Deserialize, Default)]
pub struct ListQuery {
    #[serde(default)]
    pub q: String,
    #[serde(default)]
    pub role: String,
    pub notice: Option<String>,
    pub error: Option<String>,
}

pub async fn users_list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Response {
    let mut reconciler = state.reconciler.lock().await;
    let mut error = query.error.clone();
    if let Err(e) = reconciler.reload().await {
        // Keep showing the last-known-good collection.
        tracing::error!(%e, "Failed to load users");
        if error.is_none() {
            error = Some("Error loading users".to_string());
        }
    }
    let total = reconciler.users().len();
    let users = filter_users(reconciler.users(), &query.q, RoleFilter::parse(&query.role));
    drop(reconciler);

    render_template(UsersPageTemplate {
        api_hostname: hostname_from_url(&state.api_base_url),
        notice: query.notice,
        error,
        search_term: query.q,
        role_filter: if query.role.is_empty() {
            "all".to_string()
        } else {
            query.role
        },
        roles: &Role::ALL,
        total,
        showing: users.len(),
        users,
    })
}

#[derive(Deserialize)]
pub struct UserFormBody {
    pub name: String,
    pub email: String,
    pub role: String,
}

fn add_form(
    state: &AppState,
    draft: UserDraft,
    field_errors: FieldErrors,
    error: Option<String>,
) -> UserFormTemplate {
    UserFormTemplate {
        api_hostname: hostname_from_url(&state.api_base_url),
        notice: None,
        error,
        heading: "Add New User".to_string(),
        submit_label: "Add User".to_string(),
        action: "/users/new".to_string(),
        draft,
        field_errors,
        roles: &Role::ALL,
    }
}

fn edit_form(
    state: &AppState,
    id: i64,
    draft: UserDraft,
    field_errors: FieldErrors,
    error: Option<String>,
) -> UserFormTemplate {
    UserFormTemplate {
        api_hostname: hostname_from_url(&state.api_base_url),
        notice: None,
        error,
        heading: "Edit User".to_string(),
        submit_label: "Update User".to_string(),
        action: format!("/users/{}/edit", id),
        draft,
        field_errors,
        roles: &Role::ALL,
    }
}

pub async fn user_new_get(State(state): State<AppState>) -> Response {
    let draft = UserDraft {
        role: "user".to_string(),
        ..Default::default()
    };
    render_template(add_form(&state, draft, FieldErrors::default(), None))
}

pub async fn user_new_post(
    State(state): State<AppState>,
    Form(form): Form<UserFormBody>,
) -> Response {
    let draft = UserDraft {
        name: form.name,
        email: form.email,
        role: form.role,
    };
    let mut reconciler = state.reconciler.lock().await;
    match reconciler.create(&draft).await {
        Ok(_) => redirect_with_notice("/users", "User added successfully!").into_response(),
        Err(ReconcileError::Validation(field_errors)) => {
            render_template(add_form(&state, draft, field_errors, None))
        }
        Err(e) => {
            tracing::error!(%e, "Failed to create user");
            let msg = format!("Error adding user: {}", failure_message(&e));
            render_template(add_form(&state, draft, FieldErrors::default(), Some(msg)))
        }
    }
}

pub async fn user_edit_get(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    let mut reconciler = state.reconciler.lock().await;
    if reconciler.get(id).is_none() {
        // Direct navigation or a fresh process; populate the collection first.
        if let Err(e) = reconciler.reload().await {
            tracing::error!(%e, "Failed to load users");
        }
    }
    let Some(user) = reconciler.get(id) else {
        return redirect_with_error("/users", "User not found").into_response();
    };
    let draft = UserDraft::from_user(user);
    drop(reconciler);
    render_template(edit_form(&state, id, draft, FieldErrors::default(), None))
}

pub async fn user_edit_post(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Form(form): Form<UserFormBody>,
) -> Response {
    let draft = UserDraft {
        name: form.name,
        email: form.email,
        role: form.role,
    };
    let mut reconciler = state.reconciler.lock().await;
    if reconciler.get(id).is_none() {
        if let Err(e) = reconciler.reload().await {
            tracing::error!(%e, "Failed to load users");
        }
    }
    match reconciler.update(id, &draft).await {
        Ok(_) => redirect_with_notice("/users", "User updated successfully!").into_response(),
        Err(ReconcileError::Validation(field_errors)) => {
            render_template(edit_form(&state, id, draft, field_errors, None))
        }
        Err(ReconcileError::UnknownId(_)) => {
            redirect_with_error("/users", "User not found").into_response()
        }
        Err(e) => {
            tracing::error!(%e, "Failed to update user");
            let msg = format!("Error updating user: {}", failure_message(&e));
            render_template(edit_form(&state, id, draft, FieldErrors::default(), Some(msg)))
        }
    }
}

/// The yes/no gate in front of deletion; the POST below is only reachable
/// from this page's confirm button.
pub async fn user_delete_get(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    let mut reconciler = state.reconciler.lock().await;
    if reconciler.get(id).is_none() {
        if let Err(e) = reconciler.reload().await {
            tracing::error!(%e, "Failed to load users");
        }
    }
    let Some(user) = reconciler.get(id) else {
        return redirect_with_error("/users", "User not found").into_response();
    };
    let user = user.clone();
    drop(reconciler);
    render_template(ConfirmDeleteTemplate {
        api_hostname: hostname_from_url(&state.api_base_url),
        notice: None,
        error: None,
        user,
    })
}

pub async fn user_delete_post(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    let mut reconciler = state.reconciler.lock().await;
    match reconciler.remove(id).await {
        Ok(()) => redirect_with_notice("/users", "User deleted successfully!").into_response(),
        Err(e) => {
            tracing::error!(%e, "Failed to delete user");
            let msg = format!("Error deleting user: {}", failure_message(&e));
            redirect_with_error("/users", &msg).into_response()
        }
    }
}
