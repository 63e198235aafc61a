use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};

/// Render an askama template, or a 500 if rendering fails.
pub fn render_template<T: askama::Template>(t: T) -> Response {
    match t.render() {
        Ok(body) => Html(body).into_response(),
        Err(e) => {
            tracing::error!(%e, "Template render error");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
        }
    }
}

// Notices survive the post/redirect/get hop in the query string; there is
// no session layer to stash them in.

pub fn redirect_with_notice(path: &str, notice: &str) -> Redirect {
    Redirect::to(&format!("{}?notice={}", path, urlencoding::encode(notice)))
}

pub fn redirect_with_error(path: &str, error: &str) -> Redirect {
    Redirect::to(&format!("{}?error={}", path, urlencoding::encode(error)))
}
