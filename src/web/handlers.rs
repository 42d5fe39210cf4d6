use super::session::{CurrentUser, SESSION_COOKIE, redirect, session_token};
use super::state::AppState;
use super::{Result, WebError};
use crate::admin::change_form::render_change_form;
use crate::refresh::{self, RefreshEnvelope};
use crate::request::{FormData, FormRequest};
use crate::widget::html::escape;
use axum::extract::{Extension, Query, State};
use axum::http::{HeaderMap, HeaderValue, Uri, header};
use axum::response::{Html, IntoResponse, Response};
use axum::{Form, Json};
use serde::{Deserialize, Serialize};

const DEFAULT_LOGIN_REDIRECT: &str = "/admin/";

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub next: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    pub next: Option<String>,
}

pub async fn healthcheck() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// Refresh endpoint hit by the client script whenever a trigger or base field changes.
pub async fn field_changed(
    State(state): State<AppState>,
    Form(data): Form<FormData>,
) -> Result<Json<RefreshEnvelope>> {
    let envelope = refresh::field_changed(&state.site, &state.db, &data)?;
    Ok(Json(envelope))
}

pub async fn admin_page(
    State(state): State<AppState>,
    Extension(CurrentUser(username)): Extension<CurrentUser>,
    uri: Uri,
) -> Result<Html<String>> {
    let request = FormRequest::get(uri.path());
    let html = render_change_form(&state.site, &state.db, &request, &username)?;
    Ok(Html(html))
}

/// Login form the login-required redirect lands on.
pub async fn login_page(State(state): State<AppState>, Query(query): Query<LoginQuery>) -> Html<String> {
    let next = query.next.unwrap_or_default();
    Html(format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<title>Log in</title>\n</head>\n<body>\n<h1>Log in</h1>\n<form method=\"post\" action=\"{action}\">\n<label for=\"id_username\">Username</label>\n<input type=\"text\" name=\"username\" id=\"id_username\" autofocus>\n<label for=\"id_password\">Password</label>\n<input type=\"password\" name=\"password\" id=\"id_password\">\n<input type=\"hidden\" name=\"next\" value=\"{next}\">\n<input type=\"submit\" value=\"Log in\">\n</form>\n</body>\n</html>\n",
        action = escape(&state.config.login_url),
        next = escape(&next),
    ))
}

pub async fn login(State(state): State<AppState>, Form(form): Form<LoginForm>) -> Result<Response> {
    let token = state.auth.login(&form.username, &form.password).await?;

    // Only same-site absolute paths are followed after login.
    let next = form
        .next
        .as_deref()
        .filter(|next| next.starts_with('/') && !next.starts_with("//"))
        .unwrap_or(DEFAULT_LOGIN_REDIRECT);

    let mut response = redirect(next);
    let cookie = format!("{SESSION_COOKIE}={token}; HttpOnly; Path=/; SameSite=Lax");
    let cookie: HeaderValue = cookie
        .parse()
        .map_err(|_| WebError::Internal("session cookie is not a valid header".to_string()))?;
    response.headers_mut().insert(header::SET_COOKIE, cookie);
    Ok(response)
}

pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    if let Some(token) = session_token(&headers) {
        state.auth.logout(&token).await;
    }
    redirect(&state.config.login_url)
}
