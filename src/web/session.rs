//! Session extraction and the login-required guard.

use super::state::AppState;
use axum::extract::{Request, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::debug;

pub const SESSION_COOKIE: &str = "sessionid";

/// Username of the authenticated request, stored in request extensions.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub String);

/// Session token from `Authorization: Bearer` or the session cookie.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    if let Some(token) = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
    {
        return Some(token.trim().to_string());
    }

    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.to_string())
}

/// `302 Found` to `location`.
pub fn redirect(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}

/// Rejects anonymous requests with a redirect to the login page.
pub async fn require_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let session = match session_token(request.headers()) {
        Some(token) => state.auth.session(&token).await,
        None => None,
    };

    match session {
        Some(session) => {
            request
                .extensions_mut()
                .insert(CurrentUser(session.username));
            next.run(request).await
        }
        None => {
            let path = request.uri().path().to_string();
            debug!(path = %path, "anonymous request redirected to login");
            redirect(&format!(
                "{}?next={}",
                state.config.login_url,
                urlencoding::encode(&path)
            ))
        }
    }
}
