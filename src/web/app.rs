use super::handlers::{admin_page, field_changed, healthcheck, login, login_page, logout};
use super::session::require_session;
use super::state::AppState;
use axum::Router;
use axum::middleware;
use axum::routing::{get, post};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub const LOGOUT_URL: &str = "/accounts/logout/";

pub fn build_router(state: AppState) -> Router {
    let protected = Router::new()
        .route(state.site.field_changed_url(), post(field_changed))
        .route("/admin/*path", get(admin_page))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_session));

    let mut router = Router::new()
        .route("/health", get(healthcheck))
        .route(&state.config.login_url, get(login_page).post(login))
        .route(LOGOUT_URL, post(logout))
        .merge(protected);

    // Assets are only served locally when the static URL is a path on this host.
    let static_prefix = state.config.static_url.trim_end_matches('/');
    if static_prefix.starts_with('/') {
        router = router.nest_service(static_prefix, ServeDir::new(&state.config.static_dir));
    }

    router.layer(TraceLayer::new_for_http()).with_state(state)
}
