use std::path::Path;

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::server::{
    controller::{auth, deploy_listener},
    middleware::auth::{require_api_key, require_api_key_or_session, require_session},
    state::AppState,
};

/// Builds the application router.
///
/// Each gated group carries its access middleware as a route layer, so
/// unmatched paths fall through to the static file service instead of being
/// rejected.
///
/// # Arguments
/// - `state` - Shared application state
/// - `static_dir` - Directory served for every path without a route
pub fn router(state: AppState, static_dir: impl AsRef<Path>) -> Router {
    let public = Router::new()
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/activate", post(auth::activate))
        .route("/api/auth/logout", post(auth::logout));

    let session = Router::new()
        .route("/api/auth/me", get(auth::me))
        .route_layer(from_fn_with_state(state.clone(), require_session));

    let combined = Router::new()
        .route("/api/whoami", get(auth::whoami))
        .route_layer(from_fn_with_state(state.clone(), require_api_key_or_session));

    let deploy_listener = Router::new()
        .route("/deplistener/ping", get(deploy_listener::ping))
        .route(
            "/deplistener/info",
            get(deploy_listener::info).post(deploy_listener::info),
        )
        .route("/deplistener/receive", post(deploy_listener::receive))
        .route_layer(from_fn_with_state(state.clone(), require_api_key));

    Router::new()
        .merge(public)
        .merge(session)
        .merge(combined)
        .merge(deploy_listener)
        .fallback_service(ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
