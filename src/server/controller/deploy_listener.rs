//! Endpoints polled and called by deployment agents.
//!
//! All of them sit behind the API key gate and only acknowledge the request.

use axum::{http::StatusCode, response::IntoResponse, Json};

use crate::{model::api::StatusDto, server::model::session::CallerIdentity};

/// GET /deplistener/ping
pub async fn ping(identity: CallerIdentity) -> impl IntoResponse {
    tracing::debug!("Deploy listener pinged by {}", identity.uid);
    (StatusCode::OK, Json(StatusDto::new("ok")))
}

/// GET|POST /deplistener/info
pub async fn info(identity: CallerIdentity) -> impl IntoResponse {
    tracing::debug!("Deploy listener info requested by {}", identity.uid);
    (StatusCode::OK, Json(StatusDto::new("ok")))
}

/// POST /deplistener/receive
///
/// Accepts any body; the payload is not inspected.
pub async fn receive(identity: CallerIdentity, body: String) -> impl IntoResponse {
    tracing::info!(
        "Deploy listener received {} bytes from {}",
        body.len(),
        identity.uid
    );
    (StatusCode::OK, Json(StatusDto::new("ok")))
}
