use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header::SET_COOKIE, StatusCode},
    response::IntoResponse,
    Json,
};

use crate::{
    model::{
        api::StatusDto,
        auth::{ActivateDto, LoginDto},
    },
    server::{
        error::AppError,
        middleware::cookie::{clear_session_cookie, session_cookie},
        model::session::CallerIdentity,
        service::auth::AuthService,
        state::AppState,
        util::net::ClientIp,
    },
};

/// POST /api/auth/login - Log in with email and password
///
/// Issues a session token bound to the caller's address and sets it as the
/// `docminer_token` cookie.
///
/// # Returns
/// - `200 OK`: `{uid, role}` of the logged-in user, with `Set-Cookie`
/// - `400 Bad Request`: Body is not `{email, password}`
/// - `401 Unauthorized`: Unknown email or wrong password
/// - `500 Internal Server Error`: Store failure or token signing failure
pub async fn login(
    State(state): State<AppState>,
    ClientIp(client_ip): ClientIp,
    payload: Result<Json<LoginDto>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let auth_service = AuthService::new(&state.store);
    let outcome = auth_service
        .login(&payload.email, &payload.password, &client_ip)
        .await?;

    let cookie = session_cookie(&outcome.token, state.cookie_secure);

    Ok((
        StatusCode::OK,
        [(SET_COOKIE, cookie)],
        Json(outcome.user.into_login_dto()),
    ))
}

/// POST /api/auth/activate - Activate an account
///
/// Only validates the body; activation tokens are not checked yet.
pub async fn activate(
    payload: Result<Json<ActivateDto>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;
    tracing::debug!("Activation requested with a {} byte token", payload.token.len());

    Ok((StatusCode::OK, Json(StatusDto::new("account activated"))))
}

/// POST /api/auth/logout - Clear the session cookie
///
/// The token itself stays valid until it expires; only the cookie is removed.
pub async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(SET_COOKIE, clear_session_cookie(state.cookie_secure))],
        Json(StatusDto::new("logged out")),
    )
}

/// GET /api/auth/me - Identity behind the session cookie
///
/// # Authentication
/// Session cookie, or a request from localhost
pub async fn me(identity: CallerIdentity) -> impl IntoResponse {
    (StatusCode::OK, Json(identity.into_dto()))
}

/// GET /api/whoami - Identity behind an API key or session cookie
pub async fn whoami(identity: CallerIdentity) -> impl IntoResponse {
    (StatusCode::OK, Json(identity.into_dto()))
}
