//! Access decisions for gated route groups.
//!
//! A request passes through up to three steps, in an order fixed by the route
//! group's `AccessPolicy`:
//!
//! - **api key**: the `Api-Key` header names a registered key;
//! - **localhost**: the TCP peer is the local machine;
//! - **cookie**: the `docminer_token` cookie holds a token that verifies for
//!   the peer address.
//!
//! The first step that succeeds decides the caller identity, which is inserted
//! into the request extensions for handlers. When no step succeeds the request
//! is rejected before any handler runs.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{request::Parts, Extensions},
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};

use crate::server::{
    error::auth::AuthError,
    middleware::cookie::parse_cookie,
    model::{
        api_key::ApiKeyRegistry,
        session::{CallerIdentity, API_KEY_HEADER, SESSION_COOKIE},
    },
    service::token::verify_token_at,
    state::AppState,
    util::net::{client_ip, is_localhost},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    ApiKey,
    Localhost,
    Cookie,
}

/// Which steps a route group accepts, and how it rejects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessPolicy {
    /// Api key, then localhost. Rejects with 401.
    ApiKey,
    /// Localhost, then session cookie. Rejects with 403.
    Session,
    /// Api key, localhost, then session cookie. Rejects with 403.
    ApiKeyOrSession,
}

impl AccessPolicy {
    fn steps(self) -> &'static [Step] {
        match self {
            Self::ApiKey => &[Step::ApiKey, Step::Localhost],
            Self::Session => &[Step::Localhost, Step::Cookie],
            Self::ApiKeyOrSession => &[Step::ApiKey, Step::Localhost, Step::Cookie],
        }
    }

    fn default_rejection(self) -> AuthError {
        match self {
            Self::ApiKey => AuthError::Unauthorized,
            Self::Session | Self::ApiKeyOrSession => AuthError::Forbidden,
        }
    }
}

/// Request facts the decision depends on.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccessRequest<'a> {
    pub client_ip: &'a str,
    pub api_key: Option<&'a str>,
    pub session_token: Option<&'a str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    ApiKeyAuthenticated(CallerIdentity),
    LocalhostBypass(CallerIdentity),
    TokenAuthenticated(CallerIdentity),
    Rejected(AuthError),
}

impl AccessDecision {
    pub fn into_result(self) -> Result<CallerIdentity, AuthError> {
        match self {
            Self::ApiKeyAuthenticated(identity)
            | Self::LocalhostBypass(identity)
            | Self::TokenAuthenticated(identity) => Ok(identity),
            Self::Rejected(err) => Err(err),
        }
    }
}

/// Decides whether `request` may pass a route group guarded by `policy`.
///
/// Pure apart from logging; `now` drives token expiry and secret derivation.
///
/// # Arguments
/// - `policy` - Steps to try, in order
/// - `registry` - Registered API keys
/// - `request` - Client IP, API key header and session cookie of the request
/// - `now` - Current time
///
/// # Returns
/// - `AccessDecision` - The first successful step with its identity, or the
///   rejection; a token failure replaces the policy's default rejection
pub fn decide(
    policy: AccessPolicy,
    registry: &ApiKeyRegistry,
    request: &AccessRequest<'_>,
    now: DateTime<Utc>,
) -> AccessDecision {
    let mut rejection = policy.default_rejection();

    for step in policy.steps() {
        match step {
            Step::ApiKey => {
                if let Some(uid) = request.api_key.and_then(|key| registry.lookup(key)) {
                    return AccessDecision::ApiKeyAuthenticated(CallerIdentity::api_key(uid));
                }
            }
            Step::Localhost => {
                if is_localhost(request.client_ip) {
                    tracing::info!(
                        "Localhost access granted to {} without credentials",
                        request.client_ip
                    );
                    return AccessDecision::LocalhostBypass(CallerIdentity::localhost());
                }
            }
            Step::Cookie => match request.session_token {
                None => rejection = AuthError::Forbidden,
                Some(token) => match verify_token_at(token, request.client_ip, now) {
                    Ok(claims) => {
                        return AccessDecision::TokenAuthenticated(CallerIdentity::from_claims(
                            claims,
                        ))
                    }
                    Err(err) => {
                        tracing::debug!(
                            "Session token from {} rejected: {}",
                            request.client_ip,
                            err
                        );
                        rejection = err;
                    }
                },
            },
        }
    }

    AccessDecision::Rejected(rejection)
}

/// Gate for the deploy listener routes.
pub async fn require_api_key(State(state): State<AppState>, req: Request, next: Next) -> Response {
    guard(AccessPolicy::ApiKey, &state, req, next).await
}

/// Gate for routes serving logged-in users.
pub async fn require_session(State(state): State<AppState>, req: Request, next: Next) -> Response {
    guard(AccessPolicy::Session, &state, req, next).await
}

/// Gate for routes open to both services and logged-in users.
pub async fn require_api_key_or_session(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    guard(AccessPolicy::ApiKeyOrSession, &state, req, next).await
}

async fn guard(policy: AccessPolicy, state: &AppState, mut req: Request, next: Next) -> Response {
    let client_ip = client_ip(req.extensions());
    let api_key = req
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    let session_token = parse_cookie(req.headers(), SESSION_COOKIE);

    let request = AccessRequest {
        client_ip: &client_ip,
        api_key: api_key.as_deref(),
        session_token: session_token.as_deref(),
    };

    match decide(policy, &state.api_keys, &request, Utc::now()).into_result() {
        Ok(identity) => {
            req.extensions_mut().insert(identity);
            next.run(req).await
        }
        Err(err) => {
            tracing::warn!(
                "{:?} gate rejected {} {} from '{}': {}",
                policy,
                req.method(),
                req.uri().path(),
                client_ip,
                err
            );
            err.into_response()
        }
    }
}

/// Reads the identity published by the access middleware.
///
/// # Returns
/// - `Ok(CallerIdentity)` - Identity of the current caller
/// - `Err(AuthError::IdentityNotFound)` - Route is not behind an access gate
pub fn get_caller_identity(extensions: &Extensions) -> Result<CallerIdentity, AuthError> {
    extensions
        .get::<CallerIdentity>()
        .cloned()
        .ok_or(AuthError::IdentityNotFound)
}

impl<S> FromRequestParts<S> for CallerIdentity
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        get_caller_identity(&parts.extensions)
    }
}
