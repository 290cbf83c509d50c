//! Session token issuance and verification.
//!
//! Tokens are HS256 JWTs whose HMAC key is not a stored secret but is derived
//! for every request from the client IP, the email and uid inside the claims,
//! and the current UTC date. A token therefore only verifies from the IP it was
//! issued to and only on the UTC day it was issued, even though its `exp` lies
//! 12 hours after issue.
//!
//! The derivation is kept bit-compatible with tokens issued by earlier
//! deployments. It binds sessions to one address and one calendar day, which
//! breaks for clients behind rotating NATs and at midnight UTC; a server-held
//! signing key would remove both limits.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, NaiveDate, Utc};
use jsonwebtoken::{
    decode, decode_header, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header,
    Validation,
};
use sha2::{Digest, Sha256};

use crate::server::{
    error::auth::AuthError,
    model::session::{SessionClaims, TOKEN_ISSUER, TOKEN_LIFETIME_SECS},
};

/// Derives the HMAC key for `client_ip`, `email` and `uid` on today's UTC date.
pub fn derive_secret(client_ip: &str, email: &str, uid: &str) -> Vec<u8> {
    derive_secret_for_date(client_ip, email, uid, Utc::now().date_naive())
}

/// Derives the HMAC key for a given UTC date.
///
/// The key is the lowercase hex text of `SHA-256("{ip}|{email}_{uid}^{YYYY-MM-DD}")`,
/// used as raw bytes.
///
/// # Arguments
/// - `client_ip` - Request client address as text, without port
/// - `email` - Email carried in the claims
/// - `uid` - User id carried in the claims
/// - `date` - UTC calendar date the key is valid for
///
/// # Returns
/// - `Vec<u8>` - 64 ASCII hex bytes
pub fn derive_secret_for_date(client_ip: &str, email: &str, uid: &str, date: NaiveDate) -> Vec<u8> {
    let canonical = format!("{}|{}_{}^{}", client_ip, email, uid, date.format("%Y-%m-%d"));
    let digest = Sha256::digest(canonical.as_bytes());

    hex::encode(digest).into_bytes()
}

/// Issues a session token for the current time.
pub fn issue_token(client_ip: &str, uid: &str, email: &str, role: &str) -> Result<String, AuthError> {
    issue_token_at(client_ip, uid, email, role, Utc::now())
}

/// Issues a session token as if the current time were `now`.
///
/// # Arguments
/// - `client_ip` - Address the token will be bound to
/// - `uid` - User id claim
/// - `email` - Email claim
/// - `role` - Role claim
/// - `now` - Issue time; `exp` is 12 hours later
///
/// # Returns
/// - `Ok(String)` - Compact JWT
/// - `Err(AuthError::SigningError)` - Claims could not be encoded
pub fn issue_token_at(
    client_ip: &str,
    uid: &str,
    email: &str,
    role: &str,
    now: DateTime<Utc>,
) -> Result<String, AuthError> {
    let iat = now.timestamp();
    let claims = SessionClaims {
        uid: uid.to_string(),
        email: email.to_string(),
        role: role.to_string(),
        iss: TOKEN_ISSUER.to_string(),
        iat,
        exp: iat + TOKEN_LIFETIME_SECS,
    };

    let secret = derive_secret_for_date(client_ip, email, uid, now.date_naive());

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(&secret),
    )
    .map_err(|e| AuthError::SigningError(e.to_string()))
}

/// Verifies a session token presented from `client_ip` at the current time.
pub fn verify_token(token: &str, client_ip: &str) -> Result<SessionClaims, AuthError> {
    verify_token_at(token, client_ip, Utc::now())
}

/// Verifies a session token as if the current time were `now`.
///
/// The algorithm is checked before any key is derived, and the identity used
/// for derivation is read from the not yet verified payload; the MAC check
/// then ties that identity to the key.
///
/// # Returns
/// - `Ok(SessionClaims)` - Token is authentic and unexpired
/// - `Err(AuthError::Malformed)` - Header or payload does not parse
/// - `Err(AuthError::InvalidSignature)` - Wrong algorithm, or MAC does not verify
///   for this IP, identity and date
/// - `Err(AuthError::Expired)` - `exp` is not after `now`
pub fn verify_token_at(
    token: &str,
    client_ip: &str,
    now: DateTime<Utc>,
) -> Result<SessionClaims, AuthError> {
    let header = decode_header(token).map_err(|_| AuthError::Malformed)?;
    if header.alg != Algorithm::HS256 {
        return Err(AuthError::InvalidSignature);
    }

    let unverified = decode_unverified_claims(token)?;
    let secret = derive_secret_for_date(
        client_ip,
        &unverified.email,
        &unverified.uid,
        now.date_naive(),
    );

    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.set_required_spec_claims(&["exp"]);

    let claims = decode::<SessionClaims>(token, &DecodingKey::from_secret(&secret), &validation)
        .map_err(|e| match e.kind() {
            ErrorKind::InvalidSignature => AuthError::InvalidSignature,
            ErrorKind::ExpiredSignature => AuthError::Expired,
            _ => AuthError::Malformed,
        })?
        .claims;

    if claims.exp <= now.timestamp() {
        return Err(AuthError::Expired);
    }

    Ok(claims)
}

/// Reads the claims segment without checking the signature.
fn decode_unverified_claims(token: &str) -> Result<SessionClaims, AuthError> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return Err(AuthError::Malformed);
    }

    let payload = URL_SAFE_NO_PAD
        .decode(parts[1])
        .map_err(|_| AuthError::Malformed)?;

    serde_json::from_slice(&payload).map_err(|_| AuthError::Malformed)
}
