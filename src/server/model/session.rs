//! Session token claims and the per-request caller identity.

use serde::{Deserialize, Serialize};

use crate::model::auth::IdentityDto;

/// Issuer written into every session token. Verification does not check it;
/// the MAC already binds a token to this server's key derivation.
pub const TOKEN_ISSUER: &str = "files-receiver";

/// Lifetime of a session token and of the cookie carrying it.
pub const TOKEN_LIFETIME_SECS: i64 = 12 * 60 * 60;

/// Name of the cookie holding the session token.
pub const SESSION_COOKIE: &str = "docminer_token";

/// Header carrying an API key.
pub const API_KEY_HEADER: &str = "Api-Key";

/// Identity granted to requests from the local machine.
pub const LOCALHOST_UID: &str = "localhost";
pub const LOCALHOST_EMAIL: &str = "localhost@pointe.sk";
pub const LOCALHOST_ROLE: &str = "superadmin";

/// Claims signed into a session token.
///
/// Immutable once issued. There is no server-side revocation; a token stops
/// being accepted when it expires, when the client IP changes or when the UTC
/// date rolls over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub uid: String,
    pub email: String,
    pub role: String,
    pub iss: String,
    /// Issue time, unix seconds.
    pub iat: i64,
    /// Expiry time, unix seconds.
    pub exp: i64,
}

/// Email and role of an authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub email: String,
    pub role: String,
}

/// Who is making the current request.
///
/// Inserted into request extensions by the access middleware. API-key callers
/// have no `user`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity {
    pub uid: String,
    pub user: Option<SessionUser>,
}

impl CallerIdentity {
    pub fn api_key(uid: &str) -> Self {
        Self {
            uid: uid.to_string(),
            user: None,
        }
    }

    pub fn localhost() -> Self {
        Self {
            uid: LOCALHOST_UID.to_string(),
            user: Some(SessionUser {
                email: LOCALHOST_EMAIL.to_string(),
                role: LOCALHOST_ROLE.to_string(),
            }),
        }
    }

    pub fn from_claims(claims: SessionClaims) -> Self {
        Self {
            uid: claims.uid,
            user: Some(SessionUser {
                email: claims.email,
                role: claims.role,
            }),
        }
    }

    pub fn role(&self) -> Option<&str> {
        self.user.as_ref().map(|user| user.role.as_str())
    }

    pub fn into_dto(self) -> IdentityDto {
        let (email, role) = match self.user {
            Some(user) => (Some(user.email), Some(user.role)),
            None => (None, None),
        };

        IdentityDto {
            uid: self.uid,
            email,
            role,
        }
    }
}
