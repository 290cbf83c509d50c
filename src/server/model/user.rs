//! User domain models and parameters.
//!
//! Users are stored as documents of the `users` collection. The stored form
//! carries an Argon2 PHC password hash; the plain password only ever appears in
//! `CreateUserParam` and in the login request.

use serde::{Deserialize, Serialize};

use crate::{model::auth::LoginResponseDto, server::data::object_id::ObjectId};

/// Role given to the account bootstrapped from configuration.
pub const ADMIN_ROLE: &str = "superadmin";

/// Account allowed to log in and receive a session cookie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Document id; `None` until the user has been inserted.
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    /// Login name, unique within the collection.
    pub email: String,
    /// Role embedded in issued session tokens, e.g. `admin` or `user`.
    pub role: String,
    /// Argon2 PHC string of the user's password.
    pub password_hash: String,
}

impl User {
    /// Hex form of the document id, the `uid` placed in session tokens.
    ///
    /// # Returns
    /// - `String` - 24 hex characters, or the nil id for a user not yet stored
    pub fn uid(&self) -> String {
        self.id.unwrap_or(ObjectId::NIL).to_hex()
    }

    pub fn into_login_dto(self) -> LoginResponseDto {
        LoginResponseDto {
            uid: self.uid(),
            role: self.role,
        }
    }
}

/// Parameters for creating a user account.
#[derive(Debug, Clone)]
pub struct CreateUserParam {
    pub email: String,
    /// Plain-text password, hashed before it is stored.
    pub password: String,
    pub role: String,
}
