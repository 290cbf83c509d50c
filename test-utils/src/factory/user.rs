//! User factory for seeding accounts into the `users` collection.
//!
//! The stored password is hashed with Argon2 exactly as the login flow expects,
//! so a seeded user can log in with the plain password set on the factory.

use argon2::{Argon2, PasswordHasher};
use password_hash::SaltString;
use sea_orm::DatabaseConnection;

use crate::{error::TestError, factory::document::DocumentFactory, factory::helpers::next_id};

/// Password given to factory users unless overridden.
pub const DEFAULT_PASSWORD: &str = "correct horse battery staple";

/// Factory for creating test users with customizable fields.
///
/// # Example
///
/// ```rust,ignore
/// use test_utils::factory::user::UserFactory;
///
/// let user = UserFactory::new(&db, "test")
///     .email("alice@example.com")
///     .role("admin")
///     .build()
///     .await?;
/// ```
pub struct UserFactory<'a> {
    db: &'a DatabaseConnection,
    namespace: String,
    email: String,
    role: String,
    password: String,
}

impl<'a> UserFactory<'a> {
    /// Creates a new UserFactory with default values.
    ///
    /// Defaults:
    /// - email: `"user{id}@example.com"` where id is auto-incremented
    /// - role: `"user"`
    /// - password: `DEFAULT_PASSWORD`
    ///
    /// # Arguments
    /// - `db` - Database connection for inserting the document
    /// - `namespace` - Store namespace holding the `users` collection
    ///
    /// # Returns
    /// - `UserFactory` - New factory instance with defaults
    pub fn new(db: &'a DatabaseConnection, namespace: impl Into<String>) -> Self {
        let id = next_id();
        Self {
            db,
            namespace: namespace.into(),
            email: format!("user{}@example.com", id),
            role: "user".to_string(),
            password: DEFAULT_PASSWORD.to_string(),
        }
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    pub fn role(mut self, role: impl Into<String>) -> Self {
        self.role = role.into();
        self
    }

    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }

    /// Builds and inserts the user document.
    ///
    /// # Returns
    /// - `Ok(Model)` - The inserted document row; its `id` is the user's uid
    /// - `Err(TestError)` - Hashing or database failure
    pub async fn build(self) -> Result<entity::document::Model, TestError> {
        let password_hash = hash(&self.password)?;

        let model = DocumentFactory::new(self.db, self.namespace, "users")
            .field("email", self.email)
            .field("role", self.role)
            .field("password_hash", password_hash)
            .build()
            .await?;

        Ok(model)
    }
}

/// Creates a user with default values.
///
/// # Arguments
/// - `db` - Database connection
/// - `namespace` - Store namespace
///
/// # Returns
/// - `Ok(Model)` - The inserted document row
/// - `Err(TestError)` - Hashing or database failure
pub async fn create_user(
    db: &DatabaseConnection,
    namespace: &str,
) -> Result<entity::document::Model, TestError> {
    UserFactory::new(db, namespace).build().await
}

fn hash(password: &str) -> Result<String, TestError> {
    let mut salt_bytes = [0u8; 16];
    getrandom::getrandom(&mut salt_bytes).map_err(|e| TestError::PasswordHash(e.to_string()))?;
    let salt =
        SaltString::encode_b64(&salt_bytes).map_err(|e| TestError::PasswordHash(e.to_string()))?;

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|phc| phc.to_string())
        .map_err(|e| TestError::PasswordHash(e.to_string()))
}
