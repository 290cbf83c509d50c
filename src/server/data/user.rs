//! User data repository.
//!
//! This module provides the `UserRepository` for the `users` collection. Passwords
//! arrive here already hashed; hashing belongs to the auth service.

use crate::server::{
    data::{filter::{Filter, Update}, object_id::ObjectId, repository::Repository, store::Store},
    error::store::StoreError,
    model::user::User,
};

/// Collection holding user accounts.
pub const USERS_COLLECTION: &str = "users";

/// Repository providing document operations for user accounts.
pub struct UserRepository {
    users: Repository<User>,
}

impl UserRepository {
    /// Creates a new UserRepository instance.
    ///
    /// # Arguments
    /// - `store` - Store whose namespace holds the `users` collection
    ///
    /// # Returns
    /// - `UserRepository` - New repository instance
    pub fn new(store: &Store) -> Self {
        Self {
            users: store.repository(USERS_COLLECTION),
        }
    }

    /// Stores a new user account.
    ///
    /// # Arguments
    /// - `email` - Login name of the user
    /// - `role` - Role embedded in the user's session tokens
    /// - `password_hash` - Argon2 PHC string of the password
    ///
    /// # Returns
    /// - `Ok(User)` - The stored user with its generated id
    /// - `Err(StoreError)` - Store failure
    pub async fn create(
        &self,
        email: &str,
        role: &str,
        password_hash: String,
    ) -> Result<User, StoreError> {
        let mut user = User {
            id: None,
            email: email.to_string(),
            role: role.to_string(),
            password_hash,
        };

        let id = self.users.insert_one(&user).await?;
        user.id = Some(id);

        Ok(user)
    }

    /// Finds a user by login email.
    ///
    /// # Returns
    /// - `Ok(Some(User))` - User with that email
    /// - `Ok(None)` - No user has that email
    /// - `Err(StoreError)` - Store failure
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        self.users.find_one(Filter::new().eq("email", email)).await
    }

    pub async fn find_by_id(&self, id: ObjectId) -> Result<Option<User>, StoreError> {
        self.users.find_by_id(id).await
    }

    /// Changes a user's role.
    ///
    /// # Returns
    /// - `Ok(1)` - Role changed
    /// - `Ok(0)` - No such user, or the user already has that role
    /// - `Err(StoreError)` - Store failure
    pub async fn set_role(&self, id: ObjectId, role: &str) -> Result<u64, StoreError> {
        self.users
            .update_by_id(id, Update::new().set("role", role))
            .await
    }

    pub async fn set_password_hash(&self, id: ObjectId, hash: &str) -> Result<u64, StoreError> {
        self.users
            .update_by_id(
                id,
                Update::new().set("password_hash", hash),
            )
            .await
    }

    pub async fn count(&self) -> Result<u64, StoreError> {
        self.users.count(Filter::new()).await
    }
}
