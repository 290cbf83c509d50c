use crate::server::{
    data::{store::Store, user::UserRepository},
    error::{auth::AuthError, AppError},
    model::user::{CreateUserParam, User, ADMIN_ROLE},
    service::token,
    util::password::{hash_password, verify_password},
};

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub user: User,
    /// Session token bound to the client IP the login came from.
    pub token: String,
}

/// Service for password login and account creation.
///
/// Checks credentials against the `users` collection and issues session tokens
/// through the token engine.
pub struct AuthService<'a> {
    store: &'a Store,
}

impl<'a> AuthService<'a> {
    /// Creates a new AuthService instance.
    ///
    /// # Arguments
    /// - `store` - Store holding the `users` collection
    ///
    /// # Returns
    /// - `AuthService` - New service instance
    pub fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// Verifies an email and password and issues a session token.
    ///
    /// Unknown emails and wrong passwords fail the same way so a caller cannot
    /// probe which accounts exist.
    ///
    /// # Arguments
    /// - `email` - Login email
    /// - `password` - Plain-text password from the request body
    /// - `client_ip` - Address the token is bound to
    ///
    /// # Returns
    /// - `Ok(LoginOutcome)` - Authenticated user and signed token
    /// - `Err(AppError::AuthErr(InvalidCredentials))` - Unknown email or wrong password
    /// - `Err(AppError::AuthErr(SigningError))` - Token could not be signed
    /// - `Err(AppError::StoreErr)` - Store failure while looking up the user
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        client_ip: &str,
    ) -> Result<LoginOutcome, AppError> {
        let user_repo = UserRepository::new(self.store);

        let Some(user) = user_repo.find_by_email(email).await? else {
            tracing::warn!("Login failed for unknown email {} from {}", email, client_ip);
            return Err(AuthError::InvalidCredentials.into());
        };

        if !verify_password(password, &user.password_hash) {
            tracing::warn!("Login failed for {} from {}: wrong password", email, client_ip);
            return Err(AuthError::InvalidCredentials.into());
        }

        let token = token::issue_token(client_ip, &user.uid(), &user.email, &user.role)?;
        tracing::info!("User {} logged in from {}", user.email, client_ip);

        Ok(LoginOutcome { user, token })
    }

    /// Creates an account with a freshly hashed password.
    ///
    /// # Returns
    /// - `Ok(User)` - Stored user with its id
    /// - `Err(AppError::BadRequest)` - An account with that email already exists
    /// - `Err(AppError)` - Hashing or store failure
    pub async fn create_user(&self, param: CreateUserParam) -> Result<User, AppError> {
        let user_repo = UserRepository::new(self.store);

        if user_repo.find_by_email(&param.email).await?.is_some() {
            return Err(AppError::BadRequest(format!(
                "User {} already exists",
                param.email
            )));
        }

        let password_hash = hash_password(&param.password)?;
        let user = user_repo
            .create(&param.email, &param.role, password_hash)
            .await?;

        Ok(user)
    }

    /// Makes sure `email` can log in with `password` and holds the admin role.
    ///
    /// Creates the account when missing. An existing account gets the admin
    /// role and a fresh hash of `password`.
    ///
    /// # Returns
    /// - `Ok(User)` - The admin account as stored
    /// - `Err(AppError)` - Hashing or store failure
    pub async fn ensure_admin(&self, email: &str, password: &str) -> Result<User, AppError> {
        let user_repo = UserRepository::new(self.store);

        let Some(mut user) = user_repo.find_by_email(email).await? else {
            let user = self
                .create_user(CreateUserParam {
                    email: email.to_string(),
                    password: password.to_string(),
                    role: ADMIN_ROLE.to_string(),
                })
                .await?;
            tracing::info!("Created admin account {}", email);
            return Ok(user);
        };

        let id = user
            .id
            .ok_or_else(|| AppError::InternalError(format!("User {} has no id", email)))?;
        let password_hash = hash_password(password)?;

        user_repo.set_role(id, ADMIN_ROLE).await?;
        user_repo.set_password_hash(id, &password_hash).await?;
        tracing::info!("Updated admin account {}", email);

        user.role = ADMIN_ROLE.to_string();
        user.password_hash = password_hash;
        Ok(user)
    }
}
