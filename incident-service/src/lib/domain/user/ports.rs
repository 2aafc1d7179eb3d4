use async_trait::async_trait;

use crate::domain::user::models::AuthSession;
use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::RegisterCommand;
use crate::domain::user::models::User;
use crate::user::errors::UserError;

/// Port for registration and login.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Register a new account and issue its first token.
    ///
    /// # Arguments
    /// * `command` - Validated name, institutional email and password
    ///
    /// # Returns
    /// Session with email, name and access token
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `Password` / `Token` - Hashing or token issuance failed
    /// * `DatabaseError` - Store operation failed
    async fn register(&self, command: RegisterCommand) -> Result<AuthSession, UserError>;

    /// Verify credentials and issue a token.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email or wrong password (indistinguishable)
    /// * `Password` / `Token` - Verification or token issuance failed
    /// * `DatabaseError` - Store operation failed
    async fn login(&self, command: LoginCommand) -> Result<AuthSession, UserError>;
}

/// Credential store keyed by email.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist a new user.
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Store rejected a duplicate email key
    /// * `DatabaseError` - Store operation failed
    async fn create(&self, user: User) -> Result<User, UserError>;

    /// Retrieve user by email address.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Store operation failed
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError>;
}
