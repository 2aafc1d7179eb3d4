use std::sync::Arc;

use async_trait::async_trait;
use auth::Authenticator;
use auth::Claims;
use chrono::Utc;

use crate::domain::user::models::AuthSession;
use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::RegisterCommand;
use crate::domain::user::models::User;
use crate::user::errors::UserError;
use crate::user::ports::AuthServicePort;
use crate::user::ports::UserRepository;

/// Domain service for registration and login.
///
/// Combines the credential store with the shared [`Authenticator`].
pub struct AuthService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    authenticator: Arc<Authenticator>,
    /// Hash verified on logins for unknown or inactive accounts
    dummy_hash: Option<String>,
}

impl<UR> AuthService<UR>
where
    UR: UserRepository,
{
    /// Create a new auth service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - Credential store implementation
    /// * `authenticator` - Password hasher and token issuer
    pub fn new(repository: Arc<UR>, authenticator: Arc<Authenticator>) -> Self {
        let dummy_hash = authenticator
            .hash_password("unused-account-placeholder")
            .map_err(|e| tracing::warn!(error = %e, "Failed to prepare placeholder hash"))
            .ok();

        Self {
            repository,
            authenticator,
            dummy_hash,
        }
    }

    fn issue_session(&self, email: &str, name: &str) -> Result<AuthSession, UserError> {
        let token = self
            .authenticator
            .issue_token(&Claims::for_identity(email, name))
            .map_err(|e| UserError::Token(e.to_string()))?;

        Ok(AuthSession {
            email: email.to_string(),
            name: name.to_string(),
            token,
        })
    }
}

#[async_trait]
impl<UR> AuthServicePort for AuthService<UR>
where
    UR: UserRepository,
{
    async fn register(&self, command: RegisterCommand) -> Result<AuthSession, UserError> {
        // Check-then-write is not atomic; the store's own duplicate-key rejection covers the race
        if self
            .repository
            .find_by_email(command.email.as_str())
            .await?
            .is_some()
        {
            return Err(UserError::EmailAlreadyExists(command.email.to_string()));
        }

        let password_hash = self
            .authenticator
            .hash_password(&command.password)
            .map_err(|e| UserError::Password(e.to_string()))?;

        let user = User {
            email: command.email,
            name: command.name,
            password_hash,
            registered_at: Utc::now(),
            active: true,
        };

        let created_user = self.repository.create(user).await?;
        tracing::info!(email = %created_user.email, "User registered");

        self.issue_session(created_user.email.as_str(), &created_user.name)
    }

    async fn login(&self, command: LoginCommand) -> Result<AuthSession, UserError> {
        let user = match self.repository.find_by_email(&command.email).await? {
            Some(user) if user.active => user,
            _ => {
                // Unknown and inactive accounts pay the same Argon2 cost as a wrong password
                if let Some(hash) = &self.dummy_hash {
                    let _ = self.authenticator.verify_password(&command.password, hash);
                }
                return Err(UserError::InvalidCredentials);
            }
        };

        let claims = Claims::for_identity(user.email.as_str(), &user.name);
        let result =
            self.authenticator
                .authenticate(&command.password, &user.password_hash, &claims)?;

        tracing::info!(email = %user.email, "User logged in");

        Ok(AuthSession {
            email: claims.email,
            name: claims.name,
            token: result.access_token,
        })
    }
}
