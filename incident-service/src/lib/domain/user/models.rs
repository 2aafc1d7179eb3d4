use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;

use crate::user::errors::EmailError;
use crate::user::errors::UserError;

/// Email domain every account must belong to.
pub const INSTITUTIONAL_SUFFIX: &str = "@utec.edu.pe";

/// Registered account.
///
/// Keyed by email; created at registration and never updated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub email: EmailAddress,
    pub name: String,
    pub password_hash: String,
    pub registered_at: DateTime<Utc>,
    pub active: bool,
}

/// Institutional email address
///
/// Must end with [`INSTITUTIONAL_SUFFIX`] (exact, case-sensitive) and be a
/// well-formed RFC 5322 address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new validated institutional email address.
    ///
    /// # Errors
    /// * `NotInstitutional` - Email does not end with the institutional suffix
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailError> {
        if !email.ends_with(INSTITUTIONAL_SUFFIX) {
            return Err(EmailError::NotInstitutional {
                email,
                suffix: INSTITUTIONAL_SUFFIX,
            });
        }

        email_address::EmailAddress::from_str(&email)
            .map(|_| EmailAddress(email))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Command to register a new account with domain types
#[derive(Debug)]
pub struct RegisterCommand {
    pub name: String,
    pub email: EmailAddress,
    pub password: String,
}

impl RegisterCommand {
    /// Validate raw registration input.
    ///
    /// Presence is checked before the email domain, so an incomplete request
    /// is always a validation error.
    ///
    /// # Errors
    /// * `MissingRegistrationFields` - Name, email or password is empty
    /// * `InvalidEmail` - Email is not institutional or malformed
    pub fn new(name: String, email: String, password: String) -> Result<Self, UserError> {
        if is_blank(&name) || is_blank(&email) || password.is_empty() {
            return Err(UserError::MissingRegistrationFields);
        }

        let email = EmailAddress::new(email)?;

        Ok(Self {
            name,
            email,
            password,
        })
    }
}

/// Command to log in with raw credentials
#[derive(Debug)]
pub struct LoginCommand {
    pub email: String,
    pub password: String,
}

impl LoginCommand {
    /// # Errors
    /// * `MissingCredentials` - Email or password is empty
    pub fn new(email: String, password: String) -> Result<Self, UserError> {
        if is_blank(&email) || password.is_empty() {
            return Err(UserError::MissingCredentials);
        }

        Ok(Self { email, password })
    }
}

/// Identity returned by a successful registration or login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub email: String,
    pub name: String,
    pub token: String,
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}
