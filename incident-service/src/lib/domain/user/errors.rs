use thiserror::Error;

use auth::AuthenticationError;

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Solo se permiten correos institucionales {suffix}")]
    NotInstitutional { email: String, suffix: &'static str },

    #[error("Formato de email inválido: {0}")]
    InvalidFormat(String),
}

/// Top-level error for registration and login
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UserError {
    // Input validation errors
    #[error("Nombre, email y password son requeridos")]
    MissingRegistrationFields,

    #[error("Email y password son requeridos")]
    MissingCredentials,

    #[error("{0}")]
    InvalidEmail(#[from] EmailError),

    // Domain-level errors
    #[error("El email ya está registrado")]
    EmailAlreadyExists(String),

    #[error("Credenciales inválidas")]
    InvalidCredentials,

    // Infrastructure errors
    #[error("Password error: {0}")]
    Password(String),

    #[error("Token error: {0}")]
    Token(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<AuthenticationError> for UserError {
    fn from(err: AuthenticationError) -> Self {
        match err {
            AuthenticationError::InvalidCredentials => UserError::InvalidCredentials,
            AuthenticationError::PasswordError(e) => UserError::Password(e.to_string()),
            AuthenticationError::JwtError(e) => UserError::Token(e.to_string()),
            AuthenticationError::MissingBearerToken => UserError::Unknown(err.to_string()),
        }
    }
}
