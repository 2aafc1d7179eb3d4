use crate::jwt::bearer_token;
use crate::jwt::Claims;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::password::PasswordError;
use crate::password::PasswordHasher;

/// Authentication coordinator combining password verification and token handling.
///
/// Holds the process-wide signing secret; construct once at startup and share
/// behind an `Arc`.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    jwt_handler: JwtHandler,
}

/// Result of successful authentication.
#[derive(Debug)]
pub struct AuthenticationResult {
    /// Signed access token
    pub access_token: String,
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Missing bearer token")]
    MissingBearerToken,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("JWT error: {0}")]
    JwtError(#[from] JwtError),
}

impl Authenticator {
    /// Create a new authenticator.
    ///
    /// # Arguments
    /// * `jwt_secret` - Secret key for token signing
    pub fn new(jwt_secret: &[u8]) -> Self {
        Self {
            password_hasher: PasswordHasher::new(),
            jwt_handler: JwtHandler::new(jwt_secret),
        }
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Check a password against a stored hash without issuing a token.
    ///
    /// # Errors
    /// * `PasswordError` - Stored hash could not be parsed
    pub fn verify_password(
        &self,
        password: &str,
        stored_hash: &str,
    ) -> Result<bool, PasswordError> {
        self.password_hasher.verify(password, stored_hash)
    }

    /// Verify a password and issue a token for the given claims.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `stored_hash` - Stored password hash
    /// * `claims` - Identity claims to encode in the token
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `PasswordError` - Stored hash could not be parsed
    /// * `JwtError` - Token generation failed
    pub fn authenticate(
        &self,
        password: &str,
        stored_hash: &str,
        claims: &Claims,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        let is_valid = self.verify_password(password, stored_hash)?;

        if !is_valid {
            return Err(AuthenticationError::InvalidCredentials);
        }

        let access_token = self.jwt_handler.encode(claims)?;

        Ok(AuthenticationResult { access_token })
    }

    /// Issue a token without password verification.
    ///
    /// Used right after registration, where the password was just set.
    ///
    /// # Errors
    /// * `JwtError` - Token generation failed
    pub fn issue_token(&self, claims: &Claims) -> Result<String, JwtError> {
        self.jwt_handler.encode(claims)
    }

    /// Validate a token and return its claims.
    ///
    /// # Errors
    /// * `JwtError` - Token is malformed, forged, or expired
    pub fn verify_token(&self, token: &str) -> Result<Claims, JwtError> {
        self.jwt_handler.decode(token)
    }

    /// Resolve the identity carried by an `Authorization` header value.
    ///
    /// # Errors
    /// * `MissingBearerToken` - Header absent or not using the `Bearer` scheme
    /// * `JwtError` - Token is malformed, forged, or expired
    pub fn identify(&self, authorization: Option<&str>) -> Result<Claims, AuthenticationError> {
        let token = bearer_token(authorization).ok_or(AuthenticationError::MissingBearerToken)?;

        Ok(self.verify_token(token)?)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use chrono::Utc;

    use super::*;

    const SECRET: &[u8] = b"test_secret_key_at_least_32_bytes!";

    #[test]
    fn test_authenticate_success() {
        let authenticator = Authenticator::new(SECRET);

        let password = "secret1";
        let hash = authenticator
            .hash_password(password)
            .expect("Failed to hash password");

        let claims = Claims::for_identity("ana@utec.edu.pe", "Ana");
        let result = authenticator
            .authenticate(password, &hash, &claims)
            .expect("Authentication failed");

        assert!(!result.access_token.is_empty());

        let decoded = authenticator
            .verify_token(&result.access_token)
            .expect("Token validation failed");
        assert_eq!(decoded, claims);
    }

    #[test]
    fn test_authenticate_invalid_password() {
        let authenticator = Authenticator::new(SECRET);

        let hash = authenticator
            .hash_password("secret1")
            .expect("Failed to hash password");

        let claims = Claims::for_identity("ana@utec.edu.pe", "Ana");

        let result = authenticator.authenticate("wrong_password", &hash, &claims);
        assert!(matches!(
            result,
            Err(AuthenticationError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_verify_password() {
        let authenticator = Authenticator::new(SECRET);
        let hash = authenticator.hash_password("secret1").unwrap();

        assert_eq!(authenticator.verify_password("secret1", &hash), Ok(true));
        assert_eq!(authenticator.verify_password("secret2", &hash), Ok(false));
        assert!(authenticator.verify_password("secret1", "not-a-hash").is_err());
    }

    #[test]
    fn test_issue_and_verify_round_trip() {
        let authenticator = Authenticator::new(SECRET);
        let claims = Claims::for_identity("a@utec.edu.pe", "A");

        let token = authenticator
            .issue_token(&claims)
            .expect("Failed to generate token");

        let decoded = authenticator
            .verify_token(&token)
            .expect("Failed to validate token");
        assert_eq!(decoded.email, "a@utec.edu.pe");
        assert_eq!(decoded.name, "A");
    }

    #[test]
    fn test_round_trip_fails_after_lifetime() {
        let authenticator = Authenticator::new(SECRET);
        let claims = Claims::issued_at(
            "a@utec.edu.pe",
            "A",
            Utc::now() - Duration::hours(24) - Duration::seconds(5),
        );

        let token = authenticator
            .issue_token(&claims)
            .expect("Failed to generate token");

        let result = authenticator.verify_token(&token);
        assert_eq!(result, Err(JwtError::TokenExpired));
    }

    #[test]
    fn test_identify_from_header() {
        let authenticator = Authenticator::new(SECRET);
        let token = authenticator
            .issue_token(&Claims::for_identity("a@utec.edu.pe", "A"))
            .expect("Failed to generate token");

        let header = format!("Bearer {}", token);
        let claims = authenticator
            .identify(Some(&header))
            .expect("Failed to identify");
        assert_eq!(claims.email, "a@utec.edu.pe");
    }

    #[test]
    fn test_identify_without_bearer_scheme() {
        let authenticator = Authenticator::new(SECRET);
        let token = authenticator
            .issue_token(&Claims::for_identity("a@utec.edu.pe", "A"))
            .expect("Failed to generate token");

        assert!(matches!(
            authenticator.identify(None),
            Err(AuthenticationError::MissingBearerToken)
        ));
        assert!(matches!(
            authenticator.identify(Some(&token)),
            Err(AuthenticationError::MissingBearerToken)
        ));
        assert!(matches!(
            authenticator.identify(Some(&format!("Token {}", token))),
            Err(AuthenticationError::MissingBearerToken)
        ));
    }

    #[test]
    fn test_identify_invalid_token() {
        let authenticator = Authenticator::new(SECRET);

        let result = authenticator.identify(Some("Bearer invalid.token.here"));
        assert!(matches!(result, Err(AuthenticationError::JwtError(_))));
    }
}
