//! Authentication utilities library
//!
//! Provides the authentication infrastructure used by the incident service:
//! - Password hashing (Argon2id)
//! - Signed, time-limited identity tokens (JWT, HS256, 24 hour lifetime)
//! - Bearer header parsing
//! - Authentication coordination
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! let is_valid = hasher.verify("my_password", &hash).unwrap();
//! assert!(is_valid);
//! ```
//!
//! ## Identity Tokens
//! ```
//! use auth::{Claims, JwtHandler};
//!
//! let handler = JwtHandler::new(b"secret_key_at_least_32_bytes_long!");
//! let claims = Claims::for_identity("ana@utec.edu.pe", "Ana");
//! let token = handler.encode(&claims).unwrap();
//! let decoded: Claims = handler.decode(&token).unwrap();
//! assert_eq!(decoded, claims);
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use auth::{Authenticator, Claims};
//!
//! let auth = Authenticator::new(b"secret_key_at_least_32_bytes_long!");
//!
//! // Register: hash password
//! let hash = auth.hash_password("password123").unwrap();
//!
//! // Login: verify and generate token
//! let claims = Claims::for_identity("ana@utec.edu.pe", "Ana");
//! let result = auth.authenticate("password123", &hash, &claims).unwrap();
//!
//! // Resolve the identity behind an Authorization header
//! let header = format!("Bearer {}", result.access_token);
//! let identity = auth.identify(Some(&header)).unwrap();
//! assert_eq!(identity.email, "ana@utec.edu.pe");
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::AuthenticationResult;
pub use authenticator::Authenticator;
pub use jwt::bearer_token;
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use jwt::TOKEN_LIFETIME_HOURS;
pub use password::PasswordError;
pub use password::PasswordHasher;
