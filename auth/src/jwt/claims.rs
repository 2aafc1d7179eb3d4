use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Lifetime of every issued token.
pub const TOKEN_LIFETIME_HOURS: i64 = 24;

/// Identity claims carried by an access token.
///
/// The payload is `{email, nombre, iat, exp}`; `exp` is always exactly
/// [`TOKEN_LIFETIME_HOURS`] after `iat`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Account email, the identity key
    pub email: String,

    /// Display name of the account holder
    #[serde(rename = "nombre")]
    pub name: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Create claims for an identity, issued now.
    ///
    /// # Arguments
    /// * `email` - Account email
    /// * `name` - Display name
    ///
    /// # Returns
    /// Claims expiring [`TOKEN_LIFETIME_HOURS`] from now
    pub fn for_identity(email: impl ToString, name: impl ToString) -> Self {
        Self::issued_at(email, name, Utc::now())
    }

    /// Create claims for an identity with an explicit issue time.
    ///
    /// # Arguments
    /// * `email` - Account email
    /// * `name` - Display name
    /// * `issued_at` - Issue instant
    ///
    /// # Returns
    /// Claims expiring [`TOKEN_LIFETIME_HOURS`] after `issued_at`
    pub fn issued_at(email: impl ToString, name: impl ToString, issued_at: DateTime<Utc>) -> Self {
        let expiration = issued_at + Duration::hours(TOKEN_LIFETIME_HOURS);

        Self {
            email: email.to_string(),
            name: name.to_string(),
            iat: issued_at.timestamp(),
            exp: expiration.timestamp(),
        }
    }

    /// Check if the claims are expired at the given Unix timestamp.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp < current_timestamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_identity() {
        let claims = Claims::for_identity("ana@utec.edu.pe", "Ana");

        assert_eq!(claims.email, "ana@utec.edu.pe");
        assert_eq!(claims.name, "Ana");
        assert_eq!(claims.exp - claims.iat, 24 * 60 * 60); // 24 hours
    }

    #[test]
    fn test_issued_at() {
        let issued = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let claims = Claims::issued_at("a@utec.edu.pe", "A", issued);

        assert_eq!(claims.iat, 1_700_000_000);
        assert_eq!(claims.exp, 1_700_000_000 + 86_400);
    }

    #[test]
    fn test_is_expired() {
        let issued = DateTime::from_timestamp(1000, 0).unwrap();
        let claims = Claims::issued_at("a@utec.edu.pe", "A", issued);

        assert!(!claims.is_expired(1000));
        assert!(!claims.is_expired(1000 + 86_400)); // Exactly at expiration
        assert!(claims.is_expired(1000 + 86_401));
    }

    #[test]
    fn test_serialized_payload_uses_nombre() {
        let claims = Claims::for_identity("a@utec.edu.pe", "A");
        let value = serde_json::to_value(&claims).unwrap();

        assert_eq!(value["nombre"], "A");
        assert_eq!(value["email"], "a@utec.edu.pe");
        assert!(value.get("name").is_none());
    }
}
