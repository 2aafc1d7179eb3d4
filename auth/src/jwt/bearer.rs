const BEARER_PREFIX: &str = "Bearer ";

/// Extract the token from an `Authorization` header value.
///
/// Only the `Bearer <token>` scheme yields a token. An absent header, any
/// other scheme, or an empty token all yield `None`.
pub fn bearer_token(authorization: Option<&str>) -> Option<&str> {
    authorization?
        .strip_prefix(BEARER_PREFIX)
        .map(str::trim)
        .filter(|token| !token.is_empty())
}
