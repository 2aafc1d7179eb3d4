use axum::extract::Request;
use axum::extract::State;
use axum::middleware::Next;
use axum::response::Response;
use http::header::AUTHORIZATION;

use super::handlers::ApiError;
use super::handlers::UNAUTHENTICATED_MESSAGE;
use crate::domain::incident::models::Reporter;
use crate::inbound::http::router::AppState;

/// Extension type to store the authenticated identity in request extensions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub email: String,
    pub name: String,
}

impl From<AuthenticatedUser> for Reporter {
    fn from(user: AuthenticatedUser) -> Self {
        Reporter {
            email: user.email,
            name: user.name,
        }
    }
}

/// Middleware that validates bearer tokens and adds the identity to request
/// extensions.
///
/// Every failure (missing header, other scheme, bad signature, expiry)
/// produces the same 401 body.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let authorization = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    let claims = state.authenticator.identify(authorization).map_err(|e| {
        tracing::warn!(error = %e, uri = %req.uri(), "Bearer authentication failed");
        ApiError::Unauthorized(UNAUTHENTICATED_MESSAGE.to_string())
    })?;

    req.extensions_mut().insert(AuthenticatedUser {
        email: claims.email,
        name: claims.name,
    });

    Ok(next.run(req).await)
}
