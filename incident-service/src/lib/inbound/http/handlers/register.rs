use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::SessionData;
use crate::domain::user::models::RegisterCommand;
use crate::inbound::http::router::AppState;

pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<ApiSuccess<SessionData>, ApiError> {
    let Json(body) = body?;

    state
        .auth_service
        .register(body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|session| {
            ApiSuccess::new(
                StatusCode::CREATED,
                "Usuario registrado exitosamente",
                session.into(),
            )
        })
}

/// HTTP request body for registration (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegisterRequest {
    #[serde(rename = "nombre", default)]
    name: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    password: Option<String>,
}

impl RegisterRequest {
    fn try_into_command(self) -> Result<RegisterCommand, ApiError> {
        RegisterCommand::new(
            self.name.unwrap_or_default(),
            self.email.unwrap_or_default(),
            self.password.unwrap_or_default(),
        )
        .map_err(ApiError::from)
    }
}
