use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use crate::domain::incident::errors::IncidentError;
use crate::domain::incident::models::Incident;
use crate::domain::user::models::AuthSession;
use crate::user::errors::EmailError;
use crate::user::errors::UserError;

pub mod create_incident;
pub mod get_incident;
pub mod list_incidents;
pub mod login;
pub mod register;

/// Message returned for every failed bearer authentication.
pub const UNAUTHENTICATED_MESSAGE: &str = "Token inválido o no proporcionado";

const INTERNAL_ERROR_MESSAGE: &str = "Error interno del servidor";

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<ApiResponseBody<T>>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, message: impl Into<String>, data: T) -> Self {
        ApiSuccess(status, Json(ApiResponseBody::new(message, data)))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    BadRequest(String),
    Forbidden(String),
    NotFound(String),
    Conflict(String),
    Unauthorized(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::InternalServerError(detail) => {
                tracing::error!(error = %detail, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiResponseBody::new_error(INTERNAL_ERROR_MESSAGE, Some(detail)),
                )
            }
            ApiError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, ApiResponseBody::new_error(msg, None))
            }
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, ApiResponseBody::new_error(msg, None)),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, ApiResponseBody::new_error(msg, None)),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, ApiResponseBody::new_error(msg, None)),
            ApiError::Unauthorized(msg) => {
                (StatusCode::UNAUTHORIZED, ApiResponseBody::new_error(msg, None))
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::MissingRegistrationFields
            | UserError::MissingCredentials
            | UserError::InvalidEmail(EmailError::InvalidFormat(_)) => {
                ApiError::BadRequest(err.to_string())
            }
            UserError::InvalidEmail(EmailError::NotInstitutional { .. }) => {
                ApiError::Forbidden(err.to_string())
            }
            UserError::EmailAlreadyExists(_) => ApiError::Conflict(err.to_string()),
            UserError::InvalidCredentials => ApiError::Unauthorized(err.to_string()),
            UserError::Password(_)
            | UserError::Token(_)
            | UserError::DatabaseError(_)
            | UserError::Unknown(_) => ApiError::InternalServerError(err.to_string()),
        }
    }
}

impl From<IncidentError> for ApiError {
    fn from(err: IncidentError) -> Self {
        match err {
            IncidentError::MissingFields(_)
            | IncidentError::InvalidType(_)
            | IncidentError::InvalidFloor(_) => ApiError::BadRequest(err.to_string()),
            IncidentError::NotFound(_) => ApiError::NotFound(err.to_string()),
            IncidentError::DatabaseError(_) | IncidentError::Unknown(_) => {
                ApiError::InternalServerError(err.to_string())
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(format!("Cuerpo JSON inválido: {}", rejection.body_text()))
    }
}

/// Envelope shared by every response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponseBody<T: Serialize + PartialEq> {
    success: bool,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T: Serialize + PartialEq> ApiResponseBody<T> {
    pub fn new(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
            error: None,
        }
    }
}

impl ApiResponseBody<()> {
    pub fn new_error(message: impl Into<String>, error: Option<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
            error,
        }
    }
}

/// Identity and token returned by register and login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionData {
    pub email: String,
    #[serde(rename = "nombre")]
    pub name: String,
    pub token: String,
}

impl From<AuthSession> for SessionData {
    fn from(session: AuthSession) -> Self {
        Self {
            email: session.email,
            name: session.name,
            token: session.token,
        }
    }
}

/// Wire representation of a stored incident.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IncidentData {
    pub id: String,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "tipo")]
    pub incident_type: String,
    #[serde(rename = "piso")]
    pub floor: i32,
    #[serde(rename = "lugar_especifico")]
    pub specific_location: String,
    #[serde(rename = "foto")]
    pub photo: Option<String>,
    #[serde(rename = "nivel_riesgo")]
    pub risk_level: String,
    #[serde(rename = "fecha_creacion")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "estado")]
    pub status: String,
    #[serde(rename = "veces_reportado")]
    pub report_count: u32,
    #[serde(rename = "reportado_por")]
    pub reported_by_email: String,
    #[serde(rename = "nombre_reportero")]
    pub reporter_name: String,
}

impl From<&Incident> for IncidentData {
    fn from(incident: &Incident) -> Self {
        Self {
            id: incident.id.to_string(),
            title: incident.title.clone(),
            description: incident.description.clone(),
            incident_type: incident.incident_type.as_str().to_string(),
            floor: incident.floor.value(),
            specific_location: incident.specific_location.clone(),
            photo: incident.photo.clone(),
            risk_level: incident.risk_level.as_str().to_string(),
            created_at: incident.created_at,
            status: incident.status.as_str().to_string(),
            report_count: incident.report_count,
            reported_by_email: incident.reported_by_email.clone(),
            reporter_name: incident.reporter_name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::domain::incident::errors::FloorError;
    use crate::domain::incident::errors::IncidentTypeError;

    #[test]
    fn test_user_errors_map_to_statuses() {
        assert!(matches!(
            ApiError::from(UserError::MissingCredentials),
            ApiError::BadRequest(_)
        ));
        assert!(matches!(
            ApiError::from(UserError::InvalidEmail(EmailError::NotInstitutional {
                email: "ana@gmail.com".to_string(),
                suffix: "@utec.edu.pe",
            })),
            ApiError::Forbidden(_)
        ));
        assert!(matches!(
            ApiError::from(UserError::InvalidEmail(EmailError::InvalidFormat(
                "a b@utec.edu.pe".to_string()
            ))),
            ApiError::BadRequest(_)
        ));
        assert!(matches!(
            ApiError::from(UserError::EmailAlreadyExists("ana@utec.edu.pe".to_string())),
            ApiError::Conflict(_)
        ));
        assert_eq!(
            ApiError::from(UserError::InvalidCredentials),
            ApiError::Unauthorized("Credenciales inválidas".to_string())
        );
        assert!(matches!(
            ApiError::from(UserError::DatabaseError("down".to_string())),
            ApiError::InternalServerError(_)
        ));
    }

    #[test]
    fn test_incident_errors_map_to_statuses() {
        assert!(matches!(
            ApiError::from(IncidentError::MissingFields(vec!["titulo"])),
            ApiError::BadRequest(_)
        ));
        assert!(matches!(
            ApiError::from(IncidentError::InvalidType(IncidentTypeError::NotAllowed {
                given: "fuego".to_string(),
                allowed: "otro".to_string(),
            })),
            ApiError::BadRequest(_)
        ));
        assert!(matches!(
            ApiError::from(IncidentError::InvalidFloor(FloorError::NotAnInteger(
                "2.5".to_string()
            ))),
            ApiError::BadRequest(_)
        ));
        assert_eq!(
            ApiError::from(IncidentError::NotFound("x".to_string())),
            ApiError::NotFound("Incidente no encontrado".to_string())
        );
        assert!(matches!(
            ApiError::from(IncidentError::Unknown("boom".to_string())),
            ApiError::InternalServerError(_)
        ));
    }

    #[test]
    fn test_envelope_omits_absent_fields() {
        let success = serde_json::to_value(ApiResponseBody::new("ok", 1)).unwrap();
        assert_eq!(success, json!({"success": true, "message": "ok", "data": 1}));

        let failure = serde_json::to_value(ApiResponseBody::new_error("nope", None)).unwrap();
        assert_eq!(failure, json!({"success": false, "message": "nope"}));

        let internal =
            serde_json::to_value(ApiResponseBody::new_error(INTERNAL_ERROR_MESSAGE, Some("db".into())))
                .unwrap();
        assert_eq!(internal["error"], "db");
    }
}
