use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;
use serde_json::Value;

use super::ApiError;
use super::ApiSuccess;
use super::IncidentData;
use crate::domain::incident::models::CreateIncidentCommand;
use crate::domain::incident::models::FloorInput;
use crate::domain::incident::models::IncidentDraft;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

pub async fn create_incident(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    body: Result<Json<CreateIncidentRequest>, JsonRejection>,
) -> Result<ApiSuccess<IncidentData>, ApiError> {
    let Json(body) = body?;
    let command = CreateIncidentCommand::try_from(body.into_draft())?;

    state
        .incident_service
        .create_incident(&user.into(), command)
        .await
        .map_err(ApiError::from)
        .map(|ref incident| {
            ApiSuccess::new(
                StatusCode::CREATED,
                "Incidente creado exitosamente",
                incident.into(),
            )
        })
}

/// HTTP request body for filing an incident (raw JSON)
///
/// `piso` is kept as a raw JSON value so that both `3` and `"3"` are
/// accepted and anything else is reported as a validation error.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CreateIncidentRequest {
    #[serde(rename = "titulo", default)]
    title: Option<String>,
    #[serde(rename = "descripcion", default)]
    description: Option<String>,
    #[serde(rename = "tipo", default)]
    incident_type: Option<String>,
    #[serde(rename = "piso", default)]
    floor: Option<Value>,
    #[serde(rename = "lugar_especifico", default)]
    specific_location: Option<String>,
    #[serde(rename = "foto", default)]
    photo: Option<String>,
}

impl CreateIncidentRequest {
    fn into_draft(self) -> IncidentDraft {
        IncidentDraft {
            title: self.title,
            description: self.description,
            incident_type: self.incident_type,
            floor: self.floor.and_then(floor_input),
            specific_location: self.specific_location,
            photo: self.photo,
        }
    }
}

fn floor_input(value: Value) -> Option<FloorInput> {
    match value {
        Value::Null => None,
        Value::Number(number) => Some(match number.as_i64() {
            Some(integer) => FloorInput::Integer(integer),
            None => FloorInput::Invalid(number.to_string()),
        }),
        Value::String(text) => Some(FloorInput::Text(text)),
        other => Some(FloorInput::Invalid(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn request(floor: Value) -> CreateIncidentRequest {
        serde_json::from_value(json!({
            "titulo": "Fuga",
            "descripcion": "Agua en el pasillo",
            "tipo": "infraestructura",
            "piso": floor,
            "lugar_especifico": "Pasillo B"
        }))
        .unwrap()
    }

    #[test]
    fn test_floor_accepts_integer_and_integer_string() {
        assert_eq!(request(json!(3)).into_draft().floor, Some(FloorInput::Integer(3)));
        assert_eq!(
            request(json!("-1")).into_draft().floor,
            Some(FloorInput::Text("-1".to_string()))
        );
    }

    #[test]
    fn test_floor_other_values_are_invalid() {
        assert!(matches!(
            request(json!(2.5)).into_draft().floor,
            Some(FloorInput::Invalid(_))
        ));
        assert!(matches!(
            request(json!(true)).into_draft().floor,
            Some(FloorInput::Invalid(_))
        ));
        assert_eq!(request(Value::Null).into_draft().floor, None);
    }

    #[test]
    fn test_missing_keys_deserialize_as_absent() {
        let request: CreateIncidentRequest = serde_json::from_value(json!({})).unwrap();
        let draft = request.into_draft();

        assert_eq!(draft, IncidentDraft::default());
    }
}
