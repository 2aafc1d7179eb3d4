use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use super::ApiError;
use super::ApiSuccess;
use super::IncidentData;
use crate::domain::incident::errors::IncidentError;
use crate::domain::incident::models::IncidentId;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

pub async fn get_incident(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(incident_id): Path<String>,
) -> Result<ApiSuccess<IncidentData>, ApiError> {
    // An id that cannot exist is reported the same way as a missing one
    let incident_id =
        IncidentId::from_string(&incident_id).map_err(|_| IncidentError::NotFound(incident_id))?;

    state
        .incident_service
        .get_incident(&user.into(), &incident_id)
        .await
        .map_err(ApiError::from)
        .map(|ref incident| {
            ApiSuccess::new(
                StatusCode::OK,
                "Incidente obtenido exitosamente",
                incident.into(),
            )
        })
}
