use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use super::IncidentData;
use crate::domain::incident::models::IncidentListing;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

pub async fn list_incidents(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<ApiSuccess<ListIncidentsResponseData>, ApiError> {
    state
        .incident_service
        .list_incidents(&user.into())
        .await
        .map_err(ApiError::from)
        .map(|ref listing| {
            ApiSuccess::new(
                StatusCode::OK,
                "Incidentes obtenidos exitosamente",
                listing.into(),
            )
        })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListIncidentsResponseData {
    pub total: usize,
    pub incidents: Vec<IncidentData>,
}

impl From<&IncidentListing> for ListIncidentsResponseData {
    fn from(listing: &IncidentListing) -> Self {
        Self {
            total: listing.total,
            incidents: listing.incidents.iter().map(IncidentData::from).collect(),
        }
    }
}
