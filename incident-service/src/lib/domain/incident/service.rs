use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::incident::errors::IncidentError;
use crate::domain::incident::models::CreateIncidentCommand;
use crate::domain::incident::models::Incident;
use crate::domain::incident::models::IncidentId;
use crate::domain::incident::models::IncidentListing;
use crate::domain::incident::models::Reporter;
use crate::domain::incident::ports::IncidentRepository;
use crate::domain::incident::ports::IncidentServicePort;

/// Domain service implementation for incident operations.
pub struct IncidentService<IR>
where
    IR: IncidentRepository,
{
    repository: Arc<IR>,
}

impl<IR> IncidentService<IR>
where
    IR: IncidentRepository,
{
    pub fn new(repository: Arc<IR>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<IR> IncidentServicePort for IncidentService<IR>
where
    IR: IncidentRepository,
{
    async fn create_incident(
        &self,
        reporter: &Reporter,
        command: CreateIncidentCommand,
    ) -> Result<Incident, IncidentError> {
        let incident = Incident::report(command, reporter, Utc::now());
        let created = self.repository.create(incident).await?;

        tracing::info!(
            incident_id = %created.id,
            incident_type = %created.incident_type,
            risk_level = %created.risk_level,
            reported_by = %created.reported_by_email,
            "Incident created"
        );

        Ok(created)
    }

    async fn list_incidents(&self, reporter: &Reporter) -> Result<IncidentListing, IncidentError> {
        let mut incidents = self.repository.scan().await?;
        // Stable sort: equal timestamps keep insertion order
        incidents.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        tracing::debug!(
            requested_by = %reporter.email,
            total = incidents.len(),
            "Incidents listed"
        );

        Ok(IncidentListing {
            total: incidents.len(),
            incidents,
        })
    }

    async fn get_incident(
        &self,
        reporter: &Reporter,
        id: &IncidentId,
    ) -> Result<Incident, IncidentError> {
        tracing::debug!(requested_by = %reporter.email, incident_id = %id, "Fetching incident");

        self.repository
            .find_by_id(id)
            .await?
            .ok_or(IncidentError::NotFound(id.to_string()))
    }
}
