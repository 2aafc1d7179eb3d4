use async_trait::async_trait;

use crate::domain::incident::errors::IncidentError;
use crate::domain::incident::models::CreateIncidentCommand;
use crate::domain::incident::models::Incident;
use crate::domain::incident::models::IncidentId;
use crate::domain::incident::models::IncidentListing;
use crate::domain::incident::models::Reporter;

/// Port for incident domain service operations.
///
/// Every operation takes the authenticated [`Reporter`]; there is no
/// anonymous access to incidents.
#[async_trait]
pub trait IncidentServicePort: Send + Sync + 'static {
    /// File a new incident.
    ///
    /// # Arguments
    /// * `reporter` - Authenticated identity filing the report
    /// * `command` - Validated incident fields
    ///
    /// # Returns
    /// Created incident with derived risk level, id and timestamp
    ///
    /// # Errors
    /// * `DatabaseError` - Store operation failed
    async fn create_incident(
        &self,
        reporter: &Reporter,
        command: CreateIncidentCommand,
    ) -> Result<Incident, IncidentError>;

    /// List every incident, newest first.
    ///
    /// # Errors
    /// * `DatabaseError` - Store operation failed
    async fn list_incidents(&self, reporter: &Reporter) -> Result<IncidentListing, IncidentError>;

    /// Retrieve a single incident.
    ///
    /// # Errors
    /// * `NotFound` - Incident does not exist
    /// * `DatabaseError` - Store operation failed
    async fn get_incident(
        &self,
        reporter: &Reporter,
        id: &IncidentId,
    ) -> Result<Incident, IncidentError>;
}

/// Incident store keyed by id.
#[async_trait]
pub trait IncidentRepository: Send + Sync + 'static {
    /// Persist a new incident.
    ///
    /// # Errors
    /// * `DatabaseError` - Store operation failed
    async fn create(&self, incident: Incident) -> Result<Incident, IncidentError>;

    /// Retrieve incident by identifier.
    ///
    /// # Returns
    /// Optional incident (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Store operation failed
    async fn find_by_id(&self, id: &IncidentId) -> Result<Option<Incident>, IncidentError>;

    /// Read every stored incident in insertion order.
    ///
    /// Unbounded full scan; pagination would be added here without changing
    /// the service contract.
    ///
    /// # Errors
    /// * `DatabaseError` - Store operation failed
    async fn scan(&self) -> Result<Vec<Incident>, IncidentError>;
}
