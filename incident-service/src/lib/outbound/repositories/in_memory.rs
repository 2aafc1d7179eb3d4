use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::incident::errors::IncidentError;
use crate::domain::incident::models::Incident;
use crate::domain::incident::models::IncidentId;
use crate::domain::incident::ports::IncidentRepository;
use crate::domain::user::models::User;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

/// In-process credential store.
///
/// Intended for local runs and tests; contents are lost on restart.
/// Duplicate emails are rejected under the write lock.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<String, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> Result<User, UserError> {
        let mut users = self.users.write().await;
        let key = user.email.as_str().to_string();

        if users.contains_key(&key) {
            return Err(UserError::EmailAlreadyExists(key));
        }

        users.insert(key, user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
        Ok(self.users.read().await.get(email).cloned())
    }
}

#[derive(Debug, Default)]
struct IncidentTable {
    by_id: HashMap<IncidentId, Incident>,
    /// Ids in insertion order
    order: Vec<IncidentId>,
}

/// In-process incident store.
///
/// Intended for local runs and tests; contents are lost on restart.
#[derive(Debug, Default)]
pub struct InMemoryIncidentRepository {
    table: RwLock<IncidentTable>,
}

impl InMemoryIncidentRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl IncidentRepository for InMemoryIncidentRepository {
    async fn create(&self, incident: Incident) -> Result<Incident, IncidentError> {
        let mut table = self.table.write().await;

        if table.by_id.insert(incident.id, incident.clone()).is_none() {
            table.order.push(incident.id);
        }

        Ok(incident)
    }

    async fn find_by_id(&self, id: &IncidentId) -> Result<Option<Incident>, IncidentError> {
        Ok(self.table.read().await.by_id.get(id).cloned())
    }

    async fn scan(&self) -> Result<Vec<Incident>, IncidentError> {
        let table = self.table.read().await;

        Ok(table
            .order
            .iter()
            .filter_map(|id| table.by_id.get(id).cloned())
            .collect())
    }
}
