use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::SubsecRound;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::incident::errors::FloorError;
use crate::domain::incident::errors::IncidentError;
use crate::domain::incident::errors::IncidentIdError;
use crate::domain::incident::errors::IncidentTypeError;

/// Incident aggregate.
///
/// Created once by an authenticated reporter; never updated or deleted.
/// `risk_level` is always derived from `incident_type`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Incident {
    pub id: IncidentId,
    pub title: String,
    pub description: String,
    pub incident_type: IncidentType,
    pub floor: Floor,
    pub specific_location: String,
    pub photo: Option<String>,
    pub risk_level: RiskLevel,
    pub created_at: DateTime<Utc>,
    pub status: IncidentStatus,
    pub report_count: u32,
    pub reported_by_email: String,
    pub reporter_name: String,
}

impl Incident {
    /// Build a new pending incident from a validated command.
    ///
    /// # Arguments
    /// * `command` - Validated incident fields
    /// * `reporter` - Authenticated identity filing the report
    /// * `created_at` - Creation instant, truncated to microseconds so the
    ///   returned record matches what the stores keep
    pub fn report(
        command: CreateIncidentCommand,
        reporter: &Reporter,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: IncidentId::new(),
            title: command.title,
            description: command.description,
            risk_level: command.incident_type.risk_level(),
            incident_type: command.incident_type,
            floor: command.floor,
            specific_location: command.specific_location,
            photo: command.photo,
            created_at: created_at.trunc_subsecs(6),
            status: IncidentStatus::Pending,
            report_count: 1,
            reported_by_email: reporter.email.clone(),
            reporter_name: reporter.name.clone(),
        }
    }
}

/// Incident unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IncidentId(pub Uuid);

impl IncidentId {
    /// Generate a new random incident ID.
    ///
    /// # Returns
    /// IncidentId with random UUID v4
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an incident ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, IncidentIdError> {
        Uuid::parse_str(s)
            .map(IncidentId)
            .map_err(|e| IncidentIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for IncidentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for IncidentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Allowed incident categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IncidentType {
    Security,
    Infrastructure,
    Cleaning,
    Equipment,
    Other,
}

impl IncidentType {
    pub const ALL: [IncidentType; 5] = [
        IncidentType::Security,
        IncidentType::Infrastructure,
        IncidentType::Cleaning,
        IncidentType::Equipment,
        IncidentType::Other,
    ];

    /// Wire name of the type.
    pub fn as_str(&self) -> &'static str {
        match self {
            IncidentType::Security => "seguridad",
            IncidentType::Infrastructure => "infraestructura",
            IncidentType::Cleaning => "limpieza",
            IncidentType::Equipment => "equipamiento",
            IncidentType::Other => "otro",
        }
    }

    pub fn risk_level(&self) -> RiskLevel {
        RiskLevel::classify(self.as_str())
    }

    fn allowed_list() -> String {
        Self::ALL
            .iter()
            .map(IncidentType::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl FromStr for IncidentType {
    type Err = IncidentTypeError;

    /// Parse a type name, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();

        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == normalized)
            .ok_or_else(|| IncidentTypeError::NotAllowed {
                given: s.to_string(),
                allowed: Self::allowed_list(),
            })
    }
}

impl fmt::Display for IncidentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity derived from an incident type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RiskLevel {
    High,
    Medium,
    Low,
}

impl RiskLevel {
    const HIGH_RISK_TYPES: [&'static str; 2] = ["seguridad", "infraestructura"];
    const MEDIUM_RISK_TYPES: [&'static str; 2] = ["equipamiento", "limpieza"];

    /// Classify a raw type name.
    ///
    /// Pure and total: comparison ignores case and any unrecognised name,
    /// like `otro`, is low risk.
    pub fn classify(incident_type: &str) -> Self {
        let normalized = incident_type.to_lowercase();

        if Self::HIGH_RISK_TYPES.contains(&normalized.as_str()) {
            RiskLevel::High
        } else if Self::MEDIUM_RISK_TYPES.contains(&normalized.as_str()) {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::High => "alto",
            RiskLevel::Medium => "medio",
            RiskLevel::Low => "bajo",
        }
    }
}

impl FromStr for RiskLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "alto" => Ok(RiskLevel::High),
            "medio" => Ok(RiskLevel::Medium),
            "bajo" => Ok(RiskLevel::Low),
            other => Err(format!("Unknown risk level: {}", other)),
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Workflow state of an incident.
///
/// Only the initial state exists; no transitions are defined yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IncidentStatus {
    Pending,
}

impl IncidentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            IncidentStatus::Pending => "pendiente",
        }
    }
}

impl FromStr for IncidentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pendiente" => Ok(IncidentStatus::Pending),
            other => Err(format!("Unknown incident status: {}", other)),
        }
    }
}

/// Building floor, a signed integer (basements are negative).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Floor(i32);

impl Floor {
    pub fn value(&self) -> i32 {
        self.0
    }
}

impl From<i32> for Floor {
    fn from(value: i32) -> Self {
        Self(value)
    }
}

impl TryFrom<i64> for Floor {
    type Error = FloorError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        i32::try_from(value)
            .map(Floor)
            .map_err(|_| FloorError::OutOfRange(value))
    }
}

impl FromStr for Floor {
    type Err = FloorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: i64 = s
            .trim()
            .parse()
            .map_err(|_| FloorError::NotAnInteger(s.to_string()))?;

        Floor::try_from(value)
    }
}

/// Floor as received from a client, before validation.
#[derive(Debug, Clone, PartialEq)]
pub enum FloorInput {
    Integer(i64),
    Text(String),
    /// Any other JSON value (fractional number, boolean, array, ...)
    Invalid(String),
}

impl FloorInput {
    fn is_blank(&self) -> bool {
        matches!(self, FloorInput::Text(s) if s.trim().is_empty())
    }

    fn parse(self) -> Result<Floor, FloorError> {
        match self {
            FloorInput::Integer(value) => Floor::try_from(value),
            FloorInput::Text(text) => text.parse(),
            FloorInput::Invalid(raw) => Err(FloorError::NotAnInteger(raw)),
        }
    }
}

/// Identity of the authenticated user filing or reading reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reporter {
    pub email: String,
    pub name: String,
}

/// Raw incident fields, every one optional, as received at the boundary.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IncidentDraft {
    pub title: Option<String>,
    pub description: Option<String>,
    pub incident_type: Option<String>,
    pub floor: Option<FloorInput>,
    pub specific_location: Option<String>,
    pub photo: Option<String>,
}

/// Command to create an incident with domain types
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateIncidentCommand {
    pub title: String,
    pub description: String,
    pub incident_type: IncidentType,
    pub floor: Floor,
    pub specific_location: String,
    pub photo: Option<String>,
}

impl TryFrom<IncidentDraft> for CreateIncidentCommand {
    type Error = IncidentError;

    /// Validate a draft.
    ///
    /// Presence of every required field is checked first, then the type and
    /// the floor. An empty photo is treated as no photo.
    fn try_from(draft: IncidentDraft) -> Result<Self, Self::Error> {
        let title = draft.title.filter(|s| !s.trim().is_empty());
        let description = draft.description.filter(|s| !s.trim().is_empty());
        let incident_type = draft.incident_type.filter(|s| !s.trim().is_empty());
        let floor = draft.floor.filter(|f| !f.is_blank());
        let specific_location = draft.specific_location.filter(|s| !s.trim().is_empty());

        match (title, description, incident_type, floor, specific_location) {
            (
                Some(title),
                Some(description),
                Some(incident_type),
                Some(floor),
                Some(specific_location),
            ) => Ok(Self {
                title,
                description,
                incident_type: incident_type.parse()?,
                floor: floor.parse()?,
                specific_location,
                photo: draft.photo.filter(|s| !s.trim().is_empty()),
            }),
            (title, description, incident_type, floor, specific_location) => {
                let missing = [
                    ("titulo", title.is_none()),
                    ("descripcion", description.is_none()),
                    ("tipo", incident_type.is_none()),
                    ("piso", floor.is_none()),
                    ("lugar_especifico", specific_location.is_none()),
                ]
                .into_iter()
                .filter(|(_, absent)| *absent)
                .map(|(field, _)| field)
                .collect();

                Err(IncidentError::MissingFields(missing))
            }
        }
    }
}

/// All incidents, newest first, with their count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncidentListing {
    pub total: usize,
    pub incidents: Vec<Incident>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_draft() -> IncidentDraft {
        IncidentDraft {
            title: Some("Puerta rota".to_string()),
            description: Some("La puerta del aula no cierra".to_string()),
            incident_type: Some("Seguridad".to_string()),
            floor: Some(FloorInput::Integer(3)),
            specific_location: Some("Aula A301".to_string()),
            photo: None,
        }
    }

    #[test]
    fn test_classify_risk() {
        assert_eq!(RiskLevel::classify("seguridad"), RiskLevel::High);
        assert_eq!(RiskLevel::classify("infraestructura"), RiskLevel::High);
        assert_eq!(RiskLevel::classify("equipamiento"), RiskLevel::Medium);
        assert_eq!(RiskLevel::classify("limpieza"), RiskLevel::Medium);
        assert_eq!(RiskLevel::classify("otro"), RiskLevel::Low);
        assert_eq!(RiskLevel::classify("cualquier cosa"), RiskLevel::Low);
        assert_eq!(RiskLevel::classify(""), RiskLevel::Low);
    }

    #[test]
    fn test_classify_risk_ignores_case() {
        for incident_type in IncidentType::ALL {
            let name = incident_type.as_str();
            let expected = RiskLevel::classify(name);

            assert_eq!(RiskLevel::classify(&name.to_uppercase()), expected);
            assert_eq!(RiskLevel::classify(&capitalize(name)), expected);
            assert_eq!(incident_type.risk_level(), expected);
        }
    }

    #[test]
    fn test_risk_level_wire_names() {
        assert_eq!(IncidentType::Security.risk_level().as_str(), "alto");
        assert_eq!(IncidentType::Cleaning.risk_level().as_str(), "medio");
        assert_eq!(IncidentType::Other.risk_level().as_str(), "bajo");
        assert_eq!("medio".parse::<RiskLevel>(), Ok(RiskLevel::Medium));
    }

    #[test]
    fn test_incident_type_parse_normalizes_case() {
        assert_eq!(
            "SEGURIDAD".parse::<IncidentType>(),
            Ok(IncidentType::Security)
        );
        assert_eq!(
            "Limpieza".parse::<IncidentType>(),
            Ok(IncidentType::Cleaning)
        );
        assert_eq!("otro".parse::<IncidentType>(), Ok(IncidentType::Other));
    }

    #[test]
    fn test_incident_type_parse_lists_allowed_values() {
        let err = "incendio".parse::<IncidentType>().unwrap_err();
        let message = err.to_string();

        for incident_type in IncidentType::ALL {
            assert!(message.contains(incident_type.as_str()));
        }
    }

    #[test]
    fn test_floor_parsing() {
        assert_eq!("4".parse::<Floor>(), Ok(Floor::from(4)));
        assert_eq!(" -1 ".parse::<Floor>(), Ok(Floor::from(-1)));
        assert!(matches!(
            "tercero".parse::<Floor>(),
            Err(FloorError::NotAnInteger(_))
        ));
        assert!(matches!(
            "3abc".parse::<Floor>(),
            Err(FloorError::NotAnInteger(_))
        ));
        assert_eq!(
            Floor::try_from(i64::MAX),
            Err(FloorError::OutOfRange(i64::MAX))
        );
    }

    #[test]
    fn test_command_from_complete_draft() {
        let command = CreateIncidentCommand::try_from(complete_draft()).unwrap();

        assert_eq!(command.incident_type, IncidentType::Security);
        assert_eq!(command.floor.value(), 3);
        assert_eq!(command.photo, None);
    }

    #[test]
    fn test_command_names_missing_fields() {
        let draft = IncidentDraft {
            title: Some("".to_string()),
            floor: None,
            ..complete_draft()
        };

        let err = CreateIncidentCommand::try_from(draft).unwrap_err();
        assert_eq!(err, IncidentError::MissingFields(vec!["titulo", "piso"]));
        assert!(err.to_string().ends_with("Faltan: titulo, piso"));
    }

    #[test]
    fn test_command_rejects_unknown_type() {
        let draft = IncidentDraft {
            incident_type: Some("incendio".to_string()),
            ..complete_draft()
        };

        let err = CreateIncidentCommand::try_from(draft).unwrap_err();
        assert!(matches!(err, IncidentError::InvalidType(_)));
    }

    #[test]
    fn test_command_rejects_non_numeric_floor() {
        let draft = IncidentDraft {
            floor: Some(FloorInput::Text("segundo".to_string())),
            ..complete_draft()
        };
        assert!(matches!(
            CreateIncidentCommand::try_from(draft).unwrap_err(),
            IncidentError::InvalidFloor(_)
        ));

        let draft = IncidentDraft {
            floor: Some(FloorInput::Invalid("2.5".to_string())),
            ..complete_draft()
        };
        assert!(matches!(
            CreateIncidentCommand::try_from(draft).unwrap_err(),
            IncidentError::InvalidFloor(_)
        ));
    }

    #[test]
    fn test_command_accepts_numeric_string_floor() {
        let draft = IncidentDraft {
            floor: Some(FloorInput::Text("2".to_string())),
            photo: Some("".to_string()),
            ..complete_draft()
        };

        let command = CreateIncidentCommand::try_from(draft).unwrap();
        assert_eq!(command.floor.value(), 2);
        assert_eq!(command.photo, None);
    }

    #[test]
    fn test_report_derives_fields() {
        let command = CreateIncidentCommand::try_from(IncidentDraft {
            incident_type: Some("otro".to_string()),
            photo: Some("https://example.com/foto.jpg".to_string()),
            ..complete_draft()
        })
        .unwrap();
        let reporter = Reporter {
            email: "ana@utec.edu.pe".to_string(),
            name: "Ana".to_string(),
        };
        let now = Utc::now();

        let incident = Incident::report(command, &reporter, now);

        assert_eq!(incident.incident_type, IncidentType::Other);
        assert_eq!(incident.risk_level, RiskLevel::Low);
        assert_eq!(incident.status, IncidentStatus::Pending);
        assert_eq!(incident.report_count, 1);
        assert_eq!(incident.created_at, now.trunc_subsecs(6));
        assert_eq!(incident.reported_by_email, "ana@utec.edu.pe");
        assert_eq!(incident.reporter_name, "Ana");
        assert_eq!(incident.photo.as_deref(), Some("https://example.com/foto.jpg"));
    }

    #[test]
    fn test_report_keeps_microsecond_precision() {
        let command = CreateIncidentCommand::try_from(complete_draft()).unwrap();
        let reporter = Reporter {
            email: "ana@utec.edu.pe".to_string(),
            name: "Ana".to_string(),
        };
        let created_at = DateTime::parse_from_rfc3339("2024-05-01T12:00:00.123456789Z")
            .unwrap()
            .with_timezone(&Utc);

        let incident = Incident::report(command, &reporter, created_at);

        assert_eq!(
            incident.created_at.to_rfc3339(),
            "2024-05-01T12:00:00.123456+00:00"
        );
    }

    fn capitalize(s: &str) -> String {
        let mut chars = s.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}
