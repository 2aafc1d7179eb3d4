use thiserror::Error;

/// Error for IncidentId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IncidentIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error for IncidentType parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IncidentTypeError {
    #[error("Tipo inválido. Tipos permitidos: {allowed}")]
    NotAllowed { given: String, allowed: String },
}

/// Error for Floor parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FloorError {
    #[error("El piso debe ser un número entero, se recibió: {0}")]
    NotAnInteger(String),

    #[error("Piso fuera de rango: {0}")]
    OutOfRange(i64),
}

/// Top-level error for all incident operations
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IncidentError {
    // Input validation errors
    #[error("Todos los campos son requeridos: titulo, descripcion, tipo, piso, lugar_especifico. Faltan: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("{0}")]
    InvalidType(#[from] IncidentTypeError),

    #[error("{0}")]
    InvalidFloor(#[from] FloorError),

    // Domain-level errors
    #[error("Incidente no encontrado")]
    NotFound(String),

    // Infrastructure errors
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}
