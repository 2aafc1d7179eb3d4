pub mod in_memory;
pub mod incident;
pub mod user;

pub use in_memory::InMemoryIncidentRepository;
pub use in_memory::InMemoryUserRepository;
pub use incident::PostgresIncidentRepository;
pub use user::PostgresUserRepository;
