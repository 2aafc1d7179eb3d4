pub mod bearer;
pub mod claims;
pub mod errors;
pub mod handler;

pub use bearer::bearer_token;
pub use claims::Claims;
pub use claims::TOKEN_LIFETIME_HOURS;
pub use errors::JwtError;
pub use handler::JwtHandler;
