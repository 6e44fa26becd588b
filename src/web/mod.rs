pub mod auth;
mod error;
mod log;
pub mod midware;
pub mod routes;
pub mod serve;
pub mod types;

pub use auth::AuthError;
pub use error::{ClientError, Error, WebResult};

pub const REQUEST_ID_HEADER: &str = "x-request-id";
pub const API_KEY_HEADER: &str = "x-api-key";
