use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use strum_macros::AsRefStr;

use super::{auth::AuthError, types::DataParsingError};
use crate::database;

pub type WebResult<T> = core::result::Result<T, Error>;

#[derive(Debug, AsRefStr, thiserror::Error)]
pub enum Error {
    #[error("request body could not be decoded: {0}")]
    InvalidBody(String),

    #[error("data parsing error: {0}")]
    DataParsing(#[from] DataParsingError),
    #[error("auth error: {0}")]
    Auth(#[from] AuthError),
    #[error("database error: {0}")]
    Database(#[from] database::Error),
}

impl Error {
    pub fn status_code_and_client_error(&self) -> (StatusCode, ClientError) {
        use ClientError::*;

        match self {
            Error::InvalidBody(detail) => (StatusCode::BAD_REQUEST, InvalidInput(detail.clone())),
            Error::DataParsing(data_er) => {
                (StatusCode::BAD_REQUEST, InvalidInput(data_er.to_string()))
            }
            Error::Auth(auth_er) => auth_er.status_code_and_client_error(),
            Error::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, ServiceError),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        tracing::debug!("{:<12} - into_response(Error: {self:?})", "INTO_RESP");

        // Construct a response
        let mut res = StatusCode::INTERNAL_SERVER_ERROR.into_response();

        // Insert the Error into response so that it can be retrieved later.
        res.extensions_mut().insert(Arc::new(self));

        res
    }
}

/// What the client gets to see. Never carries server-side details.
#[derive(Debug, AsRefStr, derive_more::Display)]
pub enum ClientError {
    #[display("Invalid input: {_0}")]
    InvalidInput(String),
    #[display("Internal Server Error")]
    ServiceError,
    #[display("Unauthorized")]
    Unauthorized,
}
