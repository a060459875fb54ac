//! Mapping of relay errors to HTTP responses.
//!
//! Every failure is answered with `{"error": "<message>"}`; no partial hash
//! lists are ever returned.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::blockchain::BlockchainError;
use crate::relay::RelayError;

/// Body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Status code reported for a failed relay.
pub fn status_for(error: &RelayError) -> StatusCode {
    match error {
        RelayError::Cancelled => StatusCode::REQUEST_TIMEOUT,
        RelayError::Blockchain(
            BlockchainError::Rpc(_)
            | BlockchainError::Timeout(_)
            | BlockchainError::Rejected { .. },
        ) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorBody {
            error: message.into(),
        }),
    )
        .into_response()
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        error_response(status_for(&self), self.to_string())
    }
}
