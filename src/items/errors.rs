use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use crate::auth::dtos::ErrorResponse;
use crate::extraction::ExtractionError;

#[derive(Error, Debug)]
pub enum ItemsError {
    #[error("{0}")]
    Validation(String),

    /// Unknown id and someone else's id look the same from outside.
    #[error("Item not found")]
    NotFound,

    #[error("Link discovery failed: {0}")]
    Discovery(#[from] ExtractionError),

    #[error("Internal server error")]
    Store(#[from] anyhow::Error),
}

impl IntoResponse for ItemsError {
    fn into_response(self) -> Response {
        let status = match &self {
            ItemsError::Validation(_) => StatusCode::BAD_REQUEST,
            ItemsError::NotFound => StatusCode::NOT_FOUND,
            ItemsError::Discovery(_) => StatusCode::BAD_GATEWAY,
            ItemsError::Store(err) => {
                error!(error = %err, "item store failure");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ItemsError::Validation("bad".into()).into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ItemsError::NotFound.into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ItemsError::from(ExtractionError::Timeout)
                .into_response()
                .status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ItemsError::from(anyhow::anyhow!("pool timed out"))
                .into_response()
                .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_store_errors_do_not_leak_details() {
        let err = ItemsError::from(anyhow::anyhow!("password authentication failed"));
        assert_eq!(err.to_string(), "Internal server error");
    }
}
