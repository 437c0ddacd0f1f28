use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    response::{IntoResponse, Response},
    Json,
};
use http::StatusCode;
use tracing::error;

use crate::{catalog::CatalogError, rest_api::ApiResponse};

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("{message}")]
    InvalidRequest { status: StatusCode, message: String },

    #[error("Bulk create failed after {created} games")]
    PartialBulk { created: usize },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<potato_dal::Error> for ApiError {
    fn from(value: potato_dal::Error) -> Self {
        match value {
            potato_dal::Error::RecordNotFound(what) => ApiError::NotFound(what),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<CatalogError> for ApiError {
    fn from(value: CatalogError) -> Self {
        match value {
            CatalogError::Store(e) => e.into(),
            CatalogError::PartialBulk { created, source } => {
                error!("Bulk create error: {source}");
                ApiError::PartialBulk { created }
            }
        }
    }
}

impl From<std::num::TryFromIntError> for ApiError {
    fn from(value: std::num::TryFromIntError) -> Self {
        ApiError::Internal(value.to_string())
    }
}

macro_rules! rejection_into_api_error {
    ($($rejection:ty),+) => {
        $(
            impl From<$rejection> for ApiError {
                fn from(value: $rejection) -> Self {
                    ApiError::InvalidRequest {
                        status: value.status(),
                        message: value.body_text(),
                    }
                }
            }
        )+
    };
}

rejection_into_api_error!(PathRejection, QueryRejection, JsonRejection);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            ApiError::InvalidRequest { status, message } => (status, message),
            ApiError::PartialBulk { .. } => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
            ApiError::Internal(cause) => {
                error!("Internal error: {cause}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(ApiResponse::failure(message))).into_response()
    }
}
