use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

use crate::storage::models::EventShapeError;
use crate::storage::StorageError;

/// API 錯誤類型
#[derive(Error, Debug)]
pub enum ApiError {
    /// 請求格式錯誤或缺少欄位，尚未存取資料庫
    #[error("{0}")]
    Validation(String),

    #[error("{entity} {id} does not exist")]
    ReferentialIntegrity { entity: &'static str, id: i64 },

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    /// 資料庫不可用或超時，不在此層重試
    #[error("datastore unavailable: {0}")]
    Infrastructure(String),
}

/// 錯誤回應內容
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::ReferentialIntegrity { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Infrastructure(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "validation_error",
            ApiError::ReferentialIntegrity { .. } => "referential_integrity_error",
            ApiError::NotFound { .. } => "not_found",
            ApiError::Infrastructure(_) => "infrastructure_error",
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::ReferentialIntegrity { entity, id } => {
                ApiError::ReferentialIntegrity { entity, id }
            }
            StorageError::NotFound { entity, id } => ApiError::NotFound { entity, id },
            other => ApiError::Infrastructure(other.to_string()),
        }
    }
}

impl From<EventShapeError> for ApiError {
    fn from(err: EventShapeError) -> Self {
        ApiError::Validation(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        } else {
            warn!(error = %self, "request rejected");
        }

        let body = ErrorBody {
            error: self.kind(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// API 結果類型別名
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::time::Duration;

    #[rstest]
    #[case(ApiError::Validation("missing field `name`".into()), StatusCode::BAD_REQUEST)]
    #[case(ApiError::ReferentialIntegrity { entity: "user", id: 1 }, StatusCode::UNPROCESSABLE_ENTITY)]
    #[case(ApiError::NotFound { entity: "position", id: 1 }, StatusCode::NOT_FOUND)]
    #[case(ApiError::Infrastructure("timeout".into()), StatusCode::SERVICE_UNAVAILABLE)]
    fn test_status_mapping(#[case] err: ApiError, #[case] status: StatusCode) {
        assert_eq!(err.into_response().status(), status);
    }

    #[test]
    fn test_storage_errors_keep_their_category() {
        let err: ApiError = StorageError::ReferentialIntegrity {
            entity: "portfolio",
            id: 3,
        }
        .into();
        assert_eq!(err.to_string(), "portfolio 3 does not exist");

        let err: ApiError = StorageError::Timeout(Duration::from_secs(5)).into();
        assert_eq!(err.kind(), "infrastructure_error");

        let err: ApiError = StorageError::Database(sqlx::Error::PoolTimedOut).into();
        assert_eq!(err.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
