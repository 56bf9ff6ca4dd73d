// 包裝 axum 取值器，拒絕時統一回傳 ApiError::Validation
use axum::extract::{FromRequest, FromRequestParts};

use crate::api::error::ApiError;

/// JSON 請求主體
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// 路徑參數
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

/// 查詢字串
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);
