// api.rs - API服務模組，宣告子模組
//
// 對外提供使用者、投資組合、持倉與持倉事件的 REST 接口。

/// 錯誤類型與 HTTP 狀態對應
pub mod error;
/// 請求取值器
pub mod extract;
/// API處理器模組
pub mod handlers;
/// REST API實現
pub mod rest;
/// API路由定義
pub mod routes;
/// 處理器共用狀態
pub mod state;

pub use error::{ApiError, ApiResult};
pub use rest::{build_app, RestApi};
pub use state::AppState;
