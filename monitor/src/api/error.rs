//! APIエラーレスポンス型
//!
//! axum用の共通エラーハンドリング

use app_monitor_common::error::MonitorError;
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

/// Axum用のエラーレスポンス型
#[derive(Debug)]
pub struct AppError(pub MonitorError);

impl From<MonitorError> for AppError {
    fn from(err: MonitorError) -> Self {
        AppError(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        // external_message()で内部詳細（接続文字列等）を外に出さない
        let status = match &self.0 {
            MonitorError::ApplicationNotFound(_) | MonitorError::InterfaceNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            MonitorError::InvalidDirection(_) | MonitorError::InvalidUrl(_) => {
                StatusCode::BAD_REQUEST
            }
            MonitorError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            MonitorError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let payload = json!({
            "error": self.0.external_message()
        });

        (status, Json(payload)).into_response()
    }
}
