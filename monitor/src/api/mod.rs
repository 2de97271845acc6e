//! REST APIハンドラー
//!
//! ダッシュボード向けの稼働状況クエリと構成管理のルーティング

/// 構成管理ハンドラー
pub mod admin;

/// エラーレスポンス型
pub mod error;

/// 稼働状況ハンドラー
pub mod status;

use crate::AppState;
use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// APIルーターを構築
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // 稼働状況クエリ（読み取りのみ、キャッシュを変更しない）
        .route("/api/applications/:id/health", get(status::application_health))
        .route("/api/interfaces/:id/health", get(status::interface_health))
        .route("/api/probe", post(status::probe_now))
        .route("/health", get(status::service_health))
        // 構成管理
        .route(
            "/api/applications",
            post(admin::create_application).get(admin::list_applications),
        )
        .route("/api/applications/:id", put(admin::update_application))
        .route(
            "/api/applications/:id/activate",
            post(admin::activate_application),
        )
        .route(
            "/api/applications/:id/deactivate",
            post(admin::deactivate_application),
        )
        .route(
            "/api/applications/:id/interfaces",
            post(admin::create_interface).get(admin::list_interfaces),
        )
        .route(
            "/api/interfaces/:id/activate",
            post(admin::activate_interface),
        )
        .route(
            "/api/interfaces/:id/deactivate",
            post(admin::deactivate_interface),
        )
        .route(
            "/api/interfaces/:id/endpoints",
            get(admin::list_endpoints),
        )
        .route(
            "/api/interfaces/:id/endpoints/:direction",
            put(admin::upsert_endpoint),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
