//! 構成管理APIハンドラー
//!
//! 監視対象（アプリケーション・インターフェース・エンドポイント）の
//! 登録と有効/無効の切り替え。ポーラーは次サイクルの列挙で変更を
//! 自動的に拾うため、ここからキャッシュへ通知は行わない。

use super::error::AppError;
use crate::{db, AppState};
use app_monitor_common::error::MonitorError;
use app_monitor_common::types::{
    AppSnapshot, Application, Direction, Interface, InterfaceEndpoint, InterfaceSnapshot,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

/// アプリケーション登録・更新リクエスト
#[derive(Debug, Deserialize)]
pub struct ApplicationRequest {
    /// 表示名
    pub name: String,
    /// 環境
    pub environment: String,
    /// ヘルスチェックURL
    pub app_health_url: String,
    /// アクティブユーザー数取得URL
    pub active_users_url: String,
}

/// キャッシュ済み状態付きのアプリケーション
#[derive(Debug, Serialize)]
pub struct ApplicationWithStatus {
    /// アプリケーション本体
    #[serde(flatten)]
    pub application: Application,
    /// 最新スナップショット（未計測ならnull）
    pub status: Option<AppSnapshot>,
}

/// キャッシュ済み状態付きのインターフェース
#[derive(Debug, Serialize)]
pub struct InterfaceWithStatus {
    /// インターフェース本体
    #[serde(flatten)]
    pub interface: Interface,
    /// 最新スナップショット（未計測ならnull）
    pub status: Option<InterfaceSnapshot>,
}

/// インターフェース登録リクエスト
#[derive(Debug, Deserialize)]
pub struct InterfaceRequest {
    /// 連携先システム名
    pub target_system_name: String,
}

/// エンドポイント登録・更新リクエスト
#[derive(Debug, Deserialize)]
pub struct EndpointRequest {
    /// 到達性確認URL
    pub connectivity_url: String,
    /// トランザクション件数取得URL
    pub transaction_count_url: String,
    /// エラー件数取得URL
    pub error_count_url: String,
}

/// 有効/無効切り替えのレスポンス
#[derive(Debug, Serialize)]
pub struct ActiveStateResponse {
    /// 対象ID
    pub id: i64,
    /// 監視対象フラグ
    pub is_active: bool,
}

fn validate_url(url: &str) -> Result<(), AppError> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(MonitorError::InvalidUrl(url.to_string()).into())
    }
}

/// アプリケーションを登録
pub async fn create_application(
    State(state): State<AppState>,
    Json(request): Json<ApplicationRequest>,
) -> Result<(StatusCode, Json<Application>), AppError> {
    validate_url(&request.app_health_url)?;
    validate_url(&request.active_users_url)?;

    let application = db::applications::create_application(
        &state.db_pool,
        &request.name,
        &request.environment,
        &request.app_health_url,
        &request.active_users_url,
    )
    .await
    .map_err(MonitorError::database)?;

    Ok((StatusCode::CREATED, Json(application)))
}

/// アプリケーション一覧を取得（キャッシュ済み状態付き）
pub async fn list_applications(
    State(state): State<AppState>,
) -> Result<Json<Vec<ApplicationWithStatus>>, AppError> {
    let applications = db::applications::list_applications(&state.db_pool)
        .await
        .map_err(MonitorError::database)?;

    let mut result = Vec::with_capacity(applications.len());
    for application in applications {
        let status = state.cache.application(application.id).await;
        result.push(ApplicationWithStatus {
            application,
            status,
        });
    }

    Ok(Json(result))
}

/// アプリケーションを更新
pub async fn update_application(
    State(state): State<AppState>,
    Path(app_id): Path<i64>,
    Json(request): Json<ApplicationRequest>,
) -> Result<Json<Application>, AppError> {
    validate_url(&request.app_health_url)?;
    validate_url(&request.active_users_url)?;

    let updated = db::applications::update_application(
        &state.db_pool,
        app_id,
        &request.name,
        &request.environment,
        &request.app_health_url,
        &request.active_users_url,
    )
    .await
    .map_err(MonitorError::database)?;

    if !updated {
        return Err(MonitorError::ApplicationNotFound(app_id).into());
    }

    let application = db::applications::get_application(&state.db_pool, app_id)
        .await
        .map_err(MonitorError::database)?
        .ok_or(MonitorError::ApplicationNotFound(app_id))?;

    Ok(Json(application))
}

/// アプリケーションを監視対象にする
pub async fn activate_application(
    State(state): State<AppState>,
    Path(app_id): Path<i64>,
) -> Result<Json<ActiveStateResponse>, AppError> {
    set_application_active(&state, app_id, true).await
}

/// アプリケーションを監視対象から外す
pub async fn deactivate_application(
    State(state): State<AppState>,
    Path(app_id): Path<i64>,
) -> Result<Json<ActiveStateResponse>, AppError> {
    set_application_active(&state, app_id, false).await
}

async fn set_application_active(
    state: &AppState,
    app_id: i64,
    active: bool,
) -> Result<Json<ActiveStateResponse>, AppError> {
    let updated = db::applications::set_application_active(&state.db_pool, app_id, active)
        .await
        .map_err(MonitorError::database)?;

    if !updated {
        return Err(MonitorError::ApplicationNotFound(app_id).into());
    }

    Ok(Json(ActiveStateResponse {
        id: app_id,
        is_active: active,
    }))
}

/// インターフェースを登録
pub async fn create_interface(
    State(state): State<AppState>,
    Path(app_id): Path<i64>,
    Json(request): Json<InterfaceRequest>,
) -> Result<(StatusCode, Json<Interface>), AppError> {
    db::applications::get_application(&state.db_pool, app_id)
        .await
        .map_err(MonitorError::database)?
        .ok_or(MonitorError::ApplicationNotFound(app_id))?;

    let interface =
        db::interfaces::create_interface(&state.db_pool, app_id, &request.target_system_name)
            .await
            .map_err(MonitorError::database)?;

    Ok((StatusCode::CREATED, Json(interface)))
}

/// アプリケーション配下のインターフェース一覧を取得
pub async fn list_interfaces(
    State(state): State<AppState>,
    Path(app_id): Path<i64>,
) -> Result<Json<Vec<InterfaceWithStatus>>, AppError> {
    db::applications::get_application(&state.db_pool, app_id)
        .await
        .map_err(MonitorError::database)?
        .ok_or(MonitorError::ApplicationNotFound(app_id))?;

    let interfaces = db::interfaces::list_interfaces_for_app(&state.db_pool, app_id)
        .await
        .map_err(MonitorError::database)?;

    let mut result = Vec::with_capacity(interfaces.len());
    for interface in interfaces {
        let status = state.cache.interface(interface.id).await;
        result.push(InterfaceWithStatus { interface, status });
    }

    Ok(Json(result))
}

/// インターフェースを監視対象にする
pub async fn activate_interface(
    State(state): State<AppState>,
    Path(interface_id): Path<i64>,
) -> Result<Json<ActiveStateResponse>, AppError> {
    set_interface_active(&state, interface_id, true).await
}

/// インターフェースを監視対象から外す
pub async fn deactivate_interface(
    State(state): State<AppState>,
    Path(interface_id): Path<i64>,
) -> Result<Json<ActiveStateResponse>, AppError> {
    set_interface_active(&state, interface_id, false).await
}

async fn set_interface_active(
    state: &AppState,
    interface_id: i64,
    active: bool,
) -> Result<Json<ActiveStateResponse>, AppError> {
    let updated = db::interfaces::set_interface_active(&state.db_pool, interface_id, active)
        .await
        .map_err(MonitorError::database)?;

    if !updated {
        return Err(MonitorError::InterfaceNotFound(interface_id).into());
    }

    Ok(Json(ActiveStateResponse {
        id: interface_id,
        is_active: active,
    }))
}

/// エンドポイントを登録または更新（方向ごとに1件）
pub async fn upsert_endpoint(
    State(state): State<AppState>,
    Path((interface_id, direction)): Path<(i64, String)>,
    Json(request): Json<EndpointRequest>,
) -> Result<Json<InterfaceEndpoint>, AppError> {
    let direction: Direction = direction.parse()?;

    validate_url(&request.connectivity_url)?;
    validate_url(&request.transaction_count_url)?;
    validate_url(&request.error_count_url)?;

    db::interfaces::get_interface(&state.db_pool, interface_id)
        .await
        .map_err(MonitorError::database)?
        .ok_or(MonitorError::InterfaceNotFound(interface_id))?;

    let endpoint = db::endpoints::upsert_endpoint(
        &state.db_pool,
        interface_id,
        direction,
        &request.connectivity_url,
        &request.transaction_count_url,
        &request.error_count_url,
    )
    .await
    .map_err(MonitorError::database)?;

    Ok(Json(endpoint))
}

/// インターフェース配下のエンドポイント一覧を取得
pub async fn list_endpoints(
    State(state): State<AppState>,
    Path(interface_id): Path<i64>,
) -> Result<Json<Vec<InterfaceEndpoint>>, AppError> {
    db::interfaces::get_interface(&state.db_pool, interface_id)
        .await
        .map_err(MonitorError::database)?
        .ok_or(MonitorError::InterfaceNotFound(interface_id))?;

    let endpoints = db::endpoints::list_endpoints(&state.db_pool, interface_id)
        .await
        .map_err(MonitorError::database)?;

    Ok(Json(endpoints))
}
