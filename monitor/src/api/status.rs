//! 稼働状況APIハンドラー
//!
//! ダッシュボード向けのクエリ用読み取り面。キャッシュ済み
//! スナップショットの返却と、キャッシュを迂回するオンデマンド
//! プローブを提供する。読み取りハンドラーはキャッシュを変更しない。

use super::error::AppError;
use crate::AppState;
use app_monitor_common::error::MonitorError;
use app_monitor_common::types::{EndpointSnapshot, ProbeResult, ReachabilityMode};
use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// アプリケーション稼働状況のレスポンス
///
/// 未計測の場合は全フィールドがnull。欠落キーに対して古い値を
/// 合成することはない。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppHealthResponse {
    /// ヘルスチェックURLへの到達可否（未計測ならnull）
    pub healthy: Option<bool>,
    /// アクティブユーザー数（未計測ならnull）
    pub active_users: Option<i64>,
    /// 最終計測時刻（未計測ならnull）
    pub last_checked: Option<DateTime<Utc>>,
}

/// 方向別エンドポイントの稼働状況
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DirectionHealth {
    /// 到達可否
    pub reachable: bool,
    /// トランザクション件数
    pub total: i64,
    /// エラー件数
    pub failed: i64,
    /// 最終計測時刻
    pub last_checked: DateTime<Utc>,
}

impl From<EndpointSnapshot> for DirectionHealth {
    fn from(snapshot: EndpointSnapshot) -> Self {
        Self {
            reachable: snapshot.reachable,
            total: snapshot.total,
            failed: snapshot.failed,
            last_checked: snapshot.checked_at,
        }
    }
}

/// インターフェース稼働状況のレスポンス
///
/// `measured=false` は未計測。`measured=true` で両方向がnullの場合は
/// 計測済みだがアクティブなエンドポイントが設定されていない。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InterfaceHealthResponse {
    /// 計測済みフラグ
    pub measured: bool,
    /// 受信側エンドポイントの状態
    pub inbound: Option<DirectionHealth>,
    /// 送信側エンドポイントの状態
    pub outbound: Option<DirectionHealth>,
}

/// オンデマンドプローブのリクエスト
#[derive(Debug, Deserialize)]
pub struct ProbeRequest {
    /// プローブ対象URL
    pub url: String,
    /// 到達性の判定モード（省略時はlenient）
    #[serde(default)]
    pub mode: Option<ReachabilityMode>,
}

/// アプリケーションの稼働状況を取得
///
/// 純粋なキャッシュ読み取りでネットワークI/Oを行わない。
pub async fn application_health(
    State(state): State<AppState>,
    Path(app_id): Path<i64>,
) -> Json<AppHealthResponse> {
    let response = match state.cache.application(app_id).await {
        Some(snapshot) => AppHealthResponse {
            healthy: Some(snapshot.healthy),
            active_users: Some(snapshot.active_users),
            last_checked: Some(snapshot.checked_at),
        },
        None => AppHealthResponse {
            healthy: None,
            active_users: None,
            last_checked: None,
        },
    };

    Json(response)
}

/// インターフェースの稼働状況を取得
pub async fn interface_health(
    State(state): State<AppState>,
    Path(interface_id): Path<i64>,
) -> Json<InterfaceHealthResponse> {
    let response = match state.cache.interface(interface_id).await {
        Some(snapshot) => InterfaceHealthResponse {
            measured: true,
            inbound: snapshot.inbound.map(Into::into),
            outbound: snapshot.outbound.map(Into::into),
        },
        None => InterfaceHealthResponse {
            measured: false,
            inbound: None,
            outbound: None,
        },
    };

    Json(response)
}

/// オンデマンドプローブ
///
/// キャッシュを迂回して即時にプローブする。プローブタイムアウトを
/// 上限として呼び出し元をブロックする。
pub async fn probe_now(
    State(state): State<AppState>,
    Json(request): Json<ProbeRequest>,
) -> Result<Json<ProbeResult>, AppError> {
    if !request.url.starts_with("http://") && !request.url.starts_with("https://") {
        return Err(MonitorError::InvalidUrl(request.url).into());
    }

    let mode = request.mode.unwrap_or(state.prober.mode());
    let result = state.prober.probe_with_mode(&request.url, mode).await;

    Ok(Json(result))
}

/// サービス自身の死活確認
pub async fn service_health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
