//! App Monitor Server
//!
//! 登録されたアプリケーションと連携インターフェースをバックグラウンドで
//! 定期プローブし、最新の稼働状況をダッシュボードへ提供する

#![warn(missing_docs)]

/// REST APIハンドラー
pub mod api;

/// 稼働状況キャッシュ
pub mod cache;

/// CLIインターフェース
pub mod cli;

/// 設定管理（環境変数ヘルパー）
pub mod config;

/// データベースアクセス
pub mod db;

/// ロギング初期化ユーティリティ
pub mod logging;

/// HTTPプローブ
pub mod probe;

/// ターゲットレジストリ
pub mod registry;

/// ポーリングスケジューラ
pub mod scheduler;

/// アプリケーション状態
#[derive(Clone)]
pub struct AppState {
    /// ターゲットレジストリ（設定ストアの読み取りビュー）
    pub registry: registry::TargetRegistry,
    /// 稼働状況キャッシュ
    pub cache: cache::StatusCache,
    /// オンデマンドプローブ用プローバ
    pub prober: probe::Prober,
    /// データベース接続プール
    pub db_pool: sqlx::SqlitePool,
}
