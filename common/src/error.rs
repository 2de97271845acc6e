//! エラー型定義
//!
//! 監視サービス全体で共有するエラー型。コアの監視ループ内の失敗は
//! 致命的にならず、ここに定義する型で呼び出し側へ伝搬される。

use thiserror::Error;

/// 監視サービスのエラー型
#[derive(Debug, Error)]
pub enum MonitorError {
    /// アプリケーションが見つからない
    #[error("Application not found: {0}")]
    ApplicationNotFound(i64),

    /// インターフェースが見つからない
    #[error("Interface not found: {0}")]
    InterfaceNotFound(i64),

    /// 方向の指定が不正
    #[error("Invalid direction: {0}")]
    InvalidDirection(String),

    /// URLの形式が不正
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// 設定ストアの読み書きエラー
    #[error("Database error: {0}")]
    Database(String),

    /// 内部エラー
    #[error("Internal error: {0}")]
    Internal(String),
}

impl MonitorError {
    /// 設定ストアのエラーをラップする
    pub fn database(err: impl std::fmt::Display) -> Self {
        Self::Database(err.to_string())
    }

    /// 外部公開用のメッセージを返す
    ///
    /// 内部詳細（接続文字列やSQL等）を外に出さないため、
    /// ストア系・内部系のエラーは固定文言に置き換える。
    pub fn external_message(&self) -> String {
        match self {
            Self::ApplicationNotFound(_)
            | Self::InterfaceNotFound(_)
            | Self::InvalidDirection(_)
            | Self::InvalidUrl(_) => self.to_string(),
            Self::Database(_) => "Configuration store unavailable".to_string(),
            Self::Internal(_) => "Internal server error".to_string(),
        }
    }
}

/// 監視サービス用のResult型エイリアス
pub type MonitorResult<T> = Result<T, MonitorError>;
