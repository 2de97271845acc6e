//! 共通型定義
//!
//! Application, Interface, InterfaceEndpoint等のコアデータ型と
//! プローブ結果・スナップショット型

use crate::error::MonitorError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// インターフェースエンドポイントの方向
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    /// 受信側（外部システム → アプリケーション）
    Inbound,
    /// 送信側（アプリケーション → 外部システム）
    Outbound,
}

impl Direction {
    /// Directionを文字列に変換
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Inbound => "INBOUND",
            Self::Outbound => "OUTBOUND",
        }
    }
}

impl FromStr for Direction {
    type Err = MonitorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "INBOUND" => Ok(Self::Inbound),
            "OUTBOUND" => Ok(Self::Outbound),
            other => Err(MonitorError::InvalidDirection(other.to_string())),
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 到達性の判定モード
///
/// ダッシュボードの「正常」バッジには厳格判定、単純な到達確認には
/// 緩和判定を使い分けられるよう、判定条件を切り替え可能にしている。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReachabilityMode {
    /// ステータスコード400未満を到達とみなす（デフォルト）
    #[default]
    Lenient,
    /// ステータスコード200のみを到達とみなす
    Strict,
}

impl ReachabilityMode {
    /// ステータスコードが到達とみなせるか判定する
    pub fn is_reachable(self, status: u16) -> bool {
        match self {
            Self::Lenient => status < 400,
            Self::Strict => status == 200,
        }
    }

    /// ReachabilityModeを文字列に変換
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lenient => "lenient",
            Self::Strict => "strict",
        }
    }
}

impl std::fmt::Display for ReachabilityMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 監視対象アプリケーション
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Application {
    /// 一意識別子
    pub id: i64,
    /// 表示名
    pub name: String,
    /// 環境（例: "production", "staging"）
    pub environment: String,
    /// ヘルスチェックURL
    pub app_health_url: String,
    /// アクティブユーザー数取得URL
    pub active_users_url: String,
    /// 監視対象フラグ
    pub is_active: bool,
    /// 登録日時
    pub created_at: DateTime<Utc>,
}

/// インターフェース（アプリケーションと外部システム間の連携）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Interface {
    /// 一意識別子
    pub id: i64,
    /// 連携元アプリケーションID
    pub source_app_id: i64,
    /// 連携先システム名（SAP, Vendor API等の自由記述）
    pub target_system_name: String,
    /// 監視対象フラグ
    pub is_active: bool,
    /// 登録日時
    pub created_at: DateTime<Utc>,
}

/// インターフェースエンドポイント（方向別の監視URL一式）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InterfaceEndpoint {
    /// 一意識別子
    pub id: i64,
    /// 所属インターフェースID
    pub interface_id: i64,
    /// 方向（INBOUND / OUTBOUND）
    pub direction: Direction,
    /// 到達性確認URL
    pub connectivity_url: String,
    /// トランザクション件数取得URL
    pub transaction_count_url: String,
    /// エラー件数取得URL
    pub error_count_url: String,
    /// 監視対象フラグ
    pub is_active: bool,
    /// 登録日時
    pub created_at: DateTime<Utc>,
}

/// 単一プローブの結果
///
/// 生成後は不変。次のプローブは新しいインスタンスを生成する。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProbeResult {
    /// 到達可否
    pub reachable: bool,
    /// HTTPステータスコード（応答が無ければ None）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_status: Option<u16>,
    /// 数値メトリクス（メトリクス取得プローブのみ Some）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metric: Option<i64>,
    /// 計測時刻
    pub checked_at: DateTime<Utc>,
}

impl ProbeResult {
    /// 到達不可の結果を生成する（応答なし）
    pub fn unreachable() -> Self {
        Self {
            reachable: false,
            http_status: None,
            metric: None,
            checked_at: Utc::now(),
        }
    }
}

/// アプリケーションの最新スナップショット
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppSnapshot {
    /// ヘルスチェックURLへの到達可否
    pub healthy: bool,
    /// アクティブユーザー数
    ///
    /// 取得失敗時は0になり、本当の0件と区別できない（既知の制限）
    pub active_users: i64,
    /// 計測時刻
    pub checked_at: DateTime<Utc>,
}

/// 方向別エンドポイントの最新スナップショット
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EndpointSnapshot {
    /// 到達可否
    pub reachable: bool,
    /// トランザクション件数
    pub total: i64,
    /// エラー件数
    pub failed: i64,
    /// 計測時刻
    pub checked_at: DateTime<Utc>,
}

/// インターフェースの最新スナップショット（方向別の集約）
///
/// 方向が None の場合、その方向にアクティブなエンドポイントが
/// 設定されていないことを表す。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct InterfaceSnapshot {
    /// 受信側エンドポイントの状態
    #[serde(default)]
    pub inbound: Option<EndpointSnapshot>,
    /// 送信側エンドポイントの状態
    #[serde(default)]
    pub outbound: Option<EndpointSnapshot>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_roundtrip() {
        assert_eq!("INBOUND".parse::<Direction>().unwrap(), Direction::Inbound);
        assert_eq!(
            "outbound".parse::<Direction>().unwrap(),
            Direction::Outbound
        );
        assert_eq!(Direction::Inbound.as_str(), "INBOUND");
    }

    #[test]
    fn test_direction_invalid() {
        assert!("BOTH".parse::<Direction>().is_err());
    }

    #[test]
    fn test_reachability_lenient() {
        let mode = ReachabilityMode::Lenient;
        assert!(mode.is_reachable(200));
        assert!(mode.is_reachable(302));
        assert!(!mode.is_reachable(400));
        assert!(!mode.is_reachable(500));
    }

    #[test]
    fn test_reachability_strict() {
        let mode = ReachabilityMode::Strict;
        assert!(mode.is_reachable(200));
        assert!(!mode.is_reachable(204));
        assert!(!mode.is_reachable(302));
    }

    #[test]
    fn test_interface_snapshot_default_is_empty() {
        let snapshot = InterfaceSnapshot::default();
        assert!(snapshot.inbound.is_none());
        assert!(snapshot.outbound.is_none());
    }
}
