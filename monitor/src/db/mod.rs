//! データベースアクセス
//!
//! 設定ストア（SQLite）の読み書き。スキーマはmigrations/で管理する。

/// アプリケーションの読み書き
pub mod applications;

/// インターフェースエンドポイントの読み書き
pub mod endpoints;

/// インターフェースの読み書き
pub mod interfaces;

use chrono::{DateTime, Utc};

/// RFC 3339のTEXTカラムをDateTime<Utc>に変換する
///
/// 手編集等で壊れた値は現在時刻で代替する（行を落とさない）。
pub(crate) fn parse_timestamp(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}
