//! app-monitor 共通クレート
//!
//! 監視対象の型定義、エラー型、設定構造体を提供する

#![warn(missing_docs)]

/// 設定構造体
pub mod config;

/// エラー型定義
pub mod error;

/// コアデータ型
pub mod types;
