//! ターゲットレジストリ
//!
//! 設定ストアに対する読み取り専用ビュー。ポーラーはサイクルごとに
//! ここからアクティブターゲットの最新一覧を取得するため、外部での
//! 非アクティブ化はキャッシュ削除の通知なしに次サイクルで反映される。

use crate::db;
use app_monitor_common::error::{MonitorError, MonitorResult};
use app_monitor_common::types::{Application, Interface, InterfaceEndpoint};
use sqlx::SqlitePool;

/// ターゲットレジストリ
///
/// 意図的にキャッシュを持たない。各呼び出しが設定ストアの
/// 最新スナップショットを返す。
#[derive(Clone)]
pub struct TargetRegistry {
    /// データベース接続プール
    pool: SqlitePool,
}

impl TargetRegistry {
    /// SQLiteプールからレジストリを作成
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// データベースプールへの参照を返す
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// アクティブなアプリケーション一覧を取得
    pub async fn list_active_applications(&self) -> MonitorResult<Vec<Application>> {
        db::applications::list_active_applications(&self.pool)
            .await
            .map_err(MonitorError::database)
    }

    /// アクティブなインターフェース一覧を取得
    pub async fn list_active_interfaces(&self) -> MonitorResult<Vec<Interface>> {
        db::interfaces::list_active_interfaces(&self.pool)
            .await
            .map_err(MonitorError::database)
    }

    /// インターフェース配下のアクティブなエンドポイント一覧を取得（0〜2件）
    pub async fn list_active_endpoints(
        &self,
        interface_id: i64,
    ) -> MonitorResult<Vec<InterfaceEndpoint>> {
        db::endpoints::list_active_endpoints(&self.pool, interface_id)
            .await
            .map_err(MonitorError::database)
    }
}
