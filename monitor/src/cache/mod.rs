//! 稼働状況キャッシュ
//!
//! ターゲットIDをキーとする最新スナップショットのメモリ内ストア。
//! ポーラーだけが書き込み、クエリ側は読み取りのみ。キーごとの
//! 置き換えはアトミックで、読み手が書きかけの値を見ることはない。

use app_monitor_common::types::{AppSnapshot, InterfaceSnapshot};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// 稼働状況キャッシュ
///
/// cloneはハンドルの複製で、全ハンドルが同じストアを共有する。
/// アプリケーションとインターフェースはキー空間が独立しており、
/// 2つのポーラーが互いのキーに触れることはない。
#[derive(Clone, Default)]
pub struct StatusCache {
    /// アプリケーションID → 最新スナップショット
    applications: Arc<RwLock<HashMap<i64, AppSnapshot>>>,
    /// インターフェースID → 最新スナップショット
    interfaces: Arc<RwLock<HashMap<i64, InterfaceSnapshot>>>,
}

impl StatusCache {
    /// 空のキャッシュを作成
    pub fn new() -> Self {
        Self::default()
    }

    /// アプリケーションのスナップショットを置き換える
    pub async fn put_application(&self, id: i64, snapshot: AppSnapshot) {
        self.applications.write().await.insert(id, snapshot);
    }

    /// アプリケーションの最新スナップショットを取得
    ///
    /// Noneは「未計測」を表す。呼び出し側は古い値を合成してはならない。
    pub async fn application(&self, id: i64) -> Option<AppSnapshot> {
        self.applications.read().await.get(&id).cloned()
    }

    /// インターフェースのスナップショットを置き換える
    pub async fn put_interface(&self, id: i64, snapshot: InterfaceSnapshot) {
        self.interfaces.write().await.insert(id, snapshot);
    }

    /// インターフェースの最新スナップショットを取得
    ///
    /// Noneは「未計測」。Someで両方向がNoneの場合は「計測済みだが
    /// アクティブなエンドポイントが無い」ことを表し、両者は区別される。
    pub async fn interface(&self, id: i64) -> Option<InterfaceSnapshot> {
        self.interfaces.read().await.get(&id).cloned()
    }

    /// アクティブ集合に含まれないアプリケーションのキーを削除
    pub async fn retain_applications(&self, active_ids: &HashSet<i64>) {
        let mut applications = self.applications.write().await;
        let before = applications.len();
        applications.retain(|id, _| active_ids.contains(id));
        let removed = before - applications.len();
        if removed > 0 {
            debug!(removed = removed, "Pruned deactivated application snapshots");
        }
    }

    /// アクティブ集合に含まれないインターフェースのキーを削除
    pub async fn retain_interfaces(&self, active_ids: &HashSet<i64>) {
        let mut interfaces = self.interfaces.write().await;
        let before = interfaces.len();
        interfaces.retain(|id, _| active_ids.contains(id));
        let removed = before - interfaces.len();
        if removed > 0 {
            debug!(removed = removed, "Pruned deactivated interface snapshots");
        }
    }

    /// キャッシュ済みアプリケーション数（ログ・テスト用）
    pub async fn application_count(&self) -> usize {
        self.applications.read().await.len()
    }

    /// キャッシュ済みインターフェース数（ログ・テスト用）
    pub async fn interface_count(&self) -> usize {
        self.interfaces.read().await.len()
    }
}
