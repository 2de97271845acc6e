//! ポーリングスケジューラ
//!
//! アプリケーション監視とインターフェース監視の2つの独立した
//! 常駐ループを実行する。両者はキャッシュを共有するがキー空間が
//! 異なるため、ループ間の調整は不要。
//!
//! 1サイクル内のターゲットはセマフォで上限を設けつつ並列にプローブ
//! するため、サイクルの所要時間は最も遅い単一プローブ（タイムアウト
//! で上限）に律速される。サイクルが間隔を超過した場合は警告を出し、
//! 次のtickを遅らせる（同一ループのサイクルが重なることはない）。

use crate::cache::StatusCache;
use crate::probe::Prober;
use crate::registry::TargetRegistry;
use app_monitor_common::error::MonitorResult;
use app_monitor_common::types::{
    AppSnapshot, Application, Direction, EndpointSnapshot, Interface, InterfaceSnapshot,
};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info, warn};

/// デフォルトのポーリング間隔（秒）
const DEFAULT_POLL_INTERVAL_SECS: u64 = 30;

/// デフォルトの同時プローブ数上限
const DEFAULT_MAX_CONCURRENT_PROBES: usize = 8;

/// アプリケーション監視ループ
///
/// サイクルごとにアクティブなアプリケーションを列挙し、各アプリの
/// ヘルスURLとアクティブユーザー数URLをプローブして結果をキャッシュ
/// に書き込む。
#[derive(Clone)]
pub struct ApplicationMonitor {
    /// ターゲットレジストリ
    registry: TargetRegistry,
    /// 稼働状況キャッシュ
    cache: StatusCache,
    /// プローバ
    prober: Prober,
    /// ポーリング間隔（秒）
    poll_interval_secs: u64,
    /// 同時プローブ数上限
    max_concurrent_probes: usize,
}

impl ApplicationMonitor {
    /// 新しい監視ループを作成
    pub fn new(registry: TargetRegistry, cache: StatusCache, prober: Prober) -> Self {
        Self {
            registry,
            cache,
            prober,
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            max_concurrent_probes: DEFAULT_MAX_CONCURRENT_PROBES,
        }
    }

    /// ポーリング間隔を設定
    pub fn with_interval(mut self, interval_secs: u64) -> Self {
        self.poll_interval_secs = interval_secs;
        self
    }

    /// 同時プローブ数上限を設定
    pub fn with_concurrency(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent_probes = max_concurrent.max(1);
        self
    }

    /// バックグラウンドで監視を開始
    pub fn start(self) {
        tokio::spawn(async move {
            self.monitor_loop().await;
        });
    }

    /// 監視ループ
    ///
    /// プロセス終了まで停止しない。サイクル内のエラーはログに残し、
    /// 次のtickで再試行する。
    async fn monitor_loop(&self) {
        let mut timer = interval(Duration::from_secs(self.poll_interval_secs));
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            interval_secs = self.poll_interval_secs,
            "Application monitor started"
        );

        loop {
            timer.tick().await;

            let started = Instant::now();
            if let Err(e) = self.run_cycle().await {
                error!(error = %e, "Application poll cycle failed, retrying at next interval");
            }

            let elapsed = started.elapsed();
            if elapsed >= Duration::from_secs(self.poll_interval_secs) {
                warn!(
                    elapsed_secs = elapsed.as_secs_f64(),
                    interval_secs = self.poll_interval_secs,
                    "Application poll cycle exceeded the poll interval, next cycle delayed"
                );
            }
        }
    }

    /// 1サイクル分のポーリングを実行
    ///
    /// ターゲット列挙の失敗のみErrを返す。個々のプローブの失敗は
    /// そのターゲットのスナップショットだけを劣化させる。
    pub async fn run_cycle(&self) -> MonitorResult<()> {
        let applications = self.registry.list_active_applications().await?;
        let active_ids: HashSet<i64> = applications.iter().map(|a| a.id).collect();

        let semaphore = Arc::new(Semaphore::new(self.max_concurrent_probes));
        let mut handles = Vec::with_capacity(applications.len());

        for application in applications {
            let monitor = self.clone();
            let semaphore = semaphore.clone();
            handles.push(tokio::spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .expect("probe semaphore closed");
                monitor.check_application(&application).await;
            }));
        }

        for handle in handles {
            if let Err(e) = handle.await {
                error!(error = %e, "Application probe task join error");
            }
        }

        // サイクル末尾で非アクティブ化されたキーを破棄する。
        // これにより façade は1ポーリング間隔以内に「未計測」を返す。
        self.cache.retain_applications(&active_ids).await;

        let cached = self.cache.application_count().await;
        debug!(cached, "Application poll cycle completed");

        Ok(())
    }

    /// 単一アプリケーションのチェック
    async fn check_application(&self, application: &Application) {
        let health = self.prober.probe(&application.app_health_url).await;
        let active_users = self.prober.fetch_metric(&application.active_users_url).await;

        let snapshot = AppSnapshot {
            healthy: health.reachable,
            active_users,
            checked_at: health.checked_at,
        };

        debug!(
            app_id = application.id,
            app_name = %application.name,
            healthy = snapshot.healthy,
            active_users = snapshot.active_users,
            "Application checked"
        );

        self.cache.put_application(application.id, snapshot).await;
    }
}

/// インターフェース監視ループ
///
/// サイクルごとにアクティブなインターフェースを列挙し、方向別の
/// エンドポイント（到達性・トランザクション件数・エラー件数）を
/// プローブして集約スナップショットをキャッシュに書き込む。
#[derive(Clone)]
pub struct InterfaceMonitor {
    /// ターゲットレジストリ
    registry: TargetRegistry,
    /// 稼働状況キャッシュ
    cache: StatusCache,
    /// プローバ
    prober: Prober,
    /// ポーリング間隔（秒）
    poll_interval_secs: u64,
    /// 同時チェック数上限（インターフェース単位）
    max_concurrent_probes: usize,
}

impl InterfaceMonitor {
    /// 新しい監視ループを作成
    pub fn new(registry: TargetRegistry, cache: StatusCache, prober: Prober) -> Self {
        Self {
            registry,
            cache,
            prober,
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            max_concurrent_probes: DEFAULT_MAX_CONCURRENT_PROBES,
        }
    }

    /// ポーリング間隔を設定
    pub fn with_interval(mut self, interval_secs: u64) -> Self {
        self.poll_interval_secs = interval_secs;
        self
    }

    /// 同時チェック数上限を設定
    pub fn with_concurrency(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent_probes = max_concurrent.max(1);
        self
    }

    /// バックグラウンドで監視を開始
    pub fn start(self) {
        tokio::spawn(async move {
            self.monitor_loop().await;
        });
    }

    /// 監視ループ
    async fn monitor_loop(&self) {
        let mut timer = interval(Duration::from_secs(self.poll_interval_secs));
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            interval_secs = self.poll_interval_secs,
            "Interface monitor started"
        );

        loop {
            timer.tick().await;

            let started = Instant::now();
            if let Err(e) = self.run_cycle().await {
                error!(error = %e, "Interface poll cycle failed, retrying at next interval");
            }

            let elapsed = started.elapsed();
            if elapsed >= Duration::from_secs(self.poll_interval_secs) {
                warn!(
                    elapsed_secs = elapsed.as_secs_f64(),
                    interval_secs = self.poll_interval_secs,
                    "Interface poll cycle exceeded the poll interval, next cycle delayed"
                );
            }
        }
    }

    /// 1サイクル分のポーリングを実行
    pub async fn run_cycle(&self) -> MonitorResult<()> {
        let interfaces = self.registry.list_active_interfaces().await?;
        let active_ids: HashSet<i64> = interfaces.iter().map(|i| i.id).collect();

        let semaphore = Arc::new(Semaphore::new(self.max_concurrent_probes));
        let mut handles = Vec::with_capacity(interfaces.len());

        for interface in interfaces {
            let monitor = self.clone();
            let semaphore = semaphore.clone();
            handles.push(tokio::spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .expect("probe semaphore closed");
                monitor.check_interface(&interface).await;
            }));
        }

        for handle in handles {
            if let Err(e) = handle.await {
                error!(error = %e, "Interface probe task join error");
            }
        }

        self.cache.retain_interfaces(&active_ids).await;

        let cached = self.cache.interface_count().await;
        debug!(cached, "Interface poll cycle completed");

        Ok(())
    }

    /// 単一インターフェースのチェック
    ///
    /// エンドポイント列挙に失敗した場合はこのインターフェースだけを
    /// スキップし、前回のスナップショットを残す。
    async fn check_interface(&self, interface: &Interface) {
        let endpoints = match self.registry.list_active_endpoints(interface.id).await {
            Ok(endpoints) => endpoints,
            Err(e) => {
                error!(
                    interface_id = interface.id,
                    error = %e,
                    "Failed to list interface endpoints, keeping previous snapshot"
                );
                return;
            }
        };

        let mut snapshot = InterfaceSnapshot::default();

        for endpoint in endpoints {
            let connectivity = self.prober.probe(&endpoint.connectivity_url).await;
            let total = self.prober.fetch_metric(&endpoint.transaction_count_url).await;
            let failed = self.prober.fetch_metric(&endpoint.error_count_url).await;

            let data = EndpointSnapshot {
                reachable: connectivity.reachable,
                total,
                failed,
                checked_at: connectivity.checked_at,
            };

            match endpoint.direction {
                Direction::Inbound => snapshot.inbound = Some(data),
                Direction::Outbound => snapshot.outbound = Some(data),
            }
        }

        debug!(
            interface_id = interface.id,
            target_system = %interface.target_system_name,
            inbound = snapshot.inbound.is_some(),
            outbound = snapshot.outbound.is_some(),
            "Interface checked"
        );

        self.cache.put_interface(interface.id, snapshot).await;
    }
}
