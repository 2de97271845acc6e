//! テスト共通ヘルパー

#![allow(dead_code)]

use app_monitor::{api, cache::StatusCache, probe::Prober, registry::TargetRegistry, AppState};
use sqlx::SqlitePool;
use std::net::SocketAddr;
use std::time::Duration;

/// テストプローブのタイムアウト（ミリ秒）
///
/// 本番デフォルト5秒ではタイムアウト系テストが遅くなるため短縮する。
pub const TEST_PROBE_TIMEOUT_MS: u64 = 500;

/// テスト用のインメモリSQLiteプールを作成する
pub async fn create_test_db_pool() -> SqlitePool {
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        // インメモリDBは接続ごとに独立するため、単一接続に固定する
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create in-memory SQLite pool");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

/// 短いタイムアウトのテスト用プローバを作成する
pub fn create_test_prober() -> Prober {
    Prober::new(Duration::from_millis(TEST_PROBE_TIMEOUT_MS))
}

/// テスト用のAppStateを作成する
pub async fn create_test_state() -> AppState {
    let db_pool = create_test_db_pool().await;

    AppState {
        registry: TargetRegistry::new(db_pool.clone()),
        cache: StatusCache::new(),
        prober: create_test_prober(),
        db_pool,
    }
}

/// APIサーバーをエフェメラルポートで起動し、アドレスと状態を返す
pub async fn spawn_test_server() -> (SocketAddr, AppState) {
    let state = create_test_state().await;
    let router = api::create_router(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Failed to read local addr");

    tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("Test server terminated");
    });

    (addr, state)
}
