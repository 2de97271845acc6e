//! App Monitor Server Entry Point

use app_monitor::cli::Cli;
use app_monitor::{api, cache, config, logging, probe, registry, scheduler, AppState};
use app_monitor_common::config::MonitorConfig;
use clap::Parser;
use sqlx::sqlite::SqliteConnectOptions;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

#[tokio::main]
async fn main() {
    // CLIは -h/--help と -V/--version のみ
    let _cli = Cli::parse();

    logging::init().expect("failed to initialize logging");

    let monitor_config = config::monitor_config_from_env();
    run_server(monitor_config).await;
}

async fn init_db_pool(database_url: &str) -> sqlx::Result<sqlx::SqlitePool> {
    // SQLiteファイルはディレクトリが存在しないと作成できないため、先に作成しておく
    if let Some(path) = database_url.strip_prefix("sqlite:") {
        // `sqlite::memory:` のような特殊指定はスキップ
        if !path.starts_with(':') {
            let normalized = path.trim_start_matches("//");
            let path_without_params = normalized.split('?').next().unwrap_or(normalized);
            let db_path = std::path::Path::new(path_without_params);
            if let Some(parent) = db_path.parent() {
                if let Err(err) = std::fs::create_dir_all(parent) {
                    panic!(
                        "Failed to create database directory {}: {}",
                        parent.display(),
                        err
                    );
                }
            }
        }
    }

    let connect_options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

    sqlx::SqlitePool::connect_with(connect_options).await
}

async fn run_server(config: MonitorConfig) {
    info!("App Monitor v{}", env!("CARGO_PKG_VERSION"));

    // 設定ストアへの接続（他コンポーネントが依存）
    let db_pool = init_db_pool(&config.database_url)
        .await
        .expect("Failed to connect to configuration store");

    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .expect("Failed to run database migrations");

    // キャッシュとレジストリは起動時に一度だけ構築し、ポーラーと
    // APIの両方へ参照で渡す（隠れたグローバル状態を持たない）
    let registry = registry::TargetRegistry::new(db_pool.clone());
    let cache = cache::StatusCache::new();
    let prober = probe::Prober::new(Duration::from_secs(config.probe_timeout_secs))
        .with_mode(config.reachability);

    info!(
        poll_interval_secs = config.poll_interval_secs,
        probe_timeout_secs = config.probe_timeout_secs,
        reachability = %config.reachability,
        "Starting background monitors"
    );

    scheduler::ApplicationMonitor::new(registry.clone(), cache.clone(), prober.clone())
        .with_interval(config.poll_interval_secs)
        .with_concurrency(config.max_concurrent_probes)
        .start();

    scheduler::InterfaceMonitor::new(registry.clone(), cache.clone(), prober.clone())
        .with_interval(config.poll_interval_secs)
        .with_concurrency(config.max_concurrent_probes)
        .start();

    let state = AppState {
        registry,
        cache,
        prober,
        db_pool,
    };

    let router = api::create_router(state);

    let bind_addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("Failed to bind {}: {}", bind_addr, e));

    info!("Listening on {}", bind_addr);

    axum::serve(listener, router)
        .await
        .expect("Server terminated unexpectedly");
}
