//! ロギング初期化ユーティリティ
//!
//! tracing-subscriberをEnvFilter付きで初期化する

use tracing_subscriber::{fmt, EnvFilter};

/// ロギングを初期化する
///
/// フィルタは `APP_MONITOR_LOG_LEVEL` → `RUST_LOG` の順に参照し、
/// どちらも未設定なら `info` を使う。
pub fn init() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = if let Ok(level) = std::env::var("APP_MONITOR_LOG_LEVEL") {
        EnvFilter::try_new(level)?
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()?;

    Ok(())
}
