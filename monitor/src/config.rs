//! 設定管理（環境変数ヘルパー）
//!
//! `APP_MONITOR_*` 環境変数からMonitorConfigを組み立てる

use app_monitor_common::config::MonitorConfig;
use app_monitor_common::types::ReachabilityMode;
use std::str::FromStr;
use tracing::warn;

/// 環境変数を取得する（空文字は未設定扱い）
pub fn get_env(name: &str) -> Option<String> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Some(value),
        _ => None,
    }
}

/// 環境変数を取得し、未設定ならデフォルト値を返す
pub fn get_env_or(name: &str, default: &str) -> String {
    get_env(name).unwrap_or_else(|| default.to_string())
}

/// 環境変数をパースして取得し、未設定・パース失敗ならデフォルト値を返す
pub fn get_env_parse<T>(name: &str, default: T) -> T
where
    T: FromStr + std::fmt::Display + Copy,
{
    match get_env(name) {
        Some(value) => match value.parse() {
            Ok(parsed) => parsed,
            Err(_) => {
                warn!(
                    name = name,
                    value = %value,
                    default = %default,
                    "Failed to parse environment variable, using default"
                );
                default
            }
        },
        None => default,
    }
}

/// 環境変数からMonitorConfigを組み立てる
///
/// 未設定の項目はMonitorConfigのデフォルト値のまま。
pub fn monitor_config_from_env() -> MonitorConfig {
    let defaults = MonitorConfig::default();

    let reachability = match get_env("APP_MONITOR_REACHABILITY").as_deref() {
        Some("strict") => ReachabilityMode::Strict,
        Some("lenient") | None => ReachabilityMode::Lenient,
        Some(other) => {
            warn!(
                value = other,
                "Unknown reachability mode, falling back to lenient"
            );
            ReachabilityMode::Lenient
        }
    };

    MonitorConfig {
        host: get_env_or("APP_MONITOR_HOST", &defaults.host),
        port: get_env_parse("APP_MONITOR_PORT", defaults.port),
        database_url: get_env_or("APP_MONITOR_DATABASE_URL", &defaults.database_url),
        poll_interval_secs: get_env_parse("APP_MONITOR_POLL_INTERVAL", defaults.poll_interval_secs),
        probe_timeout_secs: get_env_parse("APP_MONITOR_PROBE_TIMEOUT", defaults.probe_timeout_secs),
        max_concurrent_probes: get_env_parse(
            "APP_MONITOR_MAX_CONCURRENT_PROBES",
            defaults.max_concurrent_probes,
        ),
        reachability,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_get_env_parse_invalid_falls_back() {
        std::env::set_var("APP_MONITOR_TEST_PORT", "not-a-number");
        let value: u16 = get_env_parse("APP_MONITOR_TEST_PORT", 8170);
        assert_eq!(value, 8170);
        std::env::remove_var("APP_MONITOR_TEST_PORT");
    }

    #[test]
    #[serial]
    fn test_config_from_env_overrides() {
        std::env::set_var("APP_MONITOR_POLL_INTERVAL", "10");
        std::env::set_var("APP_MONITOR_REACHABILITY", "strict");
        let config = monitor_config_from_env();
        assert_eq!(config.poll_interval_secs, 10);
        assert_eq!(config.reachability, ReachabilityMode::Strict);
        std::env::remove_var("APP_MONITOR_POLL_INTERVAL");
        std::env::remove_var("APP_MONITOR_REACHABILITY");
    }

    #[test]
    #[serial]
    fn test_empty_env_treated_as_unset() {
        std::env::set_var("APP_MONITOR_TEST_EMPTY", "  ");
        assert!(get_env("APP_MONITOR_TEST_EMPTY").is_none());
        std::env::remove_var("APP_MONITOR_TEST_EMPTY");
    }
}
