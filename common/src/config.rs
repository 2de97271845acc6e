//! 設定管理
//!
//! MonitorConfig等の設定構造体

use crate::types::ReachabilityMode;
use serde::{Deserialize, Serialize};

/// 監視サービス設定
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// ホストアドレス (デフォルト: "0.0.0.0")
    #[serde(default = "default_host")]
    pub host: String,

    /// ポート番号 (デフォルト: 8170)
    #[serde(default = "default_port")]
    pub port: u16,

    /// データベースURL (デフォルト: "sqlite://monitor.db")
    #[serde(default = "default_database_url")]
    pub database_url: String,

    /// ポーリング間隔（秒）(デフォルト: 30)
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,

    /// プローブタイムアウト（秒）(デフォルト: 5)
    #[serde(default = "default_probe_timeout")]
    pub probe_timeout_secs: u64,

    /// 同時プローブ数の上限 (デフォルト: 8)
    #[serde(default = "default_max_concurrent_probes")]
    pub max_concurrent_probes: usize,

    /// 到達性の判定モード (デフォルト: lenient)
    #[serde(default)]
    pub reachability: ReachabilityMode,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8170
}

fn default_database_url() -> String {
    "sqlite://monitor.db".to_string()
}

fn default_poll_interval() -> u64 {
    30
}

fn default_probe_timeout() -> u64 {
    5
}

fn default_max_concurrent_probes() -> usize {
    8
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            database_url: default_database_url(),
            poll_interval_secs: default_poll_interval(),
            probe_timeout_secs: default_probe_timeout(),
            max_concurrent_probes: default_max_concurrent_probes(),
            reachability: ReachabilityMode::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MonitorConfig::default();
        assert_eq!(config.port, 8170);
        assert_eq!(config.poll_interval_secs, 30);
        assert_eq!(config.probe_timeout_secs, 5);
        assert_eq!(config.reachability, ReachabilityMode::Lenient);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: MonitorConfig =
            serde_json::from_str(r#"{"port": 9000, "reachability": "strict"}"#).unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.reachability, ReachabilityMode::Strict);
        assert_eq!(config.poll_interval_secs, 30);
        assert_eq!(config.host, "0.0.0.0");
    }
}
