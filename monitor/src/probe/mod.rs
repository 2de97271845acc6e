//! HTTPプローブ
//!
//! 単一URLへのGETリクエストで到達性確認とメトリクス取得を行う。
//! トランスポートエラーは例外として伝搬せず、到達不可の結果に変換する。

use app_monitor_common::types::{ProbeResult, ReachabilityMode};
use chrono::Utc;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// プローブの送信元を識別するUser-Agent
const PROBE_USER_AGENT: &str = concat!("app-monitor/", env!("CARGO_PKG_VERSION"));

/// HTTPプローバ
///
/// タイムアウト付きの共有HTTPクライアントを保持する。
/// イントラネットの自己署名証明書を許容するため、TLS証明書の検証は
/// 行わない（運用上のトレードオフとして明示）。
#[derive(Clone)]
pub struct Prober {
    /// HTTPクライアント
    client: Client,
    /// 到達性の判定モード
    mode: ReachabilityMode,
}

impl Prober {
    /// 指定タイムアウトでプローバを作成
    pub fn new(timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(PROBE_USER_AGENT)
            .danger_accept_invalid_certs(true)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            mode: ReachabilityMode::default(),
        }
    }

    /// 到達性の判定モードを設定
    pub fn with_mode(mut self, mode: ReachabilityMode) -> Self {
        self.mode = mode;
        self
    }

    /// 現在の判定モードを返す
    pub fn mode(&self) -> ReachabilityMode {
        self.mode
    }

    /// 単一URLの到達性を確認する
    ///
    /// リトライは行わない。失敗したサイクルのリトライは次のサイクル。
    pub async fn probe(&self, url: &str) -> ProbeResult {
        self.probe_with_mode(url, self.mode).await
    }

    /// 判定モードを指定して到達性を確認する
    pub async fn probe_with_mode(&self, url: &str, mode: ReachabilityMode) -> ProbeResult {
        match self.client.get(url).send().await {
            Ok(response) => {
                let status = response.status().as_u16();
                ProbeResult {
                    reachable: mode.is_reachable(status),
                    http_status: Some(status),
                    metric: None,
                    checked_at: Utc::now(),
                }
            }
            Err(e) => {
                debug!(url = %url, error = %e, "Probe request failed");
                ProbeResult::unreachable()
            }
        }
    }

    /// 数値メトリクスを取得する
    ///
    /// レスポンスボディをトリムして10進整数としてパースする。
    /// リクエスト失敗・パース失敗はいずれも0を返す。取得失敗と
    /// 本当の0件は区別できない（既知の制限）。
    pub async fn fetch_metric(&self, url: &str) -> i64 {
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                debug!(url = %url, error = %e, "Metric request failed");
                return 0;
            }
        };

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                debug!(url = %url, error = %e, "Failed to read metric body");
                return 0;
            }
        };

        match body.trim().parse::<i64>() {
            Ok(value) => value,
            Err(_) => {
                debug!(url = %url, body_prefix = %body.chars().take(32).collect::<String>(), "Metric body is not an integer");
                0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prober_default_mode_is_lenient() {
        let prober = Prober::new(Duration::from_secs(5));
        assert_eq!(prober.mode(), ReachabilityMode::Lenient);
    }

    #[test]
    fn test_prober_with_mode() {
        let prober = Prober::new(Duration::from_secs(5)).with_mode(ReachabilityMode::Strict);
        assert_eq!(prober.mode(), ReachabilityMode::Strict);
    }

    #[test]
    fn test_user_agent_identifies_monitor() {
        assert!(PROBE_USER_AGENT.starts_with("app-monitor/"));
    }
}
