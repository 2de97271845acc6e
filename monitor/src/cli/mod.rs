//! CLI module for app-monitor
//!
//! Provides command-line interface for the monitoring service.
//! All configuration is supplied via environment variables.

use clap::Parser;

/// App Monitor - Application and interface health monitoring service
#[derive(Parser, Debug)]
#[command(name = "app-monitor")]
#[command(version, about, long_about = None)]
#[command(after_help = r#"ENVIRONMENT VARIABLES:
    APP_MONITOR_HOST                   Bind address (default: 0.0.0.0)
    APP_MONITOR_PORT                   Listen port (default: 8170)
    APP_MONITOR_LOG_LEVEL              Log level (default: info)
    APP_MONITOR_DATABASE_URL           Configuration store URL (default: sqlite://monitor.db)
    APP_MONITOR_POLL_INTERVAL          Poll interval in seconds (default: 30)
    APP_MONITOR_PROBE_TIMEOUT          Probe timeout in seconds (default: 5)
    APP_MONITOR_MAX_CONCURRENT_PROBES  Concurrent probe bound per cycle (default: 8)
    APP_MONITOR_REACHABILITY           Reachability mode: lenient | strict (default: lenient)
"#)]
pub struct Cli {}
