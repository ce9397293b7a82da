use std::net::SocketAddr;
use std::path::PathBuf;

use tracing::trace;

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Config {
    /// UDP port for inbound readings
    #[serde(default = "default_metrics_port")]
    pub metrics_port: u16,

    /// TCP port for inbound alert submissions
    #[serde(default = "default_alert_port")]
    pub alert_port: u16,

    /// Bind address for the query API
    #[serde(default = "default_api_addr")]
    pub api_addr: SocketAddr,

    /// Path to the append-only history log
    #[serde(default = "default_history_path")]
    pub history_path: PathBuf,

    /// Seconds without an agent-reported timestamp before an agent counts as offline
    #[serde(default = "default_offline_threshold")]
    pub offline_threshold_secs: i64,

    /// Maximum alert log entries kept in memory (oldest are evicted)
    #[serde(default = "default_alert_capacity")]
    pub alert_log_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            metrics_port: default_metrics_port(),
            alert_port: default_alert_port(),
            api_addr: default_api_addr(),
            history_path: default_history_path(),
            offline_threshold_secs: default_offline_threshold(),
            alert_log_capacity: default_alert_capacity(),
        }
    }
}

fn default_metrics_port() -> u16 {
    9876
}

fn default_alert_port() -> u16 {
    9877
}

fn default_api_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 9878))
}

fn default_history_path() -> PathBuf {
    PathBuf::from("./telemetry_history.csv")
}

fn default_offline_threshold() -> i64 {
    15
}

fn default_alert_capacity() -> usize {
    1000
}

pub fn read_config_file(path: &str) -> anyhow::Result<Config> {
    let file_content = std::fs::read_to_string(path)?;
    serde_json::from_str(&file_content)
        .map_err(|_| anyhow::anyhow!("Invalid configuration file provided!"))
        .inspect(|config| trace!("loaded config: {config:?}"))
}
