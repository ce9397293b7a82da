use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;

use clap::Parser;
use telemetry_hub::{
    alerts::AlertLog,
    api::{ApiConfig, ApiState, spawn_api_server},
    config::{Config, read_config_file},
    receivers::{AlertReceiver, MetricsReceiver},
    registry::LiveRegistry,
    storage::HistoryStore,
};
use tokio::spawn;
use tracing::{error, level_filters::LevelFilter, trace};
use tracing_subscriber::{filter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone, Parser)]
struct Args {
    /// Config file (all fields optional; defaults apply without one)
    #[arg(short)]
    file: Option<String>,
}

fn init() {
    let filter = filter::Targets::new().with_targets(vec![
        ("telemetry_hub", LevelFilter::TRACE),
        ("hub", LevelFilter::TRACE),
    ]);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .compact()
                .with_ansi(false),
        )
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init();
    let args = Args::parse();
    trace!("started with args: {args:?}");

    let config = match &args.file {
        Some(path) => read_config_file(path)?,
        None => Config::default(),
    };

    let registry = LiveRegistry::new();
    let alerts = AlertLog::new(config.alert_log_capacity);
    let history = Arc::new(HistoryStore::new(&config.history_path));

    let metrics_addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, config.metrics_port));
    let alert_addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, config.alert_port));

    // Bind failures abort startup; per-unit errors later only log.
    let metrics_receiver =
        MetricsReceiver::bind(metrics_addr, registry.clone(), history.clone()).await?;
    let alert_receiver = AlertReceiver::bind(alert_addr, alerts.clone()).await?;

    let state = ApiState::new(registry, alerts, history, config.offline_threshold_secs);
    spawn_api_server(
        ApiConfig {
            bind_addr: config.api_addr,
            enable_cors: true,
        },
        state,
    )
    .await?;

    let metrics_task = spawn(metrics_receiver.run());
    let alert_task = spawn(alert_receiver.run());

    let (metrics_result, alert_result) = tokio::join!(metrics_task, alert_task);
    if let Err(e) = metrics_result {
        error!("{e}");
    }
    if let Err(e) = alert_result {
        error!("{e}");
    }

    Ok(())
}
