use clap::Parser;
use dotenvy::dotenv;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wps_upload_trigger::infrastructure::client;
use wps_upload_trigger::services::wps_client::{NoOpClient, ProcessingClient};
use wps_upload_trigger::{TriggerConfig, UploadPoller};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Trigger GeoServer WPS processing when uploads arrive",
    long_about = None
)]
struct Args {
    /// Run a single scan/trigger cycle and exit
    #[arg(long)]
    once: bool,

    /// Log the stages instead of sending them
    #[arg(long)]
    dry_run: bool,

    /// Directory to watch (overrides UPLOAD_WATCH_DIR)
    #[arg(long)]
    watch_dir: Option<PathBuf>,

    /// Processing server base URL (overrides WPS_BASE_URL)
    #[arg(long)]
    base_url: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wps_upload_trigger=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("🚀 Starting WPS upload trigger...");

    let mut config = TriggerConfig::from_env();
    if let Some(dir) = args.watch_dir {
        config.watch_dir = dir;
    }
    if let Some(url) = args.base_url {
        config.wps_base_url = url;
    }
    info!(
        "📂 Watch Config: Dir={}, Suffix={}, Interval={:?}, Policy={:?}",
        config.watch_dir.display(),
        config.suffix,
        config.poll_interval,
        config.stage_policy
    );

    let processing_client: Arc<dyn ProcessingClient> = if args.dry_run {
        info!("🧪 Dry run: stage requests will not be sent");
        Arc::new(NoOpClient)
    } else {
        client::setup_client(&config).await?
    };

    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
    let poller = UploadPoller::new(config, processing_client, shutdown_rx)?;

    if args.once {
        let report = poller.poll_once().await;
        info!("🏁 Single cycle finished: {} request(s) sent", report.requests_sent());
        return Ok(());
    }

    let poller_handle = tokio::spawn(poller.run());

    shutdown_signal().await;
    let _ = shutdown_tx.send(true);
    poller_handle.await?;

    info!("🛑 WPS upload trigger stopped.");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("⌨️  Ctrl+C received, stopping after the current cycle...");
        },
        _ = terminate => {
            info!("💤 SIGTERM received, stopping after the current cycle...");
        },
    }
}
