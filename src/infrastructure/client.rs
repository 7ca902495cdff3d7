use crate::config::TriggerConfig;
use crate::services::wps_client::{ProcessingClient, WpsClient};
use std::sync::Arc;
use tracing::info;

pub async fn setup_client(config: &TriggerConfig) -> anyhow::Result<Arc<dyn ProcessingClient>> {
    let client = WpsClient::from_config(config)?;
    info!("🌍 WPS endpoint: {}", client.endpoint());

    // Warm up: an unreachable server is not fatal, uploads will be retried next cycle
    if client.health_check().await {
        info!("🛰️  Processing server reachable");
    } else {
        tracing::warn!(
            "⚠️  Processing server unreachable! Stage requests will fail until it comes up."
        );
    }

    Ok(Arc::new(client))
}
