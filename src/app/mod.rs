use crate::api::ApiServer;
use crate::config::Config;
use crate::db::Database;
use crate::video::StreamClient;
use crate::webhook::WebhookService;
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

pub async fn run_service() -> Result<()> {
    info!("Starting meetai service");

    let config = Config::load()?;
    let openai_api_key = config.require_openai_key()?;

    let db_path = config.db_path()?;
    let db = Database::open(&db_path)
        .with_context(|| format!("Failed to open database at {}", db_path.display()))?;
    info!("Using database {}", db_path.display());

    let video = StreamClient::new(&config.stream, &config.openai.realtime_model)?;
    let service = Arc::new(WebhookService::new(
        db,
        Arc::new(video),
        openai_api_key,
        config.stream.call_type.clone(),
    ));

    let address = config.bind_address();
    info!("meetai is ready!");
    info!(
        "Point your video provider's webhook at http://{}/api/webhook",
        address
    );

    ApiServer::new(address, service).start().await
}
