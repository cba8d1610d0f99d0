use std::error::Error;

use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // `.env` is optional; real environment variables win.
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            return Err(e.into());
        }
    }

    tracing_subscriber::registry()
        .with(ai_llm_service::telemetry::env_filter_with_level("warn", Level::INFO))
        .with(ai_llm_service::telemetry::layer())
        .try_init()?;

    api::start().await?;

    Ok(())
}
