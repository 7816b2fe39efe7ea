use anyhow::{Context, Result};
use clap::Parser;
use localic_client::config::{ApiDemoCliArgs, ApiDemoConfig};
use localic_client::demo::run_api_demo;
use localic_client::{poll_for_start, Chain};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::builder()
        .with_default_directive(tracing::Level::INFO.into())
        .from_env_lossy()
        .add_directive("hyper=warn".parse()?)
        .add_directive("reqwest=warn".parse()?);

    tracing_subscriber::registry()
        .with(fmt::layer().with_ansi(true))
        .with(filter)
        .init();

    let config = ApiDemoConfig::load(ApiDemoCliArgs::parse())?;

    let outcome = poll_for_start(&config.api_url, config.poll_limit).await;
    if !outcome.is_up() {
        warn!(
            api_url = %config.api_url,
            attempts = outcome.attempts(),
            "Server never answered, continuing anyway"
        );
    }

    let chain = Chain::new(config.api_url.clone(), config.chain_id.clone())?;
    let report = run_api_demo(&chain, &config.key_name)
        .await
        .with_context(|| format!("API demo against {} failed", config.api_url))?;

    info!(
        chain_id = %config.chain_id,
        address = %report.address,
        tx_hash = %report.tx_hash,
        keys = report.key_count,
        "API demo passed"
    );
    Ok(())
}
