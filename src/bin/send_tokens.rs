use anyhow::{Context, Result};
use clap::Parser;
use localic_client::config::{SendDemoCliArgs, SendDemoConfig};
use localic_client::demo::run_send_demo;
use localic_client::poll_for_start;
use localic_client::signing::{CosmosSigningClient, Wallet};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::builder()
        .with_default_directive(tracing::Level::INFO.into())
        .from_env_lossy()
        .add_directive("hyper=warn".parse()?)
        .add_directive("tendermint_rpc=warn".parse()?);

    tracing_subscriber::registry()
        .with(fmt::layer().with_ansi(true))
        .with(filter)
        .init();

    let config = SendDemoConfig::load(SendDemoCliArgs::parse())?;

    let outcome = poll_for_start(&config.rpc_url, config.poll_limit).await;
    if !outcome.is_up() {
        warn!(rpc_url = %config.rpc_url, attempts = outcome.attempts(), "RPC never answered");
    }

    let wallet = Wallet::from_mnemonic(&config.mnemonic, &config.prefix)?;
    info!(address = %wallet.address(), "Wallet derived");

    let client = CosmosSigningClient::connect(&config.rpc_url, wallet, config.gas_price.clone())
        .await
        .with_context(|| {
            format!(
                "ensure the testnet is running and the RPC address ({}) is correct",
                config.rpc_url
            )
        })?;

    let report = run_send_demo(&client, &config).await?;
    info!(
        address = %report.address,
        tx_hash = %report.tx_hash,
        height = report.height,
        "Send demo passed"
    );
    Ok(())
}
