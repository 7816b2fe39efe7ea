use tracing::info;

use super::DemoError;
use crate::chain::Chain;
use crate::request::ResponseFormat;
use crate::types::{Coin, TxOutcome};

/// What a successful API demo observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiReport {
    pub key_count: usize,
    pub address: String,
    pub supply: Vec<Coin>,
    pub tx_hash: String,
    pub balances: Vec<Coin>,
}

fn bank_send_command(key_name: &str, to: &str, denom: &str) -> String {
    format!(
        "tx bank send {key_name} {to} 500{denom} --fees 5000{denom} --node %RPC% \
         --chain-id=%CHAIN_ID% --yes --output json --keyring-backend=test"
    )
}

/// Walk through the server's command surface: keyring, bank queries and a
/// bank send from `key_name` to its own address.
pub async fn run_api_demo(chain: &Chain, key_name: &str) -> Result<ApiReport, DemoError> {
    chain
        .binary("config keyring-backend test", ResponseFormat::Text)
        .await?;

    let keys = chain
        .binary("keys list --keyring-backend=test --output=json", ResponseFormat::Json)
        .await?
        .into_json()
        .unwrap_or_default();
    let key_count = keys.as_array().map(Vec::len).unwrap_or(0);
    if key_count == 0 {
        return Err(DemoError::UnexpectedResponse(format!(
            "no keys in the test keyring: {keys}"
        )));
    }
    info!(chain_id = chain.chain_id(), key_count, "Listed keys");

    let supply = chain.get_total_supply().await?;
    let denom = supply
        .first()
        .map(|coin| coin.denom.clone())
        .ok_or_else(|| DemoError::UnexpectedResponse("bank total returned no supply".into()))?;
    info!(chain_id = chain.chain_id(), denoms = supply.len(), "Fetched total supply");

    let address = chain
        .binary(
            &format!("keys show {key_name} -a --keyring-backend=test"),
            ResponseFormat::Text,
        )
        .await?
        .into_text()
        .unwrap_or_default()
        .trim()
        .to_string();
    if address.is_empty() {
        return Err(DemoError::UnexpectedResponse(format!(
            "no address for key {key_name}"
        )));
    }

    let before = chain.get_balance(&address).await?;
    info!(address = %address, coins = before.len(), "Balance before send");

    let tx = chain
        .transaction(&bank_send_command(key_name, &address, &denom))
        .await?;
    let outcome = TxOutcome::from_json(&tx);
    let tx_hash = outcome.tx_hash.clone().unwrap_or_default();
    if !outcome.is_success() {
        return Err(DemoError::TransactionFailed {
            tx_hash,
            code: outcome.code.unwrap_or(u64::MAX),
            raw_log: outcome.raw_log.unwrap_or_default(),
        });
    }
    info!(tx_hash = %tx_hash, "Bank send included");

    let balances = chain.get_balance(&address).await?;
    if balances.is_empty() {
        return Err(DemoError::UnexpectedResponse(format!(
            "{address} has no balances after send"
        )));
    }

    Ok(ApiReport {
        key_count,
        address,
        supply,
        tx_hash,
        balances,
    })
}
