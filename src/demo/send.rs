use term_table::row::Row;
use term_table::table_cell::{Alignment as CellAlignment, TableCell};
use term_table::{Table, TableStyle};
use tracing::{info, warn};

use super::DemoError;
use crate::config::SendDemoConfig;
use crate::signing::SigningClient;
use crate::types::Coin;

/// What a successful send demo observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendReport {
    pub address: String,
    pub balance: Coin,
    pub tx_hash: String,
    pub height: u64,
}

/// Check the signer's balance, send `send_amount` to itself and confirm the
/// transaction executed with code 0.
pub async fn run_send_demo<C>(client: &C, config: &SendDemoConfig) -> Result<SendReport, DemoError>
where
    C: SigningClient + ?Sized,
{
    let address = client.address().to_string();

    let balance = client.get_balance(&address, &config.denom).await?;
    info!(address = %address, balance = %balance, "Fetched account balance");

    let funded = balance.amount_u128().is_some_and(|amount| amount > 0);
    display_wallet_summary(&address, &balance, &config.rpc_url, funded);
    if !funded {
        return Err(DemoError::ZeroBalance {
            address,
            denom: config.denom.clone(),
        });
    }

    let amount = Coin::new(config.send_amount, config.denom.clone());
    info!(amount = %amount, from = %address, to = %address, "Sending tokens");

    let result = client
        .send_tokens(&address, &address, &[amount], config.gas_limit, &config.memo)
        .await?;
    info!(tx_hash = %result.tx_hash, height = result.height, "Sent");

    let tx = client
        .get_tx(&result.tx_hash)
        .await?
        .ok_or_else(|| DemoError::TransactionMissing(result.tx_hash.clone()))?;
    info!(code = tx.code, raw_log = %tx.raw_log, "Transaction");

    if !tx.is_success() {
        return Err(DemoError::TransactionFailed {
            tx_hash: result.tx_hash,
            code: tx.code.into(),
            raw_log: tx.raw_log,
        });
    }

    info!("Test successful");
    Ok(SendReport {
        address,
        balance,
        tx_hash: result.tx_hash,
        height: result.height,
    })
}

fn display_wallet_summary(address: &str, balance: &Coin, rpc_url: &str, funded: bool) {
    let mut table = Table::new();
    table.style = TableStyle::extended();

    let header = if funded {
        "WALLET READY"
    } else {
        "INSUFFICIENT FUNDS"
    };
    table.add_row(Row::new(vec![TableCell::builder(header)
        .col_span(2)
        .alignment(CellAlignment::Center)
        .build()]));

    for (label, value) in [
        ("Address", address.to_string()),
        ("Balance", balance.to_string()),
        ("RPC URL", rpc_url.to_string()),
    ] {
        table.add_row(Row::new(vec![
            TableCell::builder(label)
                .alignment(CellAlignment::Right)
                .build(),
            TableCell::builder(value)
                .alignment(CellAlignment::Left)
                .build(),
        ]));
    }

    if funded {
        info!("\n{}", table.render());
    } else {
        warn!("\n{}", table.render());
    }
}
