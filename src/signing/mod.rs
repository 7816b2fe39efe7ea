//! Transaction signing against a chain node.
//!
//! The demo only needs a handful of operations, captured by [`SigningClient`];
//! [`CosmosSigningClient`] implements them over Tendermint RPC with cosmrs.

use std::str::FromStr;

use anyhow::Result;
use async_trait::async_trait;

use crate::error::LocalIcError;
use crate::types::Coin;

pub mod cosmos;

pub use cosmos::{CosmosSigningClient, Wallet};

/// Price per unit of gas, e.g. `0.025uatom`.
#[derive(Debug, Clone, PartialEq)]
pub struct GasPrice {
    pub amount: f64,
    pub denom: String,
}

impl GasPrice {
    /// Fee for `gas_limit`, rounded up to a whole base unit.
    pub fn fee_for(&self, gas_limit: u64) -> Coin {
        let amount = (self.amount * gas_limit as f64).ceil() as u128;
        Coin::new(amount, self.denom.clone())
    }
}

impl FromStr for GasPrice {
    type Err = LocalIcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let split = s
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .ok_or_else(|| LocalIcError::invalid(format!("gas price '{s}' has no denom")))?;
        let (amount, denom) = s.split_at(split);

        let amount: f64 = amount
            .parse()
            .map_err(|_| LocalIcError::invalid(format!("gas price '{s}' has no valid amount")))?;
        if !amount.is_finite() || amount < 0.0 {
            return Err(LocalIcError::invalid(format!("gas price '{s}' must be non-negative")));
        }

        Ok(GasPrice {
            amount,
            denom: denom.to_string(),
        })
    }
}

/// Result of a broadcast once the transaction is in a block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BroadcastResult {
    pub tx_hash: String,
    pub height: u64,
}

/// A transaction as returned by a lookup by hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedTx {
    pub hash: String,
    pub height: u64,
    pub code: u32,
    pub raw_log: String,
}

impl IndexedTx {
    pub fn is_success(&self) -> bool {
        self.code == 0
    }
}

/// Signing and query operations on a chain node, bound to one wallet.
#[async_trait]
pub trait SigningClient: Send + Sync {
    /// Bech32 address of the signing account.
    fn address(&self) -> &str;

    async fn get_balance(&self, address: &str, denom: &str) -> Result<Coin>;

    async fn send_tokens(
        &self,
        from: &str,
        to: &str,
        amount: &[Coin],
        gas_limit: u64,
        memo: &str,
    ) -> Result<BroadcastResult>;

    /// `None` while the node has not indexed the hash.
    async fn get_tx(&self, hash: &str) -> Result<Option<IndexedTx>>;
}
