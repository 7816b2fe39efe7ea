//! Typed views over the opaque JSON the server returns.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A token amount as reported by the chain CLI (`amount` is a decimal string).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    pub denom: String,
    pub amount: String,
}

impl Coin {
    pub fn new(amount: impl ToString, denom: impl Into<String>) -> Self {
        Self {
            denom: denom.into(),
            amount: amount.to_string(),
        }
    }

    /// Amount as an integer; `None` when the string is not a base-10 number.
    pub fn amount_u128(&self) -> Option<u128> {
        self.amount.parse().ok()
    }

    pub fn is_zero(&self) -> bool {
        self.amount_u128() == Some(0)
    }

    /// Parse every entry of a `[{denom, amount}, ..]` array, skipping malformed ones.
    pub fn list_from_json(value: &Value) -> Vec<Coin> {
        value
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| serde_json::from_value(item.clone()).ok())
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl std::fmt::Display for Coin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counterparty {
    pub channel_id: String,
    pub port_id: String,
}

/// An IBC channel as listed by the relayer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    pub channel_id: String,
    #[serde(default)]
    pub connection_hops: Vec<String>,
    pub counterparty: Counterparty,
    pub ordering: String,
    pub port_id: String,
    pub state: String,
    pub version: String,
}

/// Fields of a transaction response the helpers care about.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TxOutcome {
    pub tx_hash: Option<String>,
    pub code: Option<u64>,
    pub raw_log: Option<String>,
}

impl TxOutcome {
    pub fn from_json(value: &Value) -> Self {
        Self {
            tx_hash: tx_hash(value),
            code: value["code"].as_u64(),
            raw_log: raw_log(value),
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == Some(0)
    }
}

pub fn tx_hash(value: &Value) -> Option<String> {
    value["txhash"].as_str().map(str::to_string)
}

/// `raw_log`, ignoring the empty and `[]` placeholders newer SDKs emit.
pub fn raw_log(value: &Value) -> Option<String> {
    value["raw_log"]
        .as_str()
        .filter(|log| !log.is_empty() && *log != "[]")
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_coin_list_from_json() {
        let supply = json!([
            {"denom": "ujuno", "amount": "100"},
            {"denom": "uatom"},
            {"denom": "ibc/ABC", "amount": "7"}
        ]);
        let coins = Coin::list_from_json(&supply);
        assert_eq!(coins, vec![Coin::new(100, "ujuno"), Coin::new(7, "ibc/ABC")]);
        assert!(Coin::list_from_json(&json!({"supply": []})).is_empty());
    }

    #[test]
    fn test_coin_amounts() {
        assert!(Coin::new(0, "uatom").is_zero());
        assert!(!Coin::new("abc", "uatom").is_zero());
        assert_eq!(Coin::new("250000", "uatom").amount_u128(), Some(250_000));
        assert_eq!(Coin::new(5, "ujuno").to_string(), "5ujuno");
    }

    #[test]
    fn test_tx_outcome() {
        let ok = TxOutcome::from_json(&json!({"txhash": "ABC", "code": 0, "raw_log": "[]"}));
        assert_eq!(ok.tx_hash.as_deref(), Some("ABC"));
        assert!(ok.is_success());
        assert_eq!(ok.raw_log, None);

        let failed = TxOutcome::from_json(&json!({"code": 5, "raw_log": "insufficient funds"}));
        assert!(!failed.is_success());
        assert_eq!(failed.tx_hash, None);
        assert_eq!(failed.raw_log.as_deref(), Some("insufficient funds"));
    }

    #[test]
    fn test_channel_deserialize() {
        let channel: Channel = serde_json::from_value(json!({
            "channel_id": "channel-0",
            "connection_hops": ["connection-0"],
            "counterparty": {"channel_id": "channel-0", "port_id": "transfer"},
            "ordering": "ORDER_UNORDERED",
            "port_id": "transfer",
            "state": "STATE_OPEN",
            "version": "ics20-1"
        }))
        .unwrap();
        assert_eq!(channel.connection_hops, vec!["connection-0"]);
        assert_eq!(channel.counterparty.port_id, "transfer");
    }
}
