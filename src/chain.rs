//! Per-chain facade over the local-interchain API.
//!
//! Each method maps onto one server action; the command string is passed
//! through untouched unless the action takes `key=value` arguments, in which
//! case it is built with [`crate::command`].

use std::path::Path;

use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info};

use crate::command::{self, Action};
use crate::endpoint::Endpoint;
use crate::error::{LocalIcError, Result};
use crate::request::{self, Response, ResponseFormat};
use crate::retry::{retry_with_classifier, RetryConfig};
use crate::types::{Channel, Coin, TxOutcome};

/// Client bound to one chain of a local-interchain server.
#[derive(Debug, Clone)]
pub struct Chain {
    endpoint: Endpoint,
    client: Client,
    tx_lookup: RetryConfig,
}

impl Chain {
    pub fn new(api: impl Into<String>, chain_id: impl Into<String>) -> Result<Self> {
        Ok(Self::with_client(Endpoint::new(api, chain_id)?, Client::new()))
    }

    pub fn with_client(endpoint: Endpoint, client: Client) -> Self {
        Self {
            endpoint,
            client,
            tx_lookup: RetryConfig::default(),
        }
    }

    /// Override how [`Chain::transaction`] waits for a hash to become queryable.
    pub fn with_tx_lookup(mut self, config: RetryConfig) -> Self {
        self.tx_lookup = config;
        self
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn chain_id(&self) -> &str {
        self.endpoint.chain_id()
    }

    pub async fn make_request(
        &self,
        action: &str,
        cmd: &str,
        format: ResponseFormat,
    ) -> Result<Response> {
        request::make_request(
            &self.client,
            self.endpoint.api(),
            self.endpoint.chain_id(),
            action,
            cmd,
            format,
        )
        .await
    }

    async fn action(&self, action: Action, cmd: &str, format: ResponseFormat) -> Result<Response> {
        self.make_request(action.as_str(), cmd, format).await
    }

    async fn info(&self, request: &str, extra: &[(&str, &str)]) -> Result<String> {
        let resp = request::make_info_request_with(
            &self.client,
            self.endpoint.api(),
            self.endpoint.chain_id(),
            request,
            extra,
            ResponseFormat::Text,
        )
        .await?;
        Ok(resp.into_text().unwrap_or_default())
    }

    /// Query command for the chain daemon, e.g. `bank total`.
    pub async fn query(&self, cmd: &str, format: ResponseFormat) -> Result<Response> {
        self.action(Action::Query, cmd, format).await
    }

    /// Everything after the daemon binary name, e.g. `keys list --output=json`.
    pub async fn binary(&self, cmd: &str, format: ResponseFormat) -> Result<Response> {
        self.action(Action::Bin, cmd, format).await
    }

    /// Shell command inside the node container.
    pub async fn shell_exec(&self, cmd: &str, format: ResponseFormat) -> Result<Response> {
        self.action(Action::Exec, cmd, format).await
    }

    pub async fn relayer_stop(&self) -> Result<Response> {
        self.action(Action::StopRelayer, "", ResponseFormat::Json).await
    }

    pub async fn relayer_start(&self) -> Result<Response> {
        self.action(Action::StartRelayer, "", ResponseFormat::Json).await
    }

    pub async fn relayer_exec(&self, cmd: &str, format: ResponseFormat) -> Result<Response> {
        self.action(Action::RelayerExec, cmd, format).await
    }

    pub async fn relayer_get_channels_raw(&self) -> Result<Response> {
        self.action(Action::GetChannels, "", ResponseFormat::Json).await
    }

    pub async fn relayer_get_channels(&self) -> Result<Vec<Channel>> {
        let value = self
            .relayer_get_channels_raw()
            .await?
            .into_json()
            .unwrap_or_default();
        if !value.is_array() {
            return Err(LocalIcError::Application(format!(
                "expected channel list, got {value}"
            )));
        }
        serde_json::from_value(value.clone()).map_err(|source| LocalIcError::Decode {
            body: value.to_string(),
            source,
        })
    }

    /// Upload a file the server can read at `abs_path`.
    pub async fn store_file(&self, abs_path: &Path) -> Result<Value> {
        request::store_file(
            &self.client,
            self.endpoint.api(),
            self.endpoint.chain_id(),
            abs_path,
            None,
        )
        .await
    }

    /// Upload a CosmWasm contract signed by `key_name` and return its code id.
    pub async fn store_contract(&self, key_name: &str, abs_path: &Path) -> Result<u64> {
        if key_name.is_empty() {
            return Err(LocalIcError::invalid("key_name is required for contract uploads"));
        }

        let resp = request::store_file(
            &self.client,
            self.endpoint.api(),
            self.endpoint.chain_id(),
            abs_path,
            Some(key_name),
        )
        .await?;

        if let Some(error) = resp.get("error").filter(|e| !e.is_null()) {
            return Err(LocalIcError::Application(format!(
                "upload of {} failed: {error}",
                abs_path.display()
            )));
        }

        let code_id = match &resp["code_id"] {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.parse().ok(),
            _ => None,
        };
        let code_id = code_id.ok_or_else(|| {
            LocalIcError::Application(format!("code_id not found in upload response: {resp}"))
        })?;

        info!(chain_id = self.chain_id(), code_id, path = %abs_path.display(), "Contract stored");
        Ok(code_id)
    }

    pub async fn faucet(&self, address: &str, amount: u64) -> Result<Response> {
        let cmd = command::faucet_command(address, amount);
        self.action(Action::Faucet, &cmd, ResponseFormat::Json).await
    }

    pub async fn recover_key<S: AsRef<str>>(&self, key_name: &str, mnemonic: &[S]) -> Result<Response> {
        let cmd = command::recover_key_command(key_name, mnemonic);
        self.action(Action::RecoverKey, &cmd, ResponseFormat::Json).await
    }

    pub async fn add_full_node(&self, amount: u64) -> Result<Response> {
        let cmd = command::add_full_nodes_command(amount);
        self.action(Action::AddFullNodes, &cmd, ResponseFormat::Json).await
    }

    pub async fn kill_all(&self) -> Result<Response> {
        self.action(Action::KillAll, "", ResponseFormat::Json).await
    }

    // === info ===

    /// Peer string of the chain's first node (`id@host:port`).
    pub async fn get_peer(&self) -> Result<String> {
        self.info("peer", &[]).await
    }

    pub async fn get_name(&self) -> Result<String> {
        self.info("name", &[]).await
    }

    pub async fn get_container_id(&self) -> Result<String> {
        self.info("container_id", &[]).await
    }

    pub async fn get_host_name(&self) -> Result<String> {
        self.info("hostname", &[]).await
    }

    pub async fn get_home_dir(&self) -> Result<String> {
        self.info("home_dir", &[]).await
    }

    pub async fn get_genesis_file_content(&self) -> Result<Option<String>> {
        let content = self.info("genesis_file_content", &[]).await?;
        Ok(Some(content).filter(|c| !c.is_empty()))
    }

    /// Latest block height; 0 when the server answer is not a number.
    pub async fn get_height(&self) -> Result<u64> {
        let height = self.info("height", &[]).await?;
        Ok(height.trim().parse().unwrap_or(0))
    }

    /// Contents of a file relative to the node's home directory.
    pub async fn read_file(&self, relative_path: &str) -> Result<String> {
        self.info("read_file", &[("relative_path", relative_path)]).await
    }

    // === transactions ===

    /// Look up a transaction by hash. Fails with [`LocalIcError::Application`]
    /// while the server still answers with an `error` body.
    pub async fn query_tx(&self, tx_hash: &str) -> Result<Value> {
        if tx_hash.is_empty() {
            return Err(LocalIcError::invalid("tx_hash cannot be empty"));
        }

        let value = self
            .query(&format!("tx {tx_hash} --output=json"), ResponseFormat::Json)
            .await?
            .into_json()
            .unwrap_or_default();

        match value.get("error").filter(|e| !e.is_null()) {
            Some(error) => Err(LocalIcError::Application(format!("tx {tx_hash}: {error}"))),
            None => Ok(value),
        }
    }

    /// Run a `tx ...` binary command and wait until its hash is queryable.
    /// A non-zero broadcast code fails at once with [`LocalIcError::TxRejected`].
    pub async fn transaction(&self, cmd: &str) -> Result<Value> {
        let res = self
            .binary(cmd, ResponseFormat::Json)
            .await?
            .into_json()
            .unwrap_or_default();
        let broadcast = TxOutcome::from_json(&res);
        if let Some(code) = broadcast.code.filter(|code| *code != 0) {
            return Err(LocalIcError::TxRejected {
                tx_hash: broadcast.tx_hash.unwrap_or_default(),
                code,
                raw_log: broadcast.raw_log.unwrap_or_default(),
            });
        }
        let tx_hash = broadcast.tx_hash.ok_or_else(|| {
            LocalIcError::Application(format!("txhash not found in response: {res}"))
        })?;
        debug!(chain_id = self.chain_id(), tx_hash = %tx_hash, "Transaction broadcast, waiting for inclusion");

        retry_with_classifier(
            self.tx_lookup.clone(),
            "query_tx",
            || self.query_tx(&tx_hash),
            |e| matches!(e, LocalIcError::Application(_) | LocalIcError::Decode { .. }),
        )
        .await
    }

    pub async fn get_balance(&self, address: &str) -> Result<Vec<Coin>> {
        let value = self
            .query(&format!("bank balances {address} --output=json"), ResponseFormat::Json)
            .await?
            .into_json()
            .unwrap_or_default();
        Ok(Coin::list_from_json(&value["balances"]))
    }

    pub async fn get_total_supply(&self) -> Result<Vec<Coin>> {
        let value = self
            .query("bank total", ResponseFormat::Json)
            .await?
            .into_json()
            .unwrap_or_default();
        Ok(Coin::list_from_json(&value["supply"]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;
    use std::time::Duration;

    const CHAIN_ID: &str = "localjuno-1";

    fn chain(server: &MockServer) -> Chain {
        Chain::new(server.url("/"), CHAIN_ID)
            .unwrap()
            .with_tx_lookup(RetryConfig::fixed_duration(Duration::ZERO, 3))
    }

    async fn expect_command<'a>(
        server: &'a MockServer,
        action: &str,
        cmd: &str,
    ) -> httpmock::Mock<'a> {
        let body = json!({"chain_id": CHAIN_ID, "action": action, "cmd": cmd});
        server
            .mock_async(move |when, then| {
                when.method(POST).path("/").json_body(body);
                then.status(200).json_body(json!({"ok": true}));
            })
            .await
    }

    #[test]
    fn test_new_validates_endpoint() {
        assert!(Chain::new("localhost:8080", CHAIN_ID).is_err());
        assert!(Chain::new("http://localhost:8080", "").is_err());
        let chain = Chain::new("http://localhost:8080", CHAIN_ID).unwrap();
        assert_eq!(chain.endpoint().api(), "http://localhost:8080");
    }

    #[tokio::test]
    async fn test_faucet_command_format() {
        let server = MockServer::start_async().await;
        let mock = expect_command(&server, "faucet", "amount=787;address=juno1abc").await;

        chain(&server).faucet("juno1abc", 787).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_recover_key_command_format() {
        let server = MockServer::start_async().await;
        let mock = expect_command(&server, "recover-key", "keyname=k;mnemonic=a b c").await;

        chain(&server).recover_key("k", &["a", "b", "c"]).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fixed_actions() {
        let server = MockServer::start_async().await;
        let stop = expect_command(&server, "stop-relayer", "").await;
        let start = expect_command(&server, "start-relayer", "").await;
        let kill = expect_command(&server, "kill-all", "").await;
        let nodes = expect_command(&server, "add-full-nodes", "amount=2").await;
        let exec = expect_command(&server, "relayer-exec", "rly paths list").await;
        let shell = expect_command(&server, "exec", "ls /").await;
        let bin = expect_command(&server, "bin", "status").await;

        let chain = chain(&server);
        chain.relayer_stop().await.unwrap();
        chain.relayer_start().await.unwrap();
        chain.kill_all().await.unwrap();
        chain.add_full_node(2).await.unwrap();
        chain.relayer_exec("rly paths list", ResponseFormat::Json).await.unwrap();
        chain.shell_exec("ls /", ResponseFormat::Json).await.unwrap();
        chain.binary("status", ResponseFormat::Json).await.unwrap();

        for mock in [stop, start, kill, nodes, exec, shell, bin] {
            mock.assert_async().await;
        }
    }

    #[tokio::test]
    async fn test_relayer_get_channels_parsed() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/").json_body_includes(r#"{"action":"get_channels"}"#);
                then.status(200).json_body(json!([{
                    "channel_id": "channel-0",
                    "connection_hops": ["connection-0"],
                    "counterparty": {"channel_id": "channel-1", "port_id": "transfer"},
                    "ordering": "ORDER_UNORDERED",
                    "port_id": "transfer",
                    "state": "STATE_OPEN",
                    "version": "ics20-1"
                }]));
            })
            .await;

        let channels = chain(&server).relayer_get_channels().await.unwrap();
        assert_eq!(channels.len(), 1);
        assert_eq!(channels[0].counterparty.channel_id, "channel-1");
    }

    #[tokio::test]
    async fn test_relayer_get_channels_rejects_non_list() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/");
                then.status(200).json_body(json!({"error": "relayer not running"}));
            })
            .await;

        let err = chain(&server).relayer_get_channels().await.unwrap_err();
        assert!(matches!(err, LocalIcError::Application(_)));
    }

    #[tokio::test]
    async fn test_store_contract_returns_code_id() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/upload").header("upload-type", "cosmwasm");
                then.status(200).json_body(json!({"code_id": "12"}));
            })
            .await;

        let code_id = chain(&server)
            .store_contract("acc0", Path::new("/contracts/cw_ibc_example.wasm"))
            .await
            .unwrap();
        assert_eq!(code_id, 12);
    }

    #[tokio::test]
    async fn test_store_contract_error_body() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/upload");
                then.status(200).json_body(json!({"error": "file not found"}));
            })
            .await;

        let chain = chain(&server);
        let err = chain
            .store_contract("acc0", Path::new("/missing.wasm"))
            .await
            .unwrap_err();
        assert!(matches!(err, LocalIcError::Application(_)));

        let err = chain.store_contract("", Path::new("/a.wasm")).await.unwrap_err();
        assert!(err.is_construction());
    }

    #[tokio::test]
    async fn test_info_helpers() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/info").query_param("request", "height");
                then.status(200).body("not-a-number");
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/info")
                    .query_param("request", "genesis_file_content");
                then.status(200).body("");
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/info").query_param("request", "peer");
                then.status(200).body("abc@localjuno-1-val-0:26656");
            })
            .await;

        let chain = chain(&server);
        assert_eq!(chain.get_height().await.unwrap(), 0);
        assert_eq!(chain.get_genesis_file_content().await.unwrap(), None);
        assert_eq!(chain.get_peer().await.unwrap(), "abc@localjuno-1-val-0:26656");
    }

    #[tokio::test]
    async fn test_transaction_waits_for_hash() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/").json_body_includes(r#"{"action":"bin"}"#);
                then.status(200).json_body(json!({"txhash": "ABC123", "code": 0}));
            })
            .await;
        let lookup = server
            .mock_async(|when, then| {
                when.method(POST).path("/").json_body(json!({
                    "chain_id": CHAIN_ID,
                    "action": "query",
                    "cmd": "tx ABC123 --output=json"
                }));
                then.status(200).json_body(json!({"txhash": "ABC123", "code": 0, "height": "12"}));
            })
            .await;

        let tx = chain(&server)
            .transaction("tx bank send acc0 juno1abc 500ujuno --yes --output json")
            .await
            .unwrap();
        assert_eq!(tx["height"], "12");
        lookup.assert_async().await;
    }

    #[tokio::test]
    async fn test_transaction_gives_up_on_error_body() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/").json_body_includes(r#"{"action":"bin"}"#);
                then.status(200).json_body(json!({"txhash": "DEAD"}));
            })
            .await;
        let lookup = server
            .mock_async(|when, then| {
                when.method(POST).path("/").json_body_includes(r#"{"action":"query"}"#);
                then.status(200).json_body(json!({"error": "tx not found"}));
            })
            .await;

        let err = chain(&server).transaction("tx bank send").await.unwrap_err();
        assert!(matches!(err, LocalIcError::Application(_)));
        lookup.assert_calls_async(3).await;
    }

    #[tokio::test]
    async fn test_transaction_rejected_at_broadcast() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/").json_body_includes(r#"{"action":"bin"}"#);
                then.status(200)
                    .json_body(json!({"txhash": "BAD", "code": 13, "raw_log": "insufficient fee"}));
            })
            .await;
        let lookup = server
            .mock_async(|when, then| {
                when.method(POST).path("/").json_body_includes(r#"{"action":"query"}"#);
                then.status(200).json_body(json!({"error": "tx not found"}));
            })
            .await;

        let err = chain(&server).transaction("tx bank send").await.unwrap_err();
        match err {
            LocalIcError::TxRejected {
                tx_hash,
                code,
                raw_log,
            } => {
                assert_eq!(tx_hash, "BAD");
                assert_eq!(code, 13);
                assert_eq!(raw_log, "insufficient fee");
            }
            other => panic!("unexpected error: {other}"),
        }
        lookup.assert_calls_async(0).await;
    }

    #[tokio::test]
    async fn test_transaction_without_hash() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/");
                then.status(200).json_body(json!({"error": "key not found"}));
            })
            .await;

        let err = chain(&server).transaction("tx bank send").await.unwrap_err();
        assert!(matches!(err, LocalIcError::Application(_)));
    }

    #[tokio::test]
    async fn test_bank_helpers() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/").json_body_includes(r#"{"cmd":"bank total"}"#);
                then.status(200)
                    .json_body(json!({"supply": [{"denom": "ujuno", "amount": "100"}]}));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/")
                    .json_body_includes(r#"{"cmd":"bank balances juno1abc --output=json"}"#);
                then.status(200).json_body(json!({"balances": []}));
            })
            .await;

        let chain = chain(&server);
        assert_eq!(chain.get_total_supply().await.unwrap(), vec![Coin::new(100, "ujuno")]);
        assert!(chain.get_balance("juno1abc").await.unwrap().is_empty());
    }
}
