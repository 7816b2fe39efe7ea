use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use bip32::{DerivationPath, Language, Mnemonic};
use cosmrs::bank::MsgSend;
use cosmrs::crypto::secp256k1::SigningKey;
use cosmrs::crypto::PublicKey;
use cosmrs::proto::cosmos::auth::v1beta1::{
    BaseAccount, QueryAccountRequest, QueryAccountResponse,
};
use cosmrs::proto::cosmos::bank::v1beta1::{QueryBalanceRequest, QueryBalanceResponse};
use cosmrs::rpc::{Client as _, HttpClient};
use cosmrs::tendermint::chain::Id as ChainId;
use cosmrs::tendermint::Hash;
use cosmrs::tx::{Body, Fee, Msg, SignDoc, SignerInfo};
use cosmrs::{AccountId, Denom};
use prost::Message;
use tracing::{debug, info};

use super::{BroadcastResult, GasPrice, IndexedTx, SigningClient};
use crate::config::consts::{
    DEFAULT_HD_PATH, DEFAULT_INCLUSION_ATTEMPTS, DEFAULT_INCLUSION_DELAY_SECS,
};
use crate::retry::{retry, RetryConfig};
use crate::types::Coin;

const BALANCE_QUERY_PATH: &str = "/cosmos.bank.v1beta1.Query/Balance";
const ACCOUNT_QUERY_PATH: &str = "/cosmos.auth.v1beta1.Query/Account";

fn default_inclusion_wait() -> RetryConfig {
    RetryConfig::fixed(DEFAULT_INCLUSION_DELAY_SECS, DEFAULT_INCLUSION_ATTEMPTS)
}

// cosmrs reports errors as eyre reports, which do not convert into anyhow.
fn report(e: impl fmt::Display) -> anyhow::Error {
    anyhow!("{e}")
}

/// A secp256k1 account derived from a BIP-39 mnemonic.
pub struct Wallet {
    signing_key: SigningKey,
    public_key: PublicKey,
    account_id: AccountId,
}

impl Wallet {
    /// Derive the first account (`m/44'/118'/0'/0/0`) for `prefix`.
    pub fn from_mnemonic(phrase: &str, prefix: &str) -> Result<Self> {
        Self::from_mnemonic_at(phrase, prefix, DEFAULT_HD_PATH)
    }

    pub fn from_mnemonic_at(phrase: &str, prefix: &str, hd_path: &str) -> Result<Self> {
        let mnemonic = Mnemonic::new(phrase.trim(), Language::English)
            .map_err(|e| anyhow!("invalid mnemonic: {e}"))?;
        let path: DerivationPath = hd_path
            .parse()
            .map_err(|e| anyhow!("invalid HD path '{hd_path}': {e}"))?;

        let seed = mnemonic.to_seed("");
        let signing_key = SigningKey::derive_from_path(seed, &path).map_err(report)?;
        let public_key = signing_key.public_key();
        let account_id = public_key
            .account_id(prefix)
            .map_err(report)
            .with_context(|| format!("invalid bech32 prefix '{prefix}'"))?;

        Ok(Self {
            signing_key,
            public_key,
            account_id,
        })
    }

    pub fn address(&self) -> String {
        self.account_id.to_string()
    }

    pub fn account_id(&self) -> &AccountId {
        &self.account_id
    }
}

impl fmt::Debug for Wallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wallet")
            .field("address", &self.account_id.as_ref())
            .finish_non_exhaustive()
    }
}

/// [`SigningClient`] over a node's Tendermint RPC endpoint.
pub struct CosmosSigningClient {
    rpc: HttpClient,
    wallet: Wallet,
    address: String,
    gas_price: GasPrice,
    chain_id: ChainId,
    inclusion: RetryConfig,
}

impl CosmosSigningClient {
    /// Connect to `rpc_addr` and read the chain id from the node status.
    pub async fn connect(rpc_addr: &str, wallet: Wallet, gas_price: GasPrice) -> Result<Self> {
        let rpc = HttpClient::new(rpc_addr)
            .map_err(report)
            .with_context(|| format!("invalid RPC address {rpc_addr}"))?;
        let status = rpc
            .status()
            .await
            .map_err(report)
            .with_context(|| format!("failed to reach RPC at {rpc_addr}"))?;
        let chain_id = status.node_info.network;
        info!(rpc = rpc_addr, chain_id = %chain_id, "Successfully connected to node");

        let address = wallet.address();
        Ok(Self {
            rpc,
            wallet,
            address,
            gas_price,
            chain_id,
            inclusion: default_inclusion_wait(),
        })
    }

    /// Override how long `send_tokens` waits for the transaction to be indexed.
    pub fn with_inclusion_wait(mut self, config: RetryConfig) -> Self {
        self.inclusion = config;
        self
    }

    pub fn chain_id(&self) -> &ChainId {
        &self.chain_id
    }

    async fn abci_query<Req, Resp>(&self, path: &str, request: Req) -> Result<Resp>
    where
        Req: Message,
        Resp: Message + Default,
    {
        let res = self
            .rpc
            .abci_query(Some(path.to_string()), request.encode_to_vec(), None, false)
            .await
            .map_err(report)
            .with_context(|| format!("ABCI query {path} failed"))?;

        if res.code.is_err() {
            bail!("ABCI query {path} returned code {}: {}", res.code.value(), res.log);
        }
        Resp::decode(res.value.as_slice()).with_context(|| format!("decoding {path} response"))
    }

    async fn base_account(&self, address: &str) -> Result<BaseAccount> {
        let res: QueryAccountResponse = self
            .abci_query(
                ACCOUNT_QUERY_PATH,
                QueryAccountRequest {
                    address: address.to_string(),
                },
            )
            .await?;
        let any = res
            .account
            .ok_or_else(|| anyhow!("account {address} not found"))?;
        BaseAccount::decode(any.value.as_slice())
            .with_context(|| format!("account {address} is not a base account ({})", any.type_url))
    }

    async fn wait_for_inclusion(&self, hash: &str) -> Result<IndexedTx> {
        retry(self.inclusion.clone(), "wait_for_tx", || async move {
            self.get_tx(hash)
                .await?
                .ok_or_else(|| anyhow!("tx {hash} not indexed yet"))
        })
        .await
    }
}

fn to_cosmrs_coin(coin: &Coin) -> Result<cosmrs::Coin> {
    let amount = coin
        .amount_u128()
        .ok_or_else(|| anyhow!("invalid amount '{}'", coin.amount))?;
    let denom: Denom = coin.denom.parse().map_err(report)?;
    Ok(cosmrs::Coin { denom, amount })
}

#[async_trait]
impl SigningClient for CosmosSigningClient {
    fn address(&self) -> &str {
        &self.address
    }

    async fn get_balance(&self, address: &str, denom: &str) -> Result<Coin> {
        let res: QueryBalanceResponse = self
            .abci_query(
                BALANCE_QUERY_PATH,
                QueryBalanceRequest {
                    address: address.to_string(),
                    denom: denom.to_string(),
                },
            )
            .await?;

        Ok(res
            .balance
            .map(|c| Coin::new(c.amount, c.denom))
            .unwrap_or_else(|| Coin::new(0, denom)))
    }

    async fn send_tokens(
        &self,
        from: &str,
        to: &str,
        amount: &[Coin],
        gas_limit: u64,
        memo: &str,
    ) -> Result<BroadcastResult> {
        if from != self.address {
            bail!("wallet {} cannot sign for {from}", self.address);
        }

        let account = self.base_account(from).await?;
        let msg = MsgSend {
            from_address: AccountId::from_str(from).map_err(report)?,
            to_address: AccountId::from_str(to).map_err(report)?,
            amount: amount.iter().map(to_cosmrs_coin).collect::<Result<_>>()?,
        };

        let fee_coin = to_cosmrs_coin(&self.gas_price.fee_for(gas_limit))?;
        let fee = Fee::from_amount_and_gas(fee_coin, gas_limit);
        let body = Body::new(vec![msg.to_any().map_err(report)?], memo, 0u32);
        let auth_info =
            SignerInfo::single_direct(Some(self.wallet.public_key), account.sequence).auth_info(fee);
        let sign_doc = SignDoc::new(&body, &auth_info, &self.chain_id, account.account_number)
            .map_err(report)?;
        let raw = sign_doc.sign(&self.wallet.signing_key).map_err(report)?;
        let tx_bytes = raw.to_bytes().map_err(report)?;

        debug!(
            from,
            to,
            sequence = account.sequence,
            account_number = account.account_number,
            "Broadcasting MsgSend"
        );
        let res = self
            .rpc
            .broadcast_tx_sync(tx_bytes)
            .await
            .map_err(report)
            .context("broadcast failed")?;
        if res.code.is_err() {
            bail!("transaction rejected with code {}: {}", res.code.value(), res.log);
        }

        let tx_hash = res.hash.to_string();
        let included = self.wait_for_inclusion(&tx_hash).await?;
        Ok(BroadcastResult {
            tx_hash,
            height: included.height,
        })
    }

    async fn get_tx(&self, hash: &str) -> Result<Option<IndexedTx>> {
        let parsed = Hash::from_str(hash).map_err(report)?;
        match self.rpc.tx(parsed, false).await {
            Ok(res) => Ok(Some(IndexedTx {
                hash: res.hash.to_string(),
                height: res.height.value(),
                code: res.tx_result.code.value(),
                raw_log: res.tx_result.log,
            })),
            Err(e) if e.to_string().contains("not found") => Ok(None),
            Err(e) => Err(report(e).context(format!("tx lookup for {hash} failed"))),
        }
    }
}
