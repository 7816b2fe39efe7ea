use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use super::consts::{
    DEFAULT_DENOM, DEFAULT_GAS_LIMIT, DEFAULT_GAS_PRICE, DEFAULT_MEMO, DEFAULT_MNEMONIC,
    DEFAULT_POLL_LIMIT, DEFAULT_RPC_URL, DEFAULT_SEND_AMOUNT, DEFAULT_WALLET_PREFIX,
};
use super::{load_optional, FileConfig};
use crate::signing::GasPrice;

/// CLI arguments for the token send demo
#[derive(Parser, Debug, Default)]
#[command(name = "send_tokens")]
#[command(about = "Sign and broadcast a self-transfer against a local node, then confirm it", long_about = None)]
pub struct CliArgs {
    /// Tendermint RPC endpoint of the node
    #[arg(long, env = "RPC_URL")]
    pub rpc_url: Option<String>,

    /// BIP-39 mnemonic of the sending account
    #[arg(long, env = "MNEMONIC")]
    pub mnemonic: Option<String>,

    /// Bech32 address prefix
    #[arg(long, env = "WALLET_PREFIX")]
    pub prefix: Option<String>,

    /// Denom to check and send
    #[arg(long, env = "DENOM")]
    pub denom: Option<String>,

    /// Gas price such as 0.025uatom
    #[arg(long, env = "GAS_PRICE")]
    pub gas_price: Option<String>,

    #[arg(long, env = "GAS_LIMIT")]
    pub gas_limit: Option<u64>,

    #[arg(long, env = "MEMO")]
    pub memo: Option<String>,

    /// Amount of `denom` sent to self
    #[arg(long, env = "SEND_AMOUNT")]
    pub send_amount: Option<u64>,

    /// Reachability probes before starting
    #[arg(long, env = "POLL_LIMIT")]
    pub poll_limit: Option<u32>,

    /// Optional TOML file with a [send] table
    #[arg(long, env = "LOCALIC_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Send demo configuration with all values resolved
#[derive(Debug, Clone, PartialEq)]
pub struct SendDemoConfig {
    pub rpc_url: String,
    pub mnemonic: String,
    pub prefix: String,
    pub denom: String,
    pub gas_price: GasPrice,
    pub gas_limit: u64,
    pub memo: String,
    pub send_amount: u128,
    pub poll_limit: u32,
}

impl Default for SendDemoConfig {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.to_string(),
            mnemonic: DEFAULT_MNEMONIC.to_string(),
            prefix: DEFAULT_WALLET_PREFIX.to_string(),
            denom: DEFAULT_DENOM.to_string(),
            gas_price: GasPrice {
                amount: 0.025,
                denom: DEFAULT_DENOM.to_string(),
            },
            gas_limit: DEFAULT_GAS_LIMIT,
            memo: DEFAULT_MEMO.to_string(),
            send_amount: DEFAULT_SEND_AMOUNT,
            poll_limit: DEFAULT_POLL_LIMIT,
        }
    }
}

impl SendDemoConfig {
    /// Load configuration with priority: CLI/env -> config file -> defaults
    pub fn load(cli_args: CliArgs) -> Result<Self> {
        let file = load_optional(cli_args.config.as_ref())?;
        let config = Self::resolve(cli_args, file)?;
        info!(
            rpc_url = %config.rpc_url,
            prefix = %config.prefix,
            denom = %config.denom,
            "Loaded SendDemoConfig"
        );
        Ok(config)
    }

    fn resolve(cli_args: CliArgs, file: FileConfig) -> Result<Self> {
        let send = file.send;

        let gas_price_str = cli_args
            .gas_price
            .or(send.gas_price)
            .unwrap_or_else(|| DEFAULT_GAS_PRICE.to_string());
        let gas_price: GasPrice = gas_price_str
            .parse()
            .with_context(|| format!("invalid gas price '{gas_price_str}'"))?;

        Ok(Self {
            rpc_url: cli_args
                .rpc_url
                .or(send.rpc_url)
                .unwrap_or_else(|| DEFAULT_RPC_URL.to_string()),
            mnemonic: cli_args
                .mnemonic
                .or(send.mnemonic)
                .unwrap_or_else(|| DEFAULT_MNEMONIC.to_string()),
            prefix: cli_args
                .prefix
                .or(send.prefix)
                .unwrap_or_else(|| DEFAULT_WALLET_PREFIX.to_string()),
            denom: cli_args
                .denom
                .or(send.denom)
                .unwrap_or_else(|| DEFAULT_DENOM.to_string()),
            gas_price,
            gas_limit: cli_args
                .gas_limit
                .or(send.gas_limit)
                .unwrap_or(DEFAULT_GAS_LIMIT),
            memo: cli_args
                .memo
                .or(send.memo)
                .unwrap_or_else(|| DEFAULT_MEMO.to_string()),
            send_amount: cli_args
                .send_amount
                .or(send.send_amount)
                .map(u128::from)
                .unwrap_or(DEFAULT_SEND_AMOUNT),
            poll_limit: cli_args
                .poll_limit
                .or(send.poll_limit)
                .unwrap_or(DEFAULT_POLL_LIMIT),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SendSection;

    #[test]
    fn test_defaults_match_default_impl() {
        let config = SendDemoConfig::resolve(CliArgs::default(), FileConfig::default()).unwrap();
        assert_eq!(config, SendDemoConfig::default());
        assert_eq!(config.gas_price.denom, "uatom");
        assert_eq!(config.send_amount, 1);
    }

    #[test]
    fn test_file_values_used() {
        let file = FileConfig {
            send: SendSection {
                denom: Some("ujuno".into()),
                gas_price: Some("0.1ujuno".into()),
                prefix: Some("juno".into()),
                send_amount: Some(42),
                ..Default::default()
            },
            ..Default::default()
        };
        let cli = CliArgs {
            memo: Some("cli memo".into()),
            ..Default::default()
        };

        let config = SendDemoConfig::resolve(cli, file).unwrap();
        assert_eq!(config.denom, "ujuno");
        assert_eq!(config.gas_price.amount, 0.1);
        assert_eq!(config.prefix, "juno");
        assert_eq!(config.send_amount, 42);
        assert_eq!(config.memo, "cli memo");
        assert_eq!(config.gas_limit, DEFAULT_GAS_LIMIT);
    }

    #[test]
    fn test_invalid_gas_price() {
        let cli = CliArgs {
            gas_price: Some("cheap".into()),
            ..Default::default()
        };
        let err = SendDemoConfig::resolve(cli, FileConfig::default()).unwrap_err();
        assert!(err.to_string().contains("invalid gas price 'cheap'"));
    }
}
