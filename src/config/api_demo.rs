use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use super::consts::{DEFAULT_API_URL, DEFAULT_CHAIN_ID, DEFAULT_KEY_NAME, DEFAULT_POLL_LIMIT};
use super::{load_optional, FileConfig};

/// CLI arguments for the local-interchain API demo
#[derive(Parser, Debug, Default)]
#[command(name = "localic_api_demo")]
#[command(about = "Exercise a running local-interchain server: keys, queries and a bank send", long_about = None)]
pub struct CliArgs {
    /// local-interchain API address
    #[arg(long, env = "LOCALIC_API_URL")]
    pub api_url: Option<String>,

    /// Chain to target
    #[arg(long, env = "CHAIN_ID")]
    pub chain_id: Option<String>,

    /// Keyring entry used to sign the demo transaction
    #[arg(long, env = "KEY_NAME")]
    pub key_name: Option<String>,

    /// Reachability probes before starting
    #[arg(long, env = "POLL_LIMIT")]
    pub poll_limit: Option<u32>,

    /// Optional TOML file with an [api] table
    #[arg(long, env = "LOCALIC_CONFIG")]
    pub config: Option<PathBuf>,
}

/// API demo configuration with all values resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiDemoConfig {
    pub api_url: String,
    pub chain_id: String,
    pub key_name: String,
    pub poll_limit: u32,
}

impl ApiDemoConfig {
    /// Load configuration with priority: CLI/env -> config file -> defaults
    pub fn load(cli_args: CliArgs) -> Result<Self> {
        let file = load_optional(cli_args.config.as_ref())?;
        let config = Self::resolve(cli_args, file);
        info!(
            api_url = %config.api_url,
            chain_id = %config.chain_id,
            "Loaded ApiDemoConfig"
        );
        Ok(config)
    }

    fn resolve(cli_args: CliArgs, file: FileConfig) -> Self {
        let api = file.api;
        Self {
            api_url: cli_args
                .api_url
                .or(api.url)
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            chain_id: cli_args
                .chain_id
                .or(api.chain_id)
                .unwrap_or_else(|| DEFAULT_CHAIN_ID.to_string()),
            key_name: cli_args
                .key_name
                .or(api.key_name)
                .unwrap_or_else(|| DEFAULT_KEY_NAME.to_string()),
            poll_limit: cli_args
                .poll_limit
                .or(api.poll_limit)
                .unwrap_or(DEFAULT_POLL_LIMIT),
        }
    }
}
