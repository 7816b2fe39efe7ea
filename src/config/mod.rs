use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

pub mod api_demo;
pub mod consts;
pub mod send_demo;

// Re-export for convenience
pub use api_demo::{ApiDemoConfig, CliArgs as ApiDemoCliArgs};
pub use send_demo::{CliArgs as SendDemoCliArgs, SendDemoConfig};

/// `[api]` table of the optional TOML config file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSection {
    pub url: Option<String>,
    pub chain_id: Option<String>,
    pub key_name: Option<String>,
    pub poll_limit: Option<u32>,
}

/// `[send]` table of the optional TOML config file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SendSection {
    pub rpc_url: Option<String>,
    pub mnemonic: Option<String>,
    pub prefix: Option<String>,
    pub denom: Option<String>,
    pub gas_price: Option<String>,
    pub gas_limit: Option<u64>,
    pub memo: Option<String>,
    pub send_amount: Option<u64>,
    pub poll_limit: Option<u32>,
}

/// Values read from a config file. Anything left out falls back to
/// [`consts`] unless given on the command line.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub api: ApiSection,
    pub send: SendSection,
}

/// Load configuration from a TOML file.
pub fn load_config_from_path<P: AsRef<Path>>(path: P) -> anyhow::Result<FileConfig> {
    let path = path.as_ref();
    let s = fs::read_to_string(path)
        .with_context(|| format!("reading config file {}", path.display()))?;
    let cfg: FileConfig =
        toml::from_str(&s).with_context(|| format!("parsing config file {}", path.display()))?;
    Ok(cfg)
}

pub(crate) fn load_optional<P: AsRef<Path>>(path: Option<P>) -> anyhow::Result<FileConfig> {
    match path {
        Some(path) => load_config_from_path(path),
        None => Ok(FileConfig::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_partial_file() {
        let cfg: FileConfig = toml::from_str(
            r#"
            [api]
            url = "http://10.0.0.2:8080"

            [send]
            gas_limit = 300000
            "#,
        )
        .unwrap();
        assert_eq!(cfg.api.url.as_deref(), Some("http://10.0.0.2:8080"));
        assert_eq!(cfg.api.chain_id, None);
        assert_eq!(cfg.send.gas_limit, Some(300_000));
        assert_eq!(cfg.send.memo, None);
    }

    #[test]
    fn test_empty_file_is_default() {
        let cfg: FileConfig = toml::from_str("").unwrap();
        assert_eq!(cfg, FileConfig::default());
    }

    #[test]
    fn test_load_missing_file_fails() {
        let err = load_config_from_path("does-not-exist.toml").unwrap_err();
        assert!(err.to_string().contains("does-not-exist.toml"));
        assert_eq!(load_optional::<&str>(None).unwrap(), FileConfig::default());
    }
}
