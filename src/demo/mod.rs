//! Demonstration flows used by the binaries. Both return errors instead of
//! exiting so the entry point decides the exit status.

use thiserror::Error;

use crate::error::LocalIcError;

pub mod api;
pub mod send;

pub use api::{run_api_demo, ApiReport};
pub use send::{run_send_demo, SendReport};

/// Conditions that make a demo run fail.
#[derive(Debug, Error)]
pub enum DemoError {
    #[error("account {address} balance is 0{denom}")]
    ZeroBalance { address: String, denom: String },

    #[error("transaction {tx_hash} failed: code {code}, raw_log: {raw_log}")]
    TransactionFailed {
        tx_hash: String,
        code: u64,
        raw_log: String,
    },

    #[error("transaction {0} was not found after broadcast")]
    TransactionMissing(String),

    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),

    #[error(transparent)]
    Client(#[from] anyhow::Error),
}

impl From<LocalIcError> for DemoError {
    fn from(e: LocalIcError) -> Self {
        match e {
            LocalIcError::TxRejected {
                tx_hash,
                code,
                raw_log,
            } => DemoError::TransactionFailed {
                tx_hash,
                code,
                raw_log,
            },
            other => DemoError::Client(other.into()),
        }
    }
}
