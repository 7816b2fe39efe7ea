use thiserror::Error;

/// Errors raised by the local-interchain client.
///
/// Transport failures are surfaced untouched; the server reports application
/// level failures through the response body, which only the helpers that
/// inspect it (uploads, transactions) turn into [`LocalIcError::Application`].
#[derive(Debug, Error)]
pub enum LocalIcError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("response was not valid JSON: {source} (body: {body})")]
    Decode {
        body: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("server rejected request: {0}")]
    Application(String),

    #[error("transaction {tx_hash} rejected with code {code}: {raw_log}")]
    TxRejected {
        tx_hash: String,
        code: u64,
        raw_log: String,
    },
}

impl LocalIcError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        LocalIcError::InvalidArgument(msg.into())
    }

    /// True when the error happened before any request was sent.
    pub fn is_construction(&self) -> bool {
        matches!(self, LocalIcError::InvalidArgument(_))
    }
}

pub type Result<T> = std::result::Result<T, LocalIcError>;
