use crate::error::{LocalIcError, Result};

/// Address of a local-interchain server together with the chain it targets.
///
/// Fields are private so the pair cannot change after validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    api: String,
    chain_id: String,
}

impl Endpoint {
    /// Validate and build an endpoint.
    ///
    /// Only checks that both values are non-empty and that `api` starts with
    /// `http`; the URL itself is not parsed.
    pub fn new(api: impl Into<String>, chain_id: impl Into<String>) -> Result<Self> {
        let api = api.into();
        let chain_id = chain_id.into();

        if api.is_empty() || chain_id.is_empty() {
            return Err(LocalIcError::invalid("API or chain_id not provided"));
        }
        if !api.starts_with("http") {
            return Err(LocalIcError::invalid(format!(
                "API must be a valid http address, got '{api}'"
            )));
        }

        Ok(Self { api, chain_id })
    }

    pub fn api(&self) -> &str {
        &self.api
    }

    pub fn chain_id(&self) -> &str {
        &self.chain_id
    }
}
