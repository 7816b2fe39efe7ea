//! Request construction for the local-interchain HTTP API.
//!
//! Three shapes exist: `POST {api}` with a [`RequestEnvelope`], `POST
//! {api}/upload` with an [`UploadEnvelope`] and `GET {api}/info` with query
//! parameters. None of them retry; transport errors go straight back to the
//! caller.

use std::path::Path;

use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::{LocalIcError, Result};

const JSON_CONTENT_TYPE: &str = "application/json";
const UPLOAD_TYPE_HEADER: &str = "Upload-Type";
const UPLOAD_TYPE_COSMWASM: &str = "cosmwasm";

/// Body of a command request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestEnvelope {
    pub chain_id: String,
    pub action: String,
    pub cmd: String,
}

/// Body of an upload request. `key_name` is only present for contract uploads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadEnvelope {
    pub chain_id: String,
    pub file_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_name: Option<String>,
}

/// How the caller wants the response body interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResponseFormat {
    #[default]
    Json,
    Text,
}

/// A response body, parsed or raw depending on the requested [`ResponseFormat`].
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    Json(Value),
    Text(String),
}

impl Response {
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Response::Json(v) => Some(v),
            Response::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Response::Text(t) => Some(t),
            Response::Json(_) => None,
        }
    }

    pub fn into_json(self) -> Option<Value> {
        match self {
            Response::Json(v) => Some(v),
            Response::Text(_) => None,
        }
    }

    pub fn into_text(self) -> Option<String> {
        match self {
            Response::Text(t) => Some(t),
            Response::Json(_) => None,
        }
    }
}

async fn read_body(resp: reqwest::Response, format: ResponseFormat) -> Result<Response> {
    let body = resp.text().await?;
    match format {
        ResponseFormat::Text => Ok(Response::Text(body)),
        ResponseFormat::Json => serde_json::from_str(&body)
            .map(Response::Json)
            .map_err(|source| LocalIcError::Decode { body, source }),
    }
}

/// `{api}/upload`, adding the separating slash when `api` lacks one.
pub fn upload_url(api: &str) -> String {
    if api.ends_with('/') {
        format!("{api}upload")
    } else {
        format!("{api}/upload")
    }
}

/// `{api}/info` unless `api` already ends with `/info`. One trailing slash
/// is ignored.
pub fn info_url(api: &str) -> String {
    let base = api.strip_suffix('/').unwrap_or(api);
    if base.ends_with("/info") {
        base.to_string()
    } else {
        format!("{base}/info")
    }
}

/// Send a command for `action` to the server's command endpoint.
pub async fn make_request(
    client: &Client,
    api: &str,
    chain_id: &str,
    action: &str,
    cmd: &str,
    format: ResponseFormat,
) -> Result<Response> {
    let envelope = RequestEnvelope {
        chain_id: chain_id.to_string(),
        action: action.to_string(),
        cmd: cmd.to_string(),
    };
    debug!(api, chain_id, action, cmd, "Sending command request");

    let resp = client
        .post(api)
        .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
        .json(&envelope)
        .send()
        .await?;

    read_body(resp, format).await
}

/// Ask the server to store a file it can read at `file_path`.
///
/// A non-empty `key_name` marks the file as a CosmWasm contract: the
/// `Upload-Type: cosmwasm` header is added and `key_name` goes into the body.
/// The file is never read locally.
pub async fn store_file(
    client: &Client,
    api: &str,
    chain_id: &str,
    file_path: &Path,
    key_name: Option<&str>,
) -> Result<Value> {
    let key_name = key_name.filter(|k| !k.is_empty());
    let envelope = UploadEnvelope {
        chain_id: chain_id.to_string(),
        file_path: file_path.display().to_string(),
        key_name: key_name.map(str::to_string),
    };
    let url = upload_url(api);
    debug!(url = %url, chain_id, file_path = %envelope.file_path, contract = key_name.is_some(), "Uploading file");

    let mut req = client.post(&url).header(CONTENT_TYPE, JSON_CONTENT_TYPE);
    if key_name.is_some() {
        req = req.header(UPLOAD_TYPE_HEADER, UPLOAD_TYPE_COSMWASM);
    }
    let resp = req.json(&envelope).send().await?;

    let body = resp.text().await?;
    serde_json::from_str(&body).map_err(|source| LocalIcError::Decode { body, source })
}

/// `GET {api}/info?chain_id=..&request=..`.
pub async fn make_info_request(
    client: &Client,
    api: &str,
    chain_id: &str,
    request: &str,
    format: ResponseFormat,
) -> Result<Response> {
    make_info_request_with(client, api, chain_id, request, &[], format).await
}

/// Info request carrying additional query parameters after `chain_id` and `request`.
pub async fn make_info_request_with(
    client: &Client,
    api: &str,
    chain_id: &str,
    request: &str,
    extra: &[(&str, &str)],
    format: ResponseFormat,
) -> Result<Response> {
    let url = info_url(api);
    let mut params: Vec<(&str, &str)> = vec![("chain_id", chain_id), ("request", request)];
    params.extend_from_slice(extra);
    debug!(url = %url, chain_id, request, "Sending info request");

    let resp = client.get(&url).query(&params).send().await?;
    read_body(resp, format).await
}
