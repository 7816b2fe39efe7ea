//! Client for the local-interchain HTTP API: per-chain command requests,
//! file uploads, info requests and startup polling, plus a Cosmos signing
//! client used by the token send demo.

pub mod chain;
pub mod command;
pub mod config;
pub mod demo;
pub mod endpoint;
pub mod error;
pub mod poll;
pub mod request;
pub mod retry;
pub mod signing;
pub mod types;

pub use chain::Chain;
pub use command::{encode_command, Action};
pub use endpoint::Endpoint;
pub use error::{LocalIcError, Result};
pub use poll::{poll_for_start, PollOutcome};
pub use request::{make_info_request, make_request, store_file, Response, ResponseFormat};
