//! Action names understood by the local-interchain server and the
//! `key=value;key=value` command format some of them take.
//!
//! The command format has no escaping: a value containing `;` or `=` produces
//! a command the server will split incorrectly. Every caller goes through
//! [`encode_command`] so escaping can be introduced in one place.

use std::fmt;

/// Server-side operation selected by the `action` field of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Query,
    Bin,
    Exec,
    StopRelayer,
    StartRelayer,
    RelayerExec,
    GetChannels,
    Faucet,
    RecoverKey,
    AddFullNodes,
    KillAll,
}

impl Action {
    pub const ALL: [Action; 11] = [
        Action::Query,
        Action::Bin,
        Action::Exec,
        Action::StopRelayer,
        Action::StartRelayer,
        Action::RelayerExec,
        Action::GetChannels,
        Action::Faucet,
        Action::RecoverKey,
        Action::AddFullNodes,
        Action::KillAll,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Query => "query",
            Action::Bin => "bin",
            Action::Exec => "exec",
            Action::StopRelayer => "stop-relayer",
            Action::StartRelayer => "start-relayer",
            Action::RelayerExec => "relayer-exec",
            Action::GetChannels => "get_channels",
            Action::Faucet => "faucet",
            Action::RecoverKey => "recover-key",
            Action::AddFullNodes => "add-full-nodes",
            Action::KillAll => "kill-all",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for Action {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Join pairs as `k1=v1;k2=v2`. Values are written verbatim.
pub fn encode_command<K, V>(pairs: &[(K, V)]) -> String
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", k.as_ref(), v.as_ref()))
        .collect::<Vec<_>>()
        .join(";")
}

pub fn faucet_command(address: &str, amount: u64) -> String {
    encode_command(&[("amount", amount.to_string().as_str()), ("address", address)])
}

pub fn recover_key_command<S: AsRef<str>>(key_name: &str, mnemonic: &[S]) -> String {
    let words = mnemonic
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(" ");
    encode_command(&[("keyname", key_name), ("mnemonic", words.as_str())])
}

pub fn add_full_nodes_command(amount: u64) -> String {
    encode_command(&[("amount", amount.to_string())])
}
