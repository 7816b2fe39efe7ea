//! Defaults shared by the library and the demo binaries.

// =============================================================================
// local-interchain API
// =============================================================================

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8080";
pub const DEFAULT_CHAIN_ID: &str = "localjuno-1";
/// Key created by local-interchain for every chain.
pub const DEFAULT_KEY_NAME: &str = "acc0";

// =============================================================================
// Start-up polling
// =============================================================================

/// Seconds between reachability probes
pub const POLL_INTERVAL_SECS: u64 = 5;
/// Probes before the poller gives up
pub const DEFAULT_POLL_LIMIT: u32 = 10;

// =============================================================================
// Transaction lookup
// =============================================================================

pub const DEFAULT_TX_LOOKUP_ATTEMPTS: u32 = 5;
pub const DEFAULT_TX_LOOKUP_DELAY_SECS: u64 = 1;

/// Lookups of a broadcast transaction before the signer stops waiting
/// (about a minute in total).
pub const DEFAULT_INCLUSION_ATTEMPTS: u32 = 21;
pub const DEFAULT_INCLUSION_DELAY_SECS: u64 = 3;

// =============================================================================
// Signing demo
// =============================================================================

/// cosmos1hj5fveer5cjtn4wd6wstzugjfdxzl0xpxvjjvr
pub const DEFAULT_MNEMONIC: &str = "decorate bright ozone fork gallery riot bus exhaust worth way bone indoor calm squirrel merry zero scheme cotton until shop any excess stage laundry";
pub const DEFAULT_RPC_URL: &str = "http://127.0.0.1:26657";
pub const DEFAULT_WALLET_PREFIX: &str = "cosmos";
pub const DEFAULT_DENOM: &str = "uatom";
pub const DEFAULT_GAS_PRICE: &str = "0.025uatom";
pub const DEFAULT_GAS_LIMIT: u64 = 250_000;
pub const DEFAULT_MEMO: &str = "my testing memo";
pub const DEFAULT_SEND_AMOUNT: u128 = 1;
pub const DEFAULT_HD_PATH: &str = "m/44'/118'/0'/0/0";
