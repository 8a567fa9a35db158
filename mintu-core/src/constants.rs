//! Defaults and fixed protocol values shared across the crate.

use std::time::Duration;

/// Base mainnet.
pub const BASE_CHAIN_ID: u64 = 8453;

pub const DEFAULT_RPC_URL: &str = "https://mainnet.base.org";
pub const DEFAULT_CONTRACT_ADDRESS: &str =
    "0xb18d766e6316a93B47338F1661a0b9566C16f979";
pub const DEFAULT_IPFS_GATEWAY: &str = "https://ipfs.io";
pub const DEFAULT_IMG_COUNT: u32 = 8;
pub const DEFAULT_TOTAL_SUPPLY: u64 = 100;
pub const DEFAULT_SHARE_TEXT: &str =
    "I just minted an NFT on Base (0.001 ETH) #MintU";

pub const EXPLORER_TX_BASE: &str = "https://basescan.org/tx";

/// Largest integer a double can carry without losing precision (2^53 - 1).
pub const MAX_DISPLAY_SAFE: u64 = (1 << 53) - 1;

pub const PROGRESS_POLL_INTERVAL: Duration = Duration::from_secs(20);
pub const CAROUSEL_ADVANCE_INTERVAL: Duration = Duration::from_millis(2500);
pub const BALANCE_REFETCH_INTERVAL: Duration = Duration::from_secs(15);
pub const RPC_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Upper bound on synthesized images per directory.
pub const MAX_IMG_COUNT: u32 = 1000;
