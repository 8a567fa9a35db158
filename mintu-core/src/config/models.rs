use std::{num::NonZeroU64, path::PathBuf};

use alloy_primitives::Address;
use url::Url;

use crate::wallet::AutoConnectStrategy;

/// Fully resolved mini app configuration.
///
/// Built once by [`ConfigLoader`](super::ConfigLoader) and shared behind an
/// `Arc`; nothing downstream reads the environment again.
#[derive(Debug, Clone)]
pub struct MiniAppConfig {
    pub chain: ChainConfig,
    pub images: ImageConfig,
    pub avatar: AvatarConfig,
    pub claim: ClaimConfig,
    pub share: ShareConfig,
    pub auto_connect: AutoConnectStrategy,
    /// Used when none of the supply view functions answer.
    pub fallback_total: NonZeroU64,
    pub metadata: ConfigMetadata,
}

#[derive(Debug, Clone)]
pub struct ChainConfig {
    pub rpc_url: Url,
    pub chain_id: u64,
    pub contract: Address,
}

/// Inputs to the image manifest builder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageConfig {
    /// Gateway base with trailing slashes stripped.
    pub gateway: String,
    pub cid: Option<String>,
    pub count: u32,
    /// Explicit URLs or directory prefixes; wins over `cid` when non-empty.
    pub list: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AvatarConfig {
    pub override_url: Option<String>,
    /// Gateway used to resolve `ipfs://` avatars, trailing slashes stripped.
    pub gateway: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClaimConfig {
    pub client_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareConfig {
    pub site_url: Option<Url>,
    pub text: String,
}

/// Where the configuration came from, for startup logging.
#[derive(Debug, Clone, Default)]
pub struct ConfigMetadata {
    pub env_file: Option<PathBuf>,
    pub env_file_loaded: bool,
}
