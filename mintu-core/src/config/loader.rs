use std::{num::NonZeroU64, path::PathBuf, str::FromStr};

use alloy_primitives::Address;
use thiserror::Error;
use url::Url;

use super::{
    models::{
        AvatarConfig, ChainConfig, ClaimConfig, ConfigMetadata, ImageConfig,
        MiniAppConfig, ShareConfig,
    },
    sources::EnvConfig,
    validation::ConfigWarnings,
};
use crate::{
    constants::{
        BASE_CHAIN_ID, DEFAULT_CONTRACT_ADDRESS, DEFAULT_IMG_COUNT,
        DEFAULT_IPFS_GATEWAY, DEFAULT_RPC_URL, DEFAULT_SHARE_TEXT,
        DEFAULT_TOTAL_SUPPLY, MAX_DISPLAY_SAFE, MAX_IMG_COUNT,
    },
    wallet::AutoConnectStrategy,
};

#[derive(Debug, Default, Clone)]
pub struct ConfigLoaderOptions {
    pub env_file: Option<PathBuf>,
}

#[derive(Debug, Default)]
pub struct ConfigLoader {
    options: ConfigLoaderOptions,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ConfigLoaderOptions) -> Self {
        Self { options }
    }

    pub fn with_env_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.env_file = Some(path.into());
        self
    }

    /// Load `.env` (if present), snapshot the environment and compose.
    pub fn load(&self) -> Result<ConfigLoad, ConfigLoadError> {
        let env_file_loaded = match &self.options.env_file {
            Some(path) => dotenvy::from_path(path).map(|_| true).or_else(
                |err| match err {
                    dotenvy::Error::Io(_) => Ok(false),
                    _ => Err(err),
                },
            )?,
            None => {
                dotenvy::dotenv().map(|_| true).or_else(|err| match err {
                    dotenvy::Error::Io(_) => Ok(false),
                    _ => Err(err),
                })?
            }
        };

        let mut load = self.compose(EnvConfig::gather())?;
        load.config.metadata = ConfigMetadata {
            env_file: self.options.env_file.clone(),
            env_file_loaded,
        };
        Ok(load)
    }

    /// Turn raw values into a typed config. Pure; does not touch the process
    /// environment.
    pub fn compose(&self, env: EnvConfig) -> Result<ConfigLoad, ConfigLoadError> {
        let mut warnings = ConfigWarnings::default();

        let chain = ChainConfig {
            rpc_url: parse_url(
                "BASE_RPC_URL",
                env.base_rpc_url.as_deref().unwrap_or(DEFAULT_RPC_URL),
            )?,
            chain_id: BASE_CHAIN_ID,
            contract: parse_address(
                "CONTRACT_ADDRESS",
                env.contract_address
                    .as_deref()
                    .unwrap_or(DEFAULT_CONTRACT_ADDRESS),
            )?,
        };

        let gateway = strip_trailing_slashes(
            env.ipfs_gateway.as_deref().unwrap_or(DEFAULT_IPFS_GATEWAY),
        );

        let count = match env.img_count.as_deref() {
            None => DEFAULT_IMG_COUNT,
            Some(raw) => match raw.parse::<u32>() {
                Ok(count) if count > MAX_IMG_COUNT => {
                    warnings.push(format!(
                        "IMG_COUNT={count} exceeds {MAX_IMG_COUNT}; clamping"
                    ));
                    MAX_IMG_COUNT
                }
                Ok(count) => count,
                Err(_) => {
                    warnings.push_with_hint(
                        format!("IMG_COUNT '{raw}' is not a valid count; using {DEFAULT_IMG_COUNT}"),
                        "Set IMG_COUNT to a non-negative integer",
                    );
                    DEFAULT_IMG_COUNT
                }
            },
        };

        let images = ImageConfig {
            gateway: gateway.clone(),
            cid: env.img_cid.clone(),
            count,
            list: env.img_list.clone().unwrap_or_default(),
        };

        if images.list.is_empty() && images.cid.is_none() {
            warnings.push_with_hint(
                "No image source configured; the carousel will show a configuration hint",
                "Set IMG_LIST (comma-separated URLs) or IMG_CID + IMG_COUNT",
            );
        }

        let avatar = AvatarConfig {
            override_url: env.pfp_url.clone(),
            gateway: env
                .pfp_gateway
                .as_deref()
                .map(strip_trailing_slashes)
                .unwrap_or_else(|| gateway.clone()),
        };

        let claim = ClaimConfig {
            client_id: env.thirdweb_client_id.clone(),
        };
        if claim.client_id.is_none() {
            warnings.push_with_hint(
                "THIRDWEB_CLIENT_ID is not set; minting is disabled",
                "Add THIRDWEB_CLIENT_ID to the environment and restart",
            );
        }

        let site_url = match env.site_url.as_deref() {
            None => None,
            Some(raw) => match Url::parse(raw) {
                Ok(url) => Some(url),
                Err(err) => {
                    warnings.push(format!(
                        "SITE_URL '{raw}' is not a valid URL ({err}); share embeds and embed metadata are disabled"
                    ));
                    None
                }
            },
        };
        if env.site_url.is_none() {
            warnings.push(
                "SITE_URL is not set; casts are shared without an embed",
            );
        }

        let share = ShareConfig {
            site_url,
            text: env
                .share_text
                .clone()
                .unwrap_or_else(|| DEFAULT_SHARE_TEXT.to_string()),
        };

        let auto_connect = match env.auto_connect.as_deref() {
            None => AutoConnectStrategy::default(),
            Some(raw) => AutoConnectStrategy::from_str(raw).map_err(|_| {
                ConfigLoadError::InvalidAutoConnect {
                    value: raw.to_string(),
                }
            })?,
        };

        let fallback_total =
            resolve_fallback_total(env.total_supply.as_deref(), &mut warnings);

        let config = MiniAppConfig {
            chain,
            images,
            avatar,
            claim,
            share,
            auto_connect,
            fallback_total,
            metadata: ConfigMetadata::default(),
        };

        Ok(ConfigLoad { config, warnings })
    }
}

fn resolve_fallback_total(
    raw: Option<&str>,
    warnings: &mut ConfigWarnings,
) -> NonZeroU64 {
    let default = NonZeroU64::new(DEFAULT_TOTAL_SUPPLY).unwrap_or(NonZeroU64::MIN);
    let Some(raw) = raw else {
        return default;
    };

    let Ok(value) = raw.parse::<i128>() else {
        warnings.push_with_hint(
            format!("TOTAL_SUPPLY '{raw}' is not an integer; using {DEFAULT_TOTAL_SUPPLY}"),
            "Set TOTAL_SUPPLY to the collection size",
        );
        return default;
    };

    let clamped = value.clamp(1, MAX_DISPLAY_SAFE as i128);
    if clamped != value {
        warnings.push(format!(
            "TOTAL_SUPPLY={value} is out of range; clamped to {clamped}"
        ));
    }
    NonZeroU64::new(clamped as u64).unwrap_or(NonZeroU64::MIN)
}

fn strip_trailing_slashes(raw: &str) -> String {
    raw.trim_end_matches('/').to_string()
}

fn parse_url(name: &'static str, raw: &str) -> Result<Url, ConfigLoadError> {
    Url::parse(raw).map_err(|source| ConfigLoadError::InvalidUrl {
        name,
        value: raw.to_string(),
        source,
    })
}

fn parse_address(
    name: &'static str,
    raw: &str,
) -> Result<Address, ConfigLoadError> {
    Address::from_str(raw).map_err(|_| ConfigLoadError::InvalidAddress {
        name,
        value: raw.to_string(),
    })
}

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("invalid URL in {name}: '{value}'")]
    InvalidUrl {
        name: &'static str,
        value: String,
        #[source]
        source: url::ParseError,
    },
    #[error("invalid address in {name}: '{value}'")]
    InvalidAddress { name: &'static str, value: String },
    #[error("invalid AUTO_CONNECT '{value}' (expected off, sniff or always)")]
    InvalidAutoConnect { value: String },
    #[error(transparent)]
    EnvFile(#[from] dotenvy::Error),
}

#[derive(Debug)]
pub struct ConfigLoad {
    pub config: MiniAppConfig,
    pub warnings: ConfigWarnings,
}
