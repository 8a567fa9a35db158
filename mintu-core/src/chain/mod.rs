//! Read-only access to the drop contract on Base.

pub mod rpc;

use std::fmt;

use alloy_primitives::{Address, U256, keccak256};
use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

pub use rpc::JsonRpcChainReader;

/// Zero-argument `uint256` view functions the progress resolver knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ViewFunction {
    TotalMinted,
    TotalSupply,
    NextTokenIdToClaim,
    MaxTotalSupply,
    MaxSupply,
}

impl ViewFunction {
    pub const fn name(self) -> &'static str {
        match self {
            ViewFunction::TotalMinted => "totalMinted",
            ViewFunction::TotalSupply => "totalSupply",
            ViewFunction::NextTokenIdToClaim => "nextTokenIdToClaim",
            ViewFunction::MaxTotalSupply => "maxTotalSupply",
            ViewFunction::MaxSupply => "maxSupply",
        }
    }

    pub fn signature(self) -> String {
        format!("{}()", self.name())
    }

    /// First four bytes of `keccak256(signature)`.
    pub fn selector(self) -> [u8; 4] {
        let hash = keccak256(self.signature().as_bytes());
        [hash[0], hash[1], hash[2], hash[3]]
    }
}

impl fmt::Display for ViewFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Error)]
pub enum ChainReadError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("rpc error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("{function} returned no data")]
    EmptyReturn { function: ViewFunction },

    #[error("malformed rpc response: {0}")]
    Malformed(String),
}

/// Read side of the chain, injected wherever on-chain values are needed.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChainReader: Send + Sync {
    /// Call a zero-argument view function returning `uint256`.
    async fn read_uint(
        &self,
        contract: Address,
        function: ViewFunction,
    ) -> Result<U256, ChainReadError>;

    /// Native balance in wei at the latest block.
    async fn native_balance(
        &self,
        address: Address,
    ) -> Result<U256, ChainReadError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selectors_match_known_abi_values() {
        assert_eq!(ViewFunction::TotalSupply.selector(), [0x18, 0x16, 0x0d, 0xdd]);
        assert_eq!(ViewFunction::MaxSupply.selector(), [0xd5, 0xab, 0xeb, 0x01]);
    }

    #[test]
    fn signature_has_no_arguments() {
        assert_eq!(
            ViewFunction::NextTokenIdToClaim.signature(),
            "nextTokenIdToClaim()"
        );
    }
}
