//! Hand-off to the external claim widget.

use alloy_primitives::{Address, TxHash};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    config::{ChainConfig, ClaimConfig},
    constants::EXPLORER_TX_BASE,
};

/// Every mint claims exactly one ERC721 token.
pub const CLAIM_QUANTITY: u64 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClaimParams {
    #[serde(rename = "ERC721")]
    Erc721 { quantity: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimRequest {
    pub chain_id: u64,
    pub contract: Address,
    pub params: ClaimParams,
}

impl ClaimRequest {
    pub fn single(chain: &ChainConfig) -> Self {
        Self {
            chain_id: chain.chain_id,
            contract: chain.contract,
            params: ClaimParams::Erc721 {
                quantity: CLAIM_QUANTITY,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionConfirmation {
    pub transaction_hash: TxHash,
}

impl TransactionConfirmation {
    pub fn explorer_url(&self) -> String {
        explorer_tx_url(&self.transaction_hash)
    }
}

pub fn explorer_tx_url(hash: &TxHash) -> String {
    format!("{EXPLORER_TX_BASE}/{hash}")
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClaimError {
    #[error("{0}")]
    Transaction(String),

    #[error("minting is disabled: {0}")]
    Disabled(String),
}

/// Whether the claim widget can be offered at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ClaimAvailability {
    Ready { client_id: String },
    Disabled { diagnostic: String },
}

impl ClaimAvailability {
    pub fn from_config(config: &ClaimConfig) -> Self {
        match config.client_id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => ClaimAvailability::Ready {
                client_id: id.to_string(),
            },
            _ => ClaimAvailability::Disabled {
                diagnostic: "Missing THIRDWEB_CLIENT_ID; add it to the environment and redeploy to enable minting".into(),
            },
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, ClaimAvailability::Ready { .. })
    }
}

/// The widget that builds and submits the mint transaction.
#[async_trait]
pub trait ClaimWidget: Send + Sync {
    async fn claim(
        &self,
        request: &ClaimRequest,
    ) -> Result<TransactionConfirmation, ClaimError>;
}
