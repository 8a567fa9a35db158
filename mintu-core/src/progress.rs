//! Mint progress resolution with ordered fallbacks.

use std::num::NonZeroU64;

use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    chain::{ChainReader, ViewFunction},
    constants::MAX_DISPLAY_SAFE,
};

/// Tried in order; the first non-zero answer is the minted count.
pub const MINTED_SOURCES: [ViewFunction; 3] = [
    ViewFunction::TotalMinted,
    ViewFunction::TotalSupply,
    ViewFunction::NextTokenIdToClaim,
];

/// Tried in order; the first non-zero answer is the collection size.
pub const TOTAL_SOURCES: [ViewFunction; 2] =
    [ViewFunction::MaxTotalSupply, ViewFunction::MaxSupply];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintProgress {
    pub minted: u64,
    pub total: u64,
}

impl MintProgress {
    /// Value shown before the first poll lands.
    pub fn initial(fallback_total: NonZeroU64) -> Self {
        Self {
            minted: 0,
            total: fallback_total.get(),
        }
    }

    pub fn label(&self) -> String {
        format!("{}/{} minted", self.minted, self.total)
    }
}

/// Compute `{minted, total}` from the contract. Never fails: every read error
/// counts as an absent answer.
pub async fn resolve_mint_progress(
    reader: &dyn ChainReader,
    contract: Address,
    fallback_total: NonZeroU64,
) -> MintProgress {
    let minted = first_non_zero(reader, contract, &MINTED_SOURCES)
        .await
        .unwrap_or(0);
    let total = first_non_zero(reader, contract, &TOTAL_SOURCES)
        .await
        .unwrap_or(fallback_total.get());

    MintProgress { minted, total }
}

async fn first_non_zero(
    reader: &dyn ChainReader,
    contract: Address,
    sources: &[ViewFunction],
) -> Option<u64> {
    for &function in sources {
        match reader.read_uint(contract, function).await {
            Ok(value) if value.is_zero() => {
                debug!(%function, "view function returned zero");
            }
            Ok(value) => return Some(narrow_for_display(function, value)),
            Err(err) => {
                debug!(%function, error = %err, "view function unavailable");
            }
        }
    }
    None
}

/// Saturate at 2^53 - 1 so the value survives a round trip through a double.
pub fn narrow_for_display(function: ViewFunction, value: U256) -> u64 {
    if value > U256::from(MAX_DISPLAY_SAFE) {
        warn!(
            %function,
            %value,
            "on-chain value exceeds display range; clamping"
        );
        return MAX_DISPLAY_SAFE;
    }
    value.to::<u64>()
}
