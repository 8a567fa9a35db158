use alloy_primitives::{Address, TxHash};
use serde::Serialize;

use super::state::ViewState;
use crate::{
    claim::{ClaimAvailability, ClaimRequest},
    config::MiniAppConfig,
    progress::MintProgress,
    wallet::{ConnectionState, Connector},
};

pub const IMAGE_HINT: &str = "Images failed to load or are not configured. Set IMG_LIST (comma-separated image URLs), or IMG_CID + IMG_COUNT.";
pub const CONNECT_HINT: &str =
    "Connect a wallet first (open this page inside a Farcaster client).";
pub const MINT_DISABLED_LABEL: &str = "Configure to mint";
pub const BALANCE_PLACEHOLDER: &str = "--";

/// Everything the page needs to render, at one instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewSnapshot {
    pub progress: MintProgress,
    pub progress_label: String,
    pub image: ImageSlot,
    pub avatar: AvatarSlot,
    pub wallet: WalletPanel,
    pub transaction: Option<TransactionLink>,
    pub notification: Option<Notification>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ImageSlot {
    Image { url: String, index: usize, count: usize },
    Placeholder { hint: &'static str },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AvatarSlot {
    Image { url: String },
    Initial { letter: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum WalletPanel {
    Disconnected {
        connectors: Vec<ConnectAction>,
        hint: &'static str,
    },
    Connected {
        address: Option<Address>,
        balance: String,
        mint: MintAffordance,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectAction {
    pub id: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum MintAffordance {
    Ready {
        #[serde(rename = "clientId")]
        client_id: String,
        request: ClaimRequest,
    },
    Disabled {
        label: &'static str,
        diagnostic: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionLink {
    pub hash: TxHash,
    pub explorer_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    TransactionFailed,
    Configuration,
}

/// Blocking message shown until dismissed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    pub fn transaction_failed(message: impl AsRef<str>) -> Self {
        Self {
            kind: NotificationKind::TransactionFailed,
            message: format!("Transaction failed: {}", message.as_ref()),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Configuration,
            message: message.into(),
        }
    }
}

impl ViewSnapshot {
    pub(super) fn build(
        config: &MiniAppConfig,
        claim: &ClaimAvailability,
        state: &ViewState,
        connection: ConnectionState,
        connectors: Vec<Connector>,
    ) -> Self {
        let image = match state.carousel.current() {
            Some(url) => ImageSlot::Image {
                url: url.to_string(),
                index: state.carousel.index(),
                count: state.carousel.visible().len(),
            },
            None => ImageSlot::Placeholder { hint: IMAGE_HINT },
        };

        let avatar = match &state.avatar {
            Some(url) => AvatarSlot::Image { url: url.clone() },
            None => AvatarSlot::Initial {
                letter: avatar_initial(connection.address),
            },
        };

        let wallet = if connection.is_connected {
            let mint = match claim {
                ClaimAvailability::Ready { client_id } => MintAffordance::Ready {
                    client_id: client_id.clone(),
                    request: ClaimRequest::single(&config.chain),
                },
                ClaimAvailability::Disabled { diagnostic } => {
                    MintAffordance::Disabled {
                        label: MINT_DISABLED_LABEL,
                        diagnostic: diagnostic.clone(),
                    }
                }
            };
            WalletPanel::Connected {
                address: connection.address,
                balance: state
                    .balance
                    .map(|balance| balance.display())
                    .unwrap_or_else(|| BALANCE_PLACEHOLDER.to_string()),
                mint,
            }
        } else {
            WalletPanel::Disconnected {
                connectors: connectors
                    .into_iter()
                    .map(|connector| ConnectAction {
                        label: format!("Connect {}", connector.name),
                        id: connector.id,
                    })
                    .collect(),
                hint: CONNECT_HINT,
            }
        };

        Self {
            progress: state.progress,
            progress_label: state.progress.label(),
            image,
            avatar,
            wallet,
            transaction: state.transaction.map(|tx| TransactionLink {
                hash: tx.transaction_hash,
                explorer_url: tx.explorer_url(),
            }),
            notification: state.notification.clone(),
        }
    }
}

/// Third character of the checksummed address (first after `0x`),
/// upper-cased; `U` without an address.
pub fn avatar_initial(address: Option<Address>) -> String {
    address
        .and_then(|address| address.to_string().chars().nth(2))
        .map(|c| c.to_ascii_uppercase().to_string())
        .unwrap_or_else(|| "U".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    #[test]
    fn initial_uses_first_hex_digit() {
        let addr = address!("0xb18d766e6316a93B47338F1661a0b9566C16f979");
        assert_eq!(avatar_initial(Some(addr)), "B");
        assert_eq!(avatar_initial(None), "U");
    }

    #[test]
    fn transaction_failure_message_is_prefixed() {
        let n = Notification::transaction_failed("user rejected");
        assert_eq!(n.kind, NotificationKind::TransactionFailed);
        assert_eq!(n.message, "Transaction failed: user rejected");
    }
}
