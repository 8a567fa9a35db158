use thiserror::Error;

use crate::{claim::ClaimError, host::HostError, wallet::WalletError};

/// Errors surfaced by view operations. Background reads never produce one;
/// they are logged and absorbed where they happen.
#[derive(Error, Debug)]
pub enum ViewError {
    #[error("view is already mounted")]
    AlreadyMounted,

    #[error("view has been torn down")]
    TornDown,

    #[error("wallet is not connected")]
    NotConnected,

    #[error("no connector with id '{0}'")]
    UnknownConnector(String),

    #[error(transparent)]
    Wallet(#[from] WalletError),

    #[error(transparent)]
    Host(#[from] HostError),

    #[error(transparent)]
    Claim(#[from] ClaimError),
}

pub type Result<T> = std::result::Result<T, ViewError>;
