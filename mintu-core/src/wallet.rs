//! Wallet connection interface.
//!
//! Connection state is owned by the wallet collaborator; the view only reads
//! it and asks for connects.

use std::{fmt, str::FromStr, time::Duration};

use alloy_primitives::{Address, U256, utils::format_ether};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{BALANCE_REFETCH_INTERVAL, BASE_CHAIN_ID};

#[derive(Debug, Error)]
pub enum WalletError {
    #[error("connector '{0}' is not available")]
    UnknownConnector(String),

    #[error("connection rejected: {0}")]
    Rejected(String),

    #[error("balance lookup failed: {0}")]
    Balance(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionState {
    pub is_connected: bool,
    pub address: Option<Address>,
}

impl ConnectionState {
    pub fn connected(address: Address) -> Self {
        Self {
            is_connected: true,
            address: Some(address),
        }
    }

    pub fn disconnected() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connector {
    pub id: String,
    pub name: String,
}

/// Balance lookup parameters. Balances refresh on a timer and never on
/// window focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalanceQuery {
    pub address: Address,
    pub chain_id: u64,
    pub refetch_interval: Duration,
    pub refetch_on_window_focus: bool,
}

impl BalanceQuery {
    pub fn on_base(address: Address) -> Self {
        Self {
            address,
            chain_id: BASE_CHAIN_ID,
            refetch_interval: BALANCE_REFETCH_INTERVAL,
            refetch_on_window_focus: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Balance {
    pub wei: U256,
    pub symbol: &'static str,
}

impl Balance {
    pub fn eth(wei: U256) -> Self {
        Self { wei, symbol: "ETH" }
    }

    /// Four decimal places, e.g. `0.0123 ETH`.
    pub fn display(&self) -> String {
        let ether = format_ether(self.wei);
        let rounded = ether
            .parse::<f64>()
            .map(|value| format!("{value:.4}"))
            .unwrap_or(ether);
        format!("{rounded} {}", self.symbol)
    }
}

#[async_trait]
pub trait Wallet: Send + Sync {
    fn connection(&self) -> ConnectionState;

    fn connectors(&self) -> Vec<Connector>;

    async fn connect(
        &self,
        connector: &Connector,
    ) -> Result<ConnectionState, WalletError>;

    async fn balance(&self, query: &BalanceQuery) -> Result<Balance, WalletError>;
}

/// When the view tries to reconnect on its own after mounting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutoConnectStrategy {
    /// Never; the user picks a connector.
    Off,
    /// Only when the host context resolved, i.e. we run inside a client.
    #[default]
    Sniff,
    /// Always try the first connector.
    Always,
}

impl AutoConnectStrategy {
    pub fn should_attempt(self, inside_host: bool) -> bool {
        match self {
            AutoConnectStrategy::Off => false,
            AutoConnectStrategy::Sniff => inside_host,
            AutoConnectStrategy::Always => true,
        }
    }
}

#[derive(Debug, Error)]
#[error("unknown auto-connect strategy '{0}'")]
pub struct ParseStrategyError(String);

impl FromStr for AutoConnectStrategy {
    type Err = ParseStrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "off" | "none" | "0" | "false" => Ok(AutoConnectStrategy::Off),
            "sniff" | "auto" => Ok(AutoConnectStrategy::Sniff),
            "always" | "1" | "true" => Ok(AutoConnectStrategy::Always),
            _ => Err(ParseStrategyError(s.to_string())),
        }
    }
}

impl fmt::Display for AutoConnectStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AutoConnectStrategy::Off => "off",
            AutoConnectStrategy::Sniff => "sniff",
            AutoConnectStrategy::Always => "always",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn balance_rounds_to_four_places() {
        let wei = U256::from(1_234_567_000_000_000u64);
        assert_eq!(Balance::eth(wei).display(), "0.0012 ETH");
        assert_eq!(Balance::eth(U256::ZERO).display(), "0.0000 ETH");
    }

    #[test]
    fn strategy_parsing() {
        assert_eq!("SNIFF".parse::<AutoConnectStrategy>().unwrap(), AutoConnectStrategy::Sniff);
        assert_eq!("off".parse::<AutoConnectStrategy>().unwrap(), AutoConnectStrategy::Off);
        assert!("maybe".parse::<AutoConnectStrategy>().is_err());
    }

    #[test]
    fn sniff_requires_host() {
        assert!(!AutoConnectStrategy::Sniff.should_attempt(false));
        assert!(AutoConnectStrategy::Sniff.should_attempt(true));
        assert!(AutoConnectStrategy::Always.should_attempt(false));
        assert!(!AutoConnectStrategy::Off.should_attempt(true));
    }

    #[test]
    fn base_query_never_refetches_on_focus() {
        let query = BalanceQuery::on_base(Address::ZERO);
        assert_eq!(query.chain_id, 8453);
        assert_eq!(query.refetch_interval, Duration::from_secs(15));
        assert!(!query.refetch_on_window_focus);
    }
}
