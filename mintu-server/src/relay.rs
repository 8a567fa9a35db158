//! Collaborators backed by the page's script.
//!
//! The browser owns the real host SDK and wallet. It reports what it sees
//! (host context, wallet connection) and drains what the view asked for
//! (compose intents, connect requests) through the session endpoints.

use std::{
    fmt,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use async_trait::async_trait;
use mintu_core::{
    chain::ChainReader,
    host::{ComposeCast, HostContext, HostError, SocialHost},
    wallet::{
        Balance, BalanceQuery, ConnectionState, Connector, Wallet, WalletError,
    },
};
use parking_lot::Mutex;
use serde::Serialize;
use tracing::debug;

pub const COMPOSE_INTENT_BASE: &str = "https://warpcast.com/~/compose";

/// A queued "compose cast" request, with a ready-to-open intent URL for
/// clients without the SDK action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComposeIntent {
    pub text: String,
    pub embeds: Vec<String>,
    pub intent_url: String,
}

impl From<ComposeCast> for ComposeIntent {
    fn from(cast: ComposeCast) -> Self {
        let mut intent_url = format!(
            "{COMPOSE_INTENT_BASE}?text={}",
            urlencoding::encode(&cast.text)
        );
        for embed in &cast.embeds {
            intent_url.push_str("&embeds[]=");
            intent_url.push_str(&urlencoding::encode(embed));
        }

        Self {
            text: cast.text,
            embeds: cast.embeds,
            intent_url,
        }
    }
}

#[derive(Debug, Default)]
pub struct RelayHost {
    context: Option<HostContext>,
    ready: AtomicBool,
    outbox: Mutex<Vec<ComposeIntent>>,
}

impl RelayHost {
    pub fn new(context: Option<HostContext>) -> Self {
        Self {
            context,
            ..Self::default()
        }
    }

    /// Whether the view has signalled ready; the script forwards it once.
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    pub fn drain_casts(&self) -> Vec<ComposeIntent> {
        std::mem::take(&mut *self.outbox.lock())
    }
}

#[async_trait]
impl SocialHost for RelayHost {
    async fn ready(&self) -> Result<(), HostError> {
        self.ready.store(true, Ordering::Release);
        Ok(())
    }

    async fn context(&self) -> Result<HostContext, HostError> {
        self.context.clone().ok_or_else(|| {
            HostError::Unavailable("client did not report a host context".into())
        })
    }

    async fn compose_cast(&self, cast: ComposeCast) -> Result<(), HostError> {
        let intent = ComposeIntent::from(cast);
        debug!(url = %intent.intent_url, "compose intent queued");
        self.outbox.lock().push(intent);
        Ok(())
    }
}

/// The mini app connector every Farcaster client offers.
pub fn default_connectors() -> Vec<Connector> {
    vec![Connector {
        id: "farcasterMiniApp".into(),
        name: "Farcaster".into(),
    }]
}

pub struct RelayWallet {
    chain: Arc<dyn ChainReader>,
    connectors: Vec<Connector>,
    connection: Mutex<ConnectionState>,
    pending_connect: Mutex<Option<Connector>>,
}

impl fmt::Debug for RelayWallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelayWallet")
            .field("connectors", &self.connectors)
            .field("connection", &*self.connection.lock())
            .finish_non_exhaustive()
    }
}

impl RelayWallet {
    /// An empty connector list falls back to [`default_connectors`].
    pub fn new(
        chain: Arc<dyn ChainReader>,
        connectors: Vec<Connector>,
        connection: ConnectionState,
    ) -> Self {
        let connectors = if connectors.is_empty() {
            default_connectors()
        } else {
            connectors
        };
        Self {
            chain,
            connectors,
            connection: Mutex::new(connection),
            pending_connect: Mutex::new(None),
        }
    }

    /// Record the connection the script observed. A connected report settles
    /// any pending connect request.
    pub fn report(&self, connection: ConnectionState) {
        *self.connection.lock() = connection;
        if connection.is_connected {
            self.pending_connect.lock().take();
        }
    }

    pub fn take_pending_connect(&self) -> Option<Connector> {
        self.pending_connect.lock().take()
    }
}

#[async_trait]
impl Wallet for RelayWallet {
    fn connection(&self) -> ConnectionState {
        *self.connection.lock()
    }

    fn connectors(&self) -> Vec<Connector> {
        self.connectors.clone()
    }

    /// Queues the request for the script; the connection itself arrives
    /// later through [`RelayWallet::report`].
    async fn connect(
        &self,
        connector: &Connector,
    ) -> Result<ConnectionState, WalletError> {
        if !self.connectors.contains(connector) {
            return Err(WalletError::UnknownConnector(connector.id.clone()));
        }
        debug!(connector = %connector.id, "connect request queued");
        *self.pending_connect.lock() = Some(connector.clone());
        Ok(self.connection())
    }

    async fn balance(&self, query: &BalanceQuery) -> Result<Balance, WalletError> {
        self.chain
            .native_balance(query.address)
            .await
            .map(Balance::eth)
            .map_err(|err| WalletError::Balance(err.to_string()))
    }
}
