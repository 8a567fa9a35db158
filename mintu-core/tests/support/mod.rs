#![allow(dead_code)]

//! In-memory collaborators for driving a `MiniAppView` in tests.

use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use alloy_primitives::{Address, U256, address};
use async_trait::async_trait;
use mintu_core::{
    MiniAppView,
    chain::{ChainReadError, ChainReader, ViewFunction},
    claim::{ClaimError, ClaimRequest, ClaimWidget, TransactionConfirmation},
    config::{ConfigLoader, EnvConfig, MiniAppConfig},
    host::{ComposeCast, HostContext, HostError, SocialHost},
    wallet::{
        Balance, BalanceQuery, ConnectionState, Connector, Wallet, WalletError,
    },
};
use parking_lot::Mutex;
use tokio::sync::Semaphore;

pub const USER: Address = address!("0x5a0b54d5dc17e0aadc383d2db43b0a0d3e029c4c");

/// Build a config from `(name, value)` pairs as if they were the environment.
pub fn config_from(vars: &[(&str, &str)]) -> MiniAppConfig {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    let env = EnvConfig::from_lookup(|name| vars.get(name).cloned());
    ConfigLoader::new()
        .compose(env)
        .expect("test config composes")
        .config
}

/// Let spawned timers run without moving the paused clock noticeably.
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(1)).await;
}

#[derive(Default)]
pub struct FakeChain {
    values: Mutex<HashMap<ViewFunction, U256>>,
    calls: AtomicUsize,
    gate: Option<Arc<Semaphore>>,
    panics: bool,
}

impl FakeChain {
    pub fn with_values(values: &[(ViewFunction, u64)]) -> Self {
        let chain = Self::default();
        for &(function, value) in values {
            chain.set(function, value);
        }
        chain
    }

    /// Every read waits for a permit on `gate`.
    pub fn gated(mut self, gate: Arc<Semaphore>) -> Self {
        self.gate = Some(gate);
        self
    }

    /// Every read panics, as a buggy client would.
    pub fn panicking(mut self) -> Self {
        self.panics = true;
        self
    }

    pub fn set(&self, function: ViewFunction, value: u64) {
        self.values.lock().insert(function, U256::from(value));
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChainReader for FakeChain {
    async fn read_uint(
        &self,
        _contract: Address,
        function: ViewFunction,
    ) -> Result<U256, ChainReadError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.panics {
            panic!("chain client bug");
        }
        if let Some(gate) = &self.gate {
            gate.acquire().await.expect("gate open").forget();
        }
        self.values.lock().get(&function).copied().ok_or_else(|| {
            ChainReadError::Rpc {
                code: 3,
                message: "execution reverted".into(),
            }
        })
    }

    async fn native_balance(
        &self,
        _address: Address,
    ) -> Result<U256, ChainReadError> {
        Ok(U256::ZERO)
    }
}

#[derive(Default)]
pub struct FakeHost {
    pub fail_ready: bool,
    pub context: Option<HostContext>,
    pub ready_calls: AtomicUsize,
    pub casts: Mutex<Vec<ComposeCast>>,
}

impl FakeHost {
    pub fn inside_client(context: HostContext) -> Self {
        Self {
            context: Some(context),
            ..Self::default()
        }
    }

    pub fn casts(&self) -> Vec<ComposeCast> {
        self.casts.lock().clone()
    }
}

#[async_trait]
impl SocialHost for FakeHost {
    async fn ready(&self) -> Result<(), HostError> {
        self.ready_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_ready {
            return Err(HostError::Unavailable("not embedded".into()));
        }
        Ok(())
    }

    async fn context(&self) -> Result<HostContext, HostError> {
        self.context
            .clone()
            .ok_or_else(|| HostError::Unavailable("no host context".into()))
    }

    async fn compose_cast(&self, cast: ComposeCast) -> Result<(), HostError> {
        self.casts.lock().push(cast);
        Ok(())
    }
}

pub struct FakeWallet {
    pub connection: Mutex<ConnectionState>,
    pub connectors: Vec<Connector>,
    pub balance_wei: U256,
    pub connect_calls: Mutex<Vec<String>>,
    pub balance_calls: AtomicUsize,
}

impl FakeWallet {
    pub fn disconnected() -> Self {
        Self {
            connection: Mutex::new(ConnectionState::disconnected()),
            connectors: vec![Connector {
                id: "farcaster".into(),
                name: "Farcaster Wallet".into(),
            }],
            balance_wei: U256::from(12_300_000_000_000_000u64),
            connect_calls: Mutex::new(Vec::new()),
            balance_calls: AtomicUsize::new(0),
        }
    }

    pub fn connected() -> Self {
        let wallet = Self::disconnected();
        *wallet.connection.lock() = ConnectionState::connected(USER);
        wallet
    }

    pub fn connect_calls(&self) -> Vec<String> {
        self.connect_calls.lock().clone()
    }
}

#[async_trait]
impl Wallet for FakeWallet {
    fn connection(&self) -> ConnectionState {
        *self.connection.lock()
    }

    fn connectors(&self) -> Vec<Connector> {
        self.connectors.clone()
    }

    async fn connect(
        &self,
        connector: &Connector,
    ) -> Result<ConnectionState, WalletError> {
        self.connect_calls.lock().push(connector.id.clone());
        let state = ConnectionState::connected(USER);
        *self.connection.lock() = state;
        Ok(state)
    }

    async fn balance(&self, query: &BalanceQuery) -> Result<Balance, WalletError> {
        assert_eq!(query.address, USER);
        assert!(!query.refetch_on_window_focus);
        self.balance_calls.fetch_add(1, Ordering::SeqCst);
        Ok(Balance::eth(self.balance_wei))
    }
}

pub struct FakeClaim {
    pub outcome: Result<TransactionConfirmation, ClaimError>,
    pub requests: Mutex<Vec<ClaimRequest>>,
}

impl FakeClaim {
    pub fn returning(outcome: Result<TransactionConfirmation, ClaimError>) -> Self {
        Self {
            outcome,
            requests: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl ClaimWidget for FakeClaim {
    async fn claim(
        &self,
        request: &ClaimRequest,
    ) -> Result<TransactionConfirmation, ClaimError> {
        self.requests.lock().push(*request);
        self.outcome.clone()
    }
}

pub struct Harness {
    pub view: Arc<MiniAppView>,
    pub chain: Arc<FakeChain>,
    pub host: Arc<FakeHost>,
    pub wallet: Arc<FakeWallet>,
}

pub fn harness(
    config: MiniAppConfig,
    chain: FakeChain,
    host: FakeHost,
    wallet: FakeWallet,
) -> Harness {
    let chain = Arc::new(chain);
    let host = Arc::new(host);
    let wallet = Arc::new(wallet);
    let view = Arc::new(MiniAppView::new(
        Arc::new(config),
        chain.clone(),
        host.clone(),
        wallet.clone(),
    ));
    Harness {
        view,
        chain,
        host,
        wallet,
    }
}
