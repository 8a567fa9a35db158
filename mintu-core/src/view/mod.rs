//! The mini app page as a view model.
//!
//! A [`MiniAppView`] owns the page state for one page view. [`MiniAppView::mount`]
//! starts its timers (progress poll, carousel, startup sequence, balance
//! refresh); [`MiniAppView::unmount`] stops them. Once unmounted, no timer
//! callback or late RPC answer can change the state again: every write goes
//! through [`ViewShared::update`], which checks the cancellation token while
//! holding the state lock, and `unmount` cancels under that same lock.

mod snapshot;
mod state;
mod tasks;

use std::{
    fmt,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

pub use snapshot::{
    AvatarSlot, BALANCE_PLACEHOLDER, CONNECT_HINT, ConnectAction, IMAGE_HINT,
    ImageSlot, MINT_DISABLED_LABEL, MintAffordance, Notification,
    NotificationKind, TransactionLink, ViewSnapshot, WalletPanel,
    avatar_initial,
};

use state::ViewState;
use tasks::Timers;

use crate::{
    carousel::Carousel,
    chain::ChainReader,
    claim::{
        ClaimAvailability, ClaimError, ClaimRequest, ClaimWidget,
        TransactionConfirmation,
    },
    config::MiniAppConfig,
    error::{Result, ViewError},
    host::{ComposeCast, HostError, SocialHost},
    manifest::build_image_manifest,
    progress::{MintProgress, resolve_mint_progress},
    wallet::{Balance, BalanceQuery, ConnectionState, Wallet},
};

/// State and collaborators shared between the view handle and its timers.
pub(crate) struct ViewShared {
    config: Arc<MiniAppConfig>,
    chain: Arc<dyn ChainReader>,
    host: Arc<dyn SocialHost>,
    wallet: Arc<dyn Wallet>,
    claim: ClaimAvailability,
    state: Mutex<ViewState>,
    cancel: CancellationToken,
}

impl ViewShared {
    /// Apply `f` to the state unless the view was torn down.
    fn update<R>(&self, f: impl FnOnce(&mut ViewState) -> R) -> Option<R> {
        let mut state = self.state.lock();
        if self.cancel.is_cancelled() {
            return None;
        }
        Some(f(&mut state))
    }

    async fn refresh_progress(&self) -> MintProgress {
        let progress = resolve_mint_progress(
            self.chain.as_ref(),
            self.config.chain.contract,
            self.config.fallback_total,
        )
        .await;

        if self.update(|state| state.progress = progress).is_some() {
            debug!(minted = progress.minted, total = progress.total, "mint progress updated");
        }
        progress
    }

    async fn refresh_balance(&self) {
        let connection = self.wallet.connection();
        let Some(address) = connection.address.filter(|_| connection.is_connected)
        else {
            self.update(|state| state.balance = None);
            return;
        };

        let query = BalanceQuery {
            chain_id: self.config.chain.chain_id,
            ..BalanceQuery::on_base(address)
        };
        match self.wallet.balance(&query).await {
            Ok(balance) => {
                self.update(|state| state.balance = Some(balance));
            }
            Err(err) => debug!(%address, error = %err, "balance refresh failed"),
        }
    }

    async fn auto_connect(&self) {
        let Some(connector) = self.wallet.connectors().into_iter().next() else {
            debug!("no connectors offered; skipping auto-connect");
            return;
        };

        match self.wallet.connect(&connector).await {
            Ok(connection) if connection.is_connected => {
                info!(connector = %connector.id, "auto-connect succeeded");
                self.refresh_balance().await;
            }
            Ok(_) => {
                debug!(connector = %connector.id, "auto-connect left wallet disconnected")
            }
            Err(err) => {
                debug!(connector = %connector.id, error = %err, "auto-connect failed")
            }
        }
    }

    fn share_cast(&self) -> ComposeCast {
        ComposeCast {
            text: self.config.share.text.clone(),
            embeds: self
                .config
                .share
                .site_url
                .iter()
                .map(|url| url.to_string())
                .collect(),
        }
    }
}

/// One page view: state, collaborators and the timers that drive them.
pub struct MiniAppView {
    shared: Arc<ViewShared>,
    timers: Mutex<Timers>,
    mounted: AtomicBool,
}

impl fmt::Debug for MiniAppView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MiniAppView")
            .field("mounted", &self.mounted.load(Ordering::Relaxed))
            .field("torn_down", &self.is_torn_down())
            .finish_non_exhaustive()
    }
}

impl MiniAppView {
    pub fn new(
        config: Arc<MiniAppConfig>,
        chain: Arc<dyn ChainReader>,
        host: Arc<dyn SocialHost>,
        wallet: Arc<dyn Wallet>,
    ) -> Self {
        let carousel = Carousel::new(build_image_manifest(&config.images));
        let state =
            ViewState::new(MintProgress::initial(config.fallback_total), carousel);
        let claim = ClaimAvailability::from_config(&config.claim);

        Self {
            shared: Arc::new(ViewShared {
                config,
                chain,
                host,
                wallet,
                claim,
                state: Mutex::new(state),
                cancel: CancellationToken::new(),
            }),
            timers: Mutex::new(Timers::default()),
            mounted: AtomicBool::new(false),
        }
    }

    pub fn config(&self) -> &MiniAppConfig {
        &self.shared.config
    }

    pub fn claim_availability(&self) -> &ClaimAvailability {
        &self.shared.claim
    }

    /// Start the view's timers. Must run inside a Tokio runtime.
    pub fn mount(&self) -> Result<()> {
        self.ensure_live()?;
        if self.mounted.swap(true, Ordering::SeqCst) {
            return Err(ViewError::AlreadyMounted);
        }

        let has_images = !self.shared.state.lock().carousel.is_empty();
        let shared = &self.shared;
        let mut timers = self.timers.lock();
        timers.spawn("progress poll", tasks::poll_progress(Arc::clone(shared)));
        timers.spawn("startup", tasks::run_startup(Arc::clone(shared)));
        timers.spawn("balance refresh", tasks::refresh_balance(Arc::clone(shared)));
        if has_images {
            timers.spawn("carousel", tasks::advance_carousel(Arc::clone(shared)));
        } else {
            debug!("manifest is empty; carousel timer not started");
        }

        info!(timers = timers.len(), "view mounted");
        Ok(())
    }

    /// Stop every timer. After this returns the state is frozen. Idempotent.
    pub fn unmount(&self) {
        let was_live = {
            let _state = self.shared.state.lock();
            let was_live = !self.shared.cancel.is_cancelled();
            self.shared.cancel.cancel();
            was_live
        };

        let stopped = self.timers.lock().abort_all();
        if was_live {
            info!(timers = stopped, "view unmounted");
        }
    }

    pub fn is_torn_down(&self) -> bool {
        self.shared.cancel.is_cancelled()
    }

    /// Number of timers that are still running.
    pub fn active_timers(&self) -> usize {
        let mut timers = self.timers.lock();
        timers.reap();
        timers.len()
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        let connection = self.shared.wallet.connection();
        let connectors = if connection.is_connected {
            Vec::new()
        } else {
            self.shared.wallet.connectors()
        };

        let state = self.shared.state.lock();
        ViewSnapshot::build(
            &self.shared.config,
            &self.shared.claim,
            &state,
            connection,
            connectors,
        )
    }

    /// Poll the contract now, outside the timer.
    pub async fn refresh_progress(&self) -> Result<MintProgress> {
        self.ensure_live()?;
        Ok(self.shared.refresh_progress().await)
    }

    /// Re-read the wallet balance now, e.g. right after a connect.
    pub async fn refresh_balance(&self) -> Result<()> {
        self.ensure_live()?;
        self.shared.refresh_balance().await;
        Ok(())
    }

    /// An image failed to load; drop it from the rotation.
    pub fn report_image_error(&self, url: &str) -> Result<bool> {
        let excluded = self
            .shared
            .update(|state| state.carousel.exclude(url))
            .ok_or(ViewError::TornDown)?;
        if excluded {
            debug!(url, "image excluded from carousel");
        }
        Ok(excluded)
    }

    pub async fn connect(&self, connector_id: &str) -> Result<ConnectionState> {
        self.ensure_live()?;
        let connector = self
            .shared
            .wallet
            .connectors()
            .into_iter()
            .find(|connector| connector.id == connector_id)
            .ok_or_else(|| ViewError::UnknownConnector(connector_id.to_string()))?;

        let connection = self.shared.wallet.connect(&connector).await?;
        if connection.is_connected {
            self.shared.refresh_balance().await;
        }
        Ok(connection)
    }

    pub async fn share(&self) -> Result<()> {
        self.ensure_live()?;
        self.shared
            .host
            .compose_cast(self.shared.share_cast())
            .await
            .map_err(ViewError::from)
    }

    /// Run the claim widget for one token and record its outcome.
    pub async fn mint(
        &self,
        widget: &dyn ClaimWidget,
    ) -> Result<TransactionConfirmation> {
        self.ensure_live()?;
        if !self.shared.wallet.connection().is_connected {
            return Err(ViewError::NotConnected);
        }
        if let ClaimAvailability::Disabled { diagnostic } = &self.shared.claim {
            self.shared.update(|state| {
                state.notification = Some(Notification::configuration(diagnostic.clone()))
            });
            return Err(ClaimError::Disabled(diagnostic.clone()).into());
        }

        let request = ClaimRequest::single(&self.shared.config.chain);
        let outcome = widget.claim(&request).await;
        self.record_claim_outcome(outcome.clone()).await?;
        outcome.map_err(ViewError::from)
    }

    /// Apply a claim result reported by the widget. A confirmation is kept for
    /// the explorer link and shared when a site URL is configured; an error
    /// becomes a notification and the view stays usable.
    pub async fn record_claim_outcome(
        &self,
        outcome: std::result::Result<TransactionConfirmation, ClaimError>,
    ) -> Result<()> {
        match outcome {
            Ok(confirmation) => {
                self.shared
                    .update(|state| state.transaction = Some(confirmation))
                    .ok_or(ViewError::TornDown)?;
                info!(tx = %confirmation.transaction_hash, "mint confirmed");

                if self.shared.config.share.site_url.is_some()
                    && let Err(err) = self.share_after_mint().await
                {
                    warn!(error = %err, "post-mint share failed");
                }
            }
            Err(err) => {
                warn!(error = %err, "mint transaction failed");
                let message = match &err {
                    ClaimError::Transaction(message) => message.clone(),
                    other => other.to_string(),
                };
                self.shared
                    .update(|state| {
                        state.notification =
                            Some(Notification::transaction_failed(message))
                    })
                    .ok_or(ViewError::TornDown)?;
            }
        }
        Ok(())
    }

    pub fn dismiss_notification(&self) -> Result<Option<Notification>> {
        self.shared
            .update(|state| state.notification.take())
            .ok_or(ViewError::TornDown)
    }

    pub fn balance(&self) -> Option<Balance> {
        self.shared.state.lock().balance
    }

    async fn share_after_mint(&self) -> std::result::Result<(), HostError> {
        self.shared.host.compose_cast(self.shared.share_cast()).await
    }

    fn ensure_live(&self) -> Result<()> {
        if self.is_torn_down() {
            Err(ViewError::TornDown)
        } else {
            Ok(())
        }
    }
}

impl Drop for MiniAppView {
    fn drop(&mut self) {
        self.shared.cancel.cancel();
        self.timers.get_mut().abort_all();
    }
}
