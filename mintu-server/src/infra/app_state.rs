use std::{fmt, sync::Arc};

use chrono::{DateTime, Utc};
use mintu_core::{
    MiniAppView, chain::ChainReader, config::MiniAppConfig,
    wallet::ConnectionState,
};

use crate::{
    relay::{RelayHost, RelayWallet},
    sessions::{SessionLimits, SessionRegistry},
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<MiniAppConfig>,
    pub chain: Arc<dyn ChainReader>,
    pub sessions: Arc<SessionRegistry>,
    pub started_at: DateTime<Utc>,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("sessions", &self.sessions)
            .field("started_at", &self.started_at)
            .finish_non_exhaustive()
    }
}

impl AppState {
    pub fn new(
        config: Arc<MiniAppConfig>,
        chain: Arc<dyn ChainReader>,
        limits: SessionLimits,
    ) -> Self {
        let sessions = Arc::new(SessionRegistry::new(
            Arc::clone(&config),
            Arc::clone(&chain),
            limits,
        ));
        Self {
            config,
            chain,
            sessions,
            started_at: Utc::now(),
        }
    }

    pub fn config(&self) -> &MiniAppConfig {
        &self.config
    }

    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }

    /// An unmounted view for server-rendering the first paint. It never
    /// starts timers, so dropping it is free.
    pub fn preview_view(&self) -> MiniAppView {
        MiniAppView::new(
            Arc::clone(&self.config),
            Arc::clone(&self.chain),
            Arc::new(RelayHost::default()),
            Arc::new(RelayWallet::new(
                Arc::clone(&self.chain),
                Vec::new(),
                ConnectionState::disconnected(),
            )),
        )
    }
}
