//! One mounted `MiniAppView` per open page.

use std::{fmt, sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use mintu_core::{
    MiniAppView, ViewError,
    chain::ChainReader,
    config::MiniAppConfig,
    host::HostContext,
    wallet::{ConnectionState, Connector},
};
use parking_lot::Mutex;
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::relay::{RelayHost, RelayWallet};

/// What the page's script knows when it opens a session.
#[derive(Debug, Default, Clone)]
pub struct SessionSeed {
    pub context: Option<HostContext>,
    pub connection: ConnectionState,
    pub connectors: Vec<Connector>,
}

/// Caps on how many views the server keeps alive and for how long.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionLimits {
    pub idle_timeout: Duration,
    pub max_sessions: usize,
}

impl Default for SessionLimits {
    fn default() -> Self {
        Self {
            idle_timeout: Duration::from_secs(600),
            max_sessions: 1000,
        }
    }
}

#[derive(Debug, Error)]
pub enum OpenSessionError {
    #[error("session limit of {limit} reached")]
    Full { limit: usize },

    #[error(transparent)]
    View(#[from] ViewError),
}

pub struct Session {
    pub id: Uuid,
    pub view: MiniAppView,
    pub host: Arc<RelayHost>,
    pub wallet: Arc<RelayWallet>,
    pub created_at: DateTime<Utc>,
    last_seen: Mutex<DateTime<Utc>>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("created_at", &self.created_at)
            .field("last_seen", &self.last_seen())
            .finish_non_exhaustive()
    }
}

impl Session {
    pub fn last_seen(&self) -> DateTime<Utc> {
        *self.last_seen.lock()
    }

    fn touch(&self, now: DateTime<Utc>) {
        *self.last_seen.lock() = now;
    }

    fn is_idle(&self, now: DateTime<Utc>, timeout: Duration) -> bool {
        (now - self.last_seen())
            .to_std()
            .map(|idle| idle > timeout)
            .unwrap_or(false)
    }
}

pub struct SessionRegistry {
    sessions: DashMap<Uuid, Arc<Session>>,
    config: Arc<MiniAppConfig>,
    chain: Arc<dyn ChainReader>,
    limits: SessionLimits,
    admission: Mutex<()>,
}

impl fmt::Debug for SessionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionRegistry")
            .field("sessions", &self.sessions.len())
            .field("limits", &self.limits)
            .finish_non_exhaustive()
    }
}

impl SessionRegistry {
    pub fn new(
        config: Arc<MiniAppConfig>,
        chain: Arc<dyn ChainReader>,
        limits: SessionLimits,
    ) -> Self {
        Self {
            sessions: DashMap::new(),
            config,
            chain,
            limits,
            admission: Mutex::new(()),
        }
    }

    pub fn limits(&self) -> SessionLimits {
        self.limits
    }

    /// Build and mount a view for a new page, unless the registry is full.
    /// Must run inside a Tokio runtime.
    pub fn open(
        &self,
        seed: SessionSeed,
    ) -> Result<Arc<Session>, OpenSessionError> {
        let _admission = self.admission.lock();
        if self.sessions.len() >= self.limits.max_sessions {
            warn!(limit = self.limits.max_sessions, "session limit reached");
            return Err(OpenSessionError::Full {
                limit: self.limits.max_sessions,
            });
        }

        let host = Arc::new(RelayHost::new(seed.context));
        let wallet = Arc::new(RelayWallet::new(
            Arc::clone(&self.chain),
            seed.connectors,
            seed.connection,
        ));
        let view = MiniAppView::new(
            Arc::clone(&self.config),
            Arc::clone(&self.chain),
            host.clone(),
            wallet.clone(),
        );
        view.mount()?;

        let now = Utc::now();
        let session = Arc::new(Session {
            id: Uuid::new_v4(),
            view,
            host,
            wallet,
            created_at: now,
            last_seen: Mutex::new(now),
        });
        self.sessions.insert(session.id, Arc::clone(&session));
        info!(session = %session.id, open = self.sessions.len(), "session opened");
        Ok(session)
    }

    /// Look a session up and mark it as seen.
    pub fn get(&self, id: Uuid) -> Option<Arc<Session>> {
        let session = self.sessions.get(&id).map(|entry| Arc::clone(&entry))?;
        session.touch(Utc::now());
        Some(session)
    }

    /// Remove a session and stop its timers.
    pub fn close(&self, id: Uuid) -> Option<Arc<Session>> {
        let (_, session) = self.sessions.remove(&id)?;
        session.view.unmount();
        info!(session = %id, open = self.sessions.len(), "session closed");
        Some(session)
    }

    /// Close every session idle for longer than the timeout at `now`.
    pub fn reap_idle(&self, now: DateTime<Utc>) -> usize {
        let idle: Vec<Uuid> = self
            .sessions
            .iter()
            .filter(|entry| entry.value().is_idle(now, self.limits.idle_timeout))
            .map(|entry| *entry.key())
            .collect();

        for id in &idle {
            debug!(session = %id, "reaping idle session");
            self.close(*id);
        }
        idle.len()
    }

    pub fn close_all(&self) -> usize {
        let ids: Vec<Uuid> =
            self.sessions.iter().map(|entry| *entry.key()).collect();
        ids.iter().filter(|id| self.close(**id).is_some()).count()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{Address, U256};
    use async_trait::async_trait;
    use mintu_core::{
        chain::{ChainReadError, ViewFunction},
        config::{ConfigLoader, EnvConfig},
    };

    struct NoChain;

    #[async_trait]
    impl ChainReader for NoChain {
        async fn read_uint(
            &self,
            _contract: Address,
            _function: ViewFunction,
        ) -> Result<U256, ChainReadError> {
            Err(ChainReadError::Malformed("offline".into()))
        }

        async fn native_balance(
            &self,
            _address: Address,
        ) -> Result<U256, ChainReadError> {
            Ok(U256::ZERO)
        }
    }

    fn registry(idle: Duration) -> SessionRegistry {
        registry_with(SessionLimits {
            idle_timeout: idle,
            ..SessionLimits::default()
        })
    }

    fn registry_with(limits: SessionLimits) -> SessionRegistry {
        let config = ConfigLoader::new()
            .compose(EnvConfig::from_lookup(|_| None))
            .unwrap()
            .config;
        SessionRegistry::new(Arc::new(config), Arc::new(NoChain), limits)
    }

    #[tokio::test]
    async fn reaps_only_idle_sessions() {
        let registry = registry(Duration::from_secs(60));
        let stale = registry.open(SessionSeed::default()).unwrap();
        let fresh = registry.open(SessionSeed::default()).unwrap();

        let now = Utc::now() + chrono::Duration::seconds(90);
        fresh.touch(now);

        assert_eq!(registry.reap_idle(now), 1);
        assert!(stale.view.is_torn_down());
        assert!(!fresh.view.is_torn_down());
        assert!(registry.get(fresh.id).is_some());
        assert!(registry.get(stale.id).is_none());
    }

    #[tokio::test]
    async fn close_all_unmounts_everything() {
        let registry = registry(Duration::from_secs(60));
        let a = registry.open(SessionSeed::default()).unwrap();
        let b = registry.open(SessionSeed::default()).unwrap();

        assert_eq!(registry.close_all(), 2);
        assert!(registry.is_empty());
        assert!(a.view.is_torn_down() && b.view.is_torn_down());
    }

    #[tokio::test]
    async fn full_registry_rejects_until_a_slot_frees() {
        let registry = registry_with(SessionLimits {
            max_sessions: 2,
            ..SessionLimits::default()
        });
        let first = registry.open(SessionSeed::default()).unwrap();
        registry.open(SessionSeed::default()).unwrap();

        assert!(matches!(
            registry.open(SessionSeed::default()),
            Err(OpenSessionError::Full { limit: 2 })
        ));
        assert_eq!(registry.len(), 2);

        registry.close(first.id);
        assert!(registry.open(SessionSeed::default()).is_ok());
    }
}
