//! Timer loops spawned by `MiniAppView::mount`.
//!
//! Each loop exits when the view's cancellation token fires; dropping a loop
//! also drops any poll it still has in flight.

use std::{collections::HashMap, future::Future, sync::Arc};

use tokio::{
    task::{self, JoinError, JoinSet},
    time::{self, Instant, MissedTickBehavior},
};
use tracing::{debug, error};

use super::ViewShared;
use crate::{
    constants::{
        BALANCE_REFETCH_INTERVAL, CAROUSEL_ADVANCE_INTERVAL,
        PROGRESS_POLL_INTERVAL,
    },
    host::resolve_avatar,
};

/// The view's running timers, named so a panicking one can be reported.
#[derive(Debug, Default)]
pub(super) struct Timers {
    set: JoinSet<()>,
    names: HashMap<task::Id, &'static str>,
}

impl Timers {
    pub fn spawn<F>(&mut self, name: &'static str, timer: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let handle = self.set.spawn(timer);
        self.names.insert(handle.id(), name);
    }

    /// Collect timers that already exited, logging any that panicked.
    pub fn reap(&mut self) {
        while let Some(joined) = self.set.try_join_next_with_id() {
            match joined {
                Ok((id, ())) => {
                    self.names.remove(&id);
                }
                Err(err) => {
                    let name = self.names.remove(&err.id()).unwrap_or("timer");
                    log_join_error(name, &err);
                }
            }
        }
    }

    pub fn len(&self) -> usize {
        self.set.len()
    }

    /// Abort everything still running; returns how many were stopped.
    pub fn abort_all(&mut self) -> usize {
        self.reap();
        let running = self.set.len();
        self.set.abort_all();
        self.set.detach_all();
        self.names.clear();
        running
    }
}

fn log_join_error(task: &str, err: &JoinError) {
    if err.is_panic() {
        error!(task, error = %err, "view task panicked");
    }
}

/// Poll immediately, then on every tick. Polls are spawned rather than
/// awaited, so a slow RPC never delays the next one; the last write wins.
pub(super) async fn poll_progress(shared: Arc<ViewShared>) {
    let mut ticker = time::interval(PROGRESS_POLL_INTERVAL);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut in_flight = JoinSet::new();

    loop {
        tokio::select! {
            _ = shared.cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }

        while let Some(joined) = in_flight.try_join_next() {
            if let Err(err) = joined {
                log_join_error("progress poll", &err);
            }
        }

        let poll = Arc::clone(&shared);
        in_flight.spawn(async move {
            poll.refresh_progress().await;
        });
    }
}

/// Advance the carousel every interval; stop for good once nothing is
/// visible, since the manifest only ever shrinks.
pub(super) async fn advance_carousel(shared: Arc<ViewShared>) {
    let mut ticker = time::interval_at(
        Instant::now() + CAROUSEL_ADVANCE_INTERVAL,
        CAROUSEL_ADVANCE_INTERVAL,
    );
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = shared.cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }

        match shared.update(|state| state.carousel.advance()) {
            Some(Some(_)) => {}
            Some(None) => {
                debug!("no visible images left; carousel stopped");
                break;
            }
            None => break,
        }
    }
}

/// Wait for the host, then do the context-dependent work. Failures here are
/// logged and otherwise ignored.
pub(super) async fn run_startup(shared: Arc<ViewShared>) {
    if let Err(err) = shared.host.ready().await {
        debug!(error = %err, "host ready signal failed; continuing");
    }

    let context = match shared.host.context().await {
        Ok(context) => Some(context),
        Err(err) => {
            debug!(error = %err, "host context unavailable");
            None
        }
    };

    let avatar = resolve_avatar(&shared.config.avatar, context.as_ref());
    if shared.update(|state| state.avatar = avatar).is_none() {
        return;
    }

    let inside_host = context.is_some();
    if shared.config.auto_connect.should_attempt(inside_host)
        && !shared.wallet.connection().is_connected
    {
        shared.auto_connect().await;
    }
}

/// Keep the balance fresh while the wallet is connected.
pub(super) async fn refresh_balance(shared: Arc<ViewShared>) {
    let mut ticker = time::interval(BALANCE_REFETCH_INTERVAL);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = shared.cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }

        shared.refresh_balance().await;
    }
}
