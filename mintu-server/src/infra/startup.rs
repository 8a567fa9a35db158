use std::{sync::Arc, time::Duration};

use chrono::Utc;
use tokio::{task::JoinHandle, time::MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::sessions::SessionRegistry;

/// How often idle sessions are looked for.
pub const REAP_INTERVAL: Duration = Duration::from_secs(60);

/// Close idle sessions every `every` until `shutdown` fires.
pub fn spawn_session_reaper(
    sessions: Arc<SessionRegistry>,
    every: Duration,
    shutdown: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = interval.tick() => {}
            }

            let reaped = sessions.reap_idle(Utc::now());
            if reaped > 0 {
                info!(reaped, open = sessions.len(), "reaped idle sessions");
            }
        }
    })
}
