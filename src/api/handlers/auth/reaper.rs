//! Background sweep of registry rows whose tokens have expired.

use std::{sync::Arc, time::Duration};
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, error, info};

use super::state::AuthState;

/// Spawn the reaper on the current runtime.
pub fn spawn_session_reaper(auth_state: Arc<AuthState>) -> tokio::task::JoinHandle<()> {
    let period = Duration::from_secs(auth_state.config().session_reaper_interval_seconds().max(1));
    tokio::spawn(async move {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            match auth_state.purge_expired_sessions().await {
                Ok(0) => debug!("session reaper: nothing to purge"),
                Ok(purged) => info!(purged, "session reaper purged expired sessions"),
                Err(err) => error!("session reaper failed: {err}"),
            }
        }
    })
}
