//! Periodic position polling

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::model::TransportState;

use super::Shared;

pub(super) fn spawn(shared: Arc<Shared>, period: Duration, cancel: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::debug!("Position ticker cancelled");
                    break;
                }
                _ = interval.tick() => poll_once(&shared).await,
            }
        }
    })
}

async fn poll_once(shared: &Shared) {
    let mut state = shared.state.lock().await;
    if state.transport != TransportState::Playing || state.seeking {
        return;
    }

    let status = match state.live.as_ref() {
        Some(live) => live.resource.status().await,
        None => return,
    };

    match status {
        Ok(status) => shared.apply_status(&mut state, status),
        Err(e) => tracing::warn!(error = %e, "Failed to read playback position"),
    }
}
