//! Data bridge: forwards [`Poller`] changes into the TUI action loop and
//! applies URL changes coming the other way.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use url::Url;

use routemap_core::Poller;

use crate::action::Action;

/// Forward every snapshot swap and polling-state transition as an
/// [`Action`] until `cancel` fires or the app drops its receiver.
///
/// Sends the current values first so the first frame is not blank.
pub async fn spawn_data_bridge(
    poller: Poller,
    action_tx: mpsc::UnboundedSender<Action>,
    cancel: CancellationToken,
) {
    let mut snapshots = poller.snapshots();
    let mut state = poller.state();

    let _ = action_tx.send(Action::PollStateChanged(state.borrow_and_update().clone()));
    snapshots.mark_unchanged();
    if let Some(snapshot) = poller.snapshot() {
        let _ = action_tx.send(Action::SnapshotUpdated(Some(snapshot)));
    }

    loop {
        tokio::select! {
            biased;

            () = cancel.cancelled() => break,

            Ok(()) = snapshots.changed() => {
                debug!(version = *snapshots.borrow_and_update(), "dispatching SnapshotUpdated");
                if action_tx.send(Action::SnapshotUpdated(poller.snapshot())).is_err() {
                    break;
                }
            }
            Ok(()) = state.changed() => {
                let current = state.borrow_and_update().clone();
                if action_tx.send(Action::PollStateChanged(current)).is_err() {
                    break;
                }
            }
            else => break,
        }
    }

    debug!("data bridge stopped");
}

/// Apply URL changes one at a time, in submission order.
///
/// Each result comes back as [`Action::UrlApplied`] or [`Action::Notify`].
pub async fn spawn_url_applier(
    poller: Poller,
    mut url_rx: mpsc::UnboundedReceiver<Option<Url>>,
    action_tx: mpsc::UnboundedSender<Action>,
    cancel: CancellationToken,
) {
    loop {
        let url = tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            next = url_rx.recv() => match next {
                Some(url) => url,
                None => break,
            },
        };

        let action = match poller.set_url(url.clone()).await {
            Ok(()) => Action::UrlApplied(url),
            Err(e) => {
                warn!(error = %e, "failed to switch proxy URL");
                Action::Notify(e.to_string())
            }
        };
        if action_tx.send(action).is_err() {
            break;
        }
    }

    debug!("url applier stopped");
}
