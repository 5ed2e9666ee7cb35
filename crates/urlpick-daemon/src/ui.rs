use crate::launch;
use crate::picker::ProfilePicker;
use std::thread;
use tokio::sync::mpsc;
use urlpick_core::Inventory;
use urlpick_ipc::UrlDelivery;

/// Run picker sessions one at a time on a dedicated thread.
///
/// The thread owns the inventory and the picker; it ends when the delivery
/// channel closes. Every delivery is answered with a completion signal,
/// whether or not a launch happened, so queued URLs stay serialized and are
/// never dropped.
pub fn spawn_session_loop(
    inventory: Inventory,
    mut picker: Box<dyn ProfilePicker + Send>,
    mut deliveries: mpsc::Receiver<UrlDelivery>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        while let Some(delivery) = deliveries.blocking_recv() {
            run_session(&inventory, picker.as_mut(), &delivery.url);
            if delivery.done.send(()).is_err() {
                tracing::debug!("Server stopped waiting for the session");
            }
        }
        tracing::debug!("Delivery channel closed; session loop ending");
    })
}

/// One picker session: choose a profile for the URL and launch it. A
/// dismissed session or an empty inventory drops the URL.
fn run_session(inventory: &Inventory, picker: &mut dyn ProfilePicker, url: &str) {
    if inventory.is_empty() {
        tracing::warn!("No browsers discovered; dropping {}", url);
        return;
    }

    match picker.pick(inventory, url) {
        Some(selection) => {
            if let Err(e) = launch::spawn_browser(selection.browser, selection.profile, url) {
                tracing::error!("Launch failed: {:#}", e);
            }
        }
        None => tracing::warn!("No profile selected; dropping {}", url),
    }
}
