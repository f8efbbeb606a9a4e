//! Background worker applying click increments.
//!
//! The worker owns its own task on the runtime and is fed through a bounded
//! channel. Request cancellation never reaches it: once an event is queued the
//! increment runs to completion or fails on its own.

use std::sync::Arc;

use tokio::sync::{Semaphore, mpsc};
use tokio::task::JoinSet;

use crate::domain::click_event::ClickEvent;
use crate::domain::repositories::LinkRepository;

/// Consumes click events until every sender is dropped.
///
/// At most `concurrency` increments are in flight at once. Failures are logged
/// and discarded; a click is never retried. Returns after the channel closes
/// and all in-flight increments have finished.
pub async fn run_click_worker(
    mut rx: mpsc::Receiver<ClickEvent>,
    repository: Arc<dyn LinkRepository>,
    concurrency: usize,
) {
    let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut in_flight = JoinSet::new();

    while let Some(event) = rx.recv().await {
        let Ok(permit) = semaphore.clone().acquire_owned().await else {
            break;
        };

        let repository = repository.clone();
        in_flight.spawn(async move {
            let _permit = permit;
            if let Err(e) = repository.increment_clicks(event.link_id).await {
                tracing::warn!(
                    link_id = event.link_id,
                    code = %event.short_code,
                    error = %e,
                    "Failed to record click"
                );
            }
        });

        // Reap finished tasks so the set does not grow with traffic.
        while in_flight.try_join_next().is_some() {}
    }

    while in_flight.join_next().await.is_some() {}

    tracing::info!("Click worker stopped");
}
