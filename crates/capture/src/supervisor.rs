//! Spawns and awaits one polling worker per instance.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use consoletail_ec2::ConsoleOutputApi;
use tokio::task::JoinSet;

use crate::resource::Resource;
use crate::worker::Worker;

/// Delay between polling cycles, applied after every cycle regardless of
/// outcome.
pub const POLL_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Builds one worker per instance, then polls them all concurrently.
///
/// Every log file is opened before any polling starts; an open failure
/// is a configuration error and fails startup. Workers are fully
/// independent — an error in one never reaches another — and loop
/// forever, so awaiting them only completes if a worker panics.
pub async fn run(
    resources: Vec<Resource>,
    folder: &Path,
    api: Arc<dyn ConsoleOutputApi>,
    interval: Duration,
) -> std::io::Result<()> {
    let mut workers = Vec::with_capacity(resources.len());
    for resource in resources {
        workers.push(Worker::new(resource, folder, Arc::clone(&api))?);
    }

    let mut set = JoinSet::new();
    for worker in workers {
        set.spawn(worker.run(interval));
    }

    while let Some(joined) = set.join_next().await {
        if let Err(e) = joined {
            tracing::error!(error = %e, "capture worker terminated unexpectedly");
        }
    }
    Ok(())
}
