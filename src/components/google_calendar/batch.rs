use super::gateway::CalendarGateway;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use tracing::{info, warn};

/// Outcome of a batch delete
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteSummary {
    pub message: String,
    pub succeeded: usize,
    pub failed: usize,
}

impl DeleteSummary {
    pub fn new(succeeded: usize, failed: usize) -> Self {
        Self {
            message: format!(
                "Deleted {} events, failed to delete {} events",
                succeeded, failed
            ),
            succeeded,
            failed,
        }
    }
}

/// Delete every event in `event_ids`, at most `concurrency` calls at a time.
///
/// Every call runs to completion; failures are counted, never propagated.
pub async fn delete_events(
    gateway: &dyn CalendarGateway,
    access_token: &str,
    event_ids: &[String],
    concurrency: usize,
) -> DeleteSummary {
    let permits = Semaphore::new(concurrency.max(1));

    let mut calls = Vec::with_capacity(event_ids.len());
    for event_id in event_ids {
        calls.push(delete_one(gateway, access_token, &permits, event_id.clone()));
    }
    let outcomes = join_all(calls).await;

    let succeeded = outcomes.iter().filter(|ok| **ok).count();
    let summary = DeleteSummary::new(succeeded, outcomes.len() - succeeded);

    info!("{}", summary.message);
    summary
}

async fn delete_one(
    gateway: &dyn CalendarGateway,
    access_token: &str,
    permits: &Semaphore,
    event_id: String,
) -> bool {
    let _permit = match permits.acquire().await {
        Ok(permit) => permit,
        Err(e) => {
            warn!("Failed to delete event {}: {}", event_id, e);
            return false;
        }
    };

    match gateway.delete_event(access_token, &event_id).await {
        Ok(()) => true,
        Err(e) => {
            warn!("Failed to delete event {}: {}", event_id, e);
            false
        }
    }
}
