//! Background job scheduling
//!
//! Runs the daily overdue sweep on a cron cadence. A missed tick (process
//! down at the scheduled time) simply delays reclassification until the
//! next tick; no last-run state is persisted.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::payment_service::PaymentService;

/// Start the overdue sweeper on the given six-field cron schedule
/// (e.g. `0 0 0 * * *` for midnight daily).
pub async fn start_overdue_sweeper(
    payment_service: Arc<PaymentService>,
    schedule: &str,
) -> Result<JobScheduler> {
    let mut sched = JobScheduler::new()
        .await
        .context("Failed to create job scheduler")?;

    let job = Job::new_async(schedule, move |_uuid, _lock| {
        let service = payment_service.clone();
        Box::pin(async move {
            match service.sweep_overdue().await {
                Ok(count) => {
                    tracing::info!(reclassified = count, "Overdue sweep completed");
                }
                Err(e) => {
                    tracing::error!("Overdue sweep failed: {}", e);
                }
            }
        })
    })
    .context("Invalid sweep cron schedule")?;

    sched.add(job).await.context("Failed to add sweep job")?;
    sched.start().await.context("Failed to start scheduler")?;

    Ok(sched)
}
