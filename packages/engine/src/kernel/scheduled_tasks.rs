//! Scheduled background tasks using tokio-cron-scheduler.
//!
//! The only periodic task is the draw-history reaper. Draw correctness
//! does not depend on it having run: exclusion is over the most-recent N
//! rows regardless of age, so a late reaper only costs storage.

use anyhow::Result;
use sqlx::PgPool;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::config::Config;
use crate::domains::draws::models::draw_history::DrawHistoryRecord;

/// Start all scheduled tasks.
pub async fn start_scheduler(pool: PgPool, config: &Config) -> Result<JobScheduler> {
    let scheduler = JobScheduler::new().await?;

    // Draw-history reaper - runs daily at 03:00
    let reap_pool = pool.clone();
    let ttl_days = config.draw_history_ttl_days;
    let reap_job = Job::new_async("0 0 3 * * *", move |_uuid, _lock| {
        let pool = reap_pool.clone();
        Box::pin(async move {
            if let Err(e) = run_draw_history_reaper(ttl_days, &pool).await {
                tracing::error!("Draw history reaper failed: {}", e);
            }
        })
    })?;

    scheduler.add(reap_job).await?;
    scheduler.start().await?;

    tracing::info!(
        ttl_days = config.draw_history_ttl_days,
        "Scheduled tasks started (draw-history reaper daily at 03:00)"
    );
    Ok(scheduler)
}

/// Delete draw-history rows past the retention window.
async fn run_draw_history_reaper(ttl_days: i64, pool: &PgPool) -> Result<()> {
    let deleted = DrawHistoryRecord::delete_older_than(ttl_days, pool).await?;
    if deleted > 0 {
        tracing::info!(deleted, ttl_days, "reaped old draw history rows");
    }
    Ok(())
}
