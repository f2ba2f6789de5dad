//! Scheduled checkout finalizer
//!
//! Moves SCHEDULED CHECKOUT records whose date has arrived (in the business
//! time zone) to CHECKEDIN-OUT. Runs once at startup and then on a fixed
//! interval until shutdown.

use std::time::Duration;

use chrono::NaiveDate;
use sqlx::SqlitePool;

use crate::core::{BackgroundTasks, ServerState, TaskKind};
use crate::db::repository::{RepoResult, bed_assignment};

/// Finalize every schedule due on or before `today`
pub async fn finalize_due(pool: &SqlitePool, today: NaiveDate) -> RepoResult<u64> {
    let moved = bed_assignment::finalize_scheduled_checkouts(pool, today).await?;
    if moved > 0 {
        tracing::info!(count = moved, %today, "Finalized scheduled checkouts");
    }
    Ok(moved)
}

async fn run_once(state: &ServerState) {
    if let Err(e) = finalize_due(&state.pool, state.today()).await {
        tracing::error!(error = %e, "Scheduled checkout finalizer failed");
    }
}

pub fn register(tasks: &mut BackgroundTasks, state: &ServerState) {
    let warmup_state = state.clone();
    tasks.spawn("scheduled_checkout_warmup", TaskKind::Warmup, async move {
        run_once(&warmup_state).await;
    });

    let state = state.clone();
    let shutdown = tasks.shutdown_token();
    let period = Duration::from_secs(state.config.scheduled_checkout_interval_secs);
    tasks.spawn("scheduled_checkout", TaskKind::Periodic, async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // First tick fires immediately; the warmup already covered it
        interval.tick().await;

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    tracing::debug!("Scheduled checkout finalizer stopping");
                    break;
                }
                _ = interval.tick() => run_once(&state).await,
            }
        }
    });
}
