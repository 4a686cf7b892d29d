use crate::state::AppState;
use crate::utils::cron::{resolve_schedule, Schedule};
use anyhow::anyhow;
use std::future::Future;
use std::pin::Pin;
use tokio::time::{sleep, Duration};
use tokio_cron_scheduler::{Job, JobScheduler};
use uuid::Uuid;

pub mod calculate_points;

/// Runs a job body on its own task so a panic ends only that run.
async fn run_isolated<F>(job: &'static str, fut: F)
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Err(e) = tokio::spawn(fut).await {
        tracing::error!(target: "cron", job, "💥 run aborted: {:?}", e);
    }
}

pub async fn start_cron_jobs(state: AppState) -> anyhow::Result<JobScheduler> {
    let scheduler = JobScheduler::new().await?;

    /*
     * ------------------------------------------------------------
     * Initial delayed run after restart
     * ------------------------------------------------------------
     */
    if let Some(delay) = state.config.cron.initial_delay_secs {
        let state = state.clone();
        tokio::spawn(async move {
            tracing::info!(
                "🚀 Service started, waiting {} seconds before first calculate_points...",
                delay
            );
            tokio::select! {
                _ = state.shutdown.triggered() => return,
                _ = sleep(Duration::from_secs(delay)) => {}
            }

            tracing::info!("🧮 Running initial calculate_points...");
            run_isolated("calculate_points", calculate_points::run(state)).await;
        });
    }

    /*
     * ------------------------------------------------------------
     * calculate_points cron
     * ------------------------------------------------------------
     */
    let schedule = resolve_schedule(&state.config.cron.calculate)
        .ok_or_else(|| anyhow!("cron.calculate needs either `expr` or a positive `seconds`"))?;

    tracing::info!(
        "📅 Scheduling calculate_points cron: {} ({:?} mode, {:?})",
        schedule.desc(),
        state.config.scoring.mode,
        state.config.scoring.policy
    );

    let trigger = {
        let state = state.clone();
        move |_uuid: Uuid, _l: JobScheduler| -> Pin<Box<dyn Future<Output = ()> + Send>> {
            let state = state.clone();
            Box::pin(async move {
                run_isolated("calculate_points", calculate_points::run(state)).await;
            })
        }
    };

    let job = match schedule {
        Schedule::Cron { expr, .. } => Job::new_async(expr.as_str(), trigger)?,
        Schedule::Every { interval, .. } => Job::new_repeated_async(interval, trigger)?,
    };
    scheduler.add(job).await?;

    /*
     * ------------------------------------------------------------
     * Start scheduler
     * ------------------------------------------------------------
     */
    scheduler.start().await?;
    Ok(scheduler)
}
