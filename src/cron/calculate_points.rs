use crate::config::PipelineMode;
use crate::error::PointsError;
use crate::models::points::SyncReport;
use crate::services::pipeline::{compute_step, run_once};
use crate::state::AppState;
use crate::utils::logging::format_duration;
use std::time::Instant;
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

pub async fn run(app_state: AppState) {
    info!(target: "cron", "╔════════════════════════════════════════════╗");
    info!(target: "cron", "║   🔄 Starting calculate points cron.       ║");
    info!(target: "cron", "╚════════════════════════════════════════════╝");

    let Some(_permit) = app_state.jobs.calculate.try_acquire() else {
        warn!(
            target: "cron",
            job = app_state.jobs.calculate.name(),
            "⏭️ previous run still in flight, skipping this trigger"
        );
        return;
    };

    let run_id = Uuid::new_v4();
    let start = Instant::now();

    let result = execute(&app_state)
        .instrument(info_span!("calculate", %run_id))
        .await;

    let elapsed = start.elapsed();
    info!(target: "perf", %run_id, elapsed_ms = elapsed.as_millis() as u64, "calculate run timing");

    match result {
        Ok(()) => {
            info!(target: "cron", %run_id, "✅ calculate points cron finished in {}", format_duration(elapsed));
        }
        Err(PointsError::Cancelled) => {
            warn!(target: "cron", %run_id, "🛑 calculate run cancelled by shutdown, nothing committed");
        }
        Err(e) => {
            error!(target: "cron", %run_id, "❌ calculate run failed, will retry on next trigger: {}", e);
        }
    }
}

async fn execute(app_state: &AppState) -> Result<(), PointsError> {
    let repo = app_state.repository.as_ref();
    let policy = app_state.config.scoring.policy;
    let shutdown = &app_state.shutdown;

    match app_state.config.scoring.mode {
        PipelineMode::Single => {
            let report = run_once(repo, policy, shutdown).await?;
            log_report(&report);
        }
        PipelineMode::Chained => {
            let handoff = compute_step(repo, policy, shutdown).await?;
            let tx = app_state
                .handoff_tx
                .as_ref()
                .ok_or(PointsError::HandoffClosed)?;

            info!(target: "cron", "🔗 triggering update job for {} players", handoff.points.len());
            shutdown
                .run_until(async {
                    tx.send(handoff)
                        .await
                        .map_err(|_| PointsError::HandoffClosed)
                })
                .await?;
        }
    }

    Ok(())
}

pub(crate) fn log_report(report: &SyncReport) {
    info!(
        target: "cron",
        inserted = report.inserted,
        updated = report.updated,
        unchanged = report.unchanged,
        "📊 player points synced"
    );
}
