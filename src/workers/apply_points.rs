use crate::cron::calculate_points::log_report;
use crate::error::PointsError;
use crate::models::points::PointsHandoff;
use crate::services::pipeline::apply_step;
use crate::state::AppState;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

/// Consumes hand-offs from the compute job, one at a time, until shutdown or
/// until every sender is gone.
pub async fn start(state: AppState, mut rx: mpsc::Receiver<PointsHandoff>) {
    info!("Starting apply points worker...");

    loop {
        let handoff = tokio::select! {
            biased;
            _ = state.shutdown.triggered() => break,
            msg = rx.recv() => match msg {
                Some(handoff) => handoff,
                None => break,
            },
        };

        let task_state = state.clone();
        if let Err(e) = tokio::spawn(async move { apply(&task_state, handoff).await }).await {
            error!(target: "cron", "💥 apply run aborted: {:?}", e);
        }
    }

    info!("Apply points worker stopped");
}

async fn apply(state: &AppState, handoff: PointsHandoff) {
    let _permit = state.jobs.apply.acquire().await;

    match apply_step(state.repository.as_ref(), &handoff, &state.shutdown).await {
        Ok(report) => log_report(&report),
        Err(PointsError::Cancelled) => {
            warn!(target: "cron", "🛑 apply run cancelled by shutdown, nothing committed");
        }
        Err(e) => {
            error!(target: "cron", "❌ apply run failed, will retry on next trigger: {}", e);
        }
    }
}
