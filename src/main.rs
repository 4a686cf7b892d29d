use std::sync::Arc;
use std::time::Duration;
use tokio::{signal, sync::mpsc};
use tracing::{info, warn};

use player_points_calculator::{
    config::{AppConfig, PipelineMode},
    cron::start_cron_jobs,
    db::PgPointsRepository,
    state::{AppState, JobGuards},
    utils::{logging::setup_logging, shutdown::Shutdown},
    workers::apply_points,
};
use sqlx::postgres::PgPoolOptions;

const SHUTDOWN_GRACE: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::new()?;
    let _guards = setup_logging(&config.logging.dir, &config.logging.service, config.debug)?;

    let db_pool = PgPoolOptions::new()
        .max_connections(config.db.max_connections)
        .connect(&config.db.url)
        .await?;
    info!("✅ connected to db");

    let (shutdown_trigger, shutdown) = Shutdown::new();

    let (handoff_tx, handoff_rx) = match config.scoring.mode {
        PipelineMode::Chained => {
            let (tx, rx) = mpsc::channel(1);
            (Some(tx), Some(rx))
        }
        PipelineMode::Single => (None, None),
    };

    let app_state = AppState {
        config: Arc::new(config),
        repository: Arc::new(PgPointsRepository::new(db_pool.clone())),
        shutdown,
        jobs: JobGuards::default(),
        handoff_tx,
    };

    let worker = handoff_rx.map(|rx| tokio::spawn(apply_points::start(app_state.clone(), rx)));

    let mut scheduler = start_cron_jobs(app_state.clone()).await?;

    // 👇 Wait for Ctrl+C
    signal::ctrl_c().await?;
    info!("🛑 Received Ctrl+C. Triggering shutdown...");
    shutdown_trigger.trigger();

    if let Err(e) = scheduler.shutdown().await {
        warn!("scheduler shutdown failed: {:?}", e);
    }

    // 👇 Let in-flight runs observe the signal and release their guards
    let drained = tokio::time::timeout(SHUTDOWN_GRACE, async {
        let _calculate = app_state.jobs.calculate.acquire().await;
        let _apply = app_state.jobs.apply.acquire().await;
        if let Some(worker) = worker {
            let _ = worker.await;
        }
    })
    .await;

    if drained.is_err() {
        warn!("⏳ in-flight runs did not finish within {:?}", SHUTDOWN_GRACE);
    }

    db_pool.close().await;
    info!("👋 Shutdown complete");
    Ok(())
}
