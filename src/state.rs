use std::sync::Arc;
use tokio::sync::mpsc;

use crate::config::AppConfig;
use crate::db::PointsRepository;
use crate::models::points::PointsHandoff;
use crate::utils::job_guard::JobGuard;
use crate::utils::shutdown::Shutdown;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub repository: Arc<dyn PointsRepository>,
    pub shutdown: Shutdown,
    pub jobs: JobGuards,
    /// Set in chained mode: where the compute job sends its totals.
    pub handoff_tx: Option<mpsc::Sender<PointsHandoff>>,
}

#[derive(Clone)]
pub struct JobGuards {
    pub calculate: JobGuard,
    pub apply: JobGuard,
}

impl Default for JobGuards {
    fn default() -> Self {
        Self {
            calculate: JobGuard::new("calculate"),
            apply: JobGuard::new("apply"),
        }
    }
}
