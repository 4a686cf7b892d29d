use crate::error::PointsError;
use crate::models::points::{PlayerPointsRow, ScoringInput, SyncPlan};
use async_trait::async_trait;
use sqlx::PgPool;

#[cfg(test)]
pub mod memory;
pub mod personal_bests;
pub mod player_points;

/// Storage the pipeline reads from and writes to.
#[async_trait]
pub trait PointsRepository: Send + Sync {
    /// Personal bests, player count and (optionally) level pools, read from a
    /// single consistent snapshot.
    async fn load_scoring_input(&self, with_level_pools: bool)
        -> Result<ScoringInput, PointsError>;

    async fn load_player_points(&self) -> Result<Vec<PlayerPointsRow>, PointsError>;

    /// Applies every insert and update of `plan` atomically.
    async fn commit_sync(&self, plan: &SyncPlan) -> Result<(), PointsError>;
}

pub struct PgPointsRepository {
    pool: PgPool,
}

impl PgPointsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PointsRepository for PgPointsRepository {
    async fn load_scoring_input(
        &self,
        with_level_pools: bool,
    ) -> Result<ScoringInput, PointsError> {
        Ok(personal_bests::fetch_scoring_input(&self.pool, with_level_pools).await?)
    }

    async fn load_player_points(&self) -> Result<Vec<PlayerPointsRow>, PointsError> {
        Ok(player_points::fetch_player_points(&self.pool).await?)
    }

    async fn commit_sync(&self, plan: &SyncPlan) -> Result<(), PointsError> {
        Ok(player_points::commit_sync_plan(&self.pool, plan).await?)
    }
}
