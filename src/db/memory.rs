use super::PointsRepository;
use crate::error::PointsError;
use crate::models::points::{BestTimeEntry, PlayerPointsRow, ScoringInput, SyncPlan};
use crate::utils::shutdown::ShutdownTrigger;
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

/// In-memory repository that records how many rows each commit touched.
#[derive(Default)]
pub struct MemoryRepository {
    input: Mutex<ScoringInput>,
    rows: Mutex<BTreeMap<i32, PlayerPointsRow>>,
    pub commits: AtomicUsize,
    pub inserted: AtomicUsize,
    pub updated: AtomicUsize,
    pub fail_commit: AtomicBool,
    shutdown_mid_commit: Mutex<Option<ShutdownTrigger>>,
}

impl MemoryRepository {
    pub fn new(entries: Vec<BestTimeEntry>, total_players: i64) -> Self {
        let repo = Self::default();
        repo.set_input(ScoringInput {
            entries,
            total_players,
            level_pools: HashMap::new(),
        });
        repo
    }

    pub fn set_input(&self, input: ScoringInput) {
        *self.input.lock().unwrap() = input;
    }

    pub fn set_level_pools(&self, pools: HashMap<String, i32>) {
        self.input.lock().unwrap().level_pools = pools;
    }

    pub fn seed_row(&self, row: PlayerPointsRow) {
        self.rows.lock().unwrap().insert(row.player_id, row);
    }

    pub fn row(&self, player_id: i32) -> Option<PlayerPointsRow> {
        self.rows.lock().unwrap().get(&player_id).cloned()
    }

    /// Fires `trigger` once a commit has started, then yields before writing.
    pub fn shutdown_mid_commit(&self, trigger: ShutdownTrigger) {
        *self.shutdown_mid_commit.lock().unwrap() = Some(trigger);
    }

    pub fn writes(&self) -> usize {
        self.inserted.load(Ordering::SeqCst) + self.updated.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PointsRepository for MemoryRepository {
    async fn load_scoring_input(
        &self,
        with_level_pools: bool,
    ) -> Result<ScoringInput, PointsError> {
        let mut input = self.input.lock().unwrap().clone();
        if !with_level_pools {
            input.level_pools.clear();
        }
        Ok(input)
    }

    async fn load_player_points(&self) -> Result<Vec<PlayerPointsRow>, PointsError> {
        Ok(self.rows.lock().unwrap().values().cloned().collect())
    }

    async fn commit_sync(&self, plan: &SyncPlan) -> Result<(), PointsError> {
        if plan.is_empty() {
            return Ok(());
        }
        if self.fail_commit.load(Ordering::SeqCst) {
            return Err(PointsError::Database(sqlx::Error::Protocol(
                "simulated commit failure".to_string(),
            )));
        }

        let fired = match self.shutdown_mid_commit.lock().unwrap().as_ref() {
            Some(trigger) => {
                trigger.trigger();
                true
            }
            None => false,
        };
        if fired {
            tokio::task::yield_now().await;
        }

        let mut rows = self.rows.lock().unwrap();
        // stage on a copy so a failed batch leaves nothing behind
        let mut staged = rows.clone();

        for write in &plan.inserts {
            if staged.contains_key(&write.player_id) {
                return Err(PointsError::Database(sqlx::Error::Protocol(format!(
                    "duplicate key player_id={}",
                    write.player_id
                ))));
            }
            staged.insert(
                write.player_id,
                PlayerPointsRow {
                    player_id: write.player_id,
                    points: write.points,
                    rank: write.rank,
                    world_records: write.world_records,
                    created_at: plan.now,
                    updated_at: plan.now,
                },
            );
        }

        for write in &plan.updates {
            if let Some(row) = staged.get_mut(&write.player_id) {
                row.points = write.points;
                row.rank = write.rank;
                row.world_records = write.world_records;
                row.updated_at = plan.now;
            }
        }

        *rows = staged;
        self.commits.fetch_add(1, Ordering::SeqCst);
        self.inserted.fetch_add(plan.inserts.len(), Ordering::SeqCst);
        self.updated.fetch_add(plan.updates.len(), Ordering::SeqCst);
        Ok(())
    }
}
