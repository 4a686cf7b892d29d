use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::{BTreeMap, HashMap};

/// One personal best as read from the database.
///
/// `time` is `None` when the linked record has no time; such entries never
/// take part in a level ranking.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct BestTimeEntry {
    pub created_order: i64,
    pub player_id: i32,
    pub level_id: String,
    pub time: Option<f64>,
}

/// A ranked entry inside a [`LevelRanking`].
#[derive(Debug, Clone, PartialEq)]
pub struct RankedTime {
    pub created_order: i64,
    pub player_id: i32,
    pub time: f64,
}

/// Personal bests of a single level, fastest first.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelRanking {
    pub level_id: String,
    pub entries: Vec<RankedTime>,
}

impl LevelRanking {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankedPlayerScore {
    pub player_id: i32,
    pub total_points: i32,
    pub rank: i32,
}

/// Everything a scoring run reads, taken from one consistent snapshot.
#[derive(Debug, Clone, Default)]
pub struct ScoringInput {
    pub entries: Vec<BestTimeEntry>,
    pub total_players: i64,
    pub level_pools: HashMap<String, i32>,
}

/// Value passed from the compute step to the apply step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointsHandoff {
    pub points: BTreeMap<i32, i32>,
    #[serde(default)]
    pub world_records: BTreeMap<i32, i32>,
}

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct PlayerPointsRow {
    pub player_id: i32,
    pub points: i32,
    pub rank: i32,
    pub world_records: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Values written for a single player by a sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerPointsWrite {
    pub player_id: i32,
    pub points: i32,
    pub rank: i32,
    pub world_records: i32,
}

/// Minimal set of writes that brings `player_points` in line with a run.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncPlan {
    pub inserts: Vec<PlayerPointsWrite>,
    pub updates: Vec<PlayerPointsWrite>,
    pub unchanged: usize,
    pub now: DateTime<Utc>,
}

impl SyncPlan {
    pub fn is_empty(&self) -> bool {
        self.inserts.is_empty() && self.updates.is_empty()
    }

    pub fn report(&self) -> SyncReport {
        SyncReport {
            inserted: self.inserts.len(),
            updated: self.updates.len(),
            unchanged: self.unchanged,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub inserted: usize,
    pub updated: usize,
    pub unchanged: usize,
}
