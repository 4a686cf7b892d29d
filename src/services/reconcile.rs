use crate::models::points::{PlayerPointsRow, PlayerPointsWrite, RankedPlayerScore, SyncPlan};
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Diffs a freshly ranked snapshot against the stored rows.
///
/// Rows of players missing from `ranked` are never touched.
pub fn plan_sync(
    ranked: &[RankedPlayerScore],
    world_records: &BTreeMap<i32, i32>,
    existing: &[PlayerPointsRow],
    now: DateTime<Utc>,
) -> SyncPlan {
    let stored: HashMap<i32, &PlayerPointsRow> =
        existing.iter().map(|row| (row.player_id, row)).collect();

    let mut plan = SyncPlan {
        inserts: Vec::new(),
        updates: Vec::new(),
        unchanged: 0,
        now,
    };

    for score in ranked {
        let write = PlayerPointsWrite {
            player_id: score.player_id,
            points: score.total_points,
            rank: score.rank,
            world_records: world_records.get(&score.player_id).copied().unwrap_or(0),
        };

        match stored.get(&score.player_id) {
            Some(row)
                if row.points == write.points
                    && row.rank == write.rank
                    && row.world_records == write.world_records =>
            {
                debug!(player_id = write.player_id, "skipping, points and rank are the same");
                plan.unchanged += 1;
            }
            Some(row) => {
                debug!(
                    player_id = write.player_id,
                    old_points = row.points,
                    new_points = write.points,
                    old_rank = row.rank,
                    new_rank = write.rank,
                    "updating player points"
                );
                plan.updates.push(write);
            }
            None => {
                debug!(
                    player_id = write.player_id,
                    points = write.points,
                    rank = write.rank,
                    "creating player points"
                );
                plan.inserts.push(write);
            }
        }
    }

    plan
}
