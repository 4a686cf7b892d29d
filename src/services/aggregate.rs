use crate::models::points::{BestTimeEntry, LevelRanking, RankedTime};
use std::collections::BTreeMap;
use tracing::warn;

/// Groups personal bests by level and orders every group fastest first.
///
/// Ties on time fall back to `created_order`, so the same input always yields
/// the same rankings. Entries without a usable time are left out.
pub fn rank_levels(entries: &[BestTimeEntry]) -> Vec<LevelRanking> {
    let mut levels: BTreeMap<&str, Vec<RankedTime>> = BTreeMap::new();

    for entry in entries {
        let time = match entry.time {
            Some(t) if t.is_finite() => t,
            _ => {
                warn!(
                    player_id = entry.player_id,
                    level_id = %entry.level_id,
                    created_order = entry.created_order,
                    "⚠️ personal best without a usable time, excluded from ranking"
                );
                continue;
            }
        };

        levels
            .entry(entry.level_id.as_str())
            .or_default()
            .push(RankedTime {
                created_order: entry.created_order,
                player_id: entry.player_id,
                time,
            });
    }

    levels
        .into_iter()
        .map(|(level_id, mut entries)| {
            entries.sort_by(|a, b| {
                a.time
                    .total_cmp(&b.time)
                    .then(a.created_order.cmp(&b.created_order))
            });
            LevelRanking {
                level_id: level_id.to_string(),
                entries,
            }
        })
        .collect()
}

/// Counts, per player, the levels on which they are uniquely fastest.
///
/// A level whose two fastest times are equal has no world record holder.
pub fn world_record_counts(levels: &[LevelRanking]) -> BTreeMap<i32, i32> {
    let mut counts = BTreeMap::new();

    for level in levels {
        let holder = match level.entries.as_slice() {
            [only] => Some(only),
            [first, second, ..] if first.time < second.time => Some(first),
            _ => None,
        };

        if let Some(holder) = holder {
            *counts.entry(holder.player_id).or_insert(0) += 1;
        }
    }

    counts
}
