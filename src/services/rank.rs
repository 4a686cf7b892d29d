use crate::models::points::RankedPlayerScore;
use std::collections::BTreeMap;

/// Orders players by total points, highest first, and numbers them `1..=N`.
///
/// Equal totals do not share a rank: the lower player id comes first.
pub fn assign_ranks(totals: &BTreeMap<i32, i32>) -> Vec<RankedPlayerScore> {
    let mut ordered: Vec<(i32, i32)> = totals.iter().map(|(&id, &points)| (id, points)).collect();
    ordered.sort_by(|a, b| b.1.cmp(&a.1));

    (1..)
        .zip(ordered)
        .map(|(rank, (player_id, total_points))| RankedPlayerScore {
            player_id,
            total_points,
            rank,
        })
        .collect()
}
