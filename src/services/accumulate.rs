use crate::models::points::LevelRanking;
use std::collections::BTreeMap;

/// Folds per-entry points into per-player totals for a single run.
#[derive(Debug, Default)]
pub struct PointsAccumulator {
    totals: BTreeMap<i32, i32>,
}

impl PointsAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, player_id: i32, points: i32) {
        let total = self.totals.entry(player_id).or_insert(0);
        *total = total.saturating_add(points);
    }

    /// Adds every entry of `level`, scoring each by its 1-based rank.
    pub fn add_level<F>(&mut self, level: &LevelRanking, mut score: F)
    where
        F: FnMut(u32) -> i32,
    {
        for (rank, entry) in (1u32..).zip(&level.entries) {
            self.add(entry.player_id, score(rank));
        }
    }

    pub fn into_totals(self) -> BTreeMap<i32, i32> {
        self.totals
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::points::RankedTime;

    fn level(id: &str, players: &[i32]) -> LevelRanking {
        LevelRanking {
            level_id: id.to_string(),
            entries: players
                .iter()
                .enumerate()
                .map(|(i, &player_id)| RankedTime {
                    created_order: i as i64,
                    player_id,
                    time: 10.0 + i as f64,
                })
                .collect(),
        }
    }

    #[test]
    fn sums_across_levels() {
        let mut acc = PointsAccumulator::new();
        acc.add_level(&level("a", &[1, 2, 3]), |rank| 10 - rank as i32);
        acc.add_level(&level("b", &[3, 1]), |rank| 5 * rank as i32);

        let totals = acc.into_totals();
        assert_eq!(totals[&1], 9 + 10);
        assert_eq!(totals[&2], 8);
        assert_eq!(totals[&3], 7 + 5);
    }

    #[test]
    fn level_order_does_not_matter() {
        let a = level("a", &[1, 2]);
        let b = level("b", &[2, 3, 1]);
        let score = |rank: u32| 100 / rank as i32;

        let mut forward = PointsAccumulator::new();
        forward.add_level(&a, score);
        forward.add_level(&b, score);

        let mut backward = PointsAccumulator::new();
        backward.add_level(&b, score);
        backward.add_level(&a, score);

        assert_eq!(forward.into_totals(), backward.into_totals());
    }

    #[test]
    fn zero_scores_still_register_the_player() {
        let mut acc = PointsAccumulator::new();
        acc.add_level(&level("a", &[4]), |_| 0);
        assert_eq!(acc.into_totals().get(&4), Some(&0));
    }

    #[test]
    fn duplicate_entries_are_summed() {
        let mut acc = PointsAccumulator::new();
        acc.add_level(&level("a", &[7, 7]), |_| 3);
        assert_eq!(acc.into_totals()[&7], 6);
    }

    #[test]
    fn totals_saturate() {
        let mut acc = PointsAccumulator::new();
        acc.add(1, i32::MAX);
        acc.add(1, 5);
        assert_eq!(acc.into_totals()[&1], i32::MAX);
    }
}
