use serde::{Deserialize, Serialize};

/// Bonus for the first eight placements of a level, indexed by `rank - 1`.
const PLACEMENT_BONUS: [f64; 8] = [0.21, 0.13, 0.08, 0.05, 0.03, 0.02, 0.01, 0.01];

/// From this placement on the yield is always the floor value.
const YIELD_FLOOR_RANK: u32 = 25;
const YIELD_FLOOR: f64 = 5.0;
const YIELD_DECAY: f64 = 0.15;

/// A single entry's standing, as seen by a scoring policy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// 1-based position within the level.
    pub rank: u32,
    pub level_size: u32,
    pub total_players: u32,
    pub level_pool: Option<i32>,
}

/// How a placement on a level turns into points. One policy is active per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringPolicy {
    /// Placement points scaled by how contested the level is, plus a small
    /// bonus for the top eight.
    LinearPlacementBonus,
    /// A share of the level's configured point pool that decays with rank.
    PercentageYieldOfPool,
}

impl ScoringPolicy {
    pub fn uses_level_pools(self) -> bool {
        matches!(self, ScoringPolicy::PercentageYieldOfPool)
    }

    /// Points for one placement. Fractions are rounded half to even.
    pub fn points(self, placement: &Placement) -> i32 {
        if placement.rank == 0 {
            return 0;
        }

        match self {
            ScoringPolicy::LinearPlacementBonus => linear_placement_points(placement),
            ScoringPolicy::PercentageYieldOfPool => {
                pool_share(percentage_yield(placement.rank), placement.level_pool)
            }
        }
    }
}

fn linear_placement_points(p: &Placement) -> i32 {
    let level_size = f64::from(p.level_size);
    let rank = f64::from(p.rank);
    let base = (level_size - rank + 1.0).max(0.0);

    // no player count yet: score as if the level were the whole field
    let total = if p.total_players == 0 {
        level_size
    } else {
        f64::from(p.total_players)
    };
    let density = 1.0 / (total / level_size);

    round_half_even(base * (1.0 + density / rank) + placement_bonus(p.rank))
}

fn placement_bonus(rank: u32) -> f64 {
    rank.checked_sub(1)
        .and_then(|i| PLACEMENT_BONUS.get(i as usize))
        .copied()
        .unwrap_or(0.0)
}

/// Percentage of the level pool paid out at `rank`.
pub fn percentage_yield(rank: u32) -> f64 {
    match rank {
        0 => 0.0,
        1 => 100.0,
        r if r >= YIELD_FLOOR_RANK => YIELD_FLOOR,
        r => {
            let decayed = (100.0 * (-YIELD_DECAY * f64::from(r - 1)).exp()).round_ties_even();
            decayed.max(YIELD_FLOOR)
        }
    }
}

fn pool_share(yield_pct: f64, pool: Option<i32>) -> i32 {
    let pool = f64::from(pool.unwrap_or(0).max(0));
    (yield_pct * pool / 100.0).floor() as i32
}

fn round_half_even(value: f64) -> i32 {
    value.round_ties_even() as i32
}
