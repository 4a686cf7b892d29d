use crate::db::PointsRepository;
use crate::error::PointsError;
use crate::models::points::{PointsHandoff, ScoringInput, SyncReport};
use crate::services::accumulate::PointsAccumulator;
use crate::services::aggregate::{rank_levels, world_record_counts};
use crate::services::rank::assign_ranks;
use crate::services::reconcile::plan_sync;
use crate::services::scoring::{Placement, ScoringPolicy};
use crate::utils::shutdown::Shutdown;
use chrono::Utc;
use tracing::{info, warn};

/// Turns one snapshot of personal bests into per-player totals.
pub fn compute_snapshot(input: &ScoringInput, policy: ScoringPolicy) -> PointsHandoff {
    let levels = rank_levels(&input.entries);
    let total_players = u32::try_from(input.total_players.max(0)).unwrap_or(u32::MAX);

    let mut accumulator = PointsAccumulator::new();
    for level in &levels {
        let level_pool = input.level_pools.get(&level.level_id).copied();
        if policy.uses_level_pools() && level_pool.is_none() {
            warn!(level_id = %level.level_id, "⚠️ no point pool configured, level scores zero");
        }

        let level_size = u32::try_from(level.len()).unwrap_or(u32::MAX);
        accumulator.add_level(level, |rank| {
            policy.points(&Placement {
                rank,
                level_size,
                total_players,
                level_pool,
            })
        });
    }

    PointsHandoff {
        points: accumulator.into_totals(),
        world_records: world_record_counts(&levels),
    }
}

/// Compute half of a chained run: reads the input and scores it.
pub async fn compute_step(
    repo: &dyn PointsRepository,
    policy: ScoringPolicy,
    shutdown: &Shutdown,
) -> Result<PointsHandoff, PointsError> {
    info!("📥 getting personal bests");
    let input = shutdown
        .run_until(repo.load_scoring_input(policy.uses_level_pools()))
        .await?;

    info!(
        entries = input.entries.len(),
        total_players = input.total_players,
        level_pools = input.level_pools.len(),
        "🧮 starting calculation"
    );
    Ok(compute_snapshot(&input, policy))
}

/// Apply half of a chained run: ranks the totals and reconciles them with the
/// stored rows.
pub async fn apply_step(
    repo: &dyn PointsRepository,
    handoff: &PointsHandoff,
    shutdown: &Shutdown,
) -> Result<SyncReport, PointsError> {
    info!("📝 updating points for {} players", handoff.points.len());

    let existing = shutdown.run_until(repo.load_player_points()).await?;
    let ranked = assign_ranks(&handoff.points);
    let plan = plan_sync(&ranked, &handoff.world_records, &existing, Utc::now());

    // once COMMIT may be on the wire the outcome is unknown, so the write
    // is never abandoned part way
    if shutdown.is_triggered() {
        return Err(PointsError::Cancelled);
    }
    repo.commit_sync(&plan).await?;

    Ok(plan.report())
}

/// Computes and persists in one pass.
pub async fn run_once(
    repo: &dyn PointsRepository,
    policy: ScoringPolicy,
    shutdown: &Shutdown,
) -> Result<SyncReport, PointsError> {
    let handoff = compute_step(repo, policy, shutdown).await?;
    apply_step(repo, &handoff, shutdown).await
}
