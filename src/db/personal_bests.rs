use crate::models::points::{BestTimeEntry, ScoringInput};
use sqlx::{FromRow, PgConnection, PgPool};
use std::collections::HashMap;

#[derive(Debug, FromRow)]
struct LevelPointsRow {
    level_id: String,
    points: i32,
}

pub async fn fetch_best_times(conn: &mut PgConnection) -> Result<Vec<BestTimeEntry>, sqlx::Error> {
    sqlx::query_as::<_, BestTimeEntry>(
        r#"
        SELECT
            pb.id        AS created_order,
            pb.player_id AS player_id,
            pb.level_id  AS level_id,
            r.time       AS time
        FROM personal_bests pb
        LEFT JOIN records r
          ON r.id = pb.record_id
        ORDER BY pb.id
        "#,
    )
    .fetch_all(conn)
    .await
}

pub async fn count_players(conn: &mut PgConnection) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM players")
        .fetch_one(conn)
        .await
}

pub async fn fetch_level_points(
    conn: &mut PgConnection,
) -> Result<HashMap<String, i32>, sqlx::Error> {
    let rows = sqlx::query_as::<_, LevelPointsRow>(
        r#"
        SELECT level_id, points
        FROM level_points
        "#,
    )
    .fetch_all(conn)
    .await?;

    Ok(rows.into_iter().map(|r| (r.level_id, r.points)).collect())
}

/// Reads everything a scoring run needs inside one read-only snapshot.
pub async fn fetch_scoring_input(
    pool: &PgPool,
    with_level_pools: bool,
) -> Result<ScoringInput, sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
        .execute(&mut *tx)
        .await?;

    let entries = fetch_best_times(&mut tx).await?;
    let total_players = count_players(&mut tx).await?;
    let level_pools = if with_level_pools {
        fetch_level_points(&mut tx).await?
    } else {
        HashMap::new()
    };

    tx.commit().await?;

    Ok(ScoringInput {
        entries,
        total_players,
        level_pools,
    })
}
