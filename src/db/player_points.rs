use crate::models::points::{PlayerPointsRow, PlayerPointsWrite, SyncPlan};
use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};

pub async fn fetch_player_points(pool: &PgPool) -> Result<Vec<PlayerPointsRow>, sqlx::Error> {
    sqlx::query_as::<_, PlayerPointsRow>(
        r#"
        SELECT
            player_id,
            points,
            rank,
            world_records,
            created_at,
            updated_at
        FROM player_points
        "#,
    )
    .fetch_all(pool)
    .await
}

struct Columns {
    player_ids: Vec<i32>,
    points: Vec<i32>,
    ranks: Vec<i32>,
    world_records: Vec<i32>,
}

impl Columns {
    fn from_writes(writes: &[PlayerPointsWrite]) -> Self {
        Self {
            player_ids: writes.iter().map(|w| w.player_id).collect(),
            points: writes.iter().map(|w| w.points).collect(),
            ranks: writes.iter().map(|w| w.rank).collect(),
            world_records: writes.iter().map(|w| w.world_records).collect(),
        }
    }
}

async fn insert_player_points(
    conn: &mut PgConnection,
    writes: &[PlayerPointsWrite],
    now: DateTime<Utc>,
) -> Result<u64, sqlx::Error> {
    if writes.is_empty() {
        return Ok(0);
    }

    let cols = Columns::from_writes(writes);

    let result = sqlx::query(
        r#"
        INSERT INTO player_points (
            player_id,
            points,
            rank,
            world_records,
            created_at,
            updated_at
        )
        SELECT
            player_id,
            points,
            rank,
            world_records,
            $5,
            $5
        FROM UNNEST(
            $1::int4[],
            $2::int4[],
            $3::int4[],
            $4::int4[]
        ) AS t(
            player_id,
            points,
            rank,
            world_records
        )
        "#,
    )
    .bind(&cols.player_ids)
    .bind(&cols.points)
    .bind(&cols.ranks)
    .bind(&cols.world_records)
    .bind(now)
    .execute(conn)
    .await?;

    Ok(result.rows_affected())
}

async fn update_player_points(
    conn: &mut PgConnection,
    writes: &[PlayerPointsWrite],
    now: DateTime<Utc>,
) -> Result<u64, sqlx::Error> {
    if writes.is_empty() {
        return Ok(0);
    }

    let cols = Columns::from_writes(writes);

    let result = sqlx::query(
        r#"
        UPDATE player_points AS p
        SET
            points        = t.points,
            rank          = t.rank,
            world_records = t.world_records,
            updated_at    = $5
        FROM UNNEST(
            $1::int4[],
            $2::int4[],
            $3::int4[],
            $4::int4[]
        ) AS t(
            player_id,
            points,
            rank,
            world_records
        )
        WHERE p.player_id = t.player_id
        "#,
    )
    .bind(&cols.player_ids)
    .bind(&cols.points)
    .bind(&cols.ranks)
    .bind(&cols.world_records)
    .bind(now)
    .execute(conn)
    .await?;

    Ok(result.rows_affected())
}

/// Applies a sync plan as one transaction. Nothing is written if any
/// statement fails.
pub async fn commit_sync_plan(pool: &PgPool, plan: &SyncPlan) -> Result<(), sqlx::Error> {
    if plan.is_empty() {
        return Ok(());
    }

    let mut tx = pool.begin().await?;

    let inserted = insert_player_points(&mut tx, &plan.inserts, plan.now).await?;
    let updated = update_player_points(&mut tx, &plan.updates, plan.now).await?;

    tx.commit().await?;

    tracing::debug!(inserted, updated, "player_points batch committed");
    Ok(())
}
