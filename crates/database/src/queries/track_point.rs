use model::{fix::Fix, window::TimeWindow};
use sqlx::{Executor, Postgres};
use tracking::database::Result;
use utility::let_also::LetAlso;

use crate::data_model::track_point::TrackPointRow;

use super::convert_error;

pub async fn insert<'c, E>(executor: E, fix: Fix) -> Result<()>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query(
        "
        INSERT INTO track_points(
            device_id,
            latitude,
            longitude,
            geom,
            created_at
        )
        VALUES ($1, $2, $3, ST_SetSRID(ST_MakePoint($3, $2), 4326), $4);
        ",
    )
    .bind(fix.device_id)
    .bind(fix.latitude)
    .bind(fix.longitude)
    .bind(fix.timestamp)
    .execute(executor)
    .await
    .map_err(convert_error)?;
    Ok(())
}

/// Both bounds are bound as NULL for an unbounded window.
pub async fn get_ordered<'c, E>(
    executor: E,
    device_id: &str,
    window: TimeWindow,
) -> Result<Vec<Fix>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(
        "
        SELECT
            device_id, latitude, longitude, created_at
        FROM
            track_points
        WHERE
            device_id = $1
            AND ($2::timestamptz IS NULL OR created_at >= $2)
            AND ($3::timestamptz IS NULL OR created_at < $3)
        ORDER BY
            created_at ASC, id ASC;
        ",
    )
    .bind(device_id)
    .bind(window.start())
    .bind(window.end())
    .fetch_all(executor)
    .await
    .map_err(convert_error)?
    .into_iter()
    .map(|row: TrackPointRow| row.to_model())
    .collect::<Vec<_>>()
    .let_owned(Ok)
}

/// `ST_MakeLine` over no rows is NULL, which comes back as `None`.
pub async fn get_line_geojson<'c, E>(
    executor: E,
    device_id: &str,
    window: TimeWindow,
) -> Result<Option<String>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_scalar::<_, Option<String>>(
        "
        SELECT
            ST_AsGeoJSON(ST_MakeLine(geom ORDER BY created_at ASC, id ASC))
        FROM
            track_points
        WHERE
            device_id = $1
            AND ($2::timestamptz IS NULL OR created_at >= $2)
            AND ($3::timestamptz IS NULL OR created_at < $3);
        ",
    )
    .bind(device_id)
    .bind(window.start())
    .bind(window.end())
    .fetch_one(executor)
    .await
    .map_err(convert_error)
}
