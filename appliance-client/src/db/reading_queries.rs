use sqlx::PgPool;

use crate::domain::{NewReading, Reading};

/// Append one reading and return the row as stored.
///
/// A missing `recorded_at` falls back to the database's `LOCALTIMESTAMP`, so
/// live runs are stamped by the server clock.
pub async fn insert_reading(pool: &PgPool, reading: &NewReading) -> Result<Reading, sqlx::Error> {
    sqlx::query_as::<_, Reading>(
        r#"
        INSERT INTO electricity_consumption (
            appliance_name,
            power_consumption_val,
            recorded_at_timestamp
        )
        VALUES ($1, $2, COALESCE($3::timestamp, LOCALTIMESTAMP))
        RETURNING
            appliance_name,
            power_consumption_val,
            recorded_at_timestamp
        "#,
    )
    .bind(&reading.appliance_name)
    .bind(reading.power_consumption_val)
    .bind(reading.recorded_at)
    .fetch_one(pool)
    .await
}

/// Fetch readings ordered by appliance then timestamp, optionally for a
/// single appliance.
pub async fn query_readings(
    pool: &PgPool,
    appliance_name: Option<&str>,
) -> Result<Vec<Reading>, sqlx::Error> {
    sqlx::query_as::<_, Reading>(
        r#"
        SELECT
            appliance_name,
            power_consumption_val,
            recorded_at_timestamp
        FROM electricity_consumption
        WHERE ($1::text IS NULL OR appliance_name = $1)
        ORDER BY appliance_name, recorded_at_timestamp
        "#,
    )
    .bind(appliance_name)
    .fetch_all(pool)
    .await
}
