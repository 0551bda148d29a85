use sqlx::PgPool;

use crate::domain::usage::{SAMPLE_INTERVAL_MINUTES, SESSION_GAP};
use crate::domain::ApplianceUsage;

/// Database-side equivalent of [`crate::domain::usage::total_usage_minutes`].
///
/// `LAG` pairs every reading with its predecessor for the same appliance;
/// readings that follow it by less than the session gap are each credited one
/// sample interval. Appliances whose readings never continue a session are
/// still returned, with 0 minutes.
pub async fn total_usage_minutes(
    pool: &PgPool,
    appliance_name: Option<&str>,
) -> Result<Vec<ApplianceUsage>, sqlx::Error> {
    sqlx::query_as::<_, ApplianceUsage>(
        r#"
        WITH ordered_appliance AS (
            SELECT
                appliance_name,
                recorded_at_timestamp,
                LAG(recorded_at_timestamp) OVER (
                    PARTITION BY appliance_name
                    ORDER BY recorded_at_timestamp
                ) AS previous_timestamp
            FROM electricity_consumption
            WHERE ($3::text IS NULL OR appliance_name = $3)
        )
        SELECT
            appliance_name,
            COUNT(*) FILTER (
                WHERE recorded_at_timestamp - previous_timestamp < make_interval(secs => $1)
            ) * $2 AS total_usage_minutes
        FROM ordered_appliance
        GROUP BY appliance_name
        ORDER BY total_usage_minutes, appliance_name
        "#,
    )
    .bind(SESSION_GAP.as_seconds_f64())
    .bind(SAMPLE_INTERVAL_MINUTES)
    .bind(appliance_name)
    .fetch_all(pool)
    .await
}
