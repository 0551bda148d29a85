use time::PrimitiveDateTime;

/// One row of `electricity_consumption`.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Reading {
    pub appliance_name: String,
    pub power_consumption_val: i32,
    pub recorded_at_timestamp: PrimitiveDateTime,
}

/// Insert payload. When `recorded_at` is `None` the database clock assigns
/// the timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReading {
    pub appliance_name: String,
    pub power_consumption_val: i32,
    pub recorded_at: Option<PrimitiveDateTime>,
}
