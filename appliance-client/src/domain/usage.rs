//! Session reconstruction over stored readings.
//!
//! A usage session is a maximal run of readings for one appliance where each
//! reading follows its predecessor by less than [`SESSION_GAP`]. Every reading
//! after the first in a session is credited one [`SAMPLE_INTERVAL_MINUTES`]
//! slot; the session's opening reading is credited nothing. The totals are
//! only meaningful while the generator runs on the same cadence, so the
//! backfill driver steps by the same constant.

use std::collections::BTreeMap;

use time::{Duration, PrimitiveDateTime};

use super::Reading;

/// Expected spacing between generator invocations, in minutes.
pub const SAMPLE_INTERVAL_MINUTES: i64 = 5;

/// Readings strictly closer than this continue the current session.
pub const SESSION_GAP: Duration = Duration::minutes(6);

/// A derived, never persisted, run of closely spaced readings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageSession {
    pub appliance_name: String,
    pub started_at: PrimitiveDateTime,
    pub ended_at: PrimitiveDateTime,
    pub reading_count: usize,
}

impl UsageSession {
    fn open(reading: &Reading) -> Self {
        Self {
            appliance_name: reading.appliance_name.clone(),
            started_at: reading.recorded_at_timestamp,
            ended_at: reading.recorded_at_timestamp,
            reading_count: 1,
        }
    }

    /// Minutes this session contributes to its appliance's total.
    pub fn usage_minutes(&self) -> i64 {
        (self.reading_count as i64 - 1) * SAMPLE_INTERVAL_MINUTES
    }
}

/// Total usage for one appliance.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ApplianceUsage {
    pub appliance_name: String,
    pub total_usage_minutes: i64,
}

/// Partition `readings` into sessions, ordered by appliance name then start.
///
/// The input does not need to be sorted.
pub fn sessions(readings: &[Reading]) -> Vec<UsageSession> {
    let mut ordered: Vec<&Reading> = readings.iter().collect();
    ordered.sort_by(|a, b| {
        a.appliance_name
            .cmp(&b.appliance_name)
            .then(a.recorded_at_timestamp.cmp(&b.recorded_at_timestamp))
    });

    let mut out: Vec<UsageSession> = Vec::new();
    for reading in ordered {
        match out.last_mut() {
            Some(current)
                if current.appliance_name == reading.appliance_name
                    && reading.recorded_at_timestamp - current.ended_at < SESSION_GAP =>
            {
                current.ended_at = reading.recorded_at_timestamp;
                current.reading_count += 1;
            }
            _ => out.push(UsageSession::open(reading)),
        }
    }

    out
}

/// Total usage minutes per appliance, ascending by minutes (ties by name).
///
/// Appliances without readings are absent; an appliance whose readings never
/// continue a session is reported with 0 minutes.
pub fn total_usage_minutes(readings: &[Reading]) -> Vec<ApplianceUsage> {
    let mut totals: BTreeMap<String, i64> = BTreeMap::new();
    for session in sessions(readings) {
        let minutes = session.usage_minutes();
        *totals.entry(session.appliance_name).or_default() += minutes;
    }

    let mut out: Vec<ApplianceUsage> = totals
        .into_iter()
        .map(|(appliance_name, total_usage_minutes)| ApplianceUsage {
            appliance_name,
            total_usage_minutes,
        })
        .collect();
    // Stable sort keeps the BTreeMap name order for equal totals.
    out.sort_by_key(|u| u.total_usage_minutes);
    out
}
