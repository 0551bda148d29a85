use appliance_client::domain::{NewReading, Reading};
use time::{OffsetDateTime, PrimitiveDateTime, UtcOffset};
use tokio::sync::Mutex;

use crate::error::StorageError;
use crate::store::ReadingStore;

/// In-process store used for dry runs and tests.
///
/// Readings without an explicit timestamp are stamped with the wall clock in
/// `offset`, never earlier than the previous server-stamped reading.
pub struct MemoryReadingStore {
    offset: UtcOffset,
    state: Mutex<State>,
}

#[derive(Default)]
struct State {
    rows: Vec<Reading>,
    last_stamp: Option<PrimitiveDateTime>,
}

impl MemoryReadingStore {
    pub fn new(offset: UtcOffset) -> Self {
        Self {
            offset,
            state: Mutex::new(State::default()),
        }
    }

    /// Every stored reading in insertion order.
    pub async fn snapshot(&self) -> Vec<Reading> {
        self.state.lock().await.rows.clone()
    }

    fn clock(&self) -> PrimitiveDateTime {
        let now = OffsetDateTime::now_utc().to_offset(self.offset);
        PrimitiveDateTime::new(now.date(), now.time())
    }
}

impl Default for MemoryReadingStore {
    fn default() -> Self {
        Self::new(UtcOffset::UTC)
    }
}

#[async_trait::async_trait]
impl ReadingStore for MemoryReadingStore {
    async fn insert_reading(&self, reading: NewReading) -> Result<Reading, StorageError> {
        let mut state = self.state.lock().await;

        let recorded_at_timestamp = match reading.recorded_at {
            Some(ts) => ts,
            None => {
                let now = self.clock();
                let stamp = state.last_stamp.map_or(now, |last| last.max(now));
                state.last_stamp = Some(stamp);
                stamp
            }
        };

        let stored = Reading {
            appliance_name: reading.appliance_name,
            power_consumption_val: reading.power_consumption_val,
            recorded_at_timestamp,
        };
        state.rows.push(stored.clone());
        Ok(stored)
    }

    async fn query_readings(
        &self,
        appliance_name: Option<&str>,
    ) -> Result<Vec<Reading>, StorageError> {
        let state = self.state.lock().await;
        let mut rows: Vec<Reading> = state
            .rows
            .iter()
            .filter(|r| appliance_name.map_or(true, |name| r.appliance_name == name))
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            a.appliance_name
                .cmp(&b.appliance_name)
                .then(a.recorded_at_timestamp.cmp(&b.recorded_at_timestamp))
        });
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn new_reading(name: &str, watts: i32, at: Option<PrimitiveDateTime>) -> NewReading {
        NewReading {
            appliance_name: name.to_string(),
            power_consumption_val: watts,
            recorded_at: at,
        }
    }

    #[tokio::test]
    async fn explicit_timestamps_are_kept_and_queries_are_ordered() {
        let store = MemoryReadingStore::default();
        store
            .insert_reading(new_reading("Washing Machine", 990, Some(datetime!(2025-10-01 07:05))))
            .await
            .unwrap();
        store
            .insert_reading(new_reading("Refrigerator", 300, Some(datetime!(2025-10-01 07:10))))
            .await
            .unwrap();
        store
            .insert_reading(new_reading("Refrigerator", 301, Some(datetime!(2025-10-01 07:00))))
            .await
            .unwrap();

        let all = store.query_readings(None).await.unwrap();
        let order: Vec<(&str, i32)> = all
            .iter()
            .map(|r| (r.appliance_name.as_str(), r.power_consumption_val))
            .collect();
        assert_eq!(
            order,
            vec![("Refrigerator", 301), ("Refrigerator", 300), ("Washing Machine", 990)]
        );

        let fridge = store.query_readings(Some("Refrigerator")).await.unwrap();
        assert_eq!(fridge.len(), 2);
        assert_eq!(store.snapshot().await.len(), 3);
    }

    #[tokio::test]
    async fn server_stamps_never_go_backwards() {
        let store = MemoryReadingStore::default();
        let mut previous = None;
        for _ in 0..10 {
            let stored = store
                .insert_reading(new_reading("Refrigerator", 300, None))
                .await
                .unwrap();
            if let Some(prev) = previous {
                assert!(stored.recorded_at_timestamp >= prev);
            }
            previous = Some(stored.recorded_at_timestamp);
        }
    }
}
