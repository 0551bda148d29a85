use appliance_client::domain::{Appliance, NewReading, Reading};
use time::{macros::format_description, OffsetDateTime, PrimitiveDateTime};

use crate::error::SimulationError;
use crate::power::generate_power;
use crate::schedule::Schedule;
use crate::store::ReadingStore;

/// Where the stored timestamp of a reading comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stamping {
    /// The store assigns its own clock (live runs).
    ServerClock,
    /// The simulated instant passed to [`Simulation::emit`] is stored (backfills).
    SimulatedClock,
}

/// One simulation run: the store and schedule it works against and the
/// counter of readings inserted so far.
pub struct Simulation<'a, S: ReadingStore + ?Sized> {
    store: &'a S,
    schedule: &'a Schedule,
    stamping: Stamping,
    inserted: u64,
}

impl<'a, S: ReadingStore + ?Sized> Simulation<'a, S> {
    pub fn new(store: &'a S, schedule: &'a Schedule) -> Self {
        Self {
            store,
            schedule,
            stamping: Stamping::ServerClock,
            inserted: 0,
        }
    }

    pub fn with_stamping(mut self, stamping: Stamping) -> Self {
        self.stamping = stamping;
        self
    }

    /// Readings inserted by this run so far.
    pub fn inserted(&self) -> u64 {
        self.inserted
    }

    /// Insert one reading for `appliance` if its schedule is active at `now`.
    pub async fn emit(
        &mut self,
        appliance: Appliance,
        now: OffsetDateTime,
    ) -> Result<Option<Reading>, SimulationError> {
        if !self.schedule.is_active(appliance, now) {
            tracing::debug!(%appliance, hour = now.hour(), "appliance idle");
            return Ok(None);
        }

        let watts = generate_power(appliance.nominal_watts())?;
        let recorded_at = match self.stamping {
            Stamping::ServerClock => None,
            Stamping::SimulatedClock => Some(PrimitiveDateTime::new(now.date(), now.time())),
        };

        let stored = self
            .store
            .insert_reading(NewReading {
                appliance_name: appliance.name().to_string(),
                power_consumption_val: watts,
                recorded_at,
            })
            .await?;

        self.inserted += 1;
        tracing::info!(
            counter = self.inserted,
            %appliance,
            watts,
            "({}) INSERTED {} into DB with power {}W at {}",
            self.inserted,
            appliance,
            watts,
            display_timestamp(stored.recorded_at_timestamp)
        );

        Ok(Some(stored))
    }

    /// Visit every appliance in catalogue order. The first failure aborts the
    /// remaining appliances.
    pub async fn run(&mut self, now: OffsetDateTime) -> Result<Vec<Reading>, SimulationError> {
        let mut emitted = Vec::with_capacity(Appliance::ALL.len());
        for appliance in Appliance::ALL {
            if let Some(reading) = self.emit(appliance, now).await? {
                emitted.push(reading);
            }
        }
        Ok(emitted)
    }
}

pub fn display_timestamp(ts: PrimitiveDateTime) -> String {
    ts.format(format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"))
        .unwrap_or_else(|_| ts.to_string())
}
