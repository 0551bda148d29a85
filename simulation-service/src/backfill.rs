use appliance_client::domain::usage::SAMPLE_INTERVAL_MINUTES;
use time::{Duration, OffsetDateTime};

use crate::error::SimulationError;
use crate::generator::{Simulation, Stamping};
use crate::schedule::Schedule;
use crate::store::ReadingStore;

/// Replay the simulation on the sample cadence over `[start, end)`.
///
/// Readings carry the simulated instants, so the stored history has the
/// spacing the usage aggregation assumes. Returns the number of readings
/// inserted.
pub async fn backfill<S: ReadingStore + ?Sized>(
    store: &S,
    schedule: &Schedule,
    start: OffsetDateTime,
    end: OffsetDateTime,
) -> Result<u64, SimulationError> {
    let step = Duration::minutes(SAMPLE_INTERVAL_MINUTES);
    let mut sim = Simulation::new(store, schedule).with_stamping(Stamping::SimulatedClock);

    let mut next = Some(start);
    while let Some(now) = next.filter(|t| *t < end) {
        sim.run(now).await?;
        next = now.checked_add(step);
    }

    tracing::debug!(inserted = sim.inserted(), %start, %end, "backfill range exhausted");
    Ok(sim.inserted())
}
