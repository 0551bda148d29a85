use anyhow::Result;
use simulation_service::{
    config::AppConfig,
    error::ConfigError,
    SimulationError,
    generator::{display_timestamp, Simulation},
    observability,
    schedule::Schedule,
    store::{MemoryReadingStore, PgReadingStore, ReadingStore},
};
use std::env;
use time::{OffsetDateTime, PrimitiveDateTime};

/// One simulation pass, meant to be triggered every few minutes by an
/// external scheduler.
///
/// Usage:
///   simulation-service [--dry-run]
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let dry_run = env::args().skip(1).any(|arg| arg == "--dry-run");

    // Tracing needs the log file setting, so a config error is reported after init.
    let cfg = AppConfig::load();
    let log_file = cfg.as_ref().ok().and_then(|c| c.logging.file.clone());
    observability::init_tracing(log_file.as_deref())?;

    let result = run(cfg, dry_run).await;
    if let Err(e) = &result {
        tracing::error!(error = %e, "Simulation ended with error");
    }
    Ok(result?)
}

async fn run(cfg: Result<AppConfig, ConfigError>, dry_run: bool) -> Result<(), SimulationError> {
    let cfg = cfg?;
    let offset = cfg.utc_offset()?;
    let now = OffsetDateTime::now_utc().to_offset(offset);
    tracing::info!(
        "[{}] Simulation initiated...",
        display_timestamp(PrimitiveDateTime::new(now.date(), now.time()))
    );

    let schedule = Schedule::new(cfg.schedule)?;

    if dry_run {
        let store = MemoryReadingStore::new(offset);
        let inserted = simulate(&store, &schedule, now).await?;
        tracing::info!(inserted, "Dry run completed, nothing was written to the database.");
        return Ok(());
    }

    let store = PgReadingStore::connect(&cfg.database_url()?, cfg.database.max_connections).await?;
    let outcome = simulate(&store, &schedule, now).await;
    store.close().await;

    let inserted = outcome?;
    tracing::info!(inserted, "Simulation completed successfully.");
    Ok(())
}

async fn simulate(
    store: &dyn ReadingStore,
    schedule: &Schedule,
    now: OffsetDateTime,
) -> Result<u64, SimulationError> {
    let mut sim = Simulation::new(store, schedule);
    sim.run(now).await?;
    Ok(sim.inserted())
}

#[cfg(test)]
mod tests {
    use super::*;
    use simulation_service::schedule::HourRange;

    #[tokio::test]
    async fn config_failures_surface_as_simulation_errors() {
        let err = run(Err(ConfigError::MissingParameter("HOST_NAME")), true)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SimulationError::Config(ConfigError::MissingParameter("HOST_NAME"))
        ));

        let mut cfg = AppConfig::default();
        cfg.simulation.utc_offset = Some("UTC".to_string());
        cfg.schedule.portable_ac.night_upper = HourRange::new(20, 16);
        let err = run(Ok(cfg), true).await.unwrap_err();
        assert!(matches!(
            err,
            SimulationError::Config(ConfigError::InvalidHourRange { min: 20, max: 16, .. })
        ));
    }

    #[tokio::test]
    async fn dry_run_needs_no_database() {
        let mut cfg = AppConfig::default();
        cfg.simulation.utc_offset = Some("+08:00".to_string());
        run(Ok(cfg), true).await.unwrap();
    }
}
