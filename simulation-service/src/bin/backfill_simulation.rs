use anyhow::{bail, Context, Result};
use simulation_service::{
    backfill::backfill,
    config::AppConfig,
    error::ConfigError,
    observability,
    schedule::Schedule,
    store::{MemoryReadingStore, PgReadingStore},
};
use std::env;
use time::{format_description::well_known::Rfc3339, OffsetDateTime};

const USAGE: &str = "usage: backfill_simulation <start_rfc3339> <end_rfc3339> [--dry-run]";

/// Populate `electricity_consumption` with simulated history.
///
/// Usage:
///   backfill_simulation <start_rfc3339> <end_rfc3339> [--dry-run]
///
/// The schedule reads the hour of day in each timestamp's own offset.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Tracing needs the log file setting, so a config error is reported after init.
    let cfg = AppConfig::load();
    let log_file = cfg.as_ref().ok().and_then(|c| c.logging.file.clone());
    observability::init_tracing(log_file.as_deref())?;

    let result = run(cfg).await;
    if let Err(e) = &result {
        tracing::error!(error = %e, "backfill ended with error");
    }
    result
}

async fn run(cfg: Result<AppConfig, ConfigError>) -> Result<()> {
    let cfg = cfg?;
    let args: Vec<String> = env::args().skip(1).collect();
    let dry_run = args.iter().any(|a| a == "--dry-run");
    let positional: Vec<&str> = args
        .iter()
        .filter(|a| !a.starts_with("--"))
        .map(String::as_str)
        .collect();
    let [start, end] = positional[..] else {
        bail!(USAGE);
    };

    let start = OffsetDateTime::parse(start, &Rfc3339)
        .with_context(|| format!("invalid start timestamp '{start}'"))?;
    let end = OffsetDateTime::parse(end, &Rfc3339)
        .with_context(|| format!("invalid end timestamp '{end}'"))?;
    if end < start {
        bail!("end {end} is before start {start}");
    }

    let schedule = Schedule::new(cfg.schedule)?;

    let inserted = if dry_run {
        let store = MemoryReadingStore::new(start.offset());
        backfill(&store, &schedule, start, end).await?
    } else {
        let store =
            PgReadingStore::connect(&cfg.database_url()?, cfg.database.max_connections).await?;
        let result = backfill(&store, &schedule, start, end).await;
        store.close().await;
        result?
    };

    tracing::info!(inserted, dry_run, "backfill completed");
    Ok(())
}
