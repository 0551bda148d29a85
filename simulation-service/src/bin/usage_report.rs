use anyhow::{bail, Result};
use appliance_client::{
    db::usage_queries,
    domain::{usage::total_usage_minutes, Appliance, ApplianceUsage},
};
use simulation_service::{
    config::AppConfig,
    error::{ConfigError, StorageError},
    observability,
    report::{self, ReportFormat},
    store::{PgReadingStore, ReadingStore},
};
use std::{env, io};

const USAGE: &str =
    "usage: usage_report [--format text|json|csv] [--appliance <name>] [--pushdown]";

struct Args {
    format: ReportFormat,
    appliance: Option<Appliance>,
    pushdown: bool,
}

fn parse_args() -> Result<Args> {
    let mut args = Args {
        format: ReportFormat::default(),
        appliance: None,
        pushdown: false,
    };

    let mut iter = env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--format" => match iter.next() {
                Some(v) => args.format = v.parse()?,
                None => bail!(USAGE),
            },
            "--appliance" => match iter.next() {
                Some(v) => args.appliance = Some(v.parse()?),
                None => bail!(USAGE),
            },
            "--pushdown" => args.pushdown = true,
            _ => bail!(USAGE),
        }
    }

    Ok(args)
}

/// Print total usage minutes per appliance, least used first.
///
/// By default readings are loaded and sessions rebuilt in process; with
/// `--pushdown` the equivalent window query runs in Postgres instead.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Tracing needs the log file setting, so a config error is reported after init.
    let cfg = AppConfig::load();
    let log_file = cfg.as_ref().ok().and_then(|c| c.logging.file.clone());
    observability::init_tracing(log_file.as_deref())?;

    let result = run(cfg).await;
    if let Err(e) = &result {
        tracing::error!(error = %e, "usage report failed");
    }
    result
}

async fn run(cfg: Result<AppConfig, ConfigError>) -> Result<()> {
    let cfg = cfg?;
    let args = parse_args()?;
    let appliance_name = args.appliance.map(Appliance::name);

    let store = PgReadingStore::connect(&cfg.database_url()?, cfg.database.max_connections).await?;
    let usage: Result<Vec<ApplianceUsage>, StorageError> = if args.pushdown {
        usage_queries::total_usage_minutes(store.pool(), appliance_name)
            .await
            .map_err(StorageError::from)
    } else {
        store
            .query_readings(appliance_name)
            .await
            .map(|readings| total_usage_minutes(&readings))
    };
    store.close().await;
    let usage = usage?;

    tracing::info!(appliances = usage.len(), pushdown = args.pushdown, "usage aggregated");
    report::render(&usage, args.format, io::stdout().lock())?;

    Ok(())
}
