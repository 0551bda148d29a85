use std::{io::Write, str::FromStr};

use appliance_client::domain::ApplianceUsage;

const NAME_HEADER: &str = "Appliance";
const MINUTES_HEADER: &str = "Total time used (min)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
    Csv,
}

impl FromStr for ReportFormat {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            "csv" => Ok(ReportFormat::Csv),
            other => Err(ReportError::UnknownFormat(other.to_string())),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ReportError {
    #[error("unknown report format '{0}' (expected text, json or csv)")]
    UnknownFormat(String),
    #[error("failed to write report: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode report as JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to encode report as CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// Write `usage` in the order given.
pub fn render<W: Write>(
    usage: &[ApplianceUsage],
    format: ReportFormat,
    mut out: W,
) -> Result<(), ReportError> {
    match format {
        ReportFormat::Text => {
            let width = usage
                .iter()
                .map(|u| u.appliance_name.len())
                .chain(std::iter::once(NAME_HEADER.len()))
                .max()
                .unwrap_or(NAME_HEADER.len());

            writeln!(out, "{NAME_HEADER:<width$}  {MINUTES_HEADER:>21}")?;
            for u in usage {
                writeln!(
                    out,
                    "{:<width$}  {:>21}",
                    u.appliance_name, u.total_usage_minutes
                )?;
            }
        }
        ReportFormat::Json => {
            serde_json::to_writer_pretty(&mut out, usage)?;
            writeln!(out)?;
        }
        ReportFormat::Csv => {
            let mut writer = csv::Writer::from_writer(out);
            for u in usage {
                writer.serialize(u)?;
            }
            writer.flush()?;
        }
    }
    Ok(())
}
