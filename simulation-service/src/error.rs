use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("missing connection parameter {0}")]
    MissingParameter(&'static str),
    #[error("invalid hour range for {name}: [{min}, {max}]")]
    InvalidHourRange {
        name: &'static str,
        min: u8,
        max: u8,
    },
    #[error("invalid utc_offset '{0}'")]
    InvalidUtcOffset(String),
}

#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("nominal wattage must be positive, got {0}")]
    InvalidNominalWattage(i32),
}

#[derive(thiserror::Error, Debug)]
pub enum SimulationError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("schedule error: {0}")]
    Schedule(#[from] ScheduleError),
}
