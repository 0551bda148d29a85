pub mod backfill;
pub mod config;
pub mod error;
pub mod generator;
pub mod observability;
pub mod power;
pub mod report;
pub mod schedule;
pub mod store;

pub use error::SimulationError;
pub use generator::Simulation;
