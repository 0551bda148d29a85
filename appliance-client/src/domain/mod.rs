pub mod appliance;
pub mod reading;
pub mod usage;

pub use appliance::{Appliance, UnknownAppliance};
pub use reading::{NewReading, Reading};
pub use usage::{ApplianceUsage, UsageSession};
