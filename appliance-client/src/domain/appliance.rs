use std::{fmt, str::FromStr};

/// The fixed set of simulated household appliances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Appliance {
    Refrigerator,
    PortableAc,
    WallMountedAc,
    WashingMachine,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown appliance '{0}'")]
pub struct UnknownAppliance(pub String);

impl Appliance {
    /// Every appliance in the order a simulation run visits them.
    pub const ALL: [Appliance; 4] = [
        Appliance::Refrigerator,
        Appliance::PortableAc,
        Appliance::WallMountedAc,
        Appliance::WashingMachine,
    ];

    /// Name stored in `electricity_consumption.appliance_name`.
    pub fn name(self) -> &'static str {
        match self {
            Appliance::Refrigerator => "Refrigerator",
            Appliance::PortableAc => "Europace Portable AC",
            Appliance::WallMountedAc => "Wall mounted AC",
            Appliance::WashingMachine => "Washing Machine",
        }
    }

    /// Rated power draw in watts before random variation.
    pub fn nominal_watts(self) -> i32 {
        match self {
            Appliance::Refrigerator => 300,
            Appliance::PortableAc => 2100,
            Appliance::WallMountedAc => 3500,
            Appliance::WashingMachine => 1000,
        }
    }
}

impl fmt::Display for Appliance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Appliance {
    type Err = UnknownAppliance;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Appliance::ALL
            .into_iter()
            .find(|a| a.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownAppliance(trimmed.to_string()))
    }
}
