//! Day-seeded activation windows.
//!
//! Each appliance's window for a calendar day is drawn from a `StdRng` seeded
//! with `blake3(date, unit)`. Every invocation on the same day therefore sees
//! the same window, while different days and different units draw
//! independently. The generator is created per call and never shared.

use appliance_client::domain::Appliance;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::Deserialize;
use time::{Date, OffsetDateTime};

use crate::error::ConfigError;

const PORTABLE_AC_UNIT: u8 = 0;
const WALL_MOUNTED_AC_UNIT: u8 = 1;

/// Inclusive range of hours a bound is drawn from. Deserialized from `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(from = "(u8, u8)")]
pub struct HourRange {
    pub min: u8,
    pub max: u8,
}

impl HourRange {
    pub const fn new(min: u8, max: u8) -> Self {
        Self { min, max }
    }

    fn draw<R: Rng>(&self, rng: &mut R) -> u8 {
        rng.random_range(self.min..=self.max)
    }

    fn check(&self, name: &'static str) -> Result<(), ConfigError> {
        if self.min > self.max || self.max > 23 {
            return Err(ConfigError::InvalidHourRange {
                name,
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

impl From<(u8, u8)> for HourRange {
    fn from((min, max): (u8, u8)) -> Self {
        Self::new(min, max)
    }
}

/// Air conditioners run in the morning up to one bound and again from the
/// evening bound onwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct AcProfile {
    pub morning_upper: HourRange,
    pub night_upper: HourRange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct WashingMachineProfile {
    pub morning_lower: HourRange,
    pub morning_upper: HourRange,
}

/// Per-appliance ranges the daily bounds are drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    pub portable_ac: AcProfile,
    pub wall_mounted_ac: AcProfile,
    pub washing_machine: WashingMachineProfile,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            portable_ac: AcProfile {
                morning_upper: HourRange::new(9, 12),
                night_upper: HourRange::new(16, 20),
            },
            wall_mounted_ac: AcProfile {
                morning_upper: HourRange::new(6, 10),
                night_upper: HourRange::new(18, 20),
            },
            washing_machine: WashingMachineProfile {
                morning_lower: HourRange::new(6, 7),
                morning_upper: HourRange::new(7, 9),
            },
        }
    }
}

impl ScheduleConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.portable_ac.morning_upper.check("portable_ac.morning_upper")?;
        self.portable_ac.night_upper.check("portable_ac.night_upper")?;
        self.wall_mounted_ac.morning_upper.check("wall_mounted_ac.morning_upper")?;
        self.wall_mounted_ac.night_upper.check("wall_mounted_ac.night_upper")?;
        self.washing_machine.morning_lower.check("washing_machine.morning_lower")?;
        self.washing_machine.morning_upper.check("washing_machine.morning_upper")?;
        Ok(())
    }
}

/// Hours of one day during which an appliance is considered in use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationWindow {
    Always,
    /// Active at or before `morning_upper`, or at or after `night_upper`.
    MorningAndNight { morning_upper: u8, night_upper: u8 },
    /// Active from `lower` through `upper`, inclusive.
    Between { lower: u8, upper: u8 },
}

impl ActivationWindow {
    pub fn contains(&self, hour: u8) -> bool {
        match *self {
            ActivationWindow::Always => true,
            ActivationWindow::MorningAndNight {
                morning_upper,
                night_upper,
            } => hour <= morning_upper || hour >= night_upper,
            ActivationWindow::Between { lower, upper } => hour >= lower && hour <= upper,
        }
    }
}

/// Seed for one calendar day, optionally scoped to a unit.
pub fn day_seed(date: Date, unit: Option<u8>) -> [u8; 32] {
    let mut h = blake3::Hasher::new();
    h.update(&date.year().to_le_bytes());
    h.update(&[u8::from(date.month()), date.day()]);
    match unit {
        Some(id) => {
            h.update(&[1, id]);
        }
        None => {
            h.update(&[0]);
        }
    }
    *h.finalize().as_bytes()
}

fn day_rng(date: Date, unit: Option<u8>) -> StdRng {
    StdRng::from_seed(day_seed(date, unit))
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Schedule {
    config: ScheduleConfig,
}

impl Schedule {
    /// Rejects hour ranges the daily draw could not sample from.
    pub fn new(config: ScheduleConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The window `appliance` follows on `date`. Pure in its arguments.
    pub fn window(&self, appliance: Appliance, date: Date) -> ActivationWindow {
        match appliance {
            Appliance::Refrigerator => ActivationWindow::Always,
            Appliance::PortableAc => ac_window(&self.config.portable_ac, date, PORTABLE_AC_UNIT),
            Appliance::WallMountedAc => {
                ac_window(&self.config.wall_mounted_ac, date, WALL_MOUNTED_AC_UNIT)
            }
            Appliance::WashingMachine => {
                let profile = &self.config.washing_machine;
                let mut rng = day_rng(date, None);
                let lower = profile.morning_lower.draw(&mut rng);
                let upper = profile.morning_upper.draw(&mut rng);
                ActivationWindow::Between { lower, upper }
            }
        }
    }

    /// Whether `appliance` is in use at `now`, read in `now`'s own offset.
    pub fn is_active(&self, appliance: Appliance, now: OffsetDateTime) -> bool {
        self.window(appliance, now.date()).contains(now.hour())
    }
}

fn ac_window(profile: &AcProfile, date: Date, unit: u8) -> ActivationWindow {
    let mut rng = day_rng(date, Some(unit));
    let morning_upper = profile.morning_upper.draw(&mut rng);
    let night_upper = profile.night_upper.draw(&mut rng);
    ActivationWindow::MorningAndNight {
        morning_upper,
        night_upper,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime};
    use time::Duration;

    fn october_2025() -> impl Iterator<Item = Date> {
        (0..31).map(|d| date!(2025-10-01) + Duration::days(d))
    }

    #[test]
    fn refrigerator_is_always_active() {
        let schedule = Schedule::default();
        let start = datetime!(2025-10-01 00:00:00 UTC);
        for h in 0..(24 * 3) {
            assert!(schedule.is_active(Appliance::Refrigerator, start + Duration::hours(h)));
        }
    }

    #[test]
    fn windows_are_stable_within_a_day() {
        let schedule = Schedule::default();
        for appliance in Appliance::ALL {
            let day = date!(2025-10-14);
            assert_eq!(schedule.window(appliance, day), schedule.window(appliance, day));
        }

        let morning = datetime!(2025-10-14 07:00:00 UTC);
        let evening = datetime!(2025-10-14 19:00:00 UTC);
        assert_eq!(
            Schedule::default().window(Appliance::PortableAc, morning.date()),
            Schedule::default().window(Appliance::PortableAc, evening.date())
        );
    }

    #[test]
    fn windows_vary_across_days() {
        let schedule = Schedule::default();
        for appliance in [
            Appliance::PortableAc,
            Appliance::WallMountedAc,
            Appliance::WashingMachine,
        ] {
            let first = schedule.window(appliance, date!(2025-10-01));
            assert!(
                october_2025().any(|d| schedule.window(appliance, d) != first),
                "{appliance} drew the same window every day"
            );
        }
    }

    #[test]
    fn units_are_seeded_independently() {
        let day = date!(2025-10-01);
        assert_ne!(day_seed(day, Some(PORTABLE_AC_UNIT)), day_seed(day, Some(WALL_MOUNTED_AC_UNIT)));
        assert_ne!(day_seed(day, None), day_seed(day, Some(PORTABLE_AC_UNIT)));
        assert_ne!(day_seed(day, None), day_seed(day + Duration::days(1), None));
    }

    #[test]
    fn drawn_bounds_stay_in_configured_ranges() {
        let cfg = ScheduleConfig::default();
        let schedule = Schedule::new(cfg).unwrap();
        for day in october_2025() {
            match schedule.window(Appliance::PortableAc, day) {
                ActivationWindow::MorningAndNight {
                    morning_upper,
                    night_upper,
                } => {
                    assert!((9..=12).contains(&morning_upper));
                    assert!((16..=20).contains(&night_upper));
                }
                other => panic!("unexpected window {other:?}"),
            }
            match schedule.window(Appliance::WallMountedAc, day) {
                ActivationWindow::MorningAndNight {
                    morning_upper,
                    night_upper,
                } => {
                    assert!((6..=10).contains(&morning_upper));
                    assert!((18..=20).contains(&night_upper));
                }
                other => panic!("unexpected window {other:?}"),
            }
            match schedule.window(Appliance::WashingMachine, day) {
                ActivationWindow::Between { lower, upper } => {
                    assert!((6..=7).contains(&lower));
                    assert!((7..=9).contains(&upper));
                }
                other => panic!("unexpected window {other:?}"),
            }
        }
    }

    #[test]
    fn inverted_hour_range_is_rejected() {
        let mut cfg = ScheduleConfig::default();
        cfg.washing_machine.morning_upper = HourRange::new(12, 9);
        let err = Schedule::new(cfg).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidHourRange {
                name: "washing_machine.morning_upper",
                min: 12,
                max: 9,
            }
        ));

        cfg.washing_machine.morning_upper = HourRange::new(7, 24);
        assert!(Schedule::new(cfg).is_err());
    }

    #[test]
    fn is_active_follows_the_drawn_window() {
        let schedule = Schedule::default();
        let day = date!(2025-10-20);
        for appliance in Appliance::ALL {
            let window = schedule.window(appliance, day);
            for hour in 0..24u8 {
                let now = day.with_hms(hour, 30, 0).unwrap().assume_utc();
                assert_eq!(schedule.is_active(appliance, now), window.contains(hour));
            }
        }
    }

    #[test]
    fn washing_machine_never_runs_outside_the_morning() {
        let schedule = Schedule::default();
        for day in october_2025() {
            for hour in [0u8, 5, 10, 13, 18, 23] {
                let now = day.with_hms(hour, 0, 0).unwrap().assume_utc();
                assert!(!schedule.is_active(Appliance::WashingMachine, now));
            }
        }
    }

    #[test]
    fn window_boundaries_are_inclusive() {
        let ac = ActivationWindow::MorningAndNight {
            morning_upper: 9,
            night_upper: 18,
        };
        assert!(ac.contains(9));
        assert!(!ac.contains(10));
        assert!(!ac.contains(17));
        assert!(ac.contains(18));

        let washer = ActivationWindow::Between { lower: 6, upper: 8 };
        assert!(!washer.contains(5));
        assert!(washer.contains(6));
        assert!(washer.contains(8));
        assert!(!washer.contains(9));
    }
}
