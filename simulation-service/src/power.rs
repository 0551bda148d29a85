use rand::Rng;

use crate::error::ScheduleError;

/// Relative spread of a reading around the nominal rating.
pub const POWER_VARIATION: f64 = 0.05;

/// Inclusive `[round(p * 0.95), round(p * 1.05)]` for a positive rating `p`.
///
/// Halves round to even, so a band like 50 W stays symmetric at 48..=52.
pub fn power_bounds(nominal_watts: i32) -> Result<(i32, i32), ScheduleError> {
    if nominal_watts <= 0 {
        return Err(ScheduleError::InvalidNominalWattage(nominal_watts));
    }

    let nominal = f64::from(nominal_watts);
    let lower = (nominal * (1.0 - POWER_VARIATION)).round_ties_even() as i32;
    let upper = (nominal * (1.0 + POWER_VARIATION)).round_ties_even() as i32;
    Ok((lower, upper))
}

/// Draw a reading from the thread-local, OS-seeded generator.
///
/// Unlike activation windows this is deliberately not reproducible.
pub fn generate_power(nominal_watts: i32) -> Result<i32, ScheduleError> {
    generate_power_with(&mut rand::rng(), nominal_watts)
}

pub fn generate_power_with<R: Rng + ?Sized>(
    rng: &mut R,
    nominal_watts: i32,
) -> Result<i32, ScheduleError> {
    let (lower, upper) = power_bounds(nominal_watts)?;
    Ok(rng.random_range(lower..=upper))
}
