//! Native <-> relative conversions of a single sensor clock.

use contracts::{ContractError, SensorClock};

/// `relative = native * scale - offset`
#[inline]
pub fn native_to_relative(clock: &SensorClock, native: f64) -> f64 {
    native * clock.scale - clock.offset_s
}

/// `native = (relative + offset) / scale`
///
/// # Errors
/// - `Division` if the clock scale is zero
#[inline]
pub fn relative_to_native(clock: &SensorClock, relative: f64) -> Result<f64, ContractError> {
    ensure_invertible(clock)?;
    Ok((relative + clock.offset_s) / clock.scale)
}

pub fn native_to_relative_batch(clock: &SensorClock, natives: &[f64]) -> Vec<f64> {
    natives
        .iter()
        .map(|&native| native_to_relative(clock, native))
        .collect()
}

pub fn relative_to_native_batch(
    clock: &SensorClock,
    relatives: &[f64],
) -> Result<Vec<f64>, ContractError> {
    ensure_invertible(clock)?;
    Ok(relatives
        .iter()
        .map(|&relative| (relative + clock.offset_s) / clock.scale)
        .collect())
}

fn ensure_invertible(clock: &SensorClock) -> Result<(), ContractError> {
    if clock.scale == 0.0 {
        return Err(ContractError::Division {
            sensor: clock.sensor,
        });
    }
    Ok(())
}
