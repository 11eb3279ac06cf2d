//! Unit conversions from provider values to display values.

/// Offset the widget subtracts from Kelvin readings.
pub const KELVIN_OFFSET: f64 = 272.15;

/// Rounds to the nearest integer, ties toward positive infinity.
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

pub fn kelvin_to_celsius(kelvin: f64) -> i32 {
    round_half_up(kelvin - KELVIN_OFFSET) as i32
}

/// Wind speed in km/h with one decimal, from m/s.
pub fn mps_to_kmh(speed: f64) -> String {
    one_decimal(speed * 3.6)
}

/// Visibility in km with one decimal, from meters.
pub fn meters_to_km(meters: f64) -> String {
    one_decimal(meters / 1000.0)
}

fn one_decimal(value: f64) -> String {
    // Only multiples of 0.25 sit exactly halfway; those round up. Everything
    // else rounds the exact binary value.
    let quarters = value * 4.0;
    let is_tie = quarters.fract() == 0.0 && quarters.rem_euclid(2.0) == 1.0;
    if is_tie {
        format!("{:.1}", round_half_up(value * 10.0) / 10.0)
    } else {
        format!("{value:.1}")
    }
}
