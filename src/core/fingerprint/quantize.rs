//! Brightness quantization for grid fingerprints.
//!
//! Every grid cell becomes one of 16 levels written as a single hex
//! digit. Levels are `round(value * 15 / 255)` with ties rounding up
//! (away from zero), so 8.5 maps to level 1 and 246.5 to level 15.

/// Number of distinct brightness levels
pub const LEVELS: u8 = 16;

/// ITU-R BT.601 luminance of an RGB triple, in 0.0..=255.0
pub fn luminance(r: u8, g: u8, b: u8) -> f64 {
    0.299 * f64::from(r) + 0.587 * f64::from(g) + 0.114 * f64::from(b)
}

/// Map a 0-255 brightness value to a 0-15 level
pub fn quantize_level(value: f64) -> u8 {
    let max = f64::from(LEVELS - 1);
    (value * max / 255.0).round().clamp(0.0, max) as u8
}

/// Lowercase hex digit for a level
pub fn level_digit(level: u8) -> char {
    char::from_digit(u32::from(level.min(LEVELS - 1)), 16).unwrap_or('f')
}

/// Encode a row-major sequence of cells into a hex fingerprint
pub fn encode_levels<I>(levels: I) -> String
where
    I: IntoIterator<Item = u8>,
{
    levels.into_iter().map(level_digit).collect()
}
