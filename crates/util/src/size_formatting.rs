//! Human-readable byte counts.

/// Unit label for each power of 1024, smallest first.
pub const SIZE_UNITS: [&str; 9] = ["Bytes", "KB", "MB", "GB", "TB", "PB", "EB", "ZB", "YB"];

const KILO: u64 = 1024;
const DEFAULT_PRECISION: i32 = 2;
const MAX_PRECISION: i32 = 100;
// Above this magnitude every f64 is already an integer.
const EXACT_INTEGER_LIMIT: f64 = 9_007_199_254_740_992.0;

/// Formats `bytes` with up to two decimal places, e.g. `1536` becomes `"1.5 KB"`.
pub fn format_size(bytes: u64) -> String {
    format_size_with_precision(bytes, DEFAULT_PRECISION)
}

/// Formats `bytes` rounded to `decimals` places.
///
/// Negative precision counts as zero. Trailing zeros are dropped, so `2048`
/// renders as `"2 KB"` rather than `"2.00 KB"`. A value that rounds up to
/// `1024` keeps its unit (`1048575` is `"1024 KB"`).
pub fn format_size_with_precision(bytes: u64, decimals: i32) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let index = unit_index(bytes);
    let value = bytes as f64 / KILO.pow(index as u32) as f64;
    let rounded = round_half_up(value, decimals.clamp(0, MAX_PRECISION));
    format!("{} {}", rounded, SIZE_UNITS[index])
}

/// Largest `i` with `1024^i <= bytes`, capped at the last unit.
fn unit_index(bytes: u64) -> usize {
    let mut index = 0;
    let mut threshold = KILO;
    while bytes >= threshold && index < SIZE_UNITS.len() - 1 {
        index += 1;
        match threshold.checked_mul(KILO) {
            Some(next) => threshold = next,
            None => break,
        }
    }
    index
}

/// Rounds to `precision` places; exact ties go up.
fn round_half_up(value: f64, precision: i32) -> f64 {
    let factor = 10f64.powi(precision);
    let scaled = value * factor;
    if !scaled.is_finite() || scaled >= EXACT_INTEGER_LIMIT {
        return value;
    }
    scaled.round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_a_literal() {
        assert_eq!(format_size(0), "0 Bytes");
        assert_eq!(format_size_with_precision(0, 0), "0 Bytes");
    }

    #[test]
    fn whole_units_drop_trailing_zeros() {
        assert_eq!(format_size(1), "1 Bytes");
        assert_eq!(format_size(1023), "1023 Bytes");
        assert_eq!(format_size(1024), "1 KB");
        assert_eq!(format_size(1_048_576), "1 MB");
        assert_eq!(format_size(15_728_640), "15 MB");
        assert_eq!(format_size(20_971_520), "20 MB");
        assert_eq!(format_size(1 << 40), "1 TB");
        assert_eq!(format_size(1 << 50), "1 PB");
    }

    #[test]
    fn fractions_keep_at_most_the_requested_places() {
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(1_500_000), "1.43 MB");
        assert_eq!(format_size_with_precision(1_500_000, 4), "1.4305 MB");
    }

    #[test]
    fn exact_ties_round_up() {
        // 1152 bytes is exactly 1.125 KB
        assert_eq!(format_size(1152), "1.13 KB");
        assert_eq!(format_size_with_precision(1536, 0), "2 KB");
    }

    #[test]
    fn zero_or_negative_precision_prints_integers() {
        for bytes in [1, 1000, 1536, 1_500_000, 987_654_321, u64::MAX] {
            for decimals in [0, -1, -50] {
                let formatted = format_size_with_precision(bytes, decimals);
                assert!(!formatted.contains('.'), "{formatted} should have no decimal point");
            }
        }
    }

    #[test]
    fn unit_is_the_largest_power_not_exceeding_the_input() {
        for index in 0..=6u32 {
            let low = KILO.pow(index);
            let high = low.checked_mul(KILO).map(|next| next - 1).unwrap_or(u64::MAX);
            for bytes in [low, low + low / 3, high] {
                let formatted = format_size(bytes);
                let (magnitude, unit) = formatted.split_once(' ').unwrap();
                assert_eq!(unit, SIZE_UNITS[index as usize], "{bytes} -> {formatted}");
                let magnitude: f64 = magnitude.parse().unwrap();
                assert!((1.0..=1024.0).contains(&magnitude), "{bytes} -> {formatted}");
            }
        }
    }

    #[test]
    fn boundary_rounding_is_not_renormalized() {
        assert_eq!(format_size(1_048_575), "1024 KB");
    }

    #[test]
    fn largest_u64_lands_in_exabytes() {
        assert_eq!(format_size(u64::MAX), "16 EB");
    }
}
