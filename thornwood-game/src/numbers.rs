//! Numeric conversion helpers centralizing safe numeric casts.

use num_traits::cast::cast;

/// Clamp a probability into `[0, 1]`, returning 0.0 for non-finite values.
#[must_use]
pub fn clamp_probability(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}

/// Scale a base chance by a difficulty modifier and keep it a valid probability.
#[must_use]
pub fn scaled_chance(base: f64, modifier: f64) -> f64 {
    clamp_probability(base * modifier)
}

/// Convert a die total into a signed health delta, saturating at `i32::MAX`.
#[must_use]
pub fn roll_to_i32(value: u32) -> i32 {
    cast::<u32, i32>(value).unwrap_or(i32::MAX)
}

/// Convert a non-negative signed amount into a counter value, flooring at zero.
#[must_use]
pub fn i64_to_u32_floor(value: i64) -> u32 {
    if value <= 0 {
        return 0;
    }
    cast::<i64, u32>(value).unwrap_or(u32::MAX)
}

/// Convert a count to f64 while allowing precision loss in a single location.
#[must_use]
pub fn count_to_f64(value: usize) -> f64 {
    cast::<usize, f64>(value).unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probabilities_are_clamped() {
        assert!((clamp_probability(f64::NAN) - 0.0).abs() < f64::EPSILON);
        assert!((clamp_probability(4.0) - 1.0).abs() < f64::EPSILON);
        assert!((clamp_probability(-0.5) - 0.0).abs() < f64::EPSILON);
        assert!((scaled_chance(0.3, 100.0) - 1.0).abs() < f64::EPSILON);
        assert!((scaled_chance(0.4, 0.0) - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn integer_conversions_saturate() {
        assert_eq!(roll_to_i32(7), 7);
        assert_eq!(roll_to_i32(u32::MAX), i32::MAX);
        assert_eq!(i64_to_u32_floor(-3), 0);
        assert_eq!(i64_to_u32_floor(12), 12);
        assert_eq!(i64_to_u32_floor(i64::MAX), u32::MAX);
    }

    #[test]
    fn counts_convert_to_float() {
        assert!((count_to_f64(20) - 20.0).abs() < f64::EPSILON);
    }
}
