//! Numeric helpers for display code. None of them fail: missing or
//! degenerate inputs map to a fallback instead.

use crate::config::MILLIONS_DIVISOR;

/// `numerator / denominator`, or `default` when the denominator is zero or NaN.
pub fn safe_divide(numerator: f64, denominator: f64, default: f64) -> f64 {
    if denominator == 0.0 || denominator.is_nan() {
        return default;
    }
    numerator / denominator
}

/// Fixed-decimal rendering with a suffix; `"N/A"` for missing or NaN values.
pub fn format_number(value: impl Into<Option<f64>>, decimals: usize, suffix: &str) -> String {
    let value: Option<f64> = value.into();
    match value {
        Some(v) if !v.is_nan() => format!("{v:.decimals$}{suffix}"),
        _ => "N/A".to_string(),
    }
}

/// Amounts in millions, two decimals: `12_500_000.0` => `"12.50 M"`.
pub fn format_millions(value: impl Into<Option<f64>>) -> String {
    let value: Option<f64> = value.into();
    format_number(value.map(|v| v / MILLIONS_DIVISOR), 2, " M")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn divide_by_zero_or_nan_returns_default() {
        assert_eq!(safe_divide(10.0, 0.0, -1.0), -1.0);
        assert_eq!(safe_divide(10.0, -0.0, -1.0), -1.0);
        assert_eq!(safe_divide(10.0, f64::NAN, 7.0), 7.0);
    }

    #[test]
    fn divide_normal_case() {
        assert_eq!(safe_divide(10.0, 2.0, -1.0), 5.0);
        assert_eq!(safe_divide(-3.0, 4.0, 0.0), -0.75);
    }

    #[test]
    fn missing_values_render_as_na() {
        assert_eq!(format_number(f64::NAN, 2, "%"), "N/A");
        assert_eq!(format_number(None::<f64>, 0, ""), "N/A");
        assert_eq!(format_millions(None::<f64>), "N/A");
    }

    #[test]
    fn rounds_to_requested_decimals() {
        assert_eq!(format_number(12.345, 2, "%"), "12.35%");
        assert_eq!(format_number(Some(3.0), 0, " j"), "3 j");
        assert_eq!(format_number(-1.5, 3, ""), "-1.500");
        assert_eq!(format_millions(12_500_000.0), "12.50 M");
    }
}
