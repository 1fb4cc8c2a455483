//! Regional number parsing.
//!
//! Operator spreadsheets export numbers with `.` as the thousands separator
//! and `,` as the decimal separator. Two readings exist:
//!
//! - the *scaled* reading used by elevation tables, where every separator is
//!   dropped and the remaining digits are hundredths (`"1.135,30"` is
//!   `113530 / 100`);
//! - the *plain* reading used by operation plans, where the token is read as
//!   a decimal number directly.
//!
//! The `Result`-returning parsers report why a token was rejected. The
//! importers use the `*_float` wrappers, which log the failure and fall back
//! to `0.0` so a single bad cell never aborts an upload.

use crate::constants::{DECIMAL_SEPARATOR, SCALED_NUMBER_DIVISOR, THOUSANDS_SEPARATOR};
use crate::error::NumberParseError;
use tracing::warn;

/// Parse a token in the scaled regional format.
pub fn parse_scaled(token: &str) -> Result<f64, NumberParseError> {
    let compact = strip_whitespace(token);
    if compact.is_empty() {
        return Err(NumberParseError::Empty);
    }

    let digits: String = compact
        .chars()
        .filter(|&c| c != THOUSANDS_SEPARATOR && c != DECIMAL_SEPARATOR)
        .collect();

    let (negative, unsigned) = match digits.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, digits.as_str()),
    };

    if unsigned.is_empty() || !unsigned.bytes().all(|b| b.is_ascii_digit()) {
        return Err(NumberParseError::Malformed {
            token: token.to_string(),
        });
    }

    let hundredths: u64 = unsigned.parse().map_err(|_| NumberParseError::OutOfRange {
        token: token.to_string(),
    })?;

    let value = hundredths as f64 / SCALED_NUMBER_DIVISOR;
    Ok(if negative { -value } else { value })
}

/// Parse a token as a plain decimal, accepting either `.` or `,` as the
/// decimal point.
///
/// When the token contains a comma, periods are thousands separators and the
/// comma is the decimal point. Otherwise the token is read as written.
pub fn parse_plain(token: &str) -> Result<f64, NumberParseError> {
    let compact = strip_whitespace(token);
    if compact.is_empty() {
        return Err(NumberParseError::Empty);
    }

    let normalized = if compact.contains(DECIMAL_SEPARATOR) {
        compact
            .replace(THOUSANDS_SEPARATOR, "")
            .replace(DECIMAL_SEPARATOR, ".")
    } else {
        compact
    };

    let value: f64 = normalized
        .parse()
        .map_err(|_| NumberParseError::Malformed {
            token: token.to_string(),
        })?;

    if !value.is_finite() {
        return Err(NumberParseError::OutOfRange {
            token: token.to_string(),
        });
    }

    Ok(value)
}

/// Scaled parse with zero fallback, as used by the elevation importer.
pub fn parse_local_float(token: &str) -> f64 {
    parse_scaled(token).unwrap_or_else(|e| {
        warn!("Falling back to 0 for scaled number: {}", e);
        0.0
    })
}

/// Plain parse with zero fallback, as used by the plan importer.
pub fn parse_plain_float(token: &str) -> f64 {
    parse_plain(token).unwrap_or_else(|e| {
        warn!("Falling back to 0 for number: {}", e);
        0.0
    })
}

fn strip_whitespace(token: &str) -> String {
    token.chars().filter(|c| !c.is_whitespace()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_scaled_regional_format() {
        assert_abs_diff_eq!(parse_local_float("224,50"), 224.50);
        assert_abs_diff_eq!(parse_local_float("1.135,30"), 1135.30);
        assert_abs_diff_eq!(parse_local_float(" 12.345.678,90 "), 12_345_678.90);
    }

    #[test]
    fn test_scaled_treats_last_two_digits_as_fraction() {
        // Separators carry no meaning in the scaled reading
        assert_abs_diff_eq!(parse_local_float("224.50"), 224.50);
        assert_abs_diff_eq!(parse_local_float("22450"), 224.50);
        assert_abs_diff_eq!(parse_local_float("5"), 0.05);
    }

    #[test]
    fn test_scaled_negative() {
        assert_abs_diff_eq!(parse_local_float("-1,25"), -1.25);
    }

    #[test]
    fn test_malformed_tokens_fall_back_to_zero() {
        assert_eq!(parse_local_float("abc"), 0.0);
        assert_eq!(parse_local_float(""), 0.0);
        assert_eq!(parse_local_float("   "), 0.0);
        assert_eq!(parse_local_float("-"), 0.0);
        assert_eq!(parse_local_float("12a,00"), 0.0);
    }

    #[test]
    fn test_scaled_reports_error_kind() {
        assert_eq!(parse_scaled(""), Err(NumberParseError::Empty));
        assert!(matches!(
            parse_scaled("abc"),
            Err(NumberParseError::Malformed { .. })
        ));
        assert!(matches!(
            parse_scaled("99999999999999999999999"),
            Err(NumberParseError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_plain_accepts_both_decimal_points() {
        assert_abs_diff_eq!(parse_plain_float("228.5"), 228.5);
        assert_abs_diff_eq!(parse_plain_float("228,50"), 228.5);
        assert_abs_diff_eq!(parse_plain_float("1.228,75"), 1228.75);
        assert_abs_diff_eq!(parse_plain_float(" 15 "), 15.0);
    }

    #[test]
    fn test_plain_rejects_non_finite() {
        assert!(matches!(
            parse_plain("inf"),
            Err(NumberParseError::OutOfRange { .. })
        ));
        assert_eq!(parse_plain_float("NaN"), 0.0);
        assert_eq!(parse_plain_float("x"), 0.0);
    }
}
