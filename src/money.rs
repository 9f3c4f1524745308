use std::num::ParseFloatError;

/**
 * Balances are kept as plain f64 and printed with no rounding,
 * so what was loaded from the file is exactly what the console shows.
 *
 * Note: the rendering always carries a fractional part ("100.0", not "100")
 * and switches to E notation outside [1e-3, 1e7).
 */
const PLAIN_LOWER_BOUND: f64 = 1e-3;
const PLAIN_UPPER_BOUND: f64 = 1e7;

/// Parses an amount field. Surrounding space and control characters are
/// ignored.
pub fn parse_amount(field: &str) -> Result<f64, ParseFloatError> {
    field.trim_matches(|c: char| c <= ' ').parse()
}

pub fn format_amount(amount: f64) -> String {
    if amount.is_infinite() {
        return if amount > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }

    let magnitude = amount.abs();
    if amount.is_nan()
        || magnitude == 0.0
        || (PLAIN_LOWER_BOUND..PLAIN_UPPER_BOUND).contains(&magnitude)
    {
        // Debug keeps the trailing ".0" that Display drops
        return format!("{:?}", amount);
    }

    let scientific = format!("{:E}", amount);
    match scientific.split_once('E') {
        Some((mantissa, exponent)) if !mantissa.contains('.') => {
            format!("{}.0E{}", mantissa, exponent)
        }
        _ => scientific,
    }
}

pub fn format_money(amount: f64) -> String {
    format!("${}", format_amount(amount))
}

#[cfg(test)]
mod tests {
    use super::*;

    mod parse_amount {
        use super::*;

        #[test]
        fn plain_decimal() {
            assert_eq!(parse_amount("100.0"), Ok(100.0));
        }
        #[test]
        fn surrounding_whitespace_is_ignored() {
            assert_eq!(parse_amount("  0.05 "), Ok(0.05));
        }
        #[test]
        fn no_break_space_is_not_trimmed() {
            assert!(parse_amount("\u{a0}1.0").is_err());
        }
        #[test]
        fn exponent_and_sign() {
            assert_eq!(parse_amount("-2.5e3"), Ok(-2500.0));
        }
        #[test]
        fn integer_without_point() {
            assert_eq!(parse_amount("500"), Ok(500.0));
        }
        #[test]
        fn garbage_is_rejected() {
            assert!(parse_amount("12a").is_err());
            assert!(parse_amount("").is_err());
            assert!(parse_amount("1.0.0").is_err());
        }
    }

    mod format_amount {
        use super::*;

        #[test]
        fn whole_number_keeps_fraction() {
            assert_eq!(format_amount(100.0), "100.0");
        }
        #[test]
        fn small_fraction() {
            assert_eq!(format_amount(0.05), "0.05");
        }
        #[test]
        fn zero_and_negative_zero() {
            assert_eq!(format_amount(0.0), "0.0");
            assert_eq!(format_amount(-0.0), "-0.0");
        }
        #[test]
        fn no_rounding() {
            assert_eq!(format_amount(0.1 + 0.2), "0.30000000000000004");
            assert_eq!(format_amount(1234.5678), "1234.5678");
        }
        #[test]
        fn negative_balance() {
            assert_eq!(format_amount(-250.75), "-250.75");
        }
        #[test]
        fn lower_bound_is_plain() {
            assert_eq!(format_amount(0.001), "0.001");
        }
        #[test]
        fn large_values_use_exponent() {
            assert_eq!(format_amount(1e7), "1.0E7");
            assert_eq!(format_amount(12345678.9), "1.23456789E7");
            assert_eq!(format_amount(-3e9), "-3.0E9");
        }
        #[test]
        fn tiny_values_use_exponent() {
            assert_eq!(format_amount(0.0001), "1.0E-4");
        }
        #[test]
        fn non_finite() {
            assert_eq!(format_amount(f64::INFINITY), "Infinity");
            assert_eq!(format_amount(f64::NEG_INFINITY), "-Infinity");
            assert_eq!(format_amount(f64::NAN), "NaN");
        }
    }

    #[test]
    fn money_has_dollar_prefix() {
        assert_eq!(format_money(100.0), "$100.0");
        assert_eq!(format_money(-5.5), "$-5.5");
    }
}
