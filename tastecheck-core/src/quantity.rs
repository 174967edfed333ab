//! Ingredient quantity parsing.
//!
//! Quantities arrive as free text from the recipe form ("2", "0.5", "1/2",
//! "1 1/2") and are stored as `NUMERIC(10,3)`.

use bigdecimal::{BigDecimal, RoundingMode, Zero};
use std::str::FromStr;
use thiserror::Error;

/// Decimal places kept for stored quantities.
pub const QUANTITY_SCALE: i64 = 3;

/// Exclusive upper bound imposed by `NUMERIC(10,3)`.
const MAX_QUANTITY: i64 = 10_000_000;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuantityError {
    #[error("quantity is missing")]
    Empty,

    #[error("'{0}' is not a number")]
    NotANumber(String),

    #[error("quantity must be greater than zero")]
    NotPositive,

    #[error("quantity must be below 10000000")]
    TooLarge,
}

/// Parse a quantity into a decimal rounded to [`QUANTITY_SCALE`] places.
pub fn parse_quantity(raw: &str) -> Result<BigDecimal, QuantityError> {
    let s = raw.trim();
    if s.is_empty() {
        return Err(QuantityError::Empty);
    }

    let words: Vec<&str> = s.split_whitespace().collect();
    let value = match words.as_slice() {
        // Mixed number: "1 1/2"
        [whole, frac] if is_whole_number(whole) && is_fraction(frac) => {
            let whole = parse_decimal(whole, s)?;
            whole + parse_fraction(frac, s)?
        }
        [single] if is_fraction(single) => parse_fraction(single, s)?,
        [single] => parse_decimal(single, s)?,
        _ => return Err(QuantityError::NotANumber(s.to_string())),
    };

    let rounded = value.with_scale_round(QUANTITY_SCALE, RoundingMode::HalfUp);
    if rounded <= BigDecimal::zero() {
        return Err(QuantityError::NotPositive);
    }
    if rounded >= BigDecimal::from(MAX_QUANTITY) {
        return Err(QuantityError::TooLarge);
    }
    Ok(rounded)
}

/// Render a stored quantity without trailing zeros ("2.500" -> "2.5").
pub fn format_quantity(value: &BigDecimal) -> String {
    let text = value
        .with_scale_round(QUANTITY_SCALE, RoundingMode::HalfUp)
        .to_string();
    if !text.contains('.') {
        return text;
    }
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

fn is_whole_number(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

fn is_fraction(s: &str) -> bool {
    match s.split_once('/') {
        Some((num, den)) => is_whole_number(num) && is_whole_number(den),
        None => false,
    }
}

/// Longest number accepted in one word, sign and point included.
const MAX_NUMBER_LEN: usize = 24;

/// Plain decimal notation only. Exponents are refused before `BigDecimal`
/// sees them, since rescaling "1e100000000" would expand every digit.
fn parse_decimal(word: &str, original: &str) -> Result<BigDecimal, QuantityError> {
    let not_a_number = || QuantityError::NotANumber(original.to_string());
    if word.len() > MAX_NUMBER_LEN {
        return Err(not_a_number());
    }
    let digits = word.strip_prefix(['-', '+']).unwrap_or(word);
    let (whole, frac) = digits.split_once('.').unwrap_or((digits, ""));
    let all_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if (whole.is_empty() && frac.is_empty()) || !all_digits(whole) || !all_digits(frac) {
        return Err(not_a_number());
    }
    BigDecimal::from_str(word).map_err(|_| not_a_number())
}

fn parse_fraction(word: &str, original: &str) -> Result<BigDecimal, QuantityError> {
    let (num, den) = word
        .split_once('/')
        .ok_or_else(|| QuantityError::NotANumber(original.to_string()))?;
    let num = parse_decimal(num, original)?;
    let den = parse_decimal(den, original)?;
    if den.is_zero() {
        return Err(QuantityError::NotANumber(original.to_string()));
    }
    Ok(num / den)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    #[test]
    fn test_integer_and_decimal() {
        assert_eq!(parse_quantity("2").unwrap(), dec("2"));
        assert_eq!(parse_quantity(" 0.25 ").unwrap(), dec("0.25"));
    }

    #[test]
    fn test_fraction() {
        assert_eq!(parse_quantity("1/2").unwrap(), dec("0.5"));
        assert_eq!(parse_quantity("1/3").unwrap(), dec("0.333"));
    }

    #[test]
    fn test_mixed_number() {
        assert_eq!(parse_quantity("1 1/2").unwrap(), dec("1.5"));
    }

    #[test]
    fn test_rejects_garbage() {
        assert_eq!(
            parse_quantity("a pinch"),
            Err(QuantityError::NotANumber("a pinch".to_string()))
        );
        assert!(matches!(
            parse_quantity("1/0"),
            Err(QuantityError::NotANumber(_))
        ));
        assert_eq!(parse_quantity("   "), Err(QuantityError::Empty));
    }

    #[test]
    fn test_rejects_exponent_notation() {
        for raw in ["1e100000000", "1E3", "2e-2", "1/1e9", "1 1e2/2"] {
            assert!(
                matches!(parse_quantity(raw), Err(QuantityError::NotANumber(_))),
                "{raw}"
            );
        }
        assert_eq!(
            parse_quantity("1.2.3"),
            Err(QuantityError::NotANumber("1.2.3".to_string()))
        );
        assert!(matches!(parse_quantity("."), Err(QuantityError::NotANumber(_))));
    }

    #[test]
    fn test_rejects_overlong_numbers() {
        let long = "1".repeat(MAX_NUMBER_LEN + 1);
        assert_eq!(parse_quantity(&long), Err(QuantityError::NotANumber(long.clone())));
    }

    #[test]
    fn test_rejects_zero_negative_and_huge() {
        assert_eq!(parse_quantity("0"), Err(QuantityError::NotPositive));
        assert_eq!(parse_quantity("-1"), Err(QuantityError::NotPositive));
        assert_eq!(parse_quantity("0.0001"), Err(QuantityError::NotPositive));
        assert_eq!(parse_quantity("10000000"), Err(QuantityError::TooLarge));
    }

    #[test]
    fn test_format_trims_zeros() {
        assert_eq!(format_quantity(&dec("2.000")), "2");
        assert_eq!(format_quantity(&dec("2.500")), "2.5");
        assert_eq!(format_quantity(&dec("10")), "10");
        assert_eq!(format_quantity(&dec("0.333")), "0.333");
    }
}
