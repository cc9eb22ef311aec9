//! Input validation for ledger operations.

use rust_decimal::Decimal;

use super::error::LedgerError;

/// Length of a bank card number after normalization.
pub const CARD_NUMBER_LEN: usize = 16;

/// Normalizes a card number by stripping all whitespace, then validates
/// the result.
///
/// # Errors
///
/// Returns `LedgerError::InvalidCardNumber` if the normalized value is
/// not exactly [`CARD_NUMBER_LEN`] ASCII digits.
pub fn normalize_card_number(raw: &str) -> Result<String, LedgerError> {
    let normalized: String = raw.chars().filter(|c| !c.is_whitespace()).collect();

    if normalized.is_empty() {
        return Err(LedgerError::InvalidCardNumber("empty".to_string()));
    }
    if !normalized.chars().all(|c| c.is_ascii_digit()) {
        return Err(LedgerError::InvalidCardNumber(
            "contains non-digit characters".to_string(),
        ));
    }
    if normalized.len() != CARD_NUMBER_LEN {
        return Err(LedgerError::InvalidCardNumber(format!(
            "expected {CARD_NUMBER_LEN} digits, got {}",
            normalized.len()
        )));
    }

    Ok(normalized)
}

/// Validates that an amount is strictly positive.
///
/// # Errors
///
/// Returns `LedgerError::NonPositiveAmount` for zero or negative amounts.
pub fn require_positive(amount: Decimal) -> Result<Decimal, LedgerError> {
    if amount <= Decimal::ZERO {
        return Err(LedgerError::NonPositiveAmount);
    }
    Ok(amount)
}

/// Clamps a possibly-negative amount to zero.
///
/// Settlement inputs treat negative overrides as "nothing", matching the
/// dashboard's behavior.
#[must_use]
pub fn clamp_non_negative(amount: Decimal) -> Decimal {
    if amount < Decimal::ZERO {
        Decimal::ZERO
    } else {
        amount
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[test]
    fn test_normalize_strips_whitespace() {
        assert_eq!(
            normalize_card_number("6037 9912 3456 7890").unwrap(),
            "6037991234567890"
        );
        assert_eq!(
            normalize_card_number("  6037991234567890\t").unwrap(),
            "6037991234567890"
        );
    }

    #[rstest]
    #[case::dashes("6037-9912-3456-7890")]
    #[case::letters("abcd efgh ijkl mnop")]
    #[case::too_short("1234")]
    #[case::too_long("60379912345678901")]
    #[case::empty("")]
    #[case::whitespace_only("   ")]
    fn test_normalize_rejects_invalid_input(#[case] raw: &str) {
        assert!(matches!(
            normalize_card_number(raw),
            Err(LedgerError::InvalidCardNumber(_))
        ));
    }

    #[test]
    fn test_require_positive() {
        assert_eq!(require_positive(dec!(0.01)).unwrap(), dec!(0.01));
        assert!(matches!(
            require_positive(Decimal::ZERO),
            Err(LedgerError::NonPositiveAmount)
        ));
        assert!(matches!(
            require_positive(dec!(-5)),
            Err(LedgerError::NonPositiveAmount)
        ));
    }

    #[test]
    fn test_clamp_non_negative() {
        assert_eq!(clamp_non_negative(dec!(-100)), Decimal::ZERO);
        assert_eq!(clamp_non_negative(Decimal::ZERO), Decimal::ZERO);
        assert_eq!(clamp_non_negative(dec!(42.50)), dec!(42.50));
    }
}
