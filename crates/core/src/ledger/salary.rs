//! Salary record rules.

use rust_decimal::Decimal;

use super::error::LedgerError;
use super::validation::require_positive;

/// English month names, indexed by month number minus one.
const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Validates the month and amount of a salary record.
pub fn validate_salary(month: i16, amount: Decimal) -> Result<(), LedgerError> {
    if !(1..=12).contains(&month) {
        return Err(LedgerError::InvalidMonth(month));
    }
    require_positive(amount)?;
    Ok(())
}

/// Builds the description of the expense entry written when a salary is paid.
#[must_use]
pub fn salary_payment_description(month: i16, year: i16) -> String {
    let name = usize::try_from(month)
        .ok()
        .and_then(|m| m.checked_sub(1))
        .and_then(|idx| MONTH_NAMES.get(idx));
    match name {
        Some(name) => format!("Salary payment for {name} {year}"),
        None => format!("Salary payment for {month}/{year}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_validate_accepts_all_calendar_months() {
        for month in 1..=12 {
            assert!(validate_salary(month, dec!(5000000)).is_ok());
        }
    }

    #[test]
    fn test_validate_rejects_out_of_range_months() {
        assert!(matches!(
            validate_salary(0, dec!(5000000)),
            Err(LedgerError::InvalidMonth(0))
        ));
        assert!(matches!(
            validate_salary(13, dec!(5000000)),
            Err(LedgerError::InvalidMonth(13))
        ));
    }

    #[test]
    fn test_validate_rejects_non_positive_amounts() {
        assert!(matches!(
            validate_salary(3, dec!(0)),
            Err(LedgerError::NonPositiveAmount)
        ));
        assert!(matches!(
            validate_salary(3, dec!(-100)),
            Err(LedgerError::NonPositiveAmount)
        ));
    }

    #[test]
    fn test_payment_description_uses_month_name() {
        assert_eq!(
            salary_payment_description(3, 2024),
            "Salary payment for March 2024"
        );
        assert_eq!(
            salary_payment_description(12, 2025),
            "Salary payment for December 2025"
        );
    }
}
