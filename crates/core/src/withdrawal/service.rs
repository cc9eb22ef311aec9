//! Withdrawal workflow rules.

use rust_decimal::Decimal;

use super::error::WithdrawalError;
use super::types::WithdrawalStatus;

/// Validates withdrawal requests and their status transitions.
///
/// Approval writes a salary expense entry referencing the request, so the
/// transitions are locked down: only pending requests can be decided, and
/// a request can never exceed what the barber has actually earned.
pub struct WithdrawalService;

impl WithdrawalService {
    /// Validates a requested amount against the barber's available balance.
    pub fn validate_request(amount: Decimal, available: Decimal) -> Result<(), WithdrawalError> {
        if amount <= Decimal::ZERO {
            return Err(WithdrawalError::NonPositiveAmount);
        }
        if amount > available {
            return Err(WithdrawalError::ExceedsBalance {
                requested: amount,
                available,
            });
        }
        Ok(())
    }

    /// Validates that a request can be approved.
    pub fn validate_approve(current: WithdrawalStatus) -> Result<(), WithdrawalError> {
        if !current.is_pending() {
            return Err(WithdrawalError::InvalidTransition {
                from: current,
                to: WithdrawalStatus::Approved,
            });
        }
        Ok(())
    }

    /// Validates that a request can be rejected.
    pub fn validate_reject(current: WithdrawalStatus) -> Result<(), WithdrawalError> {
        if !current.is_pending() {
            return Err(WithdrawalError::InvalidTransition {
                from: current,
                to: WithdrawalStatus::Rejected,
            });
        }
        Ok(())
    }

    /// Builds the description of the expense entry written on approval.
    #[must_use]
    pub fn payout_description(barber_name: &str) -> String {
        format!("Salary payment to {barber_name} for withdrawal")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_request_within_balance_is_accepted() {
        assert!(WithdrawalService::validate_request(dec!(300000), dec!(1000000)).is_ok());
    }

    #[test]
    fn test_request_for_exact_balance_is_accepted() {
        // income 1,000,000 with 300,000 already withdrawn leaves 700,000
        assert!(WithdrawalService::validate_request(dec!(700000), dec!(700000)).is_ok());
    }

    #[test]
    fn test_request_above_balance_is_rejected() {
        let result = WithdrawalService::validate_request(dec!(800000), dec!(700000));
        assert!(matches!(
            result,
            Err(WithdrawalError::ExceedsBalance {
                requested,
                available,
            }) if requested == dec!(800000) && available == dec!(700000)
        ));
    }

    #[test]
    fn test_request_must_be_positive() {
        assert!(matches!(
            WithdrawalService::validate_request(dec!(0), dec!(500000)),
            Err(WithdrawalError::NonPositiveAmount)
        ));
        assert!(matches!(
            WithdrawalService::validate_request(dec!(-100), dec!(500000)),
            Err(WithdrawalError::NonPositiveAmount)
        ));
    }

    #[test]
    fn test_only_pending_requests_can_be_approved() {
        assert!(WithdrawalService::validate_approve(WithdrawalStatus::Pending).is_ok());
        assert!(matches!(
            WithdrawalService::validate_approve(WithdrawalStatus::Approved),
            Err(WithdrawalError::InvalidTransition {
                from: WithdrawalStatus::Approved,
                to: WithdrawalStatus::Approved,
            })
        ));
        assert!(matches!(
            WithdrawalService::validate_approve(WithdrawalStatus::Rejected),
            Err(WithdrawalError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_only_pending_requests_can_be_rejected() {
        assert!(WithdrawalService::validate_reject(WithdrawalStatus::Pending).is_ok());
        assert!(matches!(
            WithdrawalService::validate_reject(WithdrawalStatus::Approved),
            Err(WithdrawalError::InvalidTransition {
                from: WithdrawalStatus::Approved,
                to: WithdrawalStatus::Rejected,
            })
        ));
    }

    #[test]
    fn test_payout_description_names_the_barber() {
        assert_eq!(
            WithdrawalService::payout_description("Reza Ahmadi"),
            "Salary payment to Reza Ahmadi for withdrawal"
        );
    }
}
