//! Derived bank account balances.
//!
//! A bank account's balance is never stored. It is recomputed on read
//! from the ledger entries carrying the account plus the signed transfer
//! legs, so the ledger remains the single source of truth.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::types::{EntryType, FlowDirection};

/// Derived balance of a bank account at read time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountBalance {
    /// The bank account.
    pub account_id: Uuid,
    /// Sum of income entries for this account.
    pub income_total: Decimal,
    /// Sum of expense entries for this account.
    pub expense_total: Decimal,
    /// Net of transfer legs (inflow minus outflow).
    pub transfer_net: Decimal,
    /// income - expense + transfer net.
    pub balance: Decimal,
}

impl AccountBalance {
    /// Creates an empty balance for an account.
    #[must_use]
    pub fn new(account_id: Uuid) -> Self {
        Self {
            account_id,
            income_total: Decimal::ZERO,
            expense_total: Decimal::ZERO,
            transfer_net: Decimal::ZERO,
            balance: Decimal::ZERO,
        }
    }

    /// Folds one ledger entry into the balance.
    pub fn add_entry(&mut self, entry_type: EntryType, amount: Decimal) {
        match entry_type {
            EntryType::Income => self.income_total += amount,
            EntryType::Expense => self.expense_total += amount,
        }
        self.recompute();
    }

    /// Folds one transfer leg into the balance.
    pub fn add_transfer(&mut self, direction: FlowDirection, amount: Decimal) {
        self.transfer_net += direction.signed(amount);
        self.recompute();
    }

    fn recompute(&mut self) {
        self.balance = self.income_total - self.expense_total + self.transfer_net;
    }
}

/// Computes the derived balance of one account from its ledger rows.
///
/// `entries` are the account's financial entries, `transfers` its
/// transfer transaction legs. All amounts are stored positive.
#[must_use]
pub fn account_balance(
    account_id: Uuid,
    entries: &[(EntryType, Decimal)],
    transfers: &[(FlowDirection, Decimal)],
) -> AccountBalance {
    let mut balance = AccountBalance::new(account_id);
    for (entry_type, amount) in entries {
        balance.add_entry(*entry_type, *amount);
    }
    for (direction, amount) in transfers {
        balance.add_transfer(*direction, *amount);
    }
    balance
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn amount_strategy() -> impl Strategy<Value = Decimal> {
        (1i64..10_000_000i64).prop_map(|n| Decimal::new(n, 0))
    }

    fn entries_strategy(max_len: usize) -> impl Strategy<Value = Vec<(EntryType, Decimal)>> {
        prop::collection::vec(
            (prop::bool::ANY, amount_strategy()).prop_map(|(income, amount)| {
                let ty = if income {
                    EntryType::Income
                } else {
                    EntryType::Expense
                };
                (ty, amount)
            }),
            0..=max_len,
        )
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// The derived balance always equals income minus expense plus
        /// the transfer net, regardless of fold order.
        #[test]
        fn prop_balance_identity(entries in entries_strategy(20)) {
            let balance = account_balance(Uuid::nil(), &entries, &[]);

            let income: Decimal = entries
                .iter()
                .filter(|(t, _)| *t == EntryType::Income)
                .map(|(_, a)| *a)
                .sum();
            let expense: Decimal = entries
                .iter()
                .filter(|(t, _)| *t == EntryType::Expense)
                .map(|(_, a)| *a)
                .sum();

            prop_assert_eq!(balance.income_total, income);
            prop_assert_eq!(balance.expense_total, expense);
            prop_assert_eq!(balance.balance, income - expense);
        }

        /// Applying the two legs of one transfer to two accounts moves
        /// their balances by equal and opposite amounts.
        #[test]
        fn prop_transfer_conservation(
            amount in amount_strategy(),
            source_entries in entries_strategy(10),
            dest_entries in entries_strategy(10),
        ) {
            let source_id = Uuid::new_v4();
            let dest_id = Uuid::new_v4();

            let before_source = account_balance(source_id, &source_entries, &[]);
            let before_dest = account_balance(dest_id, &dest_entries, &[]);

            let after_source = account_balance(
                source_id,
                &source_entries,
                &[(FlowDirection::Outflow, amount)],
            );
            let after_dest = account_balance(
                dest_id,
                &dest_entries,
                &[(FlowDirection::Inflow, amount)],
            );

            prop_assert_eq!(after_source.balance, before_source.balance - amount);
            prop_assert_eq!(after_dest.balance, before_dest.balance + amount);

            // Nothing is created or destroyed by the pair.
            let before_total = before_source.balance + before_dest.balance;
            let after_total = after_source.balance + after_dest.balance;
            prop_assert_eq!(before_total, after_total);
        }

        /// Folding entries one at a time matches the bulk computation.
        #[test]
        fn prop_incremental_matches_bulk(entries in entries_strategy(20)) {
            let bulk = account_balance(Uuid::nil(), &entries, &[]);

            let mut incremental = AccountBalance::new(Uuid::nil());
            for (ty, amount) in &entries {
                incremental.add_entry(*ty, *amount);
            }

            prop_assert_eq!(bulk.balance, incremental.balance);
        }
    }

    #[test]
    fn test_empty_account_is_zero() {
        let balance = account_balance(Uuid::nil(), &[], &[]);
        assert_eq!(balance.balance, Decimal::ZERO);
        assert_eq!(balance.income_total, Decimal::ZERO);
        assert_eq!(balance.expense_total, Decimal::ZERO);
    }

    #[test]
    fn test_mixed_activity() {
        let balance = account_balance(
            Uuid::nil(),
            &[
                (EntryType::Income, dec!(150000)),
                (EntryType::Income, dec!(20000)),
                (EntryType::Expense, dec!(50000)),
            ],
            &[
                (FlowDirection::Outflow, dec!(500000)),
                (FlowDirection::Inflow, dec!(100000)),
            ],
        );

        assert_eq!(balance.income_total, dec!(170000));
        assert_eq!(balance.expense_total, dec!(50000));
        assert_eq!(balance.transfer_net, dec!(-400000));
        assert_eq!(balance.balance, dec!(-280000));
    }

    #[test]
    fn test_transfer_moves_exactly_the_amount() {
        let before = account_balance(Uuid::nil(), &[(EntryType::Income, dec!(800000))], &[]);
        let after = account_balance(
            Uuid::nil(),
            &[(EntryType::Income, dec!(800000))],
            &[(FlowDirection::Outflow, dec!(500000))],
        );
        assert_eq!(after.balance, before.balance - dec!(500000));
    }
}
