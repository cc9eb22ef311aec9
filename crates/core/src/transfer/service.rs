//! Bank-to-bank transfer planning.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::ledger::FlowDirection;

use super::error::TransferError;

/// A bank account participating in a transfer.
#[derive(Debug, Clone)]
pub struct TransferAccount {
    /// Account id.
    pub id: Uuid,
    /// Display name, used in leg descriptions.
    pub name: String,
}

/// One side of a planned transfer.
#[derive(Debug, Clone)]
pub struct TransferLeg {
    /// The account this leg touches.
    pub account_id: Uuid,
    /// Inflow on the destination, outflow on the source.
    pub direction: FlowDirection,
    /// Human-readable description naming the opposite account.
    pub description: String,
}

/// A validated transfer, ready to be written as two transaction rows.
#[derive(Debug, Clone)]
pub struct TransferPlan {
    /// Amount moved, always positive. Each leg carries this amount with
    /// its own direction.
    pub amount: Decimal,
    /// Outflow leg first, inflow leg second. Both rows are written with
    /// the same timestamp.
    pub legs: [TransferLeg; 2],
    /// Timestamp shared by both rows.
    pub transferred_at: DateTime<Utc>,
}

impl TransferPlan {
    /// Returns the signed amounts of both legs, outflow first.
    #[must_use]
    pub fn signed_amounts(&self) -> [Decimal; 2] {
        [
            self.legs[0].direction.signed(self.amount),
            self.legs[1].direction.signed(self.amount),
        ]
    }
}

/// Plans transfers between bank accounts.
pub struct TransferService;

impl TransferService {
    /// Plans a transfer of `amount` from one account to another.
    ///
    /// Produces one outflow leg on the source and one inflow leg on the
    /// destination. The two legs always carry the same positive amount,
    /// so the transfer nets to zero across accounts.
    pub fn plan(
        from: &TransferAccount,
        to: &TransferAccount,
        amount: Decimal,
        description: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<TransferPlan, TransferError> {
        if from.id == to.id {
            return Err(TransferError::SameAccount);
        }
        if amount <= Decimal::ZERO {
            return Err(TransferError::NonPositiveAmount);
        }

        let suffix = description.map(|d| format!(": {d}")).unwrap_or_default();
        let legs = [
            TransferLeg {
                account_id: from.id,
                direction: FlowDirection::Outflow,
                description: format!("Transfer to {}{suffix}", to.name),
            },
            TransferLeg {
                account_id: to.id,
                direction: FlowDirection::Inflow,
                description: format!("Transfer from {}{suffix}", from.name),
            },
        ];

        Ok(TransferPlan {
            amount,
            legs,
            transferred_at: now,
        })
    }
}
