//! Appointment repository driving settlement, reversal, and deletion.
//!
//! Settling writes one income entry plus one transaction row per leg
//! (service, then tip) in a single database transaction. The partial
//! unique index on (appointment, category) makes the second of two
//! concurrent settlements fail whole, so an appointment can never be
//! settled twice.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, ModelTrait,
    PaginatorTrait, QueryFilter, Set, TransactionTrait,
};
use uuid::Uuid;

use shearbook_core::ledger::appointment_tag;
use shearbook_core::settlement::{
    AppointmentSnapshot, AppointmentStatus, SettlementError, SettlementPlan, SettlementRequest,
    SettlementService, UpdateAction,
};

use crate::entities::{
    appointment_services, appointments, barbers, customers, financial_entries,
    sea_orm_active_enums::{
        AppointmentStatus as DbAppointmentStatus, EntryStatus as DbEntryStatus,
        FlowDirection as DbFlowDirection, PaymentMethod as DbPaymentMethod,
        TransactionKind as DbTransactionKind,
    },
    transactions,
};

use super::category::resolve_well_known;
use super::is_unique_violation;
use super::setting::default_settlement_account;

/// Input for updating an appointment.
#[derive(Debug, Clone, Default)]
pub struct UpdateAppointmentInput {
    /// New lifecycle status; moving to completed settles, moving a
    /// settled appointment to cancelled reverses.
    pub status: Option<AppointmentStatus>,
    /// New appointment time.
    pub scheduled_at: Option<DateTime<Utc>>,
    /// New free-text notes.
    pub notes: Option<String>,
    /// Settlement parameters used when the status change settles.
    pub settlement: SettlementRequest,
}

/// The rows written by a settlement.
#[derive(Debug, Clone)]
pub struct SettlementOutcome {
    /// The appointment, now completed.
    pub appointment: appointments::Model,
    /// Income entries, service leg first.
    pub entries: Vec<financial_entries::Model>,
    /// Transaction rows, service leg first.
    pub transactions: Vec<transactions::Model>,
}

/// What an appointment update did.
#[derive(Debug, Clone)]
pub enum UpdateOutcome {
    /// The status change settled the appointment.
    Settled(SettlementOutcome),
    /// The status change reversed an existing settlement.
    Reversed(appointments::Model),
    /// Plain field update with no ledger effect.
    Updated(appointments::Model),
}

/// Repository for appointments and their settlement lifecycle.
#[derive(Debug, Clone)]
pub struct AppointmentRepository {
    db: DatabaseConnection,
}

impl AppointmentRepository {
    /// Creates a new appointment repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Settles an appointment, writing its ledger rows atomically.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Appointment is not found
    /// - Appointment is already settled
    /// - Appointment is cancelled
    /// - Database operation fails
    pub async fn settle(
        &self,
        appointment_id: Uuid,
        request: &SettlementRequest,
        shop_tz: Tz,
    ) -> Result<SettlementOutcome, SettlementError> {
        let (appointment, snapshot) = self.load_with_snapshot(appointment_id).await?;
        let has_rows = self.has_settlement_rows(appointment_id).await?;
        let plan = SettlementService::plan(&snapshot, has_rows, request, shop_tz, Utc::now())?;

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SettlementError::Database(e.to_string()))?;

        let outcome = write_settlement(&txn, appointment, &plan).await?;

        txn.commit()
            .await
            .map_err(|e| SettlementError::Database(e.to_string()))?;

        Ok(outcome)
    }

    /// Reverses the settlement of a completed appointment.
    ///
    /// Deletes every entry and transaction row the settlement wrote and
    /// moves the appointment to cancelled, all atomically.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Appointment is not found
    /// - Appointment has no settlement to reverse
    /// - Appointment is not in completed status
    /// - Database operation fails
    pub async fn cancel_settled(
        &self,
        appointment_id: Uuid,
    ) -> Result<appointments::Model, SettlementError> {
        let (appointment, snapshot) = self.load_with_snapshot(appointment_id).await?;
        let has_rows = self.has_settlement_rows(appointment_id).await?;
        SettlementService::validate_cancel(&snapshot, has_rows)?;

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SettlementError::Database(e.to_string()))?;

        erase_settlement(&txn, appointment_id).await?;

        let mut active: appointments::ActiveModel = appointment.into();
        active.status = Set(DbAppointmentStatus::Cancelled);
        active.updated_at = Set(Utc::now().into());
        let appointment = active
            .update(&txn)
            .await
            .map_err(|e| SettlementError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| SettlementError::Database(e.to_string()))?;

        Ok(appointment)
    }

    /// Updates an appointment, carrying out settlement side effects.
    ///
    /// Moving an unsettled appointment to completed settles it using
    /// the input's settlement parameters (line-item total, no tip, and
    /// cash when left at their defaults). Moving a settled one to
    /// cancelled reverses the settlement. Any other change is a plain
    /// update.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Appointment is not found
    /// - Database operation fails
    pub async fn update(
        &self,
        appointment_id: Uuid,
        input: UpdateAppointmentInput,
        shop_tz: Tz,
    ) -> Result<UpdateOutcome, SettlementError> {
        let (appointment, mut snapshot) = self.load_with_snapshot(appointment_id).await?;
        let has_rows = self.has_settlement_rows(appointment_id).await?;

        // Settlement descriptions render the appointment time, so a
        // rescheduling in the same request must be visible to the plan
        if let Some(scheduled_at) = input.scheduled_at {
            snapshot.scheduled_at = scheduled_at;
        }

        let mut active: appointments::ActiveModel = appointment.into();
        if let Some(scheduled_at) = input.scheduled_at {
            active.scheduled_at = Set(scheduled_at.into());
        }
        if let Some(notes) = input.notes {
            active.notes = Set(Some(notes));
        }

        let Some(new_status) = input.status else {
            active.updated_at = Set(Utc::now().into());
            let updated = active
                .update(&self.db)
                .await
                .map_err(|e| SettlementError::Database(e.to_string()))?;
            return Ok(UpdateOutcome::Updated(updated));
        };

        let action = SettlementService::update_action(
            &snapshot,
            has_rows,
            new_status,
            &input.settlement,
            shop_tz,
            Utc::now(),
        );

        match action {
            UpdateAction::Settle(plan) => {
                let txn = self
                    .db
                    .begin()
                    .await
                    .map_err(|e| SettlementError::Database(e.to_string()))?;

                active.updated_at = Set(plan.settled_at.into());
                let updated = active
                    .update(&txn)
                    .await
                    .map_err(|e| SettlementError::Database(e.to_string()))?;
                let outcome = write_settlement(&txn, updated, &plan).await?;

                txn.commit()
                    .await
                    .map_err(|e| SettlementError::Database(e.to_string()))?;

                Ok(UpdateOutcome::Settled(outcome))
            }
            UpdateAction::Reverse => {
                let txn = self
                    .db
                    .begin()
                    .await
                    .map_err(|e| SettlementError::Database(e.to_string()))?;

                erase_settlement(&txn, appointment_id).await?;

                active.status = Set(DbAppointmentStatus::Cancelled);
                active.updated_at = Set(Utc::now().into());
                let updated = active
                    .update(&txn)
                    .await
                    .map_err(|e| SettlementError::Database(e.to_string()))?;

                txn.commit()
                    .await
                    .map_err(|e| SettlementError::Database(e.to_string()))?;

                Ok(UpdateOutcome::Reversed(updated))
            }
            UpdateAction::SetStatus(status) => {
                active.status = Set(status.into());
                active.updated_at = Set(Utc::now().into());
                let updated = active
                    .update(&self.db)
                    .await
                    .map_err(|e| SettlementError::Database(e.to_string()))?;

                Ok(UpdateOutcome::Updated(updated))
            }
        }
    }

    /// Deletes an unsettled appointment and its line items.
    ///
    /// Settled appointments are locked; reverse the settlement first.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Appointment is not found
    /// - Appointment has settlement rows
    /// - Database operation fails
    pub async fn delete(&self, appointment_id: Uuid) -> Result<(), SettlementError> {
        let (appointment, snapshot) = self.load_with_snapshot(appointment_id).await?;
        let has_rows = self.has_settlement_rows(appointment_id).await?;
        SettlementService::validate_delete(&snapshot, has_rows)?;

        // Line items go with it via the cascading foreign key
        appointment
            .delete(&self.db)
            .await
            .map_err(|e| SettlementError::Database(e.to_string()))?;

        Ok(())
    }

    async fn load_with_snapshot(
        &self,
        appointment_id: Uuid,
    ) -> Result<(appointments::Model, AppointmentSnapshot), SettlementError> {
        let appointment = appointments::Entity::find_by_id(appointment_id)
            .one(&self.db)
            .await
            .map_err(|e| SettlementError::Database(e.to_string()))?
            .ok_or(SettlementError::AppointmentNotFound(appointment_id))?;

        let customer = customers::Entity::find_by_id(appointment.customer_id)
            .one(&self.db)
            .await
            .map_err(|e| SettlementError::Database(e.to_string()))?
            .ok_or_else(|| {
                SettlementError::Database(format!(
                    "Customer missing for appointment {appointment_id}"
                ))
            })?;

        let barber = barbers::Entity::find_by_id(appointment.barber_id)
            .one(&self.db)
            .await
            .map_err(|e| SettlementError::Database(e.to_string()))?
            .ok_or_else(|| {
                SettlementError::Database(format!(
                    "Barber missing for appointment {appointment_id}"
                ))
            })?;

        let line_items = appointment_services::Entity::find()
            .filter(appointment_services::Column::AppointmentId.eq(appointment_id))
            .all(&self.db)
            .await
            .map_err(|e| SettlementError::Database(e.to_string()))?;

        let snapshot = AppointmentSnapshot {
            id: appointment.id,
            status: appointment.status.clone().into(),
            scheduled_at: appointment.scheduled_at.with_timezone(&Utc),
            customer_name: customer.full_name(),
            barber_name: barber.full_name(),
            line_item_prices: line_items.into_iter().map(|item| item.price).collect(),
        };

        Ok((appointment, snapshot))
    }

    async fn has_settlement_rows(&self, appointment_id: Uuid) -> Result<bool, SettlementError> {
        let count = transactions::Entity::find()
            .filter(transactions::Column::AppointmentId.eq(appointment_id))
            .count(&self.db)
            .await
            .map_err(|e| SettlementError::Database(e.to_string()))?;
        Ok(count > 0)
    }
}

/// Writes the rows of a settlement plan and completes the appointment.
///
/// Runs on the caller's transaction so field updates in the same request
/// commit or roll back together with the settlement.
async fn write_settlement<C: ConnectionTrait>(
    conn: &C,
    appointment: appointments::Model,
    plan: &SettlementPlan,
) -> Result<SettlementOutcome, SettlementError> {
    let appointment_id = appointment.id;

    let default_account = default_settlement_account(conn)
        .await
        .map_err(|e| SettlementError::Database(e.to_string()))?
        .map(|account| account.id);

    let stamped = plan.settled_at.into();
    let payment_method: DbPaymentMethod = plan.payment_method.into();

    let mut entries = Vec::with_capacity(plan.legs.len());
    let mut transaction_rows = Vec::with_capacity(plan.legs.len());

    for leg in &plan.legs {
        let category = resolve_well_known(conn, leg.category)
            .await
            .map_err(|e| SettlementError::Database(e.to_string()))?;

        let entry = financial_entries::ActiveModel {
            id: Set(Uuid::now_v7()),
            amount: Set(leg.amount),
            entry_type: Set(leg.category.entry_type().into()),
            entry_date: Set(stamped),
            description: Set(leg.description.clone()),
            category_id: Set(category.id),
            bank_account_id: Set(default_account),
            reference: Set(Some(appointment_tag(appointment_id))),
            source_appointment_id: Set(Some(appointment_id)),
            source_withdrawal_id: Set(None),
            payment_method: Set(payment_method.clone()),
            created_by: Set(None),
            status: Set(DbEntryStatus::Completed),
            created_at: Set(stamped),
            updated_at: Set(stamped),
        };
        entries.push(
            entry
                .insert(conn)
                .await
                .map_err(|e| SettlementError::Database(e.to_string()))?,
        );

        let row = transactions::ActiveModel {
            id: Set(Uuid::now_v7()),
            appointment_id: Set(Some(appointment_id)),
            bank_account_id: Set(None),
            amount: Set(leg.amount),
            direction: Set(DbFlowDirection::Inflow),
            transaction_type: Set(DbTransactionKind::Normal),
            category: Set(leg.transaction_category.into()),
            status: Set(DbEntryStatus::Completed),
            payment_method: Set(payment_method.clone()),
            description: Set(Some(leg.description.clone())),
            created_at: Set(stamped),
            updated_at: Set(stamped),
        };
        transaction_rows.push(row.insert(conn).await.map_err(|e| {
            if is_unique_violation(&e) {
                SettlementError::AlreadySettled(appointment_id)
            } else {
                SettlementError::Database(e.to_string())
            }
        })?);
    }

    let mut active: appointments::ActiveModel = appointment.into();
    active.status = Set(DbAppointmentStatus::Completed);
    active.updated_at = Set(stamped);
    let appointment = active
        .update(conn)
        .await
        .map_err(|e| SettlementError::Database(e.to_string()))?;

    Ok(SettlementOutcome {
        appointment,
        entries,
        transactions: transaction_rows,
    })
}

/// Deletes every row a settlement wrote for the appointment.
async fn erase_settlement<C: ConnectionTrait>(
    conn: &C,
    appointment_id: Uuid,
) -> Result<(), SettlementError> {
    financial_entries::Entity::delete_many()
        .filter(financial_entries::Column::SourceAppointmentId.eq(appointment_id))
        .exec(conn)
        .await
        .map_err(|e| SettlementError::Database(e.to_string()))?;

    transactions::Entity::delete_many()
        .filter(transactions::Column::AppointmentId.eq(appointment_id))
        .exec(conn)
        .await
        .map_err(|e| SettlementError::Database(e.to_string()))?;

    Ok(())
}
