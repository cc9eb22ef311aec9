//! Integration tests for the appointment settlement path.
//!
//! These tests need a running Postgres reachable through `DATABASE_URL`;
//! each test skips itself when the variable is not set.

use std::env;

use chrono::{TimeZone, Utc};
use chrono_tz::Tz;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Database, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use sea_orm_migration::MigratorTrait;
use uuid::Uuid;

use shearbook_core::ledger::{PaymentMethod, appointment_tag};
use shearbook_core::settlement::{AppointmentStatus, SettlementError, SettlementRequest};
use shearbook_db::AppointmentRepository;
use shearbook_db::entities::{
    appointment_services, appointments, barbers, customers, financial_entries,
    sea_orm_active_enums::{
        AppointmentStatus as DbAppointmentStatus, EntryType as DbEntryType,
        TransactionCategory as DbTransactionCategory,
    },
    services, transactions,
};
use shearbook_db::migration::Migrator;
use shearbook_db::repositories::appointment::{UpdateAppointmentInput, UpdateOutcome};

async fn setup() -> Option<DatabaseConnection> {
    let Ok(url) = env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set; skipping integration test");
        return None;
    };
    let db = Database::connect(&url)
        .await
        .expect("Failed to connect to database");
    Migrator::up(&db, None).await.expect("Failed to migrate");
    Some(db)
}

fn shop_tz() -> Tz {
    "Asia/Tehran".parse().expect("valid timezone")
}

/// Seeds a confirmed appointment for Ali Mohammadi with Reza Ahmadi,
/// scheduled 2026-03-05 10:30 UTC (14:00 Tehran), one line item per price.
async fn seed_appointment(db: &DatabaseConnection, prices: &[Decimal]) -> Uuid {
    let now = Utc::now().into();

    let customer_id = Uuid::now_v7();
    customers::ActiveModel {
        id: Set(customer_id),
        first_name: Set("Ali".to_string()),
        last_name: Set("Mohammadi".to_string()),
        phone_number: Set("09120000001".to_string()),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .expect("insert customer");

    let barber_id = Uuid::now_v7();
    barbers::ActiveModel {
        id: Set(barber_id),
        first_name: Set("Reza".to_string()),
        last_name: Set("Ahmadi".to_string()),
        phone_number: Set("09120000002".to_string()),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .expect("insert barber");

    let appointment_id = Uuid::now_v7();
    let scheduled_at = Utc.with_ymd_and_hms(2026, 3, 5, 10, 30, 0).unwrap();
    appointments::ActiveModel {
        id: Set(appointment_id),
        customer_id: Set(customer_id),
        barber_id: Set(barber_id),
        scheduled_at: Set(scheduled_at.into()),
        status: Set(DbAppointmentStatus::Confirmed),
        notes: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .expect("insert appointment");

    for price in prices {
        let service_id = Uuid::now_v7();
        services::ActiveModel {
            id: Set(service_id),
            name: Set("Haircut".to_string()),
            price: Set(*price),
            duration_minutes: Set(30),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(db)
        .await
        .expect("insert service");

        appointment_services::ActiveModel {
            id: Set(Uuid::now_v7()),
            appointment_id: Set(appointment_id),
            service_id: Set(service_id),
            price: Set(*price),
            created_at: Set(now),
        }
        .insert(db)
        .await
        .expect("insert line item");
    }

    appointment_id
}

async fn entries_for(db: &DatabaseConnection, appointment_id: Uuid) -> Vec<financial_entries::Model> {
    financial_entries::Entity::find()
        .filter(financial_entries::Column::SourceAppointmentId.eq(appointment_id))
        .all(db)
        .await
        .expect("load entries")
}

async fn transactions_for(db: &DatabaseConnection, appointment_id: Uuid) -> Vec<transactions::Model> {
    transactions::Entity::find()
        .filter(transactions::Column::AppointmentId.eq(appointment_id))
        .all(db)
        .await
        .expect("load transactions")
}

#[tokio::test]
async fn test_settle_writes_service_and_tip_legs() {
    let Some(db) = setup().await else { return };
    let appointment_id = seed_appointment(&db, &[dec!(100000), dec!(50000)]).await;
    let repo = AppointmentRepository::new(db.clone());

    let request = SettlementRequest {
        amount: None,
        tip_amount: Some(dec!(20000)),
        payment_method: Some(PaymentMethod::Card),
    };
    let outcome = repo
        .settle(appointment_id, &request, shop_tz())
        .await
        .expect("settle");

    assert_eq!(outcome.appointment.status, DbAppointmentStatus::Completed);
    assert_eq!(outcome.entries.len(), 2);
    assert_eq!(outcome.transactions.len(), 2);

    let service_entry = &outcome.entries[0];
    assert_eq!(service_entry.amount, dec!(150000));
    assert_eq!(service_entry.entry_type, DbEntryType::Income);
    assert_eq!(
        service_entry.reference.as_deref(),
        Some(appointment_tag(appointment_id).as_str())
    );
    assert_eq!(
        service_entry.description,
        format!(
            "Settlement of appointment {appointment_id} for Ali Mohammadi with Reza Ahmadi on 2026-03-05 at 14:00"
        )
    );

    let tip_entry = &outcome.entries[1];
    assert_eq!(tip_entry.amount, dec!(20000));
    assert_eq!(
        tip_entry.description,
        format!(
            "Tip for appointment {appointment_id} from Ali Mohammadi to Reza Ahmadi on 2026-03-05 at 14:00"
        )
    );

    assert_eq!(
        outcome.transactions[0].category,
        DbTransactionCategory::ServicePayment
    );
    assert_eq!(
        outcome.transactions[1].category,
        DbTransactionCategory::TipPayment
    );
    assert!(outcome.transactions.iter().all(|t| t.appointment_id == Some(appointment_id)));
    assert!(outcome.transactions.iter().all(|t| t.bank_account_id.is_none()));
}

#[tokio::test]
async fn test_settle_twice_is_rejected() {
    let Some(db) = setup().await else { return };
    let appointment_id = seed_appointment(&db, &[dec!(100000)]).await;
    let repo = AppointmentRepository::new(db.clone());

    repo.settle(appointment_id, &SettlementRequest::default(), shop_tz())
        .await
        .expect("first settle");

    let err = repo
        .settle(appointment_id, &SettlementRequest::default(), shop_tz())
        .await
        .expect_err("second settle must fail");
    assert!(matches!(err, SettlementError::AlreadySettled(id) if id == appointment_id));

    // Exactly one settlement's rows exist
    assert_eq!(entries_for(&db, appointment_id).await.len(), 1);
    assert_eq!(transactions_for(&db, appointment_id).await.len(), 1);
}

#[tokio::test]
async fn test_settle_cancelled_is_rejected() {
    let Some(db) = setup().await else { return };
    let appointment_id = seed_appointment(&db, &[dec!(100000)]).await;

    let appointment = appointments::Entity::find_by_id(appointment_id)
        .one(&db)
        .await
        .expect("load")
        .expect("exists");
    let mut active: appointments::ActiveModel = appointment.into();
    active.status = Set(DbAppointmentStatus::Cancelled);
    active.update(&db).await.expect("cancel");

    let repo = AppointmentRepository::new(db.clone());
    let err = repo
        .settle(appointment_id, &SettlementRequest::default(), shop_tz())
        .await
        .expect_err("settling a cancelled appointment must fail");
    assert!(matches!(err, SettlementError::NotSettleable { .. }));
}

#[tokio::test]
async fn test_zero_amount_settlement_writes_no_rows() {
    let Some(db) = setup().await else { return };
    let appointment_id = seed_appointment(&db, &[]).await;
    let repo = AppointmentRepository::new(db.clone());

    let outcome = repo
        .settle(appointment_id, &SettlementRequest::default(), shop_tz())
        .await
        .expect("settle");

    assert_eq!(outcome.appointment.status, DbAppointmentStatus::Completed);
    assert!(outcome.entries.is_empty());
    assert!(outcome.transactions.is_empty());
}

#[tokio::test]
async fn test_cancel_settled_removes_every_row() {
    let Some(db) = setup().await else { return };
    let appointment_id = seed_appointment(&db, &[dec!(100000)]).await;
    let repo = AppointmentRepository::new(db.clone());

    repo.settle(appointment_id, &SettlementRequest::default(), shop_tz())
        .await
        .expect("settle");

    let appointment = repo
        .cancel_settled(appointment_id)
        .await
        .expect("cancel settled");

    assert_eq!(appointment.status, DbAppointmentStatus::Cancelled);
    assert!(entries_for(&db, appointment_id).await.is_empty());
    assert!(transactions_for(&db, appointment_id).await.is_empty());
}

#[tokio::test]
async fn test_cancel_unsettled_is_rejected() {
    let Some(db) = setup().await else { return };
    let appointment_id = seed_appointment(&db, &[dec!(100000)]).await;
    let repo = AppointmentRepository::new(db.clone());

    let err = repo
        .cancel_settled(appointment_id)
        .await
        .expect_err("nothing to reverse");
    assert!(matches!(err, SettlementError::NotSettled(id) if id == appointment_id));
}

#[tokio::test]
async fn test_delete_settled_is_locked() {
    let Some(db) = setup().await else { return };
    let appointment_id = seed_appointment(&db, &[dec!(100000)]).await;
    let repo = AppointmentRepository::new(db.clone());

    repo.settle(appointment_id, &SettlementRequest::default(), shop_tz())
        .await
        .expect("settle");

    let err = repo.delete(appointment_id).await.expect_err("locked");
    assert!(matches!(err, SettlementError::SettledAppointmentLocked(id) if id == appointment_id));
}

#[tokio::test]
async fn test_delete_unsettled_removes_line_items() {
    let Some(db) = setup().await else { return };
    let appointment_id = seed_appointment(&db, &[dec!(100000), dec!(50000)]).await;
    let repo = AppointmentRepository::new(db.clone());

    repo.delete(appointment_id).await.expect("delete");

    let gone = appointments::Entity::find_by_id(appointment_id)
        .one(&db)
        .await
        .expect("query");
    assert!(gone.is_none());

    let line_items = appointment_services::Entity::find()
        .filter(appointment_services::Column::AppointmentId.eq(appointment_id))
        .all(&db)
        .await
        .expect("query line items");
    assert!(line_items.is_empty());
}

#[tokio::test]
async fn test_update_to_completed_settles_with_defaults() {
    let Some(db) = setup().await else { return };
    let appointment_id = seed_appointment(&db, &[dec!(100000), dec!(50000)]).await;
    let repo = AppointmentRepository::new(db.clone());

    let input = UpdateAppointmentInput {
        status: Some(AppointmentStatus::Completed),
        ..Default::default()
    };
    let outcome = repo
        .update(appointment_id, input, shop_tz())
        .await
        .expect("update");

    let UpdateOutcome::Settled(settlement) = outcome else {
        panic!("expected settlement side effect");
    };
    // Defaults: line-item total, no tip leg
    assert_eq!(settlement.entries.len(), 1);
    assert_eq!(settlement.entries[0].amount, dec!(150000));
    assert_eq!(settlement.appointment.status, DbAppointmentStatus::Completed);
}

#[tokio::test]
async fn test_update_settled_to_cancelled_reverses() {
    let Some(db) = setup().await else { return };
    let appointment_id = seed_appointment(&db, &[dec!(100000)]).await;
    let repo = AppointmentRepository::new(db.clone());

    repo.settle(appointment_id, &SettlementRequest::default(), shop_tz())
        .await
        .expect("settle");

    let input = UpdateAppointmentInput {
        status: Some(AppointmentStatus::Cancelled),
        ..Default::default()
    };
    let outcome = repo
        .update(appointment_id, input, shop_tz())
        .await
        .expect("update");

    let UpdateOutcome::Reversed(appointment) = outcome else {
        panic!("expected reversal side effect");
    };
    assert_eq!(appointment.status, DbAppointmentStatus::Cancelled);
    assert!(entries_for(&db, appointment_id).await.is_empty());
    assert!(transactions_for(&db, appointment_id).await.is_empty());
}

#[tokio::test]
async fn test_update_plain_fields_leaves_ledger_alone() {
    let Some(db) = setup().await else { return };
    let appointment_id = seed_appointment(&db, &[dec!(100000)]).await;
    let repo = AppointmentRepository::new(db.clone());

    let input = UpdateAppointmentInput {
        notes: Some("walk-in".to_string()),
        ..Default::default()
    };
    let outcome = repo
        .update(appointment_id, input, shop_tz())
        .await
        .expect("update");

    let UpdateOutcome::Updated(appointment) = outcome else {
        panic!("expected plain update");
    };
    assert_eq!(appointment.notes.as_deref(), Some("walk-in"));
    assert_eq!(appointment.status, DbAppointmentStatus::Confirmed);
    assert!(entries_for(&db, appointment_id).await.is_empty());
}
