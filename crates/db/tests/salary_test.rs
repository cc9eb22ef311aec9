//! Integration tests for salary records and salary payment.
//!
//! These tests need a running Postgres reachable through `DATABASE_URL`;
//! each test skips itself when the variable is not set.

use std::env;

use chrono::Utc;
use rust_decimal_macros::dec;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Database, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use sea_orm_migration::MigratorTrait;
use uuid::Uuid;

use shearbook_core::ledger::{LedgerError, salary_tag};
use shearbook_db::SalaryRepository;
use shearbook_db::entities::{
    barbers, financial_entries, salaries,
    sea_orm_active_enums::EntryType as DbEntryType,
};
use shearbook_db::migration::Migrator;
use shearbook_db::repositories::salary::{
    CreateSalaryInput, PaySalaryInput, SalaryFilter, UpdateSalaryInput,
};

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

async fn seed_barber(db: &DatabaseConnection) -> Uuid {
    let now = Utc::now().into();
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
    barber_id
}

async fn payment_entry_for(
    db: &DatabaseConnection,
    salary_id: Uuid,
) -> Option<financial_entries::Model> {
    financial_entries::Entity::find()
        .filter(financial_entries::Column::Reference.eq(salary_tag(salary_id)))
        .one(db)
        .await
        .expect("query payment entry")
}

#[tokio::test]
async fn test_create_salary_record() {
    let Some(db) = setup().await else { return };
    let barber_id = seed_barber(&db).await;
    let repo = SalaryRepository::new(db.clone());

    let salary = repo
        .create(CreateSalaryInput {
            barber_id,
            amount: dec!(5000000),
            month: 3,
            year: 2026,
            description: None,
        })
        .await
        .expect("create");

    assert_eq!(salary.amount, dec!(5000000));
    assert_eq!(salary.month, 3);
    assert_eq!(salary.year, 2026);
    assert!(!salary.is_paid);
    assert!(salary.paid_at.is_none());
}

#[tokio::test]
async fn test_create_rejects_second_record_for_same_month() {
    let Some(db) = setup().await else { return };
    let barber_id = seed_barber(&db).await;
    let repo = SalaryRepository::new(db.clone());

    let input = CreateSalaryInput {
        barber_id,
        amount: dec!(5000000),
        month: 4,
        year: 2026,
        description: None,
    };
    repo.create(input.clone()).await.expect("first create");

    let err = repo.create(input).await.expect_err("duplicate month");
    assert!(matches!(
        err,
        LedgerError::DuplicateSalary { barber_id: b, month: 4, year: 2026 } if b == barber_id
    ));
}

#[tokio::test]
async fn test_create_rejects_invalid_month() {
    let Some(db) = setup().await else { return };
    let barber_id = seed_barber(&db).await;
    let repo = SalaryRepository::new(db.clone());

    let err = repo
        .create(CreateSalaryInput {
            barber_id,
            amount: dec!(5000000),
            month: 13,
            year: 2026,
            description: None,
        })
        .await
        .expect_err("month out of range");
    assert!(matches!(err, LedgerError::InvalidMonth(13)));
}

#[tokio::test]
async fn test_pay_books_expense_entry() {
    let Some(db) = setup().await else { return };
    let barber_id = seed_barber(&db).await;
    let repo = SalaryRepository::new(db.clone());
    let payer_id = Uuid::now_v7();

    let salary = repo
        .create(CreateSalaryInput {
            barber_id,
            amount: dec!(5000000),
            month: 3,
            year: 2026,
            description: None,
        })
        .await
        .expect("create");

    let paid = repo
        .pay(
            salary.id,
            PaySalaryInput {
                bank_account_id: None,
                paid_by: Some(payer_id),
            },
        )
        .await
        .expect("pay");

    assert!(paid.salary.is_paid);
    assert!(paid.salary.paid_at.is_some());

    let entry = paid.entry;
    assert_eq!(entry.amount, dec!(5000000));
    assert_eq!(entry.entry_type, DbEntryType::Expense);
    assert_eq!(entry.description, "Salary payment for March 2026");
    assert_eq!(entry.reference.as_deref(), Some(salary_tag(salary.id).as_str()));
    assert_eq!(entry.created_by, Some(payer_id));
    assert!(entry.source_appointment_id.is_none());
    assert!(entry.source_withdrawal_id.is_none());
}

#[tokio::test]
async fn test_pay_twice_is_rejected() {
    let Some(db) = setup().await else { return };
    let barber_id = seed_barber(&db).await;
    let repo = SalaryRepository::new(db.clone());

    let salary = repo
        .create(CreateSalaryInput {
            barber_id,
            amount: dec!(5000000),
            month: 5,
            year: 2026,
            description: None,
        })
        .await
        .expect("create");

    repo.pay(salary.id, PaySalaryInput::default())
        .await
        .expect("first pay");

    let err = repo
        .pay(salary.id, PaySalaryInput::default())
        .await
        .expect_err("second pay must fail");
    assert!(matches!(err, LedgerError::SalaryAlreadyPaid(id) if id == salary.id));

    // Exactly one payment entry exists
    let entries = financial_entries::Entity::find()
        .filter(financial_entries::Column::Reference.eq(salary_tag(salary.id)))
        .all(&db)
        .await
        .expect("query entries");
    assert_eq!(entries.len(), 1);
}

#[tokio::test]
async fn test_update_paid_salary_is_rejected() {
    let Some(db) = setup().await else { return };
    let barber_id = seed_barber(&db).await;
    let repo = SalaryRepository::new(db.clone());

    let salary = repo
        .create(CreateSalaryInput {
            barber_id,
            amount: dec!(5000000),
            month: 6,
            year: 2026,
            description: None,
        })
        .await
        .expect("create");
    repo.pay(salary.id, PaySalaryInput::default())
        .await
        .expect("pay");

    let err = repo
        .update(
            salary.id,
            UpdateSalaryInput {
                amount: Some(dec!(6000000)),
                ..Default::default()
            },
        )
        .await
        .expect_err("paid salaries are frozen");
    assert!(matches!(err, LedgerError::SalaryAlreadyPaid(id) if id == salary.id));
}

#[tokio::test]
async fn test_update_unpaid_salary() {
    let Some(db) = setup().await else { return };
    let barber_id = seed_barber(&db).await;
    let repo = SalaryRepository::new(db.clone());

    let salary = repo
        .create(CreateSalaryInput {
            barber_id,
            amount: dec!(5000000),
            month: 7,
            year: 2026,
            description: None,
        })
        .await
        .expect("create");

    let updated = repo
        .update(
            salary.id,
            UpdateSalaryInput {
                amount: Some(dec!(5500000)),
                description: Some("raise".to_string()),
                ..Default::default()
            },
        )
        .await
        .expect("update");
    assert_eq!(updated.amount, dec!(5500000));
    assert_eq!(updated.description.as_deref(), Some("raise"));
}

#[tokio::test]
async fn test_delete_removes_payment_entry() {
    let Some(db) = setup().await else { return };
    let barber_id = seed_barber(&db).await;
    let repo = SalaryRepository::new(db.clone());

    let salary = repo
        .create(CreateSalaryInput {
            barber_id,
            amount: dec!(5000000),
            month: 8,
            year: 2026,
            description: None,
        })
        .await
        .expect("create");
    repo.pay(salary.id, PaySalaryInput::default())
        .await
        .expect("pay");
    assert!(payment_entry_for(&db, salary.id).await.is_some());

    repo.delete(salary.id).await.expect("delete");

    let gone = salaries::Entity::find_by_id(salary.id)
        .one(&db)
        .await
        .expect("query");
    assert!(gone.is_none());
    assert!(payment_entry_for(&db, salary.id).await.is_none());
}

#[tokio::test]
async fn test_list_filters_by_barber_and_paid_state() {
    let Some(db) = setup().await else { return };
    let barber_id = seed_barber(&db).await;
    let other_barber = seed_barber(&db).await;
    let repo = SalaryRepository::new(db.clone());

    let paid = repo
        .create(CreateSalaryInput {
            barber_id,
            amount: dec!(5000000),
            month: 1,
            year: 2026,
            description: None,
        })
        .await
        .expect("create");
    repo.pay(paid.id, PaySalaryInput::default()).await.expect("pay");

    repo.create(CreateSalaryInput {
        barber_id,
        amount: dec!(5000000),
        month: 2,
        year: 2026,
        description: None,
    })
    .await
    .expect("create unpaid");

    repo.create(CreateSalaryInput {
        barber_id: other_barber,
        amount: dec!(4000000),
        month: 1,
        year: 2026,
        description: None,
    })
    .await
    .expect("create for other barber");

    let rows = repo
        .list(SalaryFilter {
            barber_id: Some(barber_id),
            ..Default::default()
        })
        .await
        .expect("list");
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|row| row.salary.barber_id == barber_id));
    assert!(rows.iter().all(|row| row.barber_name == "Reza Ahmadi"));

    let unpaid_only = repo
        .list(SalaryFilter {
            barber_id: Some(barber_id),
            is_paid: Some(false),
            ..Default::default()
        })
        .await
        .expect("list unpaid");
    assert_eq!(unpaid_only.len(), 1);
    assert_eq!(unpaid_only[0].salary.month, 2);
}
