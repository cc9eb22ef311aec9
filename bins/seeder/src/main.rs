//! Database seeder for Shearbook development and testing.
//!
//! Seeds barbers, customers, services, ledger categories, bank accounts,
//! the default settlement account, and sample appointments with line
//! items for local development.
//!
//! Usage: cargo run --bin seeder

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use uuid::Uuid;

use shearbook_core::ledger::WellKnownCategory;
use shearbook_db::entities::{
    appointment_services, appointments, bank_accounts, barbers, customers,
    sea_orm_active_enums::AppointmentStatus, services,
};
use shearbook_db::{CategoryRepository, SettingRepository};

// Fixed IDs keep the seed idempotent across runs.
const BARBER_MOHAMMAD_ID: &str = "00000000-0000-0000-0000-000000000001";
const BARBER_ALI_ID: &str = "00000000-0000-0000-0000-000000000002";
const CUSTOMER_REZA_ID: &str = "00000000-0000-0000-0000-000000000011";
const CUSTOMER_HASSAN_ID: &str = "00000000-0000-0000-0000-000000000012";
const CUSTOMER_MEHDI_ID: &str = "00000000-0000-0000-0000-000000000013";
const SERVICE_HAIRCUT_ID: &str = "00000000-0000-0000-0000-000000000021";
const SERVICE_BEARD_TRIM_ID: &str = "00000000-0000-0000-0000-000000000022";
const SERVICE_HAIR_COLOR_ID: &str = "00000000-0000-0000-0000-000000000023";
const SERVICE_PACKAGE_ID: &str = "00000000-0000-0000-0000-000000000024";
const BANK_MELLI_ID: &str = "00000000-0000-0000-0000-000000000031";
const BANK_SAMAN_ID: &str = "00000000-0000-0000-0000-000000000032";
const APPOINTMENT_CONFIRMED_ID: &str = "00000000-0000-0000-0000-000000000041";
const APPOINTMENT_PENDING_ID: &str = "00000000-0000-0000-0000-000000000042";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = sea_orm::Database::connect(database_url)
        .await
        .expect("Failed to connect to database");

    println!("Seeding barbers...");
    seed_barbers(&db).await;

    println!("Seeding customers...");
    seed_customers(&db).await;

    println!("Seeding services...");
    seed_services(&db).await;

    println!("Seeding ledger categories...");
    seed_categories(&db).await;

    println!("Seeding bank accounts...");
    seed_bank_accounts(&db).await;

    println!("Setting default settlement account...");
    seed_default_settlement_account(&db).await;

    println!("Seeding appointments...");
    seed_appointments(&db).await;

    println!("Seeding complete!");
}

fn fixed(id: &str) -> Uuid {
    Uuid::parse_str(id).unwrap()
}

/// Seeds the barber roster.
async fn seed_barbers(db: &DatabaseConnection) {
    let roster = [
        (BARBER_MOHAMMAD_ID, "Mohammad", "Mohammadi", "09123456789"),
        (BARBER_ALI_ID, "Ali", "Alavi", "09123456788"),
    ];

    for (id, first, last, phone) in roster {
        if barbers::Entity::find_by_id(fixed(id))
            .one(db)
            .await
            .ok()
            .flatten()
            .is_some()
        {
            println!("  Barber {first} {last} already exists, skipping...");
            continue;
        }

        let now = Utc::now().fixed_offset();
        barbers::ActiveModel {
            id: Set(fixed(id)),
            first_name: Set(first.to_string()),
            last_name: Set(last.to_string()),
            phone_number: Set(phone.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(db)
        .await
        .expect("Failed to seed barber");
    }
}

/// Seeds a few walk-in customers.
async fn seed_customers(db: &DatabaseConnection) {
    let walk_ins = [
        (CUSTOMER_REZA_ID, "Reza", "Rezaei", "09123456787"),
        (CUSTOMER_HASSAN_ID, "Hassan", "Hosseini", "09123456786"),
        (CUSTOMER_MEHDI_ID, "Mehdi", "Mahdavi", "09123456785"),
    ];

    for (id, first, last, phone) in walk_ins {
        if customers::Entity::find_by_id(fixed(id))
            .one(db)
            .await
            .ok()
            .flatten()
            .is_some()
        {
            println!("  Customer {first} {last} already exists, skipping...");
            continue;
        }

        let now = Utc::now().fixed_offset();
        customers::ActiveModel {
            id: Set(fixed(id)),
            first_name: Set(first.to_string()),
            last_name: Set(last.to_string()),
            phone_number: Set(phone.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(db)
        .await
        .expect("Failed to seed customer");
    }
}

/// Seeds the service menu.
async fn seed_services(db: &DatabaseConnection) {
    let menu = [
        (SERVICE_HAIRCUT_ID, "Haircut", 100_000, 30),
        (SERVICE_BEARD_TRIM_ID, "Beard Trim", 50_000, 20),
        (SERVICE_HAIR_COLOR_ID, "Hair Coloring", 200_000, 60),
        (SERVICE_PACKAGE_ID, "Haircut and Beard Package", 130_000, 45),
    ];

    for (id, name, price, minutes) in menu {
        if services::Entity::find_by_id(fixed(id))
            .one(db)
            .await
            .ok()
            .flatten()
            .is_some()
        {
            println!("  Service {name} already exists, skipping...");
            continue;
        }

        let now = Utc::now().fixed_offset();
        services::ActiveModel {
            id: Set(fixed(id)),
            name: Set(name.to_string()),
            price: Set(Decimal::from(price)),
            duration_minutes: Set(minutes),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(db)
        .await
        .expect("Failed to seed service");
    }
}

/// Seeds the well-known ledger categories through the resolver.
async fn seed_categories(db: &DatabaseConnection) {
    let repo = CategoryRepository::new(db.clone());

    for category in [
        WellKnownCategory::ServiceIncome,
        WellKnownCategory::TipIncome,
        WellKnownCategory::SalaryExpense,
    ] {
        let row = repo
            .resolve(category)
            .await
            .expect("Failed to seed category");
        println!("  Category {} ready", row.name);
    }
}

/// Seeds two bank accounts.
async fn seed_bank_accounts(db: &DatabaseConnection) {
    let accounts = [
        (BANK_MELLI_ID, "Melli", "6037991234567890"),
        (BANK_SAMAN_ID, "Saman", "6219861234567890"),
    ];

    for (id, name, card_number) in accounts {
        if bank_accounts::Entity::find_by_id(fixed(id))
            .one(db)
            .await
            .ok()
            .flatten()
            .is_some()
        {
            println!("  Bank account {name} already exists, skipping...");
            continue;
        }

        let now = Utc::now().fixed_offset();
        bank_accounts::ActiveModel {
            id: Set(fixed(id)),
            name: Set(name.to_string()),
            card_number: Set(card_number.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(db)
        .await
        .expect("Failed to seed bank account");
    }
}

/// Points card-reader settlements at the Melli account.
async fn seed_default_settlement_account(db: &DatabaseConnection) {
    let repo = SettingRepository::new(db.clone());

    let current = repo
        .default_settlement_account()
        .await
        .expect("Failed to read default settlement account");
    if current.is_some() {
        println!("  Default settlement account already set, skipping...");
        return;
    }

    repo.set_default_settlement_account(Some(fixed(BANK_MELLI_ID)))
        .await
        .expect("Failed to set default settlement account");
}

/// Seeds sample appointments with priced line items.
async fn seed_appointments(db: &DatabaseConnection) {
    let bookings = [
        (
            APPOINTMENT_CONFIRMED_ID,
            CUSTOMER_REZA_ID,
            BARBER_MOHAMMAD_ID,
            AppointmentStatus::Confirmed,
            1_i64,
            vec![
                (SERVICE_HAIRCUT_ID, 100_000),
                (SERVICE_BEARD_TRIM_ID, 50_000),
            ],
        ),
        (
            APPOINTMENT_PENDING_ID,
            CUSTOMER_HASSAN_ID,
            BARBER_ALI_ID,
            AppointmentStatus::Pending,
            2,
            vec![(SERVICE_HAIR_COLOR_ID, 200_000)],
        ),
    ];

    for (id, customer_id, barber_id, status, days_ahead, line_items) in bookings {
        if appointments::Entity::find_by_id(fixed(id))
            .one(db)
            .await
            .ok()
            .flatten()
            .is_some()
        {
            println!("  Appointment already exists, skipping...");
            continue;
        }

        let now = Utc::now().fixed_offset();
        appointments::ActiveModel {
            id: Set(fixed(id)),
            customer_id: Set(fixed(customer_id)),
            barber_id: Set(fixed(barber_id)),
            scheduled_at: Set((Utc::now() + Duration::days(days_ahead)).fixed_offset()),
            status: Set(status),
            notes: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(db)
        .await
        .expect("Failed to seed appointment");

        for (service_id, price) in line_items {
            appointment_services::ActiveModel {
                id: Set(Uuid::new_v4()),
                appointment_id: Set(fixed(id)),
                service_id: Set(fixed(service_id)),
                price: Set(Decimal::from(price)),
                created_at: Set(now),
            }
            .insert(db)
            .await
            .expect("Failed to seed appointment line item");
        }
    }
}
