//! Initial database migration.
//!
//! Creates all enums, tables, indexes, triggers, and seed data for the
//! barbershop accounting schema.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;

        // ============================================================
        // PART 2: COLLABORATORS
        // ============================================================
        db.execute_unprepared(CUSTOMERS_SQL).await?;
        db.execute_unprepared(BARBERS_SQL).await?;
        db.execute_unprepared(SERVICES_SQL).await?;
        db.execute_unprepared(APPOINTMENTS_SQL).await?;
        db.execute_unprepared(APPOINTMENT_SERVICES_SQL).await?;

        // ============================================================
        // PART 3: LEDGER
        // ============================================================
        db.execute_unprepared(BANK_ACCOUNTS_SQL).await?;
        db.execute_unprepared(FINANCIAL_CATEGORIES_SQL).await?;
        db.execute_unprepared(WITHDRAWAL_REQUESTS_SQL).await?;
        db.execute_unprepared(FINANCIAL_ENTRIES_SQL).await?;
        db.execute_unprepared(TRANSACTIONS_SQL).await?;

        // ============================================================
        // PART 4: PAYROLL & SETTINGS
        // ============================================================
        db.execute_unprepared(SALARIES_SQL).await?;
        db.execute_unprepared(SETTINGS_SQL).await?;

        // ============================================================
        // PART 5: TRIGGERS
        // ============================================================
        db.execute_unprepared(TRIGGERS_SQL).await?;

        // ============================================================
        // PART 6: SEED DATA
        // ============================================================
        db.execute_unprepared(SEED_CATEGORIES_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const ENUMS_SQL: &str = r"
-- Ledger entry classification (also used for categories)
CREATE TYPE entry_type AS ENUM ('income', 'expense');

-- Processing status shared by entries and transactions
CREATE TYPE entry_status AS ENUM (
    'pending',
    'completed',
    'failed',
    'refunded'
);

-- Payment method
CREATE TYPE payment_method AS ENUM (
    'cash',
    'card',
    'card_reader',
    'transfer'
);

-- Direction of a transaction relative to its bank account
CREATE TYPE flow_direction AS ENUM ('inflow', 'outflow');

-- Kind of a transaction row
CREATE TYPE transaction_kind AS ENUM ('normal', 'transfer');

-- Business category of a transaction row
CREATE TYPE transaction_category AS ENUM (
    'service_payment',
    'tip_payment',
    'other'
);

-- Appointment lifecycle
CREATE TYPE appointment_status AS ENUM (
    'pending',
    'confirmed',
    'completed',
    'cancelled'
);

-- Withdrawal request lifecycle
CREATE TYPE withdrawal_status AS ENUM ('pending', 'approved', 'rejected');
";

const CUSTOMERS_SQL: &str = r"
CREATE TABLE customers (
    id UUID PRIMARY KEY,
    first_name VARCHAR(100) NOT NULL,
    last_name VARCHAR(100) NOT NULL,
    phone_number VARCHAR(20) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const BARBERS_SQL: &str = r"
CREATE TABLE barbers (
    id UUID PRIMARY KEY,
    first_name VARCHAR(100) NOT NULL,
    last_name VARCHAR(100) NOT NULL,
    phone_number VARCHAR(20) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const SERVICES_SQL: &str = r"
CREATE TABLE services (
    id UUID PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    price NUMERIC(15, 2) NOT NULL CHECK (price >= 0),
    duration_minutes INTEGER NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const APPOINTMENTS_SQL: &str = r"
CREATE TABLE appointments (
    id UUID PRIMARY KEY,
    customer_id UUID NOT NULL REFERENCES customers(id),
    barber_id UUID NOT NULL REFERENCES barbers(id),
    scheduled_at TIMESTAMPTZ NOT NULL,
    status appointment_status NOT NULL DEFAULT 'pending',
    notes TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_appointments_barber ON appointments(barber_id);
CREATE INDEX idx_appointments_customer ON appointments(customer_id);
CREATE INDEX idx_appointments_status ON appointments(status);
";

const APPOINTMENT_SERVICES_SQL: &str = r"
CREATE TABLE appointment_services (
    id UUID PRIMARY KEY,
    appointment_id UUID NOT NULL REFERENCES appointments(id) ON DELETE CASCADE,
    service_id UUID NOT NULL REFERENCES services(id),
    -- Price snapshot at booking time
    price NUMERIC(15, 2) NOT NULL CHECK (price >= 0),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_appointment_services_appointment ON appointment_services(appointment_id);
";

const BANK_ACCOUNTS_SQL: &str = r"
CREATE TABLE bank_accounts (
    id UUID PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    card_number VARCHAR(16) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT chk_card_number_format CHECK (card_number ~ '^[0-9]{16}$')
);
";

const FINANCIAL_CATEGORIES_SQL: &str = r"
CREATE TABLE financial_categories (
    id UUID PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    category_type entry_type NOT NULL,
    description TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT uq_financial_categories_name_type UNIQUE (name, category_type)
);
";

const WITHDRAWAL_REQUESTS_SQL: &str = r"
CREATE TABLE withdrawal_requests (
    id UUID PRIMARY KEY,
    barber_id UUID NOT NULL REFERENCES barbers(id),
    amount NUMERIC(15, 2) NOT NULL CHECK (amount > 0),
    status withdrawal_status NOT NULL DEFAULT 'pending',
    approved_by UUID,
    description TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_withdrawal_requests_barber ON withdrawal_requests(barber_id);
CREATE INDEX idx_withdrawal_requests_status ON withdrawal_requests(status);
";

const FINANCIAL_ENTRIES_SQL: &str = r"
CREATE TABLE financial_entries (
    id UUID PRIMARY KEY,
    -- Always positive; entry_type carries the sign
    amount NUMERIC(15, 2) NOT NULL CHECK (amount > 0),
    entry_type entry_type NOT NULL,
    entry_date TIMESTAMPTZ NOT NULL,
    description TEXT NOT NULL,
    category_id UUID NOT NULL REFERENCES financial_categories(id),
    bank_account_id UUID REFERENCES bank_accounts(id),
    reference VARCHAR(255),
    source_appointment_id UUID REFERENCES appointments(id),
    source_withdrawal_id UUID REFERENCES withdrawal_requests(id),
    payment_method payment_method NOT NULL DEFAULT 'cash',
    created_by UUID,
    status entry_status NOT NULL DEFAULT 'completed',
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_financial_entries_category ON financial_entries(category_id);
CREATE INDEX idx_financial_entries_bank_account ON financial_entries(bank_account_id)
    WHERE bank_account_id IS NOT NULL;
CREATE INDEX idx_financial_entries_source_appointment ON financial_entries(source_appointment_id)
    WHERE source_appointment_id IS NOT NULL;
CREATE INDEX idx_financial_entries_reference ON financial_entries(reference)
    WHERE reference IS NOT NULL;

-- At most one ledger entry per withdrawal request; a duplicate approval
-- race loses on this index
CREATE UNIQUE INDEX uq_financial_entries_source_withdrawal
    ON financial_entries(source_withdrawal_id)
    WHERE source_withdrawal_id IS NOT NULL;
";

const TRANSACTIONS_SQL: &str = r"
CREATE TABLE transactions (
    id UUID PRIMARY KEY,
    appointment_id UUID REFERENCES appointments(id),
    bank_account_id UUID REFERENCES bank_accounts(id),
    -- Always positive; direction carries the sign
    amount NUMERIC(15, 2) NOT NULL CHECK (amount > 0),
    direction flow_direction NOT NULL,
    transaction_type transaction_kind NOT NULL DEFAULT 'normal',
    category transaction_category NOT NULL DEFAULT 'other',
    status entry_status NOT NULL DEFAULT 'completed',
    payment_method payment_method NOT NULL DEFAULT 'cash',
    description TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    -- A row belongs to an appointment (settlement) or to a bank account
    -- (transfer leg), never both and never neither
    CONSTRAINT chk_transactions_owner CHECK (num_nonnulls(appointment_id, bank_account_id) = 1)
);

CREATE INDEX idx_transactions_bank_account ON transactions(bank_account_id)
    WHERE bank_account_id IS NOT NULL;

-- At most one settlement row per appointment and category; a concurrent
-- duplicate settle loses on this index
CREATE UNIQUE INDEX uq_transactions_appointment_category
    ON transactions(appointment_id, category)
    WHERE appointment_id IS NOT NULL;
";

const SALARIES_SQL: &str = r"
CREATE TABLE salaries (
    id UUID PRIMARY KEY,
    barber_id UUID NOT NULL REFERENCES barbers(id),
    amount NUMERIC(15, 2) NOT NULL CHECK (amount > 0),
    month SMALLINT NOT NULL CHECK (month BETWEEN 1 AND 12),
    year SMALLINT NOT NULL,
    is_paid BOOLEAN NOT NULL DEFAULT false,
    paid_at TIMESTAMPTZ,
    description TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT uq_salaries_barber_month_year UNIQUE (barber_id, month, year)
);
";

const SETTINGS_SQL: &str = r"
CREATE TABLE settings (
    key VARCHAR(100) PRIMARY KEY,
    value TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const TRIGGERS_SQL: &str = r"
-- ============================================================
-- FUNCTION: set_updated_at
-- Stamps updated_at on every row update
-- ============================================================
CREATE OR REPLACE FUNCTION set_updated_at()
RETURNS TRIGGER AS $$
BEGIN
    NEW.updated_at := now();
    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_customers_updated_at
BEFORE UPDATE ON customers
FOR EACH ROW EXECUTE FUNCTION set_updated_at();

CREATE TRIGGER trg_barbers_updated_at
BEFORE UPDATE ON barbers
FOR EACH ROW EXECUTE FUNCTION set_updated_at();

CREATE TRIGGER trg_services_updated_at
BEFORE UPDATE ON services
FOR EACH ROW EXECUTE FUNCTION set_updated_at();

CREATE TRIGGER trg_appointments_updated_at
BEFORE UPDATE ON appointments
FOR EACH ROW EXECUTE FUNCTION set_updated_at();

CREATE TRIGGER trg_bank_accounts_updated_at
BEFORE UPDATE ON bank_accounts
FOR EACH ROW EXECUTE FUNCTION set_updated_at();

CREATE TRIGGER trg_financial_categories_updated_at
BEFORE UPDATE ON financial_categories
FOR EACH ROW EXECUTE FUNCTION set_updated_at();

CREATE TRIGGER trg_withdrawal_requests_updated_at
BEFORE UPDATE ON withdrawal_requests
FOR EACH ROW EXECUTE FUNCTION set_updated_at();

CREATE TRIGGER trg_financial_entries_updated_at
BEFORE UPDATE ON financial_entries
FOR EACH ROW EXECUTE FUNCTION set_updated_at();

CREATE TRIGGER trg_transactions_updated_at
BEFORE UPDATE ON transactions
FOR EACH ROW EXECUTE FUNCTION set_updated_at();

CREATE TRIGGER trg_salaries_updated_at
BEFORE UPDATE ON salaries
FOR EACH ROW EXECUTE FUNCTION set_updated_at();

CREATE TRIGGER trg_settings_updated_at
BEFORE UPDATE ON settings
FOR EACH ROW EXECUTE FUNCTION set_updated_at();
";

const SEED_CATEGORIES_SQL: &str = r"
-- ============================================================
-- SEED: Well-known categories resolved by the settlement paths
-- ============================================================
INSERT INTO financial_categories (id, name, category_type, description) VALUES
(gen_random_uuid(), 'Service Income', 'income', 'Income from barbershop services'),
(gen_random_uuid(), 'Tip Income', 'income', 'Income from customer tips'),
(gen_random_uuid(), 'Salary Expense', 'expense', 'Salaries and withdrawals paid to barbers')
ON CONFLICT ON CONSTRAINT uq_financial_categories_name_type DO NOTHING;
";

const DROP_ALL_SQL: &str = r"
-- ============================================================
-- DROP ALL: Rollback migration
-- Order matters due to foreign key constraints
-- ============================================================

-- Drop triggers
DROP TRIGGER IF EXISTS trg_settings_updated_at ON settings;
DROP TRIGGER IF EXISTS trg_salaries_updated_at ON salaries;
DROP TRIGGER IF EXISTS trg_transactions_updated_at ON transactions;
DROP TRIGGER IF EXISTS trg_financial_entries_updated_at ON financial_entries;
DROP TRIGGER IF EXISTS trg_withdrawal_requests_updated_at ON withdrawal_requests;
DROP TRIGGER IF EXISTS trg_financial_categories_updated_at ON financial_categories;
DROP TRIGGER IF EXISTS trg_bank_accounts_updated_at ON bank_accounts;
DROP TRIGGER IF EXISTS trg_appointments_updated_at ON appointments;
DROP TRIGGER IF EXISTS trg_services_updated_at ON services;
DROP TRIGGER IF EXISTS trg_barbers_updated_at ON barbers;
DROP TRIGGER IF EXISTS trg_customers_updated_at ON customers;

-- Drop functions
DROP FUNCTION IF EXISTS set_updated_at();

-- Drop tables (reverse order of creation)
DROP TABLE IF EXISTS settings CASCADE;
DROP TABLE IF EXISTS salaries CASCADE;
DROP TABLE IF EXISTS transactions CASCADE;
DROP TABLE IF EXISTS financial_entries CASCADE;
DROP TABLE IF EXISTS withdrawal_requests CASCADE;
DROP TABLE IF EXISTS financial_categories CASCADE;
DROP TABLE IF EXISTS bank_accounts CASCADE;
DROP TABLE IF EXISTS appointment_services CASCADE;
DROP TABLE IF EXISTS appointments CASCADE;
DROP TABLE IF EXISTS services CASCADE;
DROP TABLE IF EXISTS barbers CASCADE;
DROP TABLE IF EXISTS customers CASCADE;

-- Drop enums
DROP TYPE IF EXISTS withdrawal_status CASCADE;
DROP TYPE IF EXISTS appointment_status CASCADE;
DROP TYPE IF EXISTS transaction_category CASCADE;
DROP TYPE IF EXISTS transaction_kind CASCADE;
DROP TYPE IF EXISTS flow_direction CASCADE;
DROP TYPE IF EXISTS payment_method CASCADE;
DROP TYPE IF EXISTS entry_status CASCADE;
DROP TYPE IF EXISTS entry_type CASCADE;
";
