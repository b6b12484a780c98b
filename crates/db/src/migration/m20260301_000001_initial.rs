//! Initial database migration.
//!
//! Creates the classification enums and all tables: operations,
//! classification rules, reference categories, monthly manual entries,
//! statement aggregates, sales, credit payments, and opening balances.

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
        // PART 2: REFERENCE TABLES
        // ============================================================
        db.execute_unprepared(INCOME_CATEGORIES_SQL).await?;
        db.execute_unprepared(EXPENSE_CATEGORIES_SQL).await?;
        db.execute_unprepared(CLASSIFICATION_RULES_SQL).await?;

        // ============================================================
        // PART 3: BANK STATEMENT DATA
        // ============================================================
        db.execute_unprepared(OPERATIONS_SQL).await?;
        db.execute_unprepared(STATEMENT_EXPENSES_SQL).await?;

        // ============================================================
        // PART 4: MONTHLY MANUAL ENTRIES
        // ============================================================
        db.execute_unprepared(MANUAL_REVENUES_SQL).await?;
        db.execute_unprepared(MANUAL_EXPENSES_SQL).await?;
        db.execute_unprepared(SALES_SQL).await?;

        // ============================================================
        // PART 5: CASH POSITION
        // ============================================================
        db.execute_unprepared(OPENING_BALANCES_SQL).await?;
        db.execute_unprepared(CREDIT_PAYMENTS_SQL).await?;

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
-- Where an amount lands in the P&L
CREATE TYPE operation_type AS ENUM (
    'REVENUE',
    'COGS',
    'OPEX',
    'CAPEX',
    'BELOW_EBITDA_DIVIDENDS',
    'BELOW_EBITDA_TRANSIT'
);

-- Departments
CREATE TYPE department AS ENUM (
    'LOGISTICS_MSK',
    'LOGISTICS_KGD',
    'ADMINISTRATION',
    'DIRECTION',
    'IT',
    'SALES',
    'SERVICE',
    'GENERAL'
);

-- Logistics pipeline stages
CREATE TYPE logistics_stage AS ENUM (
    'PICKUP',
    'DEPARTURE_WAREHOUSE',
    'MAINLINE',
    'ARRIVAL_WAREHOUSE',
    'LAST_MILE'
);

-- Shipment directions
CREATE TYPE direction AS ENUM ('MSK_TO_KGD', 'KGD_TO_MSK');

-- Transport types
CREATE TYPE transport_type AS ENUM ('AUTO', 'FERRY');

-- Credit payment kinds
CREATE TYPE credit_payment_kind AS ENUM ('CREDIT', 'LEASING');
";

const INCOME_CATEGORIES_SQL: &str = r"
CREATE TABLE income_categories (
    id UUID PRIMARY KEY,
    name TEXT NOT NULL,
    direction direction,
    transport_type transport_type,
    sort_order INTEGER NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const EXPENSE_CATEGORIES_SQL: &str = r"
CREATE TABLE expense_categories (
    id UUID PRIMARY KEY,
    name TEXT NOT NULL,
    operation_type operation_type NOT NULL,
    logistics_stage logistics_stage,
    department department,
    sort_order INTEGER NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const CLASSIFICATION_RULES_SQL: &str = r"
CREATE TABLE classification_rules (
    id UUID PRIMARY KEY,
    counterparty TEXT NOT NULL UNIQUE,
    purpose_pattern TEXT,
    operation_type operation_type NOT NULL,
    department department NOT NULL,
    logistics_stage logistics_stage,
    direction direction,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const OPERATIONS_SQL: &str = r"
CREATE TABLE operations (
    id UUID PRIMARY KEY,
    date DATE NOT NULL,
    amount NUMERIC(18, 2) NOT NULL,
    counterparty TEXT NOT NULL,
    purpose TEXT NOT NULL DEFAULT '',
    operation_type operation_type NOT NULL,
    department department NOT NULL,
    logistics_stage logistics_stage,
    direction direction,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_operations_date ON operations (date);
CREATE INDEX idx_operations_type ON operations (operation_type);
";

const STATEMENT_EXPENSES_SQL: &str = r"
CREATE TABLE statement_expenses (
    id UUID PRIMARY KEY,
    period DATE NOT NULL,
    counterparty TEXT NOT NULL,
    total_amount NUMERIC(18, 2) NOT NULL,
    transaction_count INTEGER NOT NULL DEFAULT 0,
    accounted BOOLEAN NOT NULL DEFAULT FALSE,
    category_id UUID REFERENCES expense_categories (id) ON DELETE SET NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_statement_expenses_period ON statement_expenses (period);
";

const MANUAL_REVENUES_SQL: &str = r"
CREATE TABLE manual_revenues (
    id UUID PRIMARY KEY,
    period DATE NOT NULL,
    category_id UUID NOT NULL REFERENCES income_categories (id) ON DELETE CASCADE,
    -- empty strings keep the upsert key total even when a cell
    -- is not segmented by direction or transport
    direction TEXT NOT NULL DEFAULT '',
    transport_type TEXT NOT NULL DEFAULT '',
    amount NUMERIC(18, 2) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    UNIQUE (period, category_id, direction, transport_type)
);
";

const MANUAL_EXPENSES_SQL: &str = r"
CREATE TABLE manual_expenses (
    id UUID PRIMARY KEY,
    period DATE NOT NULL,
    category_id UUID NOT NULL REFERENCES expense_categories (id) ON DELETE CASCADE,
    direction TEXT NOT NULL DEFAULT '',
    transport_type TEXT NOT NULL DEFAULT '',
    amount NUMERIC(18, 2) NOT NULL,
    comment TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    UNIQUE (period, category_id, direction, transport_type)
);
";

const SALES_SQL: &str = r"
CREATE TABLE sales (
    id UUID PRIMARY KEY,
    period DATE NOT NULL,
    direction direction NOT NULL,
    transport_type transport_type NOT NULL,
    client TEXT NOT NULL DEFAULT '—',
    weight_kg NUMERIC(18, 3) NOT NULL DEFAULT 0,
    volume NUMERIC(18, 3),
    paid_weight_kg NUMERIC(18, 3),
    revenue NUMERIC(18, 2) NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_sales_period ON sales (period);
";

const OPENING_BALANCES_SQL: &str = r"
CREATE TABLE opening_balances (
    id UUID PRIMARY KEY,
    period DATE NOT NULL UNIQUE,
    amount NUMERIC(18, 2) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const CREDIT_PAYMENTS_SQL: &str = r"
CREATE TABLE credit_payments (
    id UUID PRIMARY KEY,
    name TEXT NOT NULL,
    date DATE NOT NULL,
    amount NUMERIC(18, 2) NOT NULL,
    kind credit_payment_kind NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_credit_payments_date ON credit_payments (date);
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS credit_payments;
DROP TABLE IF EXISTS opening_balances;
DROP TABLE IF EXISTS sales;
DROP TABLE IF EXISTS manual_expenses;
DROP TABLE IF EXISTS manual_revenues;
DROP TABLE IF EXISTS statement_expenses;
DROP TABLE IF EXISTS operations;
DROP TABLE IF EXISTS classification_rules;
DROP TABLE IF EXISTS expense_categories;
DROP TABLE IF EXISTS income_categories;

DROP TYPE IF EXISTS credit_payment_kind;
DROP TYPE IF EXISTS transport_type;
DROP TYPE IF EXISTS direction;
DROP TYPE IF EXISTS logistics_stage;
DROP TYPE IF EXISTS department;
DROP TYPE IF EXISTS operation_type;
";
