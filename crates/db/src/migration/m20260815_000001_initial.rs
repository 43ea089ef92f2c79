//! Initial database migration.
//!
//! Creates all tables, enums, and indexes for the admissions and fee-ledger
//! schema, and seeds the receipt counter row.

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
        // PART 2: OPERATORS
        // ============================================================
        db.execute_unprepared(USERS_SQL).await?;

        // ============================================================
        // PART 3: ADMISSIONS
        // ============================================================
        db.execute_unprepared(COURSES_SQL).await?;
        db.execute_unprepared(ENQUIRIES_SQL).await?;
        db.execute_unprepared(STUDENTS_SQL).await?;

        // ============================================================
        // PART 4: FEE LEDGER
        // ============================================================
        db.execute_unprepared(FEE_PAYMENTS_SQL).await?;
        db.execute_unprepared(RECEIPT_COUNTERS_SQL).await?;

        // ============================================================
        // PART 5: SEED DATA
        // ============================================================
        db.execute_unprepared(SEED_RECEIPT_COUNTER_SQL).await?;

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
-- Operator roles
CREATE TYPE user_role AS ENUM (
    'admin',
    'staff'
);

-- Payment modes accepted at the fee desk
CREATE TYPE payment_mode AS ENUM (
    'cash',
    'upi',
    'card',
    'bank_transfer'
);
";

const USERS_SQL: &str = r"
CREATE TABLE users (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    email VARCHAR(255) NOT NULL UNIQUE,
    password_hash VARCHAR(255) NOT NULL,
    full_name VARCHAR(255) NOT NULL,
    role user_role NOT NULL DEFAULT 'staff',
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_users_email ON users(email) WHERE is_active = true;
";

const COURSES_SQL: &str = r"
CREATE TABLE courses (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(150) NOT NULL UNIQUE,
    code VARCHAR(20) NOT NULL UNIQUE,
    duration_months INTEGER NOT NULL,
    default_fees NUMERIC(10, 2) NOT NULL DEFAULT 0,
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_course_duration CHECK (duration_months > 0),
    CONSTRAINT chk_course_fees CHECK (default_fees >= 0)
);
";

const ENQUIRIES_SQL: &str = r"
CREATE TABLE enquiries (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(255) NOT NULL,
    mobile VARCHAR(20) NOT NULL,
    education VARCHAR(255) NOT NULL,
    course_interest VARCHAR(255) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_enquiries_created ON enquiries(created_at DESC);
";

const STUDENTS_SQL: &str = r"
CREATE TABLE students (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    enquiry_id UUID REFERENCES enquiries(id) ON DELETE SET NULL,
    full_name VARCHAR(255) NOT NULL,
    mobile VARCHAR(20) NOT NULL,
    email VARCHAR(255),
    education VARCHAR(255) NOT NULL,
    address TEXT,
    course_id UUID NOT NULL REFERENCES courses(id) ON DELETE RESTRICT,
    custom_course VARCHAR(255),
    admission_date DATE NOT NULL,
    total_fees NUMERIC(10, 2) NOT NULL,
    paid_fees NUMERIC(10, 2) NOT NULL DEFAULT 0,
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_total_fees_non_negative CHECK (total_fees >= 0),
    CONSTRAINT chk_paid_fees_non_negative CHECK (paid_fees >= 0)
);

CREATE INDEX idx_students_course ON students(course_id);
CREATE INDEX idx_students_admission ON students(admission_date DESC);
CREATE INDEX idx_students_mobile ON students(mobile);
";

const FEE_PAYMENTS_SQL: &str = r"
CREATE TABLE fee_payments (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    student_id UUID NOT NULL REFERENCES students(id) ON DELETE CASCADE,
    receipt_no VARCHAR(20) NOT NULL UNIQUE,
    amount NUMERIC(10, 2) NOT NULL,
    payment_mode payment_mode NOT NULL DEFAULT 'cash',
    payment_date TIMESTAMPTZ NOT NULL DEFAULT now(),
    remarks TEXT,
    total_fees_at_payment NUMERIC(10, 2) NOT NULL,
    paid_before_this NUMERIC(10, 2) NOT NULL,
    remaining_after_this NUMERIC(10, 2) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_payment_amount_positive CHECK (amount > 0)
);

CREATE INDEX idx_fee_payments_student ON fee_payments(student_id, payment_date DESC);
CREATE INDEX idx_fee_payments_date ON fee_payments(payment_date DESC);
";

const RECEIPT_COUNTERS_SQL: &str = r"
CREATE TABLE receipt_counters (
    id SMALLINT PRIMARY KEY,
    last_value BIGINT NOT NULL DEFAULT 0,
    CONSTRAINT chk_counter_singleton CHECK (id = 1)
);
";

const SEED_RECEIPT_COUNTER_SQL: &str = r"
-- ============================================================
-- SEED: Receipt counter (single row, locked FOR UPDATE per payment)
-- ============================================================
INSERT INTO receipt_counters (id, last_value) VALUES (1, 0);
";

const DROP_ALL_SQL: &str = r"
-- ============================================================
-- DROP ALL: Rollback migration
-- Order matters due to foreign key constraints
-- ============================================================

DROP TABLE IF EXISTS receipt_counters CASCADE;
DROP TABLE IF EXISTS fee_payments CASCADE;
DROP TABLE IF EXISTS students CASCADE;
DROP TABLE IF EXISTS enquiries CASCADE;
DROP TABLE IF EXISTS courses CASCADE;
DROP TABLE IF EXISTS users CASCADE;

-- Drop enums
DROP TYPE IF EXISTS payment_mode CASCADE;
DROP TYPE IF EXISTS user_role CASCADE;
";
