//! `SeaORM` entity definitions.

pub mod courses;
pub mod enquiries;
pub mod fee_payments;
pub mod receipt_counters;
pub mod sea_orm_active_enums;
pub mod students;
pub mod users;
