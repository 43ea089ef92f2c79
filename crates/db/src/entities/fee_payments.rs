//! `SeaORM` Entity for fee payments (receipts).
//!
//! The three snapshot columns freeze the student's position at collection
//! time so a printed receipt never changes retroactively. Amendments
//! recompute only `remaining_after_this`; `total_fees_at_payment` and
//! `paid_before_this` stay historical.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::PaymentMode;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "fee_payments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub student_id: Uuid,
    #[sea_orm(unique)]
    pub receipt_no: String,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub amount: Decimal,
    pub payment_mode: PaymentMode,
    pub payment_date: DateTimeWithTimeZone,
    pub remarks: Option<String>,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub total_fees_at_payment: Decimal,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub paid_before_this: Decimal,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub remaining_after_this: Decimal,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::students::Entity",
        from = "Column::StudentId",
        to = "super::students::Column::Id"
    )]
    Students,
}

impl Related<super::students::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Students.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
