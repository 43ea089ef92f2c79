//! `SeaORM` Entity for admitted students.
//!
//! `paid_fees` is mutated exclusively by the fee-payment repository so that
//! every change goes through the ledger's clamp and snapshot rules.
//! `remaining_fees` and `percent_paid` are never stored; they are derived by
//! [`gurukul_core::fees::FeeSummary::compute`] on read.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "students")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub enquiry_id: Option<Uuid>,
    pub full_name: String,
    pub mobile: String,
    pub email: Option<String>,
    pub education: String,
    pub address: Option<String>,
    pub course_id: Uuid,
    pub custom_course: Option<String>,
    pub admission_date: Date,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub total_fees: Decimal,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub paid_fees: Decimal,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::courses::Entity",
        from = "Column::CourseId",
        to = "super::courses::Column::Id"
    )]
    Courses,
    #[sea_orm(
        belongs_to = "super::enquiries::Entity",
        from = "Column::EnquiryId",
        to = "super::enquiries::Column::Id"
    )]
    Enquiries,
    #[sea_orm(has_many = "super::fee_payments::Entity")]
    FeePayments,
}

impl Related<super::courses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Courses.def()
    }
}

impl Related<super::enquiries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Enquiries.def()
    }
}

impl Related<super::fee_payments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FeePayments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
