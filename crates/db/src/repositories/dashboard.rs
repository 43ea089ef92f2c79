//! Dashboard repository for the admin landing-page metrics.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryFilter};

use super::fee_payment::day_range;
use crate::entities::{courses, enquiries, fee_payments, students};

/// Error types for dashboard operations.
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Metrics shown on the admin landing page.
#[derive(Debug, Clone)]
pub struct DashboardSummary {
    /// Active (not deactivated) students.
    pub active_students: u64,
    /// Enquiries on the register.
    pub open_enquiries: u64,
    /// Active catalog courses.
    pub active_courses: u64,
    /// Sum of agreed fees across active students.
    pub total_fees: Decimal,
    /// Sum of collected fees across active students.
    pub collected_fees: Decimal,
    /// `total_fees - collected_fees`.
    pub outstanding_fees: Decimal,
    /// Receipts issued today (UTC).
    pub receipts_today: u64,
    /// Amount collected today (UTC).
    pub collected_today: Decimal,
}

/// Dashboard repository for aggregate reads.
#[derive(Debug, Clone)]
pub struct DashboardRepository {
    db: DatabaseConnection,
}

impl DashboardRepository {
    /// Creates a new dashboard repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Gathers the landing-page metrics.
    ///
    /// # Errors
    ///
    /// Returns an error if a database query fails.
    pub async fn summary(&self) -> Result<DashboardSummary, DashboardError> {
        let student_rows = students::Entity::find()
            .filter(students::Column::IsActive.eq(true))
            .all(&self.db)
            .await?;

        let active_students = u64::try_from(student_rows.len()).unwrap_or(u64::MAX);
        let total_fees: Decimal = student_rows.iter().map(|s| s.total_fees).sum();
        let collected_fees: Decimal = student_rows.iter().map(|s| s.paid_fees).sum();

        let open_enquiries = enquiries::Entity::find().count(&self.db).await?;
        let active_courses = courses::Entity::find()
            .filter(courses::Column::IsActive.eq(true))
            .count(&self.db)
            .await?;

        let today = Utc::now().date_naive();
        let (receipts_today, collected_today) = match day_range(today) {
            Some((from, to)) => {
                let todays = fee_payments::Entity::find()
                    .filter(fee_payments::Column::PaymentDate.gte(from))
                    .filter(fee_payments::Column::PaymentDate.lt(to))
                    .all(&self.db)
                    .await?;

                let collected: Decimal = todays.iter().map(|p| p.amount).sum();
                (u64::try_from(todays.len()).unwrap_or(u64::MAX), collected)
            }
            None => (0, Decimal::ZERO),
        };

        Ok(DashboardSummary {
            active_students,
            open_enquiries,
            active_courses,
            total_fees,
            collected_fees,
            outstanding_fees: total_fees - collected_fees,
            receipts_today,
            collected_today,
        })
    }
}
