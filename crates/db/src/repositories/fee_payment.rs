//! Fee payment repository — the receipt ledger.
//!
//! Every mutating operation runs inside one database transaction and locks
//! the student row `FOR UPDATE`, so operations against one student are
//! serialized while different students proceed concurrently. All changes to
//! `paid_fees` go through [`apply_paid_delta`], and receipt numbers come
//! from the single counter row locked in the same transaction.

use std::collections::HashMap;

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use sea_orm::sea_query::{Expr, extension::postgres::PgExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DatabaseTransaction, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::warn;
use uuid::Uuid;

use gurukul_core::fees::{
    AmendPaymentInput, FeePosition, LedgerError, RecordPaymentInput, apply_paid_delta,
    format_receipt_no, payment_snapshot, remaining_after_amend, validate_payment_amount,
};
use gurukul_shared::types::PageRequest;

use super::student::{display_course, like_pattern};
use crate::entities::{courses, fee_payments, receipt_counters, students};

/// Primary key of the single counter row seeded by the initial migration.
const RECEIPT_COUNTER_ID: i16 = 1;

/// Error types for fee payment operations.
#[derive(Debug, thiserror::Error)]
pub enum FeePaymentError {
    /// A ledger rule rejected the operation.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Filter options for listing receipts.
#[derive(Debug, Clone, Default)]
pub struct ReceiptFilter {
    /// Case-insensitive contains match over student name and receipt number.
    pub search: Option<String>,
    /// Exact calendar day (UTC).
    pub date: Option<NaiveDate>,
    /// Calendar month (1-12); combined with `year`, or the current year.
    pub month: Option<u32>,
    /// Calendar year.
    pub year: Option<i32>,
    /// Page selection.
    pub page: PageRequest,
}

/// A payment joined with its student and resolved course label.
#[derive(Debug, Clone)]
pub struct PaymentWithStudent {
    /// Payment row.
    pub payment: fee_payments::Model,
    /// Student row; after a mutation this carries the updated totals.
    pub student: students::Model,
    /// Display course for the receipt header.
    pub course_name: String,
}

/// Aggregate figures for a filtered receipt listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectionSummary {
    /// Number of receipts matched.
    pub receipt_count: u64,
    /// Sum of payment amounts.
    pub total_collected: Decimal,
    /// Sum of each receipt's remaining-after snapshot.
    pub total_remaining: Decimal,
}

/// Fee payment repository for ledger operations.
#[derive(Debug, Clone)]
pub struct FeePaymentRepository {
    db: DatabaseConnection,
}

impl FeePaymentRepository {
    /// Creates a new fee payment repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records a payment and allocates the next receipt number.
    ///
    /// # Errors
    ///
    /// Returns an error if the student does not exist, the amount fails the
    /// ledger rules (non-positive, or more than the remaining fees on the
    /// locked row), or a database operation fails.
    pub async fn record(
        &self,
        input: RecordPaymentInput,
    ) -> Result<PaymentWithStudent, FeePaymentError> {
        let txn = self.db.begin().await?;

        let student = students::Entity::find_by_id(input.student_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(LedgerError::StudentNotFound(input.student_id))?;

        let position = FeePosition {
            total_fees: student.total_fees,
            paid_fees: student.paid_fees,
        };
        validate_payment_amount(input.amount, position.remaining())?;
        let snapshot = payment_snapshot(position, input.amount);

        let receipt_no = next_receipt_no(&txn).await?;

        let now = Utc::now();
        let payment_date = input
            .payment_date
            .map_or(now, |date| date.and_time(NaiveTime::MIN).and_utc());

        let payment = fee_payments::ActiveModel {
            id: Set(Uuid::new_v4()),
            student_id: Set(student.id),
            receipt_no: Set(receipt_no),
            amount: Set(input.amount),
            payment_mode: Set(input.mode.into()),
            payment_date: Set(payment_date.into()),
            remarks: Set(input.remarks),
            total_fees_at_payment: Set(snapshot.total_fees_at_payment),
            paid_before_this: Set(snapshot.paid_before_this),
            remaining_after_this: Set(snapshot.remaining_after_this),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
        .insert(&txn)
        .await?;

        let new_paid = apply_paid_delta(student.paid_fees, input.amount);
        let mut updated: students::ActiveModel = student.into();
        updated.paid_fees = Set(new_paid);
        updated.updated_at = Set(now.into());
        let student = updated.update(&txn).await?;

        txn.commit().await?;

        let course_name = self.course_label(&student).await?;
        Ok(PaymentWithStudent {
            payment,
            student,
            course_name,
        })
    }

    /// Amends a payment's amount, date, or remarks.
    ///
    /// The student's `paid_fees` moves by the amount difference, clamped at
    /// zero on the low side only. A difference that pushes `paid_fees` past
    /// `total_fees` is logged and applied, not rejected; the over-collection
    /// shows up in the derived summary.
    ///
    /// # Errors
    ///
    /// Returns an error if the payment or its student does not exist, the
    /// new amount is non-positive, or a database operation fails.
    pub async fn amend(
        &self,
        input: AmendPaymentInput,
    ) -> Result<PaymentWithStudent, FeePaymentError> {
        let txn = self.db.begin().await?;

        let payment = find_payment(&txn, input.payment_id).await?;

        // Lock the student row, then re-read the payment under that lock so
        // a concurrent amend or reversal cannot slip between the two reads.
        let student = students::Entity::find_by_id(payment.student_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(LedgerError::StudentNotFound(payment.student_id))?;
        let payment = find_payment(&txn, input.payment_id).await?;

        let now = Utc::now();
        let old_amount = payment.amount;
        let total_at = payment.total_fees_at_payment;
        let paid_before = payment.paid_before_this;
        let receipt_no = payment.receipt_no.clone();

        let mut active: fee_payments::ActiveModel = payment.into();

        let student = if let Some(new_amount) = input.new_amount {
            let difference = new_amount - old_amount;
            let new_paid = apply_paid_delta(student.paid_fees, difference);
            if new_paid > student.total_fees {
                warn!(
                    receipt_no = %receipt_no,
                    %new_paid,
                    total_fees = %student.total_fees,
                    "amendment pushed paid fees past the total; applied, not rejected"
                );
            }

            active.amount = Set(new_amount);
            active.remaining_after_this =
                Set(remaining_after_amend(total_at, paid_before, new_amount));

            let mut updated: students::ActiveModel = student.into();
            updated.paid_fees = Set(new_paid);
            updated.updated_at = Set(now.into());
            updated.update(&txn).await?
        } else {
            student
        };

        if let Some(new_date) = input.new_payment_date {
            active.payment_date = Set(new_date.and_time(NaiveTime::MIN).and_utc().into());
        }
        if let Some(new_remarks) = input.new_remarks {
            active.remarks = Set(normalize_remarks(new_remarks));
        }
        active.updated_at = Set(now.into());

        let payment = active.update(&txn).await?;
        txn.commit().await?;

        let course_name = self.course_label(&student).await?;
        Ok(PaymentWithStudent {
            payment,
            student,
            course_name,
        })
    }

    /// Reverses a payment: subtracts its amount (clamped at zero) and
    /// deletes the receipt row permanently.
    ///
    /// # Errors
    ///
    /// Returns an error if the payment or its student does not exist, or a
    /// database operation fails.
    pub async fn reverse(&self, payment_id: Uuid) -> Result<(), FeePaymentError> {
        let txn = self.db.begin().await?;

        let payment = find_payment(&txn, payment_id).await?;
        let student = students::Entity::find_by_id(payment.student_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(LedgerError::StudentNotFound(payment.student_id))?;
        let payment = find_payment(&txn, payment_id).await?;

        let new_paid = apply_paid_delta(student.paid_fees, -payment.amount);
        let mut updated: students::ActiveModel = student.into();
        updated.paid_fees = Set(new_paid);
        updated.updated_at = Set(Utc::now().into());
        updated.update(&txn).await?;

        warn!(
            receipt_no = %payment.receipt_no,
            amount = %payment.amount,
            "reversing payment; the receipt row is deleted permanently"
        );
        fee_payments::Entity::delete_by_id(payment.id).exec(&txn).await?;

        txn.commit().await?;
        Ok(())
    }

    /// Finds a payment by ID with its student, for the receipt print view.
    ///
    /// # Errors
    ///
    /// Returns an error if the payment is not found or the query fails.
    pub async fn find_by_id(
        &self,
        payment_id: Uuid,
    ) -> Result<PaymentWithStudent, FeePaymentError> {
        let (payment, student) = fee_payments::Entity::find_by_id(payment_id)
            .find_also_related(students::Entity)
            .one(&self.db)
            .await?
            .ok_or(LedgerError::PaymentNotFound(payment_id))?;

        let student = student.ok_or(LedgerError::StudentNotFound(payment.student_id))?;
        let course_name = self.course_label(&student).await?;
        Ok(PaymentWithStudent {
            payment,
            student,
            course_name,
        })
    }

    /// Lists receipts with filters, newest first.
    ///
    /// Returns the page of receipts and the total match count.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        filter: ReceiptFilter,
    ) -> Result<(Vec<PaymentWithStudent>, u64), FeePaymentError> {
        let query = filtered(&filter);

        let total = query.clone().count(&self.db).await?;
        let rows = query
            .offset(filter.page.offset())
            .limit(filter.page.limit())
            .all(&self.db)
            .await?;

        Ok((self.join_students(rows).await?, total))
    }

    /// Fetches all receipts matching the filter, for CSV export.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn export(
        &self,
        filter: &ReceiptFilter,
    ) -> Result<Vec<PaymentWithStudent>, FeePaymentError> {
        let rows = filtered(filter).all(&self.db).await?;
        self.join_students(rows).await
    }

    /// Aggregates count, collected, and remaining over the filtered receipts.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn summary(
        &self,
        filter: &ReceiptFilter,
    ) -> Result<CollectionSummary, FeePaymentError> {
        let rows = filtered(filter).all(&self.db).await?;
        Ok(summarize(rows.iter().map(|(payment, _)| payment)))
    }

    async fn course_label(&self, student: &students::Model) -> Result<String, FeePaymentError> {
        let catalog_name = courses::Entity::find_by_id(student.course_id)
            .one(&self.db)
            .await?
            .map(|course| course.name)
            .unwrap_or_default();
        Ok(display_course(student.custom_course.as_deref(), &catalog_name))
    }

    async fn join_students(
        &self,
        rows: Vec<(fee_payments::Model, Option<students::Model>)>,
    ) -> Result<Vec<PaymentWithStudent>, FeePaymentError> {
        let course_ids: Vec<Uuid> = rows
            .iter()
            .filter_map(|(_, student)| student.as_ref().map(|s| s.course_id))
            .collect();

        let course_names: HashMap<Uuid, String> = courses::Entity::find()
            .filter(courses::Column::Id.is_in(course_ids))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|course| (course.id, course.name))
            .collect();

        Ok(rows
            .into_iter()
            .filter_map(|(payment, student)| student.map(|s| (payment, s)))
            .map(|(payment, student)| {
                let catalog_name = course_names
                    .get(&student.course_id)
                    .map_or("", String::as_str);
                let course_name = display_course(student.custom_course.as_deref(), catalog_name);
                PaymentWithStudent {
                    payment,
                    student,
                    course_name,
                }
            })
            .collect())
    }
}

/// Allocates the next receipt number inside the caller's transaction.
///
/// The single counter row is locked `FOR UPDATE`, so concurrent payments
/// queue here; a rollback returns the number with the payment, keeping
/// committed receipt numbers dense as well as unique.
async fn next_receipt_no(txn: &DatabaseTransaction) -> Result<String, FeePaymentError> {
    let counter = receipt_counters::Entity::find_by_id(RECEIPT_COUNTER_ID)
        .lock_exclusive()
        .one(txn)
        .await?
        .ok_or_else(|| {
            DbErr::RecordNotFound("receipt_counters row is missing; run migrations".to_string())
        })?;

    let next = counter.last_value + 1;
    let mut active: receipt_counters::ActiveModel = counter.into();
    active.last_value = Set(next);
    active.update(txn).await?;

    Ok(format_receipt_no(u64::try_from(next).unwrap_or(0)))
}

async fn find_payment(
    txn: &DatabaseTransaction,
    payment_id: Uuid,
) -> Result<fee_payments::Model, FeePaymentError> {
    fee_payments::Entity::find_by_id(payment_id)
        .one(txn)
        .await?
        .ok_or_else(|| LedgerError::PaymentNotFound(payment_id).into())
}

fn filtered(filter: &ReceiptFilter) -> sea_orm::SelectTwo<fee_payments::Entity, students::Entity> {
    let mut query = fee_payments::Entity::find().find_also_related(students::Entity);

    if let Some(term) = filter.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        let pattern = like_pattern(term);
        query = query.filter(
            Condition::any()
                .add(
                    Expr::col((students::Entity, students::Column::FullName))
                        .ilike(pattern.clone()),
                )
                .add(
                    Expr::col((fee_payments::Entity, fee_payments::Column::ReceiptNo))
                        .ilike(pattern),
                ),
        );
    }

    if let Some(date) = filter.date {
        if let Some((from, to)) = day_range(date) {
            query = query
                .filter(fee_payments::Column::PaymentDate.gte(from))
                .filter(fee_payments::Column::PaymentDate.lt(to));
        }
    }

    match (filter.month, filter.year) {
        (Some(month), year) => {
            let year = year.unwrap_or_else(|| Utc::now().year());
            if let Some((from, to)) = month_range(year, month) {
                query = query
                    .filter(fee_payments::Column::PaymentDate.gte(from))
                    .filter(fee_payments::Column::PaymentDate.lt(to));
            }
        }
        (None, Some(year)) => {
            if let Some((from, to)) = year_range(year) {
                query = query
                    .filter(fee_payments::Column::PaymentDate.gte(from))
                    .filter(fee_payments::Column::PaymentDate.lt(to));
            }
        }
        (None, None) => {}
    }

    query
        .order_by_desc(fee_payments::Column::PaymentDate)
        .order_by_desc(fee_payments::Column::CreatedAt)
}

/// Half-open UTC timestamp range covering one calendar day.
#[must_use]
pub fn day_range(date: NaiveDate) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let next = date.succ_opt()?;
    Some((
        date.and_time(NaiveTime::MIN).and_utc(),
        next.and_time(NaiveTime::MIN).and_utc(),
    ))
}

/// Half-open UTC timestamp range covering one calendar month.
///
/// Returns `None` for out-of-range months.
#[must_use]
pub fn month_range(year: i32, month: u32) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let start = NaiveDate::from_ymd_opt(year, month, 1)?;
    let end = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((
        start.and_time(NaiveTime::MIN).and_utc(),
        end.and_time(NaiveTime::MIN).and_utc(),
    ))
}

/// Half-open UTC timestamp range covering one calendar year.
#[must_use]
pub fn year_range(year: i32) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let start = NaiveDate::from_ymd_opt(year, 1, 1)?;
    let end = NaiveDate::from_ymd_opt(year.checked_add(1)?, 1, 1)?;
    Some((
        start.and_time(NaiveTime::MIN).and_utc(),
        end.and_time(NaiveTime::MIN).and_utc(),
    ))
}

/// Folds receipt rows into the listing header figures.
pub fn summarize<'a, I>(payments: I) -> CollectionSummary
where
    I: Iterator<Item = &'a fee_payments::Model>,
{
    let mut receipt_count: u64 = 0;
    let mut total_collected = Decimal::ZERO;
    let mut total_remaining = Decimal::ZERO;

    for payment in payments {
        receipt_count += 1;
        total_collected += payment.amount;
        total_remaining += payment.remaining_after_this;
    }

    CollectionSummary {
        receipt_count,
        total_collected,
        total_remaining,
    }
}

fn normalize_remarks(remarks: String) -> Option<String> {
    let trimmed = remarks.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    use crate::entities::sea_orm_active_enums::PaymentMode;

    fn sample_payment(amount: Decimal, remaining: Decimal) -> fee_payments::Model {
        let now = Utc::now().into();
        fee_payments::Model {
            id: Uuid::new_v4(),
            student_id: Uuid::new_v4(),
            receipt_no: "RCP-000001".to_string(),
            amount,
            payment_mode: PaymentMode::Cash,
            payment_date: now,
            remarks: None,
            total_fees_at_payment: dec!(5000),
            paid_before_this: dec!(0),
            remaining_after_this: remaining,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_day_range_is_half_open_24_hours() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 15).unwrap();
        let (from, to) = day_range(date).unwrap();
        assert_eq!(from.to_rfc3339(), "2026-03-15T00:00:00+00:00");
        assert_eq!(to - from, chrono::Duration::days(1));
    }

    #[test]
    fn test_month_range_covers_whole_month() {
        let (from, to) = month_range(2026, 2).unwrap();
        assert_eq!(from.to_rfc3339(), "2026-02-01T00:00:00+00:00");
        assert_eq!(to.to_rfc3339(), "2026-03-01T00:00:00+00:00");
    }

    #[test]
    fn test_month_range_december_rolls_into_next_year() {
        let (from, to) = month_range(2026, 12).unwrap();
        assert_eq!(from.to_rfc3339(), "2026-12-01T00:00:00+00:00");
        assert_eq!(to.to_rfc3339(), "2027-01-01T00:00:00+00:00");
    }

    #[test]
    fn test_month_range_rejects_invalid_month() {
        assert!(month_range(2026, 0).is_none());
        assert!(month_range(2026, 13).is_none());
    }

    #[test]
    fn test_year_range_spans_one_year() {
        let (from, to) = year_range(2026).unwrap();
        assert_eq!(from.to_rfc3339(), "2026-01-01T00:00:00+00:00");
        assert_eq!(to.to_rfc3339(), "2027-01-01T00:00:00+00:00");
    }

    #[test]
    fn test_summarize_folds_amount_and_remaining() {
        let payments = vec![
            sample_payment(dec!(3000), dec!(2000)),
            sample_payment(dec!(2000), dec!(0)),
        ];
        let summary = summarize(payments.iter());

        assert_eq!(summary.receipt_count, 2);
        assert_eq!(summary.total_collected, dec!(5000));
        assert_eq!(summary.total_remaining, dec!(2000));
    }

    #[test]
    fn test_summarize_empty_is_zero() {
        let summary = summarize(std::iter::empty());
        assert_eq!(summary.receipt_count, 0);
        assert_eq!(summary.total_collected, Decimal::ZERO);
        assert_eq!(summary.total_remaining, Decimal::ZERO);
    }

    #[test]
    fn test_normalize_remarks_empty_clears() {
        assert_eq!(normalize_remarks(String::new()), None);
        assert_eq!(normalize_remarks("  ".to_string()), None);
        assert_eq!(
            normalize_remarks(" paid late ".to_string()),
            Some("paid late".to_string())
        );
    }

    proptest! {
        /// Every valid month produces a half-open range that starts on the
        /// first of the month and ends strictly later.
        #[test]
        fn prop_month_range_well_formed(year in 1970i32..2100, month in 1u32..=12) {
            let (from, to) = month_range(year, month).unwrap();
            prop_assert!(from < to);
            prop_assert_eq!(from.day(), 1);
            prop_assert_eq!(to.day(), 1);
        }

        /// A day range is exactly one day long.
        #[test]
        fn prop_day_range_one_day(days in 0i32..20000) {
            let date = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap()
                + chrono::Duration::days(i64::from(days));
            let (from, to) = day_range(date).unwrap();
            prop_assert_eq!(to - from, chrono::Duration::days(1));
        }
    }
}
