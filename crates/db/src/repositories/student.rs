//! Student repository for admissions and fee-account reads.
//!
//! `paid_fees` is intentionally not writable here; only the fee-payment
//! repository mutates it, so every change goes through the ledger rules.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::sea_query::{Expr, extension::postgres::PgExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use gurukul_shared::types::{PageRequest, round_money};

use crate::entities::{courses, students};

/// Error types for student operations.
#[derive(Debug, thiserror::Error)]
pub enum StudentError {
    /// Student not found.
    #[error("Student not found: {0}")]
    NotFound(Uuid),

    /// Referenced course not found.
    #[error("Course not found: {0}")]
    CourseNotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for admitting a student.
#[derive(Debug, Clone)]
pub struct CreateStudentInput {
    /// Enquiry this admission came from, if any.
    pub enquiry_id: Option<Uuid>,
    /// Full name.
    pub full_name: String,
    /// Mobile number.
    pub mobile: String,
    /// Optional email.
    pub email: Option<String>,
    /// Education background.
    pub education: String,
    /// Optional postal address.
    pub address: Option<String>,
    /// Catalog course being joined.
    pub course_id: Uuid,
    /// Free-text course label overriding the catalog name ("Other").
    pub custom_course: Option<String>,
    /// Date of admission.
    pub admission_date: NaiveDate,
    /// Total fees agreed for the course.
    pub total_fees: Decimal,
}

/// Input for updating a student.
///
/// Absent fields leave the stored value unchanged. For the nullable text
/// fields an empty string clears the stored value.
#[derive(Debug, Clone, Default)]
pub struct UpdateStudentInput {
    /// New full name.
    pub full_name: Option<String>,
    /// New mobile number.
    pub mobile: Option<String>,
    /// New email; `Some("")` clears it.
    pub email: Option<String>,
    /// New education background.
    pub education: Option<String>,
    /// New address; `Some("")` clears it.
    pub address: Option<String>,
    /// New catalog course.
    pub course_id: Option<Uuid>,
    /// New custom course label; `Some("")` clears it.
    pub custom_course: Option<String>,
    /// New admission date.
    pub admission_date: Option<NaiveDate>,
    /// New total fees (editable after admission).
    pub total_fees: Option<Decimal>,
    /// Activate or deactivate the student.
    pub is_active: Option<bool>,
}

/// Filter options for listing students.
#[derive(Debug, Clone, Default)]
pub struct StudentFilter {
    /// Case-insensitive contains match over name and mobile.
    pub search: Option<String>,
    /// Filter by course.
    pub course_id: Option<Uuid>,
    /// Admission date range start.
    pub admitted_from: Option<NaiveDate>,
    /// Admission date range end.
    pub admitted_to: Option<NaiveDate>,
    /// Include deactivated students.
    pub include_inactive: bool,
    /// Page selection.
    pub page: PageRequest,
}

/// A student joined with their resolved course label.
#[derive(Debug, Clone)]
pub struct StudentWithCourse {
    /// Student row.
    pub student: students::Model,
    /// Display course: `custom_course` when set, else the catalog name.
    pub course_name: String,
}

/// Student repository for admission CRUD and search.
#[derive(Debug, Clone)]
pub struct StudentRepository {
    db: DatabaseConnection,
}

impl StudentRepository {
    /// Creates a new student repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Admits a new student with `paid_fees = 0`.
    ///
    /// # Errors
    ///
    /// Returns an error if the course does not exist or the insert fails.
    pub async fn create(
        &self,
        input: CreateStudentInput,
    ) -> Result<StudentWithCourse, StudentError> {
        let course = courses::Entity::find_by_id(input.course_id)
            .one(&self.db)
            .await?
            .ok_or(StudentError::CourseNotFound(input.course_id))?;

        let custom_course = input.custom_course.and_then(normalize_text);
        let now = chrono::Utc::now().into();
        let student = students::ActiveModel {
            id: Set(Uuid::new_v4()),
            enquiry_id: Set(input.enquiry_id),
            full_name: Set(input.full_name),
            mobile: Set(input.mobile),
            email: Set(input.email.and_then(normalize_text)),
            education: Set(input.education),
            address: Set(input.address.and_then(normalize_text)),
            course_id: Set(input.course_id),
            custom_course: Set(custom_course.clone()),
            admission_date: Set(input.admission_date),
            total_fees: Set(round_money(input.total_fees)),
            paid_fees: Set(Decimal::ZERO),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?;

        let course_name = display_course(custom_course.as_deref(), &course.name);
        Ok(StudentWithCourse {
            student,
            course_name,
        })
    }

    /// Lists students with filters, newest admissions first.
    ///
    /// Returns the page of students and the total match count.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        filter: StudentFilter,
    ) -> Result<(Vec<StudentWithCourse>, u64), StudentError> {
        let query = self.filtered(&filter);

        let total = query.clone().count(&self.db).await?;
        let rows = query
            .offset(filter.page.offset())
            .limit(filter.page.limit())
            .all(&self.db)
            .await?;

        Ok((join_courses(rows), total))
    }

    /// Finds a student by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the student is not found or the query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<students::Model, StudentError> {
        students::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(StudentError::NotFound(id))
    }

    /// Finds a student by ID with their resolved course label.
    ///
    /// # Errors
    ///
    /// Returns an error if the student is not found or the query fails.
    pub async fn find_with_course(&self, id: Uuid) -> Result<StudentWithCourse, StudentError> {
        let (student, course) = students::Entity::find_by_id(id)
            .find_also_related(courses::Entity)
            .one(&self.db)
            .await?
            .ok_or(StudentError::NotFound(id))?;

        let catalog_name = course.map(|c| c.name).unwrap_or_default();
        let course_name = display_course(student.custom_course.as_deref(), &catalog_name);
        Ok(StudentWithCourse {
            student,
            course_name,
        })
    }

    /// Updates a student's details.
    ///
    /// # Errors
    ///
    /// Returns an error if the student or a newly referenced course is not
    /// found, or the update fails.
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateStudentInput,
    ) -> Result<StudentWithCourse, StudentError> {
        let student = self.find_by_id(id).await?;

        if let Some(course_id) = input.course_id {
            courses::Entity::find_by_id(course_id)
                .one(&self.db)
                .await?
                .ok_or(StudentError::CourseNotFound(course_id))?;
        }

        let mut active: students::ActiveModel = student.into();

        if let Some(full_name) = input.full_name {
            active.full_name = Set(full_name);
        }
        if let Some(mobile) = input.mobile {
            active.mobile = Set(mobile);
        }
        if let Some(email) = input.email {
            active.email = Set(normalize_text(email));
        }
        if let Some(education) = input.education {
            active.education = Set(education);
        }
        if let Some(address) = input.address {
            active.address = Set(normalize_text(address));
        }
        if let Some(course_id) = input.course_id {
            active.course_id = Set(course_id);
        }
        if let Some(custom_course) = input.custom_course {
            active.custom_course = Set(normalize_text(custom_course));
        }
        if let Some(admission_date) = input.admission_date {
            active.admission_date = Set(admission_date);
        }
        if let Some(total_fees) = input.total_fees {
            active.total_fees = Set(round_money(total_fees));
        }
        if let Some(is_active) = input.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(chrono::Utc::now().into());

        let student = active.update(&self.db).await?;
        self.find_with_course(student.id).await
    }

    /// Deletes a student and, via cascade, their payments.
    ///
    /// # Errors
    ///
    /// Returns an error if the student is not found or the delete fails.
    pub async fn delete(&self, id: Uuid) -> Result<(), StudentError> {
        let result = students::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(StudentError::NotFound(id));
        }
        Ok(())
    }

    /// Quick search over name and mobile for the fee-payment screen.
    ///
    /// Returns at most ten active students ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn quick_search(&self, term: &str) -> Result<Vec<StudentWithCourse>, StudentError> {
        let term = term.trim();
        if term.is_empty() {
            return Ok(Vec::new());
        }

        let pattern = like_pattern(term);
        let rows = students::Entity::find()
            .find_also_related(courses::Entity)
            .filter(students::Column::IsActive.eq(true))
            .filter(
                Condition::any()
                    .add(
                        Expr::col((students::Entity, students::Column::FullName))
                            .ilike(pattern.clone()),
                    )
                    .add(Expr::col((students::Entity, students::Column::Mobile)).ilike(pattern)),
            )
            .order_by_asc(students::Column::FullName)
            .limit(10)
            .all(&self.db)
            .await?;

        Ok(join_courses(rows))
    }

    /// Fetches all students matching the filter, for CSV export.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn export(
        &self,
        filter: StudentFilter,
    ) -> Result<Vec<StudentWithCourse>, StudentError> {
        let rows = self.filtered(&filter).all(&self.db).await?;
        Ok(join_courses(rows))
    }

    fn filtered(
        &self,
        filter: &StudentFilter,
    ) -> sea_orm::SelectTwo<students::Entity, courses::Entity> {
        let mut query = students::Entity::find().find_also_related(courses::Entity);

        if !filter.include_inactive {
            query = query.filter(students::Column::IsActive.eq(true));
        }
        if let Some(course_id) = filter.course_id {
            query = query.filter(students::Column::CourseId.eq(course_id));
        }
        if let Some(from) = filter.admitted_from {
            query = query.filter(students::Column::AdmissionDate.gte(from));
        }
        if let Some(to) = filter.admitted_to {
            query = query.filter(students::Column::AdmissionDate.lte(to));
        }
        if let Some(term) = filter.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            let pattern = like_pattern(term);
            query = query.filter(
                Condition::any()
                    .add(
                        Expr::col((students::Entity, students::Column::FullName))
                            .ilike(pattern.clone()),
                    )
                    .add(Expr::col((students::Entity, students::Column::Mobile)).ilike(pattern)),
            );
        }

        query
            .order_by_desc(students::Column::AdmissionDate)
            .order_by_desc(students::Column::CreatedAt)
    }
}

fn join_courses(rows: Vec<(students::Model, Option<courses::Model>)>) -> Vec<StudentWithCourse> {
    rows.into_iter()
        .map(|(student, course)| {
            let catalog_name = course.map(|c| c.name).unwrap_or_default();
            let course_name = display_course(student.custom_course.as_deref(), &catalog_name);
            StudentWithCourse {
                student,
                course_name,
            }
        })
        .collect()
}

/// Escapes LIKE wildcards in a user-supplied term and wraps it for a
/// contains match.
#[must_use]
pub fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    format!("%{escaped}%")
}

/// Resolves the course label shown for a student.
///
/// A non-empty `custom_course` overrides the catalog name (the "Other"
/// option at admission time).
#[must_use]
pub fn display_course(custom_course: Option<&str>, course_name: &str) -> String {
    match custom_course {
        Some(custom) if !custom.trim().is_empty() => custom.to_string(),
        _ => course_name.to_string(),
    }
}

fn normalize_text(value: String) -> Option<String> {
    let trimmed = value.trim();
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

    #[test]
    fn test_like_pattern_wraps_term() {
        assert_eq!(like_pattern("ravi"), "%ravi%");
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("100%"), "%100\\%%");
        assert_eq!(like_pattern("a_b"), "%a\\_b%");
        assert_eq!(like_pattern("a\\b"), "%a\\\\b%");
    }

    #[test]
    fn test_display_course_prefers_custom() {
        assert_eq!(display_course(Some("Spoken English"), "Tally"), "Spoken English");
        assert_eq!(display_course(None, "Tally"), "Tally");
        assert_eq!(display_course(Some("   "), "Tally"), "Tally");
    }

    #[test]
    fn test_normalize_text_trims_and_drops_empty() {
        assert_eq!(normalize_text("  x  ".to_string()), Some("x".to_string()));
        assert_eq!(normalize_text("   ".to_string()), None);
    }

    proptest! {
        /// Unescaping the wrapped pattern recovers the original term.
        #[test]
        fn prop_like_pattern_round_trips(term in "[a-zA-Z0-9%_\\\\ ]{0,30}") {
            let pattern = like_pattern(&term);
            prop_assert!(pattern.starts_with('%'));
            prop_assert!(pattern.ends_with('%'));

            let inner = &pattern[1..pattern.len() - 1];
            let mut unescaped = String::new();
            let mut chars = inner.chars();
            while let Some(ch) = chars.next() {
                if ch == '\\' {
                    if let Some(next) = chars.next() {
                        unescaped.push(next);
                    }
                } else {
                    unescaped.push(ch);
                }
            }
            prop_assert_eq!(unescaped, term);
        }
    }
}
