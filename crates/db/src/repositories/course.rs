//! Course repository for the admissions catalog.

use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::courses;

/// Error types for course operations.
#[derive(Debug, thiserror::Error)]
pub enum CourseError {
    /// Course not found.
    #[error("Course not found: {0}")]
    NotFound(Uuid),

    /// A course with the same name or code already exists.
    #[error("Course already exists: {0}")]
    Duplicate(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a course.
#[derive(Debug, Clone)]
pub struct CreateCourseInput {
    /// Display name, unique across the catalog.
    pub name: String,
    /// Short code, unique across the catalog.
    pub code: String,
    /// Course length in months.
    pub duration_months: i32,
    /// Fees suggested at admission; the student row stores the agreed value.
    pub default_fees: Decimal,
}

/// Course repository for catalog operations.
#[derive(Debug, Clone)]
pub struct CourseRepository {
    db: DatabaseConnection,
}

impl CourseRepository {
    /// Creates a new course repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists courses ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self, include_inactive: bool) -> Result<Vec<courses::Model>, CourseError> {
        let mut query = courses::Entity::find();

        if !include_inactive {
            query = query.filter(courses::Column::IsActive.eq(true));
        }

        let courses = query
            .order_by_asc(courses::Column::Name)
            .all(&self.db)
            .await?;

        Ok(courses)
    }

    /// Finds a course by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the course is not found or the query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<courses::Model, CourseError> {
        courses::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(CourseError::NotFound(id))
    }

    /// Creates a new course.
    ///
    /// # Errors
    ///
    /// Returns an error if a course with the same name or code exists, or
    /// the insert fails.
    pub async fn create(&self, input: CreateCourseInput) -> Result<courses::Model, CourseError> {
        let existing = courses::Entity::find()
            .filter(
                Condition::any()
                    .add(courses::Column::Name.eq(&input.name))
                    .add(courses::Column::Code.eq(&input.code)),
            )
            .one(&self.db)
            .await?;

        if existing.is_some() {
            return Err(CourseError::Duplicate(input.name));
        }

        let now = chrono::Utc::now().into();
        let course = courses::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name),
            code: Set(input.code),
            duration_months: Set(input.duration_months),
            default_fees: Set(input.default_fees),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(course.insert(&self.db).await?)
    }
}
