//! Enquiry repository for walk-in and phone enquiries.

use sea_orm::sea_query::{Expr, extension::postgres::PgExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select, Set,
};
use uuid::Uuid;

use gurukul_shared::types::PageRequest;

use super::student::like_pattern;
use crate::entities::enquiries;

/// Error types for enquiry operations.
#[derive(Debug, thiserror::Error)]
pub enum EnquiryError {
    /// Enquiry not found.
    #[error("Enquiry not found: {0}")]
    NotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating an enquiry.
#[derive(Debug, Clone)]
pub struct CreateEnquiryInput {
    /// Name of the person enquiring.
    pub name: String,
    /// Mobile number.
    pub mobile: String,
    /// Education background.
    pub education: String,
    /// Course they asked about (free text).
    pub course_interest: String,
}

/// Filter options for listing enquiries.
#[derive(Debug, Clone, Default)]
pub struct EnquiryFilter {
    /// Case-insensitive contains match over name, mobile, and course.
    pub search: Option<String>,
    /// Page selection.
    pub page: PageRequest,
}

/// Enquiry repository for the front-desk register.
#[derive(Debug, Clone)]
pub struct EnquiryRepository {
    db: DatabaseConnection,
}

impl EnquiryRepository {
    /// Creates a new enquiry repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records a new enquiry.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn create(&self, input: CreateEnquiryInput) -> Result<enquiries::Model, EnquiryError> {
        let enquiry = enquiries::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name),
            mobile: Set(input.mobile),
            education: Set(input.education),
            course_interest: Set(input.course_interest),
            created_at: Set(chrono::Utc::now().into()),
        };

        Ok(enquiry.insert(&self.db).await?)
    }

    /// Lists enquiries, newest first.
    ///
    /// Returns the page of enquiries and the total match count.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        filter: EnquiryFilter,
    ) -> Result<(Vec<enquiries::Model>, u64), EnquiryError> {
        let query = filtered(&filter);

        let total = query.clone().count(&self.db).await?;
        let enquiries = query
            .offset(filter.page.offset())
            .limit(filter.page.limit())
            .all(&self.db)
            .await?;

        Ok((enquiries, total))
    }

    /// Finds an enquiry by ID, used to prefill an admission form.
    ///
    /// # Errors
    ///
    /// Returns an error if the enquiry is not found or the query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<enquiries::Model, EnquiryError> {
        enquiries::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(EnquiryError::NotFound(id))
    }

    /// Deletes an enquiry.
    ///
    /// Students admitted from it keep their row; the link is set to null by
    /// the foreign key.
    ///
    /// # Errors
    ///
    /// Returns an error if the enquiry is not found or the delete fails.
    pub async fn delete(&self, id: Uuid) -> Result<(), EnquiryError> {
        let result = enquiries::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(EnquiryError::NotFound(id));
        }
        Ok(())
    }

    /// Fetches all enquiries matching the filter, for CSV export.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn export(&self, filter: EnquiryFilter) -> Result<Vec<enquiries::Model>, EnquiryError> {
        Ok(filtered(&filter).all(&self.db).await?)
    }
}

fn filtered(filter: &EnquiryFilter) -> Select<enquiries::Entity> {
    let mut query = enquiries::Entity::find();

    if let Some(term) = filter.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        let pattern = like_pattern(term);
        query = query.filter(
            Condition::any()
                .add(Expr::col((enquiries::Entity, enquiries::Column::Name)).ilike(pattern.clone()))
                .add(
                    Expr::col((enquiries::Entity, enquiries::Column::Mobile))
                        .ilike(pattern.clone()),
                )
                .add(
                    Expr::col((enquiries::Entity, enquiries::Column::CourseInterest)).ilike(pattern),
                ),
        );
    }

    query.order_by_desc(enquiries::Column::CreatedAt)
}
