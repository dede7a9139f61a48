//! Repository trait for the lookup tables.

use crate::domain::entities::{LookupEntry, LookupKind, LookupPatch, NewLookupEntry};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface shared by all lookup tables.
///
/// Every method takes the [`LookupKind`] naming the table to work on.
/// Soft-deleted rows are invisible to all reads.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLookupRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LookupRepository: Send + Sync {
    /// Lists rows ordered by id.
    async fn list(
        &self,
        kind: LookupKind,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<LookupEntry>, AppError>;

    async fn count(&self, kind: LookupKind) -> Result<i64, AppError>;

    async fn find_by_id(&self, kind: LookupKind, id: i64)
    -> Result<Option<LookupEntry>, AppError>;

    /// Finds a row by exact name.
    async fn find_by_name(
        &self,
        kind: LookupKind,
        name: &str,
    ) -> Result<Option<LookupEntry>, AppError>;

    /// Finds a row by slug. Always `None` for kinds without slugs.
    async fn find_by_slug(
        &self,
        kind: LookupKind,
        slug: &str,
    ) -> Result<Option<LookupEntry>, AppError>;

    /// Inserts a row.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the slug is already taken.
    async fn create(&self, kind: LookupKind, new_entry: NewLookupEntry)
    -> Result<LookupEntry, AppError>;

    /// Applies a partial update.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no live row has this id.
    async fn update(
        &self,
        kind: LookupKind,
        id: i64,
        patch: LookupPatch,
    ) -> Result<LookupEntry, AppError>;

    /// Soft-deletes a row. Returns `Ok(false)` if it was missing or already deleted.
    async fn delete(&self, kind: LookupKind, id: i64) -> Result<bool, AppError>;

    /// Live categories linked to a course, ordered by id.
    async fn categories_of_course(&self, course_id: i64) -> Result<Vec<LookupEntry>, AppError>;

    /// Links a category to a course. Linking an existing pair is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::ConstraintViolation`] if either id references no row.
    async fn assign_category(&self, course_id: i64, category_id: i64) -> Result<(), AppError>;

    /// Removes the link between a course and a category. Returns the number
    /// of rows removed.
    async fn unassign_category(&self, course_id: i64, category_id: i64)
    -> Result<u64, AppError>;
}
