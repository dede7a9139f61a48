//! Repository trait for course data access.

use crate::domain::entities::{Course, CoursePatch, NewCourse};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for courses.
///
/// Reads never return soft-deleted courses.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgCourseRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CourseRepository: Send + Sync {
    /// Inserts a course.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::ConstraintViolation`] if a referenced lookup row is missing.
    /// Returns [`AppError::Conflict`] if the uuid collides.
    async fn create(&self, new_course: NewCourse) -> Result<Course, AppError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Course>, AppError>;

    /// Bulk lookup. Missing ids are simply absent from the result.
    async fn find_by_ids(&self, ids: Vec<i64>) -> Result<Vec<Course>, AppError>;

    /// Lists courses of one structure type, ordered by id.
    async fn list(
        &self,
        structure_type_id: i64,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Course>, AppError>;

    async fn count(&self, structure_type_id: i64) -> Result<i64, AppError>;

    /// Applies a partial update.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no live course has this id.
    async fn update(&self, id: i64, patch: CoursePatch) -> Result<Course, AppError>;

    /// Soft-deletes a course. Returns `Ok(false)` if it was missing or already deleted.
    async fn delete(&self, id: i64) -> Result<bool, AppError>;
}
