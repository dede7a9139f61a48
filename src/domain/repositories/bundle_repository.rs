//! Repository trait for bundles and their ordered course associations.

use crate::domain::entities::{
    BundleCourse, BundleCourseInput, BundleRecord, CoursePatch, NewCourse, PositionedCourse,
};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for bundles.
///
/// Every method that writes more than one row runs in a single transaction:
/// on any error nothing is written.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgBundleRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_bundle.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BundleRepository: Send + Sync {
    /// Creates the identity course, the bundle and its initial associations.
    /// Returns the written association rows in input order.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::ConstraintViolation`] if any `course_id` references no course.
    async fn create(
        &self,
        new_course: NewCourse,
        courses: Vec<BundleCourseInput>,
    ) -> Result<(BundleRecord, Vec<BundleCourse>), AppError>;

    /// Finds a live bundle with a live identity course.
    async fn find_by_id(&self, id: i64) -> Result<Option<BundleRecord>, AppError>;

    async fn list(&self, offset: i64, limit: i64) -> Result<Vec<BundleRecord>, AppError>;

    async fn count(&self) -> Result<i64, AppError>;

    /// Patches the identity course and, when `courses` is `Some`, replaces all
    /// associations with it.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the bundle does not exist.
    async fn update(
        &self,
        id: i64,
        patch: CoursePatch,
        courses: Option<Vec<BundleCourseInput>>,
    ) -> Result<BundleRecord, AppError>;

    /// Deletes every association of the bundle and inserts `courses` in order.
    async fn sync_courses(
        &self,
        bundle_id: i64,
        courses: Vec<BundleCourseInput>,
    ) -> Result<Vec<BundleCourse>, AppError>;

    /// Live associations joined with their live courses, ordered by position
    /// then insertion order.
    async fn course_rows(&self, bundle_id: i64) -> Result<Vec<PositionedCourse>, AppError>;

    /// Inserts one association row.
    async fn attach(
        &self,
        bundle_id: i64,
        course: BundleCourseInput,
    ) -> Result<BundleCourse, AppError>;

    /// Moves already linked courses to new positions.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if any item names a course not linked to
    /// the bundle; no row is changed in that case.
    async fn reposition(
        &self,
        bundle_id: i64,
        courses: Vec<BundleCourseInput>,
    ) -> Result<(), AppError>;

    /// Removes every row linking `course_id` to the bundle. Returns the number removed.
    async fn detach(&self, bundle_id: i64, course_id: i64) -> Result<u64, AppError>;

    /// Soft-deletes the bundle and its course and removes its associations.
    /// Returns `Ok(false)` if the bundle did not exist.
    async fn delete(&self, id: i64) -> Result<bool, AppError>;
}
