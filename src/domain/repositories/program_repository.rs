//! Repository trait for programs and their year/semester course associations.

use crate::domain::entities::{
    CoursePatch, NewCourse, ProgramCourse, ProgramCourseInput, ProgramCourseRow, ProgramRecord,
};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for programs.
///
/// Same transactional contract as
/// [`BundleRepository`](crate::domain::repositories::BundleRepository), with
/// associations placed by year and semester.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgProgramRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_program.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProgramRepository: Send + Sync {
    /// Creates the identity course, the program and its initial associations.
    /// Returns the written association rows in traversal order.
    async fn create(
        &self,
        new_course: NewCourse,
        courses: Vec<ProgramCourseInput>,
    ) -> Result<(ProgramRecord, Vec<ProgramCourse>), AppError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<ProgramRecord>, AppError>;

    async fn list(&self, offset: i64, limit: i64) -> Result<Vec<ProgramRecord>, AppError>;

    async fn count(&self) -> Result<i64, AppError>;

    /// Patches the identity course and, when `courses` is `Some`, replaces all
    /// associations with it.
    async fn update(
        &self,
        id: i64,
        patch: CoursePatch,
        courses: Option<Vec<ProgramCourseInput>>,
    ) -> Result<ProgramRecord, AppError>;

    async fn sync_courses(
        &self,
        program_id: i64,
        courses: Vec<ProgramCourseInput>,
    ) -> Result<Vec<ProgramCourse>, AppError>;

    /// Live associations joined with their live courses, ordered by
    /// year, semester, position, then insertion order.
    async fn course_rows(&self, program_id: i64) -> Result<Vec<ProgramCourseRow>, AppError>;

    async fn attach(
        &self,
        program_id: i64,
        course: ProgramCourseInput,
    ) -> Result<ProgramCourse, AppError>;

    /// Moves already linked courses to a new year, semester and position.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if any item names a course not linked to
    /// the program; no row is changed in that case.
    async fn reposition(
        &self,
        program_id: i64,
        courses: Vec<ProgramCourseInput>,
    ) -> Result<(), AppError>;

    async fn detach(&self, program_id: i64, course_id: i64) -> Result<u64, AppError>;

    async fn delete(&self, id: i64) -> Result<bool, AppError>;
}
