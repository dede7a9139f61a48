//! Bundle and program aggregates and their ordered course associations.

use chrono::{DateTime, Utc};

use super::course::Course;

/// A flat, ordered collection of courses wrapped around its own identity course.
#[derive(Debug, Clone, PartialEq)]
pub struct Bundle {
    pub id: i64,
    pub course_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A year → semester → course curriculum wrapped around its own identity course.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub id: i64,
    pub course_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A `bundle_courses` row.
#[derive(Debug, Clone, PartialEq)]
pub struct BundleCourse {
    pub id: i64,
    pub bundle_id: i64,
    pub course_id: i64,
    pub course_position: i32,
    pub created_at: DateTime<Utc>,
}

/// A `program_courses` row.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgramCourse {
    pub id: i64,
    pub program_id: i64,
    pub course_id: i64,
    pub course_position: i32,
    pub program_year: i32,
    pub program_semester: i32,
    pub created_at: DateTime<Utc>,
}

/// One accepted bundle association to write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BundleCourseInput {
    pub course_id: i64,
    pub course_position: i32,
}

/// One accepted program association to write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgramCourseInput {
    pub course_id: i64,
    pub course_position: i32,
    pub program_year: i32,
    pub program_semester: i32,
}

/// A course joined through a bundle association, with its position.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedCourse {
    pub course: Course,
    pub course_position: i32,
}

/// A course joined through a program association, with its placement.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgramCourseRow {
    pub course: Course,
    pub course_position: i32,
    pub program_year: i32,
    pub program_semester: i32,
}

/// Items accepted for writing plus the number of incomplete items dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncPlan<T> {
    pub accepted: Vec<T>,
    pub skipped: usize,
}

impl<T> SyncPlan<T> {
    pub fn new(accepted: Vec<T>, skipped: usize) -> Self {
        Self { accepted, skipped }
    }
}

impl<T> Default for SyncPlan<T> {
    fn default() -> Self {
        Self::new(Vec::new(), 0)
    }
}

/// A bundle together with its identity course.
#[derive(Debug, Clone, PartialEq)]
pub struct BundleRecord {
    pub bundle: Bundle,
    pub course: Course,
}

/// A program together with its identity course.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgramRecord {
    pub program: Program,
    pub course: Course,
}
