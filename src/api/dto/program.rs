//! DTOs for program endpoints.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::course::{
    CourseFieldsRequest, CourseItem, CourseSummaryItem, CourseUpdateRequest, MediaItem,
    ProgramCourseCard,
};
use super::courses_array::ProgramYearItem;
use crate::domain::entities::{ProgramCourse, ProgramCourseInput, ProgramRecord};
use crate::domain::formatting::{CourseCard, YearGroup};

/// Request body for `POST /api/programs`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProgramRequest {
    #[serde(flatten)]
    #[validate(nested)]
    pub course: CourseFieldsRequest,

    #[serde(default)]
    #[validate(nested)]
    pub courses_array: Vec<ProgramYearItem>,
}

/// Request body for `PATCH /api/programs/{id}`.
///
/// `courses_array` absent leaves the curriculum untouched; present (even
/// empty) replaces it.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProgramRequest {
    #[serde(flatten)]
    #[validate(nested)]
    pub course: CourseUpdateRequest,

    #[validate(nested)]
    pub courses_array: Option<Vec<ProgramYearItem>>,
}

/// Request body for `PUT /api/programs/{id}/courses`.
#[derive(Debug, Deserialize, Validate)]
pub struct SyncProgramCoursesRequest {
    #[validate(nested)]
    pub courses_array: Vec<ProgramYearItem>,
}

/// One entry of `PATCH /api/programs/{id}/courses`.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct ProgramCoursePlacement {
    pub course_id: i64,
    pub course_position: i32,

    #[validate(range(min = 1))]
    pub program_year: i32,

    #[validate(range(min = 1))]
    pub program_semester: i32,
}

impl From<ProgramCoursePlacement> for ProgramCourseInput {
    fn from(p: ProgramCoursePlacement) -> Self {
        Self {
            course_id: p.course_id,
            course_position: p.course_position,
            program_year: p.program_year,
            program_semester: p.program_semester,
        }
    }
}

/// Request body for `PATCH /api/programs/{id}/courses`.
#[derive(Debug, Deserialize, Validate)]
pub struct RepositionProgramCoursesRequest {
    #[validate(length(min = 1))]
    #[validate(nested)]
    pub courses: Vec<ProgramCoursePlacement>,
}

/// Request body for `POST /api/program_courses`.
#[derive(Debug, Deserialize, Validate)]
pub struct AttachProgramCourseRequest {
    pub program_id: i64,

    #[serde(flatten)]
    #[validate(nested)]
    pub placement: ProgramCoursePlacement,
}

/// A stored program association row.
#[derive(Debug, Serialize)]
pub struct ProgramCourseItem {
    pub id: i64,
    pub program_id: i64,
    pub course_id: i64,
    pub course_position: i32,
    pub program_year: i32,
    pub program_semester: i32,
    pub created_at: DateTime<Utc>,
}

impl From<ProgramCourse> for ProgramCourseItem {
    fn from(r: ProgramCourse) -> Self {
        Self {
            id: r.id,
            program_id: r.program_id,
            course_id: r.course_id,
            course_position: r.course_position,
            program_year: r.program_year,
            program_semester: r.program_semester,
            created_at: r.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SemesterItem<C> {
    pub program_semester: i32,
    pub courses: Vec<C>,
}

#[derive(Debug, Serialize)]
pub struct YearItem<C> {
    pub program_year: i32,
    pub semesters: Vec<SemesterItem<C>>,
}

/// Maps grouped courses into a response projection, keeping group order.
pub fn project<C: From<CourseCard>>(years: Vec<YearGroup>) -> Vec<YearItem<C>> {
    years
        .into_iter()
        .map(|year| YearItem {
            program_year: year.program_year,
            semesters: year
                .semesters
                .into_iter()
                .map(|semester| SemesterItem {
                    program_semester: semester.program_semester,
                    courses: semester.courses.into_iter().map(C::from).collect(),
                })
                .collect(),
        })
        .collect()
}

/// Program list entry.
#[derive(Debug, Serialize)]
pub struct ProgramItem {
    pub id: i64,
    pub course: CourseItem,
}

impl From<ProgramRecord> for ProgramItem {
    fn from(r: ProgramRecord) -> Self {
        Self {
            id: r.program.id,
            course: r.course.into(),
        }
    }
}

/// Program with its curriculum as full course cards.
#[derive(Debug, Serialize)]
pub struct ProgramResponse {
    pub id: i64,
    pub course: CourseItem,
    pub courses: Vec<YearItem<ProgramCourseCard>>,
}

/// Response of `POST /api/programs`: the association rows as written.
#[derive(Debug, Serialize)]
pub struct ProgramCreatedResponse {
    pub id: i64,
    pub course: CourseItem,
    pub courses: Vec<ProgramCourseItem>,
}

/// Program detail page: trimmed courses plus the program's own media.
#[derive(Debug, Serialize)]
pub struct ProgramDetailResponse {
    pub id: i64,
    pub course: CourseItem,
    pub media: HashMap<String, Vec<MediaItem>>,
    pub courses: Vec<YearItem<CourseSummaryItem>>,
}

/// Response of `GET/PATCH /api/programs/{id}/courses`.
#[derive(Debug, Serialize)]
pub struct ProgramCoursesResponse {
    pub program_id: i64,
    pub courses: Vec<YearItem<ProgramCourseCard>>,
}

/// Response of `PUT /api/programs/{id}/courses`.
#[derive(Debug, Serialize)]
pub struct ProgramCoursesWrittenResponse {
    pub program_id: i64,
    pub courses: Vec<ProgramCourseItem>,
}
