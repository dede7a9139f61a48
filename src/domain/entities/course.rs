//! Course entity shared by plain courses, bundles and programs.

use chrono::{DateTime, NaiveDate, Utc};

/// Structure type of a course, stored as a row in `course_structure_types`.
///
/// Decides which aggregate (if any) owns the course through `course_id`.
/// Fixed at creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructureType {
    Course,
    Program,
    Bundle,
}

impl StructureType {
    /// Slug of the matching `course_structure_types` row.
    pub fn slug(self) -> &'static str {
        match self {
            StructureType::Course => "course",
            StructureType::Program => "program",
            StructureType::Bundle => "bundle",
        }
    }
}

/// Name of the status every new course starts with.
pub const DRAFT_STATUS: &str = "draft";

/// A learning unit as stored in `courses`.
#[derive(Debug, Clone, PartialEq)]
pub struct Course {
    pub id: i64,
    pub course_name: String,
    pub course_organization_id: Option<i64>,
    pub course_type_id: Option<i64>,
    pub course_structure_type_id: i64,
    pub course_subject_id: Option<i64>,
    pub course_start_date: Option<NaiveDate>,
    pub course_end_date: Option<NaiveDate>,
    pub course_language_id: Option<i64>,
    pub course_timezone: Option<String>,
    pub grading_scale_id: Option<i64>,
    pub course_semester: Option<i32>,
    pub course_description: Option<String>,
    pub course_credits: Option<f64>,
    pub course_status_id: i64,
    pub courses_access_code: String,
    pub is_required_access_code: bool,
    pub course_uuid: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Course {
    /// Returns true if the course has been soft-deleted.
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Client-editable course attributes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CourseAttributes {
    pub course_name: String,
    pub course_organization_id: Option<i64>,
    pub course_type_id: Option<i64>,
    pub course_subject_id: Option<i64>,
    pub course_start_date: Option<NaiveDate>,
    pub course_end_date: Option<NaiveDate>,
    pub course_language_id: Option<i64>,
    pub course_timezone: Option<String>,
    pub grading_scale_id: Option<i64>,
    pub course_semester: Option<i32>,
    pub course_description: Option<String>,
    pub course_credits: Option<f64>,
    pub is_required_access_code: bool,
}

/// Input data for inserting a course.
///
/// Built by the course service, which resolves the structure type and initial
/// status and generates the access code and uuid.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCourse {
    pub attributes: CourseAttributes,
    pub course_structure_type_id: i64,
    pub course_status_id: i64,
    pub courses_access_code: String,
    pub course_uuid: String,
}

/// Partial update for an existing course.
///
/// `None` leaves a field unchanged. `course_description: Some(None)` clears it.
/// The structure type is deliberately absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoursePatch {
    pub course_name: Option<String>,
    pub course_organization_id: Option<i64>,
    pub course_type_id: Option<i64>,
    pub course_subject_id: Option<i64>,
    pub course_start_date: Option<NaiveDate>,
    pub course_end_date: Option<NaiveDate>,
    pub course_language_id: Option<i64>,
    pub course_timezone: Option<String>,
    pub grading_scale_id: Option<i64>,
    pub course_semester: Option<i32>,
    pub course_description: Option<Option<String>>,
    pub course_credits: Option<f64>,
    pub course_status_id: Option<i64>,
    pub is_required_access_code: Option<bool>,
}

impl CoursePatch {
    /// Returns true if the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        *self == CoursePatch::default()
    }
}

/// Builds a minimal course for unit tests.
#[cfg(test)]
pub(crate) fn test_course(id: i64, name: &str) -> Course {
    let now = Utc::now();
    Course {
        id,
        course_name: name.to_string(),
        course_organization_id: None,
        course_type_id: Some(1),
        course_structure_type_id: 1,
        course_subject_id: None,
        course_start_date: NaiveDate::from_ymd_opt(2024, 9, 1),
        course_end_date: NaiveDate::from_ymd_opt(2025, 6, 30),
        course_language_id: None,
        course_timezone: None,
        grading_scale_id: None,
        course_semester: None,
        course_description: None,
        course_credits: None,
        course_status_id: 1,
        courses_access_code: "ACCESS".to_string(),
        is_required_access_code: false,
        course_uuid: format!("uuid-{id}"),
        created_at: now,
        updated_at: now,
        deleted_at: None,
    }
}
