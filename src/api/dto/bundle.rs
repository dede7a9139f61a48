//! DTOs for bundle endpoints.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::course::{BundleCourseCard, CourseFieldsRequest, CourseItem, CourseUpdateRequest, MediaItem};
use super::courses_array::CourseSyncItem;
use crate::domain::entities::{BundleCourse, BundleCourseInput, BundleRecord};

/// Request body for `POST /api/bundles`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateBundleRequest {
    #[serde(flatten)]
    #[validate(nested)]
    pub course: CourseFieldsRequest,

    #[serde(default)]
    pub courses_array: Vec<CourseSyncItem>,
}

/// Request body for `PATCH /api/bundles/{id}`.
///
/// `courses_array` absent leaves the course list untouched; present (even
/// empty) replaces it.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateBundleRequest {
    #[serde(flatten)]
    #[validate(nested)]
    pub course: CourseUpdateRequest,

    pub courses_array: Option<Vec<CourseSyncItem>>,
}

/// Request body for `PUT /api/bundles/{id}/courses`.
#[derive(Debug, Deserialize)]
pub struct SyncBundleCoursesRequest {
    pub courses_array: Vec<CourseSyncItem>,
}

/// One entry of `PATCH /api/bundles/{id}/courses`.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct BundleCoursePosition {
    pub course_id: i64,
    pub course_position: i32,
}

/// Request body for `PATCH /api/bundles/{id}/courses`.
#[derive(Debug, Deserialize, Validate)]
pub struct RepositionBundleCoursesRequest {
    #[validate(length(min = 1))]
    #[validate(nested)]
    pub courses: Vec<BundleCoursePosition>,
}

impl RepositionBundleCoursesRequest {
    pub fn into_inputs(self) -> Vec<BundleCourseInput> {
        self.courses
            .into_iter()
            .map(|c| BundleCourseInput {
                course_id: c.course_id,
                course_position: c.course_position,
            })
            .collect()
    }
}

/// Request body for `POST /api/bundle_courses`.
#[derive(Debug, Deserialize, Validate)]
pub struct AttachBundleCourseRequest {
    pub bundle_id: i64,
    pub course_id: i64,
    pub course_position: i32,
}

/// A stored bundle association row.
#[derive(Debug, Serialize)]
pub struct BundleCourseItem {
    pub id: i64,
    pub bundle_id: i64,
    pub course_id: i64,
    pub course_position: i32,
    pub created_at: DateTime<Utc>,
}

impl From<BundleCourse> for BundleCourseItem {
    fn from(r: BundleCourse) -> Self {
        Self {
            id: r.id,
            bundle_id: r.bundle_id,
            course_id: r.course_id,
            course_position: r.course_position,
            created_at: r.created_at,
        }
    }
}

/// Bundle list entry.
#[derive(Debug, Serialize)]
pub struct BundleItem {
    pub id: i64,
    pub course: CourseItem,
}

impl From<BundleRecord> for BundleItem {
    fn from(r: BundleRecord) -> Self {
        Self {
            id: r.bundle.id,
            course: r.course.into(),
        }
    }
}

/// Bundle with its course list.
#[derive(Debug, Serialize)]
pub struct BundleResponse {
    pub id: i64,
    pub course: CourseItem,
    pub courses: Vec<BundleCourseCard>,
}

/// Bundle detail page: also carries the bundle's own media collections.
#[derive(Debug, Serialize)]
pub struct BundleDetailResponse {
    pub id: i64,
    pub course: CourseItem,
    pub media: HashMap<String, Vec<MediaItem>>,
    pub courses: Vec<BundleCourseCard>,
}

/// Response of `GET/PUT/PATCH /api/bundles/{id}/courses`.
#[derive(Debug, Serialize)]
pub struct BundleCoursesResponse {
    pub bundle_id: i64,
    pub courses: Vec<BundleCourseCard>,
}
