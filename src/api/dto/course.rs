//! DTOs for course fields, shared by course, bundle and program endpoints.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::lookup::LookupItem;
use crate::domain::entities::{Course, CourseAttributes, CoursePatch, MediaRef};
use crate::domain::formatting::CourseCard;

/// Editable course fields of a create request.
///
/// Bundle and program requests flatten this struct next to their
/// `courses_array`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CourseFieldsRequest {
    #[validate(length(min = 1, max = 255))]
    pub course_name: String,

    pub course_organization_id: Option<i64>,
    pub course_type_id: Option<i64>,
    pub course_subject_id: Option<i64>,
    pub course_start_date: Option<NaiveDate>,
    pub course_end_date: Option<NaiveDate>,
    pub course_language_id: Option<i64>,

    #[validate(length(max = 64))]
    pub course_timezone: Option<String>,

    pub grading_scale_id: Option<i64>,

    #[validate(range(min = 1))]
    pub course_semester: Option<i32>,

    pub course_description: Option<String>,

    #[validate(range(min = 0.0))]
    pub course_credits: Option<f64>,

    #[serde(default)]
    pub is_required_access_code: bool,
}

impl CourseFieldsRequest {
    pub fn into_attributes(self) -> CourseAttributes {
        CourseAttributes {
            course_name: self.course_name,
            course_organization_id: self.course_organization_id,
            course_type_id: self.course_type_id,
            course_subject_id: self.course_subject_id,
            course_start_date: self.course_start_date,
            course_end_date: self.course_end_date,
            course_language_id: self.course_language_id,
            course_timezone: self.course_timezone,
            grading_scale_id: self.grading_scale_id,
            course_semester: self.course_semester,
            course_description: self.course_description,
            course_credits: self.course_credits,
            is_required_access_code: self.is_required_access_code,
        }
    }
}

/// Course fields of an update request.
///
/// All fields are optional; only provided fields are changed.
/// `course_description: null` clears the description. The structure type
/// cannot be changed and is not accepted here.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CourseUpdateRequest {
    #[validate(length(min = 1, max = 255))]
    pub course_name: Option<String>,

    pub course_organization_id: Option<i64>,
    pub course_type_id: Option<i64>,
    pub course_subject_id: Option<i64>,
    pub course_start_date: Option<NaiveDate>,
    pub course_end_date: Option<NaiveDate>,
    pub course_language_id: Option<i64>,

    #[validate(length(max = 64))]
    pub course_timezone: Option<String>,

    pub grading_scale_id: Option<i64>,

    #[validate(range(min = 1))]
    pub course_semester: Option<i32>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    pub course_description: Option<Option<String>>,

    #[validate(range(min = 0.0))]
    pub course_credits: Option<f64>,

    pub course_status_id: Option<i64>,
    pub is_required_access_code: Option<bool>,
}

impl CourseUpdateRequest {
    pub fn into_patch(self) -> CoursePatch {
        CoursePatch {
            course_name: self.course_name,
            course_organization_id: self.course_organization_id,
            course_type_id: self.course_type_id,
            course_subject_id: self.course_subject_id,
            course_start_date: self.course_start_date,
            course_end_date: self.course_end_date,
            course_language_id: self.course_language_id,
            course_timezone: self.course_timezone,
            grading_scale_id: self.grading_scale_id,
            course_semester: self.course_semester,
            course_description: self.course_description,
            course_credits: self.course_credits,
            course_status_id: self.course_status_id,
            is_required_access_code: self.is_required_access_code,
        }
    }
}

/// Full course as returned by the API.
#[derive(Debug, Serialize)]
pub struct CourseItem {
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
}

impl From<Course> for CourseItem {
    fn from(c: Course) -> Self {
        Self {
            id: c.id,
            course_name: c.course_name,
            course_organization_id: c.course_organization_id,
            course_type_id: c.course_type_id,
            course_structure_type_id: c.course_structure_type_id,
            course_subject_id: c.course_subject_id,
            course_start_date: c.course_start_date,
            course_end_date: c.course_end_date,
            course_language_id: c.course_language_id,
            course_timezone: c.course_timezone,
            grading_scale_id: c.grading_scale_id,
            course_semester: c.course_semester,
            course_description: c.course_description,
            course_credits: c.course_credits,
            course_status_id: c.course_status_id,
            courses_access_code: c.courses_access_code,
            is_required_access_code: c.is_required_access_code,
            course_uuid: c.course_uuid,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MediaItem {
    pub id: i64,
    pub collection_name: String,
    pub name: String,
    pub file_name: String,
    pub mime_type: Option<String>,
    pub disk: String,
    pub size: i64,
}

impl From<MediaRef> for MediaItem {
    fn from(m: MediaRef) -> Self {
        Self {
            id: m.id,
            collection_name: m.collection_name,
            name: m.name,
            file_name: m.file_name,
            mime_type: m.mime_type,
            disk: m.disk,
            size: m.size,
        }
    }
}

/// Media collections of one course, keyed by collection name.
pub fn media_collections(media: HashMap<String, Vec<MediaRef>>) -> HashMap<String, Vec<MediaItem>> {
    media
        .into_iter()
        .map(|(collection, items)| (collection, items.into_iter().map(MediaItem::from).collect()))
        .collect()
}

/// A course with its media collections.
#[derive(Debug, Serialize)]
pub struct CourseDetailResponse {
    #[serde(flatten)]
    pub course: CourseItem,
    pub media: HashMap<String, Vec<MediaItem>>,
}

/// Response of `GET/POST /api/courses/{id}/categories`.
#[derive(Debug, Serialize)]
pub struct CourseCategoriesResponse {
    pub course_id: i64,
    pub categories: Vec<LookupItem>,
}

/// Request body for `POST /api/courses/{id}/categories`.
#[derive(Debug, Deserialize, Validate)]
pub struct AssignCategoryRequest {
    #[validate(range(min = 1))]
    pub course_category_id: i64,
}

/// Bundle entry: full course, its position and its first cover image.
#[derive(Debug, Serialize)]
pub struct BundleCourseCard {
    #[serde(flatten)]
    pub course: CourseItem,
    pub course_position: i32,
    pub course_cover_image: Option<MediaItem>,
}

impl From<CourseCard> for BundleCourseCard {
    fn from(card: CourseCard) -> Self {
        Self {
            course: card.course.into(),
            course_position: card.course_position,
            course_cover_image: card.media.into_iter().next().map(MediaItem::from),
        }
    }
}

/// Program entry: full course, its position and its cover image collection.
#[derive(Debug, Serialize)]
pub struct ProgramCourseCard {
    #[serde(flatten)]
    pub course: CourseItem,
    pub course_position: i32,
    pub course_cover_image: Option<Vec<MediaItem>>,
}

impl From<CourseCard> for ProgramCourseCard {
    fn from(card: CourseCard) -> Self {
        let cover = if card.media.is_empty() {
            None
        } else {
            Some(card.media.into_iter().map(MediaItem::from).collect())
        };

        Self {
            course: card.course.into(),
            course_position: card.course_position,
            course_cover_image: cover,
        }
    }
}

/// Trimmed program entry used on the program detail page.
#[derive(Debug, Serialize)]
pub struct CourseSummaryItem {
    pub id: i64,
    pub course_name: String,
    pub course_position: i32,
}

impl From<CourseCard> for CourseSummaryItem {
    fn from(card: CourseCard) -> Self {
        Self {
            id: card.course.id,
            course_name: card.course.course_name,
            course_position: card.course_position,
        }
    }
}
