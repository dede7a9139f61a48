//! Course creation and management service.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use serde_json::json;

use crate::domain::entities::{
    COURSE_MEDIA_COLLECTIONS, COURSE_MODEL_TYPE, Course, CourseAttributes, CoursePatch,
    DRAFT_STATUS, LookupEntry, LookupKind, MediaIndex, MediaRef, NewCourse, StructureType,
};
use crate::domain::repositories::{CourseRepository, LookupRepository, MediaLookup};
use crate::error::AppError;
use crate::utils::code_generator::{generate_access_code, generate_course_uuid};

/// A course with all of its media collections.
#[derive(Debug, Clone)]
pub struct CourseDetails {
    pub course: Course,
    pub media: HashMap<String, Vec<MediaRef>>,
}

/// Service for plain courses and for the identity course of bundles and programs.
///
/// Every new course starts in the `draft` status with a freshly generated
/// access code and uuid. The structure type is resolved by slug and never
/// changes afterwards.
pub struct CourseService {
    courses: Arc<dyn CourseRepository>,
    lookups: Arc<dyn LookupRepository>,
    media: Arc<dyn MediaLookup>,
}

impl CourseService {
    /// Creates a new course service.
    pub fn new(
        courses: Arc<dyn CourseRepository>,
        lookups: Arc<dyn LookupRepository>,
        media: Arc<dyn MediaLookup>,
    ) -> Self {
        Self {
            courses,
            lookups,
            media,
        }
    }

    /// Resolves the id of a structure type.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the structure type row is missing,
    /// which means the lookup tables were not seeded.
    pub async fn structure_type_id(&self, structure_type: StructureType) -> Result<i64, AppError> {
        self.lookups
            .find_by_slug(LookupKind::StructureType, structure_type.slug())
            .await?
            .map(|entry| entry.id)
            .ok_or_else(|| {
                AppError::internal(
                    "Course structure type is not configured",
                    json!({ "slug": structure_type.slug() }),
                )
            })
    }

    async fn draft_status_id(&self) -> Result<i64, AppError> {
        self.lookups
            .find_by_name(LookupKind::Status, DRAFT_STATUS)
            .await?
            .map(|entry| entry.id)
            .ok_or_else(|| {
                AppError::internal(
                    "Course status is not configured",
                    json!({ "status": DRAFT_STATUS }),
                )
            })
    }

    /// Builds the insert data for a course of the given structure type.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the end date precedes the start date.
    pub async fn prepare(
        &self,
        attributes: CourseAttributes,
        structure_type: StructureType,
    ) -> Result<NewCourse, AppError> {
        validate_dates(attributes.course_start_date, attributes.course_end_date)?;

        Ok(NewCourse {
            course_structure_type_id: self.structure_type_id(structure_type).await?,
            course_status_id: self.draft_status_id().await?,
            courses_access_code: generate_access_code(),
            course_uuid: generate_course_uuid(),
            attributes,
        })
    }

    /// Checks that `patch` keeps the date range of `course` ordered.
    pub fn validate_patch(course: &Course, patch: &CoursePatch) -> Result<(), AppError> {
        validate_dates(
            patch.course_start_date.or(course.course_start_date),
            patch.course_end_date.or(course.course_end_date),
        )
    }

    /// Creates a plain course.
    pub async fn create_course(&self, attributes: CourseAttributes) -> Result<Course, AppError> {
        let new_course = self.prepare(attributes, StructureType::Course).await?;
        let course = self.courses.create(new_course).await?;

        tracing::info!(course_id = course.id, "Course created");

        Ok(course)
    }

    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no live course has this id.
    pub async fn get_course(&self, id: i64) -> Result<Course, AppError> {
        self.courses
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Course not found", json!({ "id": id })))
    }

    /// Returns a course with all of its media collections.
    pub async fn get_course_details(&self, id: i64) -> Result<CourseDetails, AppError> {
        let course = self.get_course(id).await?;
        let media = self.media_collections(course.id).await?;
        Ok(CourseDetails { course, media })
    }

    /// Lists plain courses with their total count.
    pub async fn list_courses(
        &self,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<Course>, i64), AppError> {
        let structure_type_id = self.structure_type_id(StructureType::Course).await?;
        let items = self.courses.list(structure_type_id, offset, limit).await?;
        let total = self.courses.count(structure_type_id).await?;
        Ok((items, total))
    }

    /// Applies a partial update.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no live course has this id.
    /// Returns [`AppError::Validation`] if the resulting date range is inverted.
    pub async fn update_course(&self, id: i64, patch: CoursePatch) -> Result<Course, AppError> {
        let existing = self.get_course(id).await?;
        Self::validate_patch(&existing, &patch)?;

        if patch.is_empty() {
            return Ok(existing);
        }

        self.courses.update(id, patch).await
    }

    /// Soft-deletes a course.
    pub async fn delete_course(&self, id: i64) -> Result<(), AppError> {
        if !self.courses.delete(id).await? {
            return Err(AppError::not_found("Course not found", json!({ "id": id })));
        }

        tracing::info!(course_id = id, "Course deleted");
        Ok(())
    }

    /// Categories linked to a course.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no live course has this id.
    pub async fn course_categories(&self, course_id: i64) -> Result<Vec<LookupEntry>, AppError> {
        self.get_course(course_id).await?;
        self.lookups.categories_of_course(course_id).await
    }

    /// Links a category to a course and returns the course's categories.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the course or the category is missing.
    pub async fn assign_category(
        &self,
        course_id: i64,
        category_id: i64,
    ) -> Result<Vec<LookupEntry>, AppError> {
        self.get_course(course_id).await?;
        self.lookups
            .find_by_id(LookupKind::Category, category_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found(
                    format!("{} not found", LookupKind::Category.label()),
                    json!({ "id": category_id }),
                )
            })?;

        self.lookups.assign_category(course_id, category_id).await?;
        tracing::info!(course_id, category_id, "Category assigned to course");

        self.lookups.categories_of_course(course_id).await
    }

    /// Unlinks a category from a course.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the course is missing or the category
    /// is not linked to it.
    pub async fn unassign_category(&self, course_id: i64, category_id: i64) -> Result<(), AppError> {
        self.get_course(course_id).await?;

        if self.lookups.unassign_category(course_id, category_id).await? == 0 {
            return Err(AppError::not_found(
                "Category is not assigned to this course",
                json!({ "course_id": course_id, "course_category_id": category_id }),
            ));
        }

        tracing::info!(course_id, category_id, "Category unassigned from course");
        Ok(())
    }

    /// Live courses among `ids`. Missing or deleted ids are left out.
    pub async fn find_courses(&self, ids: Vec<i64>) -> Result<Vec<Course>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.courses.find_by_ids(ids).await
    }

    /// All media collections of one course.
    pub async fn media_collections(
        &self,
        course_id: i64,
    ) -> Result<HashMap<String, Vec<MediaRef>>, AppError> {
        let mut index = self
            .media_index(vec![course_id], &COURSE_MEDIA_COLLECTIONS)
            .await?;
        Ok(index.remove(&course_id).unwrap_or_default())
    }

    /// Resolves media of `collections` for many courses in one lookup.
    pub async fn media_index(
        &self,
        course_ids: Vec<i64>,
        collections: &[&str],
    ) -> Result<MediaIndex, AppError> {
        if course_ids.is_empty() {
            return Ok(MediaIndex::new());
        }

        self.media
            .media_by_model_ids(
                course_ids,
                collections.iter().map(|c| c.to_string()).collect(),
                COURSE_MODEL_TYPE,
            )
            .await
    }

    /// Round-trips to the store by resolving a seeded structure type.
    pub async fn check_store(&self) -> Result<(), AppError> {
        self.structure_type_id(StructureType::Course).await.map(|_| ())
    }
}

fn validate_dates(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<(), AppError> {
    match (start, end) {
        (Some(start), Some(end)) if end < start => Err(AppError::bad_request(
            "Course end date must not precede its start date",
            json!({ "course_start_date": start, "course_end_date": end }),
        )),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::course::test_course;
    use crate::domain::repositories::{
        MockCourseRepository, MockLookupRepository, MockMediaLookup,
    };
    use chrono::Utc;

    fn lookup(id: i64, name: &str) -> LookupEntry {
        LookupEntry {
            id,
            name: name.to_string(),
            slug: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn seeded_lookups() -> MockLookupRepository {
        let mut lookups = MockLookupRepository::new();
        lookups
            .expect_find_by_slug()
            .returning(|_, slug| match slug {
                "course" => Ok(Some(lookup(1, "Course"))),
                "program" => Ok(Some(lookup(2, "Program"))),
                "bundle" => Ok(Some(lookup(3, "Bundle"))),
                _ => Ok(None),
            });
        lookups
            .expect_find_by_name()
            .withf(|kind, name| *kind == LookupKind::Status && name == "draft")
            .returning(|_, _| Ok(Some(lookup(7, "draft"))));
        lookups
    }

    fn service(courses: MockCourseRepository, lookups: MockLookupRepository) -> CourseService {
        CourseService::new(
            Arc::new(courses),
            Arc::new(lookups),
            Arc::new(MockMediaLookup::new()),
        )
    }

    fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    #[tokio::test]
    async fn test_prepare_new_bundle_course() {
        let svc = service(MockCourseRepository::new(), seeded_lookups());

        let attributes = CourseAttributes {
            course_name: "Data Science Bundle".to_string(),
            ..Default::default()
        };
        let new_course = svc.prepare(attributes, StructureType::Bundle).await.unwrap();

        assert_eq!(new_course.course_structure_type_id, 3);
        assert_eq!(new_course.course_status_id, 7);
        assert!(!new_course.courses_access_code.is_empty());
        assert!(!new_course.course_uuid.is_empty());
        assert_ne!(new_course.courses_access_code, new_course.course_uuid);
    }

    #[tokio::test]
    async fn test_prepare_rejects_inverted_dates() {
        let svc = service(MockCourseRepository::new(), MockLookupRepository::new());

        let attributes = CourseAttributes {
            course_name: "Backwards".to_string(),
            course_start_date: date(2025, 2, 1),
            course_end_date: date(2025, 1, 1),
            ..Default::default()
        };
        let result = svc.prepare(attributes, StructureType::Course).await;

        assert!(matches!(result.unwrap_err(), AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_prepare_without_seeded_structure_types() {
        let mut lookups = MockLookupRepository::new();
        lookups.expect_find_by_slug().returning(|_, _| Ok(None));

        let svc = service(MockCourseRepository::new(), lookups);

        let attributes = CourseAttributes {
            course_name: "Orphan".to_string(),
            ..Default::default()
        };
        let result = svc.prepare(attributes, StructureType::Program).await;

        assert!(matches!(result.unwrap_err(), AppError::Internal { .. }));
    }

    #[tokio::test]
    async fn test_create_course_uses_course_structure_type() {
        let mut courses = MockCourseRepository::new();
        courses
            .expect_create()
            .withf(|new_course| {
                new_course.course_structure_type_id == 1
                    && new_course.attributes.course_name == "Rust 101"
            })
            .times(1)
            .returning(|new_course| {
                let mut course = test_course(50, &new_course.attributes.course_name);
                course.course_structure_type_id = new_course.course_structure_type_id;
                Ok(course)
            });

        let svc = service(courses, seeded_lookups());

        let attributes = CourseAttributes {
            course_name: "Rust 101".to_string(),
            ..Default::default()
        };
        let course = svc.create_course(attributes).await.unwrap();

        assert_eq!(course.id, 50);
    }

    #[tokio::test]
    async fn test_update_course_checks_merged_dates() {
        let mut courses = MockCourseRepository::new();
        courses
            .expect_find_by_id()
            .times(1)
            .returning(|id| Ok(Some(test_course(id, "Existing"))));
        courses.expect_update().never();

        let svc = service(courses, MockLookupRepository::new());

        // test_course ends on 2025-06-30
        let patch = CoursePatch {
            course_start_date: date(2025, 7, 1),
            ..Default::default()
        };
        let result = svc.update_course(5, patch).await;

        assert!(matches!(result.unwrap_err(), AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_update_course_not_found() {
        let mut courses = MockCourseRepository::new();
        courses.expect_find_by_id().times(1).returning(|_| Ok(None));

        let svc = service(courses, MockLookupRepository::new());

        let patch = CoursePatch {
            course_name: Some("Renamed".to_string()),
            ..Default::default()
        };
        let result = svc.update_course(404, patch).await;

        assert!(matches!(result.unwrap_err(), AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete_course_not_found() {
        let mut courses = MockCourseRepository::new();
        courses.expect_delete().times(1).returning(|_| Ok(false));

        let svc = service(courses, MockLookupRepository::new());

        assert!(matches!(
            svc.delete_course(1).await.unwrap_err(),
            AppError::NotFound { .. }
        ));
    }

    #[tokio::test]
    async fn test_course_categories_missing_course() {
        let mut courses = MockCourseRepository::new();
        courses.expect_find_by_id().times(1).returning(|_| Ok(None));
        let mut lookups = MockLookupRepository::new();
        lookups.expect_categories_of_course().never();

        let svc = service(courses, lookups);

        let err = svc.course_categories(404).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { ref message, .. } if message == "Course not found"));
    }

    #[tokio::test]
    async fn test_assign_unknown_category_writes_nothing() {
        let mut courses = MockCourseRepository::new();
        courses
            .expect_find_by_id()
            .returning(|id| Ok(Some(test_course(id, "Existing"))));
        let mut lookups = MockLookupRepository::new();
        lookups
            .expect_find_by_id()
            .withf(|kind, id| *kind == LookupKind::Category && *id == 9)
            .returning(|_, _| Ok(None));
        lookups.expect_assign_category().never();

        let svc = service(courses, lookups);

        let result = svc.assign_category(5, 9).await;

        assert!(matches!(result.unwrap_err(), AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_unassign_not_linked_category() {
        let mut courses = MockCourseRepository::new();
        courses
            .expect_find_by_id()
            .returning(|id| Ok(Some(test_course(id, "Existing"))));
        let mut lookups = MockLookupRepository::new();
        lookups
            .expect_unassign_category()
            .times(1)
            .returning(|_, _| Ok(0));

        let svc = service(courses, lookups);

        assert!(matches!(
            svc.unassign_category(5, 9).await.unwrap_err(),
            AppError::NotFound { .. }
        ));
    }

    #[tokio::test]
    async fn test_media_index_skips_lookup_for_no_courses() {
        let mut media = MockMediaLookup::new();
        media.expect_media_by_model_ids().never();

        let svc = CourseService::new(
            Arc::new(MockCourseRepository::new()),
            Arc::new(MockLookupRepository::new()),
            Arc::new(media),
        );

        let index = svc.media_index(Vec::new(), &COURSE_MEDIA_COLLECTIONS).await.unwrap();
        assert!(index.is_empty());
    }
}
