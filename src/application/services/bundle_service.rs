//! Bundle service: bundles and their ordered course lists.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::json;

use super::course_service::CourseService;
use crate::domain::entities::{
    BundleCourse, BundleCourseInput, BundleRecord, COVER_IMAGE_COLLECTION, CourseAttributes,
    CoursePatch, MediaRef, StructureType, SyncPlan,
};
use crate::domain::formatting::{
    CourseCard, bundle_cards, distinct_course_ids, format_bundle, join_written,
};
use crate::domain::repositories::BundleRepository;
use crate::error::AppError;

/// A bundle with its course cards.
#[derive(Debug, Clone)]
pub struct BundleView {
    pub record: BundleRecord,
    pub courses: Vec<CourseCard>,
}

/// A bundle with its own media collections and formatted course list.
#[derive(Debug, Clone)]
pub struct BundleDetails {
    pub record: BundleRecord,
    pub media: HashMap<String, Vec<MediaRef>>,
    pub courses: Vec<CourseCard>,
}

/// Service for bundles.
///
/// Writes go through [`BundleRepository`], which runs each multi-row write
/// in one transaction. Create and sync answer with the rows they wrote, in
/// input order; every other read of the course list is ordered by position.
pub struct BundleService {
    bundles: Arc<dyn BundleRepository>,
    courses: Arc<CourseService>,
}

impl BundleService {
    /// Creates a new bundle service.
    pub fn new(bundles: Arc<dyn BundleRepository>, courses: Arc<CourseService>) -> Self {
        Self { bundles, courses }
    }

    /// Creates a bundle, its identity course and its initial course list.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::ConstraintViolation`] if a listed course does not
    /// exist; nothing is written in that case.
    pub async fn create_bundle(
        &self,
        attributes: CourseAttributes,
        plan: SyncPlan<BundleCourseInput>,
    ) -> Result<BundleView, AppError> {
        let new_course = self.courses.prepare(attributes, StructureType::Bundle).await?;
        let (record, written) = self.bundles.create(new_course, plan.accepted).await?;

        tracing::info!(
            bundle_id = record.bundle.id,
            course_id = record.course.id,
            written = written.len(),
            skipped = plan.skipped,
            "Bundle created"
        );

        let courses = self.written_cards(&written).await?;
        Ok(BundleView { record, courses })
    }

    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the bundle does not exist.
    pub async fn get_bundle(&self, id: i64) -> Result<BundleRecord, AppError> {
        self.bundles
            .find_by_id(id)
            .await?
            .ok_or_else(|| bundle_not_found(id))
    }

    /// Returns a bundle with its media collections and formatted course list.
    pub async fn get_bundle_details(&self, id: i64) -> Result<BundleDetails, AppError> {
        let record = self.get_bundle(id).await?;
        let media = self.courses.media_collections(record.course.id).await?;
        let courses = self.format_courses(id).await?;

        Ok(BundleDetails {
            record,
            media,
            courses,
        })
    }

    /// Lists bundles with their total count.
    pub async fn list_bundles(
        &self,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<BundleRecord>, i64), AppError> {
        let items = self.bundles.list(offset, limit).await?;
        let total = self.bundles.count().await?;
        Ok((items, total))
    }

    /// Updates the identity course and, when `plan` is given, replaces the
    /// course list. An empty plan clears the list.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the bundle does not exist.
    /// Returns [`AppError::Validation`] if the resulting date range is inverted.
    /// Returns [`AppError::ConstraintViolation`] if a listed course does not exist.
    pub async fn update_bundle(
        &self,
        id: i64,
        patch: CoursePatch,
        plan: Option<SyncPlan<BundleCourseInput>>,
    ) -> Result<BundleView, AppError> {
        let existing = self.get_bundle(id).await?;
        CourseService::validate_patch(&existing.course, &patch)?;

        if let Some(plan) = &plan {
            tracing::debug!(
                bundle_id = id,
                accepted = plan.accepted.len(),
                skipped = plan.skipped,
                "Replacing bundle courses"
            );
        }

        let record = self
            .bundles
            .update(id, patch, plan.map(|p| p.accepted))
            .await?;
        let courses = self.format_courses(id).await?;

        Ok(BundleView { record, courses })
    }

    /// Deletes the bundle, its identity course and its course list.
    pub async fn delete_bundle(&self, id: i64) -> Result<(), AppError> {
        if !self.bundles.delete(id).await? {
            return Err(bundle_not_found(id));
        }

        tracing::info!(bundle_id = id, "Bundle deleted");
        Ok(())
    }

    /// Replaces the whole course list of a bundle.
    ///
    /// Existing rows are removed and the accepted items inserted in one
    /// transaction. Returns the written rows in input order.
    pub async fn sync_bundle_courses(
        &self,
        id: i64,
        plan: SyncPlan<BundleCourseInput>,
    ) -> Result<Vec<CourseCard>, AppError> {
        self.get_bundle(id).await?;

        let written = self.bundles.sync_courses(id, plan.accepted).await?;
        tracing::info!(
            bundle_id = id,
            written = written.len(),
            skipped = plan.skipped,
            "Bundle courses synced"
        );

        self.written_cards(&written).await
    }

    /// The formatted course list of an existing bundle.
    pub async fn bundle_courses(&self, id: i64) -> Result<Vec<CourseCard>, AppError> {
        self.get_bundle(id).await?;
        self.format_courses(id).await
    }

    /// Links one more course to a bundle.
    pub async fn attach_course(
        &self,
        bundle_id: i64,
        input: BundleCourseInput,
    ) -> Result<BundleCourse, AppError> {
        self.get_bundle(bundle_id).await?;
        self.bundles.attach(bundle_id, input).await
    }

    /// Moves linked courses to new positions and returns the re-read list.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the bundle does not exist or any item
    /// names a course that is not linked to it.
    pub async fn reposition_courses(
        &self,
        bundle_id: i64,
        items: Vec<BundleCourseInput>,
    ) -> Result<Vec<CourseCard>, AppError> {
        self.get_bundle(bundle_id).await?;
        self.bundles.reposition(bundle_id, items).await?;
        self.format_courses(bundle_id).await
    }

    /// Unlinks a course from a bundle.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the course is not linked to the bundle.
    pub async fn detach_course(&self, bundle_id: i64, course_id: i64) -> Result<(), AppError> {
        let removed = self.bundles.detach(bundle_id, course_id).await?;
        if removed == 0 {
            return Err(AppError::not_found(
                "Course is not part of this bundle",
                json!({ "bundle_id": bundle_id, "course_id": course_id }),
            ));
        }

        tracing::info!(bundle_id, course_id, removed, "Course detached from bundle");
        Ok(())
    }

    /// Joins freshly written rows with their courses and cover media.
    async fn written_cards(&self, written: &[BundleCourse]) -> Result<Vec<CourseCard>, AppError> {
        let mut ids: Vec<i64> = written.iter().map(|row| row.course_id).collect();
        ids.sort_unstable();
        ids.dedup();
        let courses = self.courses.find_courses(ids).await?;
        let rows = join_written(written, &courses);

        let ids = distinct_course_ids(rows.iter().map(|row| &row.course));
        let media = self
            .courses
            .media_index(ids, &[COVER_IMAGE_COLLECTION])
            .await?;

        Ok(bundle_cards(rows, &media, COVER_IMAGE_COLLECTION))
    }

    /// Reads the course list with one joined query and one media lookup.
    async fn format_courses(&self, bundle_id: i64) -> Result<Vec<CourseCard>, AppError> {
        let rows = self.bundles.course_rows(bundle_id).await?;
        let ids = distinct_course_ids(rows.iter().map(|row| &row.course));
        let media = self
            .courses
            .media_index(ids, &[COVER_IMAGE_COLLECTION])
            .await?;

        Ok(format_bundle(rows, &media, COVER_IMAGE_COLLECTION))
    }
}

fn bundle_not_found(id: i64) -> AppError {
    AppError::not_found("Bundle not found", json!({ "bundle_id": id }))
}
