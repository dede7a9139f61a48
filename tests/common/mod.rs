#![allow(dead_code)]

//! In-memory repositories for handler tests.
//!
//! One [`MemoryStore`] backs all five repository traits so bundle and program
//! writes see the same courses table. Writes validate every referenced course
//! before mutating anything, which mirrors the all-or-nothing transactions of
//! the PostgreSQL repositories.

use async_trait::async_trait;
use chrono::Utc;
use course_catalog::application::services::{
    BundleService, CourseService, LookupService, ProgramService,
};
use course_catalog::domain::entities::{
    Bundle, BundleCourse, BundleCourseInput, BundleRecord, Course, CoursePatch, LookupEntry,
    LookupKind, LookupPatch, MediaIndex, MediaRef, NewCourse, NewLookupEntry, PositionedCourse,
    Program, ProgramCourse, ProgramCourseInput, ProgramCourseRow, ProgramRecord,
};
use course_catalog::domain::repositories::{
    BundleRepository, CourseRepository, LookupRepository, MediaLookup, ProgramRepository,
};
use course_catalog::error::AppError;
use course_catalog::api::handlers::health_handler;
use course_catalog::api::routes::api_routes;
use course_catalog::state::AppState;
use axum::{Router, routing::get};
use axum_test::TestServer;
use serde_json::json;
use std::sync::{Arc, Mutex};

pub const COURSE_TYPE_ID: i64 = 1;
pub const PROGRAM_TYPE_ID: i64 = 2;
pub const BUNDLE_TYPE_ID: i64 = 3;
pub const DRAFT_STATUS_ID: i64 = 1;

#[derive(Default)]
struct Inner {
    next_id: i64,
    lookups: Vec<(LookupKind, LookupEntry, bool)>,
    courses: Vec<Course>,
    bundles: Vec<(Bundle, bool)>,
    bundle_courses: Vec<BundleCourse>,
    programs: Vec<(Program, bool)>,
    program_courses: Vec<ProgramCourse>,
    media: Vec<(i64, String, MediaRef)>,
    course_categories: Vec<(i64, i64)>,
}

impl Inner {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn live_course(&self, id: i64) -> Option<&Course> {
        self.courses.iter().find(|c| c.id == id && c.deleted_at.is_none())
    }

    fn ensure_courses_exist(&self, ids: impl IntoIterator<Item = i64>) -> Result<(), AppError> {
        for id in ids {
            if !self.courses.iter().any(|c| c.id == id) {
                return Err(AppError::constraint_violation(
                    "Referenced record does not exist",
                    json!({ "course_id": id }),
                ));
            }
        }
        Ok(())
    }

    fn insert_course(&mut self, new_course: NewCourse) -> Course {
        let now = Utc::now();
        let a = new_course.attributes;
        let course = Course {
            id: self.next_id(),
            course_name: a.course_name,
            course_organization_id: a.course_organization_id,
            course_type_id: a.course_type_id,
            course_structure_type_id: new_course.course_structure_type_id,
            course_subject_id: a.course_subject_id,
            course_start_date: a.course_start_date,
            course_end_date: a.course_end_date,
            course_language_id: a.course_language_id,
            course_timezone: a.course_timezone,
            grading_scale_id: a.grading_scale_id,
            course_semester: a.course_semester,
            course_description: a.course_description,
            course_credits: a.course_credits,
            course_status_id: new_course.course_status_id,
            courses_access_code: new_course.courses_access_code,
            is_required_access_code: a.is_required_access_code,
            course_uuid: new_course.course_uuid,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        self.courses.push(course.clone());
        course
    }

    fn patch_course(&mut self, id: i64, patch: CoursePatch) -> Option<Course> {
        let course = self
            .courses
            .iter_mut()
            .find(|c| c.id == id && c.deleted_at.is_none())?;

        if let Some(v) = patch.course_name {
            course.course_name = v;
        }
        if let Some(v) = patch.course_organization_id {
            course.course_organization_id = Some(v);
        }
        if let Some(v) = patch.course_type_id {
            course.course_type_id = Some(v);
        }
        if let Some(v) = patch.course_subject_id {
            course.course_subject_id = Some(v);
        }
        if let Some(v) = patch.course_start_date {
            course.course_start_date = Some(v);
        }
        if let Some(v) = patch.course_end_date {
            course.course_end_date = Some(v);
        }
        if let Some(v) = patch.course_language_id {
            course.course_language_id = Some(v);
        }
        if let Some(v) = patch.course_timezone {
            course.course_timezone = Some(v);
        }
        if let Some(v) = patch.grading_scale_id {
            course.grading_scale_id = Some(v);
        }
        if let Some(v) = patch.course_semester {
            course.course_semester = Some(v);
        }
        if let Some(v) = patch.course_description {
            course.course_description = v;
        }
        if let Some(v) = patch.course_credits {
            course.course_credits = Some(v);
        }
        if let Some(v) = patch.course_status_id {
            course.course_status_id = v;
        }
        if let Some(v) = patch.is_required_access_code {
            course.is_required_access_code = v;
        }
        course.updated_at = Utc::now();

        Some(course.clone())
    }

    fn soft_delete_course(&mut self, id: i64) -> bool {
        match self
            .courses
            .iter_mut()
            .find(|c| c.id == id && c.deleted_at.is_none())
        {
            Some(course) => {
                course.deleted_at = Some(Utc::now());
                true
            }
            None => false,
        }
    }

    fn live_bundle(&self, id: i64) -> Option<BundleRecord> {
        let (bundle, _) = self
            .bundles
            .iter()
            .find(|(b, deleted)| b.id == id && !deleted)?;
        let course = self.live_course(bundle.course_id)?.clone();
        Some(BundleRecord {
            bundle: bundle.clone(),
            course,
        })
    }

    fn live_program(&self, id: i64) -> Option<ProgramRecord> {
        let (program, _) = self
            .programs
            .iter()
            .find(|(p, deleted)| p.id == id && !deleted)?;
        let course = self.live_course(program.course_id)?.clone();
        Some(ProgramRecord {
            program: program.clone(),
            course,
        })
    }

    fn insert_bundle_rows(&mut self, bundle_id: i64, items: &[BundleCourseInput]) -> Vec<BundleCourse> {
        let mut inserted = Vec::with_capacity(items.len());
        for item in items {
            let row = BundleCourse {
                id: self.next_id(),
                bundle_id,
                course_id: item.course_id,
                course_position: item.course_position,
                created_at: Utc::now(),
            };
            self.bundle_courses.push(row.clone());
            inserted.push(row);
        }
        inserted
    }

    fn insert_program_rows(
        &mut self,
        program_id: i64,
        items: &[ProgramCourseInput],
    ) -> Vec<ProgramCourse> {
        let mut inserted = Vec::with_capacity(items.len());
        for item in items {
            let row = ProgramCourse {
                id: self.next_id(),
                program_id,
                course_id: item.course_id,
                course_position: item.course_position,
                program_year: item.program_year,
                program_semester: item.program_semester,
                created_at: Utc::now(),
            };
            self.program_courses.push(row.clone());
            inserted.push(row);
        }
        inserted
    }
}

/// Shared in-memory store implementing every repository trait.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    /// Creates a store with the structure types and the draft status seeded.
    pub fn seeded() -> Self {
        let store = Self::default();
        {
            let mut inner = store.inner.lock().unwrap();
            for (name, slug) in [("Course", "course"), ("Program", "program"), ("Bundle", "bundle")]
            {
                let id = inner.next_id();
                inner.lookups.push((
                    LookupKind::StructureType,
                    entry(id, name, Some(slug)),
                    false,
                ));
            }
            for (id, name) in [(1, "draft"), (2, "published")] {
                inner
                    .lookups
                    .push((LookupKind::Status, entry(id, name, None), false));
            }
            inner.next_id = 100;
        }
        store
    }

    /// Creates a store with no lookup rows at all.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Attaches a media item to a course.
    pub fn add_media(&self, course_id: i64, collection: &str) -> i64 {
        let mut inner = self.inner.lock().unwrap();
        let id = inner.next_id();
        inner.media.push((
            course_id,
            "course".to_string(),
            MediaRef {
                id,
                collection_name: collection.to_string(),
                name: format!("media-{id}"),
                file_name: format!("media-{id}.png"),
                mime_type: Some("image/png".to_string()),
                disk: "s3".to_string(),
                size: 2048,
            },
        ));
        id
    }

    pub fn bundle_rows(&self, bundle_id: i64) -> Vec<BundleCourse> {
        let inner = self.inner.lock().unwrap();
        inner
            .bundle_courses
            .iter()
            .filter(|r| r.bundle_id == bundle_id)
            .cloned()
            .collect()
    }

    pub fn program_rows(&self, program_id: i64) -> Vec<ProgramCourse> {
        let inner = self.inner.lock().unwrap();
        inner
            .program_courses
            .iter()
            .filter(|r| r.program_id == program_id)
            .cloned()
            .collect()
    }

    /// Adds a live category row and returns its id.
    pub fn add_category(&self, name: &str) -> i64 {
        let mut inner = self.inner.lock().unwrap();
        let id = inner.next_id();
        inner
            .lookups
            .push((LookupKind::Category, entry(id, name, None), false));
        id
    }

    pub fn course(&self, id: i64) -> Option<Course> {
        let inner = self.inner.lock().unwrap();
        inner.courses.iter().find(|c| c.id == id).cloned()
    }
}

fn entry(id: i64, name: &str, slug: Option<&str>) -> LookupEntry {
    let now = Utc::now();
    LookupEntry {
        id,
        name: name.to_string(),
        slug: slug.map(str::to_string),
        created_at: now,
        updated_at: now,
    }
}

fn bundle_not_found(id: i64) -> AppError {
    AppError::not_found("Bundle not found", json!({ "bundle_id": id }))
}

fn program_not_found(id: i64) -> AppError {
    AppError::not_found("Program not found", json!({ "program_id": id }))
}

#[async_trait]
impl LookupRepository for MemoryStore {
    async fn list(
        &self,
        kind: LookupKind,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<LookupEntry>, AppError> {
        let inner = self.inner.lock().unwrap();
        let mut rows: Vec<_> = inner
            .lookups
            .iter()
            .filter(|(k, _, deleted)| *k == kind && !deleted)
            .map(|(_, e, _)| e.clone())
            .collect();
        rows.sort_by_key(|e| e.id);
        Ok(rows
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn count(&self, kind: LookupKind) -> Result<i64, AppError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .lookups
            .iter()
            .filter(|(k, _, deleted)| *k == kind && !deleted)
            .count() as i64)
    }

    async fn find_by_id(&self, kind: LookupKind, id: i64) -> Result<Option<LookupEntry>, AppError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .lookups
            .iter()
            .find(|(k, e, deleted)| *k == kind && e.id == id && !deleted)
            .map(|(_, e, _)| e.clone()))
    }

    async fn find_by_name(
        &self,
        kind: LookupKind,
        name: &str,
    ) -> Result<Option<LookupEntry>, AppError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .lookups
            .iter()
            .find(|(k, e, deleted)| *k == kind && e.name == name && !deleted)
            .map(|(_, e, _)| e.clone()))
    }

    async fn find_by_slug(
        &self,
        kind: LookupKind,
        slug: &str,
    ) -> Result<Option<LookupEntry>, AppError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .lookups
            .iter()
            .find(|(k, e, deleted)| *k == kind && e.slug.as_deref() == Some(slug) && !deleted)
            .map(|(_, e, _)| e.clone()))
    }

    async fn create(&self, kind: LookupKind, new_entry: NewLookupEntry) -> Result<LookupEntry, AppError> {
        let mut inner = self.inner.lock().unwrap();
        let id = inner.next_id();
        let created = entry(id, &new_entry.name, new_entry.slug.as_deref());
        inner.lookups.push((kind, created.clone(), false));
        Ok(created)
    }

    async fn update(
        &self,
        kind: LookupKind,
        id: i64,
        patch: LookupPatch,
    ) -> Result<LookupEntry, AppError> {
        let mut inner = self.inner.lock().unwrap();
        let (_, e, _) = inner
            .lookups
            .iter_mut()
            .find(|(k, e, deleted)| *k == kind && e.id == id && !deleted)
            .ok_or_else(|| {
                AppError::not_found(format!("{} not found", kind.label()), json!({ "id": id }))
            })?;

        if let Some(name) = patch.name {
            e.name = name;
        }
        if let Some(slug) = patch.slug {
            e.slug = Some(slug);
        }
        e.updated_at = Utc::now();
        Ok(e.clone())
    }

    async fn delete(&self, kind: LookupKind, id: i64) -> Result<bool, AppError> {
        let mut inner = self.inner.lock().unwrap();
        match inner
            .lookups
            .iter_mut()
            .find(|(k, e, deleted)| *k == kind && e.id == id && !deleted)
        {
            Some(row) => {
                row.2 = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn categories_of_course(&self, course_id: i64) -> Result<Vec<LookupEntry>, AppError> {
        let inner = self.inner.lock().unwrap();
        let mut categories: Vec<_> = inner
            .lookups
            .iter()
            .filter(|(k, e, deleted)| {
                *k == LookupKind::Category
                    && !deleted
                    && inner.course_categories.contains(&(course_id, e.id))
            })
            .map(|(_, e, _)| e.clone())
            .collect();
        categories.sort_by_key(|e| e.id);
        Ok(categories)
    }

    async fn assign_category(&self, course_id: i64, category_id: i64) -> Result<(), AppError> {
        let mut inner = self.inner.lock().unwrap();
        inner.ensure_courses_exist([course_id])?;
        let category_exists = inner
            .lookups
            .iter()
            .any(|(k, e, _)| *k == LookupKind::Category && e.id == category_id);
        if !category_exists {
            return Err(AppError::constraint_violation(
                "Referenced record does not exist",
                json!({ "course_category_id": category_id }),
            ));
        }
        if !inner.course_categories.contains(&(course_id, category_id)) {
            inner.course_categories.push((course_id, category_id));
        }
        Ok(())
    }

    async fn unassign_category(&self, course_id: i64, category_id: i64) -> Result<u64, AppError> {
        let mut inner = self.inner.lock().unwrap();
        let before = inner.course_categories.len();
        inner
            .course_categories
            .retain(|link| *link != (course_id, category_id));
        Ok((before - inner.course_categories.len()) as u64)
    }
}

#[async_trait]
impl CourseRepository for MemoryStore {
    async fn create(&self, new_course: NewCourse) -> Result<Course, AppError> {
        let mut inner = self.inner.lock().unwrap();
        Ok(inner.insert_course(new_course))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Course>, AppError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.live_course(id).cloned())
    }

    async fn find_by_ids(&self, ids: Vec<i64>) -> Result<Vec<Course>, AppError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .courses
            .iter()
            .filter(|c| ids.contains(&c.id) && c.deleted_at.is_none())
            .cloned()
            .collect())
    }

    async fn list(
        &self,
        structure_type_id: i64,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Course>, AppError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .courses
            .iter()
            .filter(|c| c.course_structure_type_id == structure_type_id && c.deleted_at.is_none())
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn count(&self, structure_type_id: i64) -> Result<i64, AppError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .courses
            .iter()
            .filter(|c| c.course_structure_type_id == structure_type_id && c.deleted_at.is_none())
            .count() as i64)
    }

    async fn update(&self, id: i64, patch: CoursePatch) -> Result<Course, AppError> {
        let mut inner = self.inner.lock().unwrap();
        inner
            .patch_course(id, patch)
            .ok_or_else(|| AppError::not_found("Course not found", json!({ "id": id })))
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let mut inner = self.inner.lock().unwrap();
        Ok(inner.soft_delete_course(id))
    }
}

#[async_trait]
impl BundleRepository for MemoryStore {
    async fn create(
        &self,
        new_course: NewCourse,
        courses: Vec<BundleCourseInput>,
    ) -> Result<(BundleRecord, Vec<BundleCourse>), AppError> {
        let mut inner = self.inner.lock().unwrap();
        inner.ensure_courses_exist(courses.iter().map(|c| c.course_id))?;

        let course = inner.insert_course(new_course);
        let now = Utc::now();
        let bundle = Bundle {
            id: inner.next_id(),
            course_id: course.id,
            created_at: now,
            updated_at: now,
        };
        inner.bundles.push((bundle.clone(), false));
        let written = inner.insert_bundle_rows(bundle.id, &courses);

        Ok((BundleRecord { bundle, course }, written))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<BundleRecord>, AppError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.live_bundle(id))
    }

    async fn list(&self, offset: i64, limit: i64) -> Result<Vec<BundleRecord>, AppError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .bundles
            .iter()
            .filter_map(|(b, _)| inner.live_bundle(b.id))
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn count(&self) -> Result<i64, AppError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .bundles
            .iter()
            .filter(|(b, _)| inner.live_bundle(b.id).is_some())
            .count() as i64)
    }

    async fn update(
        &self,
        id: i64,
        patch: CoursePatch,
        courses: Option<Vec<BundleCourseInput>>,
    ) -> Result<BundleRecord, AppError> {
        let mut inner = self.inner.lock().unwrap();
        let record = inner.live_bundle(id).ok_or_else(|| bundle_not_found(id))?;
        if let Some(courses) = &courses {
            inner.ensure_courses_exist(courses.iter().map(|c| c.course_id))?;
        }

        let course = inner
            .patch_course(record.course.id, patch)
            .ok_or_else(|| bundle_not_found(id))?;
        if let Some(courses) = courses {
            inner.bundle_courses.retain(|r| r.bundle_id != id);
            inner.insert_bundle_rows(id, &courses);
        }

        let mut bundle = record.bundle;
        bundle.updated_at = Utc::now();
        if let Some((b, _)) = inner.bundles.iter_mut().find(|(b, _)| b.id == id) {
            b.updated_at = bundle.updated_at;
        }

        Ok(BundleRecord { bundle, course })
    }

    async fn sync_courses(
        &self,
        bundle_id: i64,
        courses: Vec<BundleCourseInput>,
    ) -> Result<Vec<BundleCourse>, AppError> {
        let mut inner = self.inner.lock().unwrap();
        inner.ensure_courses_exist(courses.iter().map(|c| c.course_id))?;

        inner.bundle_courses.retain(|r| r.bundle_id != bundle_id);
        Ok(inner.insert_bundle_rows(bundle_id, &courses))
    }

    async fn course_rows(&self, bundle_id: i64) -> Result<Vec<PositionedCourse>, AppError> {
        let inner = self.inner.lock().unwrap();
        let mut rows: Vec<_> = inner
            .bundle_courses
            .iter()
            .filter(|r| r.bundle_id == bundle_id)
            .filter_map(|r| {
                inner.live_course(r.course_id).map(|c| {
                    (
                        r.course_position,
                        r.id,
                        PositionedCourse {
                            course: c.clone(),
                            course_position: r.course_position,
                        },
                    )
                })
            })
            .collect();
        rows.sort_by_key(|(position, id, _)| (*position, *id));
        Ok(rows.into_iter().map(|(_, _, row)| row).collect())
    }

    async fn attach(
        &self,
        bundle_id: i64,
        course: BundleCourseInput,
    ) -> Result<BundleCourse, AppError> {
        let mut inner = self.inner.lock().unwrap();
        inner.ensure_courses_exist([course.course_id])?;
        let mut rows = inner.insert_bundle_rows(bundle_id, &[course]);
        rows.pop()
            .ok_or_else(|| AppError::internal("Insert returned no row", json!({})))
    }

    async fn reposition(
        &self,
        bundle_id: i64,
        courses: Vec<BundleCourseInput>,
    ) -> Result<(), AppError> {
        let mut inner = self.inner.lock().unwrap();
        for item in &courses {
            if !inner
                .bundle_courses
                .iter()
                .any(|r| r.bundle_id == bundle_id && r.course_id == item.course_id)
            {
                return Err(AppError::not_found(
                    "Course is not part of this bundle",
                    json!({ "bundle_id": bundle_id, "course_id": item.course_id }),
                ));
            }
        }

        for item in &courses {
            for row in inner
                .bundle_courses
                .iter_mut()
                .filter(|r| r.bundle_id == bundle_id && r.course_id == item.course_id)
            {
                row.course_position = item.course_position;
            }
        }
        Ok(())
    }

    async fn detach(&self, bundle_id: i64, course_id: i64) -> Result<u64, AppError> {
        let mut inner = self.inner.lock().unwrap();
        let before = inner.bundle_courses.len();
        inner
            .bundle_courses
            .retain(|r| !(r.bundle_id == bundle_id && r.course_id == course_id));
        Ok((before - inner.bundle_courses.len()) as u64)
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let mut inner = self.inner.lock().unwrap();
        let Some(record) = inner.live_bundle(id) else {
            return Ok(false);
        };

        inner.bundle_courses.retain(|r| r.bundle_id != id);
        if let Some(row) = inner.bundles.iter_mut().find(|(b, _)| b.id == id) {
            row.1 = true;
        }
        inner.soft_delete_course(record.course.id);
        Ok(true)
    }
}

#[async_trait]
impl ProgramRepository for MemoryStore {
    async fn create(
        &self,
        new_course: NewCourse,
        courses: Vec<ProgramCourseInput>,
    ) -> Result<(ProgramRecord, Vec<ProgramCourse>), AppError> {
        let mut inner = self.inner.lock().unwrap();
        inner.ensure_courses_exist(courses.iter().map(|c| c.course_id))?;

        let course = inner.insert_course(new_course);
        let now = Utc::now();
        let program = Program {
            id: inner.next_id(),
            course_id: course.id,
            created_at: now,
            updated_at: now,
        };
        inner.programs.push((program.clone(), false));
        let written = inner.insert_program_rows(program.id, &courses);

        Ok((ProgramRecord { program, course }, written))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<ProgramRecord>, AppError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.live_program(id))
    }

    async fn list(&self, offset: i64, limit: i64) -> Result<Vec<ProgramRecord>, AppError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .programs
            .iter()
            .filter_map(|(p, _)| inner.live_program(p.id))
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn count(&self) -> Result<i64, AppError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .programs
            .iter()
            .filter(|(p, _)| inner.live_program(p.id).is_some())
            .count() as i64)
    }

    async fn update(
        &self,
        id: i64,
        patch: CoursePatch,
        courses: Option<Vec<ProgramCourseInput>>,
    ) -> Result<ProgramRecord, AppError> {
        let mut inner = self.inner.lock().unwrap();
        let record = inner.live_program(id).ok_or_else(|| program_not_found(id))?;
        if let Some(courses) = &courses {
            inner.ensure_courses_exist(courses.iter().map(|c| c.course_id))?;
        }

        let course = inner
            .patch_course(record.course.id, patch)
            .ok_or_else(|| program_not_found(id))?;
        if let Some(courses) = courses {
            inner.program_courses.retain(|r| r.program_id != id);
            inner.insert_program_rows(id, &courses);
        }

        let mut program = record.program;
        program.updated_at = Utc::now();
        if let Some((p, _)) = inner.programs.iter_mut().find(|(p, _)| p.id == id) {
            p.updated_at = program.updated_at;
        }

        Ok(ProgramRecord { program, course })
    }

    async fn sync_courses(
        &self,
        program_id: i64,
        courses: Vec<ProgramCourseInput>,
    ) -> Result<Vec<ProgramCourse>, AppError> {
        let mut inner = self.inner.lock().unwrap();
        inner.ensure_courses_exist(courses.iter().map(|c| c.course_id))?;

        inner.program_courses.retain(|r| r.program_id != program_id);
        Ok(inner.insert_program_rows(program_id, &courses))
    }

    async fn course_rows(&self, program_id: i64) -> Result<Vec<ProgramCourseRow>, AppError> {
        let inner = self.inner.lock().unwrap();
        let mut rows: Vec<_> = inner
            .program_courses
            .iter()
            .filter(|r| r.program_id == program_id)
            .filter_map(|r| {
                inner.live_course(r.course_id).map(|c| {
                    (
                        (r.program_year, r.program_semester, r.course_position, r.id),
                        ProgramCourseRow {
                            course: c.clone(),
                            course_position: r.course_position,
                            program_year: r.program_year,
                            program_semester: r.program_semester,
                        },
                    )
                })
            })
            .collect();
        rows.sort_by_key(|(key, _)| *key);
        Ok(rows.into_iter().map(|(_, row)| row).collect())
    }

    async fn attach(
        &self,
        program_id: i64,
        course: ProgramCourseInput,
    ) -> Result<ProgramCourse, AppError> {
        let mut inner = self.inner.lock().unwrap();
        inner.ensure_courses_exist([course.course_id])?;
        let mut rows = inner.insert_program_rows(program_id, &[course]);
        rows.pop()
            .ok_or_else(|| AppError::internal("Insert returned no row", json!({})))
    }

    async fn reposition(
        &self,
        program_id: i64,
        courses: Vec<ProgramCourseInput>,
    ) -> Result<(), AppError> {
        let mut inner = self.inner.lock().unwrap();
        for item in &courses {
            if !inner
                .program_courses
                .iter()
                .any(|r| r.program_id == program_id && r.course_id == item.course_id)
            {
                return Err(AppError::not_found(
                    "Course is not part of this program",
                    json!({ "program_id": program_id, "course_id": item.course_id }),
                ));
            }
        }

        for item in &courses {
            for row in inner
                .program_courses
                .iter_mut()
                .filter(|r| r.program_id == program_id && r.course_id == item.course_id)
            {
                row.course_position = item.course_position;
                row.program_year = item.program_year;
                row.program_semester = item.program_semester;
            }
        }
        Ok(())
    }

    async fn detach(&self, program_id: i64, course_id: i64) -> Result<u64, AppError> {
        let mut inner = self.inner.lock().unwrap();
        let before = inner.program_courses.len();
        inner
            .program_courses
            .retain(|r| !(r.program_id == program_id && r.course_id == course_id));
        Ok((before - inner.program_courses.len()) as u64)
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let mut inner = self.inner.lock().unwrap();
        let Some(record) = inner.live_program(id) else {
            return Ok(false);
        };

        inner.program_courses.retain(|r| r.program_id != id);
        if let Some(row) = inner.programs.iter_mut().find(|(p, _)| p.id == id) {
            row.1 = true;
        }
        inner.soft_delete_course(record.course.id);
        Ok(true)
    }
}

#[async_trait]
impl MediaLookup for MemoryStore {
    async fn media_by_model_ids(
        &self,
        ids: Vec<i64>,
        collections: Vec<String>,
        model_type: &str,
    ) -> Result<MediaIndex, AppError> {
        let inner = self.inner.lock().unwrap();
        let mut index = MediaIndex::new();
        for (model_id, media_type, media) in &inner.media {
            if media_type == model_type
                && ids.contains(model_id)
                && collections.contains(&media.collection_name)
            {
                index
                    .entry(*model_id)
                    .or_default()
                    .entry(media.collection_name.clone())
                    .or_default()
                    .push(media.clone());
            }
        }
        Ok(index)
    }
}

/// Builds application state over `store`.
pub fn create_test_state(store: &MemoryStore) -> AppState {
    let store = Arc::new(store.clone());

    let lookup_service = Arc::new(LookupService::new(store.clone()));
    let course_service = Arc::new(CourseService::new(
        store.clone(),
        store.clone(),
        store.clone(),
    ));
    let bundle_service = Arc::new(BundleService::new(store.clone(), course_service.clone()));
    let program_service = Arc::new(ProgramService::new(store, course_service.clone()));

    AppState {
        lookup_service,
        course_service,
        bundle_service,
        program_service,
        default_page_size: 25,
    }
}

/// Router with every API route and `/health` over `store`.
pub fn make_app(store: &MemoryStore) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .nest("/api", api_routes())
        .with_state(create_test_state(store))
}

/// Test server over a seeded store.
pub fn make_server() -> (TestServer, MemoryStore) {
    let store = MemoryStore::seeded();
    let server = TestServer::new(make_app(&store)).unwrap();
    (server, store)
}

/// Creates a plain course through the API and returns its id.
pub async fn create_course(server: &TestServer, name: &str) -> i64 {
    let response = server
        .post("/api/courses")
        .json(&json!({ "course_name": name }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    response.json::<serde_json::Value>()["id"].as_i64().unwrap()
}
