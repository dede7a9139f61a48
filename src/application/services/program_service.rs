//! Program service: programs and their year/semester curricula.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::json;

use super::course_service::CourseService;
use crate::domain::entities::{
    COVER_IMAGE_COLLECTION, CourseAttributes, CoursePatch, MediaRef, ProgramCourse,
    ProgramCourseInput, ProgramRecord, StructureType, SyncPlan,
};
use crate::domain::formatting::{YearGroup, distinct_course_ids, group_program};
use crate::domain::repositories::ProgramRepository;
use crate::error::AppError;

/// A program with its grouped curriculum.
#[derive(Debug, Clone)]
pub struct ProgramView {
    pub record: ProgramRecord,
    pub years: Vec<YearGroup>,
}

/// A freshly created program with the association rows written for it.
#[derive(Debug, Clone)]
pub struct ProgramCreated {
    pub record: ProgramRecord,
    pub courses: Vec<ProgramCourse>,
}

/// A program with its own media collections and grouped curriculum.
#[derive(Debug, Clone)]
pub struct ProgramDetails {
    pub record: ProgramRecord,
    pub media: HashMap<String, Vec<MediaRef>>,
    pub years: Vec<YearGroup>,
}

/// Service for programs.
pub struct ProgramService {
    programs: Arc<dyn ProgramRepository>,
    courses: Arc<CourseService>,
}

impl ProgramService {
    /// Creates a new program service.
    pub fn new(programs: Arc<dyn ProgramRepository>, courses: Arc<CourseService>) -> Self {
        Self { programs, courses }
    }

    /// Creates a program, its identity course and its initial curriculum.
    /// Returns the written rows in traversal order.
    pub async fn create_program(
        &self,
        attributes: CourseAttributes,
        plan: SyncPlan<ProgramCourseInput>,
    ) -> Result<ProgramCreated, AppError> {
        let new_course = self
            .courses
            .prepare(attributes, StructureType::Program)
            .await?;
        let (record, courses) = self.programs.create(new_course, plan.accepted).await?;

        tracing::info!(
            program_id = record.program.id,
            course_id = record.course.id,
            written = courses.len(),
            skipped = plan.skipped,
            "Program created"
        );

        Ok(ProgramCreated { record, courses })
    }

    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the program does not exist.
    pub async fn get_program(&self, id: i64) -> Result<ProgramRecord, AppError> {
        self.programs
            .find_by_id(id)
            .await?
            .ok_or_else(|| program_not_found(id))
    }

    pub async fn get_program_details(&self, id: i64) -> Result<ProgramDetails, AppError> {
        let record = self.get_program(id).await?;
        let media = self.courses.media_collections(record.course.id).await?;
        let years = self.group_courses(id).await?;

        Ok(ProgramDetails {
            record,
            media,
            years,
        })
    }

    pub async fn list_programs(
        &self,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<ProgramRecord>, i64), AppError> {
        let items = self.programs.list(offset, limit).await?;
        let total = self.programs.count().await?;
        Ok((items, total))
    }

    /// Updates the identity course and, when `plan` is given, replaces the
    /// curriculum. An empty plan clears it.
    pub async fn update_program(
        &self,
        id: i64,
        patch: CoursePatch,
        plan: Option<SyncPlan<ProgramCourseInput>>,
    ) -> Result<ProgramView, AppError> {
        let existing = self.get_program(id).await?;
        CourseService::validate_patch(&existing.course, &patch)?;

        if let Some(plan) = &plan {
            tracing::debug!(
                program_id = id,
                accepted = plan.accepted.len(),
                skipped = plan.skipped,
                "Replacing program courses"
            );
        }

        let record = self
            .programs
            .update(id, patch, plan.map(|p| p.accepted))
            .await?;
        let years = self.group_courses(id).await?;

        Ok(ProgramView { record, years })
    }

    pub async fn delete_program(&self, id: i64) -> Result<(), AppError> {
        if !self.programs.delete(id).await? {
            return Err(program_not_found(id));
        }

        tracing::info!(program_id = id, "Program deleted");
        Ok(())
    }

    /// Replaces the whole curriculum of a program in one transaction and
    /// returns the written rows in traversal order.
    pub async fn sync_program_courses(
        &self,
        id: i64,
        plan: SyncPlan<ProgramCourseInput>,
    ) -> Result<Vec<ProgramCourse>, AppError> {
        self.get_program(id).await?;

        let written = self.programs.sync_courses(id, plan.accepted).await?;
        tracing::info!(
            program_id = id,
            written = written.len(),
            skipped = plan.skipped,
            "Program courses synced"
        );

        Ok(written)
    }

    pub async fn program_courses(&self, id: i64) -> Result<Vec<YearGroup>, AppError> {
        self.get_program(id).await?;
        self.group_courses(id).await
    }

    pub async fn attach_course(
        &self,
        program_id: i64,
        input: ProgramCourseInput,
    ) -> Result<ProgramCourse, AppError> {
        self.get_program(program_id).await?;
        self.programs.attach(program_id, input).await
    }

    /// Moves linked courses to a new year, semester and position.
    pub async fn reposition_courses(
        &self,
        program_id: i64,
        items: Vec<ProgramCourseInput>,
    ) -> Result<Vec<YearGroup>, AppError> {
        self.get_program(program_id).await?;
        self.programs.reposition(program_id, items).await?;
        self.group_courses(program_id).await
    }

    pub async fn detach_course(&self, program_id: i64, course_id: i64) -> Result<(), AppError> {
        let removed = self.programs.detach(program_id, course_id).await?;
        if removed == 0 {
            return Err(AppError::not_found(
                "Course is not part of this program",
                json!({ "program_id": program_id, "course_id": course_id }),
            ));
        }

        tracing::info!(program_id, course_id, removed, "Course detached from program");
        Ok(())
    }

    async fn group_courses(&self, program_id: i64) -> Result<Vec<YearGroup>, AppError> {
        let rows = self.programs.course_rows(program_id).await?;
        let ids = distinct_course_ids(rows.iter().map(|row| &row.course));
        let media = self
            .courses
            .media_index(ids, &[COVER_IMAGE_COLLECTION])
            .await?;

        Ok(group_program(rows, &media, COVER_IMAGE_COLLECTION))
    }
}

fn program_not_found(id: i64) -> AppError {
    AppError::not_found("Program not found", json!({ "program_id": id }))
}
