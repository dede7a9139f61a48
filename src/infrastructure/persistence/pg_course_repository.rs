//! PostgreSQL implementation of course repository.
//!
//! The row mapping and the insert/update statements are shared with the
//! bundle and program repositories, which write the identity course inside
//! their own transactions.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde_json::json;
use sqlx::{FromRow, PgConnection, PgPool};
use std::sync::Arc;

use crate::domain::entities::{Course, CoursePatch, NewCourse};
use crate::domain::repositories::CourseRepository;
use crate::error::AppError;

/// Raw `courses` row.
#[derive(Debug, FromRow)]
pub(crate) struct CourseRecord {
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

impl From<CourseRecord> for Course {
    fn from(r: CourseRecord) -> Self {
        Course {
            id: r.id,
            course_name: r.course_name,
            course_organization_id: r.course_organization_id,
            course_type_id: r.course_type_id,
            course_structure_type_id: r.course_structure_type_id,
            course_subject_id: r.course_subject_id,
            course_start_date: r.course_start_date,
            course_end_date: r.course_end_date,
            course_language_id: r.course_language_id,
            course_timezone: r.course_timezone,
            grading_scale_id: r.grading_scale_id,
            course_semester: r.course_semester,
            course_description: r.course_description,
            course_credits: r.course_credits,
            course_status_id: r.course_status_id,
            courses_access_code: r.courses_access_code,
            is_required_access_code: r.is_required_access_code,
            course_uuid: r.course_uuid,
            created_at: r.created_at,
            updated_at: r.updated_at,
            deleted_at: r.deleted_at,
        }
    }
}

pub(crate) async fn insert_course(
    conn: &mut PgConnection,
    new_course: &NewCourse,
) -> Result<Course, AppError> {
    let a = &new_course.attributes;

    let record = sqlx::query_as::<_, CourseRecord>(
        r#"
        INSERT INTO courses (
            course_name, course_organization_id, course_type_id, course_structure_type_id,
            course_subject_id, course_start_date, course_end_date, course_language_id,
            course_timezone, grading_scale_id, course_semester, course_description,
            course_credits, course_status_id, courses_access_code, is_required_access_code,
            course_uuid
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
        RETURNING *
        "#,
    )
    .bind(&a.course_name)
    .bind(a.course_organization_id)
    .bind(a.course_type_id)
    .bind(new_course.course_structure_type_id)
    .bind(a.course_subject_id)
    .bind(a.course_start_date)
    .bind(a.course_end_date)
    .bind(a.course_language_id)
    .bind(&a.course_timezone)
    .bind(a.grading_scale_id)
    .bind(a.course_semester)
    .bind(&a.course_description)
    .bind(a.course_credits)
    .bind(new_course.course_status_id)
    .bind(&new_course.courses_access_code)
    .bind(a.is_required_access_code)
    .bind(&new_course.course_uuid)
    .fetch_one(conn)
    .await?;

    Ok(record.into())
}

/// Applies `patch` to a live course. Returns `Ok(None)` when no live course has `id`.
pub(crate) async fn update_course(
    conn: &mut PgConnection,
    id: i64,
    patch: &CoursePatch,
) -> Result<Option<Course>, AppError> {
    let record = sqlx::query_as::<_, CourseRecord>(
        r#"
        UPDATE courses SET
            course_name             = COALESCE($2, course_name),
            course_organization_id  = COALESCE($3, course_organization_id),
            course_type_id          = COALESCE($4, course_type_id),
            course_subject_id       = COALESCE($5, course_subject_id),
            course_start_date       = COALESCE($6, course_start_date),
            course_end_date         = COALESCE($7, course_end_date),
            course_language_id      = COALESCE($8, course_language_id),
            course_timezone         = COALESCE($9, course_timezone),
            grading_scale_id        = COALESCE($10, grading_scale_id),
            course_semester         = COALESCE($11, course_semester),
            course_description      = CASE WHEN $12 THEN $13 ELSE course_description END,
            course_credits          = COALESCE($14, course_credits),
            course_status_id        = COALESCE($15, course_status_id),
            is_required_access_code = COALESCE($16, is_required_access_code),
            updated_at              = NOW()
        WHERE id = $1 AND deleted_at IS NULL
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(&patch.course_name)
    .bind(patch.course_organization_id)
    .bind(patch.course_type_id)
    .bind(patch.course_subject_id)
    .bind(patch.course_start_date)
    .bind(patch.course_end_date)
    .bind(patch.course_language_id)
    .bind(&patch.course_timezone)
    .bind(patch.grading_scale_id)
    .bind(patch.course_semester)
    .bind(patch.course_description.is_some())
    .bind(patch.course_description.clone().flatten())
    .bind(patch.course_credits)
    .bind(patch.course_status_id)
    .bind(patch.is_required_access_code)
    .fetch_optional(conn)
    .await?;

    Ok(record.map(Course::from))
}

pub(crate) async fn soft_delete_course(conn: &mut PgConnection, id: i64) -> Result<bool, AppError> {
    let result = sqlx::query(
        "UPDATE courses SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
    )
    .bind(id)
    .execute(conn)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// PostgreSQL repository for courses.
pub struct PgCourseRepository {
    pool: Arc<PgPool>,
}

impl PgCourseRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CourseRepository for PgCourseRepository {
    async fn create(&self, new_course: NewCourse) -> Result<Course, AppError> {
        let mut conn = self.pool.acquire().await?;
        insert_course(&mut conn, &new_course).await
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Course>, AppError> {
        let record = sqlx::query_as::<_, CourseRecord>(
            "SELECT * FROM courses WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(record.map(Course::from))
    }

    async fn find_by_ids(&self, ids: Vec<i64>) -> Result<Vec<Course>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let records = sqlx::query_as::<_, CourseRecord>(
            "SELECT * FROM courses WHERE id = ANY($1) AND deleted_at IS NULL ORDER BY id",
        )
        .bind(&ids)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(records.into_iter().map(Course::from).collect())
    }

    async fn list(
        &self,
        structure_type_id: i64,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Course>, AppError> {
        let records = sqlx::query_as::<_, CourseRecord>(
            r#"
            SELECT * FROM courses
            WHERE course_structure_type_id = $1 AND deleted_at IS NULL
            ORDER BY id
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(structure_type_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(records.into_iter().map(Course::from).collect())
    }

    async fn count(&self, structure_type_id: i64) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM courses WHERE course_structure_type_id = $1 AND deleted_at IS NULL",
        )
        .bind(structure_type_id)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(count)
    }

    async fn update(&self, id: i64, patch: CoursePatch) -> Result<Course, AppError> {
        let mut conn = self.pool.acquire().await?;
        update_course(&mut conn, id, &patch)
            .await?
            .ok_or_else(|| AppError::not_found("Course not found", json!({ "id": id })))
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let mut conn = self.pool.acquire().await?;
        soft_delete_course(&mut conn, id).await
    }
}
