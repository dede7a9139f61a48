//! PostgreSQL implementation of program repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::{FromRow, PgConnection, PgPool};
use std::sync::Arc;

use super::pg_aggregate::{PROGRAMS, ParentRow};
use super::pg_course_repository::CourseRecord;
use crate::domain::entities::{
    Course, CoursePatch, NewCourse, Program, ProgramCourse, ProgramCourseInput, ProgramCourseRow,
    ProgramRecord,
};
use crate::domain::repositories::ProgramRepository;
use crate::error::AppError;

fn program_record((parent, course): (ParentRow, Course)) -> ProgramRecord {
    ProgramRecord {
        program: Program {
            id: parent.id,
            course_id: parent.course_id,
            created_at: parent.created_at,
            updated_at: parent.updated_at,
        },
        course,
    }
}

#[derive(Debug, FromRow)]
struct ProgramCourseDbRow {
    id: i64,
    program_id: i64,
    course_id: i64,
    course_position: i32,
    program_year: i32,
    program_semester: i32,
    created_at: DateTime<Utc>,
}

impl From<ProgramCourseDbRow> for ProgramCourse {
    fn from(r: ProgramCourseDbRow) -> Self {
        ProgramCourse {
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

#[derive(Debug, FromRow)]
struct PlacedRow {
    course_position: i32,
    program_year: i32,
    program_semester: i32,
    #[sqlx(flatten)]
    course: CourseRecord,
}

/// Inserts rows one by one so ids follow traversal order.
async fn insert_rows(
    conn: &mut PgConnection,
    program_id: i64,
    courses: &[ProgramCourseInput],
) -> Result<Vec<ProgramCourse>, AppError> {
    let mut inserted = Vec::with_capacity(courses.len());
    for item in courses {
        let row = sqlx::query_as::<_, ProgramCourseDbRow>(
            r#"
            INSERT INTO program_courses
                (program_id, course_id, course_position, program_year, program_semester)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, program_id, course_id, course_position,
                      program_year, program_semester, created_at
            "#,
        )
        .bind(program_id)
        .bind(item.course_id)
        .bind(item.course_position)
        .bind(item.program_year)
        .bind(item.program_semester)
        .fetch_one(&mut *conn)
        .await?;
        inserted.push(row.into());
    }
    Ok(inserted)
}

/// PostgreSQL repository for programs and `program_courses`.
pub struct PgProgramRepository {
    pool: Arc<PgPool>,
}

impl PgProgramRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProgramRepository for PgProgramRepository {
    async fn create(
        &self,
        new_course: NewCourse,
        courses: Vec<ProgramCourseInput>,
    ) -> Result<(ProgramRecord, Vec<ProgramCourse>), AppError> {
        let mut tx = self.pool.begin().await?;

        let record = program_record(PROGRAMS.insert(&mut tx, &new_course).await?);
        let written = insert_rows(&mut tx, record.program.id, &courses).await?;

        tx.commit().await?;

        tracing::debug!(
            program_id = record.program.id,
            course_id = record.course.id,
            courses = written.len(),
            "Program created"
        );

        Ok((record, written))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<ProgramRecord>, AppError> {
        let found = PROGRAMS.find_record(&self.pool, id).await?;
        Ok(found.map(program_record))
    }

    async fn list(&self, offset: i64, limit: i64) -> Result<Vec<ProgramRecord>, AppError> {
        let rows = PROGRAMS.list_records(&self.pool, offset, limit).await?;
        Ok(rows.into_iter().map(program_record).collect())
    }

    async fn count(&self) -> Result<i64, AppError> {
        PROGRAMS.count_live(&self.pool).await
    }

    async fn update(
        &self,
        id: i64,
        patch: CoursePatch,
        courses: Option<Vec<ProgramCourseInput>>,
    ) -> Result<ProgramRecord, AppError> {
        let mut tx = self.pool.begin().await?;

        let record = program_record(PROGRAMS.update(&mut tx, id, &patch).await?);

        if let Some(courses) = courses {
            let removed = PROGRAMS.delete_links(&mut tx, id).await?;
            insert_rows(&mut tx, id, &courses).await?;
            tracing::debug!(program_id = id, removed, inserted = courses.len(), "Program courses replaced");
        }

        tx.commit().await?;

        Ok(record)
    }

    async fn sync_courses(
        &self,
        program_id: i64,
        courses: Vec<ProgramCourseInput>,
    ) -> Result<Vec<ProgramCourse>, AppError> {
        let mut tx = self.pool.begin().await?;

        let removed = PROGRAMS.delete_links(&mut tx, program_id).await?;
        let inserted = insert_rows(&mut tx, program_id, &courses).await?;

        tx.commit().await?;

        tracing::debug!(program_id, removed, inserted = inserted.len(), "Program courses synced");

        Ok(inserted)
    }

    async fn course_rows(&self, program_id: i64) -> Result<Vec<ProgramCourseRow>, AppError> {
        let rows = sqlx::query_as::<_, PlacedRow>(
            r#"
            SELECT pc.course_position, pc.program_year, pc.program_semester, c.*
            FROM program_courses pc
            JOIN courses c ON c.id = pc.course_id
            WHERE pc.program_id = $1
              AND pc.deleted_at IS NULL
              AND c.deleted_at IS NULL
            ORDER BY pc.program_year, pc.program_semester, pc.course_position, pc.id
            "#,
        )
        .bind(program_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| ProgramCourseRow {
                course: r.course.into(),
                course_position: r.course_position,
                program_year: r.program_year,
                program_semester: r.program_semester,
            })
            .collect())
    }

    async fn attach(
        &self,
        program_id: i64,
        course: ProgramCourseInput,
    ) -> Result<ProgramCourse, AppError> {
        let mut conn = self.pool.acquire().await?;
        let mut inserted = insert_rows(&mut conn, program_id, &[course]).await?;
        inserted
            .pop()
            .ok_or_else(|| AppError::internal("Insert returned no row", json!({})))
    }

    async fn reposition(
        &self,
        program_id: i64,
        courses: Vec<ProgramCourseInput>,
    ) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        for item in &courses {
            let result = sqlx::query(
                r#"
                UPDATE program_courses
                SET course_position = $3, program_year = $4, program_semester = $5,
                    updated_at = NOW()
                WHERE program_id = $1 AND course_id = $2 AND deleted_at IS NULL
                "#,
            )
            .bind(program_id)
            .bind(item.course_id)
            .bind(item.course_position)
            .bind(item.program_year)
            .bind(item.program_semester)
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() == 0 {
                return Err(AppError::not_found(
                    "Course is not part of this program",
                    json!({ "program_id": program_id, "course_id": item.course_id }),
                ));
            }
        }

        tx.commit().await?;
        Ok(())
    }

    async fn detach(&self, program_id: i64, course_id: i64) -> Result<u64, AppError> {
        let mut conn = self.pool.acquire().await?;
        PROGRAMS.detach(&mut conn, program_id, course_id).await
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let mut tx = self.pool.begin().await?;
        let deleted = PROGRAMS.soft_delete(&mut tx, id).await?;
        tx.commit().await?;
        Ok(deleted)
    }
}
