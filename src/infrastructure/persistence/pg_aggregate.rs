//! Lifecycle shared by the bundle and program repositories.
//!
//! Both aggregates wrap an identity course and own a table of course
//! associations. Creating, patching and deleting the aggregate is the same
//! SQL for both with different table names; the association inserts and
//! reads stay in each repository.
//!
//! Table names come from the [`BUNDLES`] and [`PROGRAMS`] constants only,
//! never from input.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use sqlx::{FromRow, PgConnection, PgPool};

use super::pg_course_repository::{CourseRecord, insert_course, soft_delete_course, update_course};
use crate::domain::entities::{Course, CoursePatch, NewCourse};
use crate::error::AppError;

/// Tables backing one aggregate kind.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Aggregate {
    /// Human-readable name used in error messages.
    pub label: &'static str,
    pub table: &'static str,
    pub links_table: &'static str,
    /// Column of `links_table` referencing `table`.
    pub link_key: &'static str,
}

pub(crate) const BUNDLES: Aggregate = Aggregate {
    label: "Bundle",
    table: "bundles",
    links_table: "bundle_courses",
    link_key: "bundle_id",
};

pub(crate) const PROGRAMS: Aggregate = Aggregate {
    label: "Program",
    table: "programs",
    links_table: "program_courses",
    link_key: "program_id",
};

/// Raw `bundles` / `programs` row.
#[derive(Debug, FromRow)]
pub(crate) struct ParentRow {
    pub id: i64,
    pub course_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Parent row joined with its live identity course.
#[derive(Debug, FromRow)]
pub(crate) struct ParentJoinRow {
    parent_id: i64,
    parent_created_at: DateTime<Utc>,
    parent_updated_at: DateTime<Utc>,
    #[sqlx(flatten)]
    course: CourseRecord,
}

impl ParentJoinRow {
    pub fn into_parts(self) -> (ParentRow, Course) {
        let parent = ParentRow {
            id: self.parent_id,
            course_id: self.course.id,
            created_at: self.parent_created_at,
            updated_at: self.parent_updated_at,
        };
        (parent, self.course.into())
    }
}

impl Aggregate {
    pub fn not_found(&self, id: i64) -> AppError {
        let mut details = Map::new();
        details.insert(self.link_key.to_string(), Value::from(id));
        AppError::not_found(format!("{} not found", self.label), Value::Object(details))
    }

    fn select_live(&self) -> String {
        format!(
            r#"
            SELECT p.id AS parent_id, p.created_at AS parent_created_at,
                   p.updated_at AS parent_updated_at, c.*
            FROM {} p
            JOIN courses c ON c.id = p.course_id
            WHERE p.deleted_at IS NULL AND c.deleted_at IS NULL
            "#,
            self.table
        )
    }

    /// Inserts the identity course and the parent row.
    pub async fn insert(
        &self,
        conn: &mut PgConnection,
        new_course: &NewCourse,
    ) -> Result<(ParentRow, Course), AppError> {
        let course = insert_course(&mut *conn, new_course).await?;

        let sql = format!(
            "INSERT INTO {} (course_id) VALUES ($1) RETURNING id, course_id, created_at, updated_at",
            self.table
        );
        let parent = sqlx::query_as::<_, ParentRow>(&sql)
            .bind(course.id)
            .fetch_one(&mut *conn)
            .await?;

        Ok((parent, course))
    }

    pub async fn find_live(
        &self,
        conn: &mut PgConnection,
        id: i64,
    ) -> Result<Option<ParentRow>, AppError> {
        let sql = format!(
            "SELECT id, course_id, created_at, updated_at FROM {} WHERE id = $1 AND deleted_at IS NULL",
            self.table
        );
        let row = sqlx::query_as::<_, ParentRow>(&sql)
            .bind(id)
            .fetch_optional(conn)
            .await?;

        Ok(row)
    }

    pub async fn find_record(
        &self,
        pool: &PgPool,
        id: i64,
    ) -> Result<Option<(ParentRow, Course)>, AppError> {
        let sql = format!("{} AND p.id = $1", self.select_live());
        let row = sqlx::query_as::<_, ParentJoinRow>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(row.map(ParentJoinRow::into_parts))
    }

    pub async fn list_records(
        &self,
        pool: &PgPool,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<(ParentRow, Course)>, AppError> {
        let sql = format!("{} ORDER BY p.id LIMIT $1 OFFSET $2", self.select_live());
        let rows = sqlx::query_as::<_, ParentJoinRow>(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;

        Ok(rows.into_iter().map(ParentJoinRow::into_parts).collect())
    }

    pub async fn count_live(&self, pool: &PgPool) -> Result<i64, AppError> {
        let sql = format!(
            r#"
            SELECT COUNT(*) FROM {} p
            JOIN courses c ON c.id = p.course_id
            WHERE p.deleted_at IS NULL AND c.deleted_at IS NULL
            "#,
            self.table
        );
        let count: i64 = sqlx::query_scalar(&sql).fetch_one(pool).await?;
        Ok(count)
    }

    /// Patches the identity course and bumps the parent's `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the parent or its course is gone.
    pub async fn update(
        &self,
        conn: &mut PgConnection,
        id: i64,
        patch: &CoursePatch,
    ) -> Result<(ParentRow, Course), AppError> {
        let mut parent = self
            .find_live(&mut *conn, id)
            .await?
            .ok_or_else(|| self.not_found(id))?;
        let course = update_course(&mut *conn, parent.course_id, patch)
            .await?
            .ok_or_else(|| self.not_found(id))?;

        let sql = format!(
            "UPDATE {} SET updated_at = NOW() WHERE id = $1 RETURNING updated_at",
            self.table
        );
        parent.updated_at = sqlx::query_scalar(&sql)
            .bind(id)
            .fetch_one(&mut *conn)
            .await?;

        Ok((parent, course))
    }

    /// Hard-deletes every association row of the parent.
    pub async fn delete_links(&self, conn: &mut PgConnection, id: i64) -> Result<u64, AppError> {
        let sql = format!("DELETE FROM {} WHERE {} = $1", self.links_table, self.link_key);
        let result = sqlx::query(&sql).bind(id).execute(conn).await?;
        Ok(result.rows_affected())
    }

    /// Hard-deletes the rows linking `course_id` to the parent.
    pub async fn detach(
        &self,
        conn: &mut PgConnection,
        id: i64,
        course_id: i64,
    ) -> Result<u64, AppError> {
        let sql = format!(
            "DELETE FROM {} WHERE {} = $1 AND course_id = $2",
            self.links_table, self.link_key
        );
        let result = sqlx::query(&sql)
            .bind(id)
            .bind(course_id)
            .execute(conn)
            .await?;
        Ok(result.rows_affected())
    }

    /// Removes the associations, then soft-deletes the parent and its
    /// identity course. Returns `Ok(false)` if the parent was not live.
    pub async fn soft_delete(&self, conn: &mut PgConnection, id: i64) -> Result<bool, AppError> {
        let Some(parent) = self.find_live(&mut *conn, id).await? else {
            return Ok(false);
        };

        self.delete_links(&mut *conn, id).await?;

        let sql = format!("UPDATE {} SET deleted_at = NOW() WHERE id = $1", self.table);
        sqlx::query(&sql).bind(id).execute(&mut *conn).await?;
        soft_delete_course(&mut *conn, parent.course_id).await?;

        Ok(true)
    }
}
