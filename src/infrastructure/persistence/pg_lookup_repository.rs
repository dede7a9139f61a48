//! PostgreSQL implementation of lookup repository.
//!
//! The four lookup tables share one shape, so statements are built from the
//! table name of the [`LookupKind`]. Table names are compile-time constants;
//! values are always bound.
//!
//! Course categories are also linked to courses through `course_to_categories`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::{FromRow, PgPool};
use std::sync::Arc;

use crate::domain::entities::{LookupEntry, LookupKind, LookupPatch, NewLookupEntry};
use crate::domain::repositories::LookupRepository;
use crate::error::AppError;

#[derive(Debug, FromRow)]
struct LookupRecord {
    id: i64,
    name: String,
    slug: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<LookupRecord> for LookupEntry {
    fn from(r: LookupRecord) -> Self {
        LookupEntry {
            id: r.id,
            name: r.name,
            slug: r.slug,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

fn columns(kind: LookupKind) -> &'static str {
    if kind.has_slug() {
        "id, name, slug, created_at, updated_at"
    } else {
        "id, name, NULL::text AS slug, created_at, updated_at"
    }
}

/// PostgreSQL repository for the lookup tables.
pub struct PgLookupRepository {
    pool: Arc<PgPool>,
}

impl PgLookupRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    async fn find_where(
        &self,
        kind: LookupKind,
        column: &str,
        value: &str,
    ) -> Result<Option<LookupEntry>, AppError> {
        let sql = format!(
            "SELECT {} FROM {} WHERE {column} = $1 AND deleted_at IS NULL ORDER BY id LIMIT 1",
            columns(kind),
            kind.table()
        );

        let record = sqlx::query_as::<_, LookupRecord>(&sql)
            .bind(value)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(record.map(LookupEntry::from))
    }
}

#[async_trait]
impl LookupRepository for PgLookupRepository {
    async fn list(
        &self,
        kind: LookupKind,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<LookupEntry>, AppError> {
        let sql = format!(
            "SELECT {} FROM {} WHERE deleted_at IS NULL ORDER BY id LIMIT $1 OFFSET $2",
            columns(kind),
            kind.table()
        );

        let records = sqlx::query_as::<_, LookupRecord>(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(records.into_iter().map(LookupEntry::from).collect())
    }

    async fn count(&self, kind: LookupKind) -> Result<i64, AppError> {
        let sql = format!(
            "SELECT COUNT(*) FROM {} WHERE deleted_at IS NULL",
            kind.table()
        );

        let count: i64 = sqlx::query_scalar(&sql)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }

    async fn find_by_id(
        &self,
        kind: LookupKind,
        id: i64,
    ) -> Result<Option<LookupEntry>, AppError> {
        let sql = format!(
            "SELECT {} FROM {} WHERE id = $1 AND deleted_at IS NULL",
            columns(kind),
            kind.table()
        );

        let record = sqlx::query_as::<_, LookupRecord>(&sql)
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(record.map(LookupEntry::from))
    }

    async fn find_by_name(
        &self,
        kind: LookupKind,
        name: &str,
    ) -> Result<Option<LookupEntry>, AppError> {
        self.find_where(kind, "name", name).await
    }

    async fn find_by_slug(
        &self,
        kind: LookupKind,
        slug: &str,
    ) -> Result<Option<LookupEntry>, AppError> {
        if !kind.has_slug() {
            return Ok(None);
        }
        self.find_where(kind, "slug", slug).await
    }

    async fn create(
        &self,
        kind: LookupKind,
        new_entry: NewLookupEntry,
    ) -> Result<LookupEntry, AppError> {
        let query = if kind.has_slug() {
            let sql = format!(
                "INSERT INTO {} (name, slug) VALUES ($1, $2) RETURNING {}",
                kind.table(),
                columns(kind)
            );
            sqlx::query_as::<_, LookupRecord>(&sql)
                .bind(&new_entry.name)
                .bind(&new_entry.slug)
                .fetch_one(self.pool.as_ref())
                .await
        } else {
            let sql = format!(
                "INSERT INTO {} (name) VALUES ($1) RETURNING {}",
                kind.table(),
                columns(kind)
            );
            sqlx::query_as::<_, LookupRecord>(&sql)
                .bind(&new_entry.name)
                .fetch_one(self.pool.as_ref())
                .await
        };

        Ok(query?.into())
    }

    async fn update(
        &self,
        kind: LookupKind,
        id: i64,
        patch: LookupPatch,
    ) -> Result<LookupEntry, AppError> {
        let slug_assignment = if kind.has_slug() {
            "slug = COALESCE($3, slug),"
        } else {
            ""
        };
        let sql = format!(
            r#"
            UPDATE {} SET
                name = COALESCE($2, name),
                {slug_assignment}
                updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING {}
            "#,
            kind.table(),
            columns(kind)
        );

        let mut query = sqlx::query_as::<_, LookupRecord>(&sql)
            .bind(id)
            .bind(&patch.name);
        if kind.has_slug() {
            query = query.bind(&patch.slug);
        }

        query
            .fetch_optional(self.pool.as_ref())
            .await?
            .map(LookupEntry::from)
            .ok_or_else(|| {
                AppError::not_found(format!("{} not found", kind.label()), json!({ "id": id }))
            })
    }

    async fn delete(&self, kind: LookupKind, id: i64) -> Result<bool, AppError> {
        let sql = format!(
            "UPDATE {} SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
            kind.table()
        );

        let result = sqlx::query(&sql)
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn categories_of_course(&self, course_id: i64) -> Result<Vec<LookupEntry>, AppError> {
        let records = sqlx::query_as::<_, LookupRecord>(
            r#"
            SELECT cc.id, cc.name, NULL::text AS slug, cc.created_at, cc.updated_at
            FROM course_to_categories ctc
            JOIN course_categories cc ON cc.id = ctc.course_category_id
            WHERE ctc.course_id = $1 AND cc.deleted_at IS NULL
            ORDER BY cc.id
            "#,
        )
        .bind(course_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(records.into_iter().map(LookupEntry::from).collect())
    }

    async fn assign_category(&self, course_id: i64, category_id: i64) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            INSERT INTO course_to_categories (course_id, course_category_id)
            VALUES ($1, $2)
            ON CONFLICT (course_id, course_category_id) DO NOTHING
            "#,
        )
        .bind(course_id)
        .bind(category_id)
        .execute(self.pool.as_ref())
        .await?;

        tracing::debug!(
            course_id,
            category_id,
            inserted = result.rows_affected(),
            "Category assigned"
        );

        Ok(())
    }

    async fn unassign_category(
        &self,
        course_id: i64,
        category_id: i64,
    ) -> Result<u64, AppError> {
        let result = sqlx::query(
            "DELETE FROM course_to_categories WHERE course_id = $1 AND course_category_id = $2",
        )
        .bind(course_id)
        .bind(category_id)
        .execute(self.pool.as_ref())
        .await?;

        Ok(result.rows_affected())
    }
}
