//! PostgreSQL implementation of bundle repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::{FromRow, PgConnection, PgPool};
use std::sync::Arc;

use super::pg_aggregate::{BUNDLES, ParentRow};
use super::pg_course_repository::CourseRecord;
use crate::domain::entities::{
    Bundle, BundleCourse, BundleCourseInput, BundleRecord, Course, CoursePatch, NewCourse,
    PositionedCourse,
};
use crate::domain::repositories::BundleRepository;
use crate::error::AppError;

fn bundle_record((parent, course): (ParentRow, Course)) -> BundleRecord {
    BundleRecord {
        bundle: Bundle {
            id: parent.id,
            course_id: parent.course_id,
            created_at: parent.created_at,
            updated_at: parent.updated_at,
        },
        course,
    }
}

#[derive(Debug, FromRow)]
struct BundleCourseRow {
    id: i64,
    bundle_id: i64,
    course_id: i64,
    course_position: i32,
    created_at: DateTime<Utc>,
}

impl From<BundleCourseRow> for BundleCourse {
    fn from(r: BundleCourseRow) -> Self {
        BundleCourse {
            id: r.id,
            bundle_id: r.bundle_id,
            course_id: r.course_id,
            course_position: r.course_position,
            created_at: r.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct PositionedRow {
    course_position: i32,
    #[sqlx(flatten)]
    course: CourseRecord,
}

/// Inserts rows one by one so ids follow input order.
async fn insert_rows(
    conn: &mut PgConnection,
    bundle_id: i64,
    courses: &[BundleCourseInput],
) -> Result<Vec<BundleCourse>, AppError> {
    let mut inserted = Vec::with_capacity(courses.len());
    for item in courses {
        let row = sqlx::query_as::<_, BundleCourseRow>(
            r#"
            INSERT INTO bundle_courses (bundle_id, course_id, course_position)
            VALUES ($1, $2, $3)
            RETURNING id, bundle_id, course_id, course_position, created_at
            "#,
        )
        .bind(bundle_id)
        .bind(item.course_id)
        .bind(item.course_position)
        .fetch_one(&mut *conn)
        .await?;
        inserted.push(row.into());
    }
    Ok(inserted)
}

/// PostgreSQL repository for bundles and `bundle_courses`.
pub struct PgBundleRepository {
    pool: Arc<PgPool>,
}

impl PgBundleRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BundleRepository for PgBundleRepository {
    async fn create(
        &self,
        new_course: NewCourse,
        courses: Vec<BundleCourseInput>,
    ) -> Result<(BundleRecord, Vec<BundleCourse>), AppError> {
        let mut tx = self.pool.begin().await?;

        let record = bundle_record(BUNDLES.insert(&mut tx, &new_course).await?);
        let written = insert_rows(&mut tx, record.bundle.id, &courses).await?;

        tx.commit().await?;

        tracing::debug!(
            bundle_id = record.bundle.id,
            course_id = record.course.id,
            courses = written.len(),
            "Bundle created"
        );

        Ok((record, written))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<BundleRecord>, AppError> {
        let found = BUNDLES.find_record(&self.pool, id).await?;
        Ok(found.map(bundle_record))
    }

    async fn list(&self, offset: i64, limit: i64) -> Result<Vec<BundleRecord>, AppError> {
        let rows = BUNDLES.list_records(&self.pool, offset, limit).await?;
        Ok(rows.into_iter().map(bundle_record).collect())
    }

    async fn count(&self) -> Result<i64, AppError> {
        BUNDLES.count_live(&self.pool).await
    }

    async fn update(
        &self,
        id: i64,
        patch: CoursePatch,
        courses: Option<Vec<BundleCourseInput>>,
    ) -> Result<BundleRecord, AppError> {
        let mut tx = self.pool.begin().await?;

        let record = bundle_record(BUNDLES.update(&mut tx, id, &patch).await?);

        if let Some(courses) = courses {
            let removed = BUNDLES.delete_links(&mut tx, id).await?;
            insert_rows(&mut tx, id, &courses).await?;
            tracing::debug!(bundle_id = id, removed, inserted = courses.len(), "Bundle courses replaced");
        }

        tx.commit().await?;

        Ok(record)
    }

    async fn sync_courses(
        &self,
        bundle_id: i64,
        courses: Vec<BundleCourseInput>,
    ) -> Result<Vec<BundleCourse>, AppError> {
        let mut tx = self.pool.begin().await?;

        let removed = BUNDLES.delete_links(&mut tx, bundle_id).await?;
        let inserted = insert_rows(&mut tx, bundle_id, &courses).await?;

        tx.commit().await?;

        tracing::debug!(bundle_id, removed, inserted = inserted.len(), "Bundle courses synced");

        Ok(inserted)
    }

    async fn course_rows(&self, bundle_id: i64) -> Result<Vec<PositionedCourse>, AppError> {
        let rows = sqlx::query_as::<_, PositionedRow>(
            r#"
            SELECT bc.course_position, c.*
            FROM bundle_courses bc
            JOIN courses c ON c.id = bc.course_id
            WHERE bc.bundle_id = $1
              AND bc.deleted_at IS NULL
              AND c.deleted_at IS NULL
            ORDER BY bc.course_position, bc.id
            "#,
        )
        .bind(bundle_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| PositionedCourse {
                course: r.course.into(),
                course_position: r.course_position,
            })
            .collect())
    }

    async fn attach(
        &self,
        bundle_id: i64,
        course: BundleCourseInput,
    ) -> Result<BundleCourse, AppError> {
        let mut conn = self.pool.acquire().await?;
        let mut inserted = insert_rows(&mut conn, bundle_id, &[course]).await?;
        inserted
            .pop()
            .ok_or_else(|| AppError::internal("Insert returned no row", json!({})))
    }

    async fn reposition(
        &self,
        bundle_id: i64,
        courses: Vec<BundleCourseInput>,
    ) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        for item in &courses {
            let result = sqlx::query(
                r#"
                UPDATE bundle_courses
                SET course_position = $3, updated_at = NOW()
                WHERE bundle_id = $1 AND course_id = $2 AND deleted_at IS NULL
                "#,
            )
            .bind(bundle_id)
            .bind(item.course_id)
            .bind(item.course_position)
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() == 0 {
                return Err(AppError::not_found(
                    "Course is not part of this bundle",
                    json!({ "bundle_id": bundle_id, "course_id": item.course_id }),
                ));
            }
        }

        tx.commit().await?;
        Ok(())
    }

    async fn detach(&self, bundle_id: i64, course_id: i64) -> Result<u64, AppError> {
        let mut conn = self.pool.acquire().await?;
        BUNDLES.detach(&mut conn, bundle_id, course_id).await
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let mut tx = self.pool.begin().await?;
        let deleted = BUNDLES.soft_delete(&mut tx, id).await?;
        tx.commit().await?;
        Ok(deleted)
    }
}
