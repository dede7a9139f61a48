//! PostgreSQL implementation of the media lookup.

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use std::sync::Arc;

use crate::domain::entities::{MediaIndex, MediaRef};
use crate::domain::repositories::MediaLookup;
use crate::error::AppError;

#[derive(Debug, FromRow)]
struct MediaRow {
    id: i64,
    model_id: i64,
    collection_name: String,
    name: String,
    file_name: String,
    mime_type: Option<String>,
    disk: String,
    size: i64,
}

/// Reads the `media` table written by the media storage service.
pub struct PgMediaLookup {
    pool: Arc<PgPool>,
}

impl PgMediaLookup {
    /// Creates a new lookup with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MediaLookup for PgMediaLookup {
    async fn media_by_model_ids(
        &self,
        ids: Vec<i64>,
        collections: Vec<String>,
        model_type: &str,
    ) -> Result<MediaIndex, AppError> {
        if ids.is_empty() || collections.is_empty() {
            return Ok(MediaIndex::new());
        }

        let rows = sqlx::query_as::<_, MediaRow>(
            r#"
            SELECT id, model_id, collection_name, name, file_name, mime_type, disk, size
            FROM media
            WHERE model_type = $1
              AND model_id = ANY($2)
              AND collection_name = ANY($3)
            ORDER BY model_id, collection_name, order_column NULLS LAST, id
            "#,
        )
        .bind(model_type)
        .bind(&ids)
        .bind(&collections)
        .fetch_all(self.pool.as_ref())
        .await?;

        let mut index = MediaIndex::new();
        for row in rows {
            index
                .entry(row.model_id)
                .or_default()
                .entry(row.collection_name.clone())
                .or_default()
                .push(MediaRef {
                    id: row.id,
                    collection_name: row.collection_name,
                    name: row.name,
                    file_name: row.file_name,
                    mime_type: row.mime_type,
                    disk: row.disk,
                    size: row.size,
                });
        }

        Ok(index)
    }
}
