//! Lookup table management service.

use crate::domain::entities::{LookupEntry, LookupKind, LookupPatch, NewLookupEntry};
use crate::domain::repositories::LookupRepository;
use crate::error::AppError;
use serde_json::json;
use std::sync::Arc;

/// Service for the catalog lookup tables.
///
/// One instance serves all four tables; callers pass the [`LookupKind`].
pub struct LookupService {
    repository: Arc<dyn LookupRepository>,
}

impl LookupService {
    /// Creates a new lookup service.
    pub fn new(repository: Arc<dyn LookupRepository>) -> Self {
        Self { repository }
    }

    /// Lists live rows with their total count.
    pub async fn list(
        &self,
        kind: LookupKind,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<LookupEntry>, i64), AppError> {
        let items = self.repository.list(kind, offset, limit).await?;
        let total = self.repository.count(kind).await?;
        Ok((items, total))
    }

    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no live row has this id.
    pub async fn get(&self, kind: LookupKind, id: i64) -> Result<LookupEntry, AppError> {
        self.repository
            .find_by_id(kind, id)
            .await?
            .ok_or_else(|| not_found(kind, id))
    }

    /// Creates a row.
    ///
    /// Structure types require a slug, unique among live rows. Other kinds
    /// ignore any slug given.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if a structure type has no slug.
    /// Returns [`AppError::Conflict`] if the slug is taken.
    pub async fn create(
        &self,
        kind: LookupKind,
        name: String,
        slug: Option<String>,
    ) -> Result<LookupEntry, AppError> {
        let slug = if kind.has_slug() {
            let slug = slug.ok_or_else(|| {
                AppError::bad_request(
                    format!("{} requires a slug", kind.label()),
                    json!({ "field": "slug" }),
                )
            })?;
            self.ensure_slug_free(kind, &slug, None).await?;
            Some(slug)
        } else {
            None
        };

        let created = self
            .repository
            .create(kind, NewLookupEntry { name, slug })
            .await?;

        tracing::info!(table = kind.table(), id = created.id, "Lookup row created");

        Ok(created)
    }

    /// Applies a partial update.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no live row has this id.
    /// Returns [`AppError::Conflict`] if the new slug belongs to another row.
    pub async fn update(
        &self,
        kind: LookupKind,
        id: i64,
        mut patch: LookupPatch,
    ) -> Result<LookupEntry, AppError> {
        if !kind.has_slug() {
            patch.slug = None;
        }
        if let Some(slug) = &patch.slug {
            self.ensure_slug_free(kind, slug, Some(id)).await?;
        }

        self.repository.update(kind, id, patch).await
    }

    /// Soft-deletes a row.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no live row has this id.
    pub async fn delete(&self, kind: LookupKind, id: i64) -> Result<(), AppError> {
        if !self.repository.delete(kind, id).await? {
            return Err(not_found(kind, id));
        }

        tracing::info!(table = kind.table(), id, "Lookup row deleted");
        Ok(())
    }

    async fn ensure_slug_free(
        &self,
        kind: LookupKind,
        slug: &str,
        except_id: Option<i64>,
    ) -> Result<(), AppError> {
        match self.repository.find_by_slug(kind, slug).await? {
            Some(existing) if Some(existing.id) != except_id => Err(AppError::conflict(
                "Slug already exists",
                json!({ "slug": slug }),
            )),
            _ => Ok(()),
        }
    }
}

fn not_found(kind: LookupKind, id: i64) -> AppError {
    AppError::not_found(format!("{} not found", kind.label()), json!({ "id": id }))
}
