//! Read-only access to media attached to models.

use crate::domain::entities::MediaIndex;
use crate::error::AppError;
use async_trait::async_trait;

/// Resolves media for many models in one call.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgMediaLookup`] - reads the `media` table
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MediaLookup: Send + Sync {
    /// Returns media of the given collections for all `ids`, grouped by model id
    /// then collection, each list ordered by `order_column`.
    ///
    /// Models without media are absent from the index.
    async fn media_by_model_ids(
        &self,
        ids: Vec<i64>,
        collections: Vec<String>,
        model_type: &str,
    ) -> Result<MediaIndex, AppError>;
}
