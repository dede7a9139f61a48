//! Handlers for the lookup table endpoints.
//!
//! The same handlers serve all four tables. The router mounts them once per
//! table and injects the [`LookupKind`] as an extension.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::lookup::{CreateLookupRequest, LookupItem, UpdateLookupRequest};
use crate::api::dto::pagination::{PageResponse, PaginationParams};
use crate::domain::entities::LookupKind;
use crate::error::AppError;
use crate::state::AppState;

/// Lists live rows of a lookup table.
///
/// # Endpoint
///
/// `GET /api/{course_categories|course_statuses|course_structure_types|courses_types}`
///
/// # Query Parameters
///
/// - `page` (optional) - Page number, 1-indexed (default: 1)
/// - `page_size` (optional) - Items per page, 1-100 (default: from config)
pub async fn list_lookups_handler(
    State(state): State<AppState>,
    Extension(kind): Extension<LookupKind>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<PageResponse<LookupItem>>, AppError> {
    let page = params.resolve(state.default_page_size)?;

    let (items, total) = state
        .lookup_service
        .list(kind, page.offset(), page.limit())
        .await?;

    Ok(Json(PageResponse::new(
        items.into_iter().map(LookupItem::from).collect(),
        page,
        total,
    )))
}

/// Creates a lookup row.
///
/// # Endpoint
///
/// `POST /api/{table}`
///
/// # Errors
///
/// Returns 400 if the name is empty, or a structure type has no valid slug.
/// Returns 409 if the slug is already taken.
pub async fn create_lookup_handler(
    State(state): State<AppState>,
    Extension(kind): Extension<LookupKind>,
    Json(payload): Json<CreateLookupRequest>,
) -> Result<(StatusCode, Json<LookupItem>), AppError> {
    payload.validate()?;

    let created = state
        .lookup_service
        .create(kind, payload.name, payload.slug)
        .await?;

    Ok((StatusCode::CREATED, Json(created.into())))
}

/// # Endpoint
///
/// `GET /api/{table}/{id}`
pub async fn get_lookup_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Extension(kind): Extension<LookupKind>,
) -> Result<Json<LookupItem>, AppError> {
    let entry = state.lookup_service.get(kind, id).await?;
    Ok(Json(entry.into()))
}

/// Updates the name (and slug, for structure types) of a lookup row.
///
/// # Endpoint
///
/// `PUT /api/{table}/{id}`
pub async fn update_lookup_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Extension(kind): Extension<LookupKind>,
    Json(payload): Json<UpdateLookupRequest>,
) -> Result<Json<LookupItem>, AppError> {
    payload.validate()?;

    let entry = state
        .lookup_service
        .update(kind, id, payload.into_patch())
        .await?;

    Ok(Json(entry.into()))
}

/// Soft-deletes a lookup row.
///
/// # Endpoint
///
/// `DELETE /api/{table}/{id}`
pub async fn delete_lookup_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Extension(kind): Extension<LookupKind>,
) -> Result<StatusCode, AppError> {
    state.lookup_service.delete(kind, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
