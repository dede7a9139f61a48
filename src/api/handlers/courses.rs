//! Handlers for plain course endpoints.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::course::{
    AssignCategoryRequest, CourseCategoriesResponse, CourseDetailResponse, CourseFieldsRequest,
    CourseItem, CourseUpdateRequest, media_collections,
};
use crate::api::dto::lookup::LookupItem;
use crate::api::dto::pagination::{PageResponse, PaginationParams};
use crate::error::AppError;
use crate::state::AppState;

/// Lists plain courses (not bundles or programs).
///
/// # Endpoint
///
/// `GET /api/courses?page=1&page_size=25`
pub async fn list_courses_handler(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<PageResponse<CourseItem>>, AppError> {
    let page = params.resolve(state.default_page_size)?;

    let (items, total) = state
        .course_service
        .list_courses(page.offset(), page.limit())
        .await?;

    Ok(Json(PageResponse::new(
        items.into_iter().map(CourseItem::from).collect(),
        page,
        total,
    )))
}

/// Creates a plain course in `draft` status.
///
/// # Endpoint
///
/// `POST /api/courses`
///
/// # Errors
///
/// Returns 400 if validation fails or the end date precedes the start date.
/// Returns 422 if a referenced course type does not exist.
pub async fn create_course_handler(
    State(state): State<AppState>,
    Json(payload): Json<CourseFieldsRequest>,
) -> Result<(StatusCode, Json<CourseItem>), AppError> {
    payload.validate()?;

    let course = state
        .course_service
        .create_course(payload.into_attributes())
        .await?;

    Ok((StatusCode::CREATED, Json(course.into())))
}

/// Returns a course with all of its media collections.
///
/// # Endpoint
///
/// `GET /api/courses/{id}`
pub async fn get_course_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<CourseDetailResponse>, AppError> {
    let details = state.course_service.get_course_details(id).await?;

    Ok(Json(CourseDetailResponse {
        course: details.course.into(),
        media: media_collections(details.media),
    }))
}

/// Partially updates a course.
///
/// # Endpoint
///
/// `PATCH /api/courses/{id}`
///
/// `course_description: null` clears the description.
pub async fn update_course_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Json(payload): Json<CourseUpdateRequest>,
) -> Result<Json<CourseItem>, AppError> {
    payload.validate()?;

    let course = state
        .course_service
        .update_course(id, payload.into_patch())
        .await?;

    Ok(Json(course.into()))
}

/// Soft-deletes a course.
///
/// # Endpoint
///
/// `DELETE /api/courses/{id}`
pub async fn delete_course_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    state.course_service.delete_course(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Lists the categories of a course.
///
/// # Endpoint
///
/// `GET /api/courses/{id}/categories`
///
/// # Errors
///
/// Returns 404 with `Course not found` if the course does not exist.
pub async fn course_categories_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<CourseCategoriesResponse>, AppError> {
    let categories = state.course_service.course_categories(id).await?;

    Ok(Json(CourseCategoriesResponse {
        course_id: id,
        categories: categories.into_iter().map(LookupItem::from).collect(),
    }))
}

/// Links a category to a course. Assigning twice is a no-op.
///
/// # Endpoint
///
/// `POST /api/courses/{id}/categories`
///
/// Body: `{ "course_category_id": 4 }`.
pub async fn assign_course_category_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Json(payload): Json<AssignCategoryRequest>,
) -> Result<Json<CourseCategoriesResponse>, AppError> {
    payload.validate()?;

    let categories = state
        .course_service
        .assign_category(id, payload.course_category_id)
        .await?;

    Ok(Json(CourseCategoriesResponse {
        course_id: id,
        categories: categories.into_iter().map(LookupItem::from).collect(),
    }))
}

/// Unlinks a category from a course.
///
/// # Endpoint
///
/// `DELETE /api/courses/{id}/categories/{category_id}`
pub async fn unassign_course_category_handler(
    Path((id, category_id)): Path<(i64, i64)>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    state
        .course_service
        .unassign_category(id, category_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
