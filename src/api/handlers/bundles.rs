//! Handlers for bundle endpoints.
//!
//! Create and sync answer with the rows they wrote, in input order, each
//! joined with its course. Reads, update and reposition return the stored
//! list ordered by `course_position`.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::bundle::{
    AttachBundleCourseRequest, BundleCourseItem, BundleCoursesResponse, BundleDetailResponse,
    BundleItem, BundleResponse, CreateBundleRequest, RepositionBundleCoursesRequest,
    SyncBundleCoursesRequest, UpdateBundleRequest,
};
use crate::api::dto::course::{BundleCourseCard, media_collections};
use crate::api::dto::courses_array::bundle_plan;
use crate::api::dto::pagination::{PageResponse, PaginationParams};
use crate::application::services::BundleView;
use crate::domain::entities::BundleCourseInput;
use crate::domain::formatting::CourseCard;
use crate::error::AppError;
use crate::state::AppState;

fn cards(courses: Vec<CourseCard>) -> Vec<BundleCourseCard> {
    courses.into_iter().map(BundleCourseCard::from).collect()
}

fn bundle_response(view: BundleView) -> BundleResponse {
    BundleResponse {
        id: view.record.bundle.id,
        course: view.record.course.into(),
        courses: cards(view.courses),
    }
}

/// Lists bundles with their identity course.
///
/// # Endpoint
///
/// `GET /api/bundles?page=1&page_size=25`
pub async fn list_bundles_handler(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<PageResponse<BundleItem>>, AppError> {
    let page = params.resolve(state.default_page_size)?;

    let (items, total) = state
        .bundle_service
        .list_bundles(page.offset(), page.limit())
        .await?;

    Ok(Json(PageResponse::new(
        items.into_iter().map(BundleItem::from).collect(),
        page,
        total,
    )))
}

/// Creates a bundle with its identity course and initial course list.
///
/// # Endpoint
///
/// `POST /api/bundles`
///
/// # Request Body
///
/// ```json
/// {
///   "course_name": "Web Development Bundle",
///   "courses_array": [
///     { "course_id": 10, "course_position": 2 },
///     { "course_id": 11, "course_position": 1 }
///   ]
/// }
/// ```
///
/// Items missing `course_id` or `course_position` are skipped. `courses` in
/// the response follows the order of `courses_array`.
///
/// # Errors
///
/// Returns 400 if validation fails.
/// Returns 422 if a listed course does not exist; nothing is created.
pub async fn create_bundle_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateBundleRequest>,
) -> Result<(StatusCode, Json<BundleResponse>), AppError> {
    payload.validate()?;

    let plan = bundle_plan(payload.courses_array);
    let view = state
        .bundle_service
        .create_bundle(payload.course.into_attributes(), plan)
        .await?;

    Ok((StatusCode::CREATED, Json(bundle_response(view))))
}

/// Returns a bundle with its media collections and course list.
///
/// # Endpoint
///
/// `GET /api/bundles/{id}`
pub async fn get_bundle_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<BundleDetailResponse>, AppError> {
    let details = state.bundle_service.get_bundle_details(id).await?;

    Ok(Json(BundleDetailResponse {
        id: details.record.bundle.id,
        course: details.record.course.into(),
        media: media_collections(details.media),
        courses: cards(details.courses),
    }))
}

/// Updates a bundle's course fields and optionally replaces its course list.
///
/// # Endpoint
///
/// `PATCH /api/bundles/{id}`
///
/// `courses_array` absent keeps the list; present (even `[]`) replaces it.
///
/// # Errors
///
/// Returns 404 if the bundle does not exist.
/// Returns 422 if a listed course does not exist; nothing is changed.
pub async fn update_bundle_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Json(payload): Json<UpdateBundleRequest>,
) -> Result<Json<BundleResponse>, AppError> {
    payload.validate()?;

    let plan = payload.courses_array.map(bundle_plan);
    let view = state
        .bundle_service
        .update_bundle(id, payload.course.into_patch(), plan)
        .await?;

    Ok(Json(bundle_response(view)))
}

/// Deletes a bundle, its identity course and its course list.
///
/// # Endpoint
///
/// `DELETE /api/bundles/{id}`
pub async fn delete_bundle_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    state.bundle_service.delete_bundle(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Returns the ordered course list of a bundle.
///
/// # Endpoint
///
/// `GET /api/bundles/{id}/courses`
///
/// # Response
///
/// ```json
/// {
///   "bundle_id": 5,
///   "courses": [
///     { "id": 11, "course_name": "HTML", "course_position": 1, "course_cover_image": null },
///     { "id": 10, "course_name": "CSS", "course_position": 2, "course_cover_image": { "id": 3 } }
///   ]
/// }
/// ```
pub async fn bundle_courses_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<BundleCoursesResponse>, AppError> {
    let courses = state.bundle_service.bundle_courses(id).await?;

    Ok(Json(BundleCoursesResponse {
        bundle_id: id,
        courses: cards(courses),
    }))
}

/// Replaces the whole course list of a bundle.
///
/// # Endpoint
///
/// `PUT /api/bundles/{id}/courses`
///
/// Body: `{ "courses_array": [{ "course_id": 10, "course_position": 1 }] }`.
/// Repeating the same request leaves the same rows. The response lists the
/// written rows in input order.
pub async fn sync_bundle_courses_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Json(payload): Json<SyncBundleCoursesRequest>,
) -> Result<Json<BundleCoursesResponse>, AppError> {
    let plan = bundle_plan(payload.courses_array);
    let courses = state.bundle_service.sync_bundle_courses(id, plan).await?;

    Ok(Json(BundleCoursesResponse {
        bundle_id: id,
        courses: cards(courses),
    }))
}

/// Moves linked courses to new positions.
///
/// # Endpoint
///
/// `PATCH /api/bundles/{id}/courses`
///
/// # Errors
///
/// Returns 404 if any course is not linked to the bundle; nothing is changed.
pub async fn reposition_bundle_courses_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Json(payload): Json<RepositionBundleCoursesRequest>,
) -> Result<Json<BundleCoursesResponse>, AppError> {
    payload.validate()?;

    let courses = state
        .bundle_service
        .reposition_courses(id, payload.into_inputs())
        .await?;

    Ok(Json(BundleCoursesResponse {
        bundle_id: id,
        courses: cards(courses),
    }))
}

/// Unlinks a course from a bundle.
///
/// # Endpoint
///
/// `DELETE /api/bundles/{id}/courses/{course_id}`
pub async fn detach_bundle_course_handler(
    Path((id, course_id)): Path<(i64, i64)>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    state.bundle_service.detach_course(id, course_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Links one course to a bundle.
///
/// # Endpoint
///
/// `POST /api/bundle_courses`
///
/// # Errors
///
/// Returns 404 if the bundle does not exist.
/// Returns 422 if the course does not exist.
pub async fn attach_bundle_course_handler(
    State(state): State<AppState>,
    Json(payload): Json<AttachBundleCourseRequest>,
) -> Result<(StatusCode, Json<BundleCourseItem>), AppError> {
    let row = state
        .bundle_service
        .attach_course(
            payload.bundle_id,
            BundleCourseInput {
                course_id: payload.course_id,
                course_position: payload.course_position,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(row.into())))
}
