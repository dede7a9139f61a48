//! Handlers for program endpoints.
//!
//! Curricula are read back grouped by year, then semester, both in ascending
//! numeric order, with courses ordered by `course_position` inside each
//! semester. Create and sync instead answer with the rows they wrote, in
//! traversal order.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::course::{CourseSummaryItem, ProgramCourseCard, media_collections};
use crate::api::dto::courses_array::program_plan;
use crate::api::dto::pagination::{PageResponse, PaginationParams};
use crate::api::dto::program::{
    AttachProgramCourseRequest, CreateProgramRequest, ProgramCourseItem, ProgramCoursesResponse,
    ProgramCoursesWrittenResponse, ProgramCreatedResponse, ProgramDetailResponse, ProgramItem,
    ProgramResponse, RepositionProgramCoursesRequest, SyncProgramCoursesRequest,
    UpdateProgramRequest, project,
};
use crate::application::services::ProgramView;
use crate::domain::entities::ProgramCourseInput;
use crate::error::AppError;
use crate::state::AppState;

fn program_response(view: ProgramView) -> ProgramResponse {
    ProgramResponse {
        id: view.record.program.id,
        course: view.record.course.into(),
        courses: project::<ProgramCourseCard>(view.years),
    }
}

/// Lists programs with their identity course.
///
/// # Endpoint
///
/// `GET /api/programs?page=1&page_size=25`
pub async fn list_programs_handler(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<PageResponse<ProgramItem>>, AppError> {
    let page = params.resolve(state.default_page_size)?;

    let (items, total) = state
        .program_service
        .list_programs(page.offset(), page.limit())
        .await?;

    Ok(Json(PageResponse::new(
        items.into_iter().map(ProgramItem::from).collect(),
        page,
        total,
    )))
}

/// Creates a program with its identity course and initial curriculum.
///
/// # Endpoint
///
/// `POST /api/programs`
///
/// # Request Body
///
/// ```json
/// {
///   "course_name": "Computer Science BSc",
///   "courses_array": [
///     {
///       "program_year": 1,
///       "semesters": [
///         { "program_semester": 1, "courses": [{ "course_id": 20, "course_position": 1 }] },
///         { "program_semester": 2, "courses": [{ "course_id": 21, "course_position": 1 }] }
///       ]
///     }
///   ]
/// }
/// ```
///
/// A node missing its key is skipped together with its children. `courses`
/// in the response lists the written rows in traversal order.
///
/// # Errors
///
/// Returns 400 if a year or semester is below 1.
/// Returns 422 if a listed course does not exist; nothing is created.
pub async fn create_program_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateProgramRequest>,
) -> Result<(StatusCode, Json<ProgramCreatedResponse>), AppError> {
    payload.validate()?;

    let plan = program_plan(payload.courses_array);
    let created = state
        .program_service
        .create_program(payload.course.into_attributes(), plan)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ProgramCreatedResponse {
            id: created.record.program.id,
            course: created.record.course.into(),
            courses: created.courses.into_iter().map(ProgramCourseItem::from).collect(),
        }),
    ))
}

/// Returns a program with its media collections and trimmed curriculum.
///
/// # Endpoint
///
/// `GET /api/programs/{id}`
///
/// Courses carry only `id`, `course_name` and `course_position`.
pub async fn get_program_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<ProgramDetailResponse>, AppError> {
    let details = state.program_service.get_program_details(id).await?;

    Ok(Json(ProgramDetailResponse {
        id: details.record.program.id,
        course: details.record.course.into(),
        media: media_collections(details.media),
        courses: project::<CourseSummaryItem>(details.years),
    }))
}

/// Updates a program's course fields and optionally replaces its curriculum.
///
/// # Endpoint
///
/// `PATCH /api/programs/{id}`
///
/// `courses_array` absent keeps the curriculum; present (even `[]`) replaces it.
pub async fn update_program_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Json(payload): Json<UpdateProgramRequest>,
) -> Result<Json<ProgramResponse>, AppError> {
    payload.validate()?;

    let plan = payload.courses_array.map(program_plan);
    let view = state
        .program_service
        .update_program(id, payload.course.into_patch(), plan)
        .await?;

    Ok(Json(program_response(view)))
}

/// Deletes a program, its identity course and its curriculum.
///
/// # Endpoint
///
/// `DELETE /api/programs/{id}`
pub async fn delete_program_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    state.program_service.delete_program(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Returns the grouped curriculum of a program as full course cards.
///
/// # Endpoint
///
/// `GET /api/programs/{id}/courses`
pub async fn program_courses_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<ProgramCoursesResponse>, AppError> {
    let years = state.program_service.program_courses(id).await?;

    Ok(Json(ProgramCoursesResponse {
        program_id: id,
        courses: project(years),
    }))
}

/// Replaces the whole curriculum of a program.
///
/// # Endpoint
///
/// `PUT /api/programs/{id}/courses`
///
/// Responds with the written rows in traversal order.
pub async fn sync_program_courses_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Json(payload): Json<SyncProgramCoursesRequest>,
) -> Result<Json<ProgramCoursesWrittenResponse>, AppError> {
    payload.validate()?;

    let plan = program_plan(payload.courses_array);
    let rows = state.program_service.sync_program_courses(id, plan).await?;

    Ok(Json(ProgramCoursesWrittenResponse {
        program_id: id,
        courses: rows.into_iter().map(ProgramCourseItem::from).collect(),
    }))
}

/// Moves linked courses to a new year, semester and position.
///
/// # Endpoint
///
/// `PATCH /api/programs/{id}/courses`
///
/// # Errors
///
/// Returns 404 if any course is not linked to the program; nothing is changed.
pub async fn reposition_program_courses_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Json(payload): Json<RepositionProgramCoursesRequest>,
) -> Result<Json<ProgramCoursesResponse>, AppError> {
    payload.validate()?;

    let items = payload
        .courses
        .into_iter()
        .map(ProgramCourseInput::from)
        .collect();
    let years = state
        .program_service
        .reposition_courses(id, items)
        .await?;

    Ok(Json(ProgramCoursesResponse {
        program_id: id,
        courses: project(years),
    }))
}

/// Unlinks a course from a program.
///
/// # Endpoint
///
/// `DELETE /api/programs/{id}/courses/{course_id}`
pub async fn detach_program_course_handler(
    Path((id, course_id)): Path<(i64, i64)>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    state.program_service.detach_course(id, course_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Links one course to a program.
///
/// # Endpoint
///
/// `POST /api/program_courses`
pub async fn attach_program_course_handler(
    State(state): State<AppState>,
    Json(payload): Json<AttachProgramCourseRequest>,
) -> Result<(StatusCode, Json<ProgramCourseItem>), AppError> {
    payload.validate()?;

    let row = state
        .program_service
        .attach_course(payload.program_id, payload.placement.into())
        .await?;

    Ok((StatusCode::CREATED, Json(row.into())))
}
