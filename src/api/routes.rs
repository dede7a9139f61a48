//! API route configuration.

use crate::api::handlers::{
    assign_course_category_handler, attach_bundle_course_handler, attach_program_course_handler,
    bundle_courses_handler, course_categories_handler, create_bundle_handler, create_course_handler,
    create_lookup_handler, create_program_handler, delete_bundle_handler, delete_course_handler,
    delete_lookup_handler, delete_program_handler, detach_bundle_course_handler,
    detach_program_course_handler, get_bundle_handler, get_course_handler, get_lookup_handler,
    get_program_handler, list_bundles_handler, list_courses_handler, list_lookups_handler,
    list_programs_handler, program_courses_handler, reposition_bundle_courses_handler,
    reposition_program_courses_handler, sync_bundle_courses_handler, sync_program_courses_handler,
    unassign_course_category_handler, update_bundle_handler, update_course_handler,
    update_lookup_handler, update_program_handler,
};
use crate::domain::entities::LookupKind;
use crate::state::AppState;
use axum::{
    Extension, Router,
    routing::{delete, get, post},
};

/// CRUD routes for one lookup table.
///
/// The same handlers serve every table; `kind` is injected as an
/// [`Extension`] so each handler knows which table it works on.
pub fn lookup_routes(kind: LookupKind) -> Router<AppState> {
    Router::new()
        .route("/", get(list_lookups_handler).post(create_lookup_handler))
        .route(
            "/{id}",
            get(get_lookup_handler)
                .put(update_lookup_handler)
                .delete(delete_lookup_handler),
        )
        .layer(Extension(kind))
}

/// All API routes.
///
/// # Endpoints
///
/// - `/course_categories`, `/course_statuses`, `/course_structure_types`,
///   `/courses_types` - Lookup CRUD (`GET`, `POST`, `GET/PUT/DELETE /{id}`)
/// - `GET    /courses`                           - List plain courses (paginated)
/// - `POST   /courses`                           - Create a course
/// - `GET    /courses/{id}`                      - Course with media collections
/// - `PATCH  /courses/{id}`                      - Partially update a course
/// - `DELETE /courses/{id}`                      - Soft-delete a course
/// - `GET    /courses/{id}/categories`           - Categories of a course
/// - `POST   /courses/{id}/categories`           - Assign a category
/// - `DELETE /courses/{id}/categories/{category_id}` - Unassign a category
/// - `GET    /bundles`                           - List bundles (paginated)
/// - `POST   /bundles`                           - Create a bundle with its course list
/// - `GET    /bundles/{id}`                      - Bundle with media and course list
/// - `PATCH  /bundles/{id}`                      - Update a bundle, optionally replacing its list
/// - `DELETE /bundles/{id}`                      - Delete a bundle
/// - `GET    /bundles/{id}/courses`              - Ordered course list
/// - `PUT    /bundles/{id}/courses`              - Replace the course list
/// - `PATCH  /bundles/{id}/courses`              - Move linked courses
/// - `DELETE /bundles/{id}/courses/{course_id}`  - Unlink a course
/// - `POST   /bundle_courses`                    - Link one course
/// - `/programs/...`, `POST /program_courses`    - Same shape as bundles, grouped by year and semester
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest(
            "/course_categories",
            lookup_routes(LookupKind::Category),
        )
        .nest("/course_statuses", lookup_routes(LookupKind::Status))
        .nest(
            "/course_structure_types",
            lookup_routes(LookupKind::StructureType),
        )
        .nest("/courses_types", lookup_routes(LookupKind::CourseType))
        .route(
            "/courses",
            get(list_courses_handler).post(create_course_handler),
        )
        .route(
            "/courses/{id}",
            get(get_course_handler)
                .patch(update_course_handler)
                .delete(delete_course_handler),
        )
        .route(
            "/courses/{id}/categories",
            get(course_categories_handler).post(assign_course_category_handler),
        )
        .route(
            "/courses/{id}/categories/{category_id}",
            delete(unassign_course_category_handler),
        )
        .route(
            "/bundles",
            get(list_bundles_handler).post(create_bundle_handler),
        )
        .route(
            "/bundles/{id}",
            get(get_bundle_handler)
                .patch(update_bundle_handler)
                .delete(delete_bundle_handler),
        )
        .route(
            "/bundles/{id}/courses",
            get(bundle_courses_handler)
                .put(sync_bundle_courses_handler)
                .patch(reposition_bundle_courses_handler),
        )
        .route(
            "/bundles/{id}/courses/{course_id}",
            delete(detach_bundle_course_handler),
        )
        .route("/bundle_courses", post(attach_bundle_course_handler))
        .route(
            "/programs",
            get(list_programs_handler).post(create_program_handler),
        )
        .route(
            "/programs/{id}",
            get(get_program_handler)
                .patch(update_program_handler)
                .delete(delete_program_handler),
        )
        .route(
            "/programs/{id}/courses",
            get(program_courses_handler)
                .put(sync_program_courses_handler)
                .patch(reposition_program_courses_handler),
        )
        .route(
            "/programs/{id}/courses/{course_id}",
            delete(detach_program_course_handler),
        )
        .route("/program_courses", post(attach_program_course_handler))
}
