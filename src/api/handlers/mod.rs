//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod bundles;
pub mod courses;
pub mod health;
pub mod lookups;
pub mod programs;

pub use bundles::{
    attach_bundle_course_handler, bundle_courses_handler, create_bundle_handler,
    delete_bundle_handler, detach_bundle_course_handler, get_bundle_handler,
    list_bundles_handler, reposition_bundle_courses_handler, sync_bundle_courses_handler,
    update_bundle_handler,
};
pub use courses::{
    assign_course_category_handler, course_categories_handler, create_course_handler,
    delete_course_handler, get_course_handler, list_courses_handler,
    unassign_course_category_handler, update_course_handler,
};
pub use health::health_handler;
pub use lookups::{
    create_lookup_handler, delete_lookup_handler, get_lookup_handler, list_lookups_handler,
    update_lookup_handler,
};
pub use programs::{
    attach_program_course_handler, create_program_handler, delete_program_handler,
    detach_program_course_handler, get_program_handler, list_programs_handler,
    program_courses_handler, reposition_program_courses_handler, sync_program_courses_handler,
    update_program_handler,
};
