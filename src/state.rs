//! Shared application state injected into all handlers.

use std::sync::Arc;

use crate::application::services::{BundleService, CourseService, LookupService, ProgramService};

/// Services and settings shared by every request.
///
/// Cloned per request by axum; all services sit behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub lookup_service: Arc<LookupService>,
    pub course_service: Arc<CourseService>,
    pub bundle_service: Arc<BundleService>,
    pub program_service: Arc<ProgramService>,
    /// Page size used when a list request does not name one.
    pub default_page_size: u32,
}
