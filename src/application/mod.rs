//! Application layer services implementing business logic.
//!
//! This layer orchestrates domain operations by coordinating repository calls,
//! validation, and business rules. Services consume repository traits and provide
//! a clean API for HTTP handlers.
//!
//! # Available Services
//!
//! - [`services::lookup_service::LookupService`] - Lookup table management
//! - [`services::course_service::CourseService`] - Course creation, updates and media
//! - [`services::bundle_service::BundleService`] - Bundles and their ordered courses
//! - [`services::program_service::ProgramService`] - Programs and their curricula

pub mod services;
