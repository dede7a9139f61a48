//! PostgreSQL repository implementations.
//!
//! Concrete implementations of domain repository traits using SQLx runtime
//! queries mapped through `FromRow` records.
//!
//! # Repositories
//!
//! - [`PgLookupRepository`] - Lookup tables
//! - [`PgCourseRepository`] - Course storage and retrieval
//! - [`PgBundleRepository`] - Bundles and `bundle_courses`
//! - [`PgProgramRepository`] - Programs and `program_courses`
//! - [`PgMediaLookup`] - Bulk reads of the `media` table
//!
//! Bundles and programs share their aggregate lifecycle SQL through a private
//! `pg_aggregate` module.

mod pg_aggregate;
pub mod pg_bundle_repository;
pub mod pg_course_repository;
pub mod pg_lookup_repository;
pub mod pg_media_lookup;
pub mod pg_program_repository;

pub use pg_bundle_repository::PgBundleRepository;
pub use pg_course_repository::PgCourseRepository;
pub use pg_lookup_repository::PgLookupRepository;
pub use pg_media_lookup::PgMediaLookup;
pub use pg_program_repository::PgProgramRepository;
