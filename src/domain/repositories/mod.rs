//! Repository trait definitions for the domain layer.
//!
//! Traits define the contract for data operations; implementations live in
//! `crate::infrastructure::persistence`. Mock implementations are generated via
//! `mockall` for testing.
//!
//! # Available Repositories
//!
//! - [`LookupRepository`] - Categories, statuses, structure types, course types
//! - [`CourseRepository`] - Course CRUD
//! - [`BundleRepository`] - Bundles and their ordered courses
//! - [`ProgramRepository`] - Programs and their year/semester courses
//! - [`MediaLookup`] - Bulk media resolution
//!
//! # Testing
//!
//! See integration tests in `tests/repository_*.rs` for usage examples.

pub mod bundle_repository;
pub mod course_repository;
pub mod lookup_repository;
pub mod media_lookup;
pub mod program_repository;

pub use bundle_repository::BundleRepository;
pub use course_repository::CourseRepository;
pub use lookup_repository::LookupRepository;
pub use media_lookup::MediaLookup;
pub use program_repository::ProgramRepository;

#[cfg(test)]
pub use bundle_repository::MockBundleRepository;
#[cfg(test)]
pub use course_repository::MockCourseRepository;
#[cfg(test)]
pub use lookup_repository::MockLookupRepository;
#[cfg(test)]
pub use media_lookup::MockMediaLookup;
#[cfg(test)]
pub use program_repository::MockProgramRepository;
