//! Business logic services for the application layer.

pub mod bundle_service;
pub mod course_service;
pub mod lookup_service;
pub mod program_service;

pub use bundle_service::{BundleDetails, BundleService, BundleView};
pub use course_service::{CourseDetails, CourseService};
pub use lookup_service::LookupService;
pub use program_service::{ProgramCreated, ProgramDetails, ProgramService, ProgramView};
