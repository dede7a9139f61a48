//! Core domain entities representing the catalog data model.
//!
//! Entities are plain data structures without persistence or serialization
//! concerns.
//!
//! # Entity Types
//!
//! - [`Course`] - Shared learning unit (plain course, bundle or program identity)
//! - [`Bundle`] / [`Program`] - Aggregates owning ordered course associations
//! - [`BundleCourse`] / [`ProgramCourse`] - Association rows
//! - [`LookupEntry`] - Categories, statuses, structure types, course types
//! - [`MediaRef`] - Media attached to courses
//!
//! # Design Pattern
//!
//! Separate structs are used for creation and partial updates:
//! - `NewCourse`, `NewLookupEntry`, `BundleCourseInput`, `ProgramCourseInput`
//! - `CoursePatch`, `LookupPatch`

pub mod association;
pub mod course;
pub mod lookup;
pub mod media;

pub use association::{
    Bundle, BundleCourse, BundleCourseInput, BundleRecord, PositionedCourse, Program,
    ProgramCourse, ProgramCourseInput, ProgramCourseRow, ProgramRecord, SyncPlan,
};
pub use course::{
    Course, CourseAttributes, CoursePatch, DRAFT_STATUS, NewCourse, StructureType,
};
pub use lookup::{LookupEntry, LookupKind, LookupPatch, NewLookupEntry};
pub use media::{
    COURSE_MEDIA_COLLECTIONS, COURSE_MODEL_TYPE, COVER_IMAGE_COLLECTION, MediaIndex, MediaRef,
    media_for,
};
