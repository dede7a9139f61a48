//! Data Transfer Objects for API requests and responses.
//!
//! All DTOs use Serde for JSON serialization/deserialization and validator
//! for input validation.

pub mod bundle;
pub mod course;
pub mod courses_array;
pub mod health;
pub mod lookup;
pub mod pagination;
pub mod program;
